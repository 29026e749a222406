use super::*;
use defer_ir::{deparse, ExprKind, Literal, MAX_CALL_ARGS};
use pretty_assertions::assert_eq;

fn roundtrip(source: &str) -> String {
    let interner = StringInterner::new();
    let tree = parse(source, &interner).unwrap();
    deparse(&tree, &interner)
}

#[test]
fn test_parse_comparison_is_call_of_operator() {
    let interner = StringInterner::new();
    let tree = parse("x > 5", &interner).unwrap();
    let ExprKind::Call { func, args } = tree.kind() else {
        panic!("expected call, got {:?}", tree.kind());
    };
    assert_eq!(tree.get(func).kind, ExprKind::Symbol(interner.intern(">")));
    let args = tree.args(args);
    assert_eq!(tree.get(args[0]).kind, ExprKind::Symbol(interner.intern("x")));
    assert_eq!(tree.get(args[1]).kind, ExprKind::Literal(Literal::Int(5)));
    assert_eq!(tree.span(), Span::new(0, 5));
}

#[test]
fn test_precedence_and_associativity() {
    assert_eq!(roundtrip("a + b * c"), "a + b * c");
    assert_eq!(roundtrip("(a + b) * c"), "(a + b) * c");
    assert_eq!(roundtrip("a - b - c"), "a - b - c");
    assert_eq!(roundtrip("a - (b - c)"), "a - (b - c)");
    assert_eq!(roundtrip("a || b && c == d"), "a || b && c == d");
    assert_eq!(roundtrip("((x))"), "x");
}

#[test]
fn test_calls_and_unary() {
    assert_eq!(roundtrip("mean(x, y + 1)"), "mean(x, y + 1)");
    assert_eq!(roundtrip("f()"), "f()");
    assert_eq!(roundtrip("-x * 2"), "-x * 2");
    assert_eq!(roundtrip("!(a && b)"), "!(a && b)");
    assert_eq!(roundtrip("f(1)(2)"), "f(1)(2)");
}

#[test]
fn test_negative_number_is_literal() {
    let interner = StringInterner::new();
    let tree = parse("-5", &interner).unwrap();
    assert_eq!(tree.as_literal(), Some(Literal::Int(-5)));
    let tree = parse("-9223372036854775808", &interner).unwrap();
    assert_eq!(tree.as_literal(), Some(Literal::Int(i64::MIN)));
    assert_eq!(roundtrip("-(5)"), "-(5)");
    assert_eq!(roundtrip("--5"), "-(-5)");
}

#[test]
fn test_literals() {
    assert_eq!(roundtrip("1.5"), "1.5");
    assert_eq!(roundtrip("2e3"), "2000.0");
    assert_eq!(roundtrip(r#""a\tb""#), r#""a\tb""#);
    assert_eq!(roundtrip("null"), "null");
    assert_eq!(roundtrip("true && false"), "true && false");
}

#[test]
fn test_quoted_identifiers() {
    let interner = StringInterner::new();
    let tree = parse("`my var` + 1", &interner).unwrap();
    assert_eq!(deparse(&tree, &interner), "`my var` + 1");
    assert_eq!(roundtrip("`+`(1, 2)"), "1 + 2");
}

#[test]
fn test_errors() {
    let interner = StringInterner::new();
    assert_eq!(parse("", &interner), Err(ParseError::Empty));
    assert_eq!(parse("   ", &interner), Err(ParseError::Empty));
    assert_eq!(
        parse("x >", &interner),
        Err(ParseError::UnexpectedEof {
            expected: "expression"
        })
    );
    assert_eq!(
        parse("x y", &interner),
        Err(ParseError::TrailingInput {
            span: Span::new(2, 3)
        })
    );
    assert_eq!(
        parse("f(1,", &interner),
        Err(ParseError::UnexpectedEof {
            expected: "expression"
        })
    );
    assert!(matches!(
        parse("99999999999999999999", &interner),
        Err(ParseError::InvalidNumber { .. })
    ));
    assert!(matches!(
        parse(r#""\q""#, &interner),
        Err(ParseError::InvalidEscape { .. })
    ));
    assert!(matches!(
        parse("(1))", &interner),
        Err(ParseError::TrailingInput { .. })
    ));
}

#[test]
fn test_error_messages_name_the_offender() {
    let interner = StringInterner::new();
    let err = parse("x > )", &interner).unwrap_err();
    assert_eq!(err.to_string(), "expected expression, found `)`");
    assert_eq!(err.span(), Some(Span::new(4, 5)));
}

#[test]
fn test_nesting_limit() {
    let interner = StringInterner::new();
    let deep = format!("{}x{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
    assert_eq!(
        parse(&deep, &interner),
        Err(ParseError::NestingTooDeep { limit: MAX_NESTING })
    );
    let shallow = format!("{}x{}", "(".repeat(100), ")".repeat(100));
    assert!(parse(&shallow, &interner).is_ok());
}

#[test]
fn test_nesting_limit_covers_unary_and_calls() {
    let interner = StringInterner::new();
    let unary = format!("{}x", "!".repeat(MAX_NESTING + 1));
    assert_eq!(
        parse(&unary, &interner),
        Err(ParseError::NestingTooDeep { limit: MAX_NESTING })
    );
    let calls = format!("{}x{}", "f(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
    assert_eq!(
        parse(&calls, &interner),
        Err(ParseError::NestingTooDeep { limit: MAX_NESTING })
    );
}

#[test]
fn test_operator_chains_are_not_nesting() {
    // Chains parse in a loop; the tree is as deep as the chain is long
    let interner = StringInterner::new();
    let source = vec!["x"; 200_000].join(" + ");
    let tree = parse(&source, &interner).unwrap();
    assert_eq!(tree.node_count(), 200_000 + 2 * 199_999);
}

#[test]
fn test_argument_limit() {
    let interner = StringInterner::new();
    let at_limit = format!("list({})", vec!["1"; MAX_CALL_ARGS].join(", "));
    assert!(parse(&at_limit, &interner).is_ok());

    let over = format!("list({})", vec!["1"; MAX_CALL_ARGS + 1].join(", "));
    let err = parse(&over, &interner).unwrap_err();
    assert!(
        matches!(err, ParseError::TooManyArguments { count, .. } if count == MAX_CALL_ARGS + 1),
        "{err:?}"
    );
    assert_eq!(err.span().map(|s| s.start), Some(0));
}
