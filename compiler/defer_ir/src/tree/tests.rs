use super::*;
use crate::{StringInterner, MAX_CALL_ARGS};
use pretty_assertions::assert_eq;

/// Builds `op(lhs, rhs)` with symbol leaves.
fn binary(interner: &StringInterner, op: &str, lhs: &str, rhs: Literal) -> ExprTree {
    let mut b = ExprBuilder::new();
    let func = b.symbol(interner.intern(op), Span::DUMMY);
    let l = b.symbol(interner.intern(lhs), Span::new(0, 1));
    let r = b.literal(rhs, Span::new(4, 5));
    let root = b.call(func, &[l, r], Span::new(0, 5)).unwrap();
    b.finish(root)
}

#[test]
fn test_single_node_trees() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    assert_eq!(ExprTree::symbol(x).as_symbol(), Some(x));
    assert_eq!(ExprTree::literal(Literal::Int(3)).as_literal(), Some(Literal::Int(3)));
    assert_eq!(ExprTree::symbol(x).node_count(), 1);
}

#[test]
fn test_structural_equality_ignores_arena_and_spans() {
    let interner = StringInterner::new();
    let a = binary(&interner, ">", "x", Literal::Int(5));
    let b = binary(&interner, ">", "x", Literal::Int(5));
    assert!(!a.arena().ptr_eq(b.arena()));
    assert_eq!(a, b);
}

#[test]
fn test_structural_inequality() {
    let interner = StringInterner::new();
    let a = binary(&interner, ">", "x", Literal::Int(5));
    assert_ne!(a, binary(&interner, "<", "x", Literal::Int(5)));
    assert_ne!(a, binary(&interner, ">", "y", Literal::Int(5)));
    assert_ne!(a, binary(&interner, ">", "x", Literal::Int(6)));
    assert_ne!(a, ExprTree::symbol(interner.intern("x")));
}

#[test]
fn test_subtree_shares_arena() {
    let interner = StringInterner::new();
    let tree = binary(&interner, ">", "x", Literal::Int(5));
    let ExprKind::Call { args, .. } = tree.kind() else {
        panic!("expected call");
    };
    let lhs = tree.subtree(tree.args(args)[0]);
    assert!(lhs.arena().ptr_eq(tree.arena()));
    assert_eq!(lhs.as_symbol(), Some(interner.intern("x")));
}

#[test]
fn test_copy_produces_equal_tree() {
    let interner = StringInterner::new();
    let tree = binary(&interner, "+", "a", Literal::float(1.5));
    let mut b = ExprBuilder::new();
    let root = b.copy(&tree, tree.root()).unwrap();
    let copied = b.finish(root);
    assert_eq!(copied, tree);
    assert_eq!(copied.node_count(), 4);
}

#[test]
fn test_copy_with_rewrites_symbols() {
    let interner = StringInterner::new();
    let tree = binary(&interner, ">", "placeholder", Literal::Int(31));
    let placeholder = interner.intern("placeholder");
    let mpg = interner.intern("mpg");

    let mut b = ExprBuilder::new();
    let root: Result<ExprId, BuildError> = b.copy_with(&tree, tree.root(), &mut |b, expr| {
        Ok(match expr.kind {
            ExprKind::Symbol(name) if name == placeholder => Some(b.symbol(mpg, expr.span)),
            _ => None,
        })
    });
    let rewritten = b.finish(root.unwrap());
    assert_eq!(rewritten, binary(&interner, ">", "mpg", Literal::Int(31)));
}

#[test]
fn test_has_embeds() {
    let interner = StringInterner::new();
    assert!(!binary(&interner, ">", "x", Literal::Int(1)).has_embeds());

    let mut b = ExprBuilder::new();
    let func = b.symbol(interner.intern("-"), Span::DUMMY);
    let e = b.embed(EmbedIdx::new(0));
    let root = b.call(func, &[e], Span::DUMMY).unwrap();
    assert!(b.finish(root).has_embeds());
}

/// `x + x + ... + x` with `terms` leaves, nested to the left.
fn left_chain(interner: &StringInterner, terms: usize) -> ExprTree {
    let mut b = ExprBuilder::new();
    let x = interner.intern("x");
    let plus = interner.intern("+");
    let mut lhs = b.symbol(x, Span::DUMMY);
    for _ in 1..terms {
        let func = b.symbol(plus, Span::DUMMY);
        let rhs = b.symbol(x, Span::DUMMY);
        lhs = b.call(func, &[lhs, rhs], Span::DUMMY).unwrap();
    }
    b.finish(lhs)
}

#[test]
fn test_copy_deep_chain() {
    let interner = StringInterner::new();
    let tree = left_chain(&interner, 200_000);
    let mut b = ExprBuilder::new();
    let root = b.copy(&tree, tree.root()).unwrap();
    let copied = b.finish(root);
    assert_eq!(copied.node_count(), tree.node_count());
    assert_eq!(copied, tree);
}

#[test]
fn test_call_argument_limit() {
    let interner = StringInterner::new();
    let mut b = ExprBuilder::new();
    let func = b.symbol(interner.intern("list"), Span::DUMMY);
    let one = b.literal(Literal::Int(1), Span::DUMMY);

    let at_limit = vec![one; MAX_CALL_ARGS];
    assert!(b.call(func, &at_limit, Span::DUMMY).is_ok());

    let over = vec![one; MAX_CALL_ARGS + 1];
    assert_eq!(
        b.call(func, &over, Span::DUMMY),
        Err(BuildError::TooManyArguments {
            count: MAX_CALL_ARGS + 1
        })
    );
}
