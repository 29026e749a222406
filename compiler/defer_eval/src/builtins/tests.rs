use super::*;
use pretty_assertions::assert_eq;

fn ints(ns: &[i64]) -> Value {
    Value::list(ns.iter().copied().map(Value::Int))
}

fn bools(bs: &[bool]) -> Value {
    Value::list(bs.iter().copied().map(Value::Bool))
}

#[test]
fn test_scalar_arithmetic() {
    assert_eq!(Builtin::Add.apply(&[Value::Int(2), Value::Int(3)]), Ok(Value::Int(5)));
    assert_eq!(Builtin::Sub.apply(&[Value::Int(2)]), Ok(Value::Int(-2)));
    assert_eq!(Builtin::Mul.apply(&[Value::Int(2), Value::Float(1.5)]), Ok(Value::Float(3.0)));
    assert_eq!(Builtin::Div.apply(&[Value::Int(7), Value::Int(2)]), Ok(Value::Float(3.5)));
    assert_eq!(Builtin::Rem.apply(&[Value::Int(-7), Value::Int(3)]), Ok(Value::Int(2)));
}

#[test]
fn test_arithmetic_errors() {
    assert_eq!(
        Builtin::Rem.apply(&[Value::Int(1), Value::Int(0)]),
        Err(ApplyError::DivisionByZero)
    );
    assert_eq!(
        Builtin::Add.apply(&[Value::Int(i64::MAX), Value::Int(1)]),
        Err(ApplyError::Overflow { op: "+" })
    );
    assert!(matches!(
        Builtin::Add.apply(&[Value::Int(1), Value::string("a")]),
        Err(ApplyError::Type { op: "+", .. })
    ));
    assert!(matches!(
        Builtin::Mul.apply(&[Value::Int(1)]),
        Err(ApplyError::Arity { got: 1, .. })
    ));
}

#[test]
fn test_elementwise_recycles_scalars() {
    assert_eq!(
        Builtin::Gt.apply(&[ints(&[4, 6, 8]), Value::Int(5)]),
        Ok(bools(&[false, true, true]))
    );
    assert_eq!(
        Builtin::Sub.apply(&[Value::Int(10), ints(&[1, 2])]),
        Ok(ints(&[9, 8]))
    );
    assert_eq!(
        Builtin::Add.apply(&[ints(&[1, 2]), ints(&[10, 20])]),
        Ok(ints(&[11, 22]))
    );
    assert_eq!(
        Builtin::Add.apply(&[ints(&[1, 2]), ints(&[1, 2, 3])]),
        Err(ApplyError::LengthMismatch {
            op: "+",
            left: 2,
            right: 3
        })
    );
    assert_eq!(Builtin::Not.apply(&[bools(&[true, false])]), Ok(bools(&[false, true])));
}

#[test]
fn test_comparison() {
    assert_eq!(Builtin::Eq.apply(&[Value::Int(2), Value::Float(2.0)]), Ok(Value::Bool(true)));
    assert_eq!(Builtin::Ne.apply(&[Value::Int(2), Value::string("2")]), Ok(Value::Bool(true)));
    assert_eq!(
        Builtin::Lt.apply(&[Value::string("abc"), Value::string("abd")]),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        Builtin::Ge.apply(&[Value::Float(f64::NAN), Value::Int(0)]),
        Ok(Value::Bool(false))
    );
    assert!(matches!(
        Builtin::Lt.apply(&[Value::Null, Value::Int(0)]),
        Err(ApplyError::Type { .. })
    ));
}

#[test]
fn test_integer_equality_is_exact() {
    // Both round to the same f64
    let big = Value::Int(9_007_199_254_740_993);
    let near = Value::Int(9_007_199_254_740_992);
    assert_eq!(Builtin::Eq.apply(&[big.clone(), near.clone()]), Ok(Value::Bool(false)));
    assert_eq!(Builtin::Ne.apply(&[big.clone(), near.clone()]), Ok(Value::Bool(true)));
    assert_eq!(Builtin::Gt.apply(&[big.clone(), near]), Ok(Value::Bool(true)));
    assert_eq!(Builtin::Eq.apply(&[big.clone(), big]), Ok(Value::Bool(true)));
    assert_eq!(
        Builtin::Eq.apply(&[Value::Int(i64::MAX), Value::Int(i64::MAX - 1)]),
        Ok(Value::Bool(false))
    );
}

#[test]
fn test_logical() {
    assert_eq!(
        Builtin::And.apply(&[bools(&[true, true]), bools(&[true, false])]),
        Ok(bools(&[true, false]))
    );
    assert_eq!(Builtin::Or.apply(&[Value::Bool(false), Value::Bool(true)]), Ok(Value::Bool(true)));
    assert!(Builtin::And.apply(&[Value::Int(1), Value::Bool(true)]).is_err());
}

#[test]
fn test_reductions() {
    assert_eq!(Builtin::Sum.apply(&[ints(&[1, 2, 3])]), Ok(Value::Int(6)));
    assert_eq!(Builtin::Sum.apply(&[]), Ok(Value::Int(0)));
    assert_eq!(
        Builtin::Sum.apply(&[ints(&[1]), Value::Float(0.5)]),
        Ok(Value::Float(1.5))
    );
    assert_eq!(Builtin::Mean.apply(&[ints(&[1, 2, 3, 4])]), Ok(Value::Float(2.5)));
    assert!(Builtin::Mean.apply(&[Value::list([])]).is_err());
    assert_eq!(Builtin::Len.apply(&[ints(&[1, 2])]), Ok(Value::Int(2)));
    assert_eq!(Builtin::Len.apply(&[Value::string("héllo")]), Ok(Value::Int(5)));
    assert_eq!(Builtin::Len.apply(&[Value::Null]), Ok(Value::Int(0)));
}

#[test]
fn test_paste_and_if_else() {
    assert_eq!(
        Builtin::Paste.apply(&[Value::string("n ="), Value::Int(3)]),
        Ok(Value::string("n = 3"))
    );
    assert_eq!(
        Builtin::IfElse.apply(&[bools(&[true, false]), ints(&[1, 2]), Value::Int(0)]),
        Ok(ints(&[1, 0]))
    );
    assert_eq!(
        Builtin::IfElse.apply(&[Value::Bool(false), Value::Int(1), Value::Int(2)]),
        Ok(Value::Int(2))
    );
}

#[test]
fn test_names_are_unique() {
    let mut names: Vec<_> = Builtin::ALL.iter().map(|b| b.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), Builtin::ALL.len());
}
