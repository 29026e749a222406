//! Inputs accepted wherever a lazy value is expected.

use crate::lazy::LazyValue;
use crate::scope::ScopeChain;
use crate::value::Value;
use defer_ir::{BuildError, ExprBuilder, ExprId, ExprTree, Span, StringInterner};
use defer_stack::ensure_sufficient_stack;

/// Anything `Interpreter::as_lazy` can normalize.
#[derive(Clone, Debug)]
pub enum LazyInput {
    /// Returned unchanged.
    Lazy(LazyValue),
    /// Bare tree, paired with the root scope.
    Tree(ExprTree),
    /// Tree with an explicit scope.
    TreeIn(ExprTree, ScopeChain),
    /// Source text, parsed and paired with the root scope.
    Text(String),
    /// A plain value, wrapped as a literal in the root scope.
    Value(Value),
}

impl From<LazyValue> for LazyInput {
    fn from(lazy: LazyValue) -> Self {
        LazyInput::Lazy(lazy)
    }
}

impl From<&LazyValue> for LazyInput {
    fn from(lazy: &LazyValue) -> Self {
        LazyInput::Lazy(lazy.clone())
    }
}

impl From<ExprTree> for LazyInput {
    fn from(tree: ExprTree) -> Self {
        LazyInput::Tree(tree)
    }
}

impl From<(ExprTree, ScopeChain)> for LazyInput {
    fn from((tree, scope): (ExprTree, ScopeChain)) -> Self {
        LazyInput::TreeIn(tree, scope)
    }
}

impl From<&str> for LazyInput {
    fn from(text: &str) -> Self {
        LazyInput::Text(text.to_string())
    }
}

impl From<String> for LazyInput {
    fn from(text: String) -> Self {
        LazyInput::Text(text)
    }
}

impl From<Value> for LazyInput {
    fn from(value: Value) -> Self {
        LazyInput::Value(value)
    }
}

/// Build the expression form of `value` into `b`: scalars become literals,
/// lists become `list(...)` calls. `Ok(None)` for callables, which have no
/// expression form.
pub(crate) fn value_node(
    b: &mut ExprBuilder,
    value: &Value,
    interner: &StringInterner,
) -> Result<Option<ExprId>, BuildError> {
    if let Some(literal) = value.to_literal(interner) {
        return Ok(Some(b.literal(literal, Span::DUMMY)));
    }
    let Value::List(items) = value else {
        return Ok(None);
    };
    let mut args = Vec::with_capacity(items.len());
    for item in items.iter() {
        match ensure_sufficient_stack(|| value_node(b, item, interner))? {
            Some(arg) => args.push(arg),
            None => return Ok(None),
        }
    }
    let list = b.symbol(interner.intern("list"), Span::DUMMY);
    b.call(list, &args, Span::DUMMY).map(Some)
}

/// Expression tree for `value`, if it has one.
pub(crate) fn value_tree(value: &Value, interner: &StringInterner) -> Result<Option<ExprTree>, BuildError> {
    let mut b = ExprBuilder::new();
    Ok(value_node(&mut b, value, interner)?.map(|root| b.finish(root)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use defer_ir::{deparse, Literal};

    #[test]
    fn test_value_tree() {
        let interner = StringInterner::new();
        let tree = value_tree(&Value::Int(3), &interner).unwrap().unwrap();
        assert_eq!(tree.as_literal(), Some(Literal::Int(3)));

        let nested = Value::list([Value::Int(1), Value::list([Value::string("a")]), Value::Null]);
        let tree = value_tree(&nested, &interner).unwrap().unwrap();
        assert_eq!(deparse(&tree, &interner), r#"list(1, list("a"), null)"#);
    }

    #[test]
    fn test_callables_have_no_tree() {
        let interner = StringInterner::new();
        let add = Value::Builtin(crate::Builtin::Add);
        assert_eq!(value_tree(&add, &interner), Ok(None));
        assert_eq!(value_tree(&Value::list([Value::Int(1), add]), &interner), Ok(None));
    }

    #[test]
    fn test_oversized_list_has_no_call_form() {
        let interner = StringInterner::new();
        let long = Value::list(vec![Value::Int(0); defer_ir::MAX_CALL_ARGS + 1]);
        assert_eq!(
            value_tree(&long, &interner),
            Err(BuildError::TooManyArguments {
                count: defer_ir::MAX_CALL_ARGS + 1
            })
        );
    }
}
