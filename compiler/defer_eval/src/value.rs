//! Runtime values produced by evaluation.
//!
//! Values are cheap to clone: strings and lists share their storage through
//! `Arc`, so binding one value under several names never copies it.

use crate::builtins::Builtin;
use crate::errors::ApplyError;
use defer_ir::{Literal, StringInterner};
use std::fmt;
use std::sync::Arc;

type NativeBody = dyn Fn(&[Value]) -> Result<Value, ApplyError> + Send + Sync;

/// A host function registered on the interpreter.
#[derive(Clone)]
pub struct NativeFn {
    name: Arc<str>,
    arity: Option<usize>,
    body: Arc<NativeBody>,
}

impl NativeFn {
    /// Wrap `body`. `arity` of `None` accepts any number of arguments.
    pub fn new<F>(name: &str, arity: Option<usize>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ApplyError> + Send + Sync + 'static,
    {
        NativeFn {
            name: Arc::from(name),
            arity,
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, ApplyError> {
        if let Some(arity) = self.arity {
            if args.len() != arity {
                return Err(ApplyError::Arity {
                    name: self.name.to_string(),
                    expected: arity.to_string(),
                    got: args.len(),
                });
            }
        }
        (self.body)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    /// Ordered collection; element-wise operators recycle scalars over it.
    List(Arc<[Value]>),
    /// One of the standard operators or functions.
    Builtin(Builtin),
    /// A function supplied by the embedding program.
    Native(NativeFn),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Builtin(_) => "builtin",
            Value::Native(_) => "native function",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric payload widened to `f64`.
    #[expect(clippy::cast_precision_loss, reason = "int to float widening is the documented semantics")]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Value of a literal node.
    pub fn from_literal(literal: Literal, interner: &StringInterner) -> Self {
        match literal {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(b),
            Literal::Int(n) => Value::Int(n),
            Literal::Float(bits) => Value::Float(f64::from_bits(bits)),
            Literal::Str(name) => Value::string(interner.lookup(name)),
        }
    }

    /// Literal that evaluates back to this value, for scalars.
    pub fn to_literal(&self, interner: &StringInterner) -> Option<Literal> {
        Some(match self {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Int(n) => Literal::Int(*n),
            Value::Float(x) => Literal::float(*x),
            Value::Str(s) => Literal::Str(interner.intern(s)),
            Value::List(_) | Value::Builtin(_) | Value::Native(_) => return None,
        })
    }

    /// Text used by `paste`: strings without quotes, lists space-separated.
    pub fn display_plain(&self) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            Value::List(items) => items
                .iter()
                .map(Value::display_plain)
                .collect::<Vec<_>>()
                .join(" "),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{:?}", &**s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Builtin(b) => write!(f, "<builtin `{}`>", b.name()),
            Value::Native(n) => write!(f, "<native `{}`>", n.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Native(n) => n.fmt(f),
            Value::Builtin(b) => b.fmt(f),
            other => write!(f, "{other}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            // Natives are equal by identity
            (Value::Native(a), Value::Native(b)) => Arc::ptr_eq(&a.body, &b.body),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display() {
        let v = Value::list([Value::Int(1), Value::Float(2.0), Value::string("a\"b"), Value::Null]);
        assert_eq!(v.to_string(), r#"[1, 2.0, "a\"b", null]"#);
        assert_eq!(v.display_plain(), "1 2.0 a\"b null");
        assert_eq!(Value::Builtin(Builtin::Add).to_string(), "<builtin `+`>");
    }

    #[test]
    fn test_literal_conversion() {
        let interner = StringInterner::new();
        for v in [Value::Null, Value::Bool(true), Value::Int(-3), Value::Float(0.5), Value::string("hi")] {
            let lit = v.to_literal(&interner).unwrap();
            assert_eq!(Value::from_literal(lit, &interner), v);
        }
        assert_eq!(Value::list([Value::Int(1)]).to_literal(&interner), None);
    }

    #[test]
    fn test_native_identity_and_arity() {
        let f = NativeFn::new("twice", Some(1), |args| Ok(args[0].clone()));
        let g = NativeFn::new("twice", Some(1), |args| Ok(args[0].clone()));
        assert_eq!(Value::Native(f.clone()), Value::Native(f.clone()));
        assert_ne!(Value::Native(f.clone()), Value::Native(g));
        assert!(matches!(f.call(&[]), Err(ApplyError::Arity { got: 0, .. })));
    }
}
