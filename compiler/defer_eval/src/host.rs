//! The seam between evaluation and function application.

use crate::errors::ApplyError;
use crate::value::Value;

/// Applies an evaluated callee to evaluated arguments.
///
/// The evaluator resolves names and walks the tree; what a call *does* is
/// entirely up to the host. Implement this to plug in a different value
/// model's function semantics.
pub trait Host: Send + Sync {
    fn apply(&self, callee: &Value, args: &[Value]) -> Result<Value, ApplyError>;
}

/// Host for the standard builtins and registered native functions.
#[derive(Copy, Clone, Debug, Default)]
pub struct StdHost;

impl Host for StdHost {
    fn apply(&self, callee: &Value, args: &[Value]) -> Result<Value, ApplyError> {
        match callee {
            Value::Builtin(builtin) => builtin.apply(args),
            Value::Native(native) => native.call(args),
            other => Err(ApplyError::NotCallable {
                type_name: other.type_name(),
            }),
        }
    }
}
