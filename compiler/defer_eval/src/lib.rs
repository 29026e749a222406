//! Defer Eval - lazy values and the operations on them.
//!
//! A `LazyValue` pairs an unevaluated expression tree with the scope its
//! free names resolve in. The `Interpreter` provides:
//! - `capture`: recover the expression a caller wrote for a binding,
//!   following forwarded bindings back to their origin
//! - `as_lazy`: normalize trees, text and plain values into lazy values
//! - `evaluate`: evaluate in the captured scope, with optional overrides
//!   that take priority over the scope
//! - `interp` / `make_call`: build new expressions by substitution, each
//!   spliced piece keeping its own scope
//!
//! Function application is delegated to a `Host`; `StdHost` implements the
//! element-wise standard builtins.

mod builtins;
mod coerce;
mod config;
mod dots;
mod errors;
mod host;
mod interpreter;
mod lazy;
mod promise;
mod scope;
mod value;

pub use builtins::Builtin;
pub use coerce::LazyInput;
pub use config::{EvalConfig, DEFAULT_MAX_DEPTH, DEFAULT_NAME_WIDTH};
pub use dots::LazyDots;
pub use errors::{ApplyError, CoercionError, EvalError, EvalResult, InterpError};
pub use host::{Host, StdHost};
pub use interpreter::{Interpreter, InterpreterBuilder, Substitution, Substitutions};
pub use lazy::{Embedded, LazyValue};
pub use promise::{CallFrame, Promise};
pub use scope::{Frame, ScopeChain};
pub use value::{NativeFn, Value};
