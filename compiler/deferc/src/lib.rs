//! Defer CLI - evaluate, interpolate and inspect lazy expressions from the
//! command line.
//!
//! The binary is a thin wrapper: `parse_args` turns argv into a `Command`,
//! `execute` runs it against an `Interpreter` and returns the text to print.

mod args;
mod commands;
mod report;
mod tracing_setup;

pub use args::{parse_args, Binding, Command, USAGE};
pub use commands::{config_from_env, execute};
pub use report::render_parse_error;
pub use tracing_setup::init_tracing;

use defer_eval::{CoercionError, EvalError, InterpError};
use defer_parse::ParseError;

/// Any failure the CLI reports.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{error}")]
    Parse { source_text: String, error: ParseError },
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Interp(#[from] InterpError),
}

impl CliError {
    /// Text for stderr. Parse failures get a source report.
    pub fn render(&self) -> String {
        match self {
            CliError::Parse { source_text, error }
            | CliError::Coercion(CoercionError::Parse { source_text, error })
            | CliError::Interp(InterpError::Template(CoercionError::Parse { source_text, error })) => {
                render_parse_error(source_text, error)
            }
            CliError::Usage(message) => format!("error: {message}\n\n{USAGE}"),
            other => format!("error: {other}"),
        }
    }
}
