//! Interpreter configuration.

/// Default nesting limit for evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

/// Default width for names derived from expression text.
pub const DEFAULT_NAME_WIDTH: usize = 40;

/// Tunables fixed when an interpreter is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Deepest tree nesting (embedded lazy values included) evaluation will
    /// descend before failing with `EvalError::DepthExceeded`.
    pub max_depth: usize,
    /// Character limit for `LazyDots::auto_named`.
    pub name_width: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            name_width: DEFAULT_NAME_WIDTH,
        }
    }
}
