//! Command implementations. Each returns the text to print.

use crate::args::{Binding, Command, USAGE};
use crate::CliError;
use defer_eval::{EvalConfig, Frame, Interpreter, LazyDots, LazyValue, ScopeChain, Substitutions};
use std::fmt::Write as _;

/// Configuration from `DEFER_MAX_DEPTH` and `DEFER_NAME_WIDTH`.
pub fn config_from_env() -> Result<EvalConfig, CliError> {
    let mut config = EvalConfig::default();
    if let Some(depth) = env_usize("DEFER_MAX_DEPTH")? {
        config.max_depth = depth;
    }
    if let Some(width) = env_usize("DEFER_NAME_WIDTH")? {
        config.name_width = width;
    }
    Ok(config)
}

fn env_usize(var: &str) -> Result<Option<usize>, CliError> {
    match std::env::var(var) {
        Ok(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CliError::Usage(format!("{var} must be a non-negative integer, got `{text}`"))),
        Err(_) => Ok(None),
    }
}

pub fn execute(command: &Command, interp: &Interpreter) -> Result<String, CliError> {
    tracing::debug!(?command, "executing");
    match command {
        Command::Eval {
            expr,
            lets,
            overrides,
        } => eval(interp, expr, lets, overrides),
        Command::Interp {
            template,
            substitutions,
            evaluate,
        } => interpolate(interp, template, substitutions, *evaluate),
        Command::Call { func, args } => call(interp, func, args),
        Command::Names { expr } => names(interp, expr),
        Command::Help => Ok(USAGE.to_string()),
    }
}

/// Parse `text` into a lazy value in `scope`.
fn lazy_in(interp: &Interpreter, text: &str, scope: &ScopeChain) -> Result<LazyValue, CliError> {
    let tree = interp.parse(text).map_err(|error| CliError::Parse {
        source_text: text.to_string(),
        error,
    })?;
    Ok(LazyValue::new(tree, scope.clone()))
}

fn eval(interp: &Interpreter, expr: &str, lets: &[Binding], overrides: &[Binding]) -> Result<String, CliError> {
    // Each `--let` gets its own frame so later bindings see earlier ones
    let mut scope = interp.root_scope().clone();
    for binding in lets {
        let value = interp.evaluate(&lazy_in(interp, &binding.expr, &scope)?, None)?;
        scope = scope.child(Frame::new().with(interp.intern(&binding.name), value));
    }

    let mut with = Frame::new();
    for binding in overrides {
        let value = interp.evaluate(&lazy_in(interp, &binding.expr, interp.root_scope())?, None)?;
        with.define(interp.intern(&binding.name), value);
    }

    let lazy = lazy_in(interp, expr, &scope)?;
    let value = interp.evaluate(&lazy, (!with.is_empty()).then_some(&with))?;
    Ok(format!("{value}\n"))
}

fn interpolate(interp: &Interpreter, template: &str, bindings: &[Binding], evaluate: bool) -> Result<String, CliError> {
    let template = lazy_in(interp, template, interp.root_scope())?;
    let mut subs = Substitutions::new();
    for binding in bindings {
        subs = subs.lazy(
            interp.intern(&binding.name),
            lazy_in(interp, &binding.expr, interp.root_scope())?,
        );
    }
    let result = interp.interp(&template, &subs)?;
    let mut out = format!("{}\n", interp.deparse(&result));
    if evaluate {
        let value = interp.evaluate(&result, None)?;
        let _ = writeln!(out, "=> {value}");
    }
    Ok(out)
}

fn call(interp: &Interpreter, func: &str, args: &[String]) -> Result<String, CliError> {
    let mut dots = LazyDots::new();
    for arg in args {
        dots.push(None, lazy_in(interp, arg, interp.root_scope())?);
    }
    let call = interp.make_call(func, &dots)?;
    let mut out = format!("{}\n", interp.deparse(&call));
    for (name, lazy) in interp.auto_name(&dots).iter() {
        let name = name.map_or("", |n| interp.interner().lookup(n));
        let _ = writeln!(out, "  {name} = {}", interp.deparse(lazy));
    }
    Ok(out)
}

fn names(interp: &Interpreter, expr: &str) -> Result<String, CliError> {
    let lazy = lazy_in(interp, expr, interp.root_scope())?;
    let mut out = String::new();
    for name in lazy.all_names() {
        out.push_str(interp.interner().lookup(name));
        out.push('\n');
    }
    Ok(out)
}
