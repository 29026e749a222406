//! Driver commands end to end, without spawning the binary.

use defer_eval::{EvalError, Interpreter};
use deferc::{execute, parse_args, CliError};
use pretty_assertions::assert_eq;

fn run(args: &[&str]) -> Result<String, CliError> {
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    let command = parse_args(&args)?;
    execute(&command, &Interpreter::new())
}

#[test]
fn eval_prints_value() {
    assert_eq!(run(&["eval", "1 + 2 * 3"]).unwrap(), "7\n");
    assert_eq!(run(&["eval", "list(1, 2) > 1"]).unwrap(), "[false, true]\n");
}

#[test]
fn eval_let_chain_and_override() {
    let out = run(&["eval", "y > 30", "--let", "x=31", "--let", "y=x", "--with", "y=5"]).unwrap();
    assert_eq!(out, "false\n");
    let out = run(&["eval", "y > 30", "--let", "x=31", "--let", "y=x"]).unwrap();
    assert_eq!(out, "true\n");
}

#[test]
fn eval_unbound_name_is_reported() {
    let err = run(&["eval", "mpg > 31"]).unwrap_err();
    assert!(matches!(&err, CliError::Eval(EvalError::UnboundName { name }) if name == "mpg"));
    assert_eq!(err.render(), "error: object `mpg` not found");
}

#[test]
fn interp_substitutes_and_evaluates() {
    let out = run(&["interp", "f(x, y)", "f=sum", "x=1", "y=list(2, 3)", "--eval"]).unwrap();
    assert_eq!(out, "sum(1, list(2, 3))\n=> 6\n");
}

#[test]
fn call_prints_derived_names() {
    let out = run(&["call", "paste", "\"a\"", "1 + 1"]).unwrap();
    assert_eq!(out, "paste(\"a\", 1 + 1)\n  \"a\" = \"a\"\n  1 + 1 = 1 + 1\n");
}

#[test]
fn names_in_first_use_order() {
    assert_eq!(run(&["names", "mean(x) + y * x"]).unwrap(), "x\ny\n");
}

#[test]
fn parse_error_renders_report() {
    let err = run(&["eval", "x >"]).unwrap_err();
    assert!(matches!(err, CliError::Parse { .. }));
    let report = err.render();
    assert!(report.contains("cannot parse expression"), "{report}");
    assert!(report.contains("expected expression, found end of input"), "{report}");
}

#[test]
fn help_prints_usage() {
    assert!(run(&["help"]).unwrap().starts_with("Usage: defer"));
}
