//! Command-line parsing.

use crate::CliError;

pub const USAGE: &str = "\
Usage: defer <command> [options]

Commands:
  eval <expr> [--let NAME=EXPR]... [--with NAME=EXPR]...
      Evaluate EXPR. --let binds NAME in the scope EXPR is written in
      (later bindings may use earlier ones); --with supplies an override
      that takes priority over that scope.
  interp <template> [NAME=EXPR]... [--eval]
      Substitute each NAME in TEMPLATE with EXPR and print the result.
  call <func> [EXPR]...
      Build the call FUNC(EXPR, ...) and print it with its argument names.
  names <expr>
      List the names EXPR reads, in first-use order.
  help
      Show this message.

Environment:
  DEFER_MAX_DEPTH   evaluation nesting limit
  DEFER_NAME_WIDTH  width of derived argument names
  RUST_LOG          enable tracing (DEFER_LOG_TREE=1 for span trees)
";

/// `NAME=EXPR`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub expr: String,
}

impl Binding {
    fn parse(arg: &str) -> Result<Self, CliError> {
        match arg.split_once('=') {
            Some((name, expr)) if !name.trim().is_empty() && !expr.trim().is_empty() => Ok(Binding {
                name: name.trim().to_string(),
                expr: expr.to_string(),
            }),
            _ => Err(CliError::Usage(format!("expected NAME=EXPR, got `{arg}`"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Eval {
        expr: String,
        lets: Vec<Binding>,
        overrides: Vec<Binding>,
    },
    Interp {
        template: String,
        substitutions: Vec<Binding>,
        evaluate: bool,
    },
    Call {
        func: String,
        args: Vec<String>,
    },
    Names {
        expr: String,
    },
    Help,
}

/// Parse argv without the program name.
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };
    match command.as_str() {
        "eval" => parse_eval(rest),
        "interp" => {
            let (template, rest) = positional(rest, "interp <template>")?;
            let mut substitutions = Vec::new();
            let mut evaluate = false;
            for arg in rest {
                if arg == "--eval" {
                    evaluate = true;
                } else {
                    substitutions.push(Binding::parse(arg)?);
                }
            }
            Ok(Command::Interp {
                template,
                substitutions,
                evaluate,
            })
        }
        "call" => {
            let (func, rest) = positional(rest, "call <func>")?;
            Ok(Command::Call {
                func,
                args: rest.to_vec(),
            })
        }
        "names" => {
            let (expr, rest) = positional(rest, "names <expr>")?;
            if let Some(extra) = rest.first() {
                return Err(CliError::Usage(format!("unexpected argument `{extra}`")));
            }
            Ok(Command::Names { expr })
        }
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(CliError::Usage(format!("unknown command `{other}`"))),
    }
}

fn positional<'a>(args: &'a [String], what: &str) -> Result<(String, &'a [String]), CliError> {
    match args.split_first() {
        Some((first, rest)) if !first.starts_with("--") => Ok((first.clone(), rest)),
        _ => Err(CliError::Usage(format!("missing argument: defer {what}"))),
    }
}

fn parse_eval(args: &[String]) -> Result<Command, CliError> {
    let mut expr = None;
    let mut lets = Vec::new();
    let mut overrides = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--let" | "--with" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::Usage(format!("{arg} needs NAME=EXPR")))?;
                let binding = Binding::parse(value)?;
                if arg == "--let" {
                    lets.push(binding);
                } else {
                    overrides.push(binding);
                }
            }
            flag if flag.starts_with("--") => {
                return Err(CliError::Usage(format!("unknown option `{flag}`")));
            }
            _ if expr.is_none() => expr = Some(arg.clone()),
            _ => return Err(CliError::Usage(format!("unexpected argument `{arg}`"))),
        }
    }
    let expr = expr.ok_or_else(|| CliError::Usage("missing argument: defer eval <expr>".to_string()))?;
    Ok(Command::Eval {
        expr,
        lets,
        overrides,
    })
}
