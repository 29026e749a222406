//! Defer CLI

use deferc::{config_from_env, execute, init_tracing, parse_args};
use defer_eval::Interpreter;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = parse_args(&args).and_then(|command| {
        let interp = Interpreter::builder().config(config_from_env()?).build();
        execute(&command, &interp)
    });

    match result {
        Ok(output) => print!("{output}"),
        Err(err) => {
            eprintln!("{}", err.render());
            std::process::exit(1);
        }
    }
}
