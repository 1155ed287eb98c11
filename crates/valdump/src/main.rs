//! valdump CLI
//!
//! Renders the built-in demo graphs.

use valdump::cli::{self, CliError};

fn main() {
    valdump::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = cli::parse_args(&args)
        .and_then(|command| cli::run(&command, &mut std::io::stdout().lock()));
    if let Err(err) = result {
        report(&err);
        std::process::exit(1);
    }
}

fn report(err: &CliError) {
    eprintln!("error: {err}");
    if err.is_usage() {
        eprintln!();
        eprint!("{}", cli::usage());
    }
}
