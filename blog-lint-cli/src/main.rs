// These Clippy lints are disabled because this is a CLI binary, not a library:
// - print_stderr: the error line is the user-facing output on failure.
// - exit: the exit status is how CI reads the lint outcome.
#![allow(clippy::print_stderr, clippy::exit)]

use std::io::Write;

use blog_lint_cli::{cli, logging};
use clap::Parser;

fn main() {
    let args = cli::Args::parse();
    logging::init(args.verbose);

    let mut stdout = std::io::stdout().lock();
    let result = cli::run(&args, &mut stdout).and_then(|outcome| {
        stdout.flush()?;
        Ok(outcome)
    });
    match result {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(cli::USAGE_EXIT_CODE);
        }
    }
}
