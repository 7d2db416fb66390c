//! jcat CLI.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use jcat::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    jcat::tracing_setup::init_tracing();

    let stdout = std::io::stdout();
    let is_tty = stdout.is_terminal();
    let mut out = stdout.lock();

    match run(&cli, &mut out, is_tty) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if let Some(location) = err.location() {
                eprintln!("  --> {location}");
            }
            ExitCode::FAILURE
        }
    }
}
