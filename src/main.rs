//! pdsgate CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`. Exits with the validation
//! outcome's code, or 2 when the command itself failed.

use pdsgate::cli;
use pdsgate::observability::{log_event, Event};

fn main() {
    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let message = e.to_string();
            log_event(
                Event::CommandFailed,
                &[("code", e.code()), ("message", message.as_str())],
            );
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}
