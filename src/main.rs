//! gosh - a line-oriented interactive shell
//!
//! The binary takes no arguments: it starts the prompt loop and exits via
//! the `exit` built-in, Ctrl-D, or Ctrl-C at an empty prompt.

use std::process::ExitCode;

fn main() -> ExitCode {
    match gosh::repl::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gosh: {}", err);
            ExitCode::FAILURE
        }
    }
}
