//! Single external command execution
//!
//! Runs one resolved program to completion with its redirection plan wired
//! into the child's file descriptors. The shell's stdin passes straight
//! through, and errors from the final wait are discarded; anything worth
//! seeing already landed on the child's own stderr.

use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;

use crate::redirect::{self, Redirect, Stream};

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("cannot open {path}: {source}")]
    RedirectTarget { path: String, source: io::Error },
    #[error("failed to spawn {program}: {source}")]
    Spawn { program: String, source: io::Error },
}

/// Run `path` with the stripped argv and an optional redirection plan,
/// waiting synchronously for it to finish. Stdout plans divert stdout and
/// leave stderr alone; stderr plans do the reverse.
pub fn run_command(path: &str, argv: &[String], plan: Option<&Redirect>) -> Result<(), ExecError> {
    let mut cmd = Command::new(path);
    cmd.args(&argv[1..]);
    if let Some(plan) = plan {
        if let Some(target) = plan.target.as_deref() {
            let file = redirect::open_target(target, plan.mode).map_err(|source| {
                ExecError::RedirectTarget { path: target.to_string(), source }
            })?;
            match plan.stream {
                Stream::Stdout => {
                    cmd.stdout(Stdio::from(file));
                }
                Stream::Stderr => {
                    cmd.stderr(Stdio::from(file));
                }
            }
        }
    }
    let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
        program: path.to_string(),
        source,
    })?;
    let _ = child.wait();
    Ok(())
}
