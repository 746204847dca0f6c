//! Pipeline coordination
//!
//! A pipeline is a vector of stages connected stdout-to-stdin by OS pipes.
//! Built-in stages run as in-process tasks that produce their whole output
//! eagerly, write it, and close the writer; external stages stream through
//! child processes. Every stage is launched before any stage is awaited, so
//! a slow upstream never blocks the launch of its consumers. Pipe ends are
//! owned values: moving them into children and tasks is what closes the
//! parent's copies.

use std::fs::File;
use std::io::{self, Write};
use std::os::fd::{FromRawFd, OwnedFd};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

use nix::unistd::pipe;
use thiserror::Error;

use crate::builtins;
use crate::history::HistoryStore;
use crate::redirect::{self, Stream};
use crate::resolver;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to create pipe: {0}")]
    Pipe(#[from] io::Error),
}

/// One element of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Builtin(Vec<String>),
    External(Vec<String>),
}

/// Split a word vector on `|` words and classify each stage by its first
/// word.
pub fn split_stages(words: &[String]) -> Vec<Stage> {
    words
        .split(|word| word == "|")
        .map(|stage| {
            let stage = stage.to_vec();
            match stage.first() {
                Some(first) if builtins::is_builtin(first) => Stage::Builtin(stage),
                _ => Stage::External(stage),
            }
        })
        .collect()
}

/// Run a word vector containing at least one `|`: launch every stage, then
/// wait for all children and join all tasks. The pipeline's exit status is
/// not surfaced.
///
/// Built-in stages receive their own copy of the history store; the REPL's
/// store is only ever mutated on the REPL thread.
pub fn run_pipeline(words: &[String], history: &HistoryStore) -> Result<(), PipelineError> {
    let stages = split_stages(words);
    let count = stages.len();
    let mut children: Vec<Child> = Vec::new();
    let mut tasks: Vec<JoinHandle<()>> = Vec::new();
    let mut prev_reader: Option<OwnedFd> = None;

    for (i, stage) in stages.into_iter().enumerate() {
        let last = i == count - 1;
        let (reader, writer) = if last {
            (None, None)
        } else {
            let (r, w) = pipe().map_err(io::Error::from)?;
            let r = unsafe { OwnedFd::from_raw_fd(r) };
            let w = unsafe { OwnedFd::from_raw_fd(w) };
            (Some(r), Some(w))
        };
        let input = prev_reader.take();
        match stage {
            Stage::Builtin(argv) => {
                // Built-ins ignore their input; dropping the read end here
                // turns a blocked upstream writer into a broken pipe.
                drop(input);
                let mut session = history.clone();
                tasks.push(thread::spawn(move || {
                    let output = builtins::run(&argv, &mut session);
                    match writer {
                        Some(fd) => {
                            // A broken pipe just means the downstream reader
                            // quit early.
                            let _ = File::from(fd).write_all(output.as_bytes());
                        }
                        None => {
                            print!("{}", output);
                            let _ = io::stdout().flush();
                        }
                    }
                }));
            }
            Stage::External(argv) => {
                launch_external(argv, input, writer, &mut children);
            }
        }
        prev_reader = reader;
    }

    for mut child in children {
        let _ = child.wait();
    }
    for task in tasks {
        let _ = task.join();
    }
    Ok(())
}

/// Launch one external stage. A stage that cannot be resolved or spawned
/// contributes only EOF downstream; its pipe ends close when the locals
/// drop.
fn launch_external(
    words: Vec<String>,
    input: Option<OwnedFd>,
    writer: Option<OwnedFd>,
    children: &mut Vec<Child>,
) {
    let (argv, plan) = redirect::split_redirect(&words);
    if argv.is_empty() {
        return;
    }
    if let Some(plan) = &plan {
        if plan.target.is_none() {
            println!("{}", redirect::MISSING_TARGET);
            return;
        }
    }
    let path = match resolver::find_executable(&argv[0]) {
        Some(path) => path,
        None => {
            println!("{}: command not found", argv[0]);
            return;
        }
    };

    let mut cmd = Command::new(path);
    cmd.args(&argv[1..]);
    if let Some(fd) = input {
        cmd.stdin(Stdio::from(fd));
    }
    let mut pipe_out = writer;
    if let Some(plan) = &plan {
        if let Some(target) = plan.target.as_deref() {
            match redirect::open_target(target, plan.mode) {
                Ok(file) => match plan.stream {
                    Stream::Stdout => {
                        cmd.stdout(Stdio::from(file));
                        // The stage's pipe writer goes unused; dropping it
                        // hands the downstream reader EOF.
                        pipe_out = None;
                    }
                    Stream::Stderr => {
                        cmd.stderr(Stdio::from(file));
                    }
                },
                Err(err) => {
                    eprintln!("gosh: {}: {}", target, err);
                    return;
                }
            }
        }
    }
    if let Some(fd) = pipe_out {
        cmd.stdout(Stdio::from(fd));
    }

    match cmd.spawn() {
        Ok(child) => children.push(child),
        // Spawn failures stay silent; the child's stderr said its piece.
        Err(_) => {}
    }
}
