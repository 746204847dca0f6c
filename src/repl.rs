//! The interactive prompt loop
//!
//! Reads lines with rustyline, records them, and dispatches: pipelines to
//! the pipeline executor, `exit` to the loop break, built-ins in-process,
//! everything else through PATH resolution to an external child. Ctrl-C on
//! an empty line and Ctrl-D both leave the shell; Ctrl-C on a partial line
//! discards it.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::{
    Cmd, ConditionalEventHandler, Editor, Event, EventContext, EventHandler, KeyEvent,
    RepeatCount, Result as RlResult,
};

use crate::builtins;
use crate::completion::ShellHelper;
use crate::executor::{self, ExecError};
use crate::history::{self, HistoryStore};
use crate::lexer;
use crate::pipeline;
use crate::redirect;
use crate::resolver;

pub const PROMPT: &str = "$ ";

/// Records whether the line was empty when Ctrl-C arrived, so the loop can
/// tell "leave the shell" apart from "discard this line". rustyline itself
/// does not hand the partial line back with the interrupt.
struct InterruptHandler {
    empty_line: Arc<AtomicBool>,
}

impl ConditionalEventHandler for InterruptHandler {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext,
    ) -> Option<Cmd> {
        self.empty_line.store(ctx.line().is_empty(), Ordering::SeqCst);
        Some(Cmd::Interrupt)
    }
}

/// Run the shell until `exit`, Ctrl-D, or Ctrl-C at an empty prompt.
pub fn run() -> RlResult<()> {
    // Keep the shell alive when Ctrl-C is aimed at a foreground child; the
    // child still gets the signal and the prompt comes back after the wait.
    let _ = ctrlc::set_handler(|| {});

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ShellHelper::new(resolver::scan_candidates())));

    let interrupted_empty = Arc::new(AtomicBool::new(true));
    rl.bind_sequence(
        KeyEvent::ctrl('c'),
        EventHandler::Conditional(Box::new(InterruptHandler {
            empty_line: Arc::clone(&interrupted_empty),
        })),
    );

    let mut history = HistoryStore::new();
    if let Some(path) = history::default_path() {
        let replayed = history::replay_lines(&path);
        for line in &replayed {
            let _ = rl.add_history_entry(line.as_str());
        }
        history = HistoryStore::with_base(replayed.len() + 1);
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let words = lexer::split_line(&line);
                if words.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                history.record(&line);

                if words.iter().any(|w| w == "|") {
                    if let Err(err) = pipeline::run_pipeline(&words, &history) {
                        eprintln!("gosh: {}", err);
                    }
                } else if words[0] == "exit" {
                    break;
                } else if builtins::is_builtin(&words[0]) {
                    print!("{}", builtins::run(&words, &mut history));
                    let _ = io::stdout().flush();
                } else if let Some(path) = resolver::find_executable(&words[0]) {
                    run_external(&path, &words);
                } else {
                    println!("{}: command not found", words[0]);
                }
            }
            Err(ReadlineError::Interrupted) => {
                if interrupted_empty.load(Ordering::SeqCst) {
                    break;
                }
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("gosh: {}", err);
                break;
            }
        }
    }

    history.flush();
    Ok(())
}

/// One external command line: strip the redirection clause, diagnose a
/// missing target, and hand the rest to the executor. Spawn and wait
/// failures stay silent; a target that cannot be opened is reported and the
/// loop goes on.
fn run_external(path: &str, words: &[String]) {
    let (argv, plan) = redirect::split_redirect(words);
    if let Some(plan) = &plan {
        if plan.target.is_none() {
            println!("{}", redirect::MISSING_TARGET);
            return;
        }
    }
    match executor::run_command(path, &argv, plan.as_ref()) {
        Err(err @ ExecError::RedirectTarget { .. }) => eprintln!("gosh: {}", err),
        _ => {}
    }
}
