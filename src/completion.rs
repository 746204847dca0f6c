//! Tab completion for the line editor
//!
//! The candidate set is fixed at startup (built-ins plus everything
//! executable on `PATH`); binaries installed mid-session are invisible until
//! the next shell. The completion policy on Tab:
//!
//! - no match: ring the terminal bell
//! - one match: complete it, with a trailing space
//! - several matches sharing a longer common prefix: extend to that prefix
//! - several matches with nothing more in common: bell, and a second Tab
//!   within five seconds lists them all on one line and redraws the prompt

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;

use crate::repl::PROMPT;

/// Window in which a second Tab press reveals all candidates.
const REVEAL_WINDOW: Duration = Duration::from_secs(5);

pub struct ShellHelper {
    candidates: Vec<String>,
    /// Time of the unanswered ambiguity bell, if any. Lives here rather
    /// than in any global so each editor session latches independently.
    latch: Mutex<Option<Instant>>,
}

impl ShellHelper {
    pub fn new(candidates: Vec<String>) -> Self {
        ShellHelper {
            candidates,
            latch: Mutex::new(None),
        }
    }

    fn matches(&self, prefix: &str) -> Vec<&str> {
        self.candidates
            .iter()
            .filter(|c| c.starts_with(prefix))
            .map(|c| c.as_str())
            .collect()
    }
}

/// Longest common prefix of a non-empty match list, on char boundaries.
fn common_prefix<'a>(matches: &[&'a str]) -> &'a str {
    let first = matches[0];
    let mut len = first.len();
    for other in &matches[1..] {
        len = len.min(common_len(first, other));
    }
    &first[..len]
}

fn common_len(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}

fn ring_bell() {
    print!("\x07");
    let _ = io::stdout().flush();
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let prefix = &line[start..pos];
        let matches = self.matches(prefix);
        match matches.len() {
            0 => {
                ring_bell();
                Ok((start, Vec::new()))
            }
            1 => {
                let pair = Pair {
                    display: matches[0].to_string(),
                    replacement: format!("{} ", matches[0]),
                };
                Ok((start, vec![pair]))
            }
            _ => {
                let lcp = common_prefix(&matches);
                if lcp.len() > prefix.len() {
                    let pair = Pair {
                        display: lcp.to_string(),
                        replacement: lcp.to_string(),
                    };
                    return Ok((start, vec![pair]));
                }
                let mut latch = self.latch.lock().unwrap();
                let now = Instant::now();
                let reveal = matches!(*latch, Some(first) if now.duration_since(first) <= REVEAL_WINDOW);
                if reveal {
                    *latch = None;
                    print!("\n{}\n{}{}", matches.join(" "), PROMPT, line);
                    let _ = io::stdout().flush();
                } else {
                    *latch = Some(now);
                    ring_bell();
                }
                Ok((start, Vec::new()))
            }
        }
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}
