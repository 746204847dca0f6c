//! Redirection planning
//!
//! Recognizes the six whole-word redirection operators and splits a word
//! vector into the command argv and a [`Redirect`] plan. Only the first
//! operator counts; it and every word after it are removed from the argv.

use std::fs::{File, OpenOptions};
use std::io;

/// Diagnostic printed when an operator has no target word after it.
pub const MISSING_TARGET: &str = "No output file specified!!";

/// Which stream the plan applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// How the target file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Truncate,
    Append,
}

/// A parsed redirection clause. `target` is `None` when the operator was the
/// last word on the line; callers diagnose that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub stream: Stream,
    pub mode: RedirectMode,
    pub target: Option<String>,
}

fn classify(word: &str) -> Option<(Stream, RedirectMode)> {
    match word {
        ">" | "1>" => Some((Stream::Stdout, RedirectMode::Truncate)),
        "2>" => Some((Stream::Stderr, RedirectMode::Truncate)),
        ">>" | "1>>" => Some((Stream::Stdout, RedirectMode::Append)),
        "2>>" => Some((Stream::Stderr, RedirectMode::Append)),
        _ => None,
    }
}

/// Split a word vector into (command argv, redirection plan). The operator
/// word and everything after it are stripped from the argv.
pub fn split_redirect(words: &[String]) -> (Vec<String>, Option<Redirect>) {
    for (i, word) in words.iter().enumerate() {
        if let Some((stream, mode)) = classify(word) {
            let argv = words[..i].to_vec();
            let target = words.get(i + 1).cloned();
            return (argv, Some(Redirect { stream, mode, target }));
        }
    }
    (words.to_vec(), None)
}

/// Open a redirection target: create/truncate or open-for-append.
pub fn open_target(path: &str, mode: RedirectMode) -> io::Result<File> {
    match mode {
        RedirectMode::Truncate => File::create(path),
        RedirectMode::Append => OpenOptions::new().append(true).create(true).open(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &[&str]) -> Vec<String> {
        input.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn no_operator_means_no_plan() {
        let (argv, plan) = split_redirect(&words(&["ls", "-la"]));
        assert_eq!(argv, words(&["ls", "-la"]));
        assert!(plan.is_none());
    }

    #[test]
    fn recognizes_all_six_operators() {
        let table = [
            (">", Stream::Stdout, RedirectMode::Truncate),
            ("1>", Stream::Stdout, RedirectMode::Truncate),
            ("2>", Stream::Stderr, RedirectMode::Truncate),
            (">>", Stream::Stdout, RedirectMode::Append),
            ("1>>", Stream::Stdout, RedirectMode::Append),
            ("2>>", Stream::Stderr, RedirectMode::Append),
        ];
        for (op, stream, mode) in table {
            let (argv, plan) = split_redirect(&words(&["cmd", op, "file"]));
            let plan = plan.unwrap();
            assert_eq!(argv, words(&["cmd"]), "operator {}", op);
            assert_eq!(plan.stream, stream, "operator {}", op);
            assert_eq!(plan.mode, mode, "operator {}", op);
            assert_eq!(plan.target.as_deref(), Some("file"), "operator {}", op);
        }
    }

    #[test]
    fn first_operator_wins() {
        let (argv, plan) = split_redirect(&words(&["cmd", "2>", "a", ">", "b"]));
        let plan = plan.unwrap();
        assert_eq!(argv, words(&["cmd"]));
        assert_eq!(plan.stream, Stream::Stderr);
        assert_eq!(plan.target.as_deref(), Some("a"));
    }

    #[test]
    fn operator_and_trailing_words_are_stripped() {
        let (argv, plan) = split_redirect(&words(&["echo", "a", ">", "f", "b", "c"]));
        assert_eq!(argv, words(&["echo", "a"]));
        assert_eq!(plan.unwrap().target.as_deref(), Some("f"));
    }

    #[test]
    fn missing_target_is_ill_formed() {
        let (argv, plan) = split_redirect(&words(&["echo", "a", ">>"]));
        assert_eq!(argv, words(&["echo", "a"]));
        assert!(plan.unwrap().target.is_none());
    }

    #[test]
    fn substrings_are_not_operators() {
        let (argv, plan) = split_redirect(&words(&["echo", "a>b", "2>>c"]));
        assert_eq!(argv, words(&["echo", "a>b", "2>>c"]));
        assert!(plan.is_none());
    }
}
