//! Shell built-ins
//!
//! Every built-in computes a complete output string; the caller decides
//! whether that string goes to the terminal or down a pipe. A redirection
//! plan on a built-in line is applied to the string after the fact: stdout
//! variants divert it into the target file, stderr variants touch the file
//! and leave the string on stdout, since built-ins write nothing to stderr
//! themselves.

use std::env;
use std::fs;
use std::io::Write;

use crate::history::{home_dir, HistoryStore};
use crate::redirect::{self, Redirect, Stream};
use crate::resolver;

/// The commands implemented inside the shell process.
pub const BUILTINS: &[&str] = &["echo", "exit", "type", "pwd", "cd", "history"];

pub fn is_builtin(word: &str) -> bool {
    BUILTINS.contains(&word)
}

/// Run a built-in command line and return what should reach its stdout.
pub fn run(words: &[String], history: &mut HistoryStore) -> String {
    let (argv, plan) = redirect::split_redirect(words);
    if let Some(plan) = &plan {
        if plan.target.is_none() {
            return format!("{}\n", redirect::MISSING_TARGET);
        }
    }
    let output = match argv[0].as_str() {
        "echo" => echo(&argv),
        "type" => type_of(&argv),
        "pwd" => pwd(),
        "cd" => cd(&argv),
        "history" => history_cmd(&argv, history),
        // exit terminates the REPL loop; as a pipeline stage it emits nothing.
        _ => String::new(),
    };
    match plan {
        Some(plan) => apply_redirect(output, &plan),
        None => output,
    }
}

fn echo(argv: &[String]) -> String {
    if argv.len() == 1 {
        "\n".to_string()
    } else {
        format!("{}\n", argv[1..].join(" "))
    }
}

fn type_of(argv: &[String]) -> String {
    let mut out = String::new();
    for name in &argv[1..] {
        if is_builtin(name) {
            out.push_str(&format!("{} is a shell builtin\n", name));
        } else if let Some(path) = resolver::find_executable(name) {
            out.push_str(&format!("{} is {}\n", name, path));
        } else {
            out.push_str(&format!("{}: not found\n", name));
        }
    }
    out
}

fn pwd() -> String {
    match env::current_dir() {
        Ok(dir) => format!("{}\n", dir.display()),
        Err(err) => {
            eprintln!("gosh: pwd: {}", err);
            String::new()
        }
    }
}

fn cd(argv: &[String]) -> String {
    if argv.len() == 1 || argv[1] == "~" {
        match home_dir() {
            Some(home) => {
                if let Err(err) = env::set_current_dir(&home) {
                    eprintln!("gosh: cd: {}: {}", home.display(), err);
                }
            }
            None => eprintln!("gosh: cd: HOME is not set"),
        }
        return String::new();
    }
    match fs::metadata(&argv[1]) {
        Ok(metadata) if metadata.is_dir() => {
            if let Err(err) = env::set_current_dir(&argv[1]) {
                eprintln!("gosh: cd: {}: {}", argv[1], err);
            }
            String::new()
        }
        _ => format!("cd: {}: No such file or directory\n", argv[1]),
    }
}

fn history_cmd(argv: &[String], history: &mut HistoryStore) -> String {
    if argv.len() >= 3 {
        match argv[1].as_str() {
            "-r" => {
                history.read_from(&argv[2]);
                return String::new();
            }
            "-w" => {
                history.write_to(&argv[2]);
                return String::new();
            }
            "-a" => {
                history.append_to(&argv[2]);
                return String::new();
            }
            _ => {}
        }
    }
    let limit = argv
        .get(1)
        .and_then(|arg| arg.parse::<usize>().ok())
        .filter(|n| *n > 0);
    history.render(limit)
}

fn apply_redirect(output: String, plan: &Redirect) -> String {
    let target = match plan.target.as_deref() {
        Some(target) => target,
        None => return output,
    };
    match plan.stream {
        Stream::Stdout => {
            match redirect::open_target(target, plan.mode) {
                Ok(mut file) => {
                    if let Err(err) = file.write_all(output.as_bytes()) {
                        eprintln!("gosh: {}: {}", target, err);
                    }
                }
                Err(err) => eprintln!("gosh: {}: {}", target, err),
            }
            String::new()
        }
        Stream::Stderr => {
            // Nothing to divert; the target is still created or appended-to
            // and the output stays on stdout.
            if let Err(err) = redirect::open_target(target, plan.mode) {
                eprintln!("gosh: {}: {}", target, err);
            }
            output
        }
    }
}
