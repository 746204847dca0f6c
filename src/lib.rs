//! gosh - a line-oriented interactive command shell
//!
//! # Overview
//!
//! gosh reads a command line from the terminal, splits it into words with
//! single/double-quote semantics, and dispatches it: built-ins run
//! in-process, everything else is resolved across `PATH` and spawned.
//! Redirection (`>`, `1>`, `2>`, `>>`, `1>>`, `2>>`) and `|` pipelines are
//! wired with OS pipes; a persistent history file and tab completion round
//! out the prompt.
//!
//! # Example
//!
//! ```rust
//! use gosh::lexer::split_line;
//!
//! // Quotes group blanks and adjacent segments concatenate.
//! assert_eq!(split_line("echo \"foo bar\" baz"), vec!["echo", "foo bar", "baz"]);
//! assert_eq!(split_line("echo \"a\"b'c'"), vec!["echo", "abc"]);
//! ```

pub mod builtins;
pub mod completion;
pub mod executor;
pub mod history;
pub mod lexer;
pub mod pipeline;
pub mod redirect;
pub mod repl;
pub mod resolver;

// Re-export commonly used items
pub use builtins::is_builtin;
pub use completion::ShellHelper;
pub use executor::{run_command, ExecError};
pub use history::HistoryStore;
pub use lexer::split_line;
pub use pipeline::{run_pipeline, split_stages, PipelineError, Stage};
pub use redirect::{split_redirect, Redirect, RedirectMode, Stream};
pub use resolver::{find_executable, scan_candidates};
