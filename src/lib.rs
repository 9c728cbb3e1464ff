//! A tiny line-oriented command interpreter.
//!
//! Each input line is split into words with shell-like quoting rules (see
//! [`tokenize`]), then either handled by one of the builtins (`echo`, `type`,
//! `pwd`, `cd`, `exit`, `history`) or resolved on `PATH` and launched as a child
//! process that is waited for before the next prompt.
//!
//! The main entry point is [`Interpreter`]. Pipelines, redirection, globbing and
//! variable expansion are not supported.

mod builtin;
mod command;
mod config;
mod env;
mod error;
mod external;
mod interpreter;
mod reader;
mod tokenizer;

pub use builtin::{Builtin, is_builtin};
pub use command::{Command, EXIT_CANNOT_EXECUTE, ExitCode, Flow};
pub use config::{Config, DEFAULT_PROMPT, MAX_LINE_LEN};
pub use env::Environment;
pub use error::ShellError;
pub use external::{ExternalCommand, find_in_path, resolve};
pub use interpreter::Interpreter;
pub use reader::LineReader;
pub use tokenizer::{MAX_ARGS, QuoteState, tokenize};
