//! User-facing failures of a single command.

use thiserror::Error;

/// Failures that are reported to the user and never end the session.
///
/// The `Display` text of each variant is exactly the message printed.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Neither a builtin nor an executable on `PATH`
    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// `type` could not resolve a name
    #[error("{0}: not found")]
    NotFound(String),

    /// `cd` target could not be entered
    #[error("cd: {0}: No such file or directory")]
    NoSuchDirectory(String),

    /// The resolved program could not be started
    #[error("{name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
