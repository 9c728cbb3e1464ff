use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Mutable, user-level view of the process environment used by the interpreter.
///
/// The environment contains:
/// - `vars`: a map of environment variables that will be visible to executed commands.
/// - `should_exit`: a flag that the read loop checks to know when to terminate.
///
/// The working directory is not stored here. It is process-wide state,
/// read through [`Environment::current_dir`], changed only through
/// [`Environment::change_dir`], and inherited by every spawned child.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// When set to true, indicates that the interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process variables into a new `Environment` instance.
    pub fn new() -> Self {
        Self {
            vars: stdenv::vars().collect(),
            should_exit: false,
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// The user's home directory, taken from `HOME`.
    pub fn home(&self) -> Option<PathBuf> {
        self.get_var("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
    }

    /// Current working directory of the process.
    pub fn current_dir(&self) -> Result<PathBuf> {
        stdenv::current_dir().context("current directory is not accessible")
    }

    /// Change the working directory of the whole process.
    ///
    /// Relative paths are resolved against the current working directory.
    pub fn change_dir(&mut self, target: &Path) -> Result<()> {
        stdenv::set_current_dir(target)
            .with_context(|| format!("can't chdir to {}", target.display()))?;
        tracing::debug!(dir = %target.display(), "changed working directory");
        Ok(())
    }
}

/// Serialises tests that read or change the process working directory.
#[cfg(test)]
pub(crate) fn lock_current_dir() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
