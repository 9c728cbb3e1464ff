use crate::command::ExitCode;
use crate::env::Environment;
use crate::error::ShellError;
use nix::unistd::{AccessFlags, access};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Command that is not a builtin: a resolved executable plus the argument vector
/// exactly as the user typed it.
#[derive(Debug)]
pub struct ExternalCommand {
    program: PathBuf,
    argv: Vec<String>,
}

impl ExternalCommand {
    /// Resolve `argv[0]` and build a command ready to run.
    ///
    /// Returns `None` when the vector is empty or the name doesn't resolve;
    /// nothing is spawned in that case.
    pub fn resolve(env: &Environment, argv: &[String]) -> Option<Self> {
        let name = argv.first()?;
        let program = resolve(env, name)?;
        Some(Self {
            program,
            argv: argv.to_vec(),
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Spawns the program and blocks until it terminates.
    ///
    /// The child receives `argv[0]` as given (not the resolved path), the
    /// environment's variables and the parent's standard streams.
    pub fn execute(self, env: &Environment) -> Result<ExitCode, ShellError> {
        let name = self.argv[0].clone();
        tracing::debug!(program = %self.program.display(), argv = ?self.argv, "spawning");

        let mut child = std::process::Command::new(&self.program)
            .arg0(&name)
            .args(&self.argv[1..])
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .spawn()
            .map_err(|source| ShellError::Spawn {
                name: name.clone(),
                source,
            })?;
        let exit_status = child
            .wait()
            .map_err(|source| ShellError::Spawn { name, source })?;

        tracing::debug!(status = %exit_status, "child exited");
        match exit_status.code() {
            Some(x) => Ok(x),
            None => Ok(terminated_by_signal(exit_status)),
        }
    }
}

fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

/// Resolve a command name using the environment's `PATH`.
///
/// Returns `None` if `PATH` is unset or nothing matches.
pub fn resolve(env: &Environment, name: &str) -> Option<PathBuf> {
    let found = match env.get_var("PATH") {
        Some(search_paths) => find_command_path(&search_paths, name),
        None if name.contains('/') => find_command_path("", name),
        None => None,
    };
    tracing::debug!(name, resolved = ?found, "resolved command");
    found
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Empty name: returns `None`.
/// - Name containing a `/` (e.g. `/bin/sh`, `./run`, `bin/tool`): returns it if it
///   is an executable regular file; `PATH` is not consulted.
/// - Bare name: searches each directory in `search_paths` in order.
pub fn find_command_path(search_paths: &str, name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    if name.contains('/') {
        let path = Path::new(name);
        return is_executable_file(path).then(|| path.to_path_buf());
    }
    find_in_path(search_paths, name)
}

/// Search the colon separated `search_paths` for `name`.
///
/// The first candidate that is both executable by the current user and a
/// regular file wins. Empty entries are skipped.
pub fn find_in_path(search_paths: &str, name: &str) -> Option<PathBuf> {
    search_paths
        .split(':')
        .filter(|dir| !dir.is_empty())
        .map(|dir| Path::new(dir).join(name))
        .find(|candidate| is_executable_file(candidate))
}

/// True for regular files (symlinks followed) the current user may execute.
pub fn is_executable_file(path: &Path) -> bool {
    let is_file = std::fs::metadata(path)
        .map(|m| m.is_file())
        .unwrap_or(false);
    is_file && access(path, AccessFlags::X_OK).is_ok()
}
