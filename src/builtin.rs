use crate::command::ExitCode;
use crate::env::Environment;
use crate::error::ShellError;
use crate::external;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins run in-process and write their output, including their error
/// messages, to the `stdout` they are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Echo,
    Exit,
    Type,
    Pwd,
    Cd,
    History,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Echo,
        Builtin::Exit,
        Builtin::Type,
        Builtin::Pwd,
        Builtin::Cd,
        Builtin::History,
    ];

    /// Canonical name of the command, e.g. "echo" or "cd".
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Echo => "echo",
            Builtin::Exit => "exit",
            Builtin::Type => "type",
            Builtin::Pwd => "pwd",
            Builtin::Cd => "cd",
            Builtin::History => "history",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Executes the builtin with the arguments that followed its name.
    ///
    /// Return value follows shell conventions: 0 for success, non-zero for error.
    /// Only failures to write to `stdout` are returned as `Err`.
    pub fn execute(
        self,
        args: &[String],
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        match self {
            Builtin::Echo => echo(args, stdout),
            Builtin::Exit => {
                env.should_exit = true;
                Ok(0)
            }
            Builtin::Type => type_of(args, stdout, env),
            Builtin::Pwd => pwd(stdout, env),
            Builtin::Cd => cd(args.first().map(String::as_str), stdout, env),
            // Recognised so that `type history` answers correctly; does nothing.
            Builtin::History => Ok(0),
        }
    }
}

/// Membership test for the builtin set.
pub fn is_builtin(name: &str) -> bool {
    Builtin::from_name(name).is_some()
}

fn echo(args: &[String], stdout: &mut dyn Write) -> Result<ExitCode> {
    writeln!(stdout, "{}", args.join(" "))?;
    Ok(0)
}

fn type_of(names: &[String], stdout: &mut dyn Write, env: &Environment) -> Result<ExitCode> {
    let mut code = 0;
    for name in names {
        if is_builtin(name) {
            writeln!(stdout, "{name} is a shell builtin")?;
        } else if let Some(path) = external::resolve(env, name) {
            writeln!(stdout, "{name} is {}", path.display())?;
        } else {
            writeln!(stdout, "{}", ShellError::NotFound(name.clone()))?;
            code = 1;
        }
    }
    Ok(code)
}

fn pwd(stdout: &mut dyn Write, env: &Environment) -> Result<ExitCode> {
    match env.current_dir() {
        Ok(dir) => {
            writeln!(stdout, "{}", dir.display())?;
            Ok(0)
        }
        Err(e) => {
            tracing::warn!(error = %e, "pwd failed");
            writeln!(stdout, "pwd: {e:#}")?;
            Ok(1)
        }
    }
}

/// `cd` with no target or with `~` goes to `HOME`.
fn cd(target: Option<&str>, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
    let label = target.unwrap_or("~");
    let dir = match target {
        None | Some("~") => env.home(),
        Some(path) => Some(PathBuf::from(path)),
    };

    let changed = match dir {
        Some(dir) => env.change_dir(&dir),
        None => Err(anyhow::anyhow!("HOME not set")),
    };

    match changed {
        Ok(()) => Ok(0),
        Err(e) => {
            tracing::warn!(path = label, error = ?e, "cd failed");
            writeln!(stdout, "{}", ShellError::NoSuchDirectory(label.to_string()))?;
            Ok(1)
        }
    }
}
