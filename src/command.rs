use crate::builtin::Builtin;
use crate::env::Environment;
use crate::external::ExternalCommand;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Exit code reported when a program was resolved but could not be started.
pub const EXIT_CANNOT_EXECUTE: ExitCode = 127;

/// What the read loop should do after a line has been executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A tokenized line bound to the thing that will run it.
#[derive(Debug)]
pub enum Command {
    Builtin { builtin: Builtin, args: Vec<String> },
    External(ExternalCommand),
}

impl Command {
    /// Bind `argv` to a builtin, or else to an executable found on `PATH`.
    ///
    /// `exit` only matches as a bare word; with arguments it is looked up like
    /// any other name. Returns `None` for an empty vector or an unknown name.
    pub fn lookup(env: &Environment, argv: &[String]) -> Option<Self> {
        let (name, args) = argv.split_first()?;
        let builtin = Builtin::from_name(name)
            .filter(|builtin| *builtin != Builtin::Exit || args.is_empty());
        if let Some(builtin) = builtin {
            return Some(Command::Builtin {
                builtin,
                args: args.to_vec(),
            });
        }
        ExternalCommand::resolve(env, argv).map(Command::External)
    }
}
