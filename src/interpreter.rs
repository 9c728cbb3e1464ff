use crate::command::{Command, EXIT_CANNOT_EXECUTE, ExitCode, Flow};
use crate::config::Config;
use crate::env::Environment;
use crate::error::ShellError;
use crate::reader::LineReader;
use crate::tokenizer;
use anyhow::Result;
use std::io::Write;

/// A minimal shell-like interpreter that can execute built-in and external commands.
///
/// Every line is tokenized, then routed: blank lines are ignored, builtins run
/// in-process, anything else is looked up on `PATH` and run as a child process
/// that is waited for before the next prompt.
///
/// Example
/// ```
/// use minsh::{Flow, Interpreter};
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let flow = sh.execute_line("echo 'hello   world'", &mut out).unwrap();
/// assert_eq!(flow, Flow::Continue);
/// assert_eq!(out, b"hello   world\n");
/// ```
pub struct Interpreter {
    env: Environment,
    config: Config,
    last_status: ExitCode,
}

impl Interpreter {
    /// Create an interpreter over a snapshot of the process environment.
    pub fn new(config: Config) -> Self {
        Self::with_env(Environment::new(), config)
    }

    pub fn with_env(env: Environment, config: Config) -> Self {
        Self {
            env,
            config,
            last_status: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Exit code of the most recently executed command.
    pub fn last_status(&self) -> ExitCode {
        self.last_status
    }

    /// Run a single input line.
    ///
    /// Builtin output and user-facing error messages go to `stdout`; child
    /// processes write to the inherited process streams. Errors are returned
    /// only when writing to `stdout` fails.
    pub fn execute_line(&mut self, line: &str, stdout: &mut dyn Write) -> Result<Flow> {
        let line = self.config.truncate_line(line);
        let argv = tokenizer::tokenize(line);
        if argv.is_empty() {
            return Ok(Flow::Continue);
        }

        let code = match Command::lookup(&self.env, &argv) {
            Some(Command::Builtin { builtin, args }) => {
                tracing::debug!(builtin = builtin.name(), ?args, "running builtin");
                builtin.execute(&args, stdout, &mut self.env)?
            }
            Some(Command::External(cmd)) => {
                // Keep our own buffered output ahead of the child's.
                stdout.flush()?;
                match cmd.execute(&self.env) {
                    Ok(code) => code,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to start command");
                        eprintln!("{e}");
                        EXIT_CANNOT_EXECUTE
                    }
                }
            }
            None => {
                writeln!(stdout, "{}", ShellError::CommandNotFound(argv[0].clone()))?;
                EXIT_CANNOT_EXECUTE
            }
        };
        self.last_status = code;

        if self.env.should_exit {
            Ok(Flow::Exit)
        } else {
            Ok(Flow::Continue)
        }
    }

    /// Read-eval loop: prompt, read, execute, until `exit` or end of input.
    pub fn repl(&mut self, reader: &mut LineReader, stdout: &mut dyn Write) -> Result<()> {
        loop {
            let Some(line) = reader.read_line(&self.config.prompt, stdout)? else {
                // Leave the terminal on a fresh line after ^D.
                writeln!(stdout)?;
                stdout.flush()?;
                return Ok(());
            };

            match self.execute_line(&line, stdout) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => tracing::error!(error = ?e, "command output failed"),
            }
            stdout.flush()?;
        }

        stdout.flush()?;
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::lock_current_dir;
    use std::io::Cursor;

    fn interpreter_with_path(path: &str) -> Interpreter {
        let mut env = Environment::new();
        env.set_var("PATH", path);
        Interpreter::with_env(env, Config::default())
    }

    fn run_session(interp: &mut Interpreter, input: &str) -> String {
        let mut reader = LineReader::plain(Cursor::new(input.as_bytes().to_vec()));
        let mut out = Vec::new();
        interp.repl(&mut reader, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_blank_line_is_ignored() {
        let mut interp = Interpreter::default();
        let mut out = Vec::new();
        assert_eq!(interp.execute_line("   \t", &mut out).unwrap(), Flow::Continue);
        assert!(out.is_empty());
    }

    #[test]
    fn test_echo_goes_through_tokenizer() {
        let mut interp = Interpreter::default();
        let mut out = Vec::new();
        interp
            .execute_line(r#"echo "a\"b"   c\ d 'e  f'"#, &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\"b c d e  f\n");
    }

    #[test]
    fn test_quoted_builtin_name_is_recognised() {
        let mut interp = Interpreter::default();
        let mut out = Vec::new();
        interp.execute_line("'echo' hi", &mut out).unwrap();
        assert_eq!(out, b"hi\n");
    }

    #[test]
    fn test_unknown_command_reports_not_found() {
        let mut interp = interpreter_with_path("/nonexistent_minsh_dir");
        let mut out = Vec::new();
        let flow = interp.execute_line("nonexistent_cmd_xyz --flag", &mut out).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "nonexistent_cmd_xyz: command not found\n"
        );
        assert_eq!(interp.last_status(), EXIT_CANNOT_EXECUTE);
    }

    #[test]
    fn test_external_exit_code_is_recorded() {
        let mut interp = interpreter_with_path("/usr/bin:/bin");
        let mut out = Vec::new();
        interp.execute_line("sh -c 'exit 4'", &mut out).unwrap();
        assert_eq!(interp.last_status(), 4);
        interp.execute_line("sh -c true", &mut out).unwrap();
        assert_eq!(interp.last_status(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_exit_stops_the_loop() {
        let mut interp = Interpreter::default();
        let out = run_session(&mut interp, "echo one\nexit\necho two\n");
        assert_eq!(out, "$ one\n$ ");
    }

    #[test]
    fn test_exit_with_argument_is_not_an_exit() {
        let mut interp = interpreter_with_path("/nonexistent_minsh_dir");
        let out = run_session(&mut interp, "exit 0\necho after\n");
        assert_eq!(out, "$ exit: command not found\n$ after\n$ \n");
        assert_eq!(interp.last_status(), 0);
    }

    #[test]
    fn test_program_that_cannot_start_keeps_loop_running() {
        use std::os::unix::fs::PermissionsExt;

        let bin = tempfile::tempdir().unwrap();
        let script = bin.path().join("broken");
        std::fs::write(&script, "#!/nonexistent/minsh/interpreter\n").unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let mut interp = interpreter_with_path(&bin.path().display().to_string());
        let mut out = Vec::new();
        let flow = interp.execute_line("broken arg", &mut out).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(interp.last_status(), EXIT_CANNOT_EXECUTE);
        assert!(out.is_empty());

        interp.execute_line("echo after", &mut out).unwrap();
        assert_eq!(out, b"after\n");
        assert_eq!(interp.last_status(), 0);
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let mut interp = Interpreter::default();
        let out = run_session(&mut interp, "echo one\n\n");
        assert_eq!(out, "$ one\n$ $ \n");
    }

    #[test]
    fn test_cd_failure_then_pwd_in_session() {
        let _lock = lock_current_dir();
        let orig = std::env::current_dir().unwrap();
        let mut interp = Interpreter::default();

        let out = run_session(&mut interp, "cd /nonexistent_minsh_dir\npwd\n");

        assert_eq!(
            out,
            format!(
                "$ cd: /nonexistent_minsh_dir: No such file or directory\n$ {}\n$ \n",
                orig.display()
            )
        );
    }

    #[test]
    fn test_long_lines_are_truncated() {
        let config = Config {
            max_line_len: 10,
            ..Config::default()
        };
        let mut interp = Interpreter::with_env(Environment::new(), config);
        let mut out = Vec::new();
        interp.execute_line("echo abcdefghijkl", &mut out).unwrap();
        assert_eq!(out, b"abcde\n");
    }
}
