use anyhow::Result;
use argh::FromArgs;
use minsh::{Config, Flow, Interpreter, LineReader};
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// A tiny interactive command interpreter.
struct Args {
    #[argh(option, short = 'c')]
    /// execute a single command line and exit with its status.
    command: Option<String>,

    #[argh(switch)]
    /// never use the line editor, even on a terminal.
    plain: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("MINSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let args: Args = argh::from_env();

    let config = Config {
        use_editor: !args.plain,
        ..Config::default()
    };
    let mut sh = Interpreter::new(config);
    let mut stdout = std::io::stdout();

    if let Some(line) = args.command {
        let flow = sh.execute_line(&line, &mut stdout)?;
        let code = match flow {
            Flow::Exit => 0,
            Flow::Continue => sh.last_status(),
        };
        stdout.flush()?;
        std::process::exit(code);
    }

    let mut reader = LineReader::for_stdin(sh.config().use_editor)?;
    sh.repl(&mut reader, &mut stdout)
}
