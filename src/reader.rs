use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, IsTerminal, Write};

/// Source of input lines for the read loop.
///
/// A terminal gets a [`rustyline`] editor with in-memory history; anything else
/// (pipes, files, tests) is read line by line, with the prompt written to the
/// session's stdout before every read.
pub enum LineReader {
    Editor(DefaultEditor),
    Plain(Box<dyn BufRead>),
}

impl LineReader {
    /// Pick the reader for the process's stdin.
    pub fn for_stdin(use_editor: bool) -> Result<Self> {
        let stdin = std::io::stdin();
        if use_editor && stdin.is_terminal() {
            let editor = DefaultEditor::new().context("failed to initialise line editor")?;
            return Ok(LineReader::Editor(editor));
        }
        Ok(LineReader::Plain(Box::new(stdin.lock())))
    }

    pub fn plain(input: impl BufRead + 'static) -> Self {
        LineReader::Plain(Box::new(input))
    }

    /// Print `prompt` and read one line without its terminator.
    ///
    /// Returns `None` at end of input. An interrupted edit yields an empty line,
    /// and bytes that are not UTF-8 are replaced rather than reported.
    pub fn read_line(&mut self, prompt: &str, stdout: &mut dyn Write) -> Result<Option<String>> {
        match self {
            LineReader::Editor(editor) => match editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.as_str())?;
                    }
                    Ok(Some(line))
                }
                Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
                Err(ReadlineError::Eof) => Ok(None),
                Err(err) => Err(err).context("failed to read line"),
            },
            LineReader::Plain(input) => {
                stdout.write_all(prompt.as_bytes())?;
                stdout.flush()?;

                let mut raw = Vec::new();
                if input.read_until(b'\n', &mut raw).context("failed to read line")? == 0 {
                    return Ok(None);
                }
                if raw.ends_with(b"\n") {
                    raw.pop();
                    if raw.ends_with(b"\r") {
                        raw.pop();
                    }
                }
                // Undecodable bytes become U+FFFD instead of ending the session.
                Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
            }
        }
    }
}
