use crate::tokenizer::MAX_ARGS;

/// Default prompt printed before every read.
pub const DEFAULT_PROMPT: &str = "$ ";

/// Longest accepted input line, in characters. Anything past it is dropped.
///
/// Tied to the word cap: a line of this length can never hold more than
/// [`MAX_ARGS`] words.
pub const MAX_LINE_LEN: usize = MAX_ARGS + 1;

/// Settings of an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub max_line_len: usize,
    /// Use the line editor when stdin is a terminal.
    pub use_editor: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            max_line_len: MAX_LINE_LEN,
            use_editor: true,
        }
    }
}

impl Config {
    /// Cut `line` down to `max_line_len` characters.
    pub fn truncate_line<'a>(&self, line: &'a str) -> &'a str {
        match line.char_indices().nth(self.max_line_len) {
            Some((idx, _)) => {
                tracing::warn!(limit = self.max_line_len, "input line truncated");
                &line[..idx]
            }
            None => line,
        }
    }
}
