//! Splitting of an input line into shell words.
//!
//! The tokenizer understands single quotes, double quotes and backslash escapes.
//! It never fails: an unterminated quote simply runs to the end of the line, and
//! arguments past [`MAX_ARGS`] are dropped.

/// Maximum number of words produced for a single line.
///
/// Words past this limit are silently discarded rather than reported as an error.
pub const MAX_ARGS: usize = 99;

/// Quoting mode of the character currently being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteState {
    Unquoted,
    SingleQuoted,
    DoubleQuoted,
}

struct TokenizerFSM {
    input: Vec<char>,
    pos: usize,
    state: QuoteState,
    buffer: String,
}

impl TokenizerFSM {
    fn new(line: &str) -> Self {
        TokenizerFSM {
            input: line.chars().collect(),
            pos: 0,
            state: QuoteState::Unquoted,
            buffer: String::new(),
        }
    }

    /// Runs the machine over the whole input and returns the collected words.
    fn make_tokens(&mut self) -> Vec<String> {
        let mut out = Vec::new();

        while out.len() < MAX_ARGS {
            self.skip_blanks();
            if self.peek_char().is_none() {
                break;
            }
            out.push(self.read_token());
        }

        out
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek_char(), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    /// Reads one word starting at a non-blank character.
    ///
    /// Stops after an unquoted blank (which is consumed) or at end of input.
    fn read_token(&mut self) -> String {
        self.state = QuoteState::Unquoted;

        while let Some(ch) = self.read_char() {
            let done = match self.state {
                QuoteState::Unquoted => self.handle_unquoted(ch),
                QuoteState::SingleQuoted => {
                    self.handle_single_quote(ch);
                    false
                }
                QuoteState::DoubleQuoted => {
                    self.handle_double_quote(ch);
                    false
                }
            };
            if done {
                break;
            }
        }

        std::mem::take(&mut self.buffer)
    }

    /// Returns `true` when `ch` terminates the current word.
    fn handle_unquoted(&mut self, ch: char) -> bool {
        match ch {
            ' ' | '\t' => return true,
            '\'' => self.state = QuoteState::SingleQuoted,
            '"' => self.state = QuoteState::DoubleQuoted,
            '\\' => {
                // A trailing backslash has nothing to escape and is dropped.
                if let Some(next) = self.read_char() {
                    self.buffer.push(next);
                }
            }
            c => self.buffer.push(c),
        }
        false
    }

    fn handle_single_quote(&mut self, ch: char) {
        match ch {
            '\'' => self.state = QuoteState::Unquoted,
            c => self.buffer.push(c),
        }
    }

    fn handle_double_quote(&mut self, ch: char) {
        match ch {
            '"' => self.state = QuoteState::Unquoted,
            '\\' => match self.peek_char() {
                Some(next @ ('"' | '\\' | '$' | '`')) => {
                    self.read_char();
                    self.buffer.push(next);
                }
                Some('\n') => {
                    // Line continuation: both characters vanish.
                    self.read_char();
                }
                _ => self.buffer.push('\\'),
            },
            c => self.buffer.push(c),
        }
    }
}

/// Splits `line` into unquoted, unescaped words.
///
/// Blank input yields an empty vector. At most [`MAX_ARGS`] words are returned.
pub fn tokenize(line: &str) -> Vec<String> {
    let tokens = TokenizerFSM::new(line).make_tokens();
    tracing::trace!(?tokens, "tokenized line");
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        tokenize(line)
    }

    #[test]
    fn test_empty_and_blank_lines() {
        assert!(words("").is_empty());
        assert!(words("   \t  ").is_empty());
    }

    #[test]
    fn test_plain_words_collapse_blanks() {
        assert_eq!(words("  echo   hello\tworld  "), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn test_single_quotes_preserve_spaces() {
        assert_eq!(words("echo 'a  b'"), vec!["echo", "a  b"]);
    }

    #[test]
    fn test_single_quotes_keep_backslash_literal() {
        assert_eq!(words(r"echo 'a\nb\'"), vec!["echo", r"a\nb\"]);
    }

    #[test]
    fn test_double_quote_inside_single_quotes_is_literal() {
        assert_eq!(words(r#"echo 'say "hi"'"#), vec!["echo", r#"say "hi""#]);
    }

    #[test]
    fn test_escaped_quote_inside_double_quotes() {
        assert_eq!(words("echo \"a\\\"b\""), vec!["echo", "a\"b"]);
    }

    #[test]
    fn test_double_quote_escapes_only_special_characters() {
        assert_eq!(words(r#"echo "a\\b\$c\`d""#), vec!["echo", r"a\b$c`d"]);
        assert_eq!(words(r#"echo "a\nb""#), vec!["echo", r"a\nb"]);
    }

    #[test]
    fn test_backslash_before_single_quote_in_double_quotes() {
        // The backslash stays, and the quote is an ordinary character here.
        assert_eq!(words(r#"echo "it\'s""#), vec!["echo", r"it\'s"]);
    }

    #[test]
    fn test_double_quote_line_continuation() {
        assert_eq!(words("echo \"ab\\\ncd\""), vec!["echo", "abcd"]);
    }

    #[test]
    fn test_unquoted_escaped_space_joins_word() {
        assert_eq!(words("echo a\\ b"), vec!["echo", "a b"]);
    }

    #[test]
    fn test_unquoted_backslash_escapes_quotes() {
        assert_eq!(words(r#"echo \'hi\" \\"#), vec!["echo", r#"'hi""#, r"\"]);
    }

    #[test]
    fn test_trailing_backslash_is_dropped() {
        assert_eq!(words("echo abc\\"), vec!["echo", "abc"]);
    }

    #[test]
    fn test_adjacent_quoted_parts_concatenate() {
        assert_eq!(words(r#"echo "hello"'world'x"#), vec!["echo", "helloworldx"]);
        assert_eq!(words("'/tmp/my dir'/bin"), vec!["/tmp/my dir/bin"]);
    }

    #[test]
    fn test_empty_quotes_produce_empty_word() {
        assert_eq!(words("echo '' x"), vec!["echo", "", "x"]);
    }

    #[test]
    fn test_unterminated_quote_is_tolerated() {
        assert_eq!(words("echo 'abc def"), vec!["echo", "abc def"]);
        assert_eq!(words("echo \"abc"), vec!["echo", "abc"]);
    }

    #[test]
    fn test_argument_count_is_truncated() {
        let line = (0..150).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let tokens = words(&line);
        assert_eq!(tokens.len(), MAX_ARGS);
        assert_eq!(tokens.last().map(String::as_str), Some("98"));
    }

    #[test]
    fn test_rejoin_reproduces_normalized_arguments() {
        let line = "  cmd  'one two'   \"three  four\"\tfive ";
        let joined = words(line).join(" ");
        assert_eq!(joined, "cmd one two three  four five");

        let plain = "ls   -la \t /tmp";
        assert_eq!(
            words(plain).join(" "),
            plain.split_whitespace().collect::<Vec<_>>().join(" ")
        );
    }
}
