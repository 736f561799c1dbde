//! IDF lexer.
//!
//! Tokenizes IDF text into:
//! - Text runs (a keyword or a field value, whitespace-trimmed)
//! - Field separators (`,`) and object terminators (`;`)
//! - Comments (`!` to end of line, including the `!-` field-name convention)
//!
//! A text run never crosses a line break. Every token keeps its byte range in
//! the source so later edits can splice the original text in place.

/// A token in an IDF document.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Keyword or field value, without surrounding whitespace.
    Text(String),
    /// Comma `,`.
    Comma,
    /// Semicolon `;`.
    Semicolon,
    /// Comment body (everything after `!` up to the line break).
    Comment(String),
}

/// A token with its location in the source.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    /// The token.
    pub token: Token,
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
    /// Line number (1-indexed).
    pub line: usize,
}

const BOM: char = '\u{feff}';

/// Lexer for IDF documents.
pub struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    ///
    /// A leading byte-order mark is skipped; offsets still index `source`.
    pub fn new(source: &'a str) -> Self {
        let pos = if source.starts_with(BOM) { BOM.len_utf8() } else { 0 };
        Self {
            source,
            input: source.as_bytes(),
            pos,
            line: 1,
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(&mut self) -> Vec<SpannedToken> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token() {
            tokens.push(tok);
        }
        tokens
    }

    /// Get the next token, or `None` if at end of input.
    pub fn next_token(&mut self) -> Option<SpannedToken> {
        self.skip_whitespace();

        let ch = self.peek_char()?;
        let start = self.pos;
        let line = self.line;

        let token = match ch {
            b',' => {
                self.advance();
                Token::Comma
            }
            b';' => {
                self.advance();
                Token::Semicolon
            }
            b'!' => self.read_comment(),
            _ => self.read_text(),
        };

        let end = match token {
            Token::Text(ref text) => start + text.len(),
            _ => self.pos,
        };

        Some(SpannedToken {
            token,
            start,
            end,
            line,
        })
    }

    fn peek_char(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_comment(&mut self) -> Token {
        self.advance(); // skip '!'
        let body_start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch == b'\n' {
                break;
            }
            self.advance();
        }
        let body = self.source[body_start..self.pos].trim_end_matches('\r');
        // Keep the span off the '\r' of CRLF input.
        self.pos = body_start + body.len();
        Token::Comment(body.to_string())
    }

    fn read_text(&mut self) -> Token {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if matches!(ch, b',' | b';' | b'!' | b'\n') {
                break;
            }
            self.advance();
        }
        let text = self.source[start..self.pos].trim_end();
        Token::Text(text.to_string())
    }
}
