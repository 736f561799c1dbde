//! IDF parser: builds the object/field model from tokens.
//!
//! The parser groups tokens into objects without interpreting their
//! semantics. Each object has a keyword and an ordered list of fields; each
//! field remembers its value, where that value sits in the source, how it
//! was terminated and the inline comment that follows it.

use crate::error::{FormatError, Result};
use crate::lexer::{Lexer, SpannedToken, Token};

/// A byte range in the source text plus the line it starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
    /// Line number (1-indexed).
    pub line: usize,
}

/// The separator that ends a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `,`: more fields follow.
    Comma,
    /// `;`: last field of the object.
    Semicolon,
}

impl Terminator {
    /// The separator character.
    pub fn as_char(self) -> char {
        match self {
            Terminator::Comma => ',',
            Terminator::Semicolon => ';',
        }
    }
}

/// An inline comment following a field separator.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Comment body after the `!`.
    pub text: String,
    /// Location of the comment, starting at the `!`.
    pub span: Span,
}

/// A single field of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field value without surrounding whitespace (may be empty).
    pub value: String,
    /// Location of the value. Empty fields get a zero-width span just
    /// before their separator.
    pub span: Span,
    /// Separator that ends the field.
    pub terminator: Terminator,
    /// Byte offset of the separator.
    pub terminator_at: usize,
    /// Inline comment on the same line as the separator.
    pub comment: Option<Comment>,
}

impl Field {
    /// Field name taken from a `!- Name {units}` comment, without the units.
    pub fn name(&self) -> Option<&str> {
        let text = self.comment.as_ref()?.text.trim_start_matches('-').trim();
        let name = match text.rfind('{') {
            Some(idx) if text.ends_with('}') => text[..idx].trim_end(),
            _ => text,
        };
        (!name.is_empty()).then_some(name)
    }

    /// Value parsed as a number, if it is one.
    pub fn as_f64(&self) -> Option<f64> {
        self.value.parse().ok()
    }

    /// Case-insensitive comparison of the value.
    pub fn value_is(&self, text: &str) -> bool {
        self.value.eq_ignore_ascii_case(text)
    }
}

/// A parsed IDF object.
#[derive(Debug, Clone, PartialEq)]
pub struct IdfObject {
    /// Object type keyword (e.g. `Site:Location`), as written.
    pub keyword: String,
    /// Location of the keyword.
    pub keyword_span: Span,
    /// Fields in order.
    pub fields: Vec<Field>,
    /// Byte offset one past the object's final separator or, when present,
    /// its trailing comment.
    pub end: usize,
}

impl IdfObject {
    /// Case-insensitive keyword check.
    pub fn is(&self, keyword: &str) -> bool {
        self.keyword.eq_ignore_ascii_case(keyword)
    }

    /// The first field, which most object types use as their name.
    pub fn name(&self) -> Option<&str> {
        self.fields.first().map(|f| f.value.as_str())
    }

    /// Index of the first field whose comment name matches `name`.
    pub fn field_named(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    /// Byte range covered by the object, from keyword to trailing comment.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.keyword_span.start..self.end
    }
}

/// Parser for IDF documents.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    /// Parse IDF text into its objects.
    pub fn parse(input: &str) -> Result<Vec<IdfObject>> {
        let tokens = Lexer::new(input).tokenize();
        let mut parser = Parser { tokens, pos: 0 };
        parser.parse_objects()
    }

    fn parse_objects(&mut self) -> Result<Vec<IdfObject>> {
        let mut objects = Vec::new();
        loop {
            self.skip_comments();
            let Some(tok) = self.advance().cloned() else {
                break;
            };
            match tok.token {
                Token::Text(keyword) => {
                    let keyword_span = Span {
                        start: tok.start,
                        end: tok.end,
                        line: tok.line,
                    };
                    objects.push(self.parse_object(keyword, keyword_span)?);
                }
                _ => {
                    return Err(FormatError::parser(
                        tok.line,
                        format!("{:?} without a preceding keyword", tok.token),
                    ));
                }
            }
        }
        Ok(objects)
    }

    fn parse_object(&mut self, keyword: String, keyword_span: Span) -> Result<IdfObject> {
        self.skip_comments();
        let sep = self.expect_separator(&keyword, keyword_span.line)?;
        let mut object_end = sep.end;
        if let Some(comment) = self.trailing_comment(sep.line) {
            object_end = comment.span.end;
        }

        let mut fields = Vec::new();
        if sep.token == Token::Comma {
            loop {
                self.skip_comments();
                let value = match self.peek().cloned() {
                    Some(SpannedToken {
                        token: Token::Text(value),
                        start,
                        end,
                        line,
                    }) => {
                        self.advance();
                        Some((value, Span { start, end, line }))
                    }
                    _ => None,
                };

                self.skip_comments();
                let sep = self.expect_separator(&keyword, keyword_span.line)?;
                let (value, span) = value.unwrap_or_else(|| {
                    let at = Span {
                        start: sep.start,
                        end: sep.start,
                        line: sep.line,
                    };
                    (String::new(), at)
                });

                let terminator = if sep.token == Token::Semicolon {
                    Terminator::Semicolon
                } else {
                    Terminator::Comma
                };
                let comment = self.trailing_comment(sep.line);
                object_end = comment.as_ref().map_or(sep.end, |c| c.span.end);

                fields.push(Field {
                    value,
                    span,
                    terminator,
                    terminator_at: sep.start,
                    comment,
                });
                if terminator == Terminator::Semicolon {
                    break;
                }
            }
        }

        Ok(IdfObject {
            keyword,
            keyword_span,
            fields,
            end: object_end,
        })
    }

    /// Consume a `,` or `;`, reporting an unterminated object at EOF.
    fn expect_separator(&mut self, keyword: &str, object_line: usize) -> Result<SpannedToken> {
        match self.peek().cloned() {
            Some(tok @ SpannedToken {
                token: Token::Comma | Token::Semicolon,
                ..
            }) => {
                self.advance();
                Ok(tok)
            }
            Some(SpannedToken {
                token: Token::Text(text),
                line,
                ..
            }) => Err(FormatError::parser(
                line,
                format!("expected ',' or ';' before '{text}' in '{keyword}'"),
            )),
            _ => Err(FormatError::unterminated(keyword, object_line)),
        }
    }

    /// Consume a comment that sits on the given line, if the next token is one.
    fn trailing_comment(&mut self, line: usize) -> Option<Comment> {
        match self.peek() {
            Some(SpannedToken {
                token: Token::Comment(text),
                start,
                end,
                line: comment_line,
            }) if *comment_line == line => {
                let comment = Comment {
                    text: text.clone(),
                    span: Span {
                        start: *start,
                        end: *end,
                        line,
                    },
                };
                self.advance();
                Some(comment)
            }
            _ => None,
        }
    }

    fn skip_comments(&mut self) {
        while matches!(self.peek().map(|t| &t.token), Some(Token::Comment(_))) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&SpannedToken> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }
}
