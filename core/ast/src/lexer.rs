//! Hand-written lexer for Mood source text.
//!
//! A single forward pass over the raw bytes. Each step consumes whitespace
//! and `//` line comments, then emits exactly one token: punctuation (with
//! one-character lookahead to split `:`/`::` and `=`/`==`), a keyword, a
//! maximal identifier, or a maximal digit run. The stream always terminates
//! with a synthetic [`TokenKind::Eof`].
//!
//! Lines and columns are 1-based; byte offsets are 0-based; a tab advances
//! the column by one.

use crate::errors::ParseError;
use crate::nodes::Location;
use crate::token::{Token, TokenKind};

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("fn", TokenKind::Fn),
    ("let", TokenKind::Let),
    ("pub", TokenKind::Pub),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("return", TokenKind::Return),
    ("enum", TokenKind::Enum),
    ("struct", TokenKind::Struct),
];

pub struct Lexer<'a> {
    bytes: &'a [u8],
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenizes the whole input.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedCharacter`] when no lexing rule
    /// matches the current position.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            if self.position >= self.bytes.len() {
                let at_end = self.here();
                tokens.push(Token::new(
                    TokenKind::Eof,
                    Location::new(at_end.0, at_end.0, at_end.1, at_end.2, at_end.1, at_end.2),
                ));
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let start = self.here();
        let byte = self.bytes[self.position];

        if let Some(kind) = self.match_punctuation(byte) {
            return Ok(Token::new(kind, self.span_from(start)));
        }
        if byte.is_ascii_alphabetic() {
            let word = self.consume_word();
            let kind = KEYWORDS
                .iter()
                .find(|(text, _)| *text == word)
                .map_or_else(|| TokenKind::Identifier(word), |(_, kind)| kind.clone());
            return Ok(Token::new(kind, self.span_from(start)));
        }
        if byte.is_ascii_digit() {
            let digits = self.consume_digits();
            return Ok(Token::new(TokenKind::Number(digits), self.span_from(start)));
        }

        self.advance();
        Err(ParseError::UnexpectedCharacter {
            location: self.span_from(start),
        })
    }

    fn match_punctuation(&mut self, byte: u8) -> Option<TokenKind> {
        let kind = match byte {
            b'(' => TokenKind::ParenOpen,
            b')' => TokenKind::ParenClose,
            b'{' => TokenKind::BraceOpen,
            b'}' => TokenKind::BraceClose,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'.' => TokenKind::Dot,
            b'_' => TokenKind::Underscore,
            b':' => {
                self.advance();
                if self.peek() == Some(b':') {
                    self.advance();
                    return Some(TokenKind::ColonColon);
                }
                return Some(TokenKind::Colon);
            }
            b'=' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    return Some(TokenKind::EqEq);
                }
                return Some(TokenKind::Assign);
            }
            _ => return None,
        };
        self.advance();
        Some(kind)
    }

    fn skip_trivia(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' => self.advance(),
                b'/' if self.peek_at(1) == Some(b'/') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn consume_word(&mut self) -> String {
        let start = self.position;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() {
                self.advance();
            } else {
                break;
            }
        }
        String::from_utf8_lossy(&self.bytes[start..self.position]).into_owned()
    }

    fn consume_digits(&mut self) -> String {
        let start = self.position;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        String::from_utf8_lossy(&self.bytes[start..self.position]).into_owned()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.position + ahead).copied()
    }

    fn advance(&mut self) {
        if let Some(byte) = self.peek() {
            self.position += 1;
            if byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn here(&self) -> (u32, u32, u32) {
        (
            u32::try_from(self.position).unwrap_or(u32::MAX),
            self.line,
            self.column,
        )
    }

    fn span_from(&self, start: (u32, u32, u32)) -> Location {
        let end = self.here();
        Location::new(start.0, end.0, start.1, start.2, end.1, end.2)
    }
}
