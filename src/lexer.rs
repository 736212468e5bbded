//! Lexer for Polang
//!
//! The lexer converts a decoded source buffer into a finite sequence of
//! tokens terminated by exactly one end-of-file token, then serves it to the
//! parser through a peek/next cursor. Scanning is a hand-written state
//! machine: identifiers are Unicode-alphabetic, keywords come from the
//! Polish keyword table, and numbers are classified while scanning.

use crate::span::Span;
use crate::token::{NumberValue, Token, TokenKind, TokenValue};
use thiserror::Error;

/// Keyword table, in the source language's own vocabulary
const KEYWORD_RETURN: &str = "zwróć";
const KEYWORD_VOID: &str = "nic";
const KEYWORD_INT64: &str = "całkowita64";
const KEYWORD_UINT64: &str = "nieujemna64";
const KEYWORD_FLOAT64: &str = "rzeczywista64";

/// Upper bound on the raw text of one number literal
const NUMBER_LENGTH_MAX: usize = 127;

/// Integer literals with this many digits (and no leading minus) are
/// classified as uint64. Digit count decides the class, not the value range.
const UINT64_DIGIT_THRESHOLD: usize = 10;

/// Lexer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerError {
    #[error("unrecognized character '{ch}' on line {line}")]
    UnrecognizedCharacter { ch: char, line: usize },

    #[error("second '.' while reading a number on line {line}")]
    SecondDecimalPoint { line: usize },

    #[error("number literal longer than 127 characters on line {line}")]
    NumberTooLong { line: usize },

    #[error("number literal '{text}' does not fit its 64-bit type on line {line}")]
    InvalidNumber { text: String, line: usize },
}

/// The lexer for Polang
///
/// Tokenizes the whole buffer eagerly on construction, then acts as the
/// token cursor the parser consumes.
#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    cursor: usize,
}

impl<'src> Lexer<'src> {
    /// Tokenize the given source buffer
    pub fn new(source: &'src str) -> Result<Self, LexerError> {
        let tokens = Scanner::new(source).tokenize()?;
        Ok(Self {
            source,
            tokens,
            cursor: 0,
        })
    }

    /// Get the source buffer
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// All produced tokens, including the trailing EOF token
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Reset the cursor to the start without re-scanning
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Peek at the token at cursor + offset, without moving the cursor.
    /// Out of range yields a synthetic EOF token.
    pub fn peek(&self, offset: usize) -> Token {
        match self.tokens.get(self.cursor + offset) {
            Some(token) => *token,
            None => Token::eof(),
        }
    }

    /// Return the token at the cursor and advance by one. The cursor never
    /// advances past the last stored token; from there on callers get a
    /// synthetic EOF token.
    pub fn next_token(&mut self) -> Token {
        if self.cursor + 1 >= self.tokens.len() {
            return Token::eof();
        }
        let token = self.tokens[self.cursor];
        self.cursor += 1;
        token
    }
}

fn starts_identifier(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn continues_identifier(ch: char) -> bool {
    starts_identifier(ch) || ch.is_ascii_digit()
}

/// Scanning state over the source buffer
struct Scanner<'src> {
    source: &'src str,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl<'src> Scanner<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_nth(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    /// Consume one character, tracking the line counter
    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|ch| ch.is_whitespace()) {
            self.bump();
        }
    }

    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind, self.line));
    }

    fn push_value(&mut self, kind: TokenKind, value: TokenValue) {
        self.tokens.push(Token::with_value(kind, self.line, value));
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexerError> {
        loop {
            self.skip_whitespace();

            let Some(ch) = self.peek() else {
                break;
            };

            if starts_identifier(ch) {
                self.read_identifier();
            } else if ch.is_ascii_digit() {
                self.read_number()?;
            } else if ch == '-' {
                // One-character lookahead decides number / arrow / minus
                match self.peek_nth(1) {
                    Some(next) if next.is_ascii_digit() => self.read_number()?,
                    Some('>') => {
                        self.bump();
                        self.bump();
                        self.push(TokenKind::Arrow);
                    }
                    _ => {
                        self.bump();
                        self.push(TokenKind::Minus);
                    }
                }
            } else if ch == '.' {
                match self.peek_nth(1) {
                    Some(next) if next.is_ascii_digit() => self.read_number()?,
                    _ => {
                        self.bump();
                        self.push(TokenKind::Dot);
                    }
                }
            } else if ch == ':' {
                if self.peek_nth(1) == Some(':') {
                    self.bump();
                    self.bump();
                    self.push(TokenKind::ColonDouble);
                } else {
                    self.bump();
                    self.push(TokenKind::Colon);
                }
            } else if ch == '/' {
                if self.peek_nth(1) == Some('/') {
                    self.skip_comment();
                } else {
                    self.bump();
                    self.push(TokenKind::SlashForward);
                }
            } else {
                let kind = match ch {
                    ';' => TokenKind::Semicolon,
                    '(' => TokenKind::ParenOpen,
                    ')' => TokenKind::ParenClose,
                    '{' => TokenKind::BraceOpen,
                    '}' => TokenKind::BraceClose,
                    ',' => TokenKind::Comma,
                    '+' => TokenKind::Plus,
                    '*' => TokenKind::Star,
                    '=' => TokenKind::Equal,
                    '\\' => TokenKind::SlashBackward,
                    _ => {
                        return Err(LexerError::UnrecognizedCharacter {
                            ch,
                            line: self.line,
                        })
                    }
                };
                self.bump();
                self.push(kind);
            }
        }

        // Exactly one EOF token terminates the stream
        self.push(TokenKind::Eof);

        Ok(self.tokens)
    }

    fn read_identifier(&mut self) {
        let start = self.pos;

        while let Some(ch) = self.peek() {
            let valid = if self.pos == start {
                starts_identifier(ch)
            } else {
                continues_identifier(ch)
            };
            if !valid {
                break;
            }
            self.bump();
        }

        let span = Span::new(start, self.pos);
        match span.text(self.source) {
            KEYWORD_RETURN => self.push(TokenKind::KeywordReturn),
            KEYWORD_VOID => self.push(TokenKind::KeywordVoid),
            KEYWORD_INT64 => self.push(TokenKind::KeywordInt64),
            KEYWORD_UINT64 => self.push(TokenKind::KeywordUint64),
            KEYWORD_FLOAT64 => self.push(TokenKind::KeywordFloat64),
            _ => self.push_value(TokenKind::Identifier, TokenValue::Ident(span)),
        }
    }

    fn read_number(&mut self) -> Result<(), LexerError> {
        let mut buffer = String::new();
        let mut dash_encountered = false;
        let mut dot_encountered = false;

        if self.peek() == Some('-') {
            self.bump();
            buffer.push('-');
            dash_encountered = true;
        }

        // Synthesize a zero before a leading dot, so ".5" scans as "0.5"
        if self.peek() == Some('.') {
            self.bump();
            buffer.push('0');
            buffer.push('.');
            dot_encountered = true;
        }

        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() && ch != '.' {
                break;
            }

            self.bump();

            if ch == '.' {
                if dot_encountered {
                    return Err(LexerError::SecondDecimalPoint { line: self.line });
                }
                dot_encountered = true;
            }

            buffer.push(ch);

            if buffer.len() >= NUMBER_LENGTH_MAX {
                return Err(LexerError::NumberTooLong { line: self.line });
            }
        }

        let invalid = |text: &String| LexerError::InvalidNumber {
            text: text.clone(),
            line: self.line,
        };

        let value = if dot_encountered {
            NumberValue::Float64(buffer.parse().map_err(|_| invalid(&buffer))?)
        } else if !dash_encountered && buffer.len() >= UINT64_DIGIT_THRESHOLD {
            NumberValue::Uint64(buffer.parse().map_err(|_| invalid(&buffer))?)
        } else {
            NumberValue::Int64(buffer.parse().map_err(|_| invalid(&buffer))?)
        };

        self.push_value(TokenKind::Number, TokenValue::Number(value));
        Ok(())
    }

    /// Consume a `//` comment through (and including) the next newline
    fn skip_comment(&mut self) {
        loop {
            match self.bump() {
                Some('\n') | None => return,
                Some(_) => {}
            }
        }
    }
}
