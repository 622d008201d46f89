use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use tracing::debug;

use crate::config::DEFAULT_MAX_TOKENS;
use crate::error::LexicalError;
use crate::ir::ast::BinaryOperator;
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    // + - * / ==
    Operator(BinaryOperator),
    Assign,        // =
    KeywordAssert, // assert
    LParen,        // (
    RParen,        // )
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Lexeme exactly as written; `EOF` for the terminator.
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => write!(f, "Identifier"),
            Self::Number => write!(f, "Number"),
            Self::Operator(_) => write!(f, "Operator"),
            Self::Assign => write!(f, "Assign"),
            Self::KeywordAssert => write!(f, "KeywordAssert"),
            Self::LParen => write!(f, "LParen"),
            Self::RParen => write!(f, "RParen"),
            Self::Eof => write!(f, "Eof"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.kind, self.text, self.span)
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexicalError> {
    tokenize_with_limit(source, DEFAULT_MAX_TOKENS)
}

/// Scans `source` left to right. Fails on the first character that starts no
/// token, or once more than `max_tokens` tokens (EOF included) would be produced.
pub fn tokenize_with_limit(source: &str, max_tokens: usize) -> Result<Vec<Token>, LexicalError> {
    let mut lexer = Lexer::new(source, max_tokens);
    lexer.run()?;
    debug!(tokens = lexer.tokens.len(), "tokenized source");
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    tokens: Vec<Token>,
    max_tokens: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, max_tokens: usize) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            tokens: Vec::new(),
            max_tokens,
            line: 1,
            column: 1,
        }
    }

    fn run(&mut self) -> Result<(), LexicalError> {
        while let Some(&(start, ch)) = self.chars.peek() {
            match ch {
                '\n' => {
                    self.chars.next();
                    self.line += 1;
                    self.column = 1;
                }
                // только ASCII-пробелы, включая \v и \f
                ' ' | '\t' | '\r' | '\x0B' | '\x0C' => {
                    self.bump();
                }
                c if c.is_ascii_alphabetic() => {
                    let end = self.take_while(start, |c| c.is_ascii_alphanumeric());
                    let text = &self.source[start..end];
                    let kind = match text {
                        "assert" => TokenKind::KeywordAssert,
                        _ => TokenKind::Identifier,
                    };
                    self.push(kind, start, end)?;
                }
                c if c.is_ascii_digit() => {
                    let end = self.take_while(start, |c| c.is_ascii_digit());
                    self.push(TokenKind::Number, start, end)?;
                }
                '=' => {
                    self.bump();
                    if let Some(&(_, '=')) = self.chars.peek() {
                        self.bump();
                        self.push(TokenKind::Operator(BinaryOperator::Equal), start, start + 2)?;
                    } else {
                        self.push(TokenKind::Assign, start, start + 1)?;
                    }
                }
                '(' => {
                    self.bump();
                    self.push(TokenKind::LParen, start, start + 1)?;
                }
                ')' => {
                    self.bump();
                    self.push(TokenKind::RParen, start, start + 1)?;
                }
                _ => {
                    // `=` never gets here, so only + - * / match
                    let source = self.source;
                    let end = start + ch.len_utf8();
                    let Some(op) = BinaryOperator::from_symbol(&source[start..end]) else {
                        return Err(LexicalError::UnexpectedCharacter {
                            ch,
                            line: self.line,
                            column: self.column,
                        });
                    };
                    self.bump();
                    self.push(TokenKind::Operator(op), start, end)?;
                }
            }
        }

        let end = self.source.len();
        self.push_at(TokenKind::Eof, "EOF", Span::new(self.line, self.column, end, end))
    }

    fn bump(&mut self) {
        self.chars.next();
        self.column += 1;
    }

    /// Consumes the character at `start` and every following one matching `pred`.
    /// Returns the byte offset just past the run.
    fn take_while(&mut self, start: usize, pred: impl Fn(char) -> bool) -> usize {
        let mut end = start;
        if let Some((i, ch)) = self.chars.next() {
            end = i + ch.len_utf8();
        }
        while let Some(&(i, ch)) = self.chars.peek() {
            if !pred(ch) {
                break;
            }
            end = i + ch.len_utf8();
            self.chars.next();
        }
        end
    }

    /// Pushes the lexeme `start..end` positioned at the current column, then
    /// advances the column past it. Operator arms have already bumped, so
    /// their column is rewound first.
    fn push(&mut self, kind: TokenKind, start: usize, end: usize) -> Result<(), LexicalError> {
        let source = self.source;
        let text = &source[start..end];
        let width = text.chars().count();
        let column = match kind {
            TokenKind::Identifier | TokenKind::KeywordAssert | TokenKind::Number => {
                let column = self.column;
                self.column += width;
                column
            }
            _ => self.column - width,
        };
        self.push_at(kind, text, Span::new(self.line, column, start, end))
    }

    fn push_at(&mut self, kind: TokenKind, text: &str, span: Span) -> Result<(), LexicalError> {
        if self.tokens.len() >= self.max_tokens {
            return Err(LexicalError::TokenLimit {
                limit: self.max_tokens,
                line: span.line,
                column: span.column,
            });
        }
        self.tokens.push(Token::new(kind, text, span));
        Ok(())
    }
}
