//! SQL lexer.
//!
//! The [`Lexer`] converts an input string into a stream of [`Token`]s:
//! case-insensitive keywords, identifiers, integer literals, double-quoted
//! string literals (the dialect's string syntax), operators, punctuation,
//! and `--` line comments. Lexical errors are returned as
//! `TokenKind::Error` tokens rather than being accumulated separately.

use super::error::Span;
use super::token::{Token, TokenKind};

/// Tokenizer implementing `Iterator<Item = Token>`. The final token is
/// always `Eof`, after which the iterator is exhausted.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    eof_returned: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            eof_returned: false,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if let Some(ch) = self.peek(0) {
                self.pos += ch.len_utf8();
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek(0).is_some_and(|ch| ch.is_whitespace()) {
                self.advance(1);
            }
            if self.input[self.pos..].starts_with("--") {
                while let Some(ch) = self.peek(0) {
                    self.advance(1);
                    if ch == '\n' {
                        break;
                    }
                }
                continue;
            }
            return;
        }
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start = self.pos;
        let ch = match self.peek(0) {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, Span::at(start)),
        };

        if ch == '"' {
            return self.scan_string_literal();
        }
        if ch.is_ascii_digit() {
            return self.scan_number();
        }
        if is_ident_start(ch) {
            return self.scan_identifier_or_keyword();
        }
        self.scan_operator_or_punctuation()
    }

    fn scan_string_literal(&mut self) -> Token {
        let start = self.pos;
        self.advance(1); // opening quote

        let mut value = String::new();
        loop {
            match self.peek(0) {
                None => {
                    return Token::new(
                        TokenKind::Error("unterminated string literal".to_string()),
                        Span::new(start, self.pos),
                    );
                }
                Some('"') => {
                    self.advance(1);
                    break;
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance(1);
                }
            }
        }
        Token::new(TokenKind::StringLit(value), Span::new(start, self.pos))
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        while self.peek(0).is_some_and(|ch| ch.is_ascii_digit()) {
            self.advance(1);
        }
        let span = Span::new(start, self.pos);
        match self.input[start..self.pos].parse::<i32>() {
            Ok(n) => Token::new(TokenKind::IntegerLit(n), span),
            Err(_) => Token::new(TokenKind::Error("invalid integer literal".to_string()), span),
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while self.peek(0).is_some_and(is_ident_continue) {
            self.advance(1);
        }
        let word = &self.input[start..self.pos];
        let span = Span::new(start, self.pos);
        match TokenKind::from_keyword(word) {
            Some(kind) => Token::new(kind, span),
            None => Token::new(TokenKind::Identifier(word.to_string()), span),
        }
    }

    fn scan_operator_or_punctuation(&mut self) -> Token {
        let start = self.pos;
        let ch = match self.peek(0) {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, Span::at(start)),
        };
        self.advance(1);
        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '=' => TokenKind::Eq,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            _ => TokenKind::Error(format!("unexpected character '{ch}'")),
        };
        Token::new(kind, Span::new(start, self.pos))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof_returned {
            return None;
        }
        let token = self.scan_token();
        if token.is_eof() {
            self.eof_returned = true;
        }
        Some(token)
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
