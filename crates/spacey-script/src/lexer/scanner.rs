// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The scanner that produces tokens from source text.

use super::token::{Keyword, Span, Token, TokenKind};
use spacey_macros::{is_id_continue, is_id_start};

/// A scanner that tokenizes script source code.
///
/// Cloning a scanner is cheap and gives an independent cursor, which the
/// parser uses to look ahead for arrow functions.
#[derive(Clone)]
pub struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: usize,
    saw_newline: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            saw_newline: false,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.saw_newline = false;
        self.skip_whitespace_and_comments();

        let start = self.current_pos;
        let line = self.line;
        let newline_before = self.saw_newline;

        let Some((_, ch)) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::new(start, start, line), newline_before);
        };

        let kind = match ch {
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,

            '.' => self.scan_dot(),
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '=' => self.scan_equal(),
            '!' => self.scan_bang(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_pipe(),

            '"' | '\'' => self.scan_string(ch),
            '0'..='9' => self.scan_number(ch),
            _ if is_id_start!(ch) => self.scan_identifier(ch),

            _ => TokenKind::Invalid(ch.to_string()),
        };

        Token::new(kind, Span::new(start, self.current_pos, line), newline_before)
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.current_pos = pos + ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.saw_newline = true;
            }
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().map(|(_, ch)| ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') => match self.peek_next() {
                    Some('/') => {
                        while let Some(ch) = self.peek() {
                            if ch == '\n' {
                                break;
                            }
                            self.advance();
                        }
                    }
                    Some('*') => {
                        self.advance();
                        self.advance();
                        let mut prev = ' ';
                        while let Some((_, ch)) = self.advance() {
                            if prev == '*' && ch == '/' {
                                break;
                            }
                            prev = ch;
                        }
                    }
                    _ => break,
                },
                _ => break,
            }
        }
    }

    fn scan_dot(&mut self) -> TokenKind {
        // `.5` is a number, `a.b` is member access
        match self.peek() {
            Some(ch) if ch.is_ascii_digit() => {
                let digits = self.take_while(|c| c.is_ascii_digit());
                parse_number(&format!("0.{}", digits))
            }
            _ => TokenKind::Dot,
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        if self.eat('=') {
            TokenKind::LessThanEqual
        } else {
            TokenKind::LessThan
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        if self.eat('=') {
            TokenKind::GreaterThanEqual
        } else {
            TokenKind::GreaterThan
        }
    }

    fn scan_equal(&mut self) -> TokenKind {
        match self.peek() {
            Some('=') => {
                self.advance();
                if self.eat('=') {
                    TokenKind::StrictEqual
                } else {
                    TokenKind::EqualEqual
                }
            }
            Some('>') => {
                self.advance();
                TokenKind::Arrow
            }
            _ => TokenKind::Equal,
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        if self.eat('=') {
            if self.eat('=') {
                TokenKind::StrictNotEqual
            } else {
                TokenKind::NotEqual
            }
        } else {
            TokenKind::Bang
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        if self.eat('&') {
            TokenKind::AmpersandAmpersand
        } else {
            TokenKind::Invalid("&".into())
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        if self.eat('|') {
            if self.eat('=') {
                TokenKind::PipePipeEqual
            } else {
                TokenKind::PipePipe
            }
        } else {
            TokenKind::Invalid("|".into())
        }
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        let mut value = String::new();

        loop {
            match self.advance() {
                None | Some((_, '\n')) => return TokenKind::Invalid(format!("{}{}", quote, value)),
                Some((_, ch)) if ch == quote => break,
                Some((_, '\\')) => match self.advance() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, '0')) => value.push('\0'),
                    Some((_, 'x')) => match self.scan_hex_escape(2) {
                        Some(ch) => value.push(ch),
                        None => return TokenKind::Invalid("\\x".into()),
                    },
                    Some((_, 'u')) => match self.scan_hex_escape(4) {
                        Some(ch) => value.push(ch),
                        None => return TokenKind::Invalid("\\u".into()),
                    },
                    // line continuation
                    Some((_, '\n')) => {}
                    Some((_, escaped)) => value.push(escaped),
                    None => return TokenKind::Invalid(format!("{}{}", quote, value)),
                },
                Some((_, ch)) => value.push(ch),
            }
        }

        TokenKind::String(value)
    }

    fn scan_hex_escape(&mut self, len: usize) -> Option<char> {
        let mut digits = String::with_capacity(len);
        for _ in 0..len {
            match self.peek() {
                Some(ch) if ch.is_ascii_hexdigit() => {
                    digits.push(ch);
                    self.advance();
                }
                _ => return None,
            }
        }
        u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
    }

    fn scan_number(&mut self, first: char) -> TokenKind {
        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            let digits = self.take_while(|c| c.is_ascii_hexdigit());
            return match u64::from_str_radix(&digits, 16) {
                Ok(n) => TokenKind::Number(n as f64),
                Err(_) => TokenKind::Invalid(format!("0x{}", digits)),
            };
        }

        let mut value = String::from(first);
        value.push_str(&self.take_while(|c| c.is_ascii_digit()));

        if self.peek() == Some('.') && self.peek_next().is_none_or(|c| !is_id_start!(c)) {
            self.advance();
            value.push('.');
            value.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            value.push('e');
            if let Some(sign @ ('+' | '-')) = self.peek() {
                self.advance();
                value.push(sign);
            }
            value.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }

        parse_number(&value)
    }

    fn scan_identifier(&mut self, first: char) -> TokenKind {
        let mut name = String::from(first);
        name.push_str(&self.take_while(|c| is_id_continue!(c)));

        match Keyword::lookup(&name) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(name),
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            taken.push(ch);
            self.advance();
        }
        taken
    }
}

fn parse_number(text: &str) -> TokenKind {
    match text.parse::<f64>() {
        Ok(n) => TokenKind::Number(n),
        Err(_) => TokenKind::Invalid(text.to_string()),
    }
}
