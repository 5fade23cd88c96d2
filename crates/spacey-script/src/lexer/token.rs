// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Token definitions for the script lexer.

use spacey_macros::js_keywords;
use std::fmt;

/// A span in the source code, representing a range of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// 1-based line of the first character
    pub line: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }
}

js_keywords! {
    /// Reserved words recognised by the scanner
    Keyword {
        "const" => Const,
        "else" => Else,
        "false" => False,
        "function" => Function,
        "if" => If,
        "let" => Let,
        "null" => Null,
        "return" => Return,
        "this" => This,
        "true" => True,
        "typeof" => Typeof,
        "var" => Var,
    }
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source code
    pub span: Span,
    /// Whether a line break separates this token from the previous one
    pub newline_before: bool,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span, newline_before: bool) -> Self {
        Self {
            kind,
            span,
            newline_before,
        }
    }
}

/// The different kinds of tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal
    Number(f64),
    /// String literal (escapes already processed)
    String(String),
    /// Identifier
    Identifier(String),
    /// Reserved word
    Keyword(Keyword),

    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ;
    Semicolon,
    /// ,
    Comma,
    /// :
    Colon,
    /// .
    Dot,

    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// !
    Bang,
    /// =
    Equal,
    /// ==
    EqualEqual,
    /// ===
    StrictEqual,
    /// !=
    NotEqual,
    /// !==
    StrictNotEqual,
    /// <
    LessThan,
    /// <=
    LessThanEqual,
    /// >
    GreaterThan,
    /// >=
    GreaterThanEqual,
    /// &&
    AmpersandAmpersand,
    /// ||
    PipePipe,
    /// ||=
    PipePipeEqual,
    /// =>
    Arrow,

    /// Unterminated literal or unknown character
    Invalid(String),
    /// End of input
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Number(n) => return write!(f, "{}", spacey_value::value::number_to_string(*n)),
            TokenKind::String(s) => return write!(f, "'{}'", s),
            TokenKind::Identifier(name) => return write!(f, "{}", name),
            TokenKind::Keyword(keyword) => return write!(f, "{}", keyword),
            TokenKind::Invalid(text) => return write!(f, "{}", text),
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::StrictEqual => "===",
            TokenKind::NotEqual => "!=",
            TokenKind::StrictNotEqual => "!==",
            TokenKind::LessThan => "<",
            TokenKind::LessThanEqual => "<=",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterThanEqual => ">=",
            TokenKind::AmpersandAmpersand => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::PipePipeEqual => "||=",
            TokenKind::Arrow => "=>",
            TokenKind::Eof => "end of input",
        };
        write!(f, "{}", text)
    }
}
