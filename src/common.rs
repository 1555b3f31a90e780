// Copyright 2026 The Atlang Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

use crate::token::Position;

/// An identifier as it appears in source. Identifiers are case-sensitive
/// and are never normalized.
pub type Ident = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    IllegalChar,
    InvalidToken,
    UnclosedMarker,
    IntOutOfRange,
    InvalidSyntax,
    UnexpectedEof,
    ExtraToken,
}

impl ErrorCode {
    /// Whether this code is produced by the lexer or the parser.
    pub fn kind(&self) -> ErrorKind {
        use ErrorCode::*;
        match self {
            IllegalChar | InvalidToken | UnclosedMarker | IntOutOfRange => ErrorKind::Lexical,
            InvalidSyntax | UnexpectedEof | ExtraToken => ErrorKind::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            IllegalChar => "illegal_char",
            InvalidToken => "invalid_token",
            UnclosedMarker => "unclosed_marker",
            IntOutOfRange => "int_out_of_range",
            InvalidSyntax => "invalid_syntax",
            UnexpectedEof => "unexpected_eof",
            ExtraToken => "extra_token",
        };

        write!(f, "{name}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self {
            ErrorKind::Lexical => "lexical error",
            ErrorKind::Syntax => "syntax error",
        };
        write!(f, "{kind}")
    }
}

/// A diagnostic produced by the lexer or parser: a half-open source span,
/// an error code, and a message naming the valid continuations at that point.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceError {
    pub code: ErrorCode,
    pub start: Position,
    pub end: Position,
    pub details: String,
    pub source_name: String,
}

impl SourceError {
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.source_name, self.start, self.code, self.details
        )
    }
}

impl error::Error for SourceError {}

pub type SourceResult<T> = result::Result<T, SourceError>;

#[test]
fn test_error_display() {
    let err = SourceError {
        code: ErrorCode::InvalidSyntax,
        start: Position {
            index: 4,
            line: 0,
            column: 4,
        },
        end: Position {
            index: 5,
            line: 0,
            column: 5,
        },
        details: "Expected ')'".to_string(),
        source_name: "repl".to_string(),
    };
    assert_eq!(ErrorKind::Syntax, err.kind());
    assert_eq!("repl:0:4: invalid_syntax: Expected ')'", format!("{err}"));
}
