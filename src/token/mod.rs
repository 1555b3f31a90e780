// Copyright 2026 The Atlang Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Tokenizer for Atlang source text.
//!
//! Keywords and multi-character operators are `@…@` marker blocks
//! (`@IF@`, `@<=@`); the only bare lexemes are integer literals,
//! identifiers, and the `(` `)` `,` punctuation.

use lazy_static::lazy_static;
use regex::Regex;

use self::Token::*;
use crate::common::{ErrorCode, SourceError, SourceResult};


/// A cursor into source text: byte offset plus zero-based line and column.
///
/// The cursor always points at the next unconsumed character; an index equal
/// to the text length means end of input. Snapshots are taken by plain copy
/// wherever a span boundary needs to be remembered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub index: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Step the cursor past `c`, keeping line and column consistent with
    /// the characters consumed so far.
    pub fn advance(&mut self, c: char) {
        self.index += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[test]
fn test_position_advance() {
    let mut pos = Position::default();
    pos.advance('a');
    assert_eq!(
        Position {
            index: 1,
            line: 0,
            column: 1
        },
        pos
    );
    pos.advance('\n');
    assert_eq!(
        Position {
            index: 2,
            line: 1,
            column: 0
        },
        pos
    );
    pos.advance('é');
    assert_eq!(
        Position {
            index: 4,
            line: 1,
            column: 1
        },
        pos
    );
}

/// A value with the half-open source span it was read from.
pub type Spanned<T> = (Position, T, Position);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'input> {
    If,
    Then,
    ElseIf,
    Else,
    End,
    For,
    In,
    Range,
    Do,
    Def,
    Is,
    Lambda,
    Colon,
    Eq,
    Neq,
    Not,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    LParen,
    RParen,
    Comma,
    Int(i64),
    Boolean(bool),
    Ident(&'input str),
}

const KEYWORDS: &[(&str, Token<'static>)] = &[
    ("@TRUE@", Boolean(true)),
    ("@FALSE@", Boolean(false)),
    ("@DEF@", Def),
    ("@IS@", Is),
    ("@END@", End),
    ("@LAMBDA@", Lambda),
    ("@:@", Colon),
    ("@IF@", If),
    ("@THEN@", Then),
    ("@ELSEIF@", ElseIf),
    ("@ELSE@", Else),
    ("@FOR@", For),
    ("@IN@", In),
    ("@RANGE@", Range),
    ("@DO@", Do),
];

const OPERATORS: &[(&str, Token<'static>)] = &[
    ("@+@", Plus),
    ("@-@", Minus),
    ("@*@", Mul),
    ("@/@", Div),
    ("@%@", Mod),
    ("@==@", Eq),
    ("@!=@", Neq),
    ("@NOT@", Not),
    ("@<@", Lt),
    ("@<=@", Lte),
    ("@>@", Gt),
    ("@>=@", Gte),
    ("@&@", And),
    ("@|@", Or),
];

fn lookup(table: &[(&str, Token<'static>)], lexeme: &str) -> Option<Token<'static>> {
    table
        .iter()
        .filter(|&&(w, _)| w == lexeme)
        .map(|&(_, t)| t)
        .next()
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub struct Lexer<'input> {
    source_name: String,
    text: &'input str,
    pos: Position,
    lookahead: Option<char>,
}

impl<'input> Lexer<'input> {
    pub fn new(source_name: &str, text: &'input str) -> Self {
        Lexer {
            source_name: source_name.to_string(),
            text,
            pos: Position::default(),
            lookahead: text.chars().next(),
        }
    }

    pub(crate) fn source_name(&self) -> &str {
        &self.source_name
    }

    fn bump(&mut self) {
        if let Some(c) = self.lookahead {
            self.pos.advance(c);
            self.lookahead = self.text[self.pos.index..].chars().next();
        }
    }

    /// The character after the current one, used only to tell a
    /// `-`-prefixed integer literal apart from a stray `-`.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.text[self.pos.index..].chars();
        chars.next();
        chars.next()
    }

    fn take_while<F>(&mut self, mut keep_going: F)
    where
        F: FnMut(char) -> bool,
    {
        while matches!(self.lookahead, Some(c) if keep_going(c)) {
            self.bump();
        }
    }

    fn error(
        &self,
        code: ErrorCode,
        start: Position,
        end: Position,
        details: impl Into<String>,
    ) -> SourceError {
        SourceError {
            code,
            start,
            end,
            details: details.into(),
            source_name: self.source_name.clone(),
        }
    }

    /// Scan a maximal digit run, with an optional leading `-` when the
    /// dispatch in `next` saw a digit immediately after it.
    fn number(&mut self) -> SourceResult<Spanned<Token<'input>>> {
        lazy_static! {
            static ref NUMBER_RE: Regex = Regex::new(r"^-?[0-9]+").unwrap();
        }

        let start = self.pos;
        let m = NUMBER_RE.find(&self.text[start.index..]).unwrap();
        for _ in 0..m.end() {
            self.bump();
        }

        let end = self.pos;
        let lit = &self.text[start.index..end.index];
        match lit.parse::<i64>() {
            Ok(n) => Ok((start, Int(n), end)),
            Err(_) => Err(self.error(
                ErrorCode::IntOutOfRange,
                start,
                end,
                format!("integer literal '{lit}' out of range"),
            )),
        }
    }

    /// Scan a maximal letter run. Keywords are marker blocks, never bare
    /// words, so every letter run is an identifier.
    fn identifierish(&mut self) -> Spanned<Token<'input>> {
        let start = self.pos;
        self.take_while(is_identifier_char);
        let end = self.pos;
        (start, Ident(&self.text[start.index..end.index]), end)
    }

    /// Scan a `@…@` marker block and resolve it against the keyword table
    /// first, then the operator table.
    fn marker(&mut self) -> SourceResult<Spanned<Token<'input>>> {
        let start = self.pos;
        self.bump(); // the leading '@'
        self.take_while(|c| c != '@');

        if self.lookahead.is_none() {
            return Err(self.error(
                ErrorCode::UnclosedMarker,
                start,
                self.pos,
                "Unclosed marker block; expected a closing '@'",
            ));
        }
        self.bump(); // the closing '@'

        let end = self.pos;
        let lexeme = &self.text[start.index..end.index];
        match lookup(KEYWORDS, lexeme).or_else(|| lookup(OPERATORS, lexeme)) {
            Some(tok) => Ok((start, tok, end)),
            None => Err(self.error(
                ErrorCode::InvalidToken,
                start,
                end,
                "Invalid token starting with '@'",
            )),
        }
    }

    fn consume(&mut self, tok: Token<'input>) -> Spanned<Token<'input>> {
        let start = self.pos;
        self.bump();
        (start, tok, self.pos)
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = SourceResult<Spanned<Token<'input>>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            return match self.lookahead {
                Some(' ') | Some('\t') => {
                    self.bump();
                    continue;
                }
                Some(c) if c.is_ascii_digit() => Some(self.number()),
                Some('-') if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => {
                    Some(self.number())
                }
                Some(c) if is_identifier_char(c) => Some(Ok(self.identifierish())),
                Some('@') => Some(self.marker()),
                Some('(') => Some(Ok(self.consume(LParen))),
                Some(')') => Some(Ok(self.consume(RParen))),
                Some(',') => Some(Ok(self.consume(Comma))),
                Some(c) => {
                    let start = self.pos;
                    self.bump();
                    Some(Err(self.error(
                        ErrorCode::IllegalChar,
                        start,
                        self.pos,
                        format!("'{c}'"),
                    )))
                }
                None => None,
            };
        }
    }
}

/// Tokenize `text` into a spanned token sequence.
///
/// Tokenization is all-or-nothing: the first lexical error is returned and
/// no partial token sequence is produced.
pub fn tokenize<'input>(
    source_name: &str,
    text: &'input str,
) -> SourceResult<Vec<Spanned<Token<'input>>>> {
    Lexer::new(source_name, text).collect()
}
