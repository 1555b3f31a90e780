// Copyright 2026 The Atlang Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Front end for Atlang, a small expression-oriented language whose keywords
//! and multi-character operators are `@…@` marker blocks rather than
//! whitespace-delimited words:
//!
//! ```text
//! @DEF@ add(x, y) @IS@ x @+@ y @END@
//! @IF@ n @<@ 0 @THEN@ 0 @ELSE@ n @END@
//! (@LAMBDA@(x) @:@ x @*@ x)(4)
//! ```
//!
//! The crate turns source text into a positioned token stream
//! ([`tokenize`]) and then into an AST ([`parse`], [`parse_script`]), or
//! fails with a [`SourceError`] carrying a half-open source span and a
//! message naming the valid continuations. Evaluation is out of scope: the
//! AST ([`Expr`]) is the hand-off point for any downstream consumer.
//!
//! ```
//! use atlang_core::parse;
//!
//! let ast = parse("example", "5 @+@ 3 @*@ 2").unwrap();
//! assert_eq!("(5 @+@ (3 @*@ 2))", ast.to_string());
//! ```

#![forbid(unsafe_code)]

pub mod ast;
pub mod common;
pub mod parser;
pub mod token;

pub use self::ast::{BinaryOp, Expr, Loc, UnaryOp};
pub use self::common::{ErrorCode, ErrorKind, Ident, SourceError, SourceResult};
pub use self::parser::{parse, parse_script};
pub use self::token::{Lexer, Position, Spanned, Token, tokenize};
