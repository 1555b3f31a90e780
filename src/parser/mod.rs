// Copyright 2026 The Atlang Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Hand-written recursive descent parser for Atlang.
//!
//! Operator precedence is encoded by rule nesting, lowest binding first:
//!
//! ```text
//! program        := func_def | expr
//! expr           := lambda_expr | expression
//! expression     := if_expr | for_expr | comparison ( (AND|OR) comparison )*
//! comparison     := additive ( (==|!=|>|<|>=|<=) additive )*
//! additive       := multiplicative ( (+|-) multiplicative )*
//! multiplicative := factor ( (*|/|%) factor )*
//! factor         := (+|-|NOT) factor | primary
//! primary        := INT | BOOLEAN
//!                 | IDENTIFIER (call_args)?
//!                 | '(' expr ')' (call_args)?
//!                 | lambda_expr (call_args)?
//! call_args      := '(' (expr (',' expr)*)? ')'
//! func_def       := DEF IDENTIFIER '(' (IDENTIFIER (',' IDENTIFIER)*)? ')' IS expr END
//! if_expr        := IF expression THEN expression
//!                   (ELSEIF expression THEN expression)* (ELSE expression)? END
//! for_expr       := FOR IDENTIFIER IN RANGE '(' expr ',' expr (',' expr)? ')' DO expr END
//! lambda_expr    := LAMBDA '(' IDENTIFIER ')' ':' expr
//! ```
//!
//! All binary levels are left-associative. `if`/`for` are recognized only at
//! `expression` entry, so they cannot appear inside arithmetic without being
//! the whole parenthesized expression. Every rule fails fast: the first error
//! anywhere in the call tree propagates unchanged to the caller.

use crate::ast::{BinaryOp, Expr, Loc, UnaryOp};
use crate::common::{ErrorCode, SourceError, SourceResult};
use crate::token::{Lexer, Position, Spanned, Token};

#[cfg(test)]
mod tests;

/// TokenKind discriminant for efficient peek comparisons without payload matching
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenKind {
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
    Int,
    Boolean,
    Ident,
}

impl<'a> From<&Token<'a>> for TokenKind {
    fn from(token: &Token<'a>) -> Self {
        match token {
            Token::If => TokenKind::If,
            Token::Then => TokenKind::Then,
            Token::ElseIf => TokenKind::ElseIf,
            Token::Else => TokenKind::Else,
            Token::End => TokenKind::End,
            Token::For => TokenKind::For,
            Token::In => TokenKind::In,
            Token::Range => TokenKind::Range,
            Token::Do => TokenKind::Do,
            Token::Def => TokenKind::Def,
            Token::Is => TokenKind::Is,
            Token::Lambda => TokenKind::Lambda,
            Token::Colon => TokenKind::Colon,
            Token::Eq => TokenKind::Eq,
            Token::Neq => TokenKind::Neq,
            Token::Not => TokenKind::Not,
            Token::Lt => TokenKind::Lt,
            Token::Lte => TokenKind::Lte,
            Token::Gt => TokenKind::Gt,
            Token::Gte => TokenKind::Gte,
            Token::And => TokenKind::And,
            Token::Or => TokenKind::Or,
            Token::Plus => TokenKind::Plus,
            Token::Minus => TokenKind::Minus,
            Token::Mul => TokenKind::Mul,
            Token::Div => TokenKind::Div,
            Token::Mod => TokenKind::Mod,
            Token::LParen => TokenKind::LParen,
            Token::RParen => TokenKind::RParen,
            Token::Comma => TokenKind::Comma,
            Token::Int(_) => TokenKind::Int,
            Token::Boolean(_) => TokenKind::Boolean,
            Token::Ident(_) => TokenKind::Ident,
        }
    }
}

/// The continuations the grammar admits after a complete top-level expression.
const CONTINUATION_MSG: &str =
    "Expected '+', '-', '*', '/', '%', '==', '!=', '<', '>', '<=', '>=', 'AND' or 'OR'";

/// What `factor`/`primary` accept at the start of an operand.
const ATOM_EXPECTED: &str = "INT, BOOLEAN, IDENTIFIER, '+', '-', 'NOT', '(', or '@LAMBDA@'";

/// Parser state holding tokenized input
struct Parser<'input> {
    source_name: String,
    tokens: Vec<Spanned<Token<'input>>>,
    pos: usize,
}

impl<'input> Parser<'input> {
    /// Create a new parser from a lexer, collecting all tokens up front.
    /// Returns an error if the lexer produces any errors.
    fn new(lexer: Lexer<'input>) -> SourceResult<Self> {
        let source_name = lexer.source_name().to_string();
        let mut tokens = Vec::new();
        for result in lexer {
            tokens.push(result?);
        }
        Ok(Parser {
            source_name,
            tokens,
            pos: 0,
        })
    }

    /// Peek at the current token without consuming it
    fn peek(&self) -> Option<&Spanned<Token<'input>>> {
        self.tokens.get(self.pos)
    }

    /// Peek at the kind of the current token
    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|(_, tok, _)| TokenKind::from(tok))
    }

    /// Advance to the next token and return the consumed token
    fn advance(&mut self) -> Option<&Spanned<Token<'input>>> {
        if self.pos < self.tokens.len() {
            let tok = &self.tokens[self.pos];
            self.pos += 1;
            Some(tok)
        } else {
            None
        }
    }

    /// Check if we've consumed all tokens
    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Get the position for end-of-input errors
    fn eof_position(&self) -> Position {
        if let Some(&(_, _, end)) = self.tokens.last() {
            end
        } else {
            Position::default()
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

    /// Consume a token of the expected kind, or fail naming `what` — the
    /// construct(s) the grammar admits at this point.
    fn expect(
        &mut self,
        expected: TokenKind,
        what: &str,
    ) -> SourceResult<&Spanned<Token<'input>>> {
        if self.peek_kind() == Some(expected) {
            Ok(self.advance().unwrap())
        } else if let Some(&(start, _, end)) = self.peek() {
            Err(self.error(
                ErrorCode::InvalidSyntax,
                start,
                end,
                format!("Expected {what}"),
            ))
        } else {
            let pos = self.eof_position();
            Err(self.error(
                ErrorCode::UnexpectedEof,
                pos,
                pos,
                format!("Unexpected end of input. Expected {what}"),
            ))
        }
    }

    /// Parse one function definition or one expression, then require
    /// end-of-tokens.
    fn parse_program(&mut self) -> SourceResult<Expr> {
        if self.tokens.is_empty() {
            return Err(self.error(
                ErrorCode::InvalidSyntax,
                Position::default(),
                Position::default(),
                "No tokens to parse",
            ));
        }

        let expr = if self.peek_kind() == Some(TokenKind::Def) {
            self.parse_func_def()?
        } else {
            self.parse_expr()?
        };

        if let Some(&(start, _, end)) = self.peek() {
            return Err(self.error(ErrorCode::ExtraToken, start, end, CONTINUATION_MSG));
        }

        Ok(expr)
    }

    /// Parse a whitespace-separated sequence of top-level statements, each a
    /// function definition or an expression.
    fn parse_statements(&mut self) -> SourceResult<Expr> {
        if self.tokens.is_empty() {
            return Err(self.error(
                ErrorCode::InvalidSyntax,
                Position::default(),
                Position::default(),
                "No tokens to parse",
            ));
        }

        let mut statements = Vec::new();
        while !self.is_at_end() {
            let statement = if self.peek_kind() == Some(TokenKind::Def) {
                self.parse_func_def()?
            } else {
                self.parse_expr()?
            };
            statements.push(statement);
        }

        let first = statements.first().map(Expr::get_loc).unwrap_or_default();
        let last = statements.last().map(Expr::get_loc).unwrap_or_default();
        Ok(Expr::List(statements, Loc::new(first.start, last.end)))
    }

    /// Parse any expression position: a lambda or an `expression`
    fn parse_expr(&mut self) -> SourceResult<Expr> {
        if self.peek_kind() == Some(TokenKind::Lambda) {
            self.parse_lambda()
        } else {
            self.parse_expression()
        }
    }

    /// Parse an if/for form or a logical chain (AND/OR) — lowest precedence
    fn parse_expression(&mut self) -> SourceResult<Expr> {
        match self.peek_kind() {
            Some(TokenKind::If) => return self.parse_if(),
            Some(TokenKind::For) => return self.parse_for(),
            _ => {}
        }

        let mut left = self.parse_comparison()?;

        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::And) => BinaryOp::And,
                Some(TokenKind::Or) => BinaryOp::Or,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            let loc = left.get_loc().union(&right.get_loc());
            left = Expr::Op2(op, Box::new(left), Box::new(right), loc);
        }

        Ok(left)
    }

    /// Parse comparison operators (==, !=, <, <=, >, >=)
    fn parse_comparison(&mut self) -> SourceResult<Expr> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Eq) => BinaryOp::Eq,
                Some(TokenKind::Neq) => BinaryOp::Neq,
                Some(TokenKind::Lt) => BinaryOp::Lt,
                Some(TokenKind::Lte) => BinaryOp::Lte,
                Some(TokenKind::Gt) => BinaryOp::Gt,
                Some(TokenKind::Gte) => BinaryOp::Gte,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            let loc = left.get_loc().union(&right.get_loc());
            left = Expr::Op2(op, Box::new(left), Box::new(right), loc);
        }

        Ok(left)
    }

    /// Parse additive operators (+, -)
    fn parse_additive(&mut self) -> SourceResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            let loc = left.get_loc().union(&right.get_loc());
            left = Expr::Op2(op, Box::new(left), Box::new(right), loc);
        }

        Ok(left)
    }

    /// Parse multiplicative operators (*, /, %)
    fn parse_multiplicative(&mut self) -> SourceResult<Expr> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Mul) => BinaryOp::Mul,
                Some(TokenKind::Div) => BinaryOp::Div,
                Some(TokenKind::Mod) => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            let loc = left.get_loc().union(&right.get_loc());
            left = Expr::Op2(op, Box::new(left), Box::new(right), loc);
        }

        Ok(left)
    }

    /// Parse unary operators (+, -, NOT); they recurse on themselves so any
    /// number of prefixes stack.
    fn parse_factor(&mut self) -> SourceResult<Expr> {
        let op = match self.peek_kind() {
            Some(TokenKind::Plus) => Some(UnaryOp::Positive),
            Some(TokenKind::Minus) => Some(UnaryOp::Negative),
            Some(TokenKind::Not) => Some(UnaryOp::Not),
            _ => None,
        };

        match op {
            Some(op) => {
                let (lpos, _, _) = *self.advance().unwrap();
                let operand = self.parse_factor()?;
                let loc = Loc::new(lpos, operand.get_loc().end);
                Ok(Expr::Op1(op, Box::new(operand), loc))
            }
            None => self.parse_primary(),
        }
    }

    /// Parse an atomic expression, with one optional argument-list suffix on
    /// each of the callable forms (identifier, parenthesized expression,
    /// lambda).
    fn parse_primary(&mut self) -> SourceResult<Expr> {
        match self.peek_kind() {
            Some(TokenKind::Int) => {
                let (lpos, tok, rpos) = *self.advance().unwrap();
                if let Token::Int(n) = tok {
                    Ok(Expr::Const(n, Loc::new(lpos, rpos)))
                } else {
                    unreachable!()
                }
            }
            Some(TokenKind::Boolean) => {
                let (lpos, tok, rpos) = *self.advance().unwrap();
                if let Token::Boolean(b) = tok {
                    Ok(Expr::Boolean(b, Loc::new(lpos, rpos)))
                } else {
                    unreachable!()
                }
            }
            Some(TokenKind::Ident) => {
                let (lpos, tok, rpos) = *self.advance().unwrap();
                if let Token::Ident(name) = tok {
                    let var = Expr::Var(name.to_string(), Loc::new(lpos, rpos));
                    if self.peek_kind() == Some(TokenKind::LParen) {
                        self.parse_call_args(var)
                    } else {
                        Ok(var)
                    }
                } else {
                    unreachable!()
                }
            }
            Some(TokenKind::LParen) => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;

                // a parenthesized expression immediately followed by '('
                // is itself called
                if self.peek_kind() == Some(TokenKind::LParen) {
                    self.parse_call_args(expr)
                } else {
                    Ok(expr)
                }
            }
            Some(TokenKind::Lambda) => {
                let lambda = self.parse_lambda()?;
                if self.peek_kind() == Some(TokenKind::LParen) {
                    self.parse_call_args(lambda)
                } else {
                    Ok(lambda)
                }
            }
            Some(_) => {
                let &(start, _, end) = self.peek().unwrap();
                Err(self.error(
                    ErrorCode::InvalidSyntax,
                    start,
                    end,
                    format!("Expected {ATOM_EXPECTED}"),
                ))
            }
            None => {
                let pos = self.eof_position();
                Err(self.error(
                    ErrorCode::UnexpectedEof,
                    pos,
                    pos,
                    format!("Unexpected end of input. Expected {ATOM_EXPECTED}"),
                ))
            }
        }
    }

    /// Parse an argument list and apply it to `callee`
    fn parse_call_args(&mut self, callee: Expr) -> SourceResult<Expr> {
        self.expect(TokenKind::LParen, "'('")?;

        let mut args = Vec::new();
        if self.peek_kind() == Some(TokenKind::RParen) {
            self.advance();
        } else {
            args.push(self.parse_expr()?);
            while self.peek_kind() == Some(TokenKind::Comma) {
                self.advance();
                args.push(self.parse_expr()?);
            }
            self.expect(TokenKind::RParen, "',' or ')'")?;
        }

        let start = callee.get_loc().start;
        let end = match args.last() {
            Some(arg) => arg.get_loc().end,
            None => callee.get_loc().end,
        };
        Ok(Expr::App(Box::new(callee), args, Loc::new(start, end)))
    }

    /// func_def := DEF IDENTIFIER '(' (IDENTIFIER (',' IDENTIFIER)*)? ')' IS expr END
    fn parse_func_def(&mut self) -> SourceResult<Expr> {
        self.expect(TokenKind::Def, "'@DEF@'")?;

        let (name_pos, name_tok, _) = *self.expect(TokenKind::Ident, "identifier")?;
        let name = if let Token::Ident(s) = name_tok {
            s.to_string()
        } else {
            unreachable!()
        };

        self.expect(TokenKind::LParen, "'('")?;

        let mut params = Vec::new();
        if self.peek_kind() == Some(TokenKind::Ident) {
            let (_, tok, _) = *self.advance().unwrap();
            if let Token::Ident(s) = tok {
                params.push(s.to_string());
            } else {
                unreachable!()
            }

            while self.peek_kind() == Some(TokenKind::Comma) {
                self.advance();
                let (_, tok, _) = *self.expect(TokenKind::Ident, "identifier")?;
                if let Token::Ident(s) = tok {
                    params.push(s.to_string());
                } else {
                    unreachable!()
                }
            }
        }

        if params.is_empty() {
            self.expect(TokenKind::RParen, "identifier or ')'")?;
        } else {
            self.expect(TokenKind::RParen, "',' or ')'")?;
        }

        self.expect(TokenKind::Is, "'@IS@'")?;
        let body = self.parse_expr()?;
        self.expect(TokenKind::End, "'@END@'")?;

        let loc = Loc::new(name_pos, body.get_loc().end);
        Ok(Expr::FnDef(name, params, Box::new(body), loc))
    }

    /// if_expr := IF expression THEN expression
    ///            (ELSEIF expression THEN expression)* (ELSE expression)? END
    fn parse_if(&mut self) -> SourceResult<Expr> {
        self.expect(TokenKind::If, "'@IF@'")?;

        let mut cases = Vec::new();
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Then, "'@THEN@'")?;
        let body = self.parse_expression()?;
        cases.push((condition, body));

        while self.peek_kind() == Some(TokenKind::ElseIf) {
            self.advance();
            let condition = self.parse_expression()?;
            self.expect(TokenKind::Then, "'@THEN@'")?;
            let body = self.parse_expression()?;
            cases.push((condition, body));
        }

        let mut else_case = None;
        if self.peek_kind() == Some(TokenKind::Else) {
            self.advance();
            else_case = Some(Box::new(self.parse_expression()?));
        }

        self.expect(TokenKind::End, "'@END@' at the end of IF expression")?;

        let start = cases[0].0.get_loc().start;
        let end = match &else_case {
            Some(else_case) => else_case.get_loc().end,
            None => cases.last().unwrap().1.get_loc().end,
        };
        Ok(Expr::If(cases, else_case, Loc::new(start, end)))
    }

    /// for_expr := FOR IDENTIFIER IN RANGE '(' expr ',' expr (',' expr)? ')' DO expr END
    fn parse_for(&mut self) -> SourceResult<Expr> {
        self.expect(TokenKind::For, "'@FOR@'")?;

        let (var_pos, var_tok, _) = *self.expect(TokenKind::Ident, "identifier")?;
        let var = if let Token::Ident(s) = var_tok {
            s.to_string()
        } else {
            unreachable!()
        };

        self.expect(TokenKind::In, "'@IN@'")?;
        self.expect(TokenKind::Range, "'@RANGE@'")?;
        self.expect(TokenKind::LParen, "'('")?;

        let start_expr = self.parse_expr()?;
        self.expect(TokenKind::Comma, "','")?;
        let end_expr = self.parse_expr()?;

        let mut step = None;
        if self.peek_kind() == Some(TokenKind::Comma) {
            self.advance();
            step = Some(Box::new(self.parse_expr()?));
        }

        if step.is_some() {
            self.expect(TokenKind::RParen, "')'")?;
        } else {
            self.expect(TokenKind::RParen, "',' or ')'")?;
        }

        self.expect(TokenKind::Do, "'@DO@'")?;
        let body = self.parse_expr()?;
        self.expect(TokenKind::End, "'@END@'")?;

        let loc = Loc::new(var_pos, body.get_loc().end);
        Ok(Expr::For(
            var,
            Box::new(start_expr),
            Box::new(end_expr),
            step,
            Box::new(body),
            loc,
        ))
    }

    /// lambda_expr := LAMBDA '(' IDENTIFIER ')' ':' expr
    fn parse_lambda(&mut self) -> SourceResult<Expr> {
        self.expect(TokenKind::Lambda, "'@LAMBDA@'")?;
        self.expect(TokenKind::LParen, "'('")?;

        let (param_pos, param_tok, _) = *self.expect(TokenKind::Ident, "identifier")?;
        let param = if let Token::Ident(s) = param_tok {
            s.to_string()
        } else {
            unreachable!()
        };

        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::Colon, "'@:@'")?;
        let body = self.parse_expr()?;

        let loc = Loc::new(param_pos, body.get_loc().end);
        Ok(Expr::Lambda(vec![param], Box::new(body), loc))
    }
}

/// Parse one top-level form — a function definition or an expression — from
/// `text`, requiring that nothing follows it.
pub fn parse(source_name: &str, text: &str) -> SourceResult<Expr> {
    let lexer = Lexer::new(source_name, text);
    let mut parser = Parser::new(lexer)?;
    parser.parse_program()
}

/// Parse a script: a sequence of top-level statements (function definitions
/// and expressions), returned as an [`Expr::List`].
pub fn parse_script(source_name: &str, text: &str) -> SourceResult<Expr> {
    let lexer = Lexer::new(source_name, text);
    let mut parser = Parser::new(lexer)?;
    parser.parse_statements()
}
