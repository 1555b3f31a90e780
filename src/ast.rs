// Copyright 2026 The Atlang Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! AST node model: a closed sum type over every construct the grammar can
//! produce, each variant carrying the span it was parsed from.

use std::fmt;

use crate::common::Ident;
use crate::token::Position;

/// Loc describes a source region by its start and end positions. Spans are
/// half-open and are used only for diagnostics, never for evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Loc {
    pub start: Position,
    pub end: Position,
}

impl Loc {
    pub fn new(start: Position, end: Position) -> Self {
        Loc { start, end }
    }

    /// union takes a second Loc and returns the range from the start of the
    /// earlier span to the end of the later span.
    pub fn union(&self, rhs: &Self) -> Self {
        Loc {
            start: if rhs.start.index < self.start.index {
                rhs.start
            } else {
                self.start
            },
            end: if rhs.end.index > self.end.index {
                rhs.end
            } else {
                self.end
            },
        }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[test]
fn test_loc_basics() {
    fn pos(index: usize) -> Position {
        Position {
            index,
            line: 0,
            column: index as u32,
        }
    }

    let a = Loc::new(pos(3), pos(7));
    let b = Loc::new(pos(4), pos(11));
    assert_eq!(Loc::new(pos(3), pos(11)), a.union(&b));

    let c = Loc::new(pos(1), pos(5));
    assert_eq!(Loc::new(pos(1), pos(7)), a.union(&c));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Positive,
    Negative,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lexeme = match self {
            UnaryOp::Positive => "@+@",
            UnaryOp::Negative => "@-@",
            UnaryOp::Not => "@NOT@",
        };
        write!(f, "{lexeme}")
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lexeme = match self {
            BinaryOp::Add => "@+@",
            BinaryOp::Sub => "@-@",
            BinaryOp::Mul => "@*@",
            BinaryOp::Div => "@/@",
            BinaryOp::Mod => "@%@",
            BinaryOp::Eq => "@==@",
            BinaryOp::Neq => "@!=@",
            BinaryOp::Lt => "@<@",
            BinaryOp::Lte => "@<=@",
            BinaryOp::Gt => "@>@",
            BinaryOp::Gte => "@>=@",
            BinaryOp::And => "@&@",
            BinaryOp::Or => "@|@",
        };
        write!(f, "{lexeme}")
    }
}

// We use Boxes here because consumers may walk and rewrite trees, and
// subexpression sharing is never wanted: every node is owned by exactly
// one parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Const(i64, Loc),
    Boolean(bool, Loc),
    Var(Ident, Loc),
    Op1(UnaryOp, Box<Expr>, Loc),
    Op2(BinaryOp, Box<Expr>, Box<Expr>, Loc),
    /// Ordered (condition, body) cases, one per `@IF@`/`@ELSEIF@` branch,
    /// plus an optional `@ELSE@` body.
    If(Vec<(Expr, Expr)>, Option<Box<Expr>>, Loc),
    /// Loop variable, start, end, optional step (the default step is an
    /// evaluator concern and is carried as `None`), body.
    For(Ident, Box<Expr>, Box<Expr>, Option<Box<Expr>>, Box<Expr>, Loc),
    FnDef(Ident, Vec<Ident>, Box<Expr>, Loc),
    /// A call. The callee is itself a node: an identifier, a lambda, or a
    /// parenthesized expression.
    App(Box<Expr>, Vec<Expr>, Loc),
    /// The grammar restricts lambdas to a single parameter; the parameter
    /// list stays a `Vec` so an evaluator can bind parameters into an
    /// environment frame uniformly with `FnDef`.
    Lambda(Vec<Ident>, Box<Expr>, Loc),
    /// A sequence of top-level statements (script mode).
    List(Vec<Expr>, Loc),
}

impl Expr {
    pub fn get_loc(&self) -> Loc {
        match self {
            Expr::Const(_, loc) => *loc,
            Expr::Boolean(_, loc) => *loc,
            Expr::Var(_, loc) => *loc,
            Expr::Op1(_, _, loc) => *loc,
            Expr::Op2(_, _, _, loc) => *loc,
            Expr::If(_, _, loc) => *loc,
            Expr::For(_, _, _, _, _, loc) => *loc,
            Expr::FnDef(_, _, _, loc) => *loc,
            Expr::App(_, _, loc) => *loc,
            Expr::Lambda(_, _, loc) => *loc,
            Expr::List(_, loc) => *loc,
        }
    }

    #[cfg(test)]
    pub(crate) fn strip_loc(self) -> Self {
        let loc = Loc::default();
        match self {
            Expr::Const(n, _loc) => Expr::Const(n, loc),
            Expr::Boolean(b, _loc) => Expr::Boolean(b, loc),
            Expr::Var(id, _loc) => Expr::Var(id, loc),
            Expr::Op1(op, operand, _loc) => Expr::Op1(op, Box::new(operand.strip_loc()), loc),
            Expr::Op2(op, l, r, _loc) => {
                Expr::Op2(op, Box::new(l.strip_loc()), Box::new(r.strip_loc()), loc)
            }
            Expr::If(cases, else_case, _loc) => Expr::If(
                cases
                    .into_iter()
                    .map(|(cond, body)| (cond.strip_loc(), body.strip_loc()))
                    .collect(),
                else_case.map(|e| Box::new(e.strip_loc())),
                loc,
            ),
            Expr::For(var, start, end, step, body, _loc) => Expr::For(
                var,
                Box::new(start.strip_loc()),
                Box::new(end.strip_loc()),
                step.map(|s| Box::new(s.strip_loc())),
                Box::new(body.strip_loc()),
                loc,
            ),
            Expr::FnDef(name, params, body, _loc) => {
                Expr::FnDef(name, params, Box::new(body.strip_loc()), loc)
            }
            Expr::App(callee, args, _loc) => Expr::App(
                Box::new(callee.strip_loc()),
                args.into_iter().map(|arg| arg.strip_loc()).collect(),
                loc,
            ),
            Expr::Lambda(params, body, _loc) => {
                Expr::Lambda(params, Box::new(body.strip_loc()), loc)
            }
            Expr::List(elements, _loc) => Expr::List(
                elements.into_iter().map(|e| e.strip_loc()).collect(),
                loc,
            ),
        }
    }
}

/// Renders re-parseable source text: binary and unary applications are
/// parenthesized, keywords print as their marker lexemes, and a callee that
/// is not a bare identifier is wrapped in parentheses.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(n, _) => write!(f, "{n}"),
            Expr::Boolean(true, _) => write!(f, "@TRUE@"),
            Expr::Boolean(false, _) => write!(f, "@FALSE@"),
            Expr::Var(id, _) => write!(f, "{id}"),
            Expr::Op1(op, operand, _) => write!(f, "({op}{operand})"),
            Expr::Op2(op, l, r, _) => write!(f, "({l} {op} {r})"),
            Expr::If(cases, else_case, _) => {
                for (i, (cond, body)) in cases.iter().enumerate() {
                    if i == 0 {
                        write!(f, "@IF@ {cond} @THEN@ {body}")?;
                    } else {
                        write!(f, " @ELSEIF@ {cond} @THEN@ {body}")?;
                    }
                }
                if let Some(else_case) = else_case {
                    write!(f, " @ELSE@ {else_case}")?;
                }
                write!(f, " @END@")
            }
            Expr::For(var, start, end, step, body, _) => {
                write!(f, "@FOR@ {var} @IN@ @RANGE@({start}, {end}")?;
                if let Some(step) = step {
                    write!(f, ", {step}")?;
                }
                write!(f, ") @DO@ {body} @END@")
            }
            Expr::FnDef(name, params, body, _) => {
                write!(f, "@DEF@ {name}({}) @IS@ {body} @END@", params.join(", "))
            }
            Expr::App(callee, args, _) => {
                match callee.as_ref() {
                    Expr::Var(id, _) => write!(f, "{id}(")?,
                    callee => write!(f, "({callee})(")?,
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::Lambda(params, body, _) => {
                write!(f, "@LAMBDA@({}) @:@ {body}", params.join(", "))
            }
            Expr::List(elements, _) => {
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{element}")?;
                }
                Ok(())
            }
        }
    }
}
