// Copyright 2026 The Atlang Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use super::*;
use crate::ast::{BinaryOp, Expr, Loc, UnaryOp};
use crate::common::{ErrorCode, ErrorKind};

fn parsed(input: &str) -> Expr {
    parse("test", input).unwrap().strip_loc()
}

fn parsed_script(input: &str) -> Expr {
    parse_script("test", input).unwrap().strip_loc()
}

fn int(n: i64) -> Expr {
    Expr::Const(n, Loc::default())
}

fn boolean(b: bool) -> Expr {
    Expr::Boolean(b, Loc::default())
}

fn var(name: &str) -> Expr {
    Expr::Var(name.to_string(), Loc::default())
}

fn op1(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Op1(op, Box::new(operand), Loc::default())
}

fn op2(op: BinaryOp, l: Expr, r: Expr) -> Expr {
    Expr::Op2(op, Box::new(l), Box::new(r), Loc::default())
}

fn app(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::App(Box::new(callee), args, Loc::default())
}

// ============================================================================
// Atoms
// ============================================================================

#[test]
fn test_parse_int() {
    assert_eq!(int(42), parsed("42"));
    assert_eq!(int(-5), parsed("-5"));
}

#[test]
fn test_parse_boolean() {
    assert_eq!(boolean(true), parsed("@TRUE@"));
    assert_eq!(boolean(false), parsed("@FALSE@"));
}

#[test]
fn test_parse_identifier() {
    assert_eq!(var("x"), parsed("x"));
}

#[test]
fn test_parse_parenthesized() {
    assert_eq!(int(42), parsed("(42)"));
    assert_eq!(op2(BinaryOp::Add, int(1), int(2)), parsed("((1 @+@ 2))"));
}

// ============================================================================
// Precedence and associativity
// ============================================================================

#[test]
fn test_mul_binds_tighter_than_add() {
    assert_eq!(
        op2(BinaryOp::Add, int(5), op2(BinaryOp::Mul, int(3), int(2))),
        parsed("5 @+@ 3 @*@ 2"),
    );
}

#[test]
fn test_additive_left_assoc() {
    assert_eq!(
        op2(BinaryOp::Sub, op2(BinaryOp::Sub, int(1), int(2)), int(3)),
        parsed("1 @-@ 2 @-@ 3"),
    );
}

#[test]
fn test_multiplicative_level_left_assoc() {
    assert_eq!(
        op2(BinaryOp::Mod, op2(BinaryOp::Div, int(8), int(4)), int(3)),
        parsed("8 @/@ 4 @%@ 3"),
    );
}

#[test]
fn test_comparison_below_additive() {
    assert_eq!(
        op2(BinaryOp::Eq, op2(BinaryOp::Add, int(1), int(2)), int(3)),
        parsed("1 @+@ 2 @==@ 3"),
    );
}

#[test]
fn test_logical_is_lowest() {
    assert_eq!(
        op2(
            BinaryOp::And,
            boolean(true),
            op2(BinaryOp::Lt, int(1), int(2)),
        ),
        parsed("@TRUE@ @&@ 1 @<@ 2"),
    );
    assert_eq!(op2(BinaryOp::Or, var("a"), var("b")), parsed("a @|@ b"));
}

#[test]
fn test_unary_prefix() {
    assert_eq!(op1(UnaryOp::Negative, var("x")), parsed("@-@x"));
    assert_eq!(op1(UnaryOp::Positive, int(1)), parsed("@+@1"));
    assert_eq!(
        op1(UnaryOp::Not, op1(UnaryOp::Not, boolean(true))),
        parsed("@NOT@@NOT@@TRUE@"),
    );
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    assert_eq!(
        op2(BinaryOp::Add, op1(UnaryOp::Negative, int(1)), int(2)),
        parsed("@-@1 @+@ 2"),
    );
}

#[test]
fn test_negative_literal_vs_subtraction() {
    // '-5' is a single literal token; subtraction is spelled '@-@'
    assert_eq!(op2(BinaryOp::Sub, int(3), int(-5)), parsed("3 @-@ -5"));
    assert_eq!(op2(BinaryOp::Sub, var("x"), int(5)), parsed("x @-@ 5"));
}

// ============================================================================
// Compound forms
// ============================================================================

#[test]
fn test_func_def() {
    assert_eq!(
        Expr::FnDef(
            "add".to_string(),
            vec!["x".to_string(), "y".to_string()],
            Box::new(op2(BinaryOp::Add, var("x"), var("y"))),
            Loc::default(),
        ),
        parsed("@DEF@ add(x, y) @IS@ x @+@ y @END@"),
    );
}

#[test]
fn test_func_def_no_params() {
    assert_eq!(
        Expr::FnDef("f".to_string(), vec![], Box::new(int(1)), Loc::default()),
        parsed("@DEF@ f() @IS@ 1 @END@"),
    );
}

#[test]
fn test_for_without_step() {
    assert_eq!(
        Expr::For(
            "i".to_string(),
            Box::new(int(0)),
            Box::new(int(5)),
            None,
            Box::new(var("i")),
            Loc::default(),
        ),
        parsed("@FOR@ i @IN@ @RANGE@(0, 5) @DO@ i @END@"),
    );
}

#[test]
fn test_for_with_step() {
    assert_eq!(
        Expr::For(
            "i".to_string(),
            Box::new(int(0)),
            Box::new(int(10)),
            Some(Box::new(int(2))),
            Box::new(var("i")),
            Loc::default(),
        ),
        parsed("@FOR@ i @IN@ @RANGE@(0, 10, 2) @DO@ i @END@"),
    );
}

#[test]
fn test_lambda() {
    assert_eq!(
        Expr::Lambda(
            vec!["x".to_string()],
            Box::new(op2(BinaryOp::Mul, var("x"), var("x"))),
            Loc::default(),
        ),
        parsed("@LAMBDA@(x) @:@ x @*@ x"),
    );
}

#[test]
fn test_lambda_called_immediately() {
    assert_eq!(
        app(
            Expr::Lambda(
                vec!["x".to_string()],
                Box::new(op2(BinaryOp::Mul, var("x"), var("x"))),
                Loc::default(),
            ),
            vec![int(4)],
        ),
        parsed("(@LAMBDA@(x) @:@ x @*@ x)(4)"),
    );
}

#[test]
fn test_call() {
    assert_eq!(app(var("add"), vec![int(1), int(2)]), parsed("add(1, 2)"));
    assert_eq!(app(var("f"), vec![]), parsed("f()"));
}

#[test]
fn test_parenthesized_callee() {
    assert_eq!(app(var("f"), vec![int(1)]), parsed("(f)(1)"));
}

#[test]
fn test_nested_calls() {
    assert_eq!(
        app(var("f"), vec![app(var("g"), vec![int(1)])]),
        parsed("f(g(1))"),
    );
}

#[test]
fn test_if_then_else() {
    assert_eq!(
        Expr::If(
            vec![(var("a"), int(1))],
            Some(Box::new(int(2))),
            Loc::default(),
        ),
        parsed("@IF@ a @THEN@ 1 @ELSE@ 2 @END@"),
    );
}

#[test]
fn test_if_without_else() {
    assert_eq!(
        Expr::If(vec![(var("a"), int(1))], None, Loc::default()),
        parsed("@IF@ a @THEN@ 1 @END@"),
    );
}

#[test]
fn test_if_elseif_chain() {
    assert_eq!(
        Expr::If(
            vec![(var("a"), int(1)), (var("b"), int(2))],
            Some(Box::new(int(3))),
            Loc::default(),
        ),
        parsed("@IF@ a @THEN@ 1 @ELSEIF@ b @THEN@ 2 @ELSE@ 3 @END@"),
    );
}

#[test]
fn test_script() {
    assert_eq!(
        Expr::List(
            vec![
                Expr::FnDef(
                    "f".to_string(),
                    vec!["x".to_string()],
                    Box::new(var("x")),
                    Loc::default(),
                ),
                app(var("f"), vec![int(2)]),
            ],
            Loc::default(),
        ),
        parsed_script("@DEF@ f(x) @IS@ x @END@ f(2)"),
    );
}

// ============================================================================
// Spans
// ============================================================================

#[test]
fn test_binop_span() {
    let ast = parse("test", "1 @+@ 2").unwrap();
    assert_eq!(0, ast.get_loc().start.index);
    assert_eq!(7, ast.get_loc().end.index);
}

#[test]
fn test_if_span_starts_at_condition() {
    let ast = parse("test", "@IF@ @TRUE@ @THEN@ 1 @END@").unwrap();
    assert_eq!(5, ast.get_loc().start.index);
    assert_eq!(20, ast.get_loc().end.index);
}

#[test]
fn test_func_def_span_starts_at_name() {
    let ast = parse("test", "@DEF@ add(x, y) @IS@ x @+@ y @END@").unwrap();
    assert_eq!(6, ast.get_loc().start.index);
    assert_eq!(28, ast.get_loc().end.index);
}

#[test]
fn test_call_span_ends_at_last_arg() {
    let ast = parse("test", "f(1, 23)").unwrap();
    assert_eq!(0, ast.get_loc().start.index);
    assert_eq!(7, ast.get_loc().end.index);
}

#[test]
fn test_unary_span_starts_at_operator() {
    let ast = parse("test", "@-@x").unwrap();
    assert_eq!(0, ast.get_loc().start.index);
    assert_eq!(4, ast.get_loc().end.index);
}

#[test]
fn test_lambda_span_starts_at_param() {
    let ast = parse("test", "@LAMBDA@(x) @:@ y").unwrap();
    assert_eq!(9, ast.get_loc().start.index);
    assert_eq!(17, ast.get_loc().end.index);
}

#[test]
fn test_script_span() {
    let ast = parse_script("test", "@DEF@ f(x) @IS@ x @END@ f(2)").unwrap();
    assert_eq!(6, ast.get_loc().start.index);
    assert_eq!(27, ast.get_loc().end.index);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_if_not_allowed_inside_arithmetic() {
    // if/for are recognized only at expression entry, so a trailing
    // operator after a complete if-expression is an error
    let err = parse("test", "@IF@ @FALSE@ @THEN@ 1 @ELSE@ 2 @END@ @+@ 3").unwrap_err();
    assert_eq!(ErrorCode::ExtraToken, err.code);
    assert_eq!(ErrorKind::Syntax, err.kind());
    assert_eq!(37, err.start.index);
    assert_eq!(CONTINUATION_MSG, err.details);
}

#[test]
fn test_if_rejected_as_operand() {
    let err = parse("test", "1 @+@ @IF@ @TRUE@ @THEN@ 1 @END@").unwrap_err();
    assert_eq!(ErrorCode::InvalidSyntax, err.code);
    assert_eq!(6, err.start.index);
    assert_eq!(format!("Expected {ATOM_EXPECTED}"), err.details);
}

#[test]
fn test_func_def_missing_rparen() {
    // the error is anchored at the unexpected '@IS@' token and names ')'
    let err = parse("test", "@DEF@ f(x @IS@ x @END@").unwrap_err();
    assert_eq!(ErrorCode::InvalidSyntax, err.code);
    assert_eq!(10, err.start.index);
    assert_eq!(14, err.end.index);
    assert_eq!("Expected ',' or ')'", err.details);
}

#[test]
fn test_func_def_missing_is() {
    let err = parse("test", "@DEF@ f(x) x @END@").unwrap_err();
    assert_eq!("Expected '@IS@'", err.details);
}

#[test]
fn test_if_missing_then() {
    let err = parse("test", "@IF@ @TRUE@ 1 @END@").unwrap_err();
    assert_eq!(ErrorCode::InvalidSyntax, err.code);
    assert_eq!(12, err.start.index);
    assert_eq!("Expected '@THEN@'", err.details);
}

#[test]
fn test_if_missing_end_at_eof() {
    let err = parse("test", "@IF@ @TRUE@ @THEN@ 1").unwrap_err();
    assert_eq!(ErrorCode::UnexpectedEof, err.code);
    assert_eq!(20, err.start.index);
    assert_eq!(
        "Unexpected end of input. Expected '@END@' at the end of IF expression",
        err.details,
    );
}

#[test]
fn test_for_missing_do() {
    let err = parse("test", "@FOR@ i @IN@ @RANGE@(0, 5) i @END@").unwrap_err();
    assert_eq!("Expected '@DO@'", err.details);
}

#[test]
fn test_lambda_missing_colon() {
    let err = parse("test", "@LAMBDA@(x) x").unwrap_err();
    assert_eq!("Expected '@:@'", err.details);
}

#[test]
fn test_unclosed_paren_at_eof() {
    let err = parse("test", "(1 @+@ 2").unwrap_err();
    assert_eq!(ErrorCode::UnexpectedEof, err.code);
    assert_eq!("Unexpected end of input. Expected ')'", err.details);
}

#[test]
fn test_dangling_operator() {
    let err = parse("test", "1 @+@").unwrap_err();
    assert_eq!(ErrorCode::UnexpectedEof, err.code);
    assert_eq!(
        format!("Unexpected end of input. Expected {ATOM_EXPECTED}"),
        err.details,
    );
}

#[test]
fn test_trailing_comma_in_call() {
    let err = parse("test", "f(1,)").unwrap_err();
    assert_eq!(ErrorCode::InvalidSyntax, err.code);
    assert_eq!(4, err.start.index);
}

#[test]
fn test_extra_token_after_expression() {
    let err = parse("test", "1 2").unwrap_err();
    assert_eq!(ErrorCode::ExtraToken, err.code);
    assert_eq!(CONTINUATION_MSG, err.details);
}

#[test]
fn test_extra_token_after_func_def() {
    let err = parse("test", "@DEF@ f(x) @IS@ x @END@ 1").unwrap_err();
    assert_eq!(ErrorCode::ExtraToken, err.code);
}

#[test]
fn test_empty_input() {
    let err = parse("test", "").unwrap_err();
    assert_eq!(ErrorCode::InvalidSyntax, err.code);
    assert_eq!("No tokens to parse", err.details);

    let err = parse_script("test", "").unwrap_err();
    assert_eq!("No tokens to parse", err.details);
}

#[test]
fn test_lexical_error_propagates() {
    let err = parse("test", "$").unwrap_err();
    assert_eq!(ErrorKind::Lexical, err.kind());
    assert_eq!(ErrorCode::IllegalChar, err.code);
}

#[test]
fn test_error_carries_source_name() {
    let err = parse("widget.at", "(").unwrap_err();
    assert_eq!("widget.at", err.source_name);
}
