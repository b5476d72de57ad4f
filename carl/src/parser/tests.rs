//! Parser tests for Carl statements and expressions

use crate::ast::{BinOp, ExprTree, LiteralKind, NodeKind, Program, Span, Statement, UnOp};
use crate::error::{CarlError, ParseErrorKind};
use crate::lexer::tokenize;
use crate::parser::{parse, parse_expr};

/// Helper to parse a Carl program and return the AST
fn parse_program(source: &str) -> crate::Result<Program> {
    let tokens = tokenize(source)?;
    parse("test.carl", source, tokens)
}

/// Helper to parse and expect success
fn parse_ok(source: &str) -> Program {
    parse_program(source).expect("Parse should succeed")
}

/// Helper to parse a single expression statement and print it
fn printed(source: &str) -> String {
    let prog = parse_ok(source);
    assert_eq!(prog.statements.len(), 1);
    match &prog.statements[0] {
        Statement::Expr { expr, .. } => expr.to_string(),
        other => panic!("Expected expression statement, got {other}"),
    }
}

/// Helper to extract the parse error classification and span
fn parse_err(source: &str) -> (ParseErrorKind, Span) {
    match parse_program(source) {
        Err(CarlError::Parser { kind, span, .. }) => (kind, span),
        other => panic!("Expected parser error, got {other:?}"),
    }
}

// ============================================
// Literals
// ============================================

#[test]
fn test_parse_number_literal() {
    let prog = parse_ok("42;");
    let Statement::Expr { expr, span } = &prog.statements[0] else {
        panic!("Expected expression statement");
    };
    let literal = expr.node(expr.root()).literal().expect("literal root");
    assert_eq!(literal.kind, LiteralKind::Number);
    assert_eq!(literal.text, "42");
    assert_eq!(*span, Span::new(0, 3));
}

#[test]
fn test_parse_decimal_keeps_text() {
    assert_eq!(printed("4.20;"), "4.20");
}

#[test]
fn test_parse_string_literal() {
    assert_eq!(printed(r#""hello";"#), r#""hello""#);
}

#[test]
fn test_parse_bool_literals() {
    assert_eq!(printed("true;"), "true");
    assert_eq!(printed("false;"), "false");
}

// ============================================
// Precedence and associativity
// ============================================

#[test]
fn test_multiplicative_binds_tighter() {
    assert_eq!(printed("1 + 2 * 3;"), "(1 + (2 * 3))");
}

#[test]
fn test_additive_is_left_associative() {
    assert_eq!(printed("1 - 2 - 3;"), "((1 - 2) - 3)");
}

#[test]
fn test_parentheses_group() {
    assert_eq!(printed("(1 + 2) * 3;"), "((1 + 2) * 3)");
}

#[test]
fn test_comparison_below_additive() {
    assert_eq!(printed("1 + 2 < 4;"), "((1 + 2) < 4)");
}

#[test]
fn test_equality_lowest() {
    assert_eq!(printed("1 < 2 == true;"), "((1 < 2) == true)");
}

#[test]
fn test_unary_operators() {
    assert_eq!(printed("-5 * 2;"), "(-5 * 2)");
    assert_eq!(printed("!!true;"), "!!true");
    assert_eq!(printed("1 - -2;"), "(1 - -2)");
}

#[test]
fn test_modulo() {
    assert_eq!(printed("7 % 3 + 1;"), "((7 % 3) + 1)");
}

#[test]
fn test_operator_span_is_recorded() {
    let prog = parse_ok("10 + 20;");
    let Statement::Expr { expr, .. } = &prog.statements[0] else {
        panic!("Expected expression statement");
    };
    let root = expr.node(expr.root());
    assert!(matches!(root.kind(), NodeKind::Binary { op: BinOp::Add, .. }));
    assert_eq!(root.span(), Span::new(3, 4));
}

#[test]
fn test_parse_tree_parent_links_are_consistent() {
    let prog = parse_ok("-(1 + 2) * (3 - !4);");
    let Statement::Expr { expr, .. } = &prog.statements[0] else {
        panic!("Expected expression statement");
    };
    assert!(expr.validate().is_ok());
    assert_eq!(expr.size(), 9);
}

// ============================================
// Statements
// ============================================

#[test]
fn test_parse_define() {
    let prog = parse_ok(r#"define zero -> "A" + 0 = "A";"#);
    let Statement::Define {
        name,
        pattern,
        replacement,
        span,
    } = &prog.statements[0]
    else {
        panic!("Expected define statement");
    };
    assert_eq!(name.node, "zero");
    assert_eq!(name.span, Span::new(7, 11));
    assert_eq!(pattern.to_string(), r#"("A" + 0)"#);
    assert_eq!(replacement.to_string(), r#""A""#);
    assert_eq!(*span, Span::new(0, 29));
}

#[test]
fn test_parse_apply() {
    let prog = parse_ok("apply zero : 5 + 0;");
    let Statement::Apply { name, expr, .. } = &prog.statements[0] else {
        panic!("Expected apply statement");
    };
    assert_eq!(name.node, "zero");
    assert_eq!(expr.to_string(), "(5 + 0)");
}

#[test]
fn test_parse_multiple_statements() {
    let prog = parse_ok(
        r#"
        # swap the operands of the first sum
        define swap -> "A" + "B" = "B" + "A";
        apply swap : (4 + 6) / 2;
        1 + 1;
        "#,
    );
    assert_eq!(prog.statements.len(), 3);
    assert!(matches!(prog.statements[0], Statement::Define { .. }));
    assert!(matches!(prog.statements[1], Statement::Apply { .. }));
    assert!(matches!(prog.statements[2], Statement::Expr { .. }));
}

#[test]
fn test_parse_empty_program() {
    assert!(parse_ok("").statements.is_empty());
    assert!(parse_ok("# only a comment").statements.is_empty());
}

#[test]
fn test_statement_display_round_trips_through_parser() {
    let source = r#"define sq -> ("A" + "B") * ("A" + "B") = "A" * "A";"#;
    let prog = parse_ok(source);
    let shown = prog.statements[0].to_string();
    let reparsed = parse_ok(&shown);
    assert_eq!(reparsed.statements[0].to_string(), shown);
}

#[test]
fn test_parse_expr_without_terminator() {
    let expr = parse_expr("(69 + 420) * 2").unwrap();
    assert_eq!(expr.to_string(), "((69 + 420) * 2)");
    let expected = ExprTree::binary(
        ExprTree::literal(LiteralKind::Number, "1", Span::default()),
        BinOp::Sub,
        Span::default(),
        ExprTree::unary(
            UnOp::Neg,
            Span::default(),
            ExprTree::literal(LiteralKind::Number, "1", Span::default()),
        ),
    );
    assert_eq!(parse_expr("1 - -1").unwrap(), expected);
}

// ============================================
// Errors
// ============================================

#[test]
fn test_missing_terminator_at_eof() {
    let source = "1 + 2";
    let (kind, span) = parse_err(source);
    assert_eq!(kind, ParseErrorKind::MissingTerminator);
    assert_eq!(span, Span::new(5, 5));
}

#[test]
fn test_missing_terminator_before_next_statement() {
    let (kind, span) = parse_err("1 + 2 apply zero : 1;");
    assert_eq!(kind, ParseErrorKind::MissingTerminator);
    assert_eq!(span, Span::new(6, 11));
}

#[test]
fn test_missing_closing_bracket() {
    let (kind, span) = parse_err("(1 + 2;");
    assert_eq!(kind, ParseErrorKind::MissingClosingBracket);
    assert_eq!(span, Span::new(6, 7));
}

#[test]
fn test_missing_closing_bracket_at_eof() {
    let (kind, _) = parse_err("(1 + 2");
    assert_eq!(kind, ParseErrorKind::MissingClosingBracket);
}

#[test]
fn test_unexpected_token() {
    let (kind, span) = parse_err("1 + ;");
    assert_eq!(kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(span, Span::new(4, 5));
}

#[test]
fn test_define_requires_arrow() {
    let (kind, _) = parse_err(r#"define zero "A" + 0 = "A";"#);
    assert_eq!(kind, ParseErrorKind::UnexpectedToken);
}

#[test]
fn test_apply_requires_colon() {
    let (kind, _) = parse_err("apply zero 5 + 0;");
    assert_eq!(kind, ParseErrorKind::UnexpectedToken);
}

#[test]
fn test_lexer_errors_surface_before_parsing() {
    assert!(matches!(parse_program("1 + \"abc"), Err(CarlError::Lexer { .. })));
}

#[test]
fn test_error_message_names_found_token() {
    match parse_program("1 + ;") {
        Err(err) => assert!(err.message().contains("';'"), "message: {}", err.message()),
        Ok(_) => panic!("Expected parse failure"),
    }
}
