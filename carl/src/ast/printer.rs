//! Canonical textual form of expression trees

use super::{BinOp, ExprTree, Literal, NodeId, Span, UnOp, Visitor};
use std::convert::Infallible;
use std::ops::ControlFlow;

/// Renders a tree bottom-up: literals as written (strings re-quoted),
/// binaries as `(left op right)`, unaries as `op operand`.
#[derive(Debug, Default)]
pub struct AstPrinter {
    stack: Vec<String>,
}

impl AstPrinter {
    pub fn print(tree: &ExprTree) -> String {
        let mut printer = AstPrinter::default();
        let _ = tree.walk(&mut printer);
        printer.stack.pop().unwrap_or_default()
    }

    fn pop(&mut self) -> String {
        self.stack.pop().unwrap_or_default()
    }
}

impl Visitor for AstPrinter {
    type Break = Infallible;

    fn visit_literal(&mut self, _: NodeId, literal: &Literal, _: Span) -> ControlFlow<Infallible> {
        self.stack.push(literal.to_string());
        ControlFlow::Continue(())
    }

    fn visit_binary(&mut self, _: NodeId, op: BinOp, _: Span) -> ControlFlow<Infallible> {
        let right = self.pop();
        let left = self.pop();
        self.stack.push(format!("({left} {op} {right})"));
        ControlFlow::Continue(())
    }

    fn visit_unary(&mut self, _: NodeId, op: UnOp, _: Span) -> ControlFlow<Infallible> {
        let operand = self.pop();
        self.stack.push(format!("{op}{operand}"));
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::LiteralKind;

    fn lit(kind: LiteralKind, text: &str) -> ExprTree {
        ExprTree::literal(kind, text, Span::default())
    }

    #[test]
    fn test_print_literals() {
        assert_eq!(AstPrinter::print(&lit(LiteralKind::Number, "69")), "69");
        assert_eq!(AstPrinter::print(&lit(LiteralKind::True, "true")), "true");
        assert_eq!(
            AstPrinter::print(&lit(LiteralKind::String, "MY PERFECT STRING")),
            "\"MY PERFECT STRING\""
        );
    }

    #[test]
    fn test_print_nested_binary() {
        let sum = ExprTree::binary(
            lit(LiteralKind::Number, "69"),
            BinOp::Add,
            Span::default(),
            lit(LiteralKind::Number, "420"),
        );
        let two = lit(LiteralKind::Number, "2");
        let tree = ExprTree::binary(sum, BinOp::Div, Span::default(), two);
        insta::assert_snapshot!(AstPrinter::print(&tree), @"((69 + 420) / 2)");
    }

    #[test]
    fn test_print_stacked_unary() {
        let mut tree = lit(LiteralKind::True, "true");
        for _ in 0..3 {
            tree = ExprTree::unary(UnOp::Not, Span::default(), tree);
        }
        assert_eq!(AstPrinter::print(&tree), "!!!true");
    }
}
