//! Abstract Syntax Tree definitions

mod expr;
mod printer;
mod span;
mod tree;
mod visit;

pub use expr::*;
pub use printer::AstPrinter;
pub use span::*;
pub use tree::*;
pub use visit::Visitor;

use serde::Serialize;

/// A program is an ordered sequence of statements
#[derive(Debug, Clone, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// Top-level statement
#[derive(Debug, Clone, Serialize)]
pub enum Statement {
    /// `<expr> ;`
    Expr { expr: ExprTree, span: Span },

    /// `define <name> -> <pattern> = <replacement> ;`
    Define {
        name: Spanned<String>,
        pattern: ExprTree,
        replacement: ExprTree,
        span: Span,
    },

    /// `apply <name> : <expr> ;`
    Apply {
        name: Spanned<String>,
        expr: ExprTree,
        span: Span,
    },
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Expr { span, .. }
            | Statement::Define { span, .. }
            | Statement::Apply { span, .. } => *span,
        }
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Expr { expr, .. } => write!(f, "{expr};"),
            Statement::Define {
                name,
                pattern,
                replacement,
                ..
            } => write!(f, "define {} -> {pattern} = {replacement};", name.node),
            Statement::Apply { name, expr, .. } => write!(f, "apply {} : {expr};", name.node),
        }
    }
}
