//! Operators and literals carried by expression nodes

use serde::{Deserialize, Serialize};

/// Literal tag. Numbers and strings keep their source text until evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    Number,
    String,
    True,
    False,
}

/// Literal payload of a leaf node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

impl Literal {
    pub fn new(kind: LiteralKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn number(text: impl Into<String>) -> Self {
        Self::new(LiteralKind::Number, text)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(LiteralKind::String, text)
    }

    pub fn boolean(value: bool) -> Self {
        if value {
            Self::new(LiteralKind::True, "true")
        } else {
            Self::new(LiteralKind::False, "false")
        }
    }

    /// String literals double as pattern variables inside rules.
    pub fn is_variable(&self) -> bool {
        self.kind == LiteralKind::String
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            LiteralKind::String => write!(f, "\"{}\"", self.text),
            LiteralKind::Number | LiteralKind::True | LiteralKind::False => {
                write!(f, "{}", self.text)
            }
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod)
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Mod => write!(f, "%"),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
            BinOp::Lt => write!(f, "<"),
            BinOp::Gt => write!(f, ">"),
            BinOp::Le => write!(f, "<="),
            BinOp::Ge => write!(f, ">="),
        }
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnOp {
    /// Negation (-)
    Neg,
    /// Logical not (!)
    Not,
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Neg => write!(f, "-"),
            UnOp::Not => write!(f, "!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_display_quotes_strings() {
        assert_eq!(Literal::string("A").to_string(), "\"A\"");
        assert_eq!(Literal::number("4.20").to_string(), "4.20");
        assert_eq!(Literal::boolean(false).to_string(), "false");
    }

    #[test]
    fn test_only_strings_are_variables() {
        assert!(Literal::string("x").is_variable());
        assert!(!Literal::number("1").is_variable());
        assert!(!Literal::boolean(true).is_variable());
    }

    #[test]
    fn test_binop_display() {
        let ops = [BinOp::Add, BinOp::Sub, BinOp::Mul, BinOp::Div, BinOp::Mod, BinOp::Le];
        let shown: Vec<_> = ops.iter().map(ToString::to_string).collect();
        assert_eq!(shown, ["+", "-", "*", "/", "%", "<="]);
    }

    #[test]
    fn test_arithmetic_classification() {
        assert!(BinOp::Mod.is_arithmetic());
        assert!(!BinOp::Eq.is_arithmetic());
    }
}
