//! Runtime errors for the interpreter

use crate::ast::{Span, TreeError};
use std::fmt;

/// Runtime error during evaluation or rule application
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operator applied to operands it does not support
    TypeMismatch,
    /// `apply` named a rule that was never defined
    NoRuleFound,
    /// Broken interpreter invariant; never caused by user input
    Internal,
}

impl RuntimeError {
    pub fn type_mismatch(message: impl Into<String>, span: Span) -> Self {
        RuntimeError {
            kind: ErrorKind::TypeMismatch,
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn no_rule_found(name: &str, span: Option<Span>) -> Self {
        RuntimeError {
            kind: ErrorKind::NoRuleFound,
            message: format!("no rule found: {name}"),
            span,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        RuntimeError {
            kind: ErrorKind::Internal,
            message: format!("internal error: {}", message.into()),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Append a hint such as a rule-name suggestion to the message
    pub fn with_hint(mut self, hint: &str) -> Self {
        self.message.push_str(hint);
        self
    }

    pub fn code(&self) -> i32 {
        match self.kind {
            ErrorKind::TypeMismatch => 30,
            ErrorKind::NoRuleFound => 31,
            ErrorKind::Internal => 70,
        }
    }
}

impl From<TreeError> for RuntimeError {
    fn from(err: TreeError) -> Self {
        RuntimeError::internal(err.to_string())
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
