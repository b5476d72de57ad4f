//! Error types and reporting

use crate::ast::Span;
use crate::interp::{ErrorKind, RuntimeError};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CarlError>;

/// Malformed lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string")]
    UnterminatedString,

    #[error("expected digit after '.'")]
    IncompleteDelimiter,

    #[error("unrecognized character")]
    UnrecognizedCharacter,
}

impl LexErrorKind {
    pub fn code(self) -> i32 {
        match self {
            LexErrorKind::UnterminatedString => 10,
            LexErrorKind::IncompleteDelimiter => 11,
            LexErrorKind::UnrecognizedCharacter => 12,
        }
    }
}

/// Syntax error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected token")]
    UnexpectedToken,

    #[error("missing closing bracket")]
    MissingClosingBracket,

    #[error("missing ';'")]
    MissingTerminator,
}

impl ParseErrorKind {
    pub fn code(self) -> i32 {
        match self {
            ParseErrorKind::UnexpectedToken => 20,
            ParseErrorKind::MissingClosingBracket => 21,
            ParseErrorKind::MissingTerminator => 22,
        }
    }
}

/// Any failure surfaced while running Carl source
#[derive(Debug, Error)]
pub enum CarlError {
    #[error("Lexer error at {span}: {kind}")]
    Lexer { kind: LexErrorKind, span: Span },

    #[error("Parser error at {span}: {message}")]
    Parser {
        kind: ParseErrorKind,
        message: String,
        span: Span,
    },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {message}")]
    Io { message: String },
}

impl CarlError {
    pub fn lexer(kind: LexErrorKind, span: Span) -> Self {
        Self::Lexer { kind, span }
    }

    pub fn parser(kind: ParseErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Numeric code, used as the process exit status by the one-shot front end
    pub fn code(&self) -> i32 {
        match self {
            Self::Lexer { kind, .. } => kind.code(),
            Self::Parser { kind, .. } => kind.code(),
            Self::Runtime(err) => err.code(),
            Self::Io { .. } => 74,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. } | Self::Parser { span, .. } => Some(*span),
            Self::Runtime(err) => err.span,
            Self::Io { .. } => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Lexer { kind, .. } => kind.to_string(),
            Self::Parser { message, .. } => message.clone(),
            Self::Runtime(err) => err.message.clone(),
            Self::Io { message } => message.clone(),
        }
    }

    /// 1-based line and column of the error within `source`, if it has a span
    pub fn location(&self, source: &str) -> Option<(usize, usize)> {
        self.span().map(|span| span.line_col(source))
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Lexer { .. } => "Lexer error",
            Self::Parser { .. } => "Parser error",
            Self::Runtime(err) => match err.kind {
                ErrorKind::TypeMismatch => "Type mismatch",
                ErrorKind::NoRuleFound => "No rule found",
                ErrorKind::Internal => "Internal error",
            },
            Self::Io { .. } => "IO error",
        }
    }
}

/// Report error with ariadne on stderr
pub fn report_error(filename: &str, source: &str, error: &CarlError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let printed = if let Some(span) = error.span() {
        let range = clamp(span, source.len());
        Report::build(ReportKind::Error, (filename, range.clone()))
            .with_code(error.code())
            .with_message(error.title())
            .with_label(
                Label::new((filename, range))
                    .with_message(error.message())
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename, Source::from(source)))
    } else {
        Report::build(ReportKind::Error, (filename, 0..0))
            .with_code(error.code())
            .with_message(format!("{}: {}", error.title(), error.message()))
            .finish()
            .eprint((filename, Source::from(source)))
    };

    if let Err(err) = printed {
        tracing::warn!(%err, "failed to render diagnostic");
        eprintln!("error[{}]: {error}", error.code());
    }
}

fn clamp(span: Span, len: usize) -> std::ops::Range<usize> {
    let start = span.start.min(len);
    start..span.end.clamp(start, len)
}
