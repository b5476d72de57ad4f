//! Parser implementation using lalrpop

use crate::ast::{ExprTree, Program, Span};
use crate::error::{CarlError, ParseErrorKind, Result};
use crate::lexer::{Token, tokenize};
use lalrpop_util::ParseError;

#[cfg(test)]
mod tests;

lalrpop_util::lalrpop_mod!(
    #[allow(clippy::all)]
    grammar
);

/// Parse tokens into a program
pub fn parse(filename: &str, source: &str, tokens: Vec<(Token, Span)>) -> Result<Program> {
    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| (span.start, tok, span.end));

    let program = grammar::ProgramParser::new()
        .parse(token_iter)
        .map_err(|e| convert_error(e, source))?;
    tracing::debug!(file = filename, statements = program.statements.len(), "parsed");
    Ok(program)
}

/// Tokenize and parse `source`
pub fn parse_source(filename: &str, source: &str) -> Result<Program> {
    let tokens = tokenize(source)?;
    parse(filename, source, tokens)
}

/// Parse a single expression with no trailing `;`
pub fn parse_expr(source: &str) -> Result<ExprTree> {
    let token_iter = tokenize(source)?
        .into_iter()
        .map(|(tok, span)| (span.start, tok, span.end));

    grammar::ExprParser::new()
        .parse(token_iter)
        .map_err(|e| convert_error(e, source))
}

fn convert_error(error: ParseError<usize, Token, CarlError>, source: &str) -> CarlError {
    match error {
        ParseError::User { error } => error,
        ParseError::InvalidToken { location } => CarlError::parser(
            ParseErrorKind::UnexpectedToken,
            "invalid token",
            Span::new(location, location + 1),
        ),
        ParseError::UnrecognizedEof { expected, .. } => {
            let end = Span::new(source.len(), source.len());
            let kind = classify(&expected);
            let message = match kind {
                ParseErrorKind::MissingClosingBracket => {
                    "expected ')' before end of input".to_string()
                }
                ParseErrorKind::MissingTerminator => {
                    "expected ';' before end of input".to_string()
                }
                ParseErrorKind::UnexpectedToken => {
                    format!("unexpected end of input{}", expected_hint(&expected))
                }
            };
            CarlError::parser(kind, message, end)
        }
        ParseError::UnrecognizedToken {
            token: (start, token, end),
            expected,
        } => {
            let kind = classify(&expected);
            let message = match kind {
                ParseErrorKind::MissingClosingBracket => format!("expected ')', found '{token}'"),
                ParseErrorKind::MissingTerminator => format!("expected ';', found '{token}'"),
                ParseErrorKind::UnexpectedToken => {
                    format!("unexpected token '{token}'{}", expected_hint(&expected))
                }
            };
            CarlError::parser(kind, message, Span::new(start, end))
        }
        ParseError::ExtraToken {
            token: (start, token, end),
        } => CarlError::parser(
            ParseErrorKind::UnexpectedToken,
            format!("unexpected token '{token}'"),
            Span::new(start, end),
        ),
    }
}

/// A missing `)` takes precedence over a missing `;`: inside parentheses the
/// statement cannot end yet.
fn classify(expected: &[String]) -> ParseErrorKind {
    if expected.iter().any(|e| e == r#"")""#) {
        ParseErrorKind::MissingClosingBracket
    } else if expected.iter().any(|e| e == r#"";""#) {
        ParseErrorKind::MissingTerminator
    } else {
        ParseErrorKind::UnexpectedToken
    }
}

fn expected_hint(expected: &[String]) -> String {
    match expected {
        [] => String::new(),
        [only] => format!(", expected {only}"),
        _ => format!(", expected one of {}", expected.join(", ")),
    }
}
