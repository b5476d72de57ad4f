//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::ast::Span;
use crate::error::{CarlError, LexErrorKind, Result};
use logos::Logos;

/// Tokenize source code.
///
/// End of input is the end of the returned vector. The first malformed
/// lexeme aborts tokenization with its span.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(Token::UnterminatedString) => {
                return Err(CarlError::lexer(LexErrorKind::UnterminatedString, span));
            }
            Ok(Token::IncompleteNumber) => {
                return Err(CarlError::lexer(LexErrorKind::IncompleteDelimiter, span));
            }
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(CarlError::lexer(LexErrorKind::UnrecognizedCharacter, span));
            }
        }
    }

    tracing::trace!(count = tokens.len(), "tokenized");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    fn lex_error(source: &str) -> (LexErrorKind, Span) {
        match tokenize(source) {
            Err(CarlError::Lexer { kind, span }) => (kind, span),
            other => panic!("expected lexer error, got {other:?}"),
        }
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_keywords() {
        assert_eq!(
            kinds("define apply true false"),
            vec![Token::Define, Token::Apply, Token::True, Token::False]
        );
    }

    #[test]
    fn test_tokenize_numbers_keep_text() {
        assert_eq!(
            kinds("42 4.20"),
            vec![Token::Number("42".into()), Token::Number("4.20".into())]
        );
    }

    #[test]
    fn test_tokenize_string_literal_strips_quotes() {
        let tokens = tokenize(r#""hello world""#).unwrap();
        assert_eq!(tokens, vec![(Token::StringLit("hello world".into()), Span::new(0, 13))]);
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            kinds("+ - * / % !"),
            vec![Token::Plus, Token::Minus, Token::Star, Token::Slash, Token::Percent, Token::Bang]
        );
    }

    #[test]
    fn test_tokenize_comparison_operators() {
        assert_eq!(
            kinds("== != < > <= >="),
            vec![Token::EqEq, Token::NotEq, Token::Lt, Token::Gt, Token::LtEq, Token::GtEq]
        );
    }

    #[test]
    fn test_tokenize_punctuation() {
        assert_eq!(
            kinds("= -> : ; ( )"),
            vec![Token::Eq, Token::Arrow, Token::Colon, Token::Semi, Token::LParen, Token::RParen]
        );
    }

    #[test]
    fn test_tokenize_identifier() {
        assert_eq!(
            kinds("zero ab_rule x1"),
            vec![
                Token::Ident("zero".into()),
                Token::Ident("ab_rule".into()),
                Token::Ident("x1".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_spans() {
        let tokens = tokenize("apply zero").unwrap();
        assert_eq!(tokens[0].1, Span::new(0, 5));
        assert_eq!(tokens[1].1, Span::new(6, 10));
    }

    #[test]
    fn test_tokenize_skips_comments() {
        let tokens = kinds("1 # this is a comment\n2");
        assert_eq!(tokens, vec![Token::Number("1".into()), Token::Number("2".into())]);
    }

    #[test]
    fn test_tokenize_definition() {
        let tokens = kinds(r#"define zero -> "A" + 0 = "A";"#);
        assert_eq!(tokens.len(), 9);
        assert_eq!(tokens[0], Token::Define);
        assert_eq!(tokens[2], Token::Arrow);
        assert_eq!(tokens[8], Token::Semi);
    }

    #[test]
    fn test_tokenize_minus_then_number() {
        assert_eq!(kinds("-42"), vec![Token::Minus, Token::Number("42".into())]);
    }

    #[test]
    fn test_unterminated_string_error() {
        let (kind, span) = lex_error(r#"1 + "abc"#);
        assert_eq!(kind, LexErrorKind::UnterminatedString);
        assert_eq!(span, Span::new(4, 8));
    }

    #[test]
    fn test_incomplete_delimiter_error() {
        let (kind, span) = lex_error("12. + 1");
        assert_eq!(kind, LexErrorKind::IncompleteDelimiter);
        assert_eq!(span, Span::new(0, 3));
    }

    #[test]
    fn test_unrecognized_character_error() {
        let (kind, span) = lex_error("1 ? 2");
        assert_eq!(kind, LexErrorKind::UnrecognizedCharacter);
        assert_eq!(span, Span::new(2, 3));
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            lex_error("\"").0.code(),
            lex_error("5.").0.code(),
            lex_error("@").0.code(),
        ];
        assert_eq!(codes, [10, 11, 12]);
    }
}
