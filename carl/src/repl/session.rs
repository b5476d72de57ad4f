//! Line-at-a-time execution against one persistent rule store

use crate::ast::Span;
use crate::error::Result;
use crate::interp::{Interpreter, Outcome, RuleStore};
use crate::lexer::{Token, tokenize};
use crate::parser::parse;

/// A sequence of inputs sharing one interpreter. Errors in one input leave
/// the session usable for the next.
#[derive(Debug, Default)]
pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute every statement of `source` as written
    ///
    /// Stops at the first failing statement; rules defined before it stay
    /// installed.
    pub fn eval(&mut self, source: &str) -> Result<Vec<Outcome>> {
        let tokens = tokenize(source)?;
        self.execute(source, tokens)
    }

    /// Execute one line, supplying the final `;` when it is missing
    pub fn eval_line(&mut self, line: &str) -> Result<Vec<Outcome>> {
        let mut tokens = tokenize(line)?;
        terminate(&mut tokens);
        self.execute(line, tokens)
    }

    fn execute(&mut self, source: &str, tokens: Vec<(Token, Span)>) -> Result<Vec<Outcome>> {
        let program = parse("<repl>", source, tokens)?;
        let mut outcomes = Vec::with_capacity(program.statements.len());
        for statement in program.statements {
            outcomes.push(self.interpreter.execute(statement)?);
        }
        Ok(outcomes)
    }

    pub fn rules(&self) -> &RuleStore {
        self.interpreter.rules()
    }
}

/// Append a zero-width `;` after the last token unless it already is one.
/// Comments never reach the token stream, so a trailing `# note` is ignored.
fn terminate(tokens: &mut Vec<(Token, Span)>) {
    if let Some((last, span)) = tokens.last()
        && *last != Token::Semi
    {
        let end = span.end;
        tokens.push((Token::Semi, Span::new(end, end)));
    }
}
