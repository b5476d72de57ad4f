//! Expression evaluator and statement execution

use super::env::{Rule, RuleStore};
use super::error::{InterpResult, RuntimeError};
use super::value::{Obj, Value};
use crate::ast::{
    BinOp, ExprTree, Literal, LiteralKind, NodeId, Program, Span, Spanned, Statement, UnOp, Visitor,
};
use crate::rewrite;
use crate::util::{find_similar_name, format_suggestion_hint};
use std::fmt;
use std::ops::ControlFlow;

/// Evaluate a tree to a single value.
///
/// The walk is post-order over a pending-value stack; operands are consumed
/// by value, so their payloads are released as soon as the operator result
/// exists. The returned value belongs to the caller.
pub fn evaluate(tree: &ExprTree) -> InterpResult<Value> {
    let mut evaluator = Evaluator::default();
    if let ControlFlow::Break(err) = tree.walk(&mut evaluator) {
        return Err(err);
    }
    let value = evaluator.pop()?;
    if !evaluator.stack.is_empty() {
        return Err(RuntimeError::internal(format!(
            "{} values left on the evaluation stack",
            evaluator.stack.len()
        )));
    }
    Ok(value)
}

#[derive(Debug, Default)]
struct Evaluator {
    stack: Vec<Value>,
}

impl Evaluator {
    fn pop(&mut self) -> InterpResult<Value> {
        self.stack
            .pop()
            .ok_or_else(|| RuntimeError::internal("evaluation stack underflow"))
    }

    fn push(&mut self, result: InterpResult<Value>) -> ControlFlow<RuntimeError> {
        match result {
            Ok(value) => {
                self.stack.push(value);
                ControlFlow::Continue(())
            }
            Err(err) => ControlFlow::Break(err),
        }
    }

    fn binary(&mut self, op: BinOp, span: Span) -> InterpResult<Value> {
        // left was pushed first
        let right = self.pop()?;
        let left = self.pop()?;
        eval_binary(op, left, right, span)
    }

    fn unary(&mut self, op: UnOp, span: Span) -> InterpResult<Value> {
        let operand = self.pop()?;
        eval_unary(op, operand, span)
    }
}

impl Visitor for Evaluator {
    type Break = RuntimeError;

    fn visit_literal(
        &mut self,
        _: NodeId,
        literal: &Literal,
        span: Span,
    ) -> ControlFlow<RuntimeError> {
        self.push(eval_literal(literal, span))
    }

    fn visit_binary(&mut self, _: NodeId, op: BinOp, span: Span) -> ControlFlow<RuntimeError> {
        let result = self.binary(op, span);
        self.push(result)
    }

    fn visit_unary(&mut self, _: NodeId, op: UnOp, span: Span) -> ControlFlow<RuntimeError> {
        let result = self.unary(op, span);
        self.push(result)
    }
}

fn eval_literal(literal: &Literal, span: Span) -> InterpResult<Value> {
    match literal.kind {
        LiteralKind::Number => literal.text.parse::<f64>().map(Value::Number).map_err(|_| {
            RuntimeError::internal(format!("malformed number literal '{}'", literal.text))
                .with_span(span)
        }),
        LiteralKind::String => Ok(Value::string(literal.text.as_str())),
        LiteralKind::True => Ok(Value::Bool(true)),
        LiteralKind::False => Ok(Value::Bool(false)),
    }
}

fn eval_binary(op: BinOp, left: Value, right: Value, span: Span) -> InterpResult<Value> {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok(eval_numeric(op, *a, *b)),
        (Value::Object(Obj::String(a)), Value::Object(Obj::String(b))) if op == BinOp::Add => {
            Ok(Value::Object(Obj::String(a.concat(b))))
        }
        _ if matches!(op, BinOp::Eq | BinOp::Ne)
            && std::mem::discriminant(&left) == std::mem::discriminant(&right) =>
        {
            let equal = left == right;
            Ok(Value::Bool(if op == BinOp::Eq { equal } else { !equal }))
        }
        _ => Err(RuntimeError::type_mismatch(
            format!(
                "cannot apply '{op}' to {} and {}",
                left.type_name(),
                right.type_name()
            ),
            span,
        )),
    }
}

/// Numeric operators are total: division by zero follows IEEE-754
fn eval_numeric(op: BinOp, a: f64, b: f64) -> Value {
    match op {
        BinOp::Add => Value::Number(a + b),
        BinOp::Sub => Value::Number(a - b),
        BinOp::Mul => Value::Number(a * b),
        BinOp::Div => Value::Number(a / b),
        BinOp::Mod => Value::Number(a % b),
        BinOp::Eq => Value::Bool(a == b),
        BinOp::Ne => Value::Bool(a != b),
        BinOp::Lt => Value::Bool(a < b),
        BinOp::Gt => Value::Bool(a > b),
        BinOp::Le => Value::Bool(a <= b),
        BinOp::Ge => Value::Bool(a >= b),
    }
}

fn eval_unary(op: UnOp, operand: Value, span: Span) -> InterpResult<Value> {
    match (op, &operand) {
        (UnOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnOp::Neg, _) => Err(RuntimeError::type_mismatch(
            format!("cannot negate {}", operand.type_name()),
            span,
        )),
        (UnOp::Not, _) => Err(RuntimeError::type_mismatch(
            format!("cannot apply '!' to {}", operand.type_name()),
            span,
        )),
    }
}

/// What executing one statement produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A rule was installed; `replaced` is set when it overwrote one
    Defined { name: String, replaced: bool },
    /// An expression statement's value
    Value(Value),
    /// An apply statement's rewritten tree and its value
    Rewritten { tree: ExprTree, value: Value },
}

impl Outcome {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Defined { .. } => None,
            Outcome::Value(value) | Outcome::Rewritten { value, .. } => Some(value),
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Outcome::Defined { .. } => None,
            Outcome::Value(value) | Outcome::Rewritten { value, .. } => Some(value),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Defined { name, replaced: false } => write!(f, "defined {name}"),
            Outcome::Defined { name, replaced: true } => write!(f, "redefined {name}"),
            Outcome::Value(value) => write!(f, "{value}"),
            Outcome::Rewritten { tree, value } => write!(f, "{tree} => {value}"),
        }
    }
}

/// Executes statements against one rule store
#[derive(Debug, Default)]
pub struct Interpreter {
    rules: RuleStore,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Run every statement in order. The result is the value of the last
    /// statement that produced one.
    pub fn run(&mut self, program: Program) -> InterpResult<Option<Value>> {
        let mut last = None;
        for statement in program.statements {
            if let Some(value) = self.execute(statement)?.into_value() {
                last = Some(value);
            }
        }
        Ok(last)
    }

    /// Execute one statement. Definitions take ownership of their trees.
    pub fn execute(&mut self, statement: Statement) -> InterpResult<Outcome> {
        match statement {
            Statement::Expr { expr, .. } => evaluate(&expr).map(Outcome::Value),
            Statement::Define {
                name,
                pattern,
                replacement,
                span,
            } => {
                let rule = Rule::new(name.node, pattern, replacement, span);
                tracing::debug!(rule = %rule, "define");
                let name = rule.name.clone();
                let replaced = self.rules.define(rule).is_some();
                if replaced {
                    tracing::debug!(rule = %name, "rule redefined");
                }
                Ok(Outcome::Defined { name, replaced })
            }
            Statement::Apply { name, expr, .. } => {
                let (tree, value) = self.apply(&name, expr)?;
                Ok(Outcome::Rewritten { tree, value })
            }
        }
    }

    /// Rewrite `expr` with the named rule, then evaluate the result
    pub fn apply(&self, name: &Spanned<String>, expr: ExprTree) -> InterpResult<(ExprTree, Value)> {
        let rule = self.rules.get(&name.node).ok_or_else(|| {
            let names = self.rules.names();
            let suggestion = find_similar_name(&name.node, &names, 2);
            RuntimeError::no_rule_found(&name.node, Some(name.span))
                .with_hint(&format_suggestion_hint(suggestion))
        })?;

        let (pattern, replacement) = rule.instantiate();
        let span = tracing::debug_span!("apply", rule = %rule.name);
        let _guard = span.enter();

        let tree = rewrite::substitute(expr, pattern, replacement)?;
        let value = evaluate(&tree)?;
        tracing::debug!(result = %tree, value = %value, "applied");
        Ok((tree, value))
    }
}
