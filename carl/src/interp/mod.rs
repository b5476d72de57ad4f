//! Tree-walking interpreter
//!
//! Evaluates expression trees and executes statements against a session's
//! rule store.

mod env;
mod error;
mod eval;
mod value;

pub use env::{Rule, RuleStore};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{Interpreter, Outcome, evaluate};
pub use value::{Obj, ObjString, Value};
