//! Carl: an expression language with named term-rewriting rules
//!
//! Source text is tokenized ([`lexer`]), parsed into statements over
//! arena-backed expression trees ([`parser`], [`ast`]), and executed by the
//! [`interp`] module. `define` installs a rule, `apply` rewrites an
//! expression with it ([`rewrite`]) and evaluates the result.

pub mod ast;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod rewrite;
pub mod util;

pub use ast::Span;
pub use error::{CarlError, Result};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the stderr log subscriber once per process.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `debug` and the
/// default is `warn`.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let default = if verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .try_init();
    });
}

/// Tokenize, parse and run a whole program, returning its result value
pub fn run_source(filename: &str, source: &str) -> Result<Option<interp::Value>> {
    let program = parser::parse_source(filename, source)?;
    let value = interp::Interpreter::new().run(program)?;
    Ok(value)
}
