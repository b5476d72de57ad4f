//! Carl CLI

use carl::CarlError;
use carl::error::report_error;
use carl::interp::{Interpreter, Outcome};
use carl::repl::Repl;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "carl", version, about = "Carl - expressions with term-rewriting rules")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a Carl source file and print its result
    Run {
        /// Source file to run
        file: PathBuf,

        /// Print the rewritten tree of every apply statement
        #[arg(long)]
        show_rewrites: bool,
    },
    /// Evaluate a source string and print its result
    Eval {
        /// Carl source, e.g. "(69 + 420) / 2;"
        source: String,

        /// Print the rewritten tree of every apply statement
        #[arg(long)]
        show_rewrites: bool,
    },
    /// Start the interactive REPL (default)
    Repl {
        /// History file (defaults to ~/.carl_history)
        #[arg(long, conflicts_with = "no_history")]
        history: Option<PathBuf>,

        /// Do not load or save history
        #[arg(long)]
        no_history: bool,
    },
    /// Parse and dump AST as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    carl::init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Command::Repl {
        history: None,
        no_history: false,
    });

    match command {
        Command::Run {
            file,
            show_rewrites,
        } => {
            let filename = file.display().to_string();
            match read_source(&file) {
                Ok(source) => one_shot(&filename, &source, show_rewrites),
                Err(err) => fail(&filename, "", &err),
            }
        }
        Command::Eval {
            source,
            show_rewrites,
        } => one_shot("<eval>", &source, show_rewrites),
        Command::Repl {
            history,
            no_history,
        } => {
            let history = if no_history {
                None
            } else {
                history.or_else(Repl::default_history_path)
            };
            match Repl::new(history).and_then(|mut repl| repl.run()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("Error: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Parse { file } => debug_dump(&file, parse_file),
        Command::Tokens { file } => debug_dump(&file, tokenize_file),
    }
}

/// Execute a whole program, print its final value, and map errors to their code
fn one_shot(filename: &str, source: &str, show_rewrites: bool) -> ExitCode {
    let program = match carl::parser::parse_source(filename, source) {
        Ok(program) => program,
        Err(err) => return fail(filename, source, &err),
    };

    let mut interpreter = Interpreter::new();
    let mut last = None;
    for statement in program.statements {
        match interpreter.execute(statement) {
            Ok(outcome) => {
                if show_rewrites && let Outcome::Rewritten { tree, .. } = &outcome {
                    println!("{tree}");
                }
                if let Some(value) = outcome.into_value() {
                    last = Some(value);
                }
            }
            Err(err) => return fail(filename, source, &err.into()),
        }
    }

    if let Some(value) = last {
        println!("{value}");
    }
    ExitCode::SUCCESS
}

fn fail(filename: &str, source: &str, err: &CarlError) -> ExitCode {
    report_error(filename, source, err);
    ExitCode::from(u8::try_from(err.code()).unwrap_or(1))
}

fn read_source(path: &Path) -> carl::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CarlError::io_error(format!("{}: {e}", path.display())))
}

fn debug_dump(path: &Path, dump: fn(&str, &str) -> carl::Result<()>) -> ExitCode {
    let filename = path.display().to_string();
    let source = match read_source(path) {
        Ok(source) => source,
        Err(err) => return fail(&filename, "", &err),
    };
    match dump(&filename, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&filename, &source, &err),
    }
}

fn parse_file(filename: &str, source: &str) -> carl::Result<()> {
    let ast = carl::parser::parse_source(filename, source)?;
    let json = serde_json::to_string_pretty(&ast)
        .map_err(|e| CarlError::io_error(format!("failed to serialize AST: {e}")))?;
    println!("{json}");
    Ok(())
}

fn tokenize_file(_filename: &str, source: &str) -> carl::Result<()> {
    let tokens = carl::lexer::tokenize(source)?;
    for (tok, span) in &tokens {
        println!("{:?} @ {}..{}", tok, span.start, span.end);
    }
    Ok(())
}
