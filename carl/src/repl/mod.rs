//! REPL (Read-Eval-Print Loop) for Carl

mod session;

pub use session::Session;

use crate::error::report_error;
use crate::interp::Outcome;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "> ";
const HISTORY_FILE: &str = ".carl_history";

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL, loading history from `history_path` when given
    pub fn new(history_path: Option<PathBuf>) -> RlResult<Self> {
        let mut editor = DefaultEditor::new()?;

        if let Some(ref path) = history_path
            && let Err(err) = editor.load_history(path)
        {
            tracing::debug!(path = %path.display(), %err, "no history loaded");
        }

        Ok(Repl {
            editor,
            session: Session::new(),
            history_path,
        })
    }

    /// `$HOME/.carl_history`
    pub fn default_history_path() -> Option<PathBuf> {
        dirs_home().map(|h| h.join(HISTORY_FILE))
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("Carl REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with(':') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.eval_input(line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path
            && let Err(err) = self.editor.save_history(path)
        {
            tracing::warn!(path = %path.display(), %err, "failed to save history");
        }

        Ok(())
    }

    /// Handle REPL commands (starting with :). Returns true to exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                self.print_help();
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            ":rules" => {
                self.print_rules();
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    /// Print help message
    fn print_help(&self) {
        println!("Carl REPL Commands:");
        println!("  :help, :h, :?   Show this help");
        println!("  :quit, :q       Exit the REPL");
        println!("  :clear          Clear the screen");
        println!("  :rules          List defined rules");
        println!();
        println!("You can enter:");
        println!("  - Expressions: (69 + 420) / 2");
        println!("  - Rule definitions: define zero -> \"A\" + 0 = \"A\"");
        println!("  - Rule applications: apply zero : 5 + 0");
        println!();
        println!("A missing ';' at the end of a line is added for you.");
    }

    fn print_rules(&self) {
        let rules = self.session.rules();
        if rules.is_empty() {
            println!("No rules defined.");
            return;
        }
        for rule in rules.iter() {
            println!("  {rule}");
        }
    }

    /// Evaluate one line, printing results or a diagnostic
    fn eval_input(&mut self, input: &str) {
        match self.session.eval_line(input) {
            Ok(outcomes) => {
                for outcome in &outcomes {
                    print_outcome(outcome);
                }
            }
            Err(err) => report_error("<repl>", input, &err),
        }
    }
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Defined { .. } => println!("{outcome}"),
        Outcome::Value(value) => println!("{value}"),
        Outcome::Rewritten { tree, value } => {
            println!("{tree}");
            println!("{value}");
        }
    }
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repl_new() {
        let repl = Repl::new(None);
        assert!(repl.is_ok());
    }

    #[test]
    fn test_handle_command_quit() {
        let mut repl = Repl::new(None).unwrap();
        assert!(repl.handle_command(":quit"));
        assert!(repl.handle_command(":q"));
        assert!(repl.handle_command(":exit"));
    }

    #[test]
    fn test_handle_command_returns_correctly() {
        let mut repl = Repl::new(None).unwrap();
        assert!(!repl.handle_command(":help"));
        assert!(!repl.handle_command(":h"));
        assert!(!repl.handle_command(":clear"));
        assert!(!repl.handle_command(":rules"));
        assert!(!repl.handle_command(":anything_else"));
    }

    #[test]
    fn test_eval_input_keeps_rules() {
        let mut repl = Repl::new(None).unwrap();
        repl.eval_input(r#"define zero -> "A" + 0 = "A""#);
        repl.eval_input("apply zero : 5 + 0");
        assert!(repl.session.rules().contains("zero"));
    }

    #[test]
    fn test_eval_input_invalid_does_not_panic() {
        let mut repl = Repl::new(None).unwrap();
        repl.eval_input("@#$%");
        repl.eval_input("apply nothing : 1");
        repl.eval_input("1 + 1");
    }

    #[test]
    fn test_missing_history_file_is_not_an_error() {
        let path = std::env::temp_dir().join("carl-history-that-does-not-exist");
        let repl = Repl::new(Some(path.clone())).unwrap();
        assert_eq!(repl.history_path, Some(path));
    }

    #[test]
    fn test_default_history_path() {
        if let Some(path) = Repl::default_history_path() {
            assert!(path.ends_with(HISTORY_FILE));
        }
    }

    #[test]
    fn test_constants() {
        assert_eq!(PROMPT, "> ");
        assert_eq!(HISTORY_FILE, ".carl_history");
    }
}
