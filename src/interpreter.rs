//! The read-classify-dispatch loop.

use crate::builtin;
use crate::executor;
use crate::lexer;
use crate::parser::Job;
use crate::session::Session;
use crate::signal::Foreground;
use anyhow::Result;
use log::debug;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};

const PROMPT: &str = "shell> ";

const BANNER: &str = "\
================================================
\tminish — a small interactive shell
\tType \"help\" for usage notes
================================================";

/// The interactive shell: owns the session state and drives one iteration
/// per input line.
///
/// Example
/// ```no_run
/// use minish::{Interpreter, signal};
///
/// signal::install().unwrap();
/// let mut shell = Interpreter::default();
/// shell.repl().unwrap();
/// ```
pub struct Interpreter {
    session: Session,
    foreground: &'static Foreground,
}

impl Interpreter {
    /// Create an interpreter recording foreground pids into `foreground`,
    /// which should be the same instance the installed signal handler reads.
    pub fn new(foreground: &'static Foreground) -> Self {
        Self {
            session: Session::new(),
            foreground,
        }
    }

    /// Run the interactive loop until `exit`/`quit` or end-of-input.
    ///
    /// The only error that escapes is a fatal one (a failed fork, or the
    /// line editor breaking); everything else is reported and the loop
    /// continues.
    pub fn repl(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        println!("{BANNER}");
        while !self.session.should_exit {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.execute_line(&line)?;
                }
                // Ctrl-C at the prompt: nothing is running, show a fresh prompt.
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => {
                    println!("{}", builtin::FAREWELL);
                    break;
                }
                Err(err) => {
                    eprintln!("minish: {err}");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Execute one raw input line: record it in the history, then either
    /// dispatch a builtin or hand the classified job to the executor.
    pub fn execute_line(&mut self, raw: &str) -> Result<()> {
        self.execute_line_with_output(raw, &mut io::stdout())
    }

    fn execute_line_with_output(&mut self, raw: &str, out: &mut dyn Write) -> Result<()> {
        let line = lexer::strip_leading_spaces(raw);
        self.session.history.append(line);

        let tokens = lexer::tokenize(line);
        debug!("tokens: {tokens:?}");
        if tokens.is_empty() {
            return Ok(());
        }

        if let Some(result) = builtin::dispatch(&tokens, out, &mut self.session) {
            if let Err(err) = result {
                eprintln!("minish: {err}");
            }
            return Ok(());
        }

        let job = Job::classify(tokens);
        debug!("job: {job:?}");
        executor::run(job, self.foreground)
    }
}

impl Default for Interpreter {
    /// An interpreter wired to the process-wide foreground record that the
    /// installed SIGINT handler targets.
    fn default() -> Self {
        Self::new(&crate::signal::FOREGROUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_builtin_line(shell: &mut Interpreter, line: &str) -> String {
        let mut out = Vec::new();
        shell.execute_line_with_output(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn history_lists_every_submission_including_itself() {
        let mut shell = Interpreter::default();
        run_builtin_line(&mut shell, "help");
        run_builtin_line(&mut shell, "");
        let out = run_builtin_line(&mut shell, "history");
        assert_eq!(out, "help\n\nhistory\n");
    }

    #[test]
    fn leading_spaces_are_not_recorded_in_history() {
        let mut shell = Interpreter::default();
        run_builtin_line(&mut shell, "   help");
        let out = run_builtin_line(&mut shell, "history");
        assert_eq!(out, "help\nhistory\n");
    }

    #[test]
    fn quit_sets_the_exit_flag() {
        let mut shell = Interpreter::default();
        let out = run_builtin_line(&mut shell, "quit");
        assert!(shell.session.should_exit);
        assert_eq!(out, format!("{}\n", builtin::FAREWELL));
    }

    #[test]
    fn whitespace_only_line_only_touches_the_history() {
        let mut shell = Interpreter::default();
        assert!(run_builtin_line(&mut shell, "   ").is_empty());
        let out = run_builtin_line(&mut shell, "history");
        assert_eq!(out, "\nhistory\n");
    }
}
