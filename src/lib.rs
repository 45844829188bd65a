//! A small interactive Unix shell.
//!
//! One line of input is read at a time, classified into a [`parser::Job`],
//! and executed either in-process (builtins such as `cd` and `history`) or
//! by spawning child processes with the descriptor wiring the job calls for:
//! a single pipe stage (`|`), output redirection to a file (`>`), or
//! detached background execution (`&`). A process-wide SIGINT handler
//! forwards interrupts to the current foreground child instead of the shell.
//!
//! The main entry point is [`Interpreter`], which owns the session state and
//! drives the read-classify-dispatch loop. The public modules expose the
//! individual stages for reuse and testing.

mod builtin;
pub mod executor;
mod interpreter;
pub mod lexer;
pub mod parser;
pub mod session;
pub mod signal;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;
