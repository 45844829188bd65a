//! Forwarding of interrupts to the current foreground child.
//!
//! The shell itself must survive Ctrl-C; only the child of record should
//! die. A process-wide handler reads the pid recorded by the executor and
//! relays SIGINT to it.

use anyhow::{Context, Result};
use nix::libc;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::unistd::{Pid, getpgid};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// The most recently forked child of record, shared with the signal handler.
///
/// `seen_command` stays false until the first non-builtin job runs, which
/// keeps the handler from acting on a pid that was never written. Both
/// fields are plain atomics; a SIGINT landing between `fork` and
/// [`Foreground::record`] observes the previous job's pid.
pub struct Foreground {
    pid: AtomicI32,
    seen_command: AtomicBool,
}

impl Foreground {
    pub const fn new() -> Self {
        Self {
            pid: AtomicI32::new(0),
            seen_command: AtomicBool::new(false),
        }
    }

    /// Remember `pid` as the child of record.
    ///
    /// Called by the executor immediately after every first fork, before any
    /// blocking wait, so an interrupt arriving mid-wait finds a valid pid.
    pub fn record(&self, pid: Pid) {
        self.pid.store(pid.as_raw(), Ordering::SeqCst);
        self.seen_command.store(true, Ordering::SeqCst);
    }

    /// The recorded pid, or `None` if no job has ever been dispatched.
    pub fn current(&self) -> Option<Pid> {
        if self.seen_command.load(Ordering::SeqCst) {
            Some(Pid::from_raw(self.pid.load(Ordering::SeqCst)))
        } else {
            None
        }
    }

    /// Deliver SIGINT to the recorded child, if it still exists.
    ///
    /// Silent when no command has ever run. Reports when the recorded
    /// process is already gone, and reports a delivery failure without
    /// affecting the shell's own control flow.
    pub fn interrupt_current(&self) {
        let Some(pid) = self.current() else {
            return;
        };
        println!("Killing child process...");
        if getpgid(Some(pid)).is_err() {
            println!("No child process to kill!");
            return;
        }
        if let Err(err) = signal::kill(pid, Signal::SIGINT) {
            eprintln!("minish: kill {pid}: {err}");
        }
    }
}

impl Default for Foreground {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide instance the installed handler reads.
pub static FOREGROUND: Foreground = Foreground::new();

extern "C" fn forward_interrupt(_signum: libc::c_int) {
    FOREGROUND.interrupt_current();
}

/// Register the SIGINT handler. Call once at startup.
pub fn install() -> Result<()> {
    unsafe { signal::signal(Signal::SIGINT, SigHandler::Handler(forward_interrupt)) }
        .context("failed to install SIGINT handler")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor;
    use crate::parser::Job;
    use nix::sys::wait::{WaitStatus, waitpid};

    #[test]
    fn interrupt_with_no_recorded_command_is_a_no_op() {
        let foreground = Foreground::new();
        assert!(foreground.current().is_none());
        foreground.interrupt_current();
        assert!(foreground.current().is_none());
    }

    #[test]
    fn interrupt_terminates_the_recorded_child() {
        let foreground = Foreground::new();
        executor::run(
            Job::Background {
                argv: vec!["sleep".into(), "30".into()],
            },
            &foreground,
        )
        .unwrap();

        let pid = foreground.current().expect("background fork recorded a pid");
        foreground.interrupt_current();

        match waitpid(pid, None).unwrap() {
            WaitStatus::Signaled(_, Signal::SIGINT, _) => {}
            status => panic!("expected SIGINT termination, got {status:?}"),
        }
    }
}
