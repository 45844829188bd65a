//! Realization of classified jobs as operating-system processes.
//!
//! Each non-builtin job becomes one or two children created with `fork` and
//! replaced with the target program via `execvp`. The parent records the
//! first child's pid in the shared [`Foreground`] record before it starts
//! waiting, so an interrupt arriving mid-wait can still find its target.
//!
//! Failure policy: a failed `fork` is returned as an error and ends the
//! whole session. A failed `execvp` ends only the child, which prints a
//! diagnostic and exits nonzero. Descriptor problems (`pipe`, `dup2`, the
//! redirect open) are reported and execution continues best-effort.

use crate::parser::Job;
use crate::signal::Foreground;
use anyhow::{Context, Result};
use log::debug;
use nix::errno::Errno;
use nix::libc;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{self, ForkResult, Pid};
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::process;

/// Execute one classified job, blocking until its foreground children have
/// been reaped. Background children are left running and are not tracked
/// beyond the pid record.
pub fn run(job: Job, foreground: &Foreground) -> Result<()> {
    match job {
        Job::Simple { argv } => {
            if argv.is_empty() {
                return Ok(());
            }
            run_foreground(&argv, None, foreground)
        }
        Job::Redirect { argv, target } => run_foreground(&argv, Some(target.as_path()), foreground),
        Job::Pipeline { left, right } => run_pipeline(&left, &right, foreground),
        Job::Background { argv } => run_background(&argv, foreground),
    }
}

/// `Simple` and `Redirect`: one child, waited for; exit status not inspected.
fn run_foreground(argv: &[String], redirect: Option<&Path>, foreground: &Foreground) -> Result<()> {
    flush_stdout();
    match unsafe { unistd::fork() }.context("fork failed")? {
        ForkResult::Child => {
            if let Some(target) = redirect {
                redirect_stdout(target);
            }
            exec_program(argv)
        }
        ForkResult::Parent { child } => {
            foreground.record(child);
            debug!("foreground child {child} for {:?}", argv[0]);
            if let Err(err) = waitpid(child, None) {
                eprintln!("minish: waitpid {child}: {err}");
            }
            Ok(())
        }
    }
}

/// `Pipeline`: the pipe exists before either fork, and every process closes
/// the ends it does not use — otherwise the reader never sees end-of-file.
fn run_pipeline(left: &[String], right: &[String], foreground: &Foreground) -> Result<()> {
    let (read_end, write_end) = match unistd::pipe() {
        Ok(ends) => ends,
        Err(err) => {
            // Nothing useful can run without the pipe; give up on the job
            // but keep the shell alive.
            eprintln!("minish: pipe: {err}");
            return Ok(());
        }
    };

    flush_stdout();
    match unsafe { unistd::fork() }.context("fork failed")? {
        ForkResult::Child => {
            // Writer: stdout becomes the pipe's write end.
            if let Err(err) = unistd::dup2(write_end.as_raw_fd(), libc::STDOUT_FILENO) {
                eprintln!("minish: dup2: {err}");
            }
            drop(read_end);
            drop(write_end);
            exec_program(left)
        }
        ForkResult::Parent { child: left_pid } => {
            foreground.record(left_pid);
            match unsafe { unistd::fork() }.context("fork failed")? {
                ForkResult::Child => {
                    // Reader: stdin becomes the pipe's read end.
                    if let Err(err) = unistd::dup2(read_end.as_raw_fd(), libc::STDIN_FILENO) {
                        eprintln!("minish: dup2: {err}");
                    }
                    drop(read_end);
                    drop(write_end);
                    exec_program(right)
                }
                ForkResult::Parent { child: right_pid } => {
                    // The parent never touches the pipe; both ends must be
                    // closed here before waiting.
                    drop(read_end);
                    drop(write_end);
                    debug!("pipeline children {left_pid} and {right_pid}");
                    report_wait(left_pid);
                    report_wait(right_pid);
                    Ok(())
                }
            }
        }
    }
}

/// `Background`: the parent returns to the prompt without waiting. The child
/// is reaped at shell exit; no background job set is kept.
fn run_background(argv: &[String], foreground: &Foreground) -> Result<()> {
    flush_stdout();
    match unsafe { unistd::fork() }.context("fork failed")? {
        ForkResult::Child => exec_program(argv),
        ForkResult::Parent { child } => {
            foreground.record(child);
            debug!("background child {child} for {:?}", argv[0]);
            Ok(())
        }
    }
}

/// Replace the child's image with `argv`. Never returns; an exec failure
/// ends the child with a nonzero status and leaves the parent untouched.
fn exec_program(argv: &[String]) -> ! {
    let args: Vec<CString> = match argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<_, _>>()
    {
        Ok(args) => args,
        Err(_) => {
            eprintln!("minish: {}: argument contains a NUL byte", argv[0]);
            process::exit(1);
        }
    };
    match unistd::execvp(&args[0], &args) {
        Err(Errno::ENOENT) => {
            eprintln!("minish: {}: command not found", argv[0]);
            process::exit(127);
        }
        Err(err) => {
            eprintln!("minish: {}: {err}", argv[0]);
            process::exit(126);
        }
        Ok(never) => match never {},
    }
}

/// Child-side half of `Redirect`: point stdout at the target file.
///
/// An open failure is reported and the exec still proceeds, leaving the
/// child's output on the terminal.
fn redirect_stdout(target: &Path) {
    match open_target(target) {
        Ok(file) => {
            if let Err(err) = unistd::dup2(file.as_raw_fd(), libc::STDOUT_FILENO) {
                eprintln!("minish: dup2: {err}");
            }
            drop(file);
        }
        Err(err) => eprintln!("minish: {}: {err}", target.display()),
    }
}

/// Write-only, create-or-truncate, owner read/write permissions.
fn open_target(target: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(target)
}

/// Wait for one pipeline child, reporting a status only when it did not
/// exit normally.
fn report_wait(pid: Pid) {
    match waitpid(pid, None) {
        Ok(WaitStatus::Exited(..)) => {}
        Ok(status) => println!("minish: process {pid} did not exit normally: {status:?}"),
        Err(err) => eprintln!("minish: waitpid {pid}: {err}"),
    }
}

/// Buffered prompt or banner text must not be duplicated into children.
fn flush_stdout() {
    io::stdout().flush().ok();
}
