//! Commands implemented inside the shell process itself.
//!
//! Builtins are parsed with [`argh`] (`FromArgs`) and executed directly
//! in-process; none of them fork. Dispatch looks only at the first token,
//! so operator tokens on a builtin line are never interpreted.

use crate::session::Session;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::env;
use std::io::Write;
use std::path::Path;

/// Printed by `exit`/`quit` and on end-of-input.
pub const FAREWELL: &str = "Exiting...";

const HELP_TEXT: &str = "\
================================================
minish supports:
  - programs found on PATH (pwd, ls, wc, ...),
  - builtins: cd, help, history, exit/quit,
  - a single pipe stage         e.g. ls -a | wc
  - output redirection          e.g. cat /proc/self/maps > maps.txt
  - background execution        e.g. sleep 30 &

Notes:
  - Builtins and the |, > and & operators cannot be combined on one line.
  - Ctrl-C interrupts the running foreground command, not the shell itself.
================================================";

/// A command executed without spawning.
pub(crate) trait Builtin: Sized + FromArgs {
    /// Names this builtin answers to; the first one is canonical.
    fn names() -> &'static [&'static str];

    /// Perform the command, writing any output or diagnostics to `out`.
    fn run(self, out: &mut dyn Write, session: &mut Session) -> Result<()>;
}

/// Try to execute `argv` as a builtin.
///
/// Returns `None` when the first token names no builtin, deferring the job
/// to the process orchestrator. Argument-parse failures print the usage
/// text and count as handled.
pub(crate) fn dispatch(
    argv: &[String],
    out: &mut dyn Write,
    session: &mut Session,
) -> Option<Result<()>> {
    if argv.is_empty() {
        return None;
    }
    if let Some(result) = try_builtin::<Exit>(argv, out, session) {
        return Some(result);
    }
    if let Some(result) = try_builtin::<Help>(argv, out, session) {
        return Some(result);
    }
    if let Some(result) = try_builtin::<History>(argv, out, session) {
        return Some(result);
    }
    if let Some(result) = try_builtin::<Cd>(argv, out, session) {
        return Some(result);
    }
    None
}

fn try_builtin<T: Builtin>(
    argv: &[String],
    out: &mut dyn Write,
    session: &mut Session,
) -> Option<Result<()>> {
    let name = argv[0].as_str();
    if !T::names().contains(&name) {
        return None;
    }
    let args: Vec<&str> = argv[1..].iter().map(String::as_str).collect();
    Some(match T::from_args(&[name], &args) {
        Ok(command) => command.run(out, session),
        Err(EarlyExit { output, .. }) => writeln!(out, "{output}").map_err(Into::into),
    })
}

#[derive(FromArgs)]
/// Leave the shell.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored; exit always ends the session.
    pub _rest: Vec<String>,
}

impl Builtin for Exit {
    fn names() -> &'static [&'static str] {
        &["exit", "quit"]
    }

    fn run(self, out: &mut dyn Write, session: &mut Session) -> Result<()> {
        writeln!(out, "{FAREWELL}")?;
        session.should_exit = true;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Print usage notes for the shell.
pub struct Help {}

impl Builtin for Help {
    fn names() -> &'static [&'static str] {
        &["help"]
    }

    fn run(self, out: &mut dyn Write, _session: &mut Session) -> Result<()> {
        writeln!(out, "{HELP_TEXT}")?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Print every line submitted this session.
pub struct History {}

impl Builtin for History {
    fn names() -> &'static [&'static str] {
        &["history"]
    }

    fn run(self, out: &mut dyn Write, session: &mut Session) -> Result<()> {
        out.write_all(session.history.as_str().as_bytes())?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Change the working directory.
pub struct Cd {
    #[argh(positional)]
    /// target directory; `..` moves to the parent.
    pub target: Option<String>,
}

impl Builtin for Cd {
    fn names() -> &'static [&'static str] {
        &["cd"]
    }

    fn run(self, out: &mut dyn Write, _session: &mut Session) -> Result<()> {
        let Some(target) = self.target else {
            writeln!(out, "cd: missing directory argument")?;
            return Ok(());
        };
        // On failure the working directory is left untouched.
        if let Err(err) = env::set_current_dir(Path::new(&target)) {
            writeln!(out, "cd: {target}: {err}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // cd mutates the process-wide working directory; serialize those tests.
    static CWD_LOCK: Mutex<()> = Mutex::new(());

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn run_line(words: &[&str], session: &mut Session) -> Option<String> {
        let mut out = Vec::new();
        let handled = dispatch(&argv(words), &mut out, session)?;
        handled.unwrap();
        Some(String::from_utf8(out).unwrap())
    }

    #[test]
    fn unknown_names_are_not_builtins() {
        let mut session = Session::new();
        assert!(run_line(&["ls"], &mut session).is_none());
        assert!(run_line(&["exitx"], &mut session).is_none());
    }

    #[test]
    fn exit_and_quit_set_the_exit_flag_and_print_the_farewell() {
        for name in ["exit", "quit"] {
            let mut session = Session::new();
            let out = run_line(&[name], &mut session).unwrap();
            assert!(session.should_exit);
            assert_eq!(out, format!("{FAREWELL}\n"));
        }
    }

    #[test]
    fn help_prints_the_usage_text() {
        let mut session = Session::new();
        let out = run_line(&["help"], &mut session).unwrap();
        assert!(out.contains("history"));
        assert!(!session.should_exit);
    }

    #[test]
    fn history_prints_the_buffer_verbatim() {
        let mut session = Session::new();
        session.history.append("ls -a");
        session.history.append("");
        session.history.append("history");
        let out = run_line(&["history"], &mut session).unwrap();
        assert_eq!(out, "ls -a\n\nhistory\n");
    }

    #[test]
    fn cd_without_argument_reports_and_keeps_the_directory() {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = env::current_dir().unwrap();
        let mut session = Session::new();
        let out = run_line(&["cd"], &mut session).unwrap();
        assert!(out.starts_with("cd:"));
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn cd_to_a_missing_path_reports_and_keeps_the_directory() {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = env::current_dir().unwrap();
        let mut session = Session::new();
        let out = run_line(&["cd", "/minish-no-such-directory"], &mut session).unwrap();
        assert!(out.starts_with("cd:"));
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn cd_dot_dot_moves_to_the_parent() {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = env::current_dir().unwrap();

        let base = tempdir().unwrap();
        let nested = base.path().join("nested");
        fs::create_dir(&nested).unwrap();
        env::set_current_dir(&nested).unwrap();

        let mut session = Session::new();
        let out = run_line(&["cd", ".."], &mut session).unwrap();
        assert!(out.is_empty());
        assert_eq!(
            env::current_dir().unwrap().canonicalize().unwrap(),
            base.path().canonicalize().unwrap()
        );

        env::set_current_dir(&before).unwrap();
    }
}
