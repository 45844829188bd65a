//! Per-session mutable state shared between the read loop and the builtins.

/// State that outlives a single input line.
///
/// The history buffer and the exit flag are the only pieces of session
/// state; everything else is created fresh per iteration. `should_exit` is
/// checked by the interactive loop before each read, so a builtin can end
/// the session without unwinding through it.
#[derive(Debug, Default)]
pub struct Session {
    /// Every line submitted so far, in order.
    pub history: History,
    /// When set to true, indicates that the interactive loop should exit.
    pub should_exit: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Append-only record of every submitted line.
///
/// Each entry is stored newline-terminated, including a bare newline for an
/// empty submission. The buffer lives for the whole session and is released
/// when the session drops.
#[derive(Debug, Default)]
pub struct History {
    text: String,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one submitted line.
    ///
    /// The line is stored with exactly one trailing newline whether or not
    /// the caller's copy still carries one.
    pub fn append(&mut self, line: &str) {
        let line = line.strip_suffix('\n').unwrap_or(line);
        self.text.push_str(line);
        self.text.push('\n');
    }

    /// The full history text, verbatim.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_recorded_in_submission_order() {
        let mut history = History::new();
        history.append("ls -a");
        history.append("cd ..");
        assert_eq!(history.as_str(), "ls -a\ncd ..\n");
    }

    #[test]
    fn empty_submission_records_a_bare_newline() {
        let mut history = History::new();
        history.append("");
        history.append("pwd");
        assert_eq!(history.as_str(), "\npwd\n");
    }

    #[test]
    fn lines_are_newline_terminated_exactly_once() {
        let mut history = History::new();
        history.append("ls\n");
        assert_eq!(history.as_str(), "ls\n");
    }
}
