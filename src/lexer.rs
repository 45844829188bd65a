//! Line tokenization for the interactive loop.
//!
//! Splitting is deliberately narrow: words are separated by single space
//! characters only. Tabs are neither trimmed nor treated as separators, so
//! they stay embedded in whatever token contains them.

/// Remove leading space characters from a line.
///
/// This runs before tokenization as its own step and removes `' '` only;
/// a line starting with a tab is returned unchanged.
pub fn strip_leading_spaces(line: &str) -> &str {
    line.trim_start_matches(' ')
}

/// Split a line into argv-style tokens.
///
/// One trailing newline is removed if present, then the line is split on
/// space characters. Empty tokens never appear in the result, so a run of
/// spaces acts as a single separator. Token order follows the input.
pub fn tokenize(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_spaces_are_stripped_but_tabs_are_kept() {
        assert_eq!(strip_leading_spaces("   ls -a"), "ls -a");
        assert_eq!(strip_leading_spaces("\tls"), "\tls");
        assert_eq!(strip_leading_spaces("  \tls"), "\tls");
    }

    #[test]
    fn splits_on_single_spaces() {
        assert_eq!(tokenize("ls -a /tmp"), vec!["ls", "-a", "/tmp"]);
    }

    #[test]
    fn runs_of_spaces_produce_no_empty_tokens() {
        assert_eq!(tokenize("ls    -a"), vec!["ls", "-a"]);
        assert_eq!(tokenize("ls -a   "), vec!["ls", "-a"]);
    }

    #[test]
    fn trailing_newline_is_removed_from_the_last_token() {
        assert_eq!(tokenize("wc -c\n"), vec!["wc", "-c"]);
    }

    #[test]
    fn tabs_are_not_separators() {
        assert_eq!(tokenize("a\tb c"), vec!["a\tb", "c"]);
    }

    #[test]
    fn whitespace_only_line_yields_no_tokens() {
        assert!(tokenize(strip_leading_spaces("   \n")).is_empty());
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n").is_empty());
    }
}
