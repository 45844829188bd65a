//! Classification of a token sequence into a typed job.

use std::path::PathBuf;

/// One classified unit of work derived from a single input line.
///
/// Exactly one operator token, if any, determines the variant. An operator
/// in an invalid position — at index 0, or missing its right-hand operand —
/// is not recognized as an operator at all: it stays a plain argument and
/// the line degrades to [`Job::Simple`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// A command with no operator; may carry zero tokens for an empty line.
    Simple { argv: Vec<String> },
    /// Two commands connected by a single `|`, the left one's standard
    /// output feeding the right one's standard input.
    Pipeline { left: Vec<String>, right: Vec<String> },
    /// A command whose standard output is rerouted into `target`
    /// (created or truncated). The `>` and the target are not part of `argv`.
    Redirect { argv: Vec<String>, target: PathBuf },
    /// A command started without waiting for it. The trailing `&` is not
    /// part of `argv`.
    Background { argv: Vec<String> },
}

enum Operator {
    Pipe,
    Redirect,
    Background,
}

impl Job {
    /// Decide which job a token sequence describes.
    ///
    /// The tokens are scanned left to right once and the first qualifying
    /// operator wins; no precedence exists between `|`, `>` and `&`, so a
    /// line containing several operators is classified by whichever comes
    /// first. Pure function: the same tokens always classify identically.
    pub fn classify(tokens: Vec<String>) -> Job {
        let found = tokens.iter().enumerate().find_map(|(index, token)| {
            let has_follower = index + 1 < tokens.len();
            match token.as_str() {
                "|" if index > 0 && has_follower => Some((Operator::Pipe, index)),
                ">" if index > 0 && has_follower => Some((Operator::Redirect, index)),
                "&" if index > 0 && !has_follower => Some((Operator::Background, index)),
                _ => None,
            }
        });

        match found {
            Some((Operator::Pipe, index)) => {
                let right = tokens[index + 1..].to_vec();
                let mut left = tokens;
                left.truncate(index);
                Job::Pipeline { left, right }
            }
            Some((Operator::Redirect, index)) => {
                // Only the token right after `>` names the target; anything
                // past it is dropped from the argument vector.
                let target = PathBuf::from(&tokens[index + 1]);
                let mut argv = tokens;
                argv.truncate(index);
                Job::Redirect { argv, target }
            }
            Some((Operator::Background, index)) => {
                let mut argv = tokens;
                argv.truncate(index);
                Job::Background { argv }
            }
            None => Job::Simple { argv: tokens },
        }
    }
}
