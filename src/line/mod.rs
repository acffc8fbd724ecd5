use std::fmt;

use anyhow::Result;
use nix::unistd::{getpid, Pid};
use unicode_segmentation::UnicodeSegmentation;

use crate::shell::Shell;
use crate::sources::SourceKind;

pub mod invocation;
use invocation::Invocation;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LineKind {
    Blank,
    Comment,
    Command,
}

// Represents a single physical line given to the shell.  Occurrences of
// `$$` are replaced with the shell's pid before tokenization, so the
// expansion applies everywhere in the line, not just to whole tokens.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    rawline: String, // Original text, without trailing newlines
    line_kind: LineKind,
    line_num: usize,
    source: SourceKind,
    tokens: Vec<String>,
}

impl Line {
    pub fn new(mut rawline: String, line_num: usize, source: SourceKind) -> Line {
        while rawline.ends_with('\n') {
            rawline.pop();
        }

        let line_kind = get_line_kind(rawline.as_str());

        let tokens = if line_kind == LineKind::Command {
            get_tokens(expand_pid(rawline.as_str(), getpid()).as_str())
        } else {
            Vec::new()
        };

        Line {
            rawline,
            line_kind,
            line_num,
            source,
            tokens,
        }
    }

    pub fn execute(&mut self, minsh: &mut Shell) -> Result<()> {
        match self.line_kind {
            LineKind::Blank | LineKind::Comment => Ok(()),
            LineKind::Command => {
                if let Some(invocation) = Invocation::new(self.tokens.clone())? {
                    invocation.execute(minsh)
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn kind(&self) -> &LineKind {
        &self.line_kind
    }

    pub fn rawline(&self) -> &str {
        &self.rawline
    }

    pub fn source(&self) -> &SourceKind {
        &self.source
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            SourceKind::Tty => {
                write!(f, "\tTTY line {}: {}", self.line_num, self.rawline)
            }
            SourceKind::Script(s) => {
                write!(f, "\tScript `{}` line {}: {}", s, self.line_num, self.rawline)
            }
        }
    }
}

// A line is a no-op if it is empty (or only whitespace) or if its first
// character is `#`.  Classification happens before pid expansion, so a
// comment containing `$$` stays untouched.
fn get_line_kind(text: &str) -> LineKind {
    if text.trim().is_empty() {
        LineKind::Blank
    } else if text.starts_with('#') {
        LineKind::Comment
    } else {
        LineKind::Command
    }
}

// Replaces every occurrence of `$$` with the given pid.  Takes the pid
// as an argument rather than reading it, so expansion is testable.
fn expand_pid(text: &str, pid: Pid) -> String {
    text.replace("$$", pid.to_string().as_str())
}

// Breaks a line into whitespace-separated tokens.  There are no quoting
// rules; whitespace always separates.
fn get_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::<String>::new();
    let mut token = String::new();

    for grapheme in text.graphemes(true) {
        match grapheme {
            " " | "\t" | "\n" => {
                if !token.is_empty() {
                    tokens.push(token);
                    token = String::new();
                }
            }
            _ => {
                token.push_str(grapheme);
            }
        }
    }

    if !token.is_empty() {
        tokens.push(token);
    }

    tokens
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ls", vec!["ls"])]
    #[case("ls -la /tmp", vec!["ls", "-la", "/tmp"])]
    #[case("  spaced   out  ", vec!["spaced", "out"])]
    #[case("tabs\there", vec!["tabs", "here"])]
    #[case("", vec![])]
    fn tokens_are_split_on_whitespace(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(get_tokens(text), expected);
    }

    #[test]
    fn pid_placeholder_expands_everywhere() {
        let pid = Pid::from_raw(4567);

        assert_eq!(expand_pid("echo $$", pid), "echo 4567");
        assert_eq!(expand_pid("mkdir dir$$ file$$.txt", pid), "mkdir dir4567 file4567.txt");
        assert_eq!(expand_pid("no placeholder", pid), "no placeholder");
    }

    #[test]
    fn expanded_line_tokenizes_to_program_and_pid() {
        let text = expand_pid("echo $$", Pid::from_raw(4567));

        assert_eq!(get_tokens(text.as_str()), vec!["echo", "4567"]);
    }

    #[rstest]
    #[case("", LineKind::Blank)]
    #[case("   ", LineKind::Blank)]
    #[case("# a comment", LineKind::Comment)]
    #[case("#comment", LineKind::Comment)]
    #[case("echo hello", LineKind::Command)]
    fn lines_are_classified(#[case] text: &str, #[case] expected: LineKind) {
        assert_eq!(get_line_kind(text), expected);
    }

    #[test]
    fn blank_and_comment_lines_carry_no_tokens() {
        let blank = Line::new("\n".to_string(), 1, SourceKind::Tty);
        let comment = Line::new("# echo $$\n".to_string(), 2, SourceKind::Tty);

        assert_eq!(*blank.kind(), LineKind::Blank);
        assert_eq!(*comment.kind(), LineKind::Comment);
        assert!(blank.tokens.is_empty());
        assert!(comment.tokens.is_empty());
    }
}
