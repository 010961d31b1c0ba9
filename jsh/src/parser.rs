//! Turns one raw input line into a [`CommandLine`].
//!
//! Only the shape the job shell needs is understood: whitespace separated words
//! with POSIX quoting and an optional trailing `&` that puts the command in the
//! background. Pipes and redirections are passed through as plain words.

use anyhow::Result;
use jsh_types::JshError;
use tracing::debug;

pub const BACKGROUND_MARKER: char = '&';
pub const DEBUG_FLAG: &str = "-d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub arguments: Vec<String>,
    pub blocking: bool,
}

impl CommandLine {
    pub fn new(arguments: Vec<String>, blocking: bool) -> Self {
        CommandLine {
            arguments,
            blocking,
        }
    }

    /// Program or verb name.
    pub fn name(&self) -> &str {
        self.arguments.first().map(|s| s.as_str()).unwrap_or_default()
    }

    pub fn is_debug(&self) -> bool {
        self.arguments.iter().any(|a| a == DEBUG_FLAG)
    }
}

/// Parses a line. Blank lines and comments yield `None`.
pub fn parse_line(input: &str) -> Result<Option<CommandLine>> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut words =
        shell_words::split(trimmed).map_err(|e| JshError::Parse(format!("{e}: {trimmed}")))?;

    let mut blocking = true;
    if let Some(last) = words.last_mut() {
        // only an unquoted, unescaped trailing marker counts
        if ends_with_marker(trimmed) && last.ends_with(BACKGROUND_MARKER) {
            blocking = false;
            last.pop();
            if last.is_empty() {
                words.pop();
            }
        }
    }

    if words.is_empty() {
        debug!("parse_line: nothing to run in {:?}", trimmed);
        return Ok(None);
    }

    debug!("parse_line: {:?} blocking:{}", words, blocking);
    Ok(Some(CommandLine::new(words, blocking)))
}

fn ends_with_marker(line: &str) -> bool {
    match line.strip_suffix(BACKGROUND_MARKER) {
        Some(rest) => rest.chars().rev().take_while(|c| *c == '\\').count() % 2 == 0,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(cmd: &CommandLine) -> Vec<&str> {
        cmd.arguments.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn simple_blocking_command() {
        let cmd = parse_line("ls -l /tmp\n").unwrap().unwrap();
        assert_eq!(words(&cmd), vec!["ls", "-l", "/tmp"]);
        assert!(cmd.blocking);
        assert_eq!(cmd.name(), "ls");
        assert!(!cmd.is_debug());
    }

    #[test]
    fn trailing_ampersand_runs_in_background() {
        let cmd = parse_line("sleep 100 &").unwrap().unwrap();
        assert_eq!(words(&cmd), vec!["sleep", "100"]);
        assert!(!cmd.blocking);

        let cmd = parse_line("sleep 100&").unwrap().unwrap();
        assert_eq!(words(&cmd), vec!["sleep", "100"]);
        assert!(!cmd.blocking);
    }

    #[test]
    fn quoted_ampersand_is_an_argument() {
        let cmd = parse_line("echo '&'").unwrap().unwrap();
        assert_eq!(words(&cmd), vec!["echo", "&"]);
        assert!(cmd.blocking);
    }

    #[test]
    fn escaped_ampersand_is_an_argument() {
        let cmd = parse_line(r"echo a\&").unwrap().unwrap();
        assert_eq!(words(&cmd), vec!["echo", "a&"]);
        assert!(cmd.blocking);

        let cmd = parse_line(r"echo \&").unwrap().unwrap();
        assert_eq!(words(&cmd), vec!["echo", "&"]);
        assert!(cmd.blocking);
    }

    #[test]
    fn escaped_backslash_before_ampersand_still_backgrounds() {
        let cmd = parse_line(r"echo a\\&").unwrap().unwrap();
        assert_eq!(words(&cmd), vec!["echo", r"a\"]);
        assert!(!cmd.blocking);
    }

    #[test]
    fn quoting_is_honoured() {
        let cmd = parse_line(r#"echo "hello world" 'a b'"#).unwrap().unwrap();
        assert_eq!(words(&cmd), vec!["echo", "hello world", "a b"]);
    }

    #[test]
    fn blank_comment_and_lone_marker_are_empty() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   \n").unwrap(), None);
        assert_eq!(parse_line("# comment").unwrap(), None);
        assert_eq!(parse_line("&").unwrap(), None);
    }

    #[test]
    fn debug_flag_anywhere() {
        let cmd = parse_line("true -d &").unwrap().unwrap();
        assert!(cmd.is_debug());
        assert!(!cmd.blocking);
    }

    #[test]
    fn unbalanced_quote_is_an_error() {
        let err = parse_line("echo 'oops").unwrap_err();
        assert!(err.to_string().starts_with("parse error"));
    }
}
