//! The read loop: one line in, one command dispatched.

use crate::errors::display_user_error;
use crate::shell::Shell;
use anyhow::{Context as _, Result};
use jsh_types::{Context, JshError, JshResult};
use std::io::{BufRead, Read};
use tracing::{debug, warn};

/// Longest accepted input line, excluding the newline.
pub const MAX_LINE: usize = 2048;

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Line(String),
    TooLong,
    Eof,
}

/// Reads one line without ever buffering more than `MAX_LINE + 1` bytes of it.
///
/// The rest of an overlong line is consumed and discarded.
pub fn read_command_line<R: BufRead>(reader: &mut R) -> JshResult<Input> {
    let mut buf = Vec::with_capacity(128);
    let n = reader
        .by_ref()
        .take(MAX_LINE as u64 + 1)
        .read_until(b'\n', &mut buf)?;
    if n == 0 {
        return Ok(Input::Eof);
    }

    if !buf.ends_with(b"\n") && buf.len() > MAX_LINE {
        let mut rest = Vec::new();
        loop {
            rest.clear();
            let n = reader.by_ref().take(4096).read_until(b'\n', &mut rest)?;
            if n == 0 || rest.ends_with(b"\n") {
                break;
            }
        }
        return Ok(Input::TooLong);
    }

    Ok(Input::Line(String::from_utf8_lossy(&buf).into_owned()))
}

pub struct Repl<'a> {
    pub shell: &'a mut Shell,
}

impl<'a> Repl<'a> {
    pub fn new(shell: &'a mut Shell) -> Self {
        Repl { shell }
    }

    fn print_banner(&self, ctx: &Context) -> Result<()> {
        let cwd = std::env::current_dir().context("getcwd() failed")?;
        ctx.write_stdout(&format!("Shell is running in {}:", cwd.display()))
    }

    /// Runs until `quit`, end of input or a read error.
    ///
    /// A read error is returned after the job table has been released.
    pub fn run<R: BufRead>(&mut self, ctx: &mut Context, mut reader: R) -> Result<()> {
        if let Err(err) = self.print_banner(ctx) {
            display_user_error(ctx, &err);
        }

        let result = loop {
            let line = match read_command_line(&mut reader) {
                Ok(Input::Line(line)) => line,
                Ok(Input::TooLong) => {
                    warn!("input line longer than {} bytes dropped", MAX_LINE);
                    display_user_error(ctx, &anyhow::Error::from(JshError::Input(MAX_LINE)));
                    continue;
                }
                Ok(Input::Eof) => {
                    debug!("end of input");
                    break Ok(());
                }
                Err(err) => {
                    let err = anyhow::Error::from(err);
                    break Err(err.context("Error reading command from stdin"));
                }
            };

            match self.shell.eval_line(ctx, &line) {
                Ok(status) => debug!("eval {:?} -> {:?}", line.trim_end(), status),
                Err(err) => display_user_error(ctx, &err),
            }

            if self.shell.is_exited() {
                break Ok(());
            }
        };

        self.shell.shutdown();
        if result.is_ok() {
            ctx.write_stdout("closed shell normally")?;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_until_eof() {
        let mut input = Cursor::new("procs\nquit");
        assert_eq!(
            read_command_line(&mut input).unwrap(),
            Input::Line("procs\n".to_string())
        );
        assert_eq!(
            read_command_line(&mut input).unwrap(),
            Input::Line("quit".to_string())
        );
        assert_eq!(read_command_line(&mut input).unwrap(), Input::Eof);
    }

    #[test]
    fn line_of_exactly_max_length_is_accepted() {
        let line = format!("{}\n", "a".repeat(MAX_LINE));
        let mut input = Cursor::new(line.clone());
        assert_eq!(read_command_line(&mut input).unwrap(), Input::Line(line));
    }

    #[test]
    fn overlong_line_is_rejected_and_skipped() {
        let text = format!("{}\nprocs\n", "x".repeat(MAX_LINE * 3));
        let mut input = Cursor::new(text);
        assert_eq!(read_command_line(&mut input).unwrap(), Input::TooLong);
        assert_eq!(
            read_command_line(&mut input).unwrap(),
            Input::Line("procs\n".to_string())
        );
    }

    #[test]
    fn overlong_last_line_without_newline() {
        let mut input = Cursor::new("y".repeat(MAX_LINE + 1));
        assert_eq!(read_command_line(&mut input).unwrap(), Input::TooLong);
        assert_eq!(read_command_line(&mut input).unwrap(), Input::Eof);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut input = Cursor::new(b"echo \xff\n".to_vec());
        let Input::Line(line) = read_command_line(&mut input).unwrap() else {
            panic!("expected a line");
        };
        assert!(line.contains('\u{FFFD}'));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut shell = Shell::new();
        let mut ctx = Context::new(shell.pid);
        let input = Cursor::new("quit\nnotarealcommand\n");
        Repl::new(&mut shell).run(&mut ctx, input).unwrap();
        assert!(shell.is_exited());
    }

    #[test]
    fn errors_do_not_stop_the_loop() {
        let mut shell = Shell::new();
        let mut ctx = Context::new(shell.pid);
        let input = Cursor::new("echo 'unbalanced\ncd /nonexistent\nquit\n");
        Repl::new(&mut shell).run(&mut ctx, input).unwrap();
        assert!(shell.is_exited());
    }

    #[test]
    fn eof_without_quit_is_normal() {
        let mut shell = Shell::new();
        let mut ctx = Context::new(shell.pid);
        Repl::new(&mut shell)
            .run(&mut ctx, Cursor::new("true\n"))
            .unwrap();
        assert!(!shell.is_exited());
        assert!(shell.jobs().is_empty());
    }
}
