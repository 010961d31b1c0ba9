use anyhow::Result;
use libc::{STDERR_FILENO, STDOUT_FILENO};
use nix::unistd::Pid;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::mem;
use std::os::unix::io::FromRawFd;
use std::os::unix::io::RawFd;
use thiserror::Error;

pub mod job;
pub use job::JobState;

/// jsh specific error types
#[derive(Error, Debug)]
pub enum JshError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{name}: {message}")]
    Spawn { name: String, message: String },

    #[error("failed to send {signal} to {pid}: {source}")]
    Signal {
        pid: Pid,
        signal: nix::sys::signal::Signal,
        source: nix::errno::Errno,
    },

    #[error("invalid pid: {0}")]
    InvalidPid(String),

    #[error("input line too long (max {0} bytes)")]
    Input(usize),

    #[error("system call failed: {0}")]
    System(#[from] nix::errno::Errno),
}

pub type JshResult<T> = std::result::Result<T, JshError>;

/// Per-command execution context handed to built-ins and the launcher.
#[derive(Clone)]
pub struct Context {
    pub shell_pid: Pid,
    pub outfile: RawFd,
    pub errfile: RawFd,
}

impl Context {
    pub fn new(shell_pid: Pid) -> Self {
        Context {
            shell_pid,
            outfile: STDOUT_FILENO,
            errfile: STDERR_FILENO,
        }
    }

    pub fn write_stdout(&self, msg: &str) -> Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.outfile) };
        let res = writeln!(&mut file, "{msg}");
        mem::forget(file);
        res?;
        Ok(())
    }

    pub fn write_stderr(&self, msg: &str) -> Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.errfile) };
        let res = writeln!(&mut file, "{msg}");
        mem::forget(file);
        res?;
        Ok(())
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        f.debug_struct("Context")
            .field("shell_pid", &self.shell_pid)
            .field("outfile", &self.outfile)
            .field("errfile", &self.errfile)
            .finish()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitStatus {
    ExitedWith(i32),
    Running(Pid),
}

impl ExitStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExitStatus::ExitedWith(0) | ExitStatus::Running(_))
    }
}
