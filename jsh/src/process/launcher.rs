//! Fork/exec of external commands.
//!
//! The child reports a failed exec back through a close-on-exec pipe, so the
//! parent knows synchronously whether the program started. A child that never
//! started is reaped at once and is never put in the job table.

use super::probe::StatusProbe;
use super::registry::JobRegistry;
use crate::parser::CommandLine;
use anyhow::{Context as _, Result, bail};
use jsh_types::{Context, JshError};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, close, execvp, fork, pipe2, read, write};
use std::ffi::CString;
use std::os::unix::io::RawFd;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// A blocking command ran to completion with this exit code.
    Completed(Pid, i32),
    /// A background command is running and has been registered.
    Background(Pid),
    /// The child could not exec the program.
    FailedToStart(Pid, Errno),
}

pub fn launch<P: StatusProbe>(
    ctx: &Context,
    command: &CommandLine,
    registry: &mut JobRegistry<P>,
) -> Result<Launch> {
    let name = command.name();
    if name.is_empty() {
        bail!("launch: empty command");
    }

    let (program, argv) = to_cstrings(command)?;
    let (read_fd, write_fd) = pipe2(OFlag::O_CLOEXEC).context("failed pipe")?;

    debug!("🍴 FORK: About to fork external process {:?}", command.arguments);
    let pid = match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => child,
        Ok(ForkResult::Child) => {
            let _ = close(read_fd);
            exec_child(ctx, name, &program, &argv, write_fd)
        }
        Err(err) => {
            let _ = close(read_fd);
            let _ = close(write_fd);
            return Err(err).context("failed fork");
        }
    };

    let _ = close(write_fd);
    debug!("🍴 FORK: Parent process - child pid: {}", pid);

    if command.is_debug() {
        ctx.write_stderr(&format!("Process ID: {pid}, Executed Command: {name}"))
            .ok();
    }

    let exec_error = read_exec_error(read_fd);
    let _ = close(read_fd);

    if let Some(errno) = exec_error? {
        debug!("🍴 FORK: child {} failed to exec {}: {}", pid, name, errno);
        let code = wait_for(pid)?;
        debug!("🍴 FORK: reaped failed child {} (status {})", pid, code);
        return Ok(Launch::FailedToStart(pid, errno));
    }

    if command.blocking {
        ctx.write_stdout(&format!("waiting for process: {pid}")).ok();
        let code = wait_for(pid)?;
        debug!("🍴 FORK: blocking child {} finished with {}", pid, code);
        Ok(Launch::Completed(pid, code))
    } else {
        registry.add(command.clone(), pid);
        Ok(Launch::Background(pid))
    }
}

fn to_cstrings(command: &CommandLine) -> Result<(CString, Vec<CString>)> {
    let nul_error = |_| JshError::Spawn {
        name: command.name().to_string(),
        message: "argument contains a NUL byte".to_string(),
    };
    let program = CString::new(command.name()).map_err(nul_error)?;
    let argv = command
        .arguments
        .iter()
        .map(|a| CString::new(a.as_str()).map_err(nul_error))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((program, argv))
}

/// Runs in the forked child. Avoids allocating before `_exit`.
fn exec_child(
    ctx: &Context,
    name: &str,
    program: &CString,
    argv: &[CString],
    report_fd: RawFd,
) -> ! {
    let err = match execvp(program, argv) {
        Ok(never) => match never {},
        Err(err) => err,
    };
    let _ = write(report_fd, &(err as i32).to_ne_bytes());
    let parts: [&[u8]; 5] = [
        b"jsh: ",
        name.as_bytes(),
        b": ",
        err.desc().as_bytes(),
        b"\n",
    ];
    for part in parts {
        let _ = write(ctx.errfile, part);
    }
    unsafe { libc::_exit(err as i32) }
}

/// Reads the errno the child sends when exec fails. EOF means exec succeeded.
fn read_exec_error(fd: RawFd) -> Result<Option<Errno>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match read(fd, &mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(Errno::EINTR) => continue,
            Err(err) => return Err(JshError::System(err).into()),
        }
    }
    match filled {
        0 => Ok(None),
        4 => Ok(Some(Errno::from_i32(i32::from_ne_bytes(buf)))),
        n => bail!("short exec status from child ({n} bytes)"),
    }
}

/// Blocks until `pid` exits and returns a shell style exit code.
pub fn wait_for(pid: Pid) -> Result<i32> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(code),
            Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(128 + signal as i32),
            Ok(status) => debug!("WAIT: {} reported {:?}, still waiting", pid, status),
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => {
                debug!("WAIT: {} already reaped", pid);
                return Ok(0);
            }
            Err(err) => return Err(err).context("failed waitpid"),
        }
    }
}
