//! Shared implementation of the pid-addressed job verbs (`kill`, `suspend`, `wake`).

use crate::ShellProxy;
use anyhow::{Result, bail};
use getopts::Options;
use jsh_types::{Context, ExitStatus, JobState};
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use tracing::debug;

pub fn command(
    ctx: &Context,
    cmd: &str,
    description: &str,
    argv: Vec<String>,
    signal: Signal,
    state: JobState,
    proxy: &mut dyn ShellProxy,
) -> ExitStatus {
    match run(ctx, cmd, description, argv, signal, state, proxy) {
        Ok(code) => ExitStatus::ExitedWith(code),
        Err(e) => {
            let _ = ctx.write_stderr(&format!("{cmd}: {e}"));
            ExitStatus::ExitedWith(1)
        }
    }
}

fn run(
    ctx: &Context,
    cmd: &str,
    description: &str,
    argv: Vec<String>,
    signal: Signal,
    state: JobState,
    proxy: &mut dyn ShellProxy,
) -> Result<i32> {
    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");

    let args = argv.get(1..).unwrap_or_default();
    let matches = match opts.parse(args) {
        Ok(m) => m,
        Err(f) => {
            let _ = ctx.write_stderr(&format!("{cmd}: {f}"));
            return Ok(1);
        }
    };

    if matches.opt_present("h") {
        let brief = format!("Usage: {cmd} <PID>...\n{description}");
        let _ = ctx.write_stdout(&opts.usage(&brief));
        return Ok(0);
    }

    if matches.free.is_empty() {
        bail!("usage: {cmd} <PID>");
    }

    let mut exit_code = 0;
    for pid_str in &matches.free {
        match parse_pid(pid_str) {
            Ok(pid) => {
                let tracked = proxy.signal_job(pid, signal, state)?;
                debug!("{cmd}: sent {:?} to {} (tracked: {})", signal, pid, tracked);
            }
            Err(e) => {
                let _ = ctx.write_stderr(&format!("{cmd}: {e}"));
                exit_code = 1;
            }
        }
    }
    Ok(exit_code)
}

/// Parses a strictly positive process id.
///
/// Zero and negative values address process groups in kill(2) and are refused.
pub fn parse_pid(arg: &str) -> Result<Pid> {
    match arg.trim().parse::<i32>() {
        Ok(pid) if pid > 0 => Ok(Pid::from_raw(pid)),
        _ => Err(jsh_types::JshError::InvalidPid(arg.to_string()).into()),
    }
}
