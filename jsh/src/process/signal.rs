use jsh_types::{JshError, JshResult};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tracing::{debug, error};

/// Sends `signal` to a single process.
///
/// Pids below 1 address process groups (or every process) in kill(2) and are
/// refused here.
pub fn send_signal(pid: Pid, signal: Signal) -> JshResult<()> {
    if pid.as_raw() <= 0 {
        return Err(JshError::InvalidPid(pid.to_string()));
    }

    debug!("📡 SIGNAL: Sending signal {:?} to pid {}", signal, pid);
    match kill(pid, signal) {
        Ok(_) => {
            debug!(
                "📡 SIGNAL: Successfully sent signal {:?} to pid {}",
                signal, pid
            );
            Ok(())
        }
        Err(e) => {
            error!(
                "📡 SIGNAL: Failed to send signal {:?} to pid {}: {}",
                signal, pid, e
            );
            Err(JshError::Signal {
                pid,
                signal,
                source: e,
            })
        }
    }
}
