use jsh_types::JobState;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use tracing::debug;

/// Non-blocking query of a child's lifecycle state.
///
/// Only termination is observable this way: a stopped child still reads as
/// `Running`, so suspension is tracked by the registry itself.
pub trait StatusProbe {
    fn probe(&mut self, pid: Pid) -> JobState;
}

/// Probe backed by `waitpid(pid, WNOHANG)`.
///
/// Reaps the child the first time its exit is seen. Any later probe of the same
/// pid fails with `ECHILD`, which is reported as `Terminated` again.
#[derive(Debug, Default, Clone, Copy)]
pub struct WaitPidProbe;

impl StatusProbe for WaitPidProbe {
    fn probe(&mut self, pid: Pid) -> JobState {
        match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => JobState::Running,
            Ok(WaitStatus::Exited(pid, status)) => {
                debug!("PROBE_EXITED: {} exited with status {}", pid, status);
                JobState::Terminated
            }
            Ok(WaitStatus::Signaled(pid, signal, _)) => {
                debug!("PROBE_SIGNALED: {} killed by {:?}", pid, signal);
                JobState::Terminated
            }
            Ok(status) => {
                debug!("PROBE_ALIVE: {} reported {:?}", pid, status);
                JobState::Running
            }
            Err(err) => {
                debug!("PROBE_GONE: waitpid({}) failed: {}", pid, err);
                JobState::Terminated
            }
        }
    }
}
