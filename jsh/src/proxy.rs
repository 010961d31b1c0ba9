//! Shell proxy implementation for builtin command dispatch.
//!
//! Built-ins only see the shell through `ShellProxy`; this wires each method to
//! the session state held by `Shell`.

use crate::shell::Shell;
use anyhow::Result;
use jsh_builtin::ShellProxy;
use jsh_types::{Context, JobState};
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use tracing::debug;

impl ShellProxy for Shell {
    fn exit_shell(&mut self) {
        debug!("exit requested");
        self.exit();
    }

    fn changepwd(&mut self, path: &str) -> Result<()> {
        Shell::changepwd(self, path)
    }

    fn list_jobs(&mut self, ctx: &Context) -> Result<()> {
        Shell::list_jobs(self, ctx)
    }

    fn signal_job(&mut self, pid: Pid, signal: Signal, state: JobState) -> Result<bool> {
        Shell::signal_job(self, pid, signal, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_exit_marks_shell() {
        let mut shell = Shell::new();
        let proxy: &mut dyn ShellProxy = &mut shell;
        proxy.exit_shell();
        assert!(shell.is_exited());
    }

    #[test]
    fn proxy_signal_on_untracked_pid_is_noop() {
        let mut shell = Shell::new();
        let proxy: &mut dyn ShellProxy = &mut shell;
        // pid far above the usual pid_max; kill fails and is only logged
        let updated = proxy
            .signal_job(Pid::from_raw(i32::MAX), Signal::SIGCONT, JobState::Running)
            .unwrap();
        assert!(!updated);
    }
}
