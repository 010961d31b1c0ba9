use crate::parser::{self, CommandLine};
use crate::process::{self, JobRegistry, Launch, send_signal};
use anyhow::Result;
use jsh_types::{Context, ExitStatus, JobState};
use nix::sys::signal::Signal;
use nix::unistd::{Pid, getpid};
use tracing::{debug, warn};

pub const APP_NAME: &str = "jsh";

/// Session state of one shell: the job table and the exit request.
pub struct Shell {
    pub pid: Pid,
    pub exited: Option<ExitStatus>,
    pub(crate) jobs: JobRegistry,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        f.debug_struct("Shell")
            .field("pid", &self.pid)
            .field("exited", &self.exited)
            .field("jobs", &self.jobs.len())
            .finish()
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Shell {
            pid: getpid(),
            exited: None,
            jobs: JobRegistry::new(),
        }
    }

    pub fn jobs(&self) -> &JobRegistry {
        &self.jobs
    }

    pub fn exit(&mut self) {
        self.exited = Some(ExitStatus::ExitedWith(0));
    }

    pub fn is_exited(&self) -> bool {
        self.exited.is_some()
    }

    pub fn eval_line(&mut self, ctx: &mut Context, line: &str) -> Result<ExitStatus> {
        match parser::parse_line(line)? {
            Some(command) => self.dispatch(ctx, command),
            None => Ok(ExitStatus::ExitedWith(0)),
        }
    }

    /// Routes built-in verbs to their handlers and everything else to the launcher.
    ///
    /// The decision is made before any process is created.
    pub fn dispatch(&mut self, ctx: &mut Context, command: CommandLine) -> Result<ExitStatus> {
        if let Some(builtin) = jsh_builtin::get_command(command.name()) {
            debug!("dispatch builtin {:?}", command.arguments);
            return Ok(builtin(ctx, command.arguments, self));
        }

        debug!(
            "dispatch external {:?} blocking:{}",
            command.arguments, command.blocking
        );
        let status = match process::launch(ctx, &command, &mut self.jobs)? {
            Launch::Completed(_, code) => ExitStatus::ExitedWith(code),
            Launch::Background(pid) => ExitStatus::Running(pid),
            Launch::FailedToStart(_, errno) => ExitStatus::ExitedWith(errno as i32),
        };
        Ok(status)
    }

    /// refresh, print, then drop what was printed as terminated
    pub fn list_jobs(&mut self, ctx: &Context) -> Result<()> {
        self.jobs.refresh();
        ctx.write_stdout(&self.jobs.render_table())?;
        let removed = self.jobs.remove_terminated();
        debug!("list_jobs: removed {} terminated jobs", removed.len());
        Ok(())
    }

    /// Signals `pid` and optimistically records `state` without waiting for delivery.
    pub fn signal_job(&mut self, pid: Pid, signal: Signal, state: JobState) -> Result<bool> {
        let previous = self.jobs.state_of(pid);
        if let Err(err) = send_signal(pid, signal) {
            warn!("signal_job: {}", err);
        }
        if state.is_terminated() && previous == Some(JobState::Suspended) {
            // a stopped process only acts on the termination once continued
            if let Err(err) = send_signal(pid, Signal::SIGCONT) {
                warn!("signal_job: {}", err);
            }
        }
        Ok(self.jobs.set_state(pid, state))
    }

    pub fn changepwd(&mut self, path: &str) -> Result<()> {
        std::env::set_current_dir(path)?;
        debug!("changepwd: now in {}", path);
        Ok(())
    }

    pub fn shutdown(&mut self) {
        debug!("shutdown: releasing {} jobs", self.jobs.len());
        self.jobs.release_all();
    }
}
