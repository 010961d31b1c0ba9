//! In-memory table of background jobs.
//!
//! States are refreshed on demand only: between two calls to
//! [`JobRegistry::refresh`] a record may still read `Running` after its
//! process has exited.

use super::probe::{StatusProbe, WaitPidProbe};
use crate::parser::CommandLine;
use jsh_types::JobState;
use nix::unistd::Pid;
use std::collections::VecDeque;
use tabled::settings::object::{Columns, Segment};
use tabled::settings::{Padding, Style, Width};
use tabled::{Table, Tabled};
use tracing::{debug, warn};

// minimum content widths of the PID and COMMAND columns
const PID_WIDTH: usize = 6;
const COMMAND_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pid: Pid,
    command: CommandLine,
    state: JobState,
}

impl JobRecord {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn command(&self) -> &CommandLine {
        &self.command
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    fn update(&mut self, state: JobState) -> bool {
        if self.state == state || !self.state.can_transition_to(state) {
            return false;
        }
        debug!(
            "JOB_STATE_CHANGE: {} '{}' {} -> {}",
            self.pid,
            self.command.name(),
            self.state,
            state
        );
        self.state = state;
        true
    }
}

/// One display line of the job table.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct JobRow {
    #[tabled(rename = "PID")]
    pub pid: Pid,
    #[tabled(rename = "COMMAND")]
    pub command: String,
    #[tabled(rename = "STATUS")]
    pub state: JobState,
}

pub struct JobRegistry<P: StatusProbe = WaitPidProbe> {
    jobs: VecDeque<JobRecord>,
    // dropped from the table but not yet collected by the probe
    reaping: Vec<Pid>,
    probe: P,
}

impl Default for JobRegistry<WaitPidProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry<WaitPidProbe> {
    pub fn new() -> Self {
        Self::with_probe(WaitPidProbe)
    }
}

impl<P: StatusProbe> JobRegistry<P> {
    pub fn with_probe(probe: P) -> Self {
        JobRegistry {
            jobs: VecDeque::new(),
            reaping: Vec::new(),
            probe,
        }
    }

    /// Tracks a freshly launched background process.
    ///
    /// The initial state comes from a probe so a child that exited before
    /// registration is recorded as `Terminated`.
    pub fn add(&mut self, command: CommandLine, pid: Pid) {
        let state = self.probe.probe(pid);
        if let Some(index) = self.position(pid) {
            warn!("JOB_ADD_DUPLICATE: pid {} already tracked, replacing", pid);
            self.jobs.remove(index);
        }
        debug!("JOB_ADD: {} '{}' {}", pid, command.name(), state);
        self.jobs.push_front(JobRecord {
            pid,
            command,
            state,
        });
    }

    /// Re-probes every live record and marks the ones that have exited.
    pub fn refresh(&mut self) {
        self.collect_reaping();
        for job in self.jobs.iter_mut().filter(|j| !j.state.is_terminated()) {
            if self.probe.probe(job.pid).is_terminated() {
                job.update(JobState::Terminated);
            }
        }
    }

    /// Records a state chosen by a job-control verb. Unknown pids are ignored.
    pub fn set_state(&mut self, pid: Pid, state: JobState) -> bool {
        match self.jobs.iter_mut().find(|j| j.pid == pid) {
            Some(job) => job.update(state),
            None => {
                debug!("JOB_SET_STATE: pid {} is not tracked", pid);
                false
            }
        }
    }

    pub fn state_of(&self, pid: Pid) -> Option<JobState> {
        self.jobs.iter().find(|j| j.pid == pid).map(|j| j.state)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.position(pid).is_some()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Snapshot of the table in display order.
    pub fn list(&self) -> impl Iterator<Item = JobRow> + '_ {
        self.jobs.iter().map(|j| JobRow {
            pid: j.pid,
            command: j.command.name().to_string(),
            state: j.state,
        })
    }

    pub fn render_table(&self) -> String {
        let mut table = Table::new(self.list());
        table
            .with(Style::empty())
            .modify(Segment::all(), Padding::new(0, 1, 0, 0))
            .modify(Columns::one(0), Width::increase(PID_WIDTH))
            .modify(Columns::one(1), Width::increase(COMMAND_WIDTH));

        table
            .to_string()
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drops every `Terminated` record and returns them.
    pub fn remove_terminated(&mut self) -> Vec<JobRecord> {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .jobs
            .drain(..)
            .partition(|j| j.state.is_terminated());
        self.jobs = kept.into();

        for job in &removed {
            debug!("JOB_REMOVE: {} '{}'", job.pid, job.command.name());
            // a killed child may still be dying; keep it until it is collected
            if !self.probe.probe(job.pid).is_terminated() {
                debug!("JOB_REAP_PENDING: {}", job.pid);
                self.reaping.push(job.pid);
            }
        }
        removed
    }

    /// Pids removed from the table whose exit has not been collected yet.
    pub fn pending_reap(&self) -> &[Pid] {
        &self.reaping
    }

    pub fn release_all(&mut self) {
        debug!("JOB_RELEASE_ALL: releasing {} jobs", self.jobs.len());
        self.jobs.clear();
        self.collect_reaping();
    }

    fn collect_reaping(&mut self) {
        let probe = &mut self.probe;
        self.reaping.retain(|pid| !probe.probe(*pid).is_terminated());
    }

    fn position(&self, pid: Pid) -> Option<usize> {
        self.jobs.iter().position(|j| j.pid == pid)
    }
}
