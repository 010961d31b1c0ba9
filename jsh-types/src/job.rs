/// Last-known lifecycle state of a tracked background process.
///
/// `Terminated` is absorbing: once a job reaches it nothing moves it back.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum JobState {
    Running,
    Suspended,
    Terminated,
}

impl JobState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, JobState::Terminated)
    }

    pub fn can_transition_to(&self, next: JobState) -> bool {
        !self.is_terminated() || next.is_terminated()
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            JobState::Running => formatter.write_str("RUNNING"),
            JobState::Suspended => formatter.write_str("SUSPENDED"),
            JobState::Terminated => formatter.write_str("TERMINATED"),
        }
    }
}
