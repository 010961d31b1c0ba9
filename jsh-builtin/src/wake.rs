use super::ShellProxy;
use super::signal;
use jsh_types::{Context, ExitStatus, JobState};
use nix::sys::signal::Signal;

pub const COMMAND_NAME: &str = "wake";

pub fn description() -> &'static str {
    "Resumes a stopped process and marks its job running"
}

pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    signal::command(
        ctx,
        COMMAND_NAME,
        description(),
        argv,
        Signal::SIGCONT,
        JobState::Running,
        proxy,
    )
}
