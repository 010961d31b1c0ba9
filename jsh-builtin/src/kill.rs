use super::ShellProxy;
use super::signal;
use jsh_types::{Context, ExitStatus, JobState};
use nix::sys::signal::Signal;

pub const COMMAND_NAME: &str = "kill";

pub fn description() -> &'static str {
    "Terminates a process and marks its job terminated"
}

pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    signal::command(
        ctx,
        COMMAND_NAME,
        description(),
        argv,
        Signal::SIGTERM,
        JobState::Terminated,
        proxy,
    )
}
