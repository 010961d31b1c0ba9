use super::ShellProxy;
use super::signal;
use jsh_types::{Context, ExitStatus, JobState};
use nix::sys::signal::Signal;

pub const COMMAND_NAME: &str = "suspend";

pub fn description() -> &'static str {
    "Stops a process and marks its job suspended"
}

pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    signal::command(
        ctx,
        COMMAND_NAME,
        description(),
        argv,
        Signal::SIGSTOP,
        JobState::Suspended,
        proxy,
    )
}
