use anyhow::Result;
use jsh_types::{Context, ExitStatus, JobState};
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

// Builtin command modules
pub mod cd;
mod kill;
mod procs;
mod signal;
mod suspend;
mod wake;

/// Trait that provides an interface for builtin commands to interact with the shell
/// This allows builtin commands to perform shell operations without direct coupling
pub trait ShellProxy {
    /// Initiates shell exit process
    fn exit_shell(&mut self);

    /// Changes the current working directory of the shell process
    fn changepwd(&mut self, path: &str) -> Result<()>;

    /// Refreshes the job table, prints it and drops terminated entries
    fn list_jobs(&mut self, ctx: &Context) -> Result<()>;

    /// Sends `signal` to `pid` and records `state` for it in the job table.
    ///
    /// Returns whether a tracked job was updated. Signal delivery is best-effort,
    /// so an untracked or already dead pid is not an error.
    fn signal_job(&mut self, pid: Pid, signal: Signal, state: JobState) -> Result<bool>;
}

/// Type alias for builtin command function signature
/// All builtin commands must conform to this signature
pub type BuiltinCommand =
    fn(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus;

/// Global registry of all builtin commands
pub static BUILTIN_COMMAND: Lazy<Mutex<HashMap<&str, BuiltinCommand>>> = Lazy::new(|| {
    let mut builtin = HashMap::new();

    // Core shell commands
    builtin.insert("quit", quit as BuiltinCommand);
    builtin.insert("cd", cd::command as BuiltinCommand);

    // Job control commands
    builtin.insert("procs", procs::command as BuiltinCommand);
    builtin.insert("kill", kill::command as BuiltinCommand);
    builtin.insert("suspend", suspend::command as BuiltinCommand);
    builtin.insert("wake", wake::command as BuiltinCommand);

    Mutex::new(builtin)
});

/// Retrieves a builtin command function by name
/// Returns None if the command is not found
pub fn get_command(name: &str) -> Option<BuiltinCommand> {
    if let Ok(builtin) = BUILTIN_COMMAND.lock() {
        builtin.get(name).copied()
    } else {
        None
    }
}

pub fn is_builtin(name: &str) -> bool {
    get_command(name).is_some()
}

/// Built-in quit command implementation
/// Initiates graceful shell termination
pub fn quit(_ctx: &Context, _argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    debug!("quit command called - initiating normal shell exit");
    proxy.exit_shell();
    ExitStatus::ExitedWith(0)
}
