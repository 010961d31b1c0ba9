use crate::errors::display_user_error;
use crate::repl::Repl;
use crate::shell::Shell;
use anyhow::Result;
use clap::Parser;
use jsh_types::{Context, ExitStatus};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod errors;
pub mod parser;
pub mod process;
pub mod proxy;
pub mod repl;
pub mod shell;

/// Environment variable holding the tracing filter, e.g. `JSH_LOG=info`.
pub const LOG_FILTER_ENV: &str = "JSH_LOG";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run a single command line and exit
    #[arg(short, long)]
    pub command: Option<String>,

    /// Write debug logs to this file
    #[arg(long, env = "JSH_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

pub fn init_tracing(path: &Path) -> Result<()> {
    let log_file = std::sync::Arc::new(std::fs::File::create(path)?);
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

pub fn run(cli: Cli) -> ExitCode {
    let mut shell = Shell::new();
    let mut ctx = Context::new(shell.pid);
    debug!("start shell {:?}", ctx);

    if let Some(command) = cli.command.as_deref() {
        execute_command(&mut shell, &mut ctx, command)
    } else {
        run_interactive(&mut shell, &mut ctx)
    }
}

fn execute_command(shell: &mut Shell, ctx: &mut Context, command: &str) -> ExitCode {
    let res = shell.eval_line(ctx, command);
    shell.shutdown();
    match res {
        Ok(status) => {
            debug!("run command mode {:?} : {:?}", command, status);
            match status {
                ExitStatus::ExitedWith(code) => ExitCode::from(code.clamp(0, 255) as u8),
                ExitStatus::Running(_) => ExitCode::SUCCESS,
            }
        }
        Err(err) => {
            display_user_error(ctx, &err);
            ExitCode::FAILURE
        }
    }
}

fn run_interactive(shell: &mut Shell, ctx: &mut Context) -> ExitCode {
    let stdin = io::stdin();
    let mut repl = Repl::new(shell);
    match repl.run(ctx, stdin.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            display_user_error(ctx, &err);
            ExitCode::FAILURE
        }
    }
}
