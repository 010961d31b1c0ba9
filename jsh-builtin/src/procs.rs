use super::ShellProxy;
use jsh_types::{Context, ExitStatus};

pub fn command(ctx: &Context, _argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    match proxy.list_jobs(ctx) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(e) => {
            ctx.write_stderr(&format!("procs: {e}")).ok();
            ExitStatus::ExitedWith(1)
        }
    }
}
