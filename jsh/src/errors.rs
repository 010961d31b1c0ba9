use jsh_types::Context;
use tracing::debug;

/// Display error in a user-friendly format without stack traces.
///
/// The whole context chain is printed on one line, e.g.
/// `jsh: failed fork: EAGAIN: Try again`.
pub fn display_user_error(ctx: &Context, err: &anyhow::Error) {
    debug!("command failed: {:?}", err);

    let msg = format!("jsh: {err:#}");
    if ctx.write_stderr(&msg).is_err() {
        eprintln!("{msg}");
    }
}
