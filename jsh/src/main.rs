use clap::Parser;
use jsh::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(path) = cli.log_file.as_deref() {
        if let Err(err) = jsh::init_tracing(path) {
            eprintln!("Failed to initialize tracing: {err}");
            return ExitCode::FAILURE;
        }
    }

    setup_panic_handler(cli.log_file.clone());
    jsh::run(cli)
}

fn setup_panic_handler(log_file: Option<std::path::PathBuf>) {
    std::panic::set_hook(Box::new(move |panic_info| {
        let payload = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic payload".to_string()
        };

        let location = if let Some(location) = panic_info.location() {
            format!(
                "{}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            )
        } else {
            "Unknown location".to_string()
        };

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC");
        let panic_log = format!(
            "\n=== PANIC OCCURRED ===\n\
            Timestamp: {}\n\
            Location: {}\n\
            Message: {}\n\
            ======================\n",
            timestamp, location, payload
        );

        if let Some(log_file) = &log_file
            && let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
        {
            use std::io::Write;
            let _ = writeln!(file, "{}", panic_log);
            let _ = file.flush();
        }

        tracing::error!("PANIC OCCURRED: {} at {}", payload, location);

        eprintln!("\n=== jsh PANIC ===");
        eprintln!("Message: {}", payload);
        eprintln!("Location: {}", location);
        eprintln!("Timestamp: {}", timestamp);
        eprintln!("=================\n");
    }));
}
