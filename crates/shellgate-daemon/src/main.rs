//! Shellgate daemon.
//!
//! Serves the command gate as JSON-lines tool calls over stdin/stdout.
//! Diagnostics go to stderr and, unless disabled, a log file.

mod dispatch;
mod events;
mod server;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use shellgate_core::logging::LogSink;
use shellgate_core::platform::validate_shell_path;
use shellgate_core::{CommandService, ServiceConfig};
use tokio::io::BufReader;

const DEFAULT_LOG_FILE: &str = "logs/shellgate.log";

#[derive(Parser, Debug)]
#[command(name = "shellgate", version, about = "Policy gate for shell commands")]
struct Args {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shell used to run commands
    #[arg(long)]
    shell: Option<String>,

    /// Default execution timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Delay before a pending command raises an approval_timeout event
    #[arg(long)]
    approval_warning_ms: Option<u64>,

    /// Log file path
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Disable the log file
    #[arg(long)]
    no_log_file: bool,
}

impl Args {
    fn service_config(&self) -> Result<ServiceConfig, String> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)
                .map_err(|e| format!("Failed to load config {}: {}", path.display(), e))?,
            None => ServiceConfig::new(),
        };

        if let Some(shell) = &self.shell {
            config = config.shell(shell.clone());
        }
        if let Some(ms) = self.timeout_ms {
            config = config.default_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.approval_warning_ms {
            config = config.approval_warning(Duration::from_millis(ms));
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), String> {
    let config = args.service_config()?;
    let service = Arc::new(CommandService::new(config));

    if !validate_shell_path(service.shell()) {
        log::warn!("Shell {} was not found; commands may fail to spawn", service.shell());
    }

    let sink = if args.no_log_file {
        LogSink::disabled()
    } else {
        LogSink::open(&args.log_file)
    };
    if let Some(path) = sink.path() {
        log::info!("Writing log to {}", path.display());
    }
    events::mirror_to_sink(&service, sink.clone());

    log::info!(
        "Shellgate running on {} using {} (tools: {})",
        service.platform(),
        service.shell(),
        dispatch::TOOL_NAMES.join(", ")
    );
    sink.info(&format!("Server started on {} using {}", service.platform(), service.shell()));

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    let result = tokio::select! {
        result = server::serve(service.clone(), stdin, stdout) => {
            result.map_err(|e| format!("I/O error: {e}"))
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("Interrupted, shutting down");
            Ok(())
        }
    };

    sink.info("Server stopped");
    sink.close();
    result
}
