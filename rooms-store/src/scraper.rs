use async_trait::async_trait;
use chrono::Local;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{error, info, warn};

use rooms_core::ingestion::{IngestionTrigger, RefreshRequest, RefreshStatus};
use rooms_core::{CoreError, CoreResult};

use crate::app_config::IngestionConfig;

pub const PLACEHOLDER_STATUS: &str = "refresh started (placeholder - scraper not configured)";
pub const STARTED_STATUS: &str = "refresh started";

/// Scraper invocation reported by the placeholder when none is configured.
pub const DEFAULT_SCRAPER_COMMAND: [&str; 2] = ["python3", "scrape_daum_cafe.py"];

/// Picks the trigger matching `config`: a real command when one is set,
/// otherwise the placeholder.
pub fn build_trigger(config: &IngestionConfig) -> Arc<dyn IngestionTrigger> {
    match config.command.as_deref() {
        Some([program, args @ ..]) => Arc::new(CommandTrigger {
            program: program.clone(),
            args: args.to_vec(),
            log_file: config.log_file.as_ref().map(PathBuf::from),
            timeout: Duration::from_secs(config.timeout_seconds),
        }),
        _ => Arc::new(PlaceholderTrigger::default()),
    }
}

/// Full scraper argv: `base` followed by the date and category arguments,
/// resolved against today's local date.
fn scraper_argv(base: &[String], request: &RefreshRequest) -> Vec<String> {
    base.iter()
        .cloned()
        .chain(request.command_args(Local::now().date_naive()))
        .collect()
}

/// Acknowledges refresh requests without running anything.
pub struct PlaceholderTrigger {
    command: Vec<String>,
}

impl Default for PlaceholderTrigger {
    fn default() -> Self {
        Self {
            command: DEFAULT_SCRAPER_COMMAND.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PlaceholderTrigger {
    /// The command line a configured scraper would have been started with.
    pub fn command_line(&self, request: &RefreshRequest) -> Vec<String> {
        scraper_argv(&self.command, request)
    }
}

#[async_trait]
impl IngestionTrigger for PlaceholderTrigger {
    async fn trigger(&self, request: &RefreshRequest) -> CoreResult<RefreshStatus> {
        let argv = self.command_line(request);
        info!(command = %argv.join(" "), "No scraper configured, would run");
        Ok(RefreshStatus::new(PLACEHOLDER_STATUS))
    }
}

/// Spawns the scraper as a child process and returns once it has started.
/// A background task reaps it, killing it after `timeout`.
pub struct CommandTrigger {
    pub program: String,
    pub args: Vec<String>,
    pub log_file: Option<PathBuf>,
    pub timeout: Duration,
}

impl CommandTrigger {
    pub fn command_line(&self, request: &RefreshRequest) -> Vec<String> {
        let base: Vec<String> = std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect();
        scraper_argv(&base, request)
    }

    fn output_sinks(&self) -> std::io::Result<(Stdio, Stdio)> {
        match &self.log_file {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Ok((Stdio::from(file.try_clone()?), Stdio::from(file)))
            }
            None => Ok((Stdio::null(), Stdio::null())),
        }
    }
}

#[async_trait]
impl IngestionTrigger for CommandTrigger {
    async fn trigger(&self, request: &RefreshRequest) -> CoreResult<RefreshStatus> {
        let argv = self.command_line(request);
        let (stdout, stderr) = self
            .output_sinks()
            .map_err(|e| CoreError::IngestionError(format!("cannot open scraper log: {e}")))?;

        let child = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CoreError::IngestionError(format!("failed to spawn {}: {e}", self.program)))?;

        info!(pid = ?child.id(), command = ?argv, "Scraper started");
        tokio::spawn(reap(child, self.timeout));

        Ok(RefreshStatus::new(STARTED_STATUS))
    }
}

async fn reap(mut child: Child, timeout: Duration) {
    let pid = child.id();
    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) if status.success() => info!(?pid, "Scraper finished"),
        Ok(Ok(status)) => warn!(?pid, %status, "Scraper exited with failure"),
        Ok(Err(e)) => error!(?pid, "Failed to wait on scraper: {}", e),
        Err(_) => {
            warn!(?pid, ?timeout, "Scraper timed out, killing it");
            if let Err(e) = child.kill().await {
                error!(?pid, "Failed to kill scraper: {}", e);
            }
        }
    }
}
