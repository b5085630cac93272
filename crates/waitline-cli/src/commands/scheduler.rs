//! Admission scheduler CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use waitline_core::error::AppError;
use waitline_worker::{QueueDiscovery, WaitlineRuntime};

/// Arguments for scheduler commands
#[derive(Debug, Args)]
pub struct SchedulerArgs {
    /// Scheduler subcommand
    #[command(subcommand)]
    pub command: SchedulerCommand,
}

/// Scheduler subcommands
#[derive(Debug, Subcommand)]
pub enum SchedulerCommand {
    /// List queues with waiting users
    Queues,
    /// Run one admission tick across all active queues
    Tick,
}

/// Active queue display row
#[derive(Debug, Serialize, Tabled)]
struct QueueRow {
    /// Queue
    queue: String,
    /// Waiting
    waiting: u64,
    /// Admitted
    admitted: u64,
}

/// Execute scheduler commands
pub async fn execute(
    args: &SchedulerArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let runtime = WaitlineRuntime::build(&config).await?;

    match &args.command {
        SchedulerCommand::Queues => {
            let discovery =
                QueueDiscovery::new(runtime.store.store(), config.scheduler.scan_batch_size);
            let mut rows = Vec::new();
            for queue in discovery.active_queues().await? {
                let stats = runtime.admission.stats(&queue).await?;
                rows.push(QueueRow {
                    queue,
                    waiting: stats.waiting,
                    admitted: stats.admitted,
                });
            }
            output::print_list(&rows, format);
        }
        SchedulerCommand::Tick => {
            if !config.scheduler.enabled {
                output::print_error("Scheduler is disabled in configuration; tick skipped");
            }
            let report = runtime.scheduler.tick().await;
            let summary = serde_json::json!({
                "queues": report.queues,
                "admitted": report.admitted,
                "failed": report.failed,
            });
            output::print_fields(
                &summary,
                &[
                    ("Queues", report.queues.to_string()),
                    ("Admitted", report.admitted.to_string()),
                    ("Failed", report.failed.to_string()),
                ],
                format,
            );
        }
    }

    Ok(())
}
