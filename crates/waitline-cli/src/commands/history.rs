//! History CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use waitline_core::error::AppError;
use waitline_core::types::history::HistoryEntry;

/// Arguments for history commands
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// History subcommand
    #[command(subcommand)]
    pub command: HistoryCommand,
}

/// History subcommands
#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Recent entries for one user
    User {
        /// Queue name
        queue: String,
        /// User ID
        user_id: i64,
        /// Maximum entries (defaults to history.default_user_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Recent entries for a whole queue
    Queue {
        /// Queue name
        queue: String,
        /// Maximum entries (defaults to history.default_queue_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// History display row
#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct HistoryRow {
    /// Time
    time: String,
    /// User ID
    user_id: i64,
    /// Action
    action: String,
    /// Queue
    queue: String,
}

impl From<HistoryEntry> for HistoryRow {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            time: entry.formatted_time,
            user_id: entry.user_id,
            action: entry.action.to_string(),
            queue: entry.queue,
        }
    }
}

/// Execute history commands
pub async fn execute(
    args: &HistoryArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let runtime = super::build_runtime(config_path).await?;

    let entries = match &args.command {
        HistoryCommand::User {
            queue,
            user_id,
            limit,
        } => runtime.history.recent(queue, *user_id, *limit).await?,
        HistoryCommand::Queue { queue, limit } => {
            runtime.history.recent_for_queue(queue, *limit).await?
        }
    };

    let rows: Vec<HistoryRow> = entries.into_iter().map(HistoryRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}
