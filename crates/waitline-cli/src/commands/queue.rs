//! Queue CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::output::{self, OutputFormat};
use waitline_core::error::AppError;
use waitline_core::types::queue::EntryStatus;

/// Arguments for queue commands
#[derive(Debug, Args)]
pub struct QueueArgs {
    /// Queue subcommand
    #[command(subcommand)]
    pub command: QueueCommand,
}

/// Queue subcommands
#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// Add a user to the wait set
    Register {
        /// Queue name
        queue: String,
        /// User ID
        user_id: i64,
        /// Register ahead of every regular user
        #[arg(long)]
        vip: bool,
    },
    /// Admit the lowest-ranked waiters
    Allow {
        /// Queue name
        queue: String,
        /// Number of users to admit
        #[arg(short = 'n', long, default_value_t = 1)]
        count: i64,
    },
    /// Show a user's rank (-1 when not waiting)
    Rank {
        /// Queue name
        queue: String,
        /// User ID
        user_id: i64,
    },
    /// Show whether a user has been admitted
    Status {
        /// Queue name
        queue: String,
        /// User ID
        user_id: i64,
    },
    /// Register if needed and report admission state
    Enter {
        /// Queue name
        queue: String,
        /// User ID
        user_id: i64,
    },
    /// Show waiting and admitted counts
    Stats {
        /// Queue name
        queue: String,
    },
    /// Show seconds until the wait set expires (-1 when none)
    Ttl {
        /// Queue name
        queue: String,
    },
}

/// Single-user report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserReport {
    queue: String,
    user_id: i64,
    rank: i64,
    admitted: bool,
}

/// Execute queue commands
pub async fn execute(
    args: &QueueArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let runtime = super::build_runtime(config_path).await?;
    let admission = &runtime.admission;

    match &args.command {
        QueueCommand::Register {
            queue,
            user_id,
            vip,
        } => {
            let rank = admission.register(queue, *user_id, *vip).await?;
            output::print_success(&format!(
                "User {user_id} registered in '{queue}' at rank {rank}"
            ));
        }
        QueueCommand::Allow { queue, count } => {
            let admitted = admission.allow(queue, *count).await?;
            output::print_success(&format!("Admitted {admitted} user(s) from '{queue}'"));
        }
        QueueCommand::Rank { queue, user_id } | QueueCommand::Status { queue, user_id } => {
            let report = UserReport {
                queue: queue.clone(),
                user_id: *user_id,
                rank: admission.rank(queue, *user_id).await?,
                admitted: admission.is_admitted(queue, *user_id).await?,
            };
            output::print_fields(
                &report,
                &[
                    ("Queue", report.queue.clone()),
                    ("User", report.user_id.to_string()),
                    ("Rank", report.rank.to_string()),
                    ("Admitted", report.admitted.to_string()),
                ],
                format,
            );
        }
        QueueCommand::Enter { queue, user_id } => {
            let status = admission.enter(queue, *user_id).await?;
            let detail = match status {
                EntryStatus::Admitted => "admitted".to_string(),
                EntryStatus::Waiting { rank } => format!("waiting at rank {rank}"),
            };
            output::print_fields(&status, &[("Status", detail)], format);
        }
        QueueCommand::Stats { queue } => {
            let stats = admission.stats(queue).await?;
            output::print_fields(
                &stats,
                &[
                    ("Waiting", stats.waiting.to_string()),
                    ("Admitted", stats.admitted.to_string()),
                ],
                format,
            );
        }
        QueueCommand::Ttl { queue } => {
            let ttl = admission.queue_ttl(queue).await?;
            output::print_fields(&ttl, &[("TTL (seconds)", ttl.to_string())], format);
        }
    }

    Ok(())
}
