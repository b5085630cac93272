//! Bypass token CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::output::{self, OutputFormat};
use waitline_core::error::AppError;
use waitline_service::TokenService;

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Print the bypass token and cookie for a user
    Derive {
        /// Queue name
        queue: String,
        /// User ID
        user_id: i64,
    },
    /// Check a candidate token
    Verify {
        /// Queue name
        queue: String,
        /// User ID
        user_id: i64,
        /// Candidate token
        token: String,
    },
}

/// Derived token with its cookie settings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenReport {
    token: String,
    cookie_name: String,
    cookie_max_age_seconds: u64,
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    // Token derivation needs no store connection.
    let config = super::load_config(config_path)?;
    let tokens = TokenService::new(&config.token)?;

    match &args.command {
        TokenCommand::Derive { queue, user_id } => {
            let report = TokenReport {
                token: tokens.derive(queue, *user_id),
                cookie_name: tokens.cookie_name(queue),
                cookie_max_age_seconds: tokens.cookie_max_age_seconds(),
            };
            output::print_fields(
                &report,
                &[
                    ("Token", report.token.clone()),
                    ("Cookie", report.cookie_name.clone()),
                    ("Max age (seconds)", report.cookie_max_age_seconds.to_string()),
                ],
                format,
            );
        }
        TokenCommand::Verify {
            queue,
            user_id,
            token,
        } => {
            if tokens.verify(queue, *user_id, token) {
                output::print_success("Token is valid");
            } else {
                return Err(AppError::validation(format!(
                    "Token does not match user {user_id} in '{queue}'"
                )));
            }
        }
    }

    Ok(())
}
