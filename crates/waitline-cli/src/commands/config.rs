//! Configuration CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use waitline_core::error::AppError;
use waitline_core::traits::store::QueueStore;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate configuration and check store connectivity
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    match &args.command {
        ConfigCommand::Show => {
            if config.token.secret.is_some() {
                config.token.secret = Some("****".to_string());
            }
            match format {
                OutputFormat::Json => output::print_json(&config),
                OutputFormat::Table => println!("{config:#?}"),
            }
        }
        ConfigCommand::Validate => {
            let runtime = waitline_worker::WaitlineRuntime::build(&config).await?;
            if !runtime.store.health_check().await? {
                return Err(AppError::service_unavailable("Store health check failed"));
            }

            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Store", &config.store.provider);
            output::print_kv("Notification", &config.notification.provider);
            output::print_kv("Capacity", &config.queue.max_capacity.to_string());
            output::print_kv("Wait TTL (seconds)", &config.queue.ttl_seconds.to_string());
            output::print_kv("Atomic allow", &config.queue.atomic_allow.to_string());
            output::print_kv("Scheduler enabled", &config.scheduler.enabled.to_string());
        }
    }

    Ok(())
}
