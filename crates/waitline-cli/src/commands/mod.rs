//! CLI command definitions and dispatch.

pub mod config;
pub mod history;
pub mod queue;
pub mod scheduler;
pub mod token;
pub mod watch;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use waitline_core::config::AppConfig;
use waitline_core::error::AppError;
use waitline_worker::WaitlineRuntime;

/// Waitline: virtual waiting-room queue operations
#[derive(Debug, Parser)]
#[command(name = "waitline", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Queue registration, admission, and status
    Queue(queue::QueueArgs),
    /// Bypass token derivation and verification
    Token(token::TokenArgs),
    /// Admission history
    History(history::HistoryArgs),
    /// Stream a queue's events
    Watch(watch::WatchArgs),
    /// Admission scheduler
    Scheduler(scheduler::SchedulerArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Queue(args) => queue::execute(args, &self.config, self.format).await,
            Commands::Token(args) => token::execute(args, &self.config, self.format).await,
            Commands::History(args) => history::execute(args, &self.config, self.format).await,
            Commands::Watch(args) => watch::execute(args, &self.config).await,
            Commands::Scheduler(args) => scheduler::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: connect providers and build services from a configuration file
pub async fn build_runtime(config_path: &str) -> Result<WaitlineRuntime, AppError> {
    let config = load_config(config_path)?;
    WaitlineRuntime::build(&config).await
}
