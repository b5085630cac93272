//! Live event stream CLI command.

use clap::Args;
use futures::StreamExt;

use waitline_core::error::AppError;
use waitline_core::traits::notifier::QueueNotifier;
use waitline_realtime::for_user;

/// Arguments for the watch command
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Queue name
    pub queue: String,
    /// Only show events for this user
    #[arg(short, long)]
    pub user: Option<i64>,
}

/// Print each event of a queue as a JSON line until interrupted
pub async fn execute(args: &WatchArgs, config_path: &str) -> Result<(), AppError> {
    let runtime = super::build_runtime(config_path).await?;

    let mut events = runtime.notifier.subscribe(&args.queue).await?;
    if let Some(user_id) = args.user {
        events = for_user(events, user_id);
    }
    eprintln!("Watching '{}' (Ctrl+C to stop)", args.queue);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = events.next() => match next {
                Some(event) => println!("{}", serde_json::to_string(&event)?),
                None => break,
            },
        }
    }

    Ok(())
}
