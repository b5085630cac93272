//! Periodic admission scheduler.

use std::collections::HashSet;

use tokio::sync::watch;
use tokio::time;

use waitline_core::config::SchedulerConfig;
use waitline_service::AdmissionService;

use crate::discovery::QueueDiscovery;

/// Outcome of one scheduler tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Queues an admission was attempted on.
    pub queues: usize,
    /// Users admitted across all queues.
    pub admitted: u64,
    /// Queues whose admission failed.
    pub failed: usize,
}

/// Drains every active queue by a fixed quota on a fixed period.
#[derive(Debug, Clone)]
pub struct AdmissionScheduler {
    /// Admission engine.
    admission: AdmissionService,
    /// Active queue discovery.
    discovery: QueueDiscovery,
    /// Scheduler configuration.
    config: SchedulerConfig,
}

impl AdmissionScheduler {
    /// Create a new scheduler.
    pub fn new(
        admission: AdmissionService,
        discovery: QueueDiscovery,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            admission,
            discovery,
            config,
        }
    }

    /// Run ticks until the cancel signal is received.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            enabled = self.config.enabled,
            initial_delay_ms = self.config.initial_delay_ms,
            interval_ms = self.config.interval_ms,
            max_allow_count = self.config.max_allow_count,
            "Admission scheduler started"
        );

        let mut delay = self.config.initial_delay();
        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                    continue;
                }
                _ = time::sleep(delay) => {}
            }

            self.tick().await;
            delay = self.config.interval();
        }

        tracing::info!("Admission scheduler shut down");
    }

    /// Admit up to the configured quota from every active queue once.
    ///
    /// A failure on one queue is logged and does not stop the others.
    pub async fn tick(&self) -> TickReport {
        let mut report = TickReport::default();
        if !self.config.enabled {
            tracing::trace!("Admission scheduler disabled, skipping tick");
            return report;
        }

        let quota = i64::try_from(self.config.max_allow_count).unwrap_or(i64::MAX);
        let mut visited = HashSet::new();
        let mut cursor = 0;

        loop {
            let page = match self.discovery.page(cursor).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(cursor, error = %e, "Active queue scan failed");
                    break;
                }
            };

            for queue in page.queues {
                if !visited.insert(queue.clone()) {
                    continue;
                }
                report.queues += 1;

                match self.admission.allow(&queue, quota).await {
                    Ok(admitted) => {
                        report.admitted += admitted;
                        tracing::info!(queue = %queue, admitted, "Scheduled admission");
                    }
                    Err(e) => {
                        report.failed += 1;
                        tracing::error!(
                            queue = %queue,
                            code = e.code(),
                            error = %e,
                            "Scheduled admission failed"
                        );
                    }
                }
            }

            if page.cursor == 0 {
                break;
            }
            cursor = page.cursor;
        }

        tracing::debug!(
            queues = report.queues,
            admitted = report.admitted,
            failed = report.failed,
            "Scheduler tick complete"
        );
        report
    }
}
