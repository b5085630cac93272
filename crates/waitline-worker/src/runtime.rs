//! Assembles store, notifier, and services from configuration.

use std::sync::Arc;

use tracing::info;

use waitline_core::config::AppConfig;
use waitline_core::result::AppResult;
use waitline_core::traits::notifier::QueueNotifier;
use waitline_core::traits::store::QueueStore;
use waitline_realtime::NotifierManager;
use waitline_service::{AdmissionService, HistoryService, TokenService};
use waitline_store::StoreManager;

use crate::discovery::QueueDiscovery;
use crate::scheduler::AdmissionScheduler;

/// Fully wired Waitline components shared by the server and the CLI.
#[derive(Debug, Clone)]
pub struct WaitlineRuntime {
    /// Store manager.
    pub store: StoreManager,
    /// Notifier manager.
    pub notifier: NotifierManager,
    /// History log.
    pub history: HistoryService,
    /// Admission engine.
    pub admission: AdmissionService,
    /// Bypass tokens.
    pub tokens: TokenService,
    /// Periodic admission driver.
    pub scheduler: AdmissionScheduler,
}

impl WaitlineRuntime {
    /// Connect the configured providers and build every service.
    pub async fn build(config: &AppConfig) -> AppResult<Self> {
        let store = StoreManager::new(&config.store).await?;
        let notifier = NotifierManager::new(&config.notification, store.redis_client())?;
        let runtime = Self::assemble(config, store, notifier)?;

        info!(
            store = %config.store.provider,
            notification = %config.notification.provider,
            "Waitline runtime ready"
        );
        Ok(runtime)
    }

    /// Build every service over already constructed providers.
    pub fn assemble(
        config: &AppConfig,
        store: StoreManager,
        notifier: NotifierManager,
    ) -> AppResult<Self> {
        let shared_store: Arc<dyn QueueStore> = store.store();
        let shared_notifier: Arc<dyn QueueNotifier> = notifier.notifier();

        let history = HistoryService::new(shared_store.clone(), config.history.clone());
        let admission = AdmissionService::new(
            shared_store.clone(),
            history.clone(),
            shared_notifier,
            config.queue.clone(),
            config.notification.rank_change_window,
        );
        let tokens = TokenService::new(&config.token)?;
        let discovery = QueueDiscovery::new(shared_store, config.scheduler.scan_batch_size);
        let scheduler =
            AdmissionScheduler::new(admission.clone(), discovery, config.scheduler.clone());

        Ok(Self {
            store,
            notifier,
            history,
            admission,
            tokens,
            scheduler,
        })
    }
}
