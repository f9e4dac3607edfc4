//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container passed to every
//! dictionary, moderation and recognition action. External services sit
//! behind `Base*` traits so tests can swap in mocks.

use anyhow::{anyhow, Result};
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::common::{ServiceError, ServiceResult};
use crate::config::Config;
use crate::kernel::gesture_client::{DisabledGestureRecognizer, GestureServiceClient};
use crate::kernel::search_index::{DisabledSearchIndex, MeilisearchIndex};
use crate::kernel::{BaseGestureRecognizer, BaseSearchIndex, SyncPropagator};

/// Server dependencies accessible to actions
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Secondary, eventually-consistent search store
    pub search_index: Arc<dyn BaseSearchIndex>,
    /// Upper bound for any single search index call on the request path
    pub search_timeout: Duration,
    /// Hand-off point for index propagation after a committed write
    pub sync: SyncPropagator,
    pub gesture: Arc<dyn BaseGestureRecognizer>,
}

impl ServerDeps {
    /// Wire dependencies and start the sync propagator worker.
    pub fn new(
        db_pool: PgPool,
        search_index: Arc<dyn BaseSearchIndex>,
        search_timeout: Duration,
        sync_concurrency: usize,
        gesture: Arc<dyn BaseGestureRecognizer>,
    ) -> (Self, JoinHandle<()>) {
        let (sync, worker) = SyncPropagator::spawn(
            db_pool.clone(),
            search_index.clone(),
            search_timeout,
            sync_concurrency,
        );

        let deps = Self {
            db_pool,
            search_index,
            search_timeout,
            sync,
            gesture,
        };
        (deps, worker)
    }

    /// Build production dependencies from configuration.
    ///
    /// Unconfigured external services are replaced by disabled stand-ins.
    pub fn from_config(db_pool: PgPool, config: &Config) -> Result<(Self, JoinHandle<()>)> {
        let search_index: Arc<dyn BaseSearchIndex> = match &config.search.url {
            Some(url) => {
                info!(url = %url, index = %config.search.index_name, "Using Meilisearch dictionary index");
                Arc::new(MeilisearchIndex::new(&config.search)?)
            }
            None => {
                warn!("MEILISEARCH_URL not set, dictionary search will use Postgres only");
                Arc::new(DisabledSearchIndex)
            }
        };

        let gesture: Arc<dyn BaseGestureRecognizer> = match &config.ai_service_url {
            Some(url) => Arc::new(GestureServiceClient::new(url, config.ai_service_timeout)?),
            None => {
                warn!("AI_SERVICE_URL not set, gesture recognition is disabled");
                Arc::new(DisabledGestureRecognizer)
            }
        };

        Ok(Self::new(
            db_pool,
            search_index,
            config.search.timeout,
            config.sync.worker_concurrency,
            gesture,
        ))
    }

    /// Run a multi-step write on its own task and wait for it.
    ///
    /// Dropping the returned future (a client disconnect drops the request
    /// future) detaches the task instead of cancelling it, so the write still
    /// runs to the end.
    pub async fn run_detached<T, F, Fut>(&self, op: F) -> ServiceResult<T>
    where
        F: FnOnce(ServerDeps) -> Fut,
        Fut: Future<Output = ServiceResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        tokio::spawn(op(self.clone()))
            .await
            .map_err(|e| ServiceError::Internal(anyhow!("Write task failed: {}", e)))?
    }
}
