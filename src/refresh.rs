//! Scheduled re-fetch of server state after a mutation
//!
//! Instead of reloading the page, a successful mutation schedules a refresh
//! that pulls games, requests and stats and swaps the result into the UI
//! state as a fresh [`CatalogSnapshot`].

use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::api::{CatalogStats, GamePage, RequestPage, endpoints};
use crate::error::{ArcaloadError, Result};
use crate::notify::Severity;
use crate::state::SharedState;
use crate::transport::{ApiRequest, Transport};

pub const REFRESH_ERROR_MESSAGE: &str = "Error refreshing catalog";

/// Server truth as of `fetched_at`
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub games: GamePage,
    pub requests: RequestPage,
    pub stats: CatalogStats,
    pub fetched_at: Timestamp,
}

pub struct RefreshScheduler<T: Transport> {
    transport: Arc<T>,
    state: SharedState,
    scheduled: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl<T: Transport> Clone for RefreshScheduler<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            state: Arc::clone(&self.state),
            scheduled: Arc::clone(&self.scheduled),
        }
    }
}

impl<T: Transport> RefreshScheduler<T> {
    pub fn new(transport: Arc<T>, state: SharedState) -> Self {
        Self {
            transport,
            state,
            scheduled: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Refresh once `delay` has elapsed. Never refreshes immediately.
    pub fn schedule(&self, delay: Duration) {
        let scheduler = self.clone();
        tracing::debug!("refresh scheduled in {}ms", delay.as_millis());
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = scheduler.refresh_now().await {
                tracing::warn!("scheduled refresh failed: {e}");
            }
        });

        let mut scheduled = self.scheduled.lock();
        scheduled.retain(|h| !h.is_finished());
        scheduled.push(handle);
    }

    /// Wait for every refresh scheduled so far
    pub async fn wait_scheduled(&self) {
        let handles: Vec<_> = std::mem::take(&mut *self.scheduled.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("refresh task ended abnormally: {e}");
            }
        }
    }

    /// Fetch a fresh snapshot and install it
    pub async fn refresh_now(&self) -> Result<CatalogSnapshot> {
        match self.fetch().await {
            Ok(snapshot) => {
                let mut state = self.state.lock();
                state.catalog = Some(snapshot.clone());
                state.refresh_count += 1;
                Ok(snapshot)
            }
            Err(e) => {
                self.state
                    .lock()
                    .notifications
                    .notify(REFRESH_ERROR_MESSAGE, Severity::Error);
                Err(e)
            }
        }
    }

    async fn fetch(&self) -> Result<CatalogSnapshot> {
        let (games, requests, stats) = futures::try_join!(
            self.get::<GamePage>(endpoints::GAMES),
            self.get::<RequestPage>(endpoints::REQUESTS),
            self.get::<CatalogStats>(endpoints::STATS),
        )?;

        Ok(CatalogSnapshot {
            games,
            requests,
            stats,
            fetched_at: Timestamp::now(),
        })
    }

    async fn get<R: serde::de::DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self.transport.send(ApiRequest::get(path)).await?;
        if !response.is_success() {
            return Err(ArcaloadError::Server {
                status: response.status,
                message: response.message().unwrap_or("request failed").to_string(),
            });
        }
        response.parse()
    }
}
