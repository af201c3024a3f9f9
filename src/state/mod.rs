//! Shared application state: the storage handle, the degraded-mode flag, and
//! the registry of in-progress score-entry sessions.

/// Score-entry working state and its transitions.
pub mod entry;
/// Pure scoring model and aggregation.
pub mod round;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::AppConfig, dao::round_store::RoundStore, error::ServiceError,
    state::entry::EntrySession,
};

/// Cheaply cloneable handle to the shared application state.
pub type SharedState = Arc<AppState>;

/// Key identifying one user's entry session for one round.
pub type EntryKey = (String, Uuid);

/// Central application state shared by every request handler.
pub struct AppState {
    round_store: RwLock<Option<Arc<dyn RoundStore>>>,
    entries: DashMap<EntryKey, EntrySession>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned
    /// cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is
    /// installed by the supervisor.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            round_store: RwLock::new(None),
            entries: DashMap::new(),
            config,
        })
    }

    /// Obtain a handle to the current round store, if one is installed.
    pub async fn round_store(&self) -> Option<Arc<dyn RoundStore>> {
        let guard = self.round_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current round store or fail with the degraded-mode error.
    pub async fn require_round_store(&self) -> Result<Arc<dyn RoundStore>, ServiceError> {
        self.round_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new round store implementation and leave degraded mode.
    pub async fn install_round_store(&self, store: Arc<dyn RoundStore>) {
        let mut guard = self.round_store.write().await;
        *guard = Some(store);
    }

    /// Remove the current round store and enter degraded mode.
    pub async fn clear_round_store(&self) {
        let mut guard = self.round_store.write().await;
        guard.take();
    }

    /// Current degraded flag: no storage backend installed.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.round_store.read().await;
        guard.is_none()
    }

    /// Registry of active entry sessions keyed by owner and round.
    pub fn entries(&self) -> &DashMap<EntryKey, EntrySession> {
        &self.entries
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
