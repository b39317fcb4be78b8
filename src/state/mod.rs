//! Shared application state: the installed storage backend and the
//! degraded flag derived from it.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{dao::content_store::ContentStore, error::ServiceError};

/// Cheaply clonable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state. The server starts degraded; the storage
/// supervisor installs a store once one answers.
pub struct AppState {
    content_store: RwLock<Option<Arc<dyn ContentStore>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`].
    pub fn new() -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            content_store: RwLock::new(None),
            degraded: degraded_tx,
        })
    }

    /// Obtain a handle to the current content store, if one is installed.
    pub async fn content_store(&self) -> Option<Arc<dyn ContentStore>> {
        let guard = self.content_store.read().await;
        guard.as_ref().cloned()
    }

    /// Current content store, or [`ServiceError::Degraded`] when none is
    /// installed.
    pub async fn require_content_store(&self) -> Result<Arc<dyn ContentStore>, ServiceError> {
        self.content_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a storage backend and leave degraded mode.
    pub async fn install_content_store(&self, store: Arc<dyn ContentStore>) {
        {
            let mut guard = self.content_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Drop the storage backend and enter degraded mode.
    pub async fn clear_content_store(&self) {
        {
            let mut guard = self.content_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub(crate) fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dao::content_store::memory::MemoryContentStore;

    #[tokio::test]
    async fn starts_degraded_until_a_store_is_installed() {
        let state = AppState::new();
        assert!(state.is_degraded());
        assert!(state.content_store().await.is_none());
        assert!(matches!(
            state.require_content_store().await,
            Err(ServiceError::Degraded)
        ));

        state
            .install_content_store(Arc::new(MemoryContentStore::new()))
            .await;
        assert!(!state.is_degraded());
        assert!(state.require_content_store().await.is_ok());
    }

    #[tokio::test]
    async fn watcher_observes_degraded_transitions() {
        let state = AppState::new();
        let mut watcher = state.degraded_watcher();
        assert!(*watcher.borrow_and_update());

        state
            .install_content_store(Arc::new(MemoryContentStore::new()))
            .await;
        watcher.changed().await.unwrap();
        assert!(!*watcher.borrow_and_update());

        state.clear_content_store().await;
        watcher.changed().await.unwrap();
        assert!(*watcher.borrow_and_update());
    }
}
