//! Shared application state.
//!
//! `AppStore` is the context object every fetch and screen reports into:
//! the process-wide retry counter, the last request error, a loading flag
//! and the notification queue shown as toasts.
//!
//! The store is cheap to clone; clones share the same state. Tests build a
//! fresh store per case.

pub mod notifications;

pub use notifications::{Notification, NotificationKind};

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

/// Persistent-store key holding the notification queue
pub const APP_STORAGE_KEY: &str = "app-storage";

#[derive(Debug, Default)]
struct Inner {
    retry_count: u32,
    is_loading: bool,
    notifications: Vec<Notification>,
}

#[derive(Debug, Clone)]
pub struct AppStore {
    inner: Arc<Mutex<Inner>>,
    error_tx: Arc<watch::Sender<Option<String>>>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore {
    pub fn new() -> Self {
        let (error_tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            error_tx: Arc::new(error_tx),
        }
    }

    // ===== Retry =====

    pub fn retry_count(&self) -> u32 {
        self.inner.lock().retry_count
    }

    pub fn increment_retry(&self) {
        let mut inner = self.inner.lock();
        inner.retry_count += 1;
        debug!(retry_count = inner.retry_count, "Retry counter incremented");
    }

    pub fn reset_retry(&self) {
        self.inner.lock().retry_count = 0;
    }

    // ===== Error =====

    pub fn last_error(&self) -> Option<String> {
        self.error_tx.borrow().clone()
    }

    pub fn set_error(&self, error: Option<String>) {
        self.error_tx.send_replace(error);
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    /// Observe every change to the last error
    pub fn subscribe_errors(&self) -> watch::Receiver<Option<String>> {
        self.error_tx.subscribe()
    }

    // ===== Loading =====

    pub fn is_loading(&self) -> bool {
        self.inner.lock().is_loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.inner.lock().is_loading = loading;
    }

    // ===== Notifications =====

    /// Queue a notification and return its id
    pub fn add_notification(&self, message: impl Into<String>, kind: NotificationKind) -> String {
        let notification = Notification::new(message, kind);
        let id = notification.id.clone();
        self.inner.lock().notifications.push(notification);
        id
    }

    pub fn remove_notification(&self, id: &str) {
        self.inner.lock().notifications.retain(|n| n.id != id);
    }

    pub fn clear_notifications(&self) {
        self.inner.lock().notifications.clear();
    }

    /// Snapshot of the current queue, oldest first
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.lock().notifications.clone()
    }

    /// Drop notifications past their display lifetime. Returns how many
    /// were removed.
    pub fn prune_expired(&self) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.notifications.len();
        inner.notifications.retain(|n| !n.is_expired());
        before - inner.notifications.len()
    }

    /// Save the notification queue to a persistent store
    pub fn persist_notifications(&self, store: &dyn KeyValueStore) -> anyhow::Result<()> {
        let notifications = self.notifications();
        let contents = serde_json::to_string(&notifications)?;
        store.set(APP_STORAGE_KEY, &contents)?;
        Ok(())
    }

    /// Load a previously persisted queue, skipping anything already expired.
    /// A missing or unreadable entry leaves the queue untouched.
    pub fn restore_notifications(&self, store: &dyn KeyValueStore) {
        let contents = match store.get(APP_STORAGE_KEY) {
            Ok(Some(contents)) => contents,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted notifications");
                return;
            }
        };

        match serde_json::from_str::<Vec<Notification>>(&contents) {
            Ok(restored) => {
                let mut inner = self.inner.lock();
                inner
                    .notifications
                    .extend(restored.into_iter().filter(|n| !n.is_expired()));
            }
            Err(e) => warn!(error = %e, "Failed to parse persisted notifications"),
        }
    }
}
