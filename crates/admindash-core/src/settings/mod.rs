//! User preferences persisted in the on-disk store.
//!
//! `SettingsStore` owns the current preferences and broadcasts every change
//! through a `watch` channel. Saves made by this process notify subscribers
//! directly; changes written by another process reach them through
//! `on_storage_event` or `resync`.

pub mod preferences;

pub use preferences::{
    cycle_option, option_label, NotificationPreferences, UserPreferences, EMAIL_DIGESTS,
    LANGUAGES, TIMEZONES,
};

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError, StorageEvent};

/// Persistent-store key holding the preferences JSON
pub const PREFERENCES_KEY: &str = "user_preferences";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to persist preferences: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize preferences: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub struct SettingsStore {
    storage: Arc<dyn KeyValueStore>,
    tx: watch::Sender<UserPreferences>,
}

impl SettingsStore {
    /// Load preferences from `storage`. A missing or unreadable entry
    /// leaves the defaults in place.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let preferences = read_stored(storage.as_ref()).unwrap_or_default();
        let (tx, _) = watch::channel(preferences);
        Self { storage, tx }
    }

    pub fn preferences(&self) -> UserPreferences {
        self.tx.borrow().clone()
    }

    pub fn dark_mode(&self) -> bool {
        self.tx.borrow().dark_mode
    }

    /// Observe every saved or resynced value
    pub fn subscribe(&self) -> watch::Receiver<UserPreferences> {
        self.tx.subscribe()
    }

    /// Persist `preferences` and notify subscribers. Nothing changes in
    /// memory when the write fails.
    pub fn save(&self, preferences: UserPreferences) -> Result<(), SettingsError> {
        let contents = serde_json::to_string(&preferences)?;
        self.storage.set(PREFERENCES_KEY, &contents)?;
        debug!(dark_mode = preferences.dark_mode, "Preferences saved");
        self.tx.send_replace(preferences);
        Ok(())
    }

    /// Apply `f` to a copy of the current preferences and save the result
    pub fn update<F>(&self, f: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut UserPreferences),
    {
        let mut preferences = self.preferences();
        f(&mut preferences);
        self.save(preferences)
    }

    /// Save the defaults
    pub fn reset(&self) -> Result<(), SettingsError> {
        self.save(UserPreferences::default())
    }

    /// Flip dark mode and return the new value
    pub fn toggle_dark_mode(&self) -> Result<bool, SettingsError> {
        let mut preferences = self.preferences();
        preferences.dark_mode = !preferences.dark_mode;
        let dark_mode = preferences.dark_mode;
        self.save(preferences)?;
        Ok(dark_mode)
    }

    /// Re-read the persisted value. Returns true if subscribers were
    /// notified of a change.
    pub fn resync(&self) -> bool {
        match read_stored(self.storage.as_ref()) {
            Some(preferences) => self.replace_if_changed(preferences),
            None => false,
        }
    }

    /// React to a change another process made to the persistent store
    pub fn on_storage_event(&self, event: &StorageEvent) -> bool {
        if event.key != PREFERENCES_KEY {
            return false;
        }
        let Some(ref contents) = event.new_value else {
            return false;
        };
        match serde_json::from_str::<UserPreferences>(contents) {
            Ok(preferences) => self.replace_if_changed(preferences),
            Err(e) => {
                warn!(error = %e, "Ignoring unparseable preferences from storage event");
                false
            }
        }
    }

    fn replace_if_changed(&self, preferences: UserPreferences) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == preferences {
                false
            } else {
                *current = preferences;
                true
            }
        })
    }
}

fn read_stored(storage: &dyn KeyValueStore) -> Option<UserPreferences> {
    let contents = match storage.get(PREFERENCES_KEY) {
        Ok(Some(contents)) => contents,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "Failed to read preferences");
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(preferences) => Some(preferences),
        Err(e) => {
            warn!(error = %e, "Failed to parse preferences");
            None
        }
    }
}
