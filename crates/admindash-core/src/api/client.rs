//! API client for the demo users endpoint.
//!
//! Requests go through `ResilientFetch`, so they share the store's retry
//! counter and last error with every other request.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::fetch::{FetchRequest, ResilientFetch};
use super::transport::{HttpTransport, ReqwestTransport};
use super::ApiError;
use crate::config::Config;
use crate::state::{AppStore, NotificationKind};
use crate::users::ListedUser;

/// Users API. Clone is cheap - the transport is shared.
#[derive(Clone)]
pub struct UsersApi {
    fetch: ResilientFetch,
    users_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl UsersApi {
    /// Client talking to the configured API over HTTP
    pub fn new(config: &Config, store: AppStore) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self::with_transport(config, Arc::new(transport), store))
    }

    pub fn with_transport(
        config: &Config,
        transport: Arc<dyn HttpTransport>,
        store: AppStore,
    ) -> Self {
        Self {
            fetch: ResilientFetch::new(transport, store),
            users_url: config.endpoint("users"),
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    pub fn store(&self) -> &AppStore {
        self.fetch.store()
    }

    /// Fetch the full user listing
    pub async fn fetch_users(&self) -> Result<Vec<ListedUser>, ApiError> {
        let request = FetchRequest::get(self.users_url.as_str())
            .with_retries(self.max_retries)
            .with_retry_delay(self.retry_delay);
        self.fetch.request(request).await
    }

    /// Fetch the listing and report the outcome as a notification.
    ///
    /// On success after retries a success notification names the retry count
    /// observed before the fetch started; on failure the error message is
    /// queued as an error notification.
    pub async fn load_users(&self) -> Result<Vec<ListedUser>, ApiError> {
        let store = self.store().clone();
        let retries_before = store.retry_count();
        store.set_loading(true);

        let result = self.fetch_users().await;
        store.set_loading(false);

        match &result {
            Ok(users) => {
                info!(count = users.len(), "Users loaded");
                if retries_before > 0 {
                    store.add_notification(
                        format!("Successfully loaded users after {} retries", retries_before),
                        NotificationKind::Success,
                    );
                }
            }
            Err(e) => {
                store.add_notification(e.to_string(), NotificationKind::Error);
            }
        }
        result
    }
}
