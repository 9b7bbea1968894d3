use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::codec::SessionCodec;
use super::credentials::{CredentialVerifier, MockCredentials};
use crate::storage::KeyValueStore;

/// Ephemeral-store key holding the encrypted session
pub const SESSION_KEY: &str = "auth_session";

/// Session lifetime in milliseconds (24 hours)
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

pub const LOGIN_FAILED_MESSAGE: &str = "An error occurred during login";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user: SessionUser,
    /// Absolute expiry, epoch milliseconds
    pub expires_at: i64,
}

impl SessionRecord {
    /// Record for `user` expiring one TTL from now
    pub fn new(user: SessionUser) -> Self {
        Self::issued_at(user, Utc::now().timestamp_millis())
    }

    pub fn issued_at(user: SessionUser, now_ms: i64) -> Self {
        Self {
            user,
            expires_at: now_ms + SESSION_TTL_MS,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    /// A record is valid only while `expires_at` is strictly in the future.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at <= now_ms
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> i64 {
        ((self.expires_at - Utc::now().timestamp_millis()) / 60_000).max(0)
    }
}

/// Outcome of a login attempt, shaped for direct display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginResult {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(message: &str) -> Self {
        Self {
            success: false,
            error: Some(message.to_string()),
        }
    }
}

/// Login, session restore and logout on top of the session codec.
///
/// The encrypted session lives in the ephemeral store under `SESSION_KEY`.
/// Anything that cannot be decoded, or has expired, is removed and treated
/// as logged out.
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
    codec: SessionCodec,
    verifier: Box<dyn CredentialVerifier>,
    login_delay: Duration,
    session: Option<SessionRecord>,
}

impl AuthService {
    pub fn new(store: Arc<dyn KeyValueStore>, codec: SessionCodec) -> Self {
        Self {
            store,
            codec,
            verifier: Box::new(MockCredentials::default()),
            login_delay: Duration::ZERO,
            session: None,
        }
    }

    /// Simulated latency applied to every login attempt
    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    pub fn with_verifier(mut self, verifier: Box<dyn CredentialVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.session.as_ref().map(|record| &record.user)
    }

    /// The active session, including its expiry
    pub fn session(&self) -> Option<&SessionRecord> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Restore the session saved by an earlier login, if still valid.
    pub fn restore(&mut self) -> Option<SessionUser> {
        self.session = None;

        let blob = match self.store.get(SESSION_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                return None;
            }
        };

        match self.codec.decode(&blob) {
            Ok(record) if !record.is_expired() => {
                debug!(email = %record.user.email, "Session restored");
                let user = record.user.clone();
                self.session = Some(record);
                Some(user)
            }
            Ok(_) => {
                info!("Stored session expired");
                self.clear_stored_session();
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to restore session");
                self.clear_stored_session();
                None
            }
        }
    }

    /// Check credentials and, on success, store a fresh encrypted session.
    pub async fn login(&mut self, email: &str, password: &str) -> LoginResult {
        if !self.login_delay.is_zero() {
            tokio::time::sleep(self.login_delay).await;
        }

        let Some(user) = self.verifier.verify(email, password) else {
            info!(email = email, "Login rejected");
            return LoginResult::failed(INVALID_CREDENTIALS_MESSAGE);
        };

        let record = SessionRecord::new(user);
        let stored = self
            .codec
            .encode(&record)
            .map_err(anyhow::Error::from)
            .and_then(|blob| self.store.set(SESSION_KEY, &blob).map_err(anyhow::Error::from));

        match stored {
            Ok(()) => {
                info!(email = email, "Login successful");
                self.session = Some(record);
                LoginResult::ok()
            }
            Err(e) => {
                warn!(error = %e, "Failed to store session");
                LoginResult::failed(LOGIN_FAILED_MESSAGE)
            }
        }
    }

    pub fn logout(&mut self) {
        self.clear_stored_session();
        self.session = None;
        info!("Logged out");
    }

    fn clear_stored_session(&self) {
        if let Err(e) = self.store.remove(SESSION_KEY) {
            warn!(error = %e, "Failed to clear stored session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    fn service(store: &MemoryStore) -> AuthService {
        AuthService::new(
            Arc::new(store.clone()),
            SessionCodec::with_default_key().unwrap(),
        )
    }

    fn admin() -> SessionUser {
        SessionUser {
            id: "1".into(),
            email: "admin@example.com".into(),
            name: "Admin User".into(),
            role: "admin".into(),
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let record = SessionRecord::issued_at(admin(), 1_000);
        assert_eq!(record.expires_at, 1_000 + SESSION_TTL_MS);
        assert!(!record.is_expired_at(record.expires_at - 1));
        assert!(record.is_expired_at(record.expires_at));
        assert!(record.is_expired_at(record.expires_at + 1));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = SessionRecord::issued_at(admin(), 0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["expiresAt"], SESSION_TTL_MS);
        assert_eq!(json["user"]["role"], "admin");
    }

    #[tokio::test]
    async fn test_login_stores_session_expiring_in_24h() {
        let store = MemoryStore::new();
        let mut auth = service(&store);

        let before = Utc::now().timestamp_millis();
        let result = auth.login("admin@example.com", "admin123").await;
        let after = Utc::now().timestamp_millis();

        assert_eq!(result, LoginResult { success: true, error: None });
        assert!(auth.is_authenticated());
        assert_eq!(auth.user(), Some(&admin()));

        let blob = store.get(SESSION_KEY).unwrap().expect("session stored");
        let record = SessionCodec::with_default_key().unwrap().decode(&blob).unwrap();
        assert_eq!(record.user, admin());
        assert_eq!(auth.session().map(|s| s.expires_at), Some(record.expires_at));
        assert!(record.expires_at >= before + SESSION_TTL_MS - 1_000);
        assert!(record.expires_at <= after + SESSION_TTL_MS + 1_000);
    }

    #[tokio::test]
    async fn test_bad_credentials_store_nothing() {
        let store = MemoryStore::new();
        let mut auth = service(&store);

        for (email, password) in [
            ("admin@example.com", "wrong"),
            ("someone@example.com", "admin123"),
            ("", ""),
        ] {
            let result = auth.login(email, password).await;
            assert_eq!(
                result,
                LoginResult {
                    success: false,
                    error: Some("Invalid email or password".into()),
                }
            );
        }
        assert!(store.is_empty());
        assert!(!auth.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_simulated_latency() {
        let store = MemoryStore::new();
        let mut auth = service(&store).with_login_delay(Duration::from_millis(800));

        let start = tokio::time::Instant::now();
        auth.login("admin@example.com", "admin123").await;
        assert!(start.elapsed() >= Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_restore_after_login() {
        let store = MemoryStore::new();
        service(&store).login("admin@example.com", "admin123").await;

        let mut fresh = service(&store);
        assert!(!fresh.is_authenticated());
        assert_eq!(fresh.restore(), Some(admin()));
        assert!(fresh.is_authenticated());
    }

    #[test]
    fn test_restore_discards_expired_session() {
        let store = MemoryStore::new();
        let codec = SessionCodec::with_default_key().unwrap();
        let expired = SessionRecord {
            user: admin(),
            expires_at: Utc::now().timestamp_millis() - 1,
        };
        store.set(SESSION_KEY, &codec.encode(&expired).unwrap()).unwrap();

        let mut auth = service(&store);
        assert_eq!(auth.restore(), None);
        assert!(!auth.is_authenticated());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_discards_undecodable_session() {
        let store = MemoryStore::new();
        let foreign = SessionCodec::new("another-key").unwrap();
        store
            .set(SESSION_KEY, &foreign.encode(&SessionRecord::new(admin())).unwrap())
            .unwrap();

        let mut auth = service(&store);
        assert_eq!(auth.restore(), None);
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);

        store.set(SESSION_KEY, "garbage").unwrap();
        assert_eq!(auth.restore(), None);
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let store = MemoryStore::new();
        let mut auth = service(&store);
        auth.login("admin@example.com", "admin123").await;

        auth.logout();
        assert!(!auth.is_authenticated());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
        assert_eq!(service(&store).restore(), None);
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_storage_failure_reports_generic_error() {
        let mut auth = AuthService::new(
            Arc::new(ReadOnlyStore),
            SessionCodec::with_default_key().unwrap(),
        );
        let result = auth.login("admin@example.com", "admin123").await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("An error occurred during login"));
        assert!(!auth.is_authenticated());
    }
}
