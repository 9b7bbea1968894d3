//! Authentication module for managing user sessions.
//!
//! This module provides:
//! - `SessionCodec`: encrypts session records for storage
//! - `AuthService`: mock-credential login, session restore and logout
//! - `CredentialVerifier`: the credential check behind login
//!
//! Sessions live in the ephemeral store and expire 24 hours after login.

pub mod codec;
pub mod credentials;
pub mod session;

pub use codec::{SessionCodec, SessionCodecError, DEFAULT_PASSPHRASE};
pub use credentials::{CredentialVerifier, MockCredentials};
pub use session::{AuthService, LoginResult, SessionRecord, SessionUser, SESSION_KEY};
