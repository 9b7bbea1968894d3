//! Symmetric encryption of session records for storage.
//!
//! A blob is the standard base64 encoding of `nonce || ciphertext`, where the
//! ciphertext is ChaCha20-Poly1305 over the JSON-serialized record. The
//! Poly1305 tag makes a wrong key or an edited blob fail to decode instead
//! of producing garbage.
//!
//! The key is derived from a passphrase compiled into the binary, so this
//! only keeps the session unreadable to casual inspection of the store. It
//! is not a trust boundary.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    ChaCha20Poly1305, Key, Nonce,
};
use argon2::Argon2;
use thiserror::Error;

use super::session::SessionRecord;

/// Built-in passphrase used when the config does not supply one.
pub const DEFAULT_PASSPHRASE: &str = "your-secret-key-change-in-production";

/// Fixed salt for passphrase key derivation
const KEY_SALT: &[u8] = b"admindash-session-v1";

const KEY_SIZE: usize = 32;

const NONCE_SIZE: usize = 12;

#[derive(Error, Debug)]
pub enum SessionCodecError {
    #[error("Failed to encode session: {0}")]
    Encode(String),

    #[error("Failed to decode session: {0}")]
    Decode(String),

    #[error("Failed to derive session key: {0}")]
    KeyDerivation(String),
}

/// Encrypts and decrypts `SessionRecord`s. Clone is cheap.
#[derive(Clone)]
pub struct SessionCodec {
    cipher: ChaCha20Poly1305,
}

impl fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCodec").finish_non_exhaustive()
    }
}

impl SessionCodec {
    /// Build a codec whose key is derived from `passphrase` with Argon2id.
    pub fn new(passphrase: &str) -> Result<Self, SessionCodecError> {
        let mut key = [0u8; KEY_SIZE];
        Argon2::default()
            .hash_password_into(passphrase.as_bytes(), KEY_SALT, &mut key)
            .map_err(|e| SessionCodecError::KeyDerivation(e.to_string()))?;

        Ok(Self {
            cipher: ChaCha20Poly1305::new(Key::from_slice(&key)),
        })
    }

    /// Codec keyed with the built-in passphrase
    pub fn with_default_key() -> Result<Self, SessionCodecError> {
        Self::new(DEFAULT_PASSPHRASE)
    }

    /// Encrypt a record into an opaque blob. Each call uses a fresh nonce,
    /// so encoding the same record twice gives different blobs.
    pub fn encode(&self, record: &SessionRecord) -> Result<String, SessionCodecError> {
        let plaintext =
            serde_json::to_vec(record).map_err(|e| SessionCodecError::Encode(e.to_string()))?;

        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|e| SessionCodecError::Encode(e.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(blob))
    }

    /// Decrypt a blob back into a record.
    ///
    /// Fails on malformed input, a blob sealed under another key, or a
    /// payload that is not a session record. Never returns a partial record.
    pub fn decode(&self, blob: &str) -> Result<SessionRecord, SessionCodecError> {
        let bytes = STANDARD
            .decode(blob.trim())
            .map_err(|e| SessionCodecError::Decode(format!("not base64: {}", e)))?;

        if bytes.len() <= NONCE_SIZE {
            return Err(SessionCodecError::Decode(format!(
                "blob too short ({} bytes)",
                bytes.len()
            )));
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| {
                SessionCodecError::Decode("authentication failed (wrong key or tampered)".into())
            })?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| SessionCodecError::Decode(format!("invalid session payload: {}", e)))
    }
}
