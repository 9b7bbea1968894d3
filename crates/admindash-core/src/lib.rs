//! Core library for admindash.
//!
//! Everything the dashboard does lives here; the terminal front end only
//! renders it:
//!
//! - `auth`: encrypted session codec, mock-credential login, restore/logout
//! - `api`: resilient JSON fetch with retry/backoff and the users API
//! - `state`: shared retry counter, last error, notifications
//! - `settings`: user preferences with change subscriptions
//! - `storage`: ephemeral and persistent key-value stores
//! - `users`: listing model with filtering and pagination

pub mod api;
pub mod auth;
pub mod config;
pub mod settings;
pub mod state;
pub mod storage;
pub mod users;
pub mod utils;

pub use config::Config;
