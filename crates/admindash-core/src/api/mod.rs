//! HTTP access for the dashboard.
//!
//! - `ResilientFetch`: JSON requests with bounded retries and linear backoff
//! - `UsersApi`: the demo users listing endpoint
//! - `HttpTransport`: the single-exchange network seam, backed by reqwest
//!
//! Retry telemetry and the last failure are reported to the `AppStore`
//! handed to the client.

pub mod client;
pub mod error;
pub mod fetch;
pub mod transport;

pub use client::UsersApi;
pub use error::ApiError;
pub use fetch::{FetchRequest, ResilientFetch};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};
