//! # huddle_api_client
//!
//! Typed HTTP client for the Huddle REST API.
//!
//! The client never owns credentials. It holds a shared
//! [`SessionManager`](huddle_core::session::SessionManager) and reads the
//! access token from it for every request, attaching it as
//! `Authorization: Bearer <token>` when present. A `401` on a session-aware
//! endpoint triggers a single token refresh and one retry; when the refresh
//! is rejected the session is cleared and [`ApiError::SessionExpired`] is
//! returned.

mod auth;
mod client;
pub mod config;
pub mod error;
mod events;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
