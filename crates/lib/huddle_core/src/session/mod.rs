//! Client-side session management.
//!
//! Owns the access/refresh token pair, persists it through a [`TokenStore`],
//! and answers "what is the current access token" on demand. No network I/O
//! happens here; reacting to `401` responses is the API client's job.

pub mod clock;
pub mod manager;
pub mod state;
pub mod store;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::SessionManager;
pub use state::SessionState;
pub use store::{FileTokenStore, MemoryTokenStore, SESSION_STORAGE_KEY, TokenStore};
pub use token::TokenPair;

use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid token pair: {0}")]
    InvalidTokenPair(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Session serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Config directory not available")]
    NoConfigDir,
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
