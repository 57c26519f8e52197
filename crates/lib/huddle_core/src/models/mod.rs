//! Huddle API domain models.
//!
//! Field names follow the REST API's wire format (snake_case for events and
//! categories, camelCase for users and registration).

pub mod auth;
pub mod category;
pub mod event;

pub use auth::{
    LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse, TokensEnvelope, User,
};
pub use category::Category;
pub use event::{
    CreateEvent, Event, EventFilter, EventParticipant, ParticipantDecision, ParticipantStatus,
};

use thiserror::Error;

/// Client-side validation failure for an outgoing payload.
#[derive(Debug, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(pub String);
