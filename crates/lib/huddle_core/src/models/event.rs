//! Events and participation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

const TITLE_MIN_CHARS: usize = 3;
const TITLE_MAX_CHARS: usize = 100;
const MIN_PARTICIPANTS: i32 = 2;

/// An event pinned on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub creator_id: String,
    pub category_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub lat: f64,
    pub lon: f64,
    pub start_time: DateTime<Utc>,
    pub max_participants: i32,
    #[serde(default)]
    pub current_participants: i32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Participation state of a user in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Organizer decision on a pending participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantDecision {
    Accepted,
    Rejected,
}

impl From<ParticipantDecision> for ParticipantStatus {
    fn from(d: ParticipantDecision) -> Self {
        match d {
            ParticipantDecision::Accepted => ParticipantStatus::Accepted,
            ParticipantDecision::Rejected => ParticipantStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParticipant {
    pub event_id: String,
    pub user_id: String,
    pub status: ParticipantStatus,
    pub joined_at: DateTime<Utc>,
}

/// `POST /events` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateEvent {
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub lat: f64,
    pub lon: f64,
    pub start_time: DateTime<Utc>,
    pub max_participants: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub requires_approval: bool,
}

impl CreateEvent {
    /// Check the payload before sending it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let title_len = self.title.trim().chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title_len) {
            return Err(ValidationError(format!(
                "title must be {TITLE_MIN_CHARS}-{TITLE_MAX_CHARS} characters"
            )));
        }
        if self.max_participants < MIN_PARTICIPANTS {
            return Err(ValidationError(format!(
                "max_participants must be at least {MIN_PARTICIPANTS}"
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(ValidationError(format!("lat out of range: {}", self.lat)));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(ValidationError(format!("lon out of range: {}", self.lon)));
        }
        if self.price.is_some_and(|p| p < 0.0) {
            return Err(ValidationError("price must not be negative".into()));
        }
        Ok(())
    }
}

/// Map search parameters for `GET /events`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Search radius in meters.
    pub radius: Option<f64>,
    /// Category slug.
    pub category: Option<String>,
}

impl EventFilter {
    /// Query string pairs; absent and blank values are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(lat) = self.lat {
            pairs.push(("lat", lat.to_string()));
        }
        if let Some(lon) = self.lon {
            pairs.push(("lon", lon.to_string()));
        }
        if let Some(radius) = self.radius {
            pairs.push(("radius", radius.to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        pairs
    }
}
