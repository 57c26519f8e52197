//! Session state and its persisted record.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Result, SessionError, TokenPair};

/// Current credential state.
///
/// Either both tokens and `expires_at` are present, or all three are absent.
/// Fields are private so the only way to populate a state is from a full
/// [`TokenPair`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

/// On-disk shape: `{"accessToken", "refreshToken", "expiresAt"}` with
/// `expiresAt` in epoch milliseconds.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    expires_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// An empty (logged out) session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Mint a session from a token pair. `expires_at` is fixed here and never
    /// recomputed.
    ///
    /// `expires_at` is truncated to milliseconds, the precision of the
    /// persisted record. Lifetimes that overflow the calendar are rejected.
    pub fn from_pair(pair: &TokenPair, now: DateTime<Utc>) -> Result<Self> {
        let expires_at = Duration::try_seconds(pair.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                SessionError::InvalidTokenPair(format!(
                    "expires_in out of range: {}",
                    pair.expires_in
                ))
            })?
            .trunc_subsecs(3);

        Ok(Self {
            access_token: Some(pair.access_token.clone()),
            refresh_token: Some(pair.refresh_token.clone()),
            expires_at: Some(expires_at),
        })
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none()
    }

    /// `true` once `now` has reached `expires_at`. Empty sessions never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Serialize to the persisted JSON record.
    pub fn to_record(&self) -> serde_json::Result<String> {
        serde_json::to_string(&SessionRecord {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            expires_at: self.expires_at,
        })
    }

    /// Parse a persisted record.
    ///
    /// Anything that is not a complete, well-formed record restores as an
    /// empty session.
    pub fn from_record(raw: &str) -> Self {
        let record: SessionRecord = match serde_json::from_str(raw) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "discarding unreadable session record");
                return Self::empty();
            }
        };

        match (record.access_token, record.refresh_token, record.expires_at) {
            (Some(access), Some(refresh), Some(expires_at))
                if !is_blank(&access) && !is_blank(&refresh) =>
            {
                Self {
                    access_token: Some(access),
                    refresh_token: Some(refresh),
                    expires_at: Some(expires_at),
                }
            }
            (None, None, None) => Self::empty(),
            _ => {
                warn!("discarding partially populated session record");
                Self::empty()
            }
        }
    }
}

/// Blank tokens count as absent, both when minting and when restoring.
pub(crate) fn is_blank(token: &str) -> bool {
    token.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("timestamp")
    }

    #[test]
    fn from_pair_computes_expiry_once() {
        let state = SessionState::from_pair(&TokenPair::bearer("A", "R", 60), at(1_000)).expect("mint");
        assert_eq!(state.access_token(), Some("A"));
        assert_eq!(state.refresh_token(), Some("R"));
        assert_eq!(state.expires_at(), Some(at(1_060)));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let state = SessionState::from_pair(&TokenPair::bearer("A", "R", 60), at(0)).expect("mint");
        assert!(!state.is_expired_at(at(59)));
        assert!(state.is_expired_at(at(60)));
    }

    #[test]
    fn empty_session_never_expires() {
        assert!(!SessionState::empty().is_expired_at(at(i32::MAX as i64)));
    }

    #[test]
    fn record_uses_camel_case_and_millis() {
        let state = SessionState::from_pair(&TokenPair::bearer("A", "R", 1), at(10)).expect("mint");
        let raw = state.to_record().expect("serialize");
        let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(json["accessToken"], "A");
        assert_eq!(json["refreshToken"], "R");
        assert_eq!(json["expiresAt"], 11_000);
    }

    #[test]
    fn cleared_record_has_nulls() {
        let raw = SessionState::empty().to_record().expect("serialize");
        assert_eq!(
            raw,
            r#"{"accessToken":null,"refreshToken":null,"expiresAt":null}"#
        );
    }

    #[test]
    fn record_restores_identically() {
        let state = SessionState::from_pair(&TokenPair::bearer("A", "R", 3600), at(42)).expect("mint");
        let raw = state.to_record().expect("serialize");
        assert_eq!(SessionState::from_record(&raw), state);
    }

    #[test]
    fn non_json_restores_empty() {
        assert!(SessionState::from_record("not json {").is_empty());
    }

    #[test]
    fn wrong_structure_restores_empty() {
        assert!(SessionState::from_record("[1, 2, 3]").is_empty());
        assert!(SessionState::from_record(r#"{"accessToken": 7}"#).is_empty());
    }

    #[test]
    fn partial_record_restores_empty() {
        let raw = r#"{"accessToken":"A","refreshToken":null,"expiresAt":1000}"#;
        assert_eq!(SessionState::from_record(raw), SessionState::empty());
    }

    #[test]
    fn empty_strings_restore_empty() {
        let raw = r#"{"accessToken":"","refreshToken":"R","expiresAt":1000}"#;
        assert!(SessionState::from_record(raw).is_empty());
    }

    #[test]
    fn whitespace_tokens_restore_empty() {
        let raw = r#"{"accessToken":"  ","refreshToken":"R","expiresAt":1000}"#;
        assert!(SessionState::from_record(raw).is_empty());
        let raw = r#"{"accessToken":"A","refreshToken":"\t","expiresAt":1000}"#;
        assert!(SessionState::from_record(raw).is_empty());
    }

    #[test]
    fn overflowing_lifetime_is_rejected() {
        for expires_in in [i64::MAX, 10_000_000_000_000] {
            let err = SessionState::from_pair(&TokenPair::bearer("A", "R", expires_in), at(0))
                .unwrap_err();
            assert!(matches!(err, SessionError::InvalidTokenPair(_)), "{expires_in}");
        }
    }

    #[test]
    fn expiry_is_truncated_to_record_precision() {
        let now = DateTime::from_timestamp(1_700_000_000, 123_456_789).expect("timestamp");
        let state = SessionState::from_pair(&TokenPair::bearer("A", "R", 60), now).expect("mint");
        assert_eq!(
            state.expires_at(),
            DateTime::from_timestamp(1_700_000_060, 123_000_000)
        );
        let raw = state.to_record().expect("serialize");
        assert_eq!(SessionState::from_record(&raw), state);
    }
}
