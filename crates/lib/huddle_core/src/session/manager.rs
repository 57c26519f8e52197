//! Session/token manager.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{Clock, MemoryTokenStore, Result, SessionState, SystemClock, TokenPair, TokenStore};

/// Holds the current credential pair and persists every change.
///
/// Shared by reference (usually behind an `Arc`) with the API client, which
/// reads the access token at call time for each request.
pub struct SessionManager {
    state: RwLock<SessionState>,
    store: Box<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens are deliberately not printed.
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .field("expires_at", &self.expires_at())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Restore a manager from `store` using the system clock.
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Restore a manager from `store` with an explicit time source.
    ///
    /// Never fails: unreadable or malformed records restore as an empty
    /// session.
    pub fn with_clock(store: impl TokenStore + 'static, clock: Arc<dyn Clock>) -> Self {
        let state = match store.load() {
            Ok(Some(raw)) => SessionState::from_record(&raw),
            Ok(None) => SessionState::empty(),
            Err(e) => {
                warn!(error = %e, "failed to read session storage, starting logged out");
                SessionState::empty()
            }
        };
        debug!(restored = !state.is_empty(), "session manager initialised");

        Self {
            state: RwLock::new(state),
            store: Box::new(store),
            clock,
        }
    }

    /// Manager backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Replace the whole session with `pair` and persist it.
    ///
    /// Invalid pairs and storage failures leave the current session as it was.
    pub fn set_tokens(&self, pair: &TokenPair) -> Result<()> {
        pair.validate()?;
        let next = SessionState::from_pair(pair, self.clock.now())?;
        let record = next.to_record()?;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.store.save(&record)?;
        *state = next;
        info!(expires_at = ?state.expires_at(), "session tokens stored");
        Ok(())
    }

    /// Drop all credentials and persist the cleared record.
    ///
    /// Idempotent. In-memory credentials are gone even if persisting fails.
    pub fn clear_auth(&self) -> Result<()> {
        let cleared = SessionState::empty();
        let record = cleared.to_record()?;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let was_authenticated = !state.is_empty();
        *state = cleared;
        self.store.save(&record)?;
        if was_authenticated {
            info!("session cleared");
        }
        Ok(())
    }

    /// Current access token. Does not check expiry.
    pub fn access_token(&self) -> Option<String> {
        self.read().access_token().map(str::to_owned)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token().map(str::to_owned)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.read().expires_at()
    }

    /// `true` when a session exists and its access token lifetime has passed.
    pub fn is_expired(&self) -> bool {
        self.read().is_expired_at(self.clock.now())
    }

    pub fn is_authenticated(&self) -> bool {
        !self.read().is_empty()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}
