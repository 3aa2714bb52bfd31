use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::models::AccountId;
use crate::domain::session::errors::SessionIdError;

/// Rotation chain identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a session ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, SessionIdError> {
        Uuid::parse_str(s)
            .map(SessionId)
            .map_err(|e| SessionIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Server-side record of one refresh rotation chain.
///
/// Created at login with `seq` 0. Each successful refresh increments
/// `seq`; a refresh token whose embedded sequence trails the stored one
/// has been superseded, and its reuse means theft. `revoked` is terminal.
#[derive(Debug, Clone)]
pub struct RefreshSession {
    pub id: SessionId,
    pub account_id: AccountId,
    pub seq: u64,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl RefreshSession {
    /// Start a new chain for the given account at sequence 0.
    pub fn begin(account_id: AccountId) -> Self {
        Self {
            id: SessionId::new(),
            account_id,
            seq: 0,
            revoked: false,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of the store's atomic sequence advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The expected sequence matched; the chain now sits at the returned
    /// (incremented) sequence.
    Advanced(u64),
    /// The presented sequence trails or leads the stored one: the token
    /// was already consumed, or never issued by this chain.
    SeqMismatch,
    /// The chain was revoked earlier.
    Revoked,
    /// No chain with this id exists.
    NotFound,
}

/// Access/refresh token pair handed back to the route layer.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
