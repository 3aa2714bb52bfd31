use thiserror::Error;

/// Error for SessionId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for session store operations
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Error for refresh-token lifecycle operations
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// Token cannot be parsed/verified, has the wrong purpose, or lacks
    /// the chain fields a refresh token must carry.
    #[error("Refresh token is malformed")]
    Malformed,

    #[error("Refresh token is expired")]
    Expired,

    /// The chain was revoked (logout, replay fallout, password reset) or
    /// never existed. Terminal.
    #[error("Session is revoked")]
    Revoked,

    /// A superseded refresh token was presented. The whole chain has been
    /// revoked in response.
    #[error("Refresh token replay detected; session revoked")]
    Replay,

    #[error("Failed to sign tokens: {0}")]
    Signing(String),

    #[error(transparent)]
    Store(#[from] SessionStoreError),
}
