use thiserror::Error;

/// Error type for token encode/decode operations.
///
/// Decode failures collapse to two kinds on purpose: callers surface these
/// to untrusted clients and must not leak which field or check failed.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Token cannot be parsed or verified: {0}")]
    Malformed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Failed to sign token: {0}")]
    SigningFailed(String),
}
