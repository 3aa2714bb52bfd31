use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    /// The configured work factor is not accepted by the underlying
    /// primitive. Raised at construction time, never per-request.
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored digest is not a valid PHC string: {0}")]
    MalformedDigest(String),
}
