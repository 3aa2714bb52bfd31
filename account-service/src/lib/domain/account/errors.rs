use thiserror::Error;

use auth_kit::PasswordError;
use auth_kit::TokenError;

use crate::domain::session::errors::SessionError;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for credential store operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    /// Unique-email constraint tripped on create; the race-window twin of
    /// the service's up-front duplicate check.
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),
}

/// Error for mail dispatch operations
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Mail dispatch failed: {0}")]
    SendFailed(String),
}

/// Top-level error for all authentication and authorization operations.
///
/// Credential and token failures are deliberately coarse: the route layer
/// sees only the kind, never which field or check failed. Infrastructure
/// variants carry detail for logs and are surfaced to clients as a generic
/// server error, eligible for retry with backoff.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(#[from] AccountIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    // Credential errors: uniform whether the email is unknown or the
    // password mismatches, so login reveals nothing either way
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account email is not verified")]
    AccountNotVerified,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Email is already registered")]
    EmailTaken,

    // Token errors
    #[error("Token cannot be parsed or verified")]
    TokenMalformed,

    #[error("Token is expired")]
    TokenExpired,

    /// Coarse failure for the verification/reset flows, where even the
    /// malformed/expired distinction stays internal.
    #[error("Token is invalid or expired")]
    InvalidOrExpiredToken,

    // Session errors
    #[error("Session is revoked")]
    SessionRevoked,

    #[error("Refresh token replay detected")]
    ReplayDetected,

    // Guard errors
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Forbidden")]
    Forbidden,

    // Infrastructure errors
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Password hashing unavailable: {0}")]
    HashingUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(detail) => AuthError::StoreUnavailable(detail),
            StoreError::DuplicateEmail(_) => AuthError::EmailTaken,
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::HashingUnavailable(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed(_) => AuthError::TokenMalformed,
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::SigningFailed(detail) => AuthError::Internal(detail),
        }
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Malformed => AuthError::TokenMalformed,
            SessionError::Expired => AuthError::TokenExpired,
            SessionError::Revoked => AuthError::SessionRevoked,
            SessionError::Replay => AuthError::ReplayDetected,
            SessionError::Signing(detail) => AuthError::Internal(detail),
            SessionError::Store(e) => AuthError::StoreUnavailable(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Internal(err.to_string())
    }
}
