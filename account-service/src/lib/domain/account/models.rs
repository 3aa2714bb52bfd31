use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::errors::AccountIdError;
use crate::domain::account::errors::EmailError;

/// Account aggregate entity.
///
/// The identity record the core authenticates against. Owned by the
/// external credential store; this core reads it and requests flag or
/// password-hash updates through [`AccountPatch`].
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates format using an RFC 5322 compliant parser and lowercases on
/// construction, so lookups and the uniqueness constraint are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, case-normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email.to_lowercase()))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Permission role attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Whether this role covers the given scope.
    pub fn covers(&self, scope: Scope) -> bool {
        match self {
            Role::Admin => true,
            Role::User => scope == Scope::User,
        }
    }
}

/// Scope a route handler can require before serving a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    User,
    Admin,
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Plain text password (hashed by the service, never stored)
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

/// New-account record handed to the credential store.
#[derive(Debug)]
pub struct AccountDraft {
    pub email: EmailAddress,
    pub password_hash: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub role: Role,
}

/// Partial update to an account's mutable authentication fields.
///
/// Only provided fields are changed.
#[derive(Debug, Default)]
pub struct AccountPatch {
    pub is_verified: Option<bool>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

impl AccountPatch {
    /// Patch marking the account's email as verified.
    pub fn verified() -> Self {
        Self {
            is_verified: Some(true),
            ..Self::default()
        }
    }

    /// Patch replacing the stored password hash.
    pub fn new_password_hash(hash: String) -> Self {
        Self {
            password_hash: Some(hash),
            ..Self::default()
        }
    }
}
