use async_trait::async_trait;

use crate::domain::account::errors::AuthError;
use crate::domain::account::errors::MailerError;
use crate::domain::account::errors::StoreError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountDraft;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountPatch;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::RegisterCommand;
use crate::domain::session::models::TokenPair;

/// Port for the authentication operations the route layer calls.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account and dispatch a verification mail.
    ///
    /// No access or refresh tokens are issued at registration; the caller
    /// must verify the email and log in.
    ///
    /// # Arguments
    /// * `command` - Validated email and plaintext password
    ///
    /// # Returns
    /// Created account (unverified, active)
    ///
    /// # Errors
    /// * `EmailTaken` - Email is already registered
    /// * `StoreUnavailable` - Credential store operation failed
    /// * `HashingUnavailable` - Password hashing failed
    async fn register(&self, command: RegisterCommand) -> Result<Account, AuthError>;

    /// Mark the account referenced by a verification token as verified.
    ///
    /// Idempotent: verifying an already verified account succeeds.
    ///
    /// # Errors
    /// * `InvalidOrExpiredToken` - Token fails decode, purpose, expiry, or
    ///   references no account
    /// * `StoreUnavailable` - Credential store operation failed
    async fn verify_email(&self, token: &str) -> Result<(), AuthError>;

    /// Re-issue and mail a verification token for an unverified account.
    ///
    /// Succeeds whether or not the email is registered, so the endpoint
    /// cannot be used to probe for accounts.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Credential store operation failed
    async fn resend_verification(&self, email: &EmailAddress) -> Result<(), AuthError>;

    /// Verify credentials and begin a refresh session.
    ///
    /// # Returns
    /// Access/refresh token pair at sequence 0
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, uniformly
    /// * `AccountNotVerified` - Email not yet verified
    /// * `AccountDisabled` - Account deactivated
    /// * `StoreUnavailable` - Credential store operation failed
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<TokenPair, AuthError>;

    /// Revoke the refresh session referenced by the token.
    ///
    /// Always succeeds from the caller's perspective; malformed, expired,
    /// and already revoked tokens are tolerated.
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Rotate a refresh token into the next access/refresh pair.
    ///
    /// # Errors
    /// * `TokenMalformed` / `TokenExpired` - Token fails decode or expiry
    /// * `SessionRevoked` - Chain revoked or unknown
    /// * `ReplayDetected` - Superseded token presented; chain now revoked
    /// * `StoreUnavailable` - Session store operation failed
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Issue and mail a password-reset token if the account exists.
    ///
    /// Succeeds either way; the response carries no enumeration signal and
    /// the token is computed on both paths to keep latency uniform.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Credential store operation failed
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), AuthError>;

    /// Set a new password using a reset token, then revoke every refresh
    /// session of the account, forcing re-login everywhere.
    ///
    /// Reset tokens are single-use: they are bound to the password hash
    /// they were issued against.
    ///
    /// # Errors
    /// * `InvalidOrExpiredToken` - Token fails decode, purpose, expiry,
    ///   binding, or references no account
    /// * `HashingUnavailable` - Password hashing failed
    /// * `StoreUnavailable` - Credential store operation failed
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError>;
}

/// Persistence port over the external user repository (credential store).
///
/// Plain lookup/update contracts only; all policy lives in the service.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Retrieve account by case-normalized email.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, StoreError>;

    /// Retrieve account by identifier.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;

    /// Persist a new account.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Unavailable` - Store operation failed
    async fn create(&self, draft: AccountDraft) -> Result<Account, StoreError>;

    /// Apply a partial update to verification/active flags or the
    /// password hash.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed or account missing
    async fn update_flags(&self, id: &AccountId, patch: AccountPatch) -> Result<(), StoreError>;
}

/// What a delivered token is for; the mail collaborator picks the
/// template and link from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    VerifyEmail,
    ResetPassword,
}

/// Port for the external mail collaborator.
///
/// Fire-and-forget from this core's perspective: send failures are logged
/// by the service and never block or fail the surrounding operation.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Deliver a verification or reset token to the address.
    ///
    /// # Errors
    /// * `SendFailed` - Delivery could not be handed off
    async fn send(
        &self,
        email: &EmailAddress,
        token: &str,
        kind: MailKind,
    ) -> Result<(), MailerError>;
}
