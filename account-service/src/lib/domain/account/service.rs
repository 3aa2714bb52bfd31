use std::sync::Arc;

use async_trait::async_trait;
use auth_kit::Claims;
use auth_kit::PasswordHasher;
use auth_kit::Purpose;
use auth_kit::TokenCodec;
use chrono::Duration;
use uuid::Uuid;

use crate::config::TokenConfig;
use crate::domain::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountDraft;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountPatch;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::Role;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AuthServicePort;
use crate::domain::account::ports::MailKind;
use crate::domain::account::ports::Mailer;
use crate::domain::session::manager::SessionManager;
use crate::domain::session::models::SessionId;
use crate::domain::session::models::TokenPair;
use crate::domain::session::ports::SessionStore;

/// Claim binding a reset token to the password hash it was issued against.
const PWF_CLAIM: &str = "pwf";

/// Token lifetimes, access ≪ refresh.
#[derive(Debug, Clone, Copy)]
pub struct TokenTtls {
    pub access: Duration,
    pub refresh: Duration,
    pub verify: Duration,
    pub reset: Duration,
}

impl TokenTtls {
    pub fn from_config(config: &TokenConfig) -> Self {
        Self {
            access: Duration::seconds(config.access_ttl_secs),
            refresh: Duration::seconds(config.refresh_ttl_secs),
            verify: Duration::seconds(config.verify_ttl_secs),
            reset: Duration::seconds(config.reset_ttl_secs),
        }
    }
}

/// Authentication service implementation.
///
/// Orchestrates the hasher, codec, session manager, credential store, and
/// mail collaborator behind [`AuthServicePort`]. Holds no mutable state of
/// its own; everything shared lives behind the injected ports.
pub struct AuthService<R, S, M>
where
    R: AccountRepository,
    S: SessionStore,
    M: Mailer,
{
    repository: Arc<R>,
    sessions: SessionManager<S>,
    mailer: Arc<M>,
    hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
    ttls: TokenTtls,
    /// Digest verified against on the unknown-email login path, so a miss
    /// costs the same hashing work as a password mismatch.
    dummy_digest: String,
}

impl<R, S, M> AuthService<R, S, M>
where
    R: AccountRepository,
    S: SessionStore,
    M: Mailer,
{
    /// Create an authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - External credential store adapter
    /// * `session_store` - Refresh-session persistence
    /// * `mailer` - Verification/reset mail collaborator
    /// * `codec` - Token codec built from the configured signing keys
    /// * `hasher` - Password hasher built from the configured work factor
    /// * `ttls` - Token lifetimes
    ///
    /// # Errors
    /// * `HashingUnavailable` - The hasher failed its startup self-check
    pub fn new(
        repository: Arc<R>,
        session_store: Arc<S>,
        mailer: Arc<M>,
        codec: Arc<TokenCodec>,
        hasher: PasswordHasher,
        ttls: TokenTtls,
    ) -> Result<Self, AuthError> {
        // One hash at startup: proves the work factor is usable and gives
        // the uniform-latency login path a digest to verify against
        let dummy_digest = hasher.hash(&Uuid::new_v4().to_string())?;

        Ok(Self {
            repository,
            sessions: SessionManager::new(session_store, Arc::clone(&codec), ttls.access, ttls.refresh),
            mailer,
            hasher,
            codec,
            ttls,
            dummy_digest,
        })
    }

    fn issue_verify_token(&self, account_id: &AccountId) -> Result<String, AuthError> {
        let claims = Claims::issue_now(account_id, Purpose::VerifyEmail, self.ttls.verify);
        Ok(self.codec.issue(&claims)?)
    }

    fn issue_reset_token(&self, account_id: &AccountId, digest: &str) -> Result<String, AuthError> {
        let claims = Claims::issue_now(account_id, Purpose::ResetPassword, self.ttls.reset)
            .with_extra(PWF_CLAIM, hash_fingerprint(digest));
        Ok(self.codec.issue(&claims)?)
    }

    async fn dispatch_mail(&self, email: &EmailAddress, token: &str, kind: MailKind) {
        if let Err(e) = self.mailer.send(email, token, kind).await {
            tracing::error!(kind = ?kind, "failed to dispatch mail: {}", e);
        }
    }
}

/// Short stable fingerprint of a PHC digest.
///
/// PHC strings are ASCII and end in the base64 hash, unique per salt, so
/// the tail identifies one digest without revealing usable material.
fn hash_fingerprint(digest: &str) -> String {
    digest[digest.len().saturating_sub(16)..].to_string()
}

#[async_trait]
impl<R, S, M> AuthServicePort for AuthService<R, S, M>
where
    R: AccountRepository,
    S: SessionStore,
    M: Mailer,
{
    async fn register(&self, command: RegisterCommand) -> Result<Account, AuthError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hasher.hash(&command.password)?;

        // A concurrent register can still trip the store's unique
        // constraint here; From<StoreError> folds that into EmailTaken
        let account = self
            .repository
            .create(AccountDraft {
                email: command.email,
                password_hash,
                is_verified: false,
                is_active: true,
                role: Role::User,
            })
            .await?;

        let token = self.issue_verify_token(&account.id)?;
        self.dispatch_mail(&account.email, &token, MailKind::VerifyEmail)
            .await;

        Ok(account)
    }

    async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        let claims = self
            .codec
            .decode(token)
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;

        if claims.purpose != Purpose::VerifyEmail {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let id = AccountId::from_string(&claims.sub)
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;
        let account = self
            .repository
            .find_by_id(&id)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        // Verifying twice is a no-op success
        if account.is_verified {
            return Ok(());
        }

        self.repository
            .update_flags(&id, AccountPatch::verified())
            .await?;

        Ok(())
    }

    async fn resend_verification(&self, email: &EmailAddress) -> Result<(), AuthError> {
        let Some(account) = self.repository.find_by_email(email).await? else {
            return Ok(());
        };
        if account.is_verified {
            return Ok(());
        }

        let token = self.issue_verify_token(&account.id)?;
        self.dispatch_mail(&account.email, &token, MailKind::VerifyEmail)
            .await;

        Ok(())
    }

    async fn login(&self, email: &EmailAddress, password: &str) -> Result<TokenPair, AuthError> {
        let account = match self.repository.find_by_email(email).await? {
            Some(account) => account,
            None => {
                let _ = self.hasher.verify(password, &self.dummy_digest);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        if !account.is_verified {
            return Err(AuthError::AccountNotVerified);
        }
        if !account.is_active {
            return Err(AuthError::AccountDisabled);
        }

        let (pair, _session_id) = self.sessions.begin_session(&account.id).await?;
        Ok(pair)
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let claims = match self.codec.decode(refresh_token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("logout with undecodable token: {}", e);
                return Ok(());
            }
        };

        if claims.purpose != Purpose::Refresh {
            return Ok(());
        }

        if let Some(session_id) = claims
            .sid
            .as_deref()
            .and_then(|s| SessionId::from_string(s).ok())
        {
            self.sessions.revoke(&session_id).await?;
        }

        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        Ok(self.sessions.rotate(refresh_token).await?)
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), AuthError> {
        match self.repository.find_by_email(email).await? {
            Some(account) => {
                let token = self.issue_reset_token(&account.id, &account.password_hash)?;
                self.dispatch_mail(&account.email, &token, MailKind::ResetPassword)
                    .await;
            }
            None => {
                // Equivalent-latency no-op: same token work, nothing sent
                let _ = self.issue_reset_token(&AccountId::new(), &self.dummy_digest)?;
            }
        }

        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let claims = self
            .codec
            .decode(token)
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;

        if claims.purpose != Purpose::ResetPassword {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let id = AccountId::from_string(&claims.sub)
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;
        let account = self
            .repository
            .find_by_id(&id)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        // Single-use: the token is bound to the hash it was issued
        // against, so the first successful reset invalidates it
        let bound_to = hash_fingerprint(&account.password_hash);
        if claims.extra_str(PWF_CLAIM) != Some(bound_to.as_str()) {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let new_hash = self.hasher.hash(new_password)?;
        self.repository
            .update_flags(&id, AccountPatch::new_password_hash(new_hash))
            .await?;

        // Every refresh chain dies with the old password
        self.sessions.revoke_all_for(&id).await?;

        Ok(())
    }
}
