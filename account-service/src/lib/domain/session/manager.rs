use std::sync::Arc;

use auth_kit::Claims;
use auth_kit::Purpose;
use auth_kit::TokenCodec;
use auth_kit::TokenError;
use chrono::Duration;

use crate::domain::account::models::AccountId;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::AdvanceOutcome;
use crate::domain::session::models::RefreshSession;
use crate::domain::session::models::SessionId;
use crate::domain::session::models::TokenPair;
use crate::domain::session::ports::SessionStore;

/// Refresh-token lifecycle manager.
///
/// Owns the rotation state machine: a chain advances one sequence number
/// per refresh, and any presentation of a superseded token revokes the
/// whole chain. Token signing/verification is delegated to the codec;
/// chain state lives behind the [`SessionStore`] port.
pub struct SessionManager<S>
where
    S: SessionStore,
{
    store: Arc<S>,
    codec: Arc<TokenCodec>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl<S> SessionManager<S>
where
    S: SessionStore,
{
    /// Create a manager with injected store and codec.
    ///
    /// # Arguments
    /// * `store` - Chain persistence implementation
    /// * `codec` - Token signing/verification
    /// * `access_ttl` - Lifetime of issued access tokens (minutes-scale)
    /// * `refresh_ttl` - Lifetime of issued refresh tokens (days-scale)
    pub fn new(
        store: Arc<S>,
        codec: Arc<TokenCodec>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            store,
            codec,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Start a new rotation chain for a login and issue its first pair.
    ///
    /// # Returns
    /// The token pair at sequence 0 and the new chain's id
    ///
    /// # Errors
    /// * `Store` - Chain could not be persisted
    /// * `Signing` - Token signing failed
    pub async fn begin_session(
        &self,
        account_id: &AccountId,
    ) -> Result<(TokenPair, SessionId), SessionError> {
        let session = RefreshSession::begin(*account_id);
        let session_id = session.id;

        self.store.insert(session).await?;

        let pair = self.issue_pair(&account_id.to_string(), &session_id, 0)?;
        Ok((pair, session_id))
    }

    /// Consume a refresh token and produce the next pair in its chain.
    ///
    /// Exactly one of two concurrent calls with the same token wins; the
    /// loser observes a sequence mismatch, which revokes the chain.
    ///
    /// # Errors
    /// * `Malformed` - Not a verifiable refresh token with chain fields
    /// * `Expired` - Token past its expiry
    /// * `Revoked` - Chain already revoked or unknown
    /// * `Replay` - Token superseded; chain revoked in response
    pub async fn rotate(&self, refresh_token: &str) -> Result<TokenPair, SessionError> {
        let claims = self.codec.decode(refresh_token).map_err(|e| match e {
            TokenError::Expired => SessionError::Expired,
            _ => SessionError::Malformed,
        })?;

        if claims.purpose != Purpose::Refresh {
            return Err(SessionError::Malformed);
        }

        let session_id = claims
            .sid
            .as_deref()
            .and_then(|s| SessionId::from_string(s).ok())
            .ok_or(SessionError::Malformed)?;
        let seq = claims.seq.ok_or(SessionError::Malformed)?;

        match self.store.advance(&session_id, seq).await? {
            AdvanceOutcome::Advanced(next_seq) => self.issue_pair(&claims.sub, &session_id, next_seq),
            AdvanceOutcome::Revoked | AdvanceOutcome::NotFound => Err(SessionError::Revoked),
            AdvanceOutcome::SeqMismatch => {
                // Potential compromise: someone presented a superseded token
                tracing::warn!(
                    session_id = %session_id,
                    presented_seq = seq,
                    "refresh token replay detected, revoking session"
                );
                self.store.revoke(&session_id).await?;
                Err(SessionError::Replay)
            }
        }
    }

    /// Revoke a chain. Idempotent.
    ///
    /// # Errors
    /// * `Store` - Store operation failed
    pub async fn revoke(&self, session_id: &SessionId) -> Result<(), SessionError> {
        self.store.revoke(session_id).await?;
        Ok(())
    }

    /// Revoke every chain for an account (password reset fallout).
    ///
    /// # Errors
    /// * `Store` - Store operation failed
    pub async fn revoke_all_for(&self, account_id: &AccountId) -> Result<(), SessionError> {
        self.store.revoke_all_for(account_id).await?;
        Ok(())
    }

    fn issue_pair(
        &self,
        subject: &str,
        session_id: &SessionId,
        seq: u64,
    ) -> Result<TokenPair, SessionError> {
        let access = Claims::issue_now(subject, Purpose::Access, self.access_ttl)
            .with_session(session_id, seq);
        let refresh = Claims::issue_now(subject, Purpose::Refresh, self.refresh_ttl)
            .with_session(session_id, seq);

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, SessionError> {
        self.codec
            .issue(claims)
            .map_err(|e| SessionError::Signing(e.to_string()))
    }
}
