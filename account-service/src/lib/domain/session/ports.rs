use async_trait::async_trait;

use crate::domain::account::models::AccountId;
use crate::domain::session::errors::SessionStoreError;
use crate::domain::session::models::AdvanceOutcome;
use crate::domain::session::models::RefreshSession;
use crate::domain::session::models::SessionId;

/// Persistence port for refresh rotation chains.
///
/// This is the only shared mutable state in the core. `advance` must be a
/// single compare-and-swap on (seq, revoked): when two rotations race on
/// the same chain, exactly one observes `Advanced` and the other
/// `SeqMismatch`. Implementations back this with a transactional update
/// (or a mutex for the in-process store); callers never hold locks across
/// these calls.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist a freshly begun chain.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn insert(&self, session: RefreshSession) -> Result<(), SessionStoreError>;

    /// Atomically compare the stored sequence against `expected_seq` and,
    /// on a match with an unrevoked chain, increment it.
    ///
    /// # Returns
    /// The outcome of the compare-and-swap; mismatch, revocation, and
    /// absence are outcomes the caller must interpret, not infrastructure
    /// failures.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn advance(
        &self,
        id: &SessionId,
        expected_seq: u64,
    ) -> Result<AdvanceOutcome, SessionStoreError>;

    /// Terminate the chain. Idempotent; revoking an unknown or already
    /// revoked chain succeeds. Implementations may drop the record
    /// outright, since `advance` reports a missing chain as `NotFound`
    /// and callers treat that as revoked.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn revoke(&self, id: &SessionId) -> Result<(), SessionStoreError>;

    /// Terminate every chain belonging to the account.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn revoke_all_for(&self, account_id: &AccountId) -> Result<(), SessionStoreError>;
}
