use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;

use crate::domain::account::models::AccountId;
use crate::domain::session::errors::SessionStoreError;
use crate::domain::session::models::AdvanceOutcome;
use crate::domain::session::models::RefreshSession;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionStore;

/// Single-node refresh-session store.
///
/// One mutex over the session map makes `advance` the compare-and-swap
/// the port requires: the lock is held only for the map operation, never
/// across an await. Revocation deletes the record, so the map is bounded
/// by live sessions; a missing chain reads as `NotFound`, which rotation
/// treats as revoked.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, RefreshSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, RefreshSession>>, SessionStoreError> {
        self.sessions
            .lock()
            .map_err(|_| SessionStoreError::Unavailable("session map mutex poisoned".to_string()))
    }

    /// Number of live (not yet revoked) sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: RefreshSession) -> Result<(), SessionStoreError> {
        self.lock()?.insert(session.id, session);
        Ok(())
    }

    async fn advance(
        &self,
        id: &SessionId,
        expected_seq: u64,
    ) -> Result<AdvanceOutcome, SessionStoreError> {
        let mut sessions = self.lock()?;

        let Some(session) = sessions.get_mut(id) else {
            return Ok(AdvanceOutcome::NotFound);
        };

        if session.revoked {
            return Ok(AdvanceOutcome::Revoked);
        }
        if session.seq != expected_seq {
            return Ok(AdvanceOutcome::SeqMismatch);
        }

        session.seq += 1;
        Ok(AdvanceOutcome::Advanced(session.seq))
    }

    async fn revoke(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.lock()?.remove(id);
        Ok(())
    }

    async fn revoke_all_for(&self, account_id: &AccountId) -> Result<(), SessionStoreError> {
        self.lock()?
            .retain(|_, session| session.account_id != *account_id);
        Ok(())
    }
}
