use std::sync::Arc;

use auth_kit::Purpose;
use auth_kit::TokenCodec;

use crate::domain::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::Scope;
use crate::domain::account::ports::AccountRepository;

/// Per-request authorization guard.
///
/// The route layer hands it the bearer token of an incoming request and
/// gets back the caller's account, or a failure that is the same coarse
/// `Unauthenticated` no matter which check tripped. Knows nothing about
/// routes; scope requirements are the handler's to state.
pub struct AuthGuard<R>
where
    R: AccountRepository,
{
    repository: Arc<R>,
    codec: Arc<TokenCodec>,
}

impl<R> AuthGuard<R>
where
    R: AccountRepository,
{
    pub fn new(repository: Arc<R>, codec: Arc<TokenCodec>) -> Self {
        Self { repository, codec }
    }

    /// Resolve an access token to the live account behind it.
    ///
    /// # Errors
    /// * `Unauthenticated` - Decode, purpose, expiry, or lookup failed
    /// * `AccountDisabled` - Account deactivated after the token was issued
    /// * `StoreUnavailable` - Credential store operation failed
    pub async fn authenticate_request(&self, access_token: &str) -> Result<Account, AuthError> {
        let claims = self
            .codec
            .decode(access_token)
            .map_err(|_| AuthError::Unauthenticated)?;

        if claims.purpose != Purpose::Access {
            return Err(AuthError::Unauthenticated);
        }

        let id =
            AccountId::from_string(&claims.sub).map_err(|_| AuthError::Unauthenticated)?;
        let account = self
            .repository
            .find_by_id(&id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        // Deactivation takes effect immediately, not at token expiry
        if !account.is_active {
            return Err(AuthError::AccountDisabled);
        }

        Ok(account)
    }

    /// Check that the account's role covers the scope a handler requires.
    ///
    /// # Errors
    /// * `Forbidden` - Role does not cover the scope
    pub fn require_scope(&self, account: &Account, needed: Scope) -> Result<(), AuthError> {
        if account.role.covers(needed) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use auth_kit::Claims;
    use chrono::Duration;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::account::errors::StoreError;
    use crate::domain::account::models::AccountDraft;
    use crate::domain::account::models::AccountPatch;
    use crate::domain::account::models::EmailAddress;
    use crate::domain::account::models::Role;

    mock! {
        pub TestAccountRepository {}

        #[async_trait]
        impl AccountRepository for TestAccountRepository {
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, StoreError>;
            async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;
            async fn create(&self, draft: AccountDraft) -> Result<Account, StoreError>;
            async fn update_flags(&self, id: &AccountId, patch: AccountPatch) -> Result<(), StoreError>;
        }
    }

    const KEY: &[u8] = b"guard_test_key_at_least_32_bytes";

    fn account(role: Role, is_active: bool) -> Account {
        Account {
            id: AccountId::new(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            is_verified: true,
            is_active,
            role,
            created_at: Utc::now(),
        }
    }

    fn guard(repository: MockTestAccountRepository) -> AuthGuard<MockTestAccountRepository> {
        AuthGuard::new(Arc::new(repository), Arc::new(TokenCodec::new(&[KEY])))
    }

    fn token_for(id: AccountId, purpose: Purpose, ttl: Duration) -> String {
        TokenCodec::new(&[KEY])
            .issue(&Claims::issue_now(id, purpose, ttl))
            .unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_request_success() {
        let stored = account(Role::User, true);
        let stored_id = stored.id;

        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_id()
            .withf(move |id| *id == stored_id)
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let guard = guard(repository);
        let token = token_for(stored_id, Purpose::Access, Duration::minutes(15));

        let resolved = guard.authenticate_request(&token).await.unwrap();
        assert_eq!(resolved.id, stored_id);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let mut repository = MockTestAccountRepository::new();
        repository.expect_find_by_id().times(0);

        let guard = guard(repository);
        let token = token_for(AccountId::new(), Purpose::Refresh, Duration::days(14));

        let result = guard.authenticate_request(&token).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_expired_access_token() {
        let mut repository = MockTestAccountRepository::new();
        repository.expect_find_by_id().times(0);

        let guard = guard(repository);
        let token = token_for(AccountId::new(), Purpose::Access, Duration::seconds(-60));

        let result = guard.authenticate_request(&token).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_deactivated_account_is_rejected_before_expiry() {
        let stored = account(Role::User, false);
        let stored_id = stored.id;

        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let guard = guard(repository);
        let token = token_for(stored_id, Purpose::Access, Duration::minutes(15));

        let result = guard.authenticate_request(&token).await;
        assert!(matches!(result, Err(AuthError::AccountDisabled)));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_unauthenticated() {
        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let guard = guard(repository);
        let token = token_for(AccountId::new(), Purpose::Access, Duration::minutes(15));

        let result = guard.authenticate_request(&token).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_require_scope() {
        let guard = guard(MockTestAccountRepository::new());

        let admin = account(Role::Admin, true);
        let user = account(Role::User, true);

        assert!(guard.require_scope(&admin, Scope::Admin).is_ok());
        assert!(guard.require_scope(&admin, Scope::User).is_ok());
        assert!(guard.require_scope(&user, Scope::User).is_ok());
        assert!(matches!(
            guard.require_scope(&user, Scope::Admin),
            Err(AuthError::Forbidden)
        ));
    }
}
