use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth_kit::PasswordHasher;
use auth_kit::PasswordParams;
use auth_kit::TokenCodec;
use chrono::Duration;
use chrono::Utc;

use account_service::domain::account::errors::MailerError;
use account_service::domain::account::errors::StoreError;
use account_service::domain::account::models::Account;
use account_service::domain::account::models::AccountDraft;
use account_service::domain::account::models::AccountId;
use account_service::domain::account::models::AccountPatch;
use account_service::domain::account::models::EmailAddress;
use account_service::domain::account::models::RegisterCommand;
use account_service::domain::account::ports::AccountRepository;
use account_service::domain::account::ports::AuthServicePort;
use account_service::domain::account::ports::MailKind;
use account_service::domain::account::ports::Mailer;
use account_service::domain::account::AuthGuard;
use account_service::domain::account::AuthService;
use account_service::domain::account::TokenTtls;
use account_service::outbound::InMemorySessionStore;

const TEST_SIGNING_KEY: &[u8] = b"integration_test_key_32_bytes_!!";

/// In-memory credential store standing in for the external user repository.
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
        }
    }

    /// Flip the active flag directly, as an admin action would.
    pub fn set_active(&self, id: &AccountId, is_active: bool) {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(id) {
            account.is_active = is_active;
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(id).cloned())
    }

    async fn create(&self, draft: AccountDraft) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email == draft.email) {
            return Err(StoreError::DuplicateEmail(draft.email.to_string()));
        }

        let account = Account {
            id: AccountId::new(),
            email: draft.email,
            password_hash: draft.password_hash,
            is_verified: draft.is_verified,
            is_active: draft.is_active,
            role: draft.role,
            created_at: Utc::now(),
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_flags(&self, id: &AccountId, patch: AccountPatch) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| StoreError::Unavailable(format!("no account {id}")))?;

        if let Some(is_verified) = patch.is_verified {
            account.is_verified = is_verified;
        }
        if let Some(is_active) = patch.is_active {
            account.is_active = is_active;
        }
        if let Some(password_hash) = patch.password_hash {
            account.password_hash = password_hash;
        }
        Ok(())
    }
}

/// Mailer fake that records every dispatched token.
pub struct RecordingMailer {
    sent: Mutex<Vec<(EmailAddress, String, MailKind)>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// The most recently dispatched token of the given kind.
    pub fn last_token(&self, kind: MailKind) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(_, _, k)| *k == kind)
            .map(|(_, token, _)| token.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        email: &EmailAddress,
        token: &str,
        kind: MailKind,
    ) -> Result<(), MailerError> {
        self.sent
            .lock()
            .unwrap()
            .push((email.clone(), token.to_string(), kind));
        Ok(())
    }
}

/// Fully wired core with in-memory collaborators.
pub struct TestAuth {
    pub service:
        AuthService<InMemoryAccountRepository, InMemorySessionStore, RecordingMailer>,
    pub guard: AuthGuard<InMemoryAccountRepository>,
    pub repository: Arc<InMemoryAccountRepository>,
    pub mailer: Arc<RecordingMailer>,
    pub codec: Arc<TokenCodec>,
}

impl TestAuth {
    pub fn new() -> Self {
        Self::with_ttls(TokenTtls {
            access: Duration::minutes(15),
            refresh: Duration::days(14),
            verify: Duration::hours(24),
            reset: Duration::hours(1),
        })
    }

    pub fn with_ttls(ttls: TokenTtls) -> Self {
        let repository = Arc::new(InMemoryAccountRepository::new());
        let mailer = Arc::new(RecordingMailer::new());
        let codec = Arc::new(TokenCodec::new(&[TEST_SIGNING_KEY]));

        // Minimum argon2 cost to keep the suite fast
        let hasher = PasswordHasher::new(PasswordParams {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .expect("hasher params rejected");

        let service = AuthService::new(
            Arc::clone(&repository),
            Arc::new(InMemorySessionStore::new()),
            Arc::clone(&mailer),
            Arc::clone(&codec),
            hasher,
            ttls,
        )
        .expect("service construction failed");

        let guard = AuthGuard::new(Arc::clone(&repository), Arc::clone(&codec));

        Self {
            service,
            guard,
            repository,
            mailer,
            codec,
        }
    }

    pub fn email(s: &str) -> EmailAddress {
        EmailAddress::new(s.to_string()).expect("invalid test email")
    }

    /// Register and walk the verification mail, leaving a login-ready account.
    pub async fn register_verified(&self, email: &str, password: &str) -> Account {
        let account = self
            .service
            .register(RegisterCommand::new(
                Self::email(email),
                password.to_string(),
            ))
            .await
            .expect("register failed");

        let token = self
            .mailer
            .last_token(MailKind::VerifyEmail)
            .expect("no verification mail recorded");
        self.service
            .verify_email(&token)
            .await
            .expect("verify_email failed");

        account
    }
}
