pub mod errors;
pub mod guard;
pub mod models;
pub mod ports;
pub mod service;

pub use errors::AuthError;
pub use guard::AuthGuard;
pub use models::Account;
pub use models::AccountId;
pub use models::EmailAddress;
pub use models::Role;
pub use models::Scope;
pub use ports::AccountRepository;
pub use ports::AuthServicePort;
pub use ports::MailKind;
pub use ports::Mailer;
pub use service::AuthService;
pub use service::TokenTtls;
