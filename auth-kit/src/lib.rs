//! Authentication primitives library
//!
//! Storage-free building blocks for credential and token handling:
//! - Password hashing (Argon2id, configurable work factor)
//! - Purpose-tagged signed tokens with multi-key verification
//!
//! Services own the orchestration (who may log in, when sessions die);
//! this crate only answers "does this password match" and "is this token
//! authentic, unexpired, and what does it claim".
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth_kit::{PasswordHasher, PasswordParams};
//!
//! let hasher = PasswordHasher::new(PasswordParams::default()).unwrap();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest).unwrap());
//! ```
//!
//! ## Signed Tokens
//! ```
//! use chrono::Duration;
//! use auth_kit::{Claims, Purpose, TokenCodec};
//!
//! let codec = TokenCodec::new(&[b"signing_key_at_least_32_bytes_long!"]);
//! let claims = Claims::issue_now("account-1", Purpose::Access, Duration::minutes(15));
//! let token = codec.issue(&claims).unwrap();
//! let decoded = codec.decode(&token).unwrap();
//! assert_eq!(decoded.purpose, Purpose::Access);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordParams;
pub use token::Claims;
pub use token::Purpose;
pub use token::TokenCodec;
pub use token::TokenError;
