//! Authentication and authorization core of the contacts service.
//!
//! The route layer calls into [`domain::account`] (registration, login,
//! token refresh, email verification, password reset, request guarding);
//! persistence and mail delivery are reached through the ports defined
//! there. [`domain::session`] owns refresh-token rotation and revocation.

pub mod config;
pub mod domain;
pub mod outbound;

pub use domain::account;
pub use domain::session;
