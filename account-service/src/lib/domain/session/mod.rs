pub mod errors;
pub mod manager;
pub mod models;
pub mod ports;

pub use errors::SessionError;
pub use manager::SessionManager;
pub use models::RefreshSession;
pub use models::SessionId;
pub use models::TokenPair;
pub use ports::SessionStore;
