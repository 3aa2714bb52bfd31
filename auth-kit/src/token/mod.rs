pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::Claims;
pub use claims::Purpose;
pub use codec::TokenCodec;
pub use errors::TokenError;
