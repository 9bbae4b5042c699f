pub mod codec;
pub mod errors;

pub use codec::IssuedToken;
pub use codec::TokenCodec;
pub use errors::TokenError;
