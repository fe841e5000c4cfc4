pub mod claims;
pub mod issuer;
pub mod token;

pub use claims::Claims;
pub use issuer::TokenIssuer;
pub use token::{CachedToken, TokenState};
