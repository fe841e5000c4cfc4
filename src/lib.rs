//! # JWT Token Agent Library
//!
//! Issues short-lived ES256 bearer tokens (JWT) for APIs that demand signed,
//! claims-based credentials, and caches each token until its lifetime runs out.
//!
//! Modules:
//! - `key` — PEM / PKCS#8 / ECDSA private key decoding
//! - `cache` — token issuer with lazy, lock-guarded regeneration
//! - `config` — issuer configuration and the YAML service contract
//! - `sinks` — atomic propagation of the current token into a file
//! - `observability` — prometheus metrics for the issuer

pub mod cache;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod key;
pub mod observability;
pub mod sinks;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::cache::{Claims, TokenIssuer, TokenState};
pub use crate::config::settings::IssuerConfig;
pub use crate::errors::{ConfigError, TokenError, TokenErrorKind};
