//! Private key decoding.
//!
//! - `source` — the narrow "readable bytes with a declared length" capability
//! - `decoder` — PEM → PKCS#8 → ECDSA key, with distinct failure kinds

pub mod decoder;
pub mod source;

pub use decoder::{decode_private_key, decode_private_key_str, EcdsaPrivateKey};
pub use source::KeySource;
