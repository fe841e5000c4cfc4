//! Unverified peeking into compact tokens, for logging and diagnostics.

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::Header;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::cache::claims::Claims;

/// Split a compact token into its three segments.
pub fn segments(token: &str) -> Result<[&str; 3]> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(p), Some(s), None) => Ok([h, p, s]),
        _ => Err(anyhow!("token must have exactly three segments")),
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T> {
    let raw = URL_SAFE_NO_PAD
        .decode(segment)
        .context("segment is not base64url")?;
    serde_json::from_slice(&raw).context("segment is not valid JSON")
}

pub fn peek_header(token: &str) -> Result<Header> {
    let [header, _, _] = segments(token)?;
    decode_segment(header)
}

pub fn peek_claims(token: &str) -> Result<Claims> {
    let [_, payload, _] = segments(token)?;
    decode_segment(payload)
}

/// Log the `kid` header and the claims of an issued token.
pub fn log_token(token: &str) -> Result<()> {
    let header = peek_header(token)?;
    let claims = peek_claims(token)?;
    info!(
        kid = header.kid.as_deref().unwrap_or_default(),
        iss = %claims.iss,
        aud = %claims.aud,
        iat = claims.iat,
        exp = claims.exp,
        "issued bearer token"
    );
    Ok(())
}
