use chrono::{DateTime, TimeDelta, Utc};

use crate::cache::claims::Claims;

/// A signed bearer token and the claims it was minted from.
///
/// Always replaced as a whole, never field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub bearer: String,
    pub claims: Claims,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Empty,
    Valid,
    Stale,
}

impl CachedToken {
    pub fn new(bearer: String, claims: Claims) -> Self {
        Self { bearer, claims }
    }

    /// Age is measured from the second-resolution `iat` claim; `exp` is not consulted.
    pub fn is_stale(&self, now: DateTime<Utc>, lifetime: TimeDelta) -> bool {
        now.signed_duration_since(self.claims.issued_at()) >= lifetime
    }

    pub fn state(&self, now: DateTime<Utc>, lifetime: TimeDelta) -> TokenState {
        if self.is_stale(now, lifetime) {
            TokenState::Stale
        } else {
            TokenState::Valid
        }
    }
}
