use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::config::settings::IssuerConfig;

/// Registered claims carried in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub aud: String,
    /// UNIX seconds
    pub iat: i64,
    /// UNIX seconds, for the verifier only
    pub exp: i64,
}

impl Claims {
    pub fn new(config: &IssuerConfig, lifetime: TimeDelta, now: DateTime<Utc>) -> Self {
        let expires_at = now
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            iss: config.issuer.to_owned(),
            aud: config.audience.to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
