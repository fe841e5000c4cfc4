use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, Header};
use tracing::{debug, trace};

use crate::cache::claims::Claims;
use crate::cache::token::{CachedToken, TokenState};
use crate::config::settings::IssuerConfig;
use crate::errors::{ConfigError, TokenError};
use crate::helpers::time;
use crate::key::decode_private_key_str;
use crate::observability::metrics::IssuerMetrics;

/// Issues ES256 bearer tokens and reuses them until `lifetime` has passed.
///
/// Nothing is decoded or signed until the first [`TokenIssuer::bearer_token`]
/// call. The staleness check and the replacement of the cached token happen
/// under one lock, so concurrent callers never see a token paired with the
/// wrong claims.
pub struct TokenIssuer {
    config: IssuerConfig,
    lifetime: TimeDelta,
    cache: Mutex<Option<CachedToken>>,
    metrics: Option<Arc<IssuerMetrics>>,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(config: impl Into<Option<IssuerConfig>>) -> Result<Self, TokenError> {
        let config = config.into().ok_or(ConfigError::Missing)?;
        if config.lifetime.is_zero() {
            return Err(ConfigError::ZeroLifetime.into());
        }
        let lifetime =
            TimeDelta::from_std(config.lifetime).map_err(|_| ConfigError::LifetimeOutOfRange)?;

        Ok(Self {
            config,
            lifetime,
            cache: Mutex::new(None),
            metrics: None,
        })
    }

    pub fn with_metrics(
        config: impl Into<Option<IssuerConfig>>,
        metrics: Arc<IssuerMetrics>,
    ) -> Result<Self, TokenError> {
        let mut issuer = Self::new(config)?;
        issuer.metrics = Some(metrics);
        Ok(issuer)
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Returns the cached token, minting a new one first when there is none
    /// or it has outlived `lifetime`.
    ///
    /// On failure the cache is left as it was, so the next call retries.
    pub fn bearer_token(&self) -> Result<String, TokenError> {
        let mut cache = self.lock();
        let now = time::now();

        if let Some(cached) = cache.as_ref() {
            if !cached.is_stale(now, self.lifetime) {
                trace!(kid = %self.config.key_id, "serving cached bearer token");
                if let Some(metrics) = &self.metrics {
                    metrics.cache_hits.inc();
                }
                return Ok(cached.bearer.clone());
            }
            debug!(kid = %self.config.key_id, iat = cached.claims.iat, "cached bearer token is stale");
        }

        let fresh = self.mint(now).inspect_err(|e| {
            if let Some(metrics) = &self.metrics {
                metrics.record_failure(e.kind());
            }
        })?;
        let bearer = fresh.bearer.clone();
        *cache = Some(fresh);
        Ok(bearer)
    }

    pub fn state(&self) -> TokenState {
        match self.lock().as_ref() {
            Some(cached) => cached.state(time::now(), self.lifetime),
            None => TokenState::Empty,
        }
    }

    /// Copy of the cached token and its claims, taken under the lock.
    pub fn snapshot(&self) -> Option<CachedToken> {
        self.lock().clone()
    }

    pub fn claims(&self) -> Option<Claims> {
        self.lock().as_ref().map(|cached| cached.claims.clone())
    }

    fn mint(&self, now: DateTime<Utc>) -> Result<CachedToken, TokenError> {
        let started = Instant::now();
        let key = decode_private_key_str(&self.config.private_key_material)?;

        let claims = Claims::new(&self.config, self.lifetime, now);
        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.config.key_id.to_owned());

        let bearer = jsonwebtoken::encode(&header, &claims, &key.encoding_key())
            .map_err(TokenError::Signing)?;

        debug!(
            kid = %self.config.key_id,
            iat = claims.iat,
            exp = claims.exp,
            "minted new bearer token"
        );
        if let Some(metrics) = &self.metrics {
            metrics.tokens_minted.inc();
            metrics.token_expiry_unix.set(claims.exp);
            metrics.mint_duration.observe(started.elapsed().as_secs_f64());
        }

        Ok(CachedToken::new(bearer, claims))
    }

    // The guarded value is only ever replaced by a single assignment, so a
    // poisoned lock still holds a consistent pair.
    fn lock(&self) -> MutexGuard<'_, Option<CachedToken>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
