use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use tracing::info;

use crate::errors::TokenErrorKind;

/// Issuer metrics, each instance with its own registry.
#[derive(Clone)]
pub struct IssuerMetrics {
    pub registry: Registry,

    pub tokens_minted: IntCounter,
    pub cache_hits: IntCounter,
    pub mint_failures: IntCounterVec,
    pub token_expiry_unix: IntGauge,
    pub mint_duration: Histogram,
}

impl IssuerMetrics {
    pub fn new() -> prometheus::Result<Self> {
        info!("Initializing Metrics ...");
        let registry = Registry::new_custom(Some("jwtagent".into()), None)?;

        let metrics = Self {
            tokens_minted: IntCounter::new("tokens_minted_total", "Tokens signed and cached")?,
            cache_hits: IntCounter::new("token_cache_hits_total", "Requests served from the cached token")?,
            mint_failures: IntCounterVec::new(Opts::new("token_mint_failures_total", "Mint failures by reason"), &["reason"])?,
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "exp claim of the cached token")?,
            mint_duration: Histogram::with_opts(HistogramOpts::new("token_mint_duration_seconds", "Key decode and signing time").buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1]))?,

            registry,
        };

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.tokens_minted.clone()))?;
        reg.register(Box::new(metrics.cache_hits.clone()))?;
        reg.register(Box::new(metrics.mint_failures.clone()))?;
        reg.register(Box::new(metrics.token_expiry_unix.clone()))?;
        reg.register(Box::new(metrics.mint_duration.clone()))?;

        Ok(metrics)
    }

    pub fn record_failure(&self, kind: TokenErrorKind) {
        self.mint_failures.with_label_values(&[kind.as_str()]).inc();
    }

    /// Text exposition format of everything in the registry.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
