use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// ================================
/// Issuer configuration (core)
/// ================================
///
/// Immutable once handed to a [`crate::cache::TokenIssuer`].
#[derive(Clone)]
pub struct IssuerConfig {
    /// `iss` claim
    pub issuer: String,
    /// `kid` header
    pub key_id: String,
    /// how long a minted token is reused before regeneration
    pub lifetime: Duration,
    /// `aud` claim
    pub audience: String,
    /// PEM container with a PKCS#8 ECDSA private key
    pub private_key_material: String,
}

impl fmt::Debug for IssuerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerConfig")
            .field("issuer", &self.issuer)
            .field("key_id", &self.key_id)
            .field("lifetime", &self.lifetime)
            .field("audience", &self.audience)
            .field("private_key_material", &"<redacted>")
            .finish()
    }
}

/// ================================
/// Full service configuration (YAML)
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    pub issuer: IssuerSection,
    pub sink: Option<FileSinkConfig>,
}

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsConfig {
    pub logging: Option<LoggingConfig>,
    /// lifetimes above this only produce a warning
    pub max_lifetime_seconds: Option<u64>,
}

pub const MAX_LIFETIME_SECONDS_DEFAULT: u64 = 20 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct IssuerSection {
    pub issuer: String,
    pub key_id: String,
    pub audience: String,
    pub lifetime_seconds: u64,
    pub private_key: KeyMaterialValue,
}

/// Where the private key comes from
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum KeyMaterialValue {
    Literal {
        value: String,
    },
    FromEnv {
        from_env: String,
    },
    FromFile {
        path: String,
    },
}

/// ================================
/// Sink
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct FileSinkConfig {
    pub path: String,
    #[serde(default = "default_refresh_interval_seconds")]
    pub refresh_interval_seconds: u64,
}

fn default_refresh_interval_seconds() -> u64 {
    30
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}
