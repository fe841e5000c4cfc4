use std::fmt;

use pkcs8::ObjectIdentifier;
use thiserror::Error;

/// Everything that can stop the issuer from handing out a bearer token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid issuer config: {0}")]
    Config(#[from] ConfigError),

    /// Key material holds no PEM block at all.
    #[error("private key is not a valid PEM block")]
    KeyFormat(#[source] pem::PemError),

    /// PEM block found, but its payload is not PKCS#8.
    #[error("private key must be PKCS#8 encoded")]
    KeyEncoding(#[source] pkcs8::Error),

    #[error("private key must be ECDSA, got algorithm {0}")]
    KeyAlgorithm(ObjectIdentifier),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Raw read failure of the key source, passed through untouched.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config is missing")]
    Missing,
    #[error("lifetime must be greater than zero")]
    ZeroLifetime,
    #[error("lifetime is too large")]
    LifetimeOutOfRange,
}

/// Flat discriminant of [`TokenError`] for callers that branch on the failure
/// without caring about the underlying cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenErrorKind {
    Config,
    KeyFormat,
    KeyEncoding,
    KeyAlgorithm,
    Signing,
    Io,
}

impl TokenError {
    pub fn kind(&self) -> TokenErrorKind {
        match self {
            TokenError::Config(_) => TokenErrorKind::Config,
            TokenError::KeyFormat(_) => TokenErrorKind::KeyFormat,
            TokenError::KeyEncoding(_) => TokenErrorKind::KeyEncoding,
            TokenError::KeyAlgorithm(_) => TokenErrorKind::KeyAlgorithm,
            TokenError::Signing(_) => TokenErrorKind::Signing,
            TokenError::Io(_) => TokenErrorKind::Io,
        }
    }
}

impl TokenErrorKind {
    /// Label value used for failure metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenErrorKind::Config => "config",
            TokenErrorKind::KeyFormat => "key_format",
            TokenErrorKind::KeyEncoding => "key_encoding",
            TokenErrorKind::KeyAlgorithm => "key_algorithm",
            TokenErrorKind::Signing => "signing",
            TokenErrorKind::Io => "io",
        }
    }
}

impl fmt::Display for TokenErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
