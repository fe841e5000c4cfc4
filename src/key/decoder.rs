use std::fmt;
use std::io::Cursor;

use jsonwebtoken::EncodingKey;
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use pkcs8::{ObjectIdentifier, PrivateKeyInfo};
use tracing::trace;

use crate::errors::TokenError;
use crate::key::source::{read_all, KeySource};

/// `id-ecPublicKey`, the algorithm OID every PKCS#8 EC key carries.
pub const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// NIST P-256, the only curve ES256 can sign with.
pub const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// ECDSA private key in PKCS#8 DER form.
#[derive(Clone)]
pub struct EcdsaPrivateKey {
    pkcs8_der: Vec<u8>,
    curve: Option<ObjectIdentifier>,
}

impl EcdsaPrivateKey {
    /// Named curve from the algorithm parameters, if present.
    pub fn curve(&self) -> Option<ObjectIdentifier> {
        self.curve
    }

    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_ec_der(&self.pkcs8_der)
    }
}

impl fmt::Debug for EcdsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaPrivateKey")
            .field("curve", &self.curve)
            .field("pkcs8_der", &"<redacted>")
            .finish()
    }
}

/// Read a PEM-wrapped PKCS#8 ECDSA private key from `source`.
///
/// Failure kinds stay apart: no PEM block is [`TokenError::KeyFormat`], a
/// block that is not PKCS#8 is [`TokenError::KeyEncoding`], a PKCS#8 key of
/// another family is [`TokenError::KeyAlgorithm`]. Read errors other than end
/// of input come back as [`TokenError::Io`].
pub fn decode_private_key<S: KeySource + ?Sized>(
    source: &mut S,
) -> Result<EcdsaPrivateKey, TokenError> {
    let raw = read_all(source)?;
    let block = pem::parse(&raw).map_err(TokenError::KeyFormat)?;
    trace!("decoded PEM block with tag '{}'", block.tag());

    let info = PrivateKeyInfo::try_from(block.contents())
        .map_err(|e| TokenError::KeyEncoding(e.into()))?;
    if info.algorithm.oid != ID_EC_PUBLIC_KEY {
        return Err(TokenError::KeyAlgorithm(info.algorithm.oid));
    }
    let curve = info.algorithm.parameters_oid().ok();

    let pkcs8_der = if curve == Some(SECP256R1) {
        normalize_p256(block.contents())?
    } else {
        // other curves are left for the signer to reject
        block.contents().to_vec()
    };

    Ok(EcdsaPrivateKey { pkcs8_der, curve })
}

/// Re-encode a P-256 key so the optional public key is always embedded;
/// the signer refuses PKCS#8 keys without it.
fn normalize_p256(der: &[u8]) -> Result<Vec<u8>, TokenError> {
    let secret = p256::SecretKey::from_pkcs8_der(der).map_err(TokenError::KeyEncoding)?;
    let document = secret.to_pkcs8_der().map_err(TokenError::KeyEncoding)?;
    Ok(document.as_bytes().to_vec())
}

pub fn decode_private_key_str(material: &str) -> Result<EcdsaPrivateKey, TokenError> {
    decode_private_key(&mut Cursor::new(material.as_bytes()))
}
