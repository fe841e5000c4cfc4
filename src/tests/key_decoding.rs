#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, ErrorKind, Read};

    use crate::errors::{TokenError, TokenErrorKind};
    use crate::key::decoder::{ID_EC_PUBLIC_KEY, SECP256R1};
    use crate::key::{decode_private_key, decode_private_key_str, KeySource};
    use crate::tests::common::*;

    /// Source whose every read fails with the given kind.
    struct Broken(ErrorKind);

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "disk on fire"))
        }
    }

    impl KeySource for Broken {
        fn declared_len(&self) -> usize {
            16
        }
    }

    #[test]
    fn decodes_p256_pkcs8_key() {
        let key = decode_private_key_str(P256_PKCS8_KEY).expect("valid key");
        assert_eq!(key.curve(), Some(SECP256R1));
    }

    #[test]
    fn decodes_p256_key_without_embedded_public_key() {
        let key = decode_private_key_str(P256_PKCS8_KEY_NO_PUBLIC).expect("valid key");
        assert_eq!(key.curve(), Some(SECP256R1));
    }

    #[test]
    fn decodes_from_any_key_source() {
        let mut cursor = Cursor::new(P256_PKCS8_KEY.as_bytes().to_vec());
        assert!(decode_private_key(&mut cursor).is_ok());
    }

    #[test]
    fn missing_pem_block_is_format_error() {
        for material in [INVALID_PEM, "", "not a key at all"] {
            let err = decode_private_key_str(material).unwrap_err();
            assert_eq!(err.kind(), TokenErrorKind::KeyFormat, "input: {material:?}");
        }
    }

    #[test]
    fn sec1_payload_is_encoding_error() {
        let err = decode_private_key_str(P256_SEC1_KEY).unwrap_err();
        assert_eq!(err.kind(), TokenErrorKind::KeyEncoding);
    }

    #[test]
    fn rsa_key_is_algorithm_error() {
        let err = decode_private_key_str(RSA_PKCS8_KEY).unwrap_err();
        assert_eq!(err.kind(), TokenErrorKind::KeyAlgorithm);
        assert!(matches!(err, TokenError::KeyAlgorithm(oid) if oid != ID_EC_PUBLIC_KEY));
    }

    #[test]
    fn ed25519_key_is_algorithm_error() {
        let err = decode_private_key_str(ED25519_PKCS8_KEY).unwrap_err();
        assert_eq!(err.kind(), TokenErrorKind::KeyAlgorithm);
    }

    #[test]
    fn other_ec_curves_still_decode() {
        let key = decode_private_key_str(P384_PKCS8_KEY).expect("EC key of another curve");
        assert_ne!(key.curve(), Some(SECP256R1));
    }

    #[test]
    fn read_failure_is_passed_through() {
        let err = decode_private_key(&mut Broken(ErrorKind::PermissionDenied)).unwrap_err();
        match err {
            TokenError::Io(e) => assert_eq!(e.kind(), ErrorKind::PermissionDenied),
            other => panic!("expected raw io error, got {other:?}"),
        }
    }

    #[test]
    fn truncated_declared_length_breaks_the_container() {
        struct Short(Cursor<&'static str>);
        impl Read for Short {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.0.read(buf)
            }
        }
        impl KeySource for Short {
            fn declared_len(&self) -> usize {
                40
            }
        }

        let err = decode_private_key(&mut Short(Cursor::new(P256_PKCS8_KEY))).unwrap_err();
        assert_eq!(err.kind(), TokenErrorKind::KeyFormat);
    }

    #[test]
    fn debug_output_hides_key_bytes() {
        let key = decode_private_key_str(P256_PKCS8_KEY).unwrap();
        assert!(format!("{key:?}").contains("<redacted>"));
    }
}
