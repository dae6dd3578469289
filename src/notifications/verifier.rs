//! RSA-SHA256 verification of inbound notification signatures.
//!
//! Coinbase signs each notification body with its private key and sends the
//! base64 signature in the `CB-SIGNATURE` header. Verification must run over
//! the raw body bytes exactly as received.

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use tracing::debug;

use crate::error::CoinbaseError;
use crate::notifications::Notification;

/// Header carrying the notification signature.
pub const SIGNATURE_HEADER: &str = "CB-SIGNATURE";

/// Verifies notification signatures against a fixed public key.
///
/// The verifier holds no mutable state and can be shared freely between
/// request handlers.
///
/// # Example
///
/// ```rust,no_run
/// use coinbase_api_client::notifications::NotificationVerifier;
///
/// # fn handle(body: &[u8], signature_header: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let verifier = NotificationVerifier::from_pem_file("coinbase.pub")?;
/// if verifier.verify(body, signature_header) {
///     // trusted
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NotificationVerifier {
    public_key: RsaPublicKey,
}

impl NotificationVerifier {
    /// Create a verifier from a public key.
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self { public_key }
    }

    /// Create a verifier from a PEM public key.
    ///
    /// Accepts both SPKI (`BEGIN PUBLIC KEY`) and PKCS#1
    /// (`BEGIN RSA PUBLIC KEY`) encodings.
    pub fn from_public_key_pem(pem: &str) -> Result<Self, CoinbaseError> {
        let pem = pem.trim();
        let public_key = if pem.contains("BEGIN RSA PUBLIC KEY") {
            RsaPublicKey::from_pkcs1_pem(pem)
                .map_err(|e| CoinbaseError::Config(format!("Invalid RSA public key: {e}")))?
        } else {
            RsaPublicKey::from_public_key_pem(pem)
                .map_err(|e| CoinbaseError::Config(format!("Invalid RSA public key: {e}")))?
        };
        Ok(Self::new(public_key))
    }

    /// Create a verifier from a DER-encoded SPKI public key.
    pub fn from_public_key_der(der: &[u8]) -> Result<Self, CoinbaseError> {
        let public_key = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| CoinbaseError::Config(format!("Invalid RSA public key: {e}")))?;
        Ok(Self::new(public_key))
    }

    /// Read a PEM public key from a file.
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, CoinbaseError> {
        let path = path.as_ref();
        let pem = std::fs::read_to_string(path).map_err(|e| {
            CoinbaseError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_public_key_pem(&pem)
    }

    /// Check a signature, keeping malformed input apart from a bad signature.
    ///
    /// Returns `Ok(true)` when the signature verifies, `Ok(false)` when it is
    /// well-formed but does not match, and
    /// [`CoinbaseError::MalformedSignature`] when it cannot be decoded.
    pub fn check(&self, payload: &[u8], signature: &str) -> Result<bool, CoinbaseError> {
        let signature = signature.trim();
        if signature.is_empty() {
            return Err(CoinbaseError::MalformedSignature(
                "signature is empty".to_string(),
            ));
        }

        let bytes = BASE64
            .decode(signature)
            .map_err(|e| CoinbaseError::MalformedSignature(format!("invalid base64: {e}")))?;
        let signature = Signature::try_from(bytes.as_slice())
            .map_err(|e| CoinbaseError::MalformedSignature(e.to_string()))?;

        let verifying_key = VerifyingKey::<Sha256>::new(self.public_key.clone());
        Ok(verifying_key.verify(payload, &signature).is_ok())
    }

    /// Verify a signature, treating malformed input as untrusted.
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        match self.check(payload, signature) {
            Ok(verified) => {
                debug!(verified, "checked notification signature");
                verified
            }
            Err(e) => {
                debug!(error = %e, "rejecting notification with malformed signature");
                false
            }
        }
    }

    /// Verify a payload and deserialize it into `T`.
    pub fn verify_payload<T>(&self, payload: &[u8], signature: &str) -> Result<T, CoinbaseError>
    where
        T: DeserializeOwned,
    {
        if !self.check(payload, signature)? {
            return Err(CoinbaseError::UntrustedNotification);
        }
        Ok(serde_json::from_slice(payload)?)
    }

    /// Verify a payload and parse it as a [`Notification`].
    pub fn verify_notification(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<Notification, CoinbaseError> {
        self.verify_payload(payload, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationType;
    use rsa::RsaPrivateKey;
    use rsa::pkcs1v15::SigningKey;
    use rsa::pkcs8::DecodePrivateKey;
    use rsa::signature::{SignatureEncoding, Signer};

    const PRIVATE_KEY: &str = include_str!("../../tests/fixtures/notification_private_key.pem");
    const PUBLIC_KEY: &str = include_str!("../../tests/fixtures/notification_public_key.pem");
    const PUBLIC_KEY_PKCS1: &str =
        include_str!("../../tests/fixtures/notification_public_key_pkcs1.pem");
    const UNRELATED_KEY: &str = include_str!("../../tests/fixtures/unrelated_public_key.pem");
    const PAYLOAD: &str = include_str!("../../tests/fixtures/notification.json");
    const PAYLOAD_SIGNATURE: &str = include_str!("../../tests/fixtures/notification.sig");

    fn sign(payload: &[u8]) -> String {
        let private_key = RsaPrivateKey::from_pkcs8_pem(PRIVATE_KEY).unwrap();
        let signing_key = SigningKey::<Sha256>::new(private_key);
        BASE64.encode(signing_key.sign(payload).to_bytes())
    }

    fn verifier() -> NotificationVerifier {
        NotificationVerifier::from_public_key_pem(PUBLIC_KEY).unwrap()
    }

    #[test]
    fn test_externally_signed_payload_verifies() {
        // Signature produced with `openssl dgst -sha256 -sign`.
        assert!(verifier().verify(PAYLOAD.as_bytes(), PAYLOAD_SIGNATURE));
    }

    #[test]
    fn test_signed_payload_verifies() {
        let payload = br#"{"id":"abc","type":"ping"}"#;
        let signature = sign(payload);
        assert!(verifier().verify(payload, &signature));
        assert!(verifier().check(payload, &signature).unwrap());
    }

    #[test]
    fn test_single_byte_mutation_fails() {
        let mut payload = PAYLOAD.as_bytes().to_vec();
        for index in [0, payload.len() / 2, payload.len() - 1] {
            let original = payload[index];
            payload[index] ^= 0x01;
            assert!(!verifier().verify(&payload, PAYLOAD_SIGNATURE));
            payload[index] = original;
        }
        assert!(verifier().verify(&payload, PAYLOAD_SIGNATURE));
    }

    #[test]
    fn test_pkcs1_public_key_accepted() {
        let verifier = NotificationVerifier::from_public_key_pem(PUBLIC_KEY_PKCS1).unwrap();
        assert!(verifier.verify(PAYLOAD.as_bytes(), PAYLOAD_SIGNATURE));
    }

    #[test]
    fn test_wrong_key_rejects() {
        let verifier = NotificationVerifier::from_public_key_pem(UNRELATED_KEY).unwrap();
        assert!(!verifier.verify(PAYLOAD.as_bytes(), PAYLOAD_SIGNATURE));
        assert!(!verifier.check(PAYLOAD.as_bytes(), PAYLOAD_SIGNATURE).unwrap());
    }

    #[test]
    fn test_malformed_signature_distinguished() {
        let verifier = verifier();
        let result = verifier.check(PAYLOAD.as_bytes(), "not base64 at all!!");
        assert!(matches!(result, Err(CoinbaseError::MalformedSignature(_))));
        assert!(matches!(
            verifier.check(PAYLOAD.as_bytes(), "  "),
            Err(CoinbaseError::MalformedSignature(_))
        ));

        // The boolean API collapses both cases into "not verified".
        assert!(!verifier.verify(PAYLOAD.as_bytes(), "not base64 at all!!"));
    }

    #[test]
    fn test_truncated_signature_is_not_verified() {
        let truncated = BASE64.encode(&BASE64.decode(PAYLOAD_SIGNATURE).unwrap()[..128]);
        assert!(!verifier().verify(PAYLOAD.as_bytes(), &truncated));
    }

    #[test]
    fn test_verify_notification_parses_payload() {
        let notification = verifier()
            .verify_notification(PAYLOAD.as_bytes(), PAYLOAD_SIGNATURE)
            .unwrap();
        assert_eq!(notification.kind(), NotificationType::NewPayment);
        assert_eq!(notification.id, "6bf0ca21-0b2f-5e8a-b95e-7bd7eaccc338");
    }

    #[test]
    fn test_verify_notification_rejects_untrusted() {
        let result = verifier().verify_notification(PAYLOAD.as_bytes(), &sign(b"other payload"));
        assert!(matches!(result, Err(CoinbaseError::UntrustedNotification)));
    }

    #[test]
    fn test_invalid_key_material_is_config_error() {
        let result = NotificationVerifier::from_public_key_pem(
            "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----",
        );
        assert!(matches!(result, Err(CoinbaseError::Config(_))));
    }
}
