//! Signature verification: RSA PKCS#1 v1.5 over a configurable digest.
//!
//! The sender signs the SHA-1 digest of the canonical bytes by default; the
//! digest is pluggable for senders that moved to a stronger hash.

use std::fmt;

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::canonical::SignedPayload;
use crate::error::VerificationError;

/// Digest computed over the canonical bytes before RSA verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlg {
    /// Legacy vendor default.
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl DigestAlg {
    /// Hash `data` with this algorithm.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => Sha1::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    /// The PKCS#1 v1.5 scheme (DigestInfo prefix) for this algorithm.
    pub fn scheme(&self) -> Pkcs1v15Sign {
        match self {
            Self::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
            Self::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
            Self::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
        }
    }
}

/// Base64 alphabet of the transport signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureEncoding {
    #[default]
    Standard,
    UrlSafe,
}

impl SignatureEncoding {
    /// Decode a signature. Empty input is an error, not an empty signature.
    pub fn decode(&self, signature: &str) -> Result<Vec<u8>, VerificationError> {
        if signature.is_empty() {
            return Err(VerificationError::EmptySignature);
        }
        let raw = match self {
            Self::Standard => STANDARD.decode(signature)?,
            Self::UrlSafe => URL_SAFE.decode(signature)?,
        };
        Ok(raw)
    }

    pub fn encode(&self, raw: &[u8]) -> String {
        match self {
            Self::Standard => STANDARD.encode(raw),
            Self::UrlSafe => URL_SAFE.encode(raw),
        }
    }
}

/// Checks a base64 signature over a message.
pub trait Verifier: Send + Sync {
    fn verify(&self, message: &[u8], signature: &str) -> Result<(), VerificationError>;

    /// Canonicalize a decoded payload and verify its own signature.
    fn verify_payload(&self, payload: &dyn SignedPayload) -> Result<(), VerificationError> {
        let message = payload.canonical_bytes()?;
        self.verify(&message, payload.signature())
    }
}

/// RSA PKCS#1 v1.5 verifier holding the sender's public key.
#[derive(Clone)]
pub struct RsaVerifier {
    public_key: RsaPublicKey,
    digest: DigestAlg,
    encoding: SignatureEncoding,
}

impl RsaVerifier {
    /// Create a verifier using SHA-1 and standard base64.
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self {
            public_key,
            digest: DigestAlg::default(),
            encoding: SignatureEncoding::default(),
        }
    }

    /// Parse a PEM public key, either SPKI (`BEGIN PUBLIC KEY`) or
    /// PKCS#1 (`BEGIN RSA PUBLIC KEY`).
    pub fn from_public_key_pem(pem: &str) -> Result<Self, VerificationError> {
        let public_key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| VerificationError::InvalidPublicKey(e.to_string()))?;
        Ok(Self::new(public_key))
    }

    pub fn with_digest(mut self, digest: DigestAlg) -> Self {
        self.digest = digest;
        self
    }

    pub fn with_encoding(mut self, encoding: SignatureEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn digest(&self) -> DigestAlg {
        self.digest
    }

    pub fn encoding(&self) -> SignatureEncoding {
        self.encoding
    }
}

impl Verifier for RsaVerifier {
    fn verify(&self, message: &[u8], signature: &str) -> Result<(), VerificationError> {
        let signature = self.encoding.decode(signature)?;
        let hashed = self.digest.digest(message);
        self.public_key
            .verify(self.digest.scheme(), &hashed, &signature)
            .map_err(|_| VerificationError::SignatureMismatch)
    }
}

impl fmt::Debug for RsaVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaVerifier")
            .field("key_bits", &(self.public_key.size() * 8))
            .field("digest", &self.digest)
            .field("encoding", &self.encoding)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{canonicalize, FieldSet};
    use crate::error::FormatError;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rsa::pkcs8::{EncodePublicKey, LineEnding};
    use rsa::RsaPrivateKey;
    use std::sync::OnceLock;

    fn private_key() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| {
            let mut rng = StdRng::seed_from_u64(0x42);
            RsaPrivateKey::new(&mut rng, 1024).expect("key generation")
        })
    }

    fn sign(message: &[u8], digest: DigestAlg) -> String {
        let hashed = digest.digest(message);
        let raw = private_key().sign(digest.scheme(), &hashed).unwrap();
        STANDARD.encode(raw)
    }

    fn verifier() -> RsaVerifier {
        RsaVerifier::new(private_key().to_public_key())
    }

    struct Payload {
        fields: FieldSet,
        signature: String,
    }

    impl SignedPayload for Payload {
        fn canonical_fields(&self) -> Result<FieldSet, FormatError> {
            Ok(self.fields.clone())
        }

        fn signature(&self) -> &str {
            &self.signature
        }
    }

    #[test]
    fn test_sign_verify() {
        let message = b"a:1:{s:10:\"alert_name\";s:17:\"payment_succeeded\";}";
        let signature = sign(message, DigestAlg::Sha1);
        verifier()
            .verify(message, &signature)
            .expect("valid signature should verify");

        let tampered = b"a:1:{s:10:\"alert_name\";s:17:\"payment_succeedeD\";}";
        assert!(matches!(
            verifier().verify(tampered, &signature),
            Err(VerificationError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_empty_and_malformed_signatures() {
        assert!(matches!(
            verifier().verify(b"x", ""),
            Err(VerificationError::EmptySignature)
        ));
        assert!(matches!(
            verifier().verify(b"x", "not base64!"),
            Err(VerificationError::MalformedSignature(_))
        ));
        assert!(matches!(
            verifier().verify(b"x", "c2lnbmF0dXJl"),
            Err(VerificationError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_digest_must_match() {
        let message = b"hello";
        let signature = sign(message, DigestAlg::Sha256);
        assert!(verifier().verify(message, &signature).is_err());
        verifier()
            .with_digest(DigestAlg::Sha256)
            .verify(message, &signature)
            .expect("sha256 signature should verify with sha256 verifier");
    }

    #[test]
    fn test_url_safe_encoding() {
        let message = b"hello";
        let hashed = DigestAlg::Sha1.digest(message);
        let raw = private_key().sign(DigestAlg::Sha1.scheme(), &hashed).unwrap();
        let signature = SignatureEncoding::UrlSafe.encode(&raw);
        verifier()
            .with_encoding(SignatureEncoding::UrlSafe)
            .verify(message, &signature)
            .unwrap();
    }

    #[test]
    fn test_verify_payload() {
        let fields = FieldSet::from_pairs([("alert_name", "transfer_paid"), ("amount", "1.50")]).unwrap();
        let signature = sign(&canonicalize(&fields), DigestAlg::Sha1);
        let payload = Payload { fields, signature };
        verifier().verify_payload(&payload).unwrap();
    }

    #[test]
    fn test_public_key_from_pem() {
        let pem = private_key()
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap();
        let verifier = RsaVerifier::from_public_key_pem(&pem).unwrap();
        assert_eq!(verifier.public_key(), &private_key().to_public_key());
        assert_eq!(verifier.digest(), DigestAlg::Sha1);

        assert!(matches!(
            RsaVerifier::from_public_key_pem("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----"),
            Err(VerificationError::InvalidPublicKey(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_any_single_byte_flip_fails(
            message in prop::collection::vec(any::<u8>(), 1..128),
            index in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let signature = sign(&message, DigestAlg::Sha1);
            prop_assert!(verifier().verify(&message, &signature).is_ok());

            let mut tampered = message.clone();
            let i = index.index(tampered.len());
            tampered[i] ^= flip;
            prop_assert!(verifier().verify(&tampered, &signature).is_err());
        }
    }
}
