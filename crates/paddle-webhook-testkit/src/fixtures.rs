//! Signing fixtures.
//!
//! [`TestSigner`] plays the sender: it holds an RSA private key, frames
//! fields the way the sender does and signs them. The framing here is
//! written out by hand so that it stays independent of the serializer under
//! test.

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use paddle_webhook_core::{RsaVerifier, SIGNATURE_FIELD};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use serde_json::{Map, Value};
use sha1::{Digest, Sha1};

/// Key size used by the sender's legacy keys.
pub const KEY_BITS: usize = 1024;

const DEFAULT_SEED: u64 = 0x5eed_0001;

/// A sender that signs field sets with a deterministic RSA key.
#[derive(Clone)]
pub struct TestSigner {
    private_key: RsaPrivateKey,
}

impl TestSigner {
    /// The shared default signer. Key generation runs once per process.
    pub fn new() -> Self {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        Self {
            private_key: KEY.get_or_init(|| generate(DEFAULT_SEED)).clone(),
        }
    }

    /// A signer with its own key derived from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            private_key: generate(seed),
        }
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }

    /// SPKI PEM (`BEGIN PUBLIC KEY`) of the signer's public key.
    pub fn public_key_pem(&self) -> String {
        self.public_key()
            .to_public_key_pem(LineEnding::LF)
            .expect("encode public key")
    }

    /// A SHA-1 verifier for this signer's key.
    pub fn verifier(&self) -> RsaVerifier {
        RsaVerifier::new(self.public_key())
    }

    /// Sign raw bytes, returning standard base64.
    pub fn sign_bytes(&self, message: &[u8]) -> String {
        let digest = Sha1::digest(message);
        let raw = self
            .private_key
            .sign(Pkcs1v15Sign::new::<Sha1>(), &digest)
            .expect("sign");
        STANDARD.encode(raw)
    }

    /// Frame and sign a field set, as the sender does before delivery.
    pub fn sign(&self, fields: &[(&str, &str)]) -> SignedFixture {
        let php = php_serialize(fields);
        let signature = self.sign_bytes(php.as_bytes());
        SignedFixture {
            fields: fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            php,
            signature,
        }
    }
}

impl Default for TestSigner {
    fn default() -> Self {
        Self::new()
    }
}

fn generate(seed: u64) -> RsaPrivateKey {
    let mut rng = StdRng::seed_from_u64(seed);
    RsaPrivateKey::new(&mut rng, KEY_BITS).expect("generate RSA key")
}

/// PHP `serialize()` of a flat string map, keys sorted.
pub fn php_serialize(fields: &[(&str, &str)]) -> String {
    let mut sorted = fields.to_vec();
    sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut out = format!("a:{}:{{", sorted.len());
    for (name, value) in sorted {
        out.push_str(&format!("s:{}:\"{}\";", name.len(), name));
        out.push_str(&format!("s:{}:\"{}\";", value.len(), value));
    }
    out.push('}');
    out
}

/// A signed field set, ready to be delivered in either encoding.
#[derive(Debug, Clone)]
pub struct SignedFixture {
    pub fields: Vec<(String, String)>,
    /// The exact text that was signed.
    pub php: String,
    pub signature: String,
}

impl SignedFixture {
    /// Form body of all fields plus `p_signature`.
    pub fn form_body(&self) -> String {
        self.form_body_with(|_, _| true)
    }

    /// Form body keeping only the fields `keep` accepts, plus `p_signature`.
    pub fn form_body_with(&self, keep: impl Fn(&str, &str) -> bool) -> String {
        let mut pairs: Vec<(&str, &str)> = self
            .fields
            .iter()
            .filter(|(name, value)| keep(name, value))
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        pairs.push((SIGNATURE_FIELD, self.signature.as_str()));
        serde_urlencoded::to_string(pairs).expect("encode form body")
    }

    /// JSON body of all fields as strings plus `p_signature`.
    pub fn json_body(&self) -> String {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), Value::String(value.clone()));
        }
        map.insert(SIGNATURE_FIELD.to_owned(), Value::String(self.signature.clone()));
        Value::Object(map).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddle_webhook_core::Verifier;

    #[test]
    fn test_php_serialize_framing() {
        assert_eq!(php_serialize(&[]), "a:0:{}");
        assert_eq!(
            php_serialize(&[("status", "paid"), ("amount", "1.50")]),
            r#"a:2:{s:6:"amount";s:4:"1.50";s:6:"status";s:4:"paid";}"#
        );
        assert_eq!(php_serialize(&[("n", "ł")]), r#"a:1:{s:1:"n";s:2:"ł";}"#);
    }

    #[test]
    fn test_signature_verifies_with_own_key_only() {
        let signer = TestSigner::new();
        let signed = signer.sign(&[("alert_name", "transfer_paid")]);

        signer
            .verifier()
            .verify(signed.php.as_bytes(), &signed.signature)
            .unwrap();

        let other = TestSigner::with_seed(7);
        assert!(other
            .verifier()
            .verify(signed.php.as_bytes(), &signed.signature)
            .is_err());
    }

    #[test]
    fn test_default_signer_is_deterministic() {
        assert_eq!(TestSigner::new().public_key(), TestSigner::new().public_key());
        assert!(TestSigner::new().public_key_pem().starts_with("-----BEGIN PUBLIC KEY-----"));
    }

    #[test]
    fn test_bodies_carry_signature() {
        let signed = TestSigner::new().sign(&[("alert_name", "x"), ("coupon", "")]);
        let form = signed.form_body_with(|_, value| !value.is_empty());
        assert!(form.starts_with("alert_name=x&p_signature="));

        let json: Value = serde_json::from_str(&signed.json_body()).unwrap();
        assert_eq!(json["coupon"], "");
        assert_eq!(json[SIGNATURE_FIELD], signed.signature.as_str());
    }
}
