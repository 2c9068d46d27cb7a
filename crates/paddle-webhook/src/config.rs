//! Configuration for the ingestion pipeline and signature verifier.

use std::path::PathBuf;

use paddle_webhook_core::{DigestAlg, RsaVerifier, SignatureEncoding};
use serde::Deserialize;

use crate::error::ConfigError;

/// What the middleware does when a stage fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Return the error; downstream is never called.
    #[default]
    FailFast,
    /// Call downstream with the error so it can inspect it.
    Continue,
}

/// Configuration for [`VerificationMiddleware`](crate::VerificationMiddleware).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub error_policy: ErrorPolicy,
    /// Hand an immutable copy of the raw body downstream with the outcome.
    pub retain_body: bool,
    pub pool: PoolConfig,
}

/// Scratch buffer pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Buffers kept for reuse; extra buffers are dropped on release.
    pub max_idle: usize,
    /// Initial capacity of a new buffer, in bytes.
    pub buffer_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle: 64,
            buffer_capacity: 4096,
        }
    }
}

/// Where the sender's public key comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeySource {
    /// Inline PEM text.
    Pem { pem: String },
    /// Path to a PEM file.
    File { path: PathBuf },
}

impl KeySource {
    /// Read the PEM text.
    pub fn load(&self) -> Result<String, ConfigError> {
        match self {
            Self::Pem { pem } => Ok(pem.clone()),
            Self::File { path } => std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            }),
        }
    }
}

/// Configuration for an [`RsaVerifier`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifierConfig {
    pub public_key: KeySource,
    #[serde(default)]
    pub digest: DigestAlg,
    #[serde(default)]
    pub encoding: SignatureEncoding,
}

impl VerifierConfig {
    /// A SHA-1, standard base64 verifier for an inline PEM key.
    pub fn from_pem(pem: impl Into<String>) -> Self {
        Self {
            public_key: KeySource::Pem { pem: pem.into() },
            digest: DigestAlg::default(),
            encoding: SignatureEncoding::default(),
        }
    }

    /// Load the key and build the verifier.
    pub fn build(&self) -> Result<RsaVerifier, ConfigError> {
        let pem = self.public_key.load()?;
        Ok(RsaVerifier::from_public_key_pem(&pem)?
            .with_digest(self.digest)
            .with_encoding(self.encoding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddle_webhook_testkit::TestSigner;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = WebhookConfig::default();
        assert_eq!(config.error_policy, ErrorPolicy::FailFast);
        assert!(!config.retain_body);
        assert_eq!(config.pool.max_idle, 64);
        assert_eq!(config.pool.buffer_capacity, 4096);

        let parsed: WebhookConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_deserialize_webhook_config() {
        let config: WebhookConfig = serde_json::from_str(
            r#"{"error_policy": "continue", "retain_body": true, "pool": {"max_idle": 4}}"#,
        )
        .unwrap();
        assert_eq!(config.error_policy, ErrorPolicy::Continue);
        assert!(config.retain_body);
        assert_eq!(config.pool.max_idle, 4);
        assert_eq!(config.pool.buffer_capacity, 4096);
    }

    #[test]
    fn test_verifier_from_inline_pem() {
        let signer = TestSigner::new();
        let verifier = VerifierConfig::from_pem(signer.public_key_pem()).build().unwrap();
        assert_eq!(verifier.public_key(), &signer.public_key());
        assert_eq!(verifier.digest(), DigestAlg::Sha1);
    }

    #[test]
    fn test_verifier_from_key_file() {
        let signer = TestSigner::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(signer.public_key_pem().as_bytes()).unwrap();

        let json = serde_json::json!({
            "public_key": { "file": { "path": file.path() } },
            "digest": "sha256",
            "encoding": "url-safe",
        });
        let config: VerifierConfig = serde_json::from_value(json).unwrap();
        let verifier = config.build().unwrap();
        assert_eq!(verifier.digest(), DigestAlg::Sha256);
        assert_eq!(verifier.encoding(), SignatureEncoding::UrlSafe);
    }

    #[test]
    fn test_missing_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = VerifierConfig {
            public_key: KeySource::File {
                path: dir.path().join("missing.pem"),
            },
            digest: DigestAlg::Sha1,
            encoding: SignatureEncoding::Standard,
        };
        assert!(matches!(config.build(), Err(ConfigError::Io { .. })));

        let bad = VerifierConfig::from_pem("not a key");
        assert!(matches!(bad.build(), Err(ConfigError::Key(_))));
    }
}
