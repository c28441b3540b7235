//! Secret references and secret-derived values.
//!
//! App inputs never carry secret material inline; they carry references into
//! the deployment's secret store. This module serializes those references
//! into the env-var form the chart expects, and owns the per-deployment
//! encryption-key source.

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Reference to a key in the deployment's secret store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    pub key: String,
}

/// A value given inline or referenced from the secret store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecretValue {
    Ref(SecretRef),
    Plain(String),
}

/// Environment-variable value in chart form.
///
/// The inline and secret-reference shapes are mutually exclusive by
/// construction; a single struct with two optional fields could emit both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnvValue {
    Plain {
        value: String,
    },
    FromSecret {
        #[serde(rename = "valueFrom")]
        value_from: ValueFrom,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueFrom {
    #[serde(rename = "secretKeyRef")]
    pub secret_key_ref: SecretKeyRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretKeyRef {
    pub name: String,
    pub key: String,
}

impl EnvValue {
    pub fn plain(value: impl Into<String>) -> Self {
        Self::Plain {
            value: value.into(),
        }
    }
}

/// Serialize a secret-or-plain value into env-var form.
///
/// Secret references become `valueFrom.secretKeyRef` entries against the
/// app's secret store; the secret material itself never enters the values
/// document.
pub fn serialize_secret(value: &SecretValue, secrets_name: &str) -> EnvValue {
    match value {
        SecretValue::Plain(v) => EnvValue::plain(v.clone()),
        SecretValue::Ref(secret) => EnvValue::FromSecret {
            value_from: ValueFrom {
                secret_key_ref: SecretKeyRef {
                    name: secrets_name.to_string(),
                    key: secret.key.clone(),
                },
            },
        },
    }
}

/// Source of per-deployment encryption keys.
///
/// n8n encrypts stored credentials with this key. It is generated once per
/// invocation and written into the chart's secret values; it is never reused
/// across deployments.
pub trait EncryptionKeySource: Send + Sync {
    /// Returns a 64-character lowercase hex key (32 bytes of entropy).
    fn encryption_key(&self) -> String;
}

/// OS-entropy key source used in production
pub struct RandomKeySource;

impl EncryptionKeySource for RandomKeySource {
    fn encryption_key(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let mut key = String::with_capacity(64);
        for b in bytes {
            key.push_str(&format!("{:02x}", b));
        }
        key
    }
}

/// Fixed key source for tests and reproducible dry runs
pub struct FixedKeySource(pub String);

impl EncryptionKeySource for FixedKeySource {
    fn encryption_key(&self) -> String {
        self.0.clone()
    }
}
