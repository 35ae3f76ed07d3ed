//! Tamper-evident envelope and the codec that seals and opens it.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{
    error::{StorageError, StorageResult},
    signing_key::SigningKeyManager,
    traits::Clock,
};

type HmacSha256 = Hmac<Sha256>;

/// Stored unit: serialized plaintext, its signature and the creation time.
///
/// Envelopes are immutable; a new save replaces the whole envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureEnvelope {
    /// Serialized plaintext (JSON).
    pub data: String,
    /// Lower-hex HMAC-SHA256 of `data` under the device signing key.
    pub signature: String,
    /// Milliseconds since the Unix epoch at seal time.
    pub timestamp: u64,
}

impl SecureEnvelope {
    /// Serializes the envelope into the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn to_json(&self) -> StorageResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a persisted envelope.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the stored payload is malformed.
    pub fn from_json(raw: &str) -> StorageResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Seals values into envelopes and verifies them on the way back out.
pub(crate) struct PayloadCodec {
    keys: SigningKeyManager,
    clock: Arc<dyn Clock>,
}

impl PayloadCodec {
    pub(crate) fn new(keys: SigningKeyManager, clock: Arc<dyn Clock>) -> Self {
        Self { keys, clock }
    }

    /// Serializes `value` and signs it with the device signing key.
    pub(crate) fn seal<T: Serialize + ?Sized>(&self, value: &T) -> StorageResult<SecureEnvelope> {
        let data = serde_json::to_string(value)?;
        let key = self.keys.signing_key()?;
        let signature = sign(&data, &key)?;
        Ok(SecureEnvelope {
            data,
            signature,
            timestamp: self.clock.now_millis(),
        })
    }

    /// Verifies the envelope against the current signing key and decodes it.
    ///
    /// A mismatch yields `TamperDetected`; a rotated key is indistinguishable
    /// from tampering and is reported the same way.
    pub(crate) fn open<T: DeserializeOwned>(
        &self,
        envelope: &SecureEnvelope,
        slot: &str,
    ) -> StorageResult<T> {
        let key = self.keys.signing_key()?;
        let expected = sign(&envelope.data, &key)?;
        if !signatures_match(&expected, &envelope.signature) {
            return Err(StorageError::TamperDetected(slot.to_string()));
        }
        Ok(serde_json::from_str(&envelope.data)?)
    }
}

fn sign(data: &str, key: &SecretString) -> StorageResult<String> {
    let mut mac = HmacSha256::new_from_slice(key.expose_secret().as_bytes())
        .map_err(|err| StorageError::serialization(format!("invalid signing key: {err}")))?;
    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn signatures_match(expected: &str, actual: &str) -> bool {
    expected.len() == actual.len() && bool::from(expected.as_bytes().ct_eq(actual.as_bytes()))
}
