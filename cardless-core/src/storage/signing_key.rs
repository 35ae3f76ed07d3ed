//! Per-device signing key used for envelope integrity.

use std::sync::Arc;

use rand::{rngs::OsRng, RngCore};
use secrecy::SecretString;
use zeroize::Zeroizing;

use super::{
    error::{StorageError, StorageResult},
    traits::SecureBlobStore,
};

/// Length of the raw signing key in bytes.
pub const SIGNING_KEY_LEN: usize = 32;

/// Lazily creates and persists the device signing key of one store family.
///
/// The key is read from the secure store on every call rather than cached, so
/// deleting it from the platform store takes effect immediately: a fresh key
/// is generated and every envelope sealed under the old key stops verifying.
pub(crate) struct SigningKeyManager {
    blob_store: Arc<dyn SecureBlobStore>,
    service: String,
}

impl SigningKeyManager {
    pub(crate) fn new(blob_store: Arc<dyn SecureBlobStore>, service: String) -> Self {
        Self {
            blob_store,
            service,
        }
    }

    /// Returns the persisted signing key, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the secure store cannot be read or
    /// written, whatever the store reported. There is no fallback key, and a
    /// key that cannot be read never counts against the data it protects.
    pub(crate) fn signing_key(&self) -> StorageResult<SecretString> {
        let existing = self
            .blob_store
            .get(self.service.clone())
            .map_err(|err| self.unavailable(err))?;
        if let Some(existing) = existing {
            return Ok(SecretString::from(existing));
        }

        let key = random_key_hex();
        self.blob_store
            .set(self.service.clone(), (*key).clone())
            .map_err(|err| self.unavailable(err))?;
        log::info!("created device signing key for {}", self.service);
        Ok(SecretString::from((*key).clone()))
    }

    fn unavailable(&self, err: StorageError) -> StorageError {
        match err {
            StorageError::StorageUnavailable(_) => err,
            other => StorageError::unavailable(format!("signing key {}: {other}", self.service)),
        }
    }
}

fn random_key_hex() -> Zeroizing<String> {
    let mut bytes = Zeroizing::new([0u8; SIGNING_KEY_LEN]);
    OsRng.fill_bytes(&mut *bytes);
    Zeroizing::new(hex::encode(&*bytes))
}
