//! Named, sealed slots inside one store family's namespace.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::{
    envelope::{PayloadCodec, SecureEnvelope},
    error::StorageResult,
    signing_key::SigningKeyManager,
    traits::{Clock, SecureBlobStore},
};
use crate::config::Namespace;

/// Reads and writes envelopes for the slots of one namespace.
///
/// Reads fail closed: a slot whose envelope does not verify or parse is
/// deleted and reported as absent.
pub(crate) struct SealedSlots {
    blob_store: Arc<dyn SecureBlobStore>,
    codec: PayloadCodec,
    namespace: Namespace,
}

impl SealedSlots {
    pub(crate) fn new(
        blob_store: Arc<dyn SecureBlobStore>,
        clock: Arc<dyn Clock>,
        namespace: Namespace,
    ) -> Self {
        let keys = SigningKeyManager::new(blob_store.clone(), namespace.signing_key());
        Self {
            blob_store,
            codec: PayloadCodec::new(keys, clock),
            namespace,
        }
    }

    /// Seals `value` and replaces the slot's envelope.
    pub(crate) fn write<T: Serialize + ?Sized>(&self, slot: &str, value: &T) -> StorageResult<()> {
        let envelope = self.codec.seal(value)?;
        self.blob_store
            .set(self.namespace.slot(slot), envelope.to_json()?)
    }

    /// Opens the slot. `Ok(None)` when absent or when it failed verification.
    ///
    /// Only storage availability errors propagate.
    pub(crate) fn read<T: DeserializeOwned>(&self, slot: &str) -> StorageResult<Option<T>> {
        let opened = self.blob_store.get(self.namespace.slot(slot)).and_then(|raw| {
            raw.map(|raw| {
                SecureEnvelope::from_json(&raw)
                    .and_then(|envelope| self.codec.open(&envelope, slot))
            })
            .transpose()
        });
        match opened {
            Ok(value) => Ok(value),
            Err(err) if err.is_integrity_failure() => {
                log::error!(
                    "SECURITY WARNING: slot {} failed verification ({err}); discarding it",
                    self.namespace.slot(slot)
                );
                if let Err(remove_err) = self.remove(slot) {
                    log::error!(
                        "failed to discard slot {}: {remove_err}",
                        self.namespace.slot(slot)
                    );
                }
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub(crate) fn remove(&self, slot: &str) -> StorageResult<()> {
        self.blob_store.remove(self.namespace.slot(slot))
    }
}
