//! Raw document numbers, one slot per document type.
//!
//! These values are not wrapped in an envelope; they rely solely on the
//! confidentiality of the platform secure store.

use std::sync::Arc;

use super::{error::StorageResult, run_blocking, traits::SecureBlobStore};
use crate::config::{Namespace, StoreConfig};

const DOCUMENT_FAMILY: &str = "document";

/// Kind of identity document whose number is kept on device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum DocumentType {
    /// Driver's license or state ID card number.
    GovernmentId,
    /// Passport number.
    Passport,
}

impl DocumentType {
    /// Every document type, in clearing order.
    pub const ALL: [Self; 2] = [Self::GovernmentId, Self::Passport];

    /// Slot name under the `document` family.
    #[must_use]
    pub const fn slot_name(self) -> &'static str {
        match self {
            Self::GovernmentId => "governmentId",
            Self::Passport => "passport",
        }
    }
}

/// Secure slots for raw government-ID and passport numbers.
#[derive(uniffi::Object)]
pub struct DocumentIdStore {
    blob_store: Arc<dyn SecureBlobStore>,
    namespace: Namespace,
}

impl std::fmt::Debug for DocumentIdStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIdStore").finish_non_exhaustive()
    }
}

impl DocumentIdStore {
    pub(crate) fn from_parts(blob_store: Arc<dyn SecureBlobStore>, config: &StoreConfig) -> Self {
        Self {
            blob_store,
            namespace: config.namespace(DOCUMENT_FAMILY),
        }
    }

    fn service(&self, document_type: DocumentType) -> String {
        self.namespace.slot(document_type.slot_name())
    }
}

#[uniffi::export(async_runtime = "tokio")]
impl DocumentIdStore {
    /// Creates a document store over `blob_store`.
    #[uniffi::constructor]
    #[must_use]
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(blob_store: Arc<dyn SecureBlobStore>, config: StoreConfig) -> Self {
        Self::from_parts(blob_store, &config)
    }

    /// Stores `value` for `document_type`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store rejects the write.
    pub async fn store_document_id(
        &self,
        document_type: DocumentType,
        value: String,
    ) -> StorageResult<()> {
        let blob_store = self.blob_store.clone();
        let service = self.service(document_type);
        run_blocking(move || blob_store.set(service, value)).await
    }

    /// Returns the stored number for `document_type`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn get_document_id(
        &self,
        document_type: DocumentType,
    ) -> StorageResult<Option<String>> {
        let blob_store = self.blob_store.clone();
        let service = self.service(document_type);
        run_blocking(move || blob_store.get(service)).await
    }

    /// Removes the number for `document_type`.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store rejects the delete.
    pub async fn remove_document_id(&self, document_type: DocumentType) -> StorageResult<()> {
        let blob_store = self.blob_store.clone();
        let service = self.service(document_type);
        run_blocking(move || blob_store.remove(service)).await
    }

    /// Removes every document number.
    ///
    /// Every type is attempted even if an earlier removal fails.
    ///
    /// # Errors
    ///
    /// Returns the first removal error.
    pub async fn clear_all(&self) -> StorageResult<()> {
        let blob_store = self.blob_store.clone();
        let services: Vec<String> = DocumentType::ALL
            .into_iter()
            .map(|document_type| self.service(document_type))
            .collect();
        run_blocking(move || {
            let mut first_error = None;
            for service in services {
                if let Err(err) = blob_store.remove(service.clone()) {
                    log::warn!("failed to remove document slot {service}: {err}");
                    first_error.get_or_insert(err);
                }
            }
            first_error.map_or(Ok(()), Err)
        })
        .await
    }
}
