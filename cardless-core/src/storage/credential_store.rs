//! Credential slots written from an issuance response.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::{
    document_store::DocumentIdStore,
    error::{StorageError, StorageResult},
    run_blocking,
    slots::SealedSlots,
    traits::{Clock, SecureBlobStore},
};
use crate::config::StoreConfig;
use crate::types::{
    BlockchainInfo, CredentialResponse, DuplicateDetection, NftInfo, PersonalData,
    VerifiableCredential, VerificationQuality,
};

const CREDENTIALS_FAMILY: &str = "credentials";

const CREDENTIAL: &str = "credential";
const PERSONAL_DATA: &str = "personal_data";
const VERIFICATION_QUALITY: &str = "verification_quality";
const NFT: &str = "nft";
const BLOCKCHAIN: &str = "blockchain";
const DUPLICATE_DETECTION: &str = "duplicate_detection";

const ALL_SLOTS: [&str; 6] = [
    CREDENTIAL,
    PERSONAL_DATA,
    VERIFICATION_QUALITY,
    NFT,
    BLOCKCHAIN,
    DUPLICATE_DETECTION,
];

/// Tamper-evident store for the issued credential and its metadata.
///
/// `credential` and `personal_data` are always written together and define
/// whether a credential is present. The remaining slots are optional.
#[derive(uniffi::Object)]
pub struct CredentialStore {
    slots: Arc<SealedSlots>,
    documents: Arc<DocumentIdStore>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore {
    pub(crate) fn from_parts(
        blob_store: Arc<dyn SecureBlobStore>,
        clock: Arc<dyn Clock>,
        config: &StoreConfig,
        documents: Arc<DocumentIdStore>,
    ) -> Self {
        Self {
            slots: Arc::new(SealedSlots::new(
                blob_store,
                clock,
                config.namespace(CREDENTIALS_FAMILY),
            )),
            documents,
        }
    }

    async fn read_slot<T>(&self, slot: &'static str) -> StorageResult<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let slots = self.slots.clone();
        run_blocking(move || slots.read(slot)).await
    }
}

#[uniffi::export(async_runtime = "tokio")]
impl CredentialStore {
    /// Creates a credential store with its own document store over the same
    /// platform store.
    #[uniffi::constructor]
    #[must_use]
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(
        blob_store: Arc<dyn SecureBlobStore>,
        clock: Arc<dyn Clock>,
        config: StoreConfig,
    ) -> Self {
        let documents = Arc::new(DocumentIdStore::from_parts(blob_store.clone(), &config));
        Self::from_parts(blob_store, clock, &config, documents)
    }

    /// Persists an issuance response.
    ///
    /// Writes `credential` and `personal_data`, then each optional slot present
    /// in `response`. Slots already written are not rolled back if a later
    /// write fails.
    ///
    /// # Errors
    ///
    /// - The first write's error if nothing was written.
    /// - [`StorageError::PartialSaveFailure`] if a write failed after others
    ///   succeeded. The stored credential should then be treated as unreliable.
    pub async fn save_credential(&self, response: CredentialResponse) -> StorageResult<()> {
        let slots = self.slots.clone();
        run_blocking(move || {
            let mut saga = SaveSaga::new(&slots);
            saga.write(CREDENTIAL, &response.credential)?;
            saga.write(PERSONAL_DATA, &response.personal_data)?;
            saga.write_optional(VERIFICATION_QUALITY, response.verification_quality.as_ref())?;
            saga.write_optional(NFT, response.nft.as_ref())?;
            saga.write_optional(BLOCKCHAIN, response.blockchain.as_ref())?;
            saga.write_optional(DUPLICATE_DETECTION, response.duplicate_detection.as_ref())?;
            log::info!("stored credential ({} slots)", saga.written.len());
            Ok(())
        })
        .await
    }

    /// Returns the verifiable credential, or `None` if absent or tampered.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn get_credential(&self) -> StorageResult<Option<VerifiableCredential>> {
        self.read_slot(CREDENTIAL).await
    }

    /// Returns the extracted identity fields.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn get_personal_data(&self) -> StorageResult<Option<PersonalData>> {
        self.read_slot(PERSONAL_DATA).await
    }

    /// Returns the verification quality metadata.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn get_verification_quality(&self) -> StorageResult<Option<VerificationQuality>> {
        self.read_slot(VERIFICATION_QUALITY).await
    }

    /// Returns the credential NFT state.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn get_nft(&self) -> StorageResult<Option<NftInfo>> {
        self.read_slot(NFT).await
    }

    /// Returns the issuance transaction receipt.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn get_blockchain(&self) -> StorageResult<Option<BlockchainInfo>> {
        self.read_slot(BLOCKCHAIN).await
    }

    /// Returns the duplicate-detection result.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn get_duplicate_detection(&self) -> StorageResult<Option<DuplicateDetection>> {
        self.read_slot(DUPLICATE_DETECTION).await
    }

    /// Replaces only the `nft` slot.
    ///
    /// # Errors
    ///
    /// Returns an error if sealing or the platform write fails.
    pub async fn update_nft(&self, nft: NftInfo) -> StorageResult<()> {
        let slots = self.slots.clone();
        run_blocking(move || slots.write(NFT, &nft)).await
    }

    /// Removes every credential slot, then clears the document store.
    ///
    /// Failing to clear the document store is logged and does not fail the
    /// call.
    ///
    /// # Errors
    ///
    /// Returns the first slot removal error. All slots and the document store
    /// are still attempted.
    pub async fn clear_credential(&self) -> StorageResult<()> {
        let slots = self.slots.clone();
        let removed = run_blocking(move || {
            let mut first_error = None;
            for slot in ALL_SLOTS {
                if let Err(err) = slots.remove(slot) {
                    log::error!("failed to remove credential slot {slot}: {err}");
                    first_error.get_or_insert(err);
                }
            }
            first_error.map_or(Ok(()), Err)
        })
        .await;

        if let Err(err) = self.documents.clear_all().await {
            log::warn!("credential cleared but document ids could not be removed: {err}");
        }
        removed
    }

    /// Whether a readable credential is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn has_credential(&self) -> StorageResult<bool> {
        Ok(self.get_credential().await?.is_some())
    }
}

/// Sequential slot writes that report what was already persisted when a
/// step fails.
struct SaveSaga<'a> {
    slots: &'a SealedSlots,
    written: Vec<String>,
}

impl<'a> SaveSaga<'a> {
    const fn new(slots: &'a SealedSlots) -> Self {
        Self {
            slots,
            written: Vec::new(),
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, slot: &str, value: &T) -> StorageResult<()> {
        match self.slots.write(slot, value) {
            Ok(()) => {
                self.written.push(slot.to_string());
                Ok(())
            }
            Err(err) if self.written.is_empty() => Err(err),
            Err(err) => {
                log::error!(
                    "credential save failed at slot {slot} after writing {:?}: {err}",
                    self.written
                );
                Err(StorageError::PartialSaveFailure {
                    written: self.written.clone(),
                    failed_slot: slot.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }

    fn write_optional<T: Serialize>(&mut self, slot: &str, value: Option<&T>) -> StorageResult<()> {
        value.map_or(Ok(()), |value| self.write(slot, value))
    }
}
