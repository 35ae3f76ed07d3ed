//! The three stores wired over one platform store.

use std::sync::Arc;

use super::{
    credential_store::CredentialStore,
    document_store::DocumentIdStore,
    traits::{Clock, SecureBlobStore, SystemClock},
    wallet_store::WalletStore,
};
use crate::config::StoreConfig;

/// Entry point for the host app: construct once at start-up and hand the
/// individual stores to the screens that need them.
///
/// The credential store shares this container's document store, so clearing
/// the credential also clears stored document numbers.
#[derive(Debug, uniffi::Object)]
pub struct SecureStores {
    credentials: Arc<CredentialStore>,
    wallet: Arc<WalletStore>,
    documents: Arc<DocumentIdStore>,
    config: StoreConfig,
}

#[uniffi::export]
impl SecureStores {
    /// Creates the stores with the system clock and default configuration.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(blob_store: Arc<dyn SecureBlobStore>) -> Self {
        Self::with_config(blob_store, Arc::new(SystemClock), StoreConfig::default())
    }

    /// Creates the stores with an explicit clock and configuration.
    #[uniffi::constructor]
    #[must_use]
    pub fn with_config(
        blob_store: Arc<dyn SecureBlobStore>,
        clock: Arc<dyn Clock>,
        config: StoreConfig,
    ) -> Self {
        let documents = Arc::new(DocumentIdStore::from_parts(blob_store.clone(), &config));
        let credentials = Arc::new(CredentialStore::from_parts(
            blob_store.clone(),
            clock.clone(),
            &config,
            documents.clone(),
        ));
        let wallet = Arc::new(WalletStore::from_parts(blob_store, clock, &config));
        Self {
            credentials,
            wallet,
            documents,
            config,
        }
    }

    /// The credential store.
    #[must_use]
    pub fn credentials(&self) -> Arc<CredentialStore> {
        self.credentials.clone()
    }

    /// The wallet store.
    #[must_use]
    pub fn wallet(&self) -> Arc<WalletStore> {
        self.wallet.clone()
    }

    /// The document-number store.
    #[must_use]
    pub fn documents(&self) -> Arc<DocumentIdStore> {
        self.documents.clone()
    }

    /// The configuration the stores were built with.
    #[must_use]
    pub fn config(&self) -> StoreConfig {
        self.config.clone()
    }
}
