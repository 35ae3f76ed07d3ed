//! Tamper-evident secure stores for the credential, the wallet and raw
//! document numbers.
//!
//! Every slot of the credential and wallet families is persisted as a
//! [`SecureEnvelope`] signed with a per-family device key. Document numbers are
//! stored as plain secrets and rely on the platform store alone.

mod credential_store;
mod document_store;
mod envelope;
pub mod error;
#[cfg(all(feature = "platform-ios", target_vendor = "apple"))]
mod keychain;
pub mod memory;
mod signing_key;
mod slots;
mod stores;
pub mod traits;
mod wallet_store;

pub use credential_store::CredentialStore;
pub use document_store::{DocumentIdStore, DocumentType};
pub use envelope::SecureEnvelope;
pub use error::{StorageError, StorageResult};
#[cfg(all(feature = "platform-ios", target_vendor = "apple"))]
pub use keychain::KeychainSecureStore;
pub use signing_key::SIGNING_KEY_LEN;
pub use stores::SecureStores;
pub use traits::{Clock, SecureBlobStore, SystemClock};
pub use wallet_store::{generate_wallet, WalletRecord, WalletStore};

/// Runs synchronous secure-store work on the blocking pool so platform calls
/// never stall the async executor.
pub(crate) async fn run_blocking<T, F>(task: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| StorageError::unavailable(format!("storage task failed: {err}")))?
}
