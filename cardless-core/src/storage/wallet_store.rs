//! Algorand wallet slots: the address and its recovery phrase.

use std::sync::Arc;

use tokio::sync::Mutex;
use zeroize::Zeroizing;

use super::{
    error::{StorageError, StorageResult},
    run_blocking,
    slots::SealedSlots,
    traits::{Clock, SecureBlobStore},
};
use crate::algorand::AlgorandAccount;
use crate::config::StoreConfig;

const WALLET_FAMILY: &str = "wallet";

const WALLET_ADDRESS: &str = "wallet_address";
const WALLET_MNEMONIC: &str = "wallet_mnemonic";

/// An Algorand account as persisted by the wallet store.
#[derive(Clone, PartialEq, Eq, uniffi::Record)]
pub struct WalletRecord {
    /// 58-character account address.
    pub address: String,
    /// 25-word recovery phrase.
    pub mnemonic: String,
}

/// Generates a fresh Algorand account. Nothing is persisted.
#[uniffi::export]
#[must_use]
pub fn generate_wallet() -> WalletRecord {
    let account = AlgorandAccount::generate();
    WalletRecord {
        address: account.address(),
        mnemonic: account.mnemonic().to_string(),
    }
}

impl std::fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletRecord")
            .field("address", &self.address)
            .field("mnemonic", &"<redacted>")
            .finish()
    }
}

/// Tamper-evident store for the device's Algorand account.
///
/// The address and mnemonic live in two independent envelopes. They are
/// written address first and the pair is not atomic: a failure between the
/// writes leaves an address without a mnemonic.
#[derive(uniffi::Object)]
pub struct WalletStore {
    slots: Arc<SealedSlots>,
    init_guard: Mutex<()>,
}

impl std::fmt::Debug for WalletStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletStore").finish_non_exhaustive()
    }
}

impl WalletStore {
    pub(crate) fn from_parts(
        blob_store: Arc<dyn SecureBlobStore>,
        clock: Arc<dyn Clock>,
        config: &StoreConfig,
    ) -> Self {
        Self {
            slots: Arc::new(SealedSlots::new(
                blob_store,
                clock,
                config.namespace(WALLET_FAMILY),
            )),
            init_guard: Mutex::new(()),
        }
    }

    /// Loads the stored account, re-deriving its keys from the mnemonic.
    ///
    /// Returns `Ok(None)` when the mnemonic is absent, failed verification or
    /// does not decode. Nothing derived from it is kept after the call.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn load_account(&self) -> StorageResult<Option<AlgorandAccount>> {
        let Some(mnemonic) = self.get_wallet_mnemonic().await? else {
            return Ok(None);
        };
        match AlgorandAccount::from_mnemonic(&Zeroizing::new(mnemonic)) {
            Ok(account) => Ok(Some(account)),
            Err(err) => {
                log::error!("stored wallet mnemonic does not decode: {err}");
                Ok(None)
            }
        }
    }
}

#[uniffi::export(async_runtime = "tokio")]
impl WalletStore {
    /// Creates a wallet store over `blob_store`.
    #[uniffi::constructor]
    #[must_use]
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(
        blob_store: Arc<dyn SecureBlobStore>,
        clock: Arc<dyn Clock>,
        config: StoreConfig,
    ) -> Self {
        Self::from_parts(blob_store, clock, &config)
    }

    /// Returns the stored address, creating and persisting a wallet first if
    /// none exists.
    ///
    /// Concurrent callers are serialized, so at most one wallet is created.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform store cannot be read or the new wallet
    /// cannot be saved.
    pub async fn initialize_wallet(&self) -> StorageResult<String> {
        let _in_flight = self.init_guard.lock().await;

        if let Some(address) = self.get_wallet_address().await? {
            return Ok(address);
        }

        let wallet = generate_wallet();
        self.save_wallet(wallet.address.clone(), wallet.mnemonic)
            .await?;
        log::info!("created wallet {}", wallet.address);
        Ok(wallet.address)
    }

    /// Seals and stores `address` and `mnemonic`.
    ///
    /// # Errors
    ///
    /// - `InvalidMnemonic` if `mnemonic` does not decode to `address`.
    /// - `PartialSaveFailure` if the mnemonic write fails after the address
    ///   was written.
    /// - The write error if the address itself cannot be written.
    pub async fn save_wallet(&self, address: String, mnemonic: String) -> StorageResult<()> {
        if AlgorandAccount::from_mnemonic(&mnemonic)?.address() != address {
            return Err(StorageError::InvalidMnemonic(
                "mnemonic does not belong to the address".to_string(),
            ));
        }

        let slots = self.slots.clone();
        run_blocking(move || {
            slots.write(WALLET_ADDRESS, address.as_str())?;
            slots.write(WALLET_MNEMONIC, mnemonic.as_str()).map_err(|err| {
                log::error!("wallet address stored but mnemonic write failed: {err}");
                StorageError::PartialSaveFailure {
                    written: vec![WALLET_ADDRESS.to_string()],
                    failed_slot: WALLET_MNEMONIC.to_string(),
                    reason: err.to_string(),
                }
            })
        })
        .await
    }

    /// Returns the stored address, or `None` if absent or tampered.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn get_wallet_address(&self) -> StorageResult<Option<String>> {
        let slots = self.slots.clone();
        run_blocking(move || slots.read(WALLET_ADDRESS)).await
    }

    /// Returns the stored recovery phrase, or `None` if absent or tampered.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn get_wallet_mnemonic(&self) -> StorageResult<Option<String>> {
        let slots = self.slots.clone();
        run_blocking(move || slots.read(WALLET_MNEMONIC)).await
    }

    /// Derives the 64-byte secret key from the stored mnemonic.
    ///
    /// The returned buffer is a plain copy and the caller owns wiping it once
    /// the transaction is signed. Rust callers should prefer
    /// [`WalletStore::load_account`], which keeps the key in zeroizing memory.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn get_wallet_private_key(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self
            .load_account()
            .await?
            .map(|account| account.secret_key().to_vec()))
    }

    /// Deletes the address and mnemonic. The wallet cannot be recovered
    /// afterwards unless the phrase was exported.
    ///
    /// # Errors
    ///
    /// Returns the first removal error. Both slots are attempted.
    pub async fn clear_wallet(&self) -> StorageResult<()> {
        let slots = self.slots.clone();
        run_blocking(move || {
            let address = slots.remove(WALLET_ADDRESS);
            let mnemonic = slots.remove(WALLET_MNEMONIC);
            address.and(mnemonic)
        })
        .await
    }

    /// Whether a readable wallet address is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the platform store cannot be read.
    pub async fn has_wallet(&self) -> StorageResult<bool> {
        Ok(self.get_wallet_address().await?.is_some())
    }
}
