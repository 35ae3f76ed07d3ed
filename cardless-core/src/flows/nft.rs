//! Claiming the credential NFT: asset opt-in, server transfer, local update.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::algorand::SECRET_KEY_LEN;
use crate::error::CardlessError;
use crate::storage::{CredentialStore, SecureStores, StorageError, WalletStore};
use crate::types::NftInfo;

/// Submits asset opt-in transactions to the chain.
#[async_trait]
pub trait AssetOptIn: Send + Sync {
    /// Signs and submits an opt-in for `asset_id` from `address`, returning
    /// the transaction id.
    ///
    /// # Errors
    ///
    /// Implementations return [`CardlessError::OptIn`] on submission failure.
    async fn opt_in(
        &self,
        address: &str,
        secret_key: &[u8; SECRET_KEY_LEN],
        asset_id: u64,
    ) -> Result<String, CardlessError>;
}

/// Server endpoint that transfers and freezes the credential NFT.
#[async_trait]
pub trait NftTransferApi: Send + Sync {
    /// Requests the transfer of `asset_id` to `wallet_address`.
    ///
    /// # Errors
    ///
    /// Implementations return [`CardlessError::Transfer`] on failure.
    async fn transfer(
        &self,
        asset_id: u64,
        wallet_address: &str,
    ) -> Result<NftTransferReceipt, CardlessError>;
}

/// Reference to a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRef {
    /// Transaction id.
    pub id: String,
    /// Block explorer link.
    pub explorer_url: String,
}

/// Transactions performed by the transfer endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTransferTransactions {
    /// Asset transfer to the wallet.
    pub transfer: TransactionRef,
    /// Freeze of the asset in the wallet.
    pub freeze: TransactionRef,
}

/// Response of the transfer endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftTransferReceipt {
    /// Whether the server reports success.
    pub success: bool,
    /// Transferred asset.
    pub asset_id: u64,
    /// Receiving wallet.
    pub wallet_address: String,
    /// Transfer and freeze transactions.
    pub transactions: NftTransferTransactions,
    /// Server message.
    pub message: String,
}

/// Progress of an [`NftWorkflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NftWorkflowState {
    /// Not started, or reset.
    #[default]
    Idle,
    /// Submitting the asset opt-in.
    OptingIn,
    /// Waiting for the server transfer.
    Transferring,
    /// Transferred and recorded locally.
    Complete,
    /// A step failed.
    Error,
}

/// Drives the credential NFT claim for the stored wallet.
pub struct NftWorkflow {
    credentials: Arc<CredentialStore>,
    wallet: Arc<WalletStore>,
    opt_in: Arc<dyn AssetOptIn>,
    transfer: Arc<dyn NftTransferApi>,
    state: NftWorkflowState,
    opt_in_tx_id: Option<String>,
}

impl std::fmt::Debug for NftWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NftWorkflow")
            .field("state", &self.state)
            .field("opt_in_tx_id", &self.opt_in_tx_id)
            .finish_non_exhaustive()
    }
}

impl NftWorkflow {
    /// Creates an idle workflow over the given stores and collaborators.
    #[must_use]
    pub fn new(
        stores: &SecureStores,
        opt_in: Arc<dyn AssetOptIn>,
        transfer: Arc<dyn NftTransferApi>,
    ) -> Self {
        Self {
            credentials: stores.credentials(),
            wallet: stores.wallet(),
            opt_in,
            transfer,
            state: NftWorkflowState::Idle,
            opt_in_tx_id: None,
        }
    }

    /// Current step.
    #[must_use]
    pub const fn state(&self) -> NftWorkflowState {
        self.state
    }

    /// Id of the opt-in transaction, once submitted.
    #[must_use]
    pub fn opt_in_tx_id(&self) -> Option<&str> {
        self.opt_in_tx_id.as_deref()
    }

    /// Whether a step is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(
            self.state,
            NftWorkflowState::OptingIn | NftWorkflowState::Transferring
        )
    }

    /// Returns to [`NftWorkflowState::Idle`] and forgets the opt-in id.
    pub fn reset(&mut self) {
        self.state = NftWorkflowState::Idle;
        self.opt_in_tx_id = None;
    }

    /// Runs opt-in, transfer and the local `nft` update.
    ///
    /// `asset_id` overrides the id stored with the credential.
    ///
    /// # Errors
    ///
    /// - [`CardlessError::MissingAssetId`] if no id is given and none is stored.
    /// - [`CardlessError::WalletNotInitialized`] if the wallet or its key is
    ///   missing.
    /// - The collaborator's error if opt-in or transfer fails.
    ///
    /// The workflow is left in [`NftWorkflowState::Error`] on failure.
    pub async fn start(&mut self, asset_id: Option<u64>) -> Result<NftTransferReceipt, CardlessError> {
        match self.run(asset_id).await {
            Ok(receipt) => {
                self.state = NftWorkflowState::Complete;
                Ok(receipt)
            }
            Err(err) => {
                log::error!("credential NFT claim failed: {err}");
                self.state = NftWorkflowState::Error;
                Err(err)
            }
        }
    }

    async fn run(&mut self, asset_id: Option<u64>) -> Result<NftTransferReceipt, CardlessError> {
        let asset_id = match asset_id {
            Some(asset_id) => asset_id,
            None => self.stored_asset_id().await?,
        };

        let address = self
            .wallet
            .get_wallet_address()
            .await?
            .ok_or(CardlessError::WalletNotInitialized)?;

        self.state = NftWorkflowState::OptingIn;
        let tx_id = {
            let account = self
                .wallet
                .load_account()
                .await?
                .ok_or(CardlessError::WalletNotInitialized)?;
            if account.address() != address {
                return Err(StorageError::InvalidMnemonic(
                    "stored mnemonic does not belong to the wallet address".to_string(),
                )
                .into());
            }
            let secret_key = account.secret_key();
            self.opt_in.opt_in(&address, &secret_key, asset_id).await?
        };
        log::info!("opted in to asset {asset_id}: {tx_id}");
        self.opt_in_tx_id = Some(tx_id);

        self.state = NftWorkflowState::Transferring;
        let receipt = self.transfer.transfer(asset_id, &address).await?;
        if !receipt.success {
            return Err(CardlessError::Transfer(receipt.message));
        }

        self.credentials
            .update_nft(NftInfo {
                asset_id: receipt.asset_id.to_string(),
                requires_opt_in: false,
                instructions: None,
            })
            .await?;
        Ok(receipt)
    }

    async fn stored_asset_id(&self) -> Result<u64, CardlessError> {
        let nft = self
            .credentials
            .get_nft()
            .await?
            .ok_or(CardlessError::MissingAssetId)?;
        nft.asset_id
            .parse()
            .map_err(|_| CardlessError::MissingAssetId)
    }
}
