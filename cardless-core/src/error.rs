use thiserror::Error;

use crate::storage::StorageError;

/// Errors from the enrollment and NFT claim flows.
#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum CardlessError {
    /// A secure store operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The flow needs a wallet and none is stored.
    #[error("wallet_not_initialized")]
    WalletNotInitialized,
    /// No NFT asset id was given and none is stored with the credential.
    #[error("missing_asset_id")]
    MissingAssetId,
    /// The credential issuance service rejected the request.
    #[error("issuance_error: {0}")]
    Issuance(String),
    /// The asset opt-in transaction could not be submitted.
    #[error("opt_in_error: {0}")]
    OptIn(String),
    /// The NFT transfer service failed.
    #[error("transfer_error: {0}")]
    Transfer(String),
}
