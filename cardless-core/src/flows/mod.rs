//! Multi-step flows over the stores and their remote collaborators.
//!
//! The collaborators (issuance API, chain RPC, NFT transfer API) are traits;
//! the host supplies the HTTP and chain implementations.

mod enroll;
mod nft;

pub use enroll::{enroll, CredentialIssuer, Enrollment, IssuanceRequest};
pub use nft::{
    AssetOptIn, NftTransferApi, NftTransferReceipt, NftTransferTransactions, NftWorkflow,
    NftWorkflowState, TransactionRef,
};
