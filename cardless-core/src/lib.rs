#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Tamper-evident on-device storage for the Cardless ID wallet.
//!
//! Holds the issued verifiable credential, the holder's Algorand account and
//! raw document numbers on top of the platform secure store. Credential and
//! wallet slots are signed with a per-device key; a slot that fails
//! verification is deleted and reads as absent.
//!
//! Start with [`SecureStores`], built from a host-provided
//! [`SecureBlobStore`].

mod config;
pub use config::*;

mod error;
pub use error::*;

pub mod algorand;

pub mod flows;

pub mod logger;

pub mod storage;
pub use storage::{
    generate_wallet, Clock, CredentialStore, DocumentIdStore, DocumentType, SecureBlobStore,
    SecureStores, StorageError, StorageResult, SystemClock, WalletRecord, WalletStore,
};

mod types;
pub use types::*;

uniffi::setup_scaffolding!("cardless_core");
