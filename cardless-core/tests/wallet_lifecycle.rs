//! Wallet creation, persistence, key derivation and recovery from damaged slots.

mod common;

use cardless_core::algorand::{AlgorandAccount, ADDRESS_LEN, SECRET_KEY_LEN};
use cardless_core::{generate_wallet, StorageError};

#[tokio::test]
async fn test_initialize_wallet_is_idempotent() {
    let (blob_store, stores) = common::stores();
    let wallet = stores.wallet();

    let first = wallet.initialize_wallet().await.expect("first init");
    let second = wallet.initialize_wallet().await.expect("second init");

    assert_eq!(first, second);
    assert_eq!(first.len(), ADDRESS_LEN);
    assert_eq!(blob_store.write_count(common::WALLET_ADDRESS_SERVICE), 1);
    assert_eq!(blob_store.write_count(common::WALLET_MNEMONIC_SERVICE), 1);
    assert_eq!(blob_store.write_count(common::WALLET_KEY_SERVICE), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_initialization_creates_one_wallet() {
    let (blob_store, stores) = common::stores();
    let wallet = stores.wallet();

    let (a, b, c) = tokio::join!(
        wallet.initialize_wallet(),
        wallet.initialize_wallet(),
        wallet.initialize_wallet()
    );

    let a = a.unwrap();
    assert_eq!(a, b.unwrap());
    assert_eq!(a, c.unwrap());
    assert_eq!(blob_store.write_count(common::WALLET_ADDRESS_SERVICE), 1);
}

#[tokio::test]
async fn test_stored_mnemonic_matches_address() {
    let (_, stores) = common::stores();
    let wallet = stores.wallet();
    let address = wallet.initialize_wallet().await.unwrap();

    let mnemonic = wallet.get_wallet_mnemonic().await.unwrap().expect("mnemonic");
    assert_eq!(mnemonic.split_whitespace().count(), 25);
    let account = AlgorandAccount::from_mnemonic(&mnemonic).unwrap();
    assert_eq!(account.address(), address);

    let private_key = wallet
        .get_wallet_private_key()
        .await
        .unwrap()
        .expect("private key");
    assert_eq!(private_key.len(), SECRET_KEY_LEN);
    assert_eq!(private_key, account.secret_key().to_vec());
}

#[tokio::test]
async fn test_save_wallet_round_trip() {
    let (_, stores) = common::stores();
    let wallet = stores.wallet();
    let record = generate_wallet();

    wallet
        .save_wallet(record.address.clone(), record.mnemonic.clone())
        .await
        .unwrap();

    assert_eq!(
        wallet.get_wallet_address().await.unwrap(),
        Some(record.address.clone())
    );
    assert_eq!(
        wallet.get_wallet_mnemonic().await.unwrap(),
        Some(record.mnemonic)
    );
    assert_eq!(wallet.initialize_wallet().await.unwrap(), record.address);
}

#[tokio::test]
async fn test_tampered_mnemonic_yields_no_private_key() {
    let (blob_store, stores) = common::stores();
    let wallet = stores.wallet();
    wallet.initialize_wallet().await.unwrap();

    common::flip_signature_char(&blob_store, common::WALLET_MNEMONIC_SERVICE);

    assert!(wallet.get_wallet_private_key().await.unwrap().is_none());
    assert!(!blob_store.contains(common::WALLET_MNEMONIC_SERVICE));
    // the address envelope is independent
    assert!(wallet.has_wallet().await.unwrap());
}

#[tokio::test]
async fn test_tampered_address_is_replaced_on_initialize() {
    let (blob_store, stores) = common::stores();
    let wallet = stores.wallet();
    let original = wallet.initialize_wallet().await.unwrap();

    common::flip_signature_char(&blob_store, common::WALLET_ADDRESS_SERVICE);

    assert!(!wallet.has_wallet().await.unwrap());
    let replacement = wallet.initialize_wallet().await.unwrap();
    assert_ne!(replacement, original);
    let account = AlgorandAccount::from_mnemonic(
        &wallet.get_wallet_mnemonic().await.unwrap().expect("mnemonic"),
    )
    .unwrap();
    assert_eq!(account.address(), replacement);
}

#[tokio::test]
async fn test_clear_wallet() {
    let (blob_store, stores) = common::stores();
    let wallet = stores.wallet();
    wallet.initialize_wallet().await.unwrap();

    wallet.clear_wallet().await.unwrap();

    assert!(!wallet.has_wallet().await.unwrap());
    assert!(wallet.get_wallet_mnemonic().await.unwrap().is_none());
    assert!(wallet.get_wallet_private_key().await.unwrap().is_none());
    assert!(!blob_store.contains(common::WALLET_ADDRESS_SERVICE));
    assert!(!blob_store.contains(common::WALLET_MNEMONIC_SERVICE));
}

#[tokio::test]
async fn test_address_without_mnemonic_after_interrupted_save() {
    let (blob_store, stores) = common::stores();
    let wallet = stores.wallet();
    let address = wallet.initialize_wallet().await.unwrap();

    // simulate a crash between the two writes
    blob_store.raw_remove(common::WALLET_MNEMONIC_SERVICE);

    assert_eq!(wallet.initialize_wallet().await.unwrap(), address);
    assert!(wallet.get_wallet_mnemonic().await.unwrap().is_none());
    assert!(wallet.get_wallet_private_key().await.unwrap().is_none());
}

#[tokio::test]
async fn test_wallet_and_credential_keys_are_independent() {
    let (blob_store, stores) = common::stores();
    stores.wallet().initialize_wallet().await.unwrap();
    stores
        .credentials()
        .save_credential(common::minimal_response())
        .await
        .unwrap();

    let wallet_key = blob_store.raw_get(common::WALLET_KEY_SERVICE).unwrap();
    let credential_key = blob_store.raw_get(common::CREDENTIALS_KEY_SERVICE).unwrap();
    assert_ne!(wallet_key, credential_key);

    blob_store.raw_remove(common::CREDENTIALS_KEY_SERVICE);
    assert!(stores.wallet().has_wallet().await.unwrap());
}

#[tokio::test]
async fn test_unavailable_store_fails_initialize() {
    let (blob_store, stores) = common::stores();
    blob_store.set_unavailable(true);

    assert!(matches!(
        stores.wallet().initialize_wallet().await,
        Err(StorageError::StorageUnavailable(_))
    ));
    blob_store.set_unavailable(false);
    assert!(blob_store.is_empty());
}

#[tokio::test]
async fn test_failed_mnemonic_write_reports_partial_save() {
    let (blob_store, stores) = common::stores_failing_on(common::WALLET_MNEMONIC_SERVICE);
    let record = generate_wallet();

    let result = stores
        .wallet()
        .save_wallet(record.address.clone(), record.mnemonic)
        .await;

    match result {
        Err(StorageError::PartialSaveFailure {
            written,
            failed_slot,
            ..
        }) => {
            assert_eq!(written, ["wallet_address"]);
            assert_eq!(failed_slot, "wallet_mnemonic");
        }
        other => panic!("expected partial save failure, got {other:?}"),
    }
    assert!(blob_store.contains(common::WALLET_ADDRESS_SERVICE));
    assert!(!blob_store.contains(common::WALLET_MNEMONIC_SERVICE));
    assert_eq!(
        stores.wallet().get_wallet_address().await.unwrap(),
        Some(record.address)
    );
}
