//! iOS Keychain-backed [`SecureBlobStore`].
//!
//! Each service name maps to one generic-password item under a fixed account.
//! Hosts that manage the keychain on the Swift side implement
//! [`SecureBlobStore`] there instead.

use security_framework::{
    access_control::{ProtectionMode, SecAccessControl},
    passwords::{
        delete_generic_password, get_generic_password, set_generic_password_options,
        PasswordOptions,
    },
};

use super::{
    error::{StorageError, StorageResult},
    traits::SecureBlobStore,
};

/// Keychain account shared by every item this store writes.
const KEYCHAIN_ACCOUNT: &str = "cardlessid";

/// errSecItemNotFound
const ITEM_NOT_FOUND: i32 = -25300;

/// Generic-password keychain items, one per service name.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeychainSecureStore;

impl KeychainSecureStore {
    /// Creates the store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn is_not_found(err: &security_framework::base::Error) -> bool {
    err.code() == ITEM_NOT_FOUND
}

impl SecureBlobStore for KeychainSecureStore {
    fn get(&self, service: String) -> StorageResult<Option<String>> {
        match get_generic_password(&service, KEYCHAIN_ACCOUNT) {
            Ok(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| {
                StorageError::serialization(format!("keychain item {service} is not UTF-8"))
            }),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(StorageError::unavailable(format!(
                "failed to read keychain item {service}: {err}"
            ))),
        }
    }

    fn set(&self, service: String, value: String) -> StorageResult<()> {
        let write_failed = |err: security_framework::base::Error| {
            StorageError::unavailable(format!("failed to write keychain item {service}: {err}"))
        };
        // items never leave the device and are unreadable while it is locked
        let access_control = SecAccessControl::create_with_protection(
            Some(ProtectionMode::AccessibleWhenUnlockedThisDeviceOnly),
            0,
        )
        .map_err(write_failed)?;
        let mut options = PasswordOptions::new_generic_password(&service, KEYCHAIN_ACCOUNT);
        options.set_access_control(access_control);
        set_generic_password_options(value.as_bytes(), options).map_err(write_failed)
    }

    fn remove(&self, service: String) -> StorageResult<()> {
        match delete_generic_password(&service, KEYCHAIN_ACCOUNT) {
            Ok(()) => Ok(()),
            Err(err) if is_not_found(&err) => Ok(()),
            Err(err) => Err(StorageError::unavailable(format!(
                "failed to delete keychain item {service}: {err}"
            ))),
        }
    }
}
