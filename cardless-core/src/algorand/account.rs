//! Algorand ed25519 accounts.

use data_encoding::BASE32_NOPAD;
use ed25519_dalek::SigningKey;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha512_256};
use zeroize::Zeroizing;

use super::mnemonic::{mnemonic_to_seed, seed_to_mnemonic, SEED_LEN};
use crate::storage::StorageResult;

/// Length of an encoded Algorand address.
pub const ADDRESS_LEN: usize = 58;

/// Length of the secret key handed to transaction signers (`seed || public key`).
pub const SECRET_KEY_LEN: usize = 64;

const CHECKSUM_LEN: usize = 4;

/// An Algorand account held in memory.
///
/// The underlying ed25519 key is zeroized on drop.
pub struct AlgorandAccount {
    signing_key: SigningKey,
}

impl std::fmt::Debug for AlgorandAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorandAccount")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl AlgorandAccount {
    /// Generates a fresh account from the OS random number generator.
    #[must_use]
    pub fn generate() -> Self {
        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        OsRng.fill_bytes(&mut *seed);
        Self::from_seed(&seed)
    }

    /// Builds the account whose ed25519 seed is `seed`.
    #[must_use]
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Recovers an account from its 25-word mnemonic.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMnemonic` if the mnemonic does not decode.
    pub fn from_mnemonic(mnemonic: &str) -> StorageResult<Self> {
        let seed = mnemonic_to_seed(mnemonic)?;
        Ok(Self::from_seed(&seed))
    }

    /// The account address: base32 of the public key followed by the last four
    /// bytes of its SHA-512/256 digest.
    #[must_use]
    pub fn address(&self) -> String {
        let public_key = self.signing_key.verifying_key().to_bytes();
        let digest = Sha512_256::digest(public_key);

        let mut raw = [0u8; 32 + CHECKSUM_LEN];
        raw[..32].copy_from_slice(&public_key);
        raw[32..].copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
        BASE32_NOPAD.encode(&raw)
    }

    /// The 25-word recovery phrase.
    #[must_use]
    pub fn mnemonic(&self) -> Zeroizing<String> {
        seed_to_mnemonic(self.signing_key.as_bytes())
    }

    /// The 64-byte secret key (`seed || public key`) used to sign transactions.
    #[must_use]
    pub fn secret_key(&self) -> Zeroizing<[u8; SECRET_KEY_LEN]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }
}
