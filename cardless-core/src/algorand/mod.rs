//! Algorand account derivation: keys, addresses and recovery phrases.

mod account;
pub mod mnemonic;

pub use account::{AlgorandAccount, ADDRESS_LEN, SECRET_KEY_LEN};
pub use mnemonic::{mnemonic_to_seed, seed_to_mnemonic, MNEMONIC_WORDS, SEED_LEN};
