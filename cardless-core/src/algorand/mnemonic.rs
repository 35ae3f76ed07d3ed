//! Algorand 25-word mnemonic encoding of a 32-byte ed25519 seed.
//!
//! The seed is read as a little-endian bit stream and cut into 24 words of 11
//! bits (the last word carries three seed bits and eight zero bits). A 25th
//! checksum word is the first 11 bits of `sha512_256(seed)`.

use bip39::Language;
use sha2::{Digest, Sha512_256};
use zeroize::Zeroizing;

use crate::storage::{StorageError, StorageResult};

/// Number of words in an Algorand mnemonic.
pub const MNEMONIC_WORDS: usize = 25;

/// Length of the seed a mnemonic encodes.
pub const SEED_LEN: usize = 32;

const BITS_PER_WORD: u32 = 11;
const WORD_MASK: u32 = (1 << BITS_PER_WORD) - 1;

/// Encodes `seed` as a space-separated 25-word mnemonic.
#[must_use]
pub fn seed_to_mnemonic(seed: &[u8; SEED_LEN]) -> Zeroizing<String> {
    let words = Language::English.word_list();
    let indices = Zeroizing::new(to_word_indices(seed));
    let checksum = checksum_word(seed);

    let mut phrase = Zeroizing::new(String::new());
    for index in indices.iter().copied().chain(std::iter::once(checksum)) {
        if !phrase.is_empty() {
            phrase.push(' ');
        }
        phrase.push_str(words[usize::from(index)]);
    }
    phrase
}

/// Decodes a 25-word mnemonic back into its seed.
///
/// Words are matched case-insensitively and may be separated by any
/// whitespace.
///
/// # Errors
///
/// Returns [`StorageError::InvalidMnemonic`] if the word count is wrong, a word
/// is not in the list, the padding bits are set or the checksum word does not
/// match.
pub fn mnemonic_to_seed(mnemonic: &str) -> StorageResult<Zeroizing<[u8; SEED_LEN]>> {
    let normalized = Zeroizing::new(mnemonic.to_lowercase());
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.len() != MNEMONIC_WORDS {
        return Err(StorageError::InvalidMnemonic(format!(
            "expected {MNEMONIC_WORDS} words, got {}",
            words.len()
        )));
    }

    let mut indices = Zeroizing::new(Vec::with_capacity(MNEMONIC_WORDS));
    for (position, word) in words.iter().enumerate() {
        let index = Language::English.find_word(word).ok_or_else(|| {
            StorageError::InvalidMnemonic(format!("word {} is not in the word list", position + 1))
        })?;
        indices.push(index);
    }

    let Some((checksum, data_words)) = indices.split_last() else {
        return Err(StorageError::InvalidMnemonic("empty mnemonic".to_string()));
    };
    let bytes = Zeroizing::new(to_bytes(data_words));

    // 24 words carry 264 bits: the 32-byte seed plus one zero padding byte.
    if bytes.len() != SEED_LEN + 1 || bytes[SEED_LEN] != 0 {
        return Err(StorageError::InvalidMnemonic(
            "seed padding bits are not zero".to_string(),
        ));
    }

    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    seed.copy_from_slice(&bytes[..SEED_LEN]);

    if checksum_word(&seed) != *checksum {
        return Err(StorageError::InvalidMnemonic("checksum word mismatch".to_string()));
    }
    Ok(seed)
}

fn checksum_word(seed: &[u8; SEED_LEN]) -> u16 {
    let digest = Sha512_256::digest(seed);
    to_word_indices(&digest[..2])[0]
}

/// Packs bytes little-endian into 11-bit word indices, flushing any leftover
/// bits into a final word.
#[allow(clippy::cast_possible_truncation)]
fn to_word_indices(bytes: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity(bytes.len() * 8 / BITS_PER_WORD as usize + 1);
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for &byte in bytes {
        buffer |= u32::from(byte) << bits;
        bits += 8;
        if bits >= BITS_PER_WORD {
            out.push((buffer & WORD_MASK) as u16);
            buffer >>= BITS_PER_WORD;
            bits -= BITS_PER_WORD;
        }
    }
    if bits != 0 {
        out.push((buffer & WORD_MASK) as u16);
    }
    out
}

/// Inverse of [`to_word_indices`].
#[allow(clippy::cast_possible_truncation)]
fn to_bytes(indices: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(indices.len() * BITS_PER_WORD as usize / 8 + 1);
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for &index in indices {
        buffer |= u32::from(index) << bits;
        bits += BITS_PER_WORD;
        while bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            bits -= 8;
        }
    }
    if bits != 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}
