//! Small portable streaming implementation of BLAKE2s with optional key and variable output length.
//!
//! Only the single-lane, unsalted and unpersonalized variant is supported.

#![no_std]

mod context;
mod digest;
mod portable;
mod state;

pub use context::Blake2sContext;
pub use digest::Blake2sDigest;
pub use state::Blake2s;

/// The maximum number of bytes in a hash (and default output length)
pub const OUT_LEN: usize = 32;
/// The maximum number of bytes in a key
pub const KEY_LEN: usize = 32;
/// The number of bytes in a block
pub const BLOCK_LEN: usize = 64;

type BlockBytes = [u8; BLOCK_LEN];
type BlockWords = [u32; 16];
type CVWords = [u32; 8];
type CVBytes = [u8; OUT_LEN];

// IV[i] = floor(2^32 * frac(sqrt(prime(i + 1)))), same as SHA-256
const IV: &CVWords = &[
    0x6A09E667, 0xBB67AE85, 0x3C6EF372, 0xA54FF53A, 0x510E527F, 0x9B05688C, 0x1F83D9AB, 0x5BE0CD19,
];

/// Order in which message words are consumed by each of the compression rounds
const SIGMA: [[usize; 16]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

/// Error that occurs when constructing or using BLAKE2s hashing state
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Blake2sError {
    /// Output length is not in `1..=32` or key is longer than 32 bytes
    #[error(
        "Invalid parameters: output length {out_len} must be within 1..=32 and key length \
        {key_len} must not exceed 32"
    )]
    InvalidParameters {
        /// Requested output length
        out_len: usize,
        /// Length of the provided key
        key_len: usize,
    },
    /// Hashing context was already finalized and can't be used anymore
    #[error("Hashing context was already finalized")]
    InvalidState,
}

/// All-in-one keyed hashing with the output length equal to the length of `out`.
///
/// Empty `key` means unkeyed hashing. Returns [`Blake2sError::InvalidParameters`] if `out` is empty
/// or longer than [`OUT_LEN`], or `key` is longer than [`KEY_LEN`], in which case `out` is left
/// untouched.
pub fn blake2s(out: &mut [u8], key: &[u8], input: &[u8]) -> Result<(), Blake2sError> {
    let mut hasher = Blake2s::new_keyed(out.len(), key)?;
    hasher.update(input);
    out.copy_from_slice(hasher.finalize().as_bytes());

    Ok(())
}

/// Unkeyed BLAKE2s-256 of `input`
#[inline]
pub fn blake2s_256(input: &[u8]) -> [u8; OUT_LEN] {
    let mut hasher = Blake2s::default();
    hasher.update(input);
    hasher.finalize().into_array()
}
