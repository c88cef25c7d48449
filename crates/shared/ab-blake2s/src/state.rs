//! Streaming BLAKE2s state

#[cfg(test)]
mod tests;

use crate::portable::compress_in_place;
use crate::{BLOCK_LEN, BlockBytes, Blake2sDigest, Blake2sError, CVWords, IV, KEY_LEN, OUT_LEN};
use core::fmt;
use zeroize::Zeroize;

/// Parameter block word: digest length, key length, fanout = 1, depth = 1
#[inline(always)]
const fn parameter_word(out_len: u8, key_len: u8) -> u32 {
    0x01010000 ^ ((key_len as u32) << 8) ^ out_len as u32
}

/// Incremental BLAKE2s hasher.
///
/// Created with [`Blake2s::new()`], [`Blake2s::new_keyed()`] or [`Blake2s::default()`] (unkeyed,
/// 32 bytes of output), fed with any number of [`Blake2s::update()`] calls and consumed by
/// [`Blake2s::finalize()`].
///
/// Internal state is wiped on drop, which includes the key for keyed hashing.
#[derive(Clone)]
pub struct Blake2s {
    cv: CVWords,
    /// Bytes compressed so far, including the key block
    counter: u64,
    buf: BlockBytes,
    buf_len: u8,
    out_len: u8,
    keyed: bool,
}

impl Drop for Blake2s {
    fn drop(&mut self) {
        self.cv.zeroize();
        self.buf.zeroize();
    }
}

// Don't derive(Debug), because the state may be secret.
impl fmt::Debug for Blake2s {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blake2s")
            .field("count", &self.count())
            .field("out_len", &self.out_len)
            .field("keyed", &self.keyed)
            .finish()
    }
}

impl Default for Blake2s {
    #[inline]
    fn default() -> Self {
        Self::with_valid_params(OUT_LEN as u8, &[])
    }
}

impl Blake2s {
    /// Create unkeyed hasher with `out_len` bytes of output.
    ///
    /// `out_len` must be within `1..=32`.
    #[inline]
    pub fn new(out_len: usize) -> Result<Self, Blake2sError> {
        Self::new_keyed(out_len, &[])
    }

    /// Create hasher with `out_len` bytes of output keyed with `key`.
    ///
    /// `out_len` must be within `1..=32`, `key` must not be longer than 32 bytes. Empty key is the
    /// same as unkeyed hashing.
    pub fn new_keyed(out_len: usize, key: &[u8]) -> Result<Self, Blake2sError> {
        if out_len == 0 || out_len > OUT_LEN || key.len() > KEY_LEN {
            return Err(Blake2sError::InvalidParameters {
                out_len,
                key_len: key.len(),
            });
        }

        Ok(Self::with_valid_params(out_len as u8, key))
    }

    fn with_valid_params(out_len: u8, key: &[u8]) -> Self {
        let mut cv = *IV;
        cv[0] ^= parameter_word(out_len, key.len() as u8);

        let mut state = Self {
            cv,
            counter: 0,
            buf: [0; BLOCK_LEN],
            buf_len: 0,
            out_len,
            keyed: !key.is_empty(),
        };

        if state.keyed {
            // Key is the first zero-padded block of the message. It is not compressed here since
            // only `update()` or `finalize()` know whether it is the last block or not.
            state.buf[..key.len()].copy_from_slice(key);
            state.buf_len = BLOCK_LEN as u8;
        }

        state
    }

    /// Output length in bytes
    #[inline(always)]
    pub fn out_len(&self) -> usize {
        usize::from(self.out_len)
    }

    /// Number of message bytes absorbed so far, not counting the key block
    #[inline]
    pub fn count(&self) -> u64 {
        let total = self.counter.wrapping_add(u64::from(self.buf_len));
        if self.keyed {
            total.wrapping_sub(BLOCK_LEN as u64)
        } else {
            total
        }
    }

    fn fill_buf(&mut self, input: &mut &[u8]) {
        let buf_len = usize::from(self.buf_len);
        let take = (BLOCK_LEN - buf_len).min(input.len());
        let (head, tail) = input.split_at(take);
        self.buf[buf_len..][..take].copy_from_slice(head);
        self.buf_len += take as u8;
        *input = tail;
    }

    /// Absorb more input.
    ///
    /// Full blocks are only compressed once it is known that they are not the last ones, so the
    /// last (possibly full) block always stays buffered until [`Self::finalize()`].
    pub fn update(&mut self, mut input: &[u8]) -> &mut Self {
        if self.buf_len > 0 {
            self.fill_buf(&mut input);
            if !input.is_empty() {
                debug_assert_eq!(usize::from(self.buf_len), BLOCK_LEN);
                self.counter = self.counter.wrapping_add(BLOCK_LEN as u64);
                compress_in_place(&mut self.cv, &self.buf, self.counter, false);
                self.buf_len = 0;
            }
        }

        // Compress directly from the input slice when full blocks are available
        while input.len() > BLOCK_LEN {
            debug_assert_eq!(self.buf_len, 0);
            let Some((block, rest)) = input.split_first_chunk::<BLOCK_LEN>() else {
                break;
            };
            self.counter = self.counter.wrapping_add(BLOCK_LEN as u64);
            compress_in_place(&mut self.cv, block, self.counter, false);
            input = rest;
        }

        self.fill_buf(&mut input);
        debug_assert!(input.is_empty());
        self
    }

    /// Pad and compress the last block, producing the digest
    pub fn finalize(mut self) -> Blake2sDigest {
        let buf_len = usize::from(self.buf_len);
        self.counter = self.counter.wrapping_add(buf_len as u64);
        self.buf[buf_len..].fill(0);
        compress_in_place(&mut self.cv, &self.buf, self.counter, true);

        Blake2sDigest::from_words(&self.cv, self.out_len)
    }
}
