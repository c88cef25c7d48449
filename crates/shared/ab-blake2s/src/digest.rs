
use crate::{CVWords, OUT_LEN};
use crate::portable::le_bytes_from_words_32;
use core::fmt;

/// BLAKE2s digest of the output length the hasher was created with.
///
/// Bytes are stored inline, so the digest is `Copy` regardless of its length.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Blake2sDigest {
    // Bytes at `len..` are always zero
    bytes: [u8; OUT_LEN],
    len: u8,
}

impl fmt::Debug for Blake2sDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blake2sDigest({self:x})")
    }
}

impl fmt::Display for Blake2sDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::LowerHex for Blake2sDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl AsRef<[u8]> for Blake2sDigest {
    #[inline(always)]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Blake2sDigest {
    /// Extract the first `len` bytes of the chaining value in little-endian order
    #[inline]
    pub(crate) const fn from_words(cv: &CVWords, len: u8) -> Self {
        let all_bytes = le_bytes_from_words_32(cv);
        let mut bytes = [0; OUT_LEN];
        let mut i = 0;
        while i < len as usize {
            bytes[i] = all_bytes[i];
            i += 1;
        }

        Self { bytes, len }
    }

    /// Digest bytes, exactly as many as the output length of the hasher
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    /// Number of digest bytes
    #[inline(always)]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Always `false`, digests are at least one byte long
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Full backing array, zero-padded if output length is shorter than [`OUT_LEN`]
    #[inline(always)]
    pub(crate) const fn into_array(self) -> [u8; OUT_LEN] {
        self.bytes
    }
}
