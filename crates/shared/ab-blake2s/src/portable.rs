//! Portable implementation of the BLAKE2s compression function.
//!
//! Everything here is `const fn` and operates on words, so it is usable in `const` contexts and
//! doesn't depend on the endianness of the platform.


use crate::{BlockBytes, BlockWords, CVBytes, CVWords, IV, SIGMA};

/// Number of rounds in BLAKE2s compression function
const ROUNDS: usize = SIGMA.len();

/// Converts bytes into `u32` words, the size matches BLAKE2s block
#[inline(always)]
const fn words_from_le_bytes_64(bytes: &BlockBytes) -> BlockWords {
    let mut out = [0; 16];
    let mut i = 0;
    while i < out.len() {
        out[i] = u32::from_le_bytes([
            bytes[i * 4],
            bytes[i * 4 + 1],
            bytes[i * 4 + 2],
            bytes[i * 4 + 3],
        ]);
        i += 1;
    }
    out
}

/// Converts chaining value words into bytes, the size matches BLAKE2s hash
#[inline(always)]
pub(crate) const fn le_bytes_from_words_32(words: &CVWords) -> CVBytes {
    let mut out = [0; 32];
    let mut i = 0;
    while i < out.len() {
        out[i] = (words[i / 4] >> (8 * (i % 4))) as u8;
        i += 1;
    }
    out
}

/// Quarter round mixing four words of the working vector with two message words
#[inline(always)]
const fn g(
    state: &mut BlockWords,
    a: usize,
    b: usize,
    c: usize,
    d: usize,
    x: u32,
    y: u32,
) {
    state[a] = state[a].wrapping_add(state[b]).wrapping_add(x);
    state[d] = (state[d] ^ state[a]).rotate_right(16);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_right(12);
    state[a] = state[a].wrapping_add(state[b]).wrapping_add(y);
    state[d] = (state[d] ^ state[a]).rotate_right(8);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_right(7);
}

#[inline(always)]
const fn round(state: &mut BlockWords, msg: &BlockWords, round: usize) {
    // Select the message schedule based on the round.
    let schedule = SIGMA[round];

    // Mix the columns.
    g(state, 0, 4, 8, 12, msg[schedule[0]], msg[schedule[1]]);
    g(state, 1, 5, 9, 13, msg[schedule[2]], msg[schedule[3]]);
    g(state, 2, 6, 10, 14, msg[schedule[4]], msg[schedule[5]]);
    g(state, 3, 7, 11, 15, msg[schedule[6]], msg[schedule[7]]);

    // Mix the diagonals.
    g(state, 0, 5, 10, 15, msg[schedule[8]], msg[schedule[9]]);
    g(state, 1, 6, 11, 12, msg[schedule[10]], msg[schedule[11]]);
    g(state, 2, 7, 8, 13, msg[schedule[12]], msg[schedule[13]]);
    g(state, 3, 4, 9, 14, msg[schedule[14]], msg[schedule[15]]);
}

#[inline]
const fn counter_low(counter: u64) -> u32 {
    counter as u32
}

#[inline]
const fn counter_high(counter: u64) -> u32 {
    (counter >> 32) as u32
}

#[inline(always)]
const fn compress_pre(
    cv: &CVWords,
    block_words: &BlockWords,
    counter: u64,
    last: bool,
) -> BlockWords {
    // Finalization flag only ever affects the working vector, never the chaining value
    let f0 = if last { u32::MAX } else { 0 };

    let mut state = [
        cv[0],
        cv[1],
        cv[2],
        cv[3],
        cv[4],
        cv[5],
        cv[6],
        cv[7],
        IV[0],
        IV[1],
        IV[2],
        IV[3],
        IV[4] ^ counter_low(counter),
        IV[5] ^ counter_high(counter),
        IV[6] ^ f0,
        IV[7],
    ];

    let mut r = 0;
    while r < ROUNDS {
        round(&mut state, block_words, r);
        r += 1;
    }

    state
}

/// Compress a single block into the chaining value.
///
/// `counter` is the total number of message bytes (including the key block) up to and including
/// this block, `last` must be set for the very last block of the message only.
pub(crate) const fn compress_in_place(
    cv: &mut CVWords,
    block: &BlockBytes,
    counter: u64,
    last: bool,
) {
    let block_words = words_from_le_bytes_64(block);
    let state = compress_pre(cv, &block_words, counter, last);

    let mut i = 0;
    while i < cv.len() {
        cv[i] ^= state[i] ^ state[i + 8];
        i += 1;
    }
}
