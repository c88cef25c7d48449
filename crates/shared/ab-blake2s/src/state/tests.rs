use crate::portable::compress_in_place;
use crate::{
    BLOCK_LEN, BlockBytes, Blake2s, Blake2sDigest, Blake2sError, KEY_LEN, OUT_LEN, blake2s,
    blake2s_256,
};
use blake2::digest::consts::U16;
use blake2::digest::{Mac, Update, VariableOutput};
use blake2::{Blake2sMac, Blake2sMac256, Blake2sVar};
use hex_literal::hex;

// Interesting input lengths to run tests on.
const TEST_CASES: &[usize] = &[
    0,
    1,
    2,
    3,
    4,
    5,
    6,
    7,
    8,
    BLOCK_LEN - 1,
    BLOCK_LEN,
    BLOCK_LEN + 1,
    2 * BLOCK_LEN - 1,
    2 * BLOCK_LEN,
    2 * BLOCK_LEN + 1,
    16 * BLOCK_LEN - 1,
    16 * BLOCK_LEN,
    16 * BLOCK_LEN + 1,
];

const TEST_CASES_MAX: usize = 16 * BLOCK_LEN + 1;

const TEST_KEY: [u8; KEY_LEN] = *b"whats the Elvish word for friend";

/// Paint the input with a repeating byte pattern. We use a cycle length of 251, because that's the
/// largest prime number less than 256. This makes it unlikely to swapping any two adjacent input
/// blocks will give the same answer.
fn test_input() -> [u8; TEST_CASES_MAX] {
    core::array::from_fn(|i| (i % 251) as u8)
}

fn hash(out_len: usize, key: &[u8], input: &[u8]) -> [u8; OUT_LEN] {
    let mut hasher = Blake2s::new_keyed(out_len, key).unwrap();
    hasher.update(input);
    let mut out = [0; OUT_LEN];
    out[..out_len].copy_from_slice(hasher.finalize().as_bytes());
    out
}

#[test]
fn test_known_answers() {
    assert_eq!(
        blake2s_256(b""),
        hex!("69217a3079908094e11121d042354a7c1f55b6482ca1a51e1b250dfd1ed0eef9")
    );
    assert_eq!(
        blake2s_256(b"abc"),
        hex!("508c5e8c327c14e2e1a72ba34eeb452f37458b209ed63a294d999b4c86675982")
    );

    // Keyed vectors from the reference BLAKE2 test suite
    let key = core::array::from_fn::<u8, KEY_LEN, _>(|i| i as u8);
    assert_eq!(
        hash(OUT_LEN, &key, &[]),
        hex!("48a8997da407876b3d79c0d92325ad3b89cbb754d86ab71aee047ad345fd2c49")
    );
    assert_eq!(
        hash(OUT_LEN, &key, &[0]),
        hex!("40d15fee7c328830166ac3f918650f807e7e01e177258cdc0a39b11f598066f1")
    );
}

#[test]
fn test_compare_with_upstream() {
    let input_buf = test_input();

    for &case in TEST_CASES {
        let input = &input_buf[..case];

        // regular, all output lengths
        for out_len in 1..=OUT_LEN {
            let mut expected = [0; OUT_LEN];
            let mut upstream = Blake2sVar::new(out_len).unwrap();
            upstream.update(input);
            upstream
                .finalize_variable(&mut expected[..out_len])
                .unwrap();

            assert_eq!(hash(out_len, &[], input), expected, "{case} {out_len}");
        }

        // keyed
        let mut upstream = <Blake2sMac256 as Mac>::new_from_slice(&TEST_KEY).unwrap();
        Mac::update(&mut upstream, input);
        assert_eq!(
            upstream.finalize().into_bytes().as_slice(),
            &hash(OUT_LEN, &TEST_KEY, input),
            "{case}"
        );

        // keyed, short output
        let mut upstream = <Blake2sMac<U16> as Mac>::new_from_slice(&TEST_KEY).unwrap();
        Mac::update(&mut upstream, input);
        assert_eq!(
            upstream.finalize().into_bytes().as_slice(),
            &hash(16, &TEST_KEY, input)[..16],
            "{case}"
        );
    }
}

#[test]
fn test_chunking_invariance() {
    let input_buf = test_input();
    let input = &input_buf[..3 * BLOCK_LEN];

    for key in [&[][..], &TEST_KEY[..]] {
        let expected = hash(OUT_LEN, key, input);

        for split in [63, 64, 65, 128, 129] {
            let mut hasher = Blake2s::new_keyed(OUT_LEN, key).unwrap();
            let (first, second) = input.split_at(split);
            hasher.update(first).update(second);
            assert_eq!(hasher.finalize().as_bytes(), &expected, "{split}");
        }

        // Byte at a time
        let mut hasher = Blake2s::new_keyed(OUT_LEN, key).unwrap();
        for byte in input {
            hasher.update(core::slice::from_ref(byte));
        }
        assert_eq!(hasher.finalize().as_bytes(), &expected);

        // Block-sized pieces with empty updates in between
        let mut hasher = Blake2s::new_keyed(OUT_LEN, key).unwrap();
        for block in input.chunks(BLOCK_LEN) {
            hasher.update(&[]).update(block).update(&[]);
        }
        assert_eq!(hasher.finalize().as_bytes(), &expected);
    }
}

#[test]
fn test_parameter_validation() {
    let key = [0xa5; KEY_LEN + 1];

    assert_eq!(
        Blake2s::new(0).unwrap_err(),
        Blake2sError::InvalidParameters {
            out_len: 0,
            key_len: 0
        }
    );
    assert_eq!(
        Blake2s::new(OUT_LEN + 1).unwrap_err(),
        Blake2sError::InvalidParameters {
            out_len: 33,
            key_len: 0
        }
    );
    assert_eq!(
        Blake2s::new_keyed(OUT_LEN, &key).unwrap_err(),
        Blake2sError::InvalidParameters {
            out_len: 32,
            key_len: 33
        }
    );

    for out_len in [1, 16, 32] {
        for key_len in [0, 16, 32] {
            let hasher = Blake2s::new_keyed(out_len, &key[..key_len]).unwrap();
            assert_eq!(hasher.out_len(), out_len);
            assert_eq!(hasher.finalize().as_bytes().len(), out_len);
        }
    }

    // One-shot propagates the same error and leaves output untouched
    let mut out = [0xff; OUT_LEN + 1];
    assert_eq!(
        blake2s(&mut out, &[], b"abc").unwrap_err(),
        Blake2sError::InvalidParameters {
            out_len: 33,
            key_len: 0
        }
    );
    assert_eq!(out, [0xff; OUT_LEN + 1]);
    assert!(blake2s(&mut [], &[], b"abc").is_err());
    assert!(blake2s(&mut out[..OUT_LEN], &key, b"abc").is_err());
}

#[test]
fn test_one_shot() {
    let input_buf = test_input();

    for &case in TEST_CASES {
        let input = &input_buf[..case];

        let mut out = [0; OUT_LEN];
        blake2s(&mut out, &[], input).unwrap();
        assert_eq!(out, blake2s_256(input), "{case}");

        let mut out = [0; 20];
        blake2s(&mut out, &TEST_KEY[..20], input).unwrap();
        assert_eq!(out, hash(20, &TEST_KEY[..20], input)[..20], "{case}");
    }
}

#[test]
fn test_key_and_length_sensitivity() {
    let message = b"The quick brown fox jumps over the lazy dog";
    let other_key = [0x42; KEY_LEN];

    let unkeyed = hash(OUT_LEN, &[], message);
    let keyed = hash(OUT_LEN, &TEST_KEY, message);
    let other_keyed = hash(OUT_LEN, &other_key, message);
    assert_ne!(unkeyed, keyed);
    assert_ne!(keyed, other_keyed);
    assert_eq!(keyed, hash(OUT_LEN, &TEST_KEY, message));

    // Output length is a part of the parameter block, so shorter digest is not a prefix
    let short = hash(16, &[], message);
    assert_ne!(short[..16], unkeyed[..16]);
    assert_eq!(short[16..], [0; 16]);
}

#[test]
fn test_count() {
    let input_buf = test_input();

    for key in [&[][..], &TEST_KEY[..]] {
        let mut hasher = Blake2s::new_keyed(OUT_LEN, key).unwrap();
        assert_eq!(hasher.count(), 0);

        let mut total = 0;
        for &case in TEST_CASES {
            hasher.update(&input_buf[..case]);
            total += case as u64;
            assert_eq!(hasher.count(), total);
        }
    }
}

#[test]
fn test_key_block_is_deferred() {
    // Key alone is a single full block that must be compressed as the last one
    let keyed_empty = hash(OUT_LEN, &TEST_KEY, &[]);

    let mut hasher = Blake2s::new_keyed(OUT_LEN, &TEST_KEY).unwrap();
    hasher.update(&[]);
    assert_eq!(hasher.finalize().as_bytes(), &keyed_empty);

    // Short key is zero-padded to the full block
    let input_buf = test_input();
    for &case in TEST_CASES {
        let input = &input_buf[..case];

        let mut upstream = <Blake2sMac256 as Mac>::new_from_slice(&TEST_KEY[..1]).unwrap();
        Mac::update(&mut upstream, input);
        assert_eq!(
            upstream.finalize().into_bytes().as_slice(),
            &hash(OUT_LEN, &TEST_KEY[..1], input),
            "{case}"
        );
    }
}

#[test]
fn test_counter_carry_into_high_word() {
    let input_buf = test_input();
    let input = &input_buf[..2 * BLOCK_LEN + 1];
    let first_block = BlockBytes::try_from(&input[..BLOCK_LEN]).unwrap();
    let second_block = BlockBytes::try_from(&input[BLOCK_LEN..2 * BLOCK_LEN]).unwrap();
    let mut last_block = [0; BLOCK_LEN];
    last_block[0] = input[2 * BLOCK_LEN];

    // Half a block before the low word overflows
    let start = (1 << 32) - (BLOCK_LEN as u64 / 2);

    let expected_with_counters = |counters: [u64; 3]| {
        let mut cv = Blake2s::default().cv;
        compress_in_place(&mut cv, &first_block, counters[0], false);
        compress_in_place(&mut cv, &second_block, counters[1], false);
        compress_in_place(&mut cv, &last_block, counters[2], true);
        Blake2sDigest::from_words(&cv, OUT_LEN as u8)
    };
    // Low word `0x20`, high word `1` for the first block
    let expected = expected_with_counters([0x1_0000_0020, 0x1_0000_0060, 0x1_0000_0061]);
    // Carry lost, only the low word advanced
    assert_ne!(expected, expected_with_counters([0x20, 0x60, 0x61]));

    // Single update compressing directly from input, then through the buffer
    for split in [0, BLOCK_LEN] {
        let mut hasher = Blake2s::default();
        hasher.counter = start;
        let (first, second) = input.split_at(split);
        hasher.update(first).update(second);
        assert_eq!(hasher.counter, 0x1_0000_0060, "{split}");
        assert_eq!(hasher.finalize(), expected, "{split}");
    }
}
