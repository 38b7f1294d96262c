use std::io::Write;

use base91_core::{
    checked_length, decode, decode_to_vec, decoded_length, encode, encode_to_string,
    encode_to_vec, encoded_length, is_valid_text, Base91Error, Codec, DecoderWriter,
    EncoderWriter, Progress, Tier, MAX_ENCODE_LENGTH,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SENTINEL: u8 = 0xAA;

/// Deterministic pseudo-random bytes.
fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut x = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x >> 40) as u8
        })
        .collect()
}

/// Encode into a sentinel-filled buffer with slack and check nothing past
/// `written` was touched.
fn encode_checked(codec: &Codec, data: &[u8]) -> Vec<u8> {
    let expected = encoded_length(data.len()).unwrap();
    let mut out = vec![SENTINEL; expected + 32];
    let progress = codec.encode(data, &mut out, true).unwrap();
    assert_eq!(progress, Progress { consumed: data.len(), written: expected });
    assert!(out[expected..].iter().all(|&b| b == SENTINEL), "overrun at {}", data.len());
    out.truncate(expected);
    out
}

fn decode_checked(codec: &Codec, text: &[u8]) -> Vec<u8> {
    let expected = decoded_length(text.len()).unwrap();
    let mut out = vec![SENTINEL; expected + 32];
    let progress = codec.decode(text, &mut out, true).unwrap();
    assert_eq!(progress, Progress { consumed: text.len(), written: expected });
    assert!(out[expected..].iter().all(|&b| b == SENTINEL), "overrun at {}", text.len());
    out.truncate(expected);
    out
}

// ===========================================================================
// Known vectors
// ===========================================================================

#[test]
fn empty_input() {
    let mut out = [SENTINEL; 4];
    assert_eq!(encode(&[], &mut out, true).unwrap(), Progress::default());
    assert_eq!(decode(&[], &mut out, true).unwrap(), Progress::default());
    assert_eq!(out, [SENTINEL; 4]);
    assert_eq!(encode_to_string(&[]).unwrap(), "");
}

#[test]
fn zero_block_is_sixteen_hashes() {
    assert_eq!(encode_to_string(&[0u8; 13]).unwrap(), "#".repeat(16));
    assert_eq!(decode_to_vec(&[b'#'; 16]).unwrap(), vec![0u8; 13]);
}

#[test]
fn single_ff_byte() {
    // 255 = 2 * 91 + 73
    let text = encode_to_vec(&[0xFF]).unwrap();
    assert_eq!(text, vec![b'#' + 73, b'#' + 2]);
    assert_eq!(decode_to_vec(&text).unwrap(), vec![0xFF]);
}

#[test]
fn all_ones_block() {
    // every group is 8191 = 90 * 91 + 1
    let text = encode_to_vec(&[0xFF; 13]).unwrap();
    assert_eq!(text, b"$}".repeat(8));
}

#[test]
fn substitute_symbol_appears_for_digit_57() {
    let value: u16 = 57 * 91 + 57;
    let text = encode_to_vec(&value.to_le_bytes()).unwrap();
    assert_eq!(&text[..2], b"~~");
    assert!(!text.contains(&b'\\'));
    assert_eq!(decode_to_vec(&text).unwrap(), value.to_le_bytes());
}

#[test]
fn text_length_17_is_invalid() {
    let mut out = [0u8; 64];
    assert_eq!(
        decode(&[b'#'; 17], &mut out, true),
        Err(Base91Error::InvalidLength { length: 17 })
    );
}

#[test]
fn destination_too_short() {
    let data = noise(100, 1);
    let mut out = vec![SENTINEL; encoded_length(100).unwrap() - 1];
    let err = encode(&data, &mut out, true).unwrap_err();
    assert_eq!(
        err,
        Base91Error::DestinationTooShort {
            required: out.len() + 1,
            actual: out.len()
        }
    );
    assert!(out.iter().all(|&b| b == SENTINEL));
    assert!(err.to_string().contains("destination too short"));
}

// ===========================================================================
// Length arithmetic
// ===========================================================================

#[test]
fn length_tables() {
    let table = [0, 2, 3, 4, 5, 7, 8, 9, 10, 12, 13, 14, 15];
    for n in 0..=1000usize {
        assert_eq!(encoded_length(n).unwrap(), n / 13 * 16 + table[n % 13]);
    }
    for n in 0..=1000usize {
        assert_eq!(decoded_length(n).is_none(), matches!(n % 16, 1 | 6 | 11));
    }
}

#[test]
fn maximum_length() {
    assert_eq!(encoded_length(MAX_ENCODE_LENGTH).unwrap(), i32::MAX as usize);
    assert!(matches!(
        encoded_length(MAX_ENCODE_LENGTH + 1),
        Err(Base91Error::LengthExceedsMaximum { .. })
    ));
    assert_eq!(checked_length(-5), Err(Base91Error::NegativeLength { length: -5 }));
}

// ===========================================================================
// Round trips
// ===========================================================================

#[test]
fn roundtrip_every_length_up_to_1000() {
    let codec = Codec::new();
    for len in 0..=1000 {
        let data = noise(len, len as u64);
        let text = encode_checked(&codec, &data);
        assert!(is_valid_text(&text), "length {len}");
        assert_eq!(decode_checked(&codec, &text), data, "length {len}");
    }
}

#[test]
fn every_tier_matches_scalar() {
    let scalar = Codec::with_tier(Tier::Scalar).unwrap();
    for tier in Tier::available() {
        let codec = Codec::with_tier(tier).unwrap();
        for len in (0..300).chain([1000, 4096, 10_007]) {
            let data = noise(len, 99);
            let text = encode_checked(&codec, &data);
            assert_eq!(text, encode_checked(&scalar, &data), "{tier} encode {len}");
            assert_eq!(decode_checked(&codec, &text), data, "{tier} decode {len}");
        }
    }
}

#[test]
fn out_of_alphabet_decode_is_tier_independent() {
    let junk: Vec<u8> = (0..=255u8).cycle().take(16 * 20 + 9).collect();
    let scalar = Codec::with_tier(Tier::Scalar).unwrap();
    let mut expected = vec![0u8; decoded_length(junk.len()).unwrap()];
    scalar.decode(&junk, &mut expected, true).unwrap();
    for tier in Tier::available() {
        let mut out = vec![0u8; expected.len()];
        Codec::with_tier(tier).unwrap().decode(&junk, &mut out, true).unwrap();
        assert_eq!(out, expected, "{tier}");
    }
    assert!(!is_valid_text(&junk));
}

#[test]
fn unsupported_tier_is_reported() {
    for tier in Tier::ALL.into_iter().filter(|t| !t.is_supported()) {
        assert_eq!(Codec::with_tier(tier), Err(Base91Error::UnsupportedTier { tier }));
    }
}

// ===========================================================================
// Streaming
// ===========================================================================

/// Drive a stream in two calls split at `split`, carrying unconsumed input
/// over exactly as a caller would.
fn encode_in_two(data: &[u8], split: usize) -> Vec<u8> {
    let mut out = vec![0u8; encoded_length(data.len()).unwrap()];
    let first = encode(&data[..split], &mut out, false).unwrap();
    assert_eq!(first.consumed % 13, 0);
    assert_eq!(first.written, first.consumed / 13 * 16);
    let last = encode(&data[first.consumed..], &mut out[first.written..], true).unwrap();
    assert_eq!(first.written + last.written, out.len());
    out
}

fn decode_in_two(text: &[u8], split: usize) -> Vec<u8> {
    let mut out = vec![0u8; decoded_length(text.len()).unwrap()];
    let first = decode(&text[..split], &mut out, false).unwrap();
    assert_eq!(first.consumed % 16, 0);
    let last = decode(&text[first.consumed..], &mut out[first.written..], true).unwrap();
    assert_eq!(first.written + last.written, out.len());
    out
}

#[test]
fn streaming_matches_one_shot_at_every_split() {
    let data = noise(200, 7);
    let text = encode_to_vec(&data).unwrap();
    for split in 0..=data.len() {
        assert_eq!(encode_in_two(&data, split), text, "encode split {split}");
    }
    for split in 0..=text.len() {
        assert_eq!(decode_in_two(&text, split), data, "decode split {split}");
    }
}

#[test]
fn non_final_below_one_block_is_a_no_op() {
    let mut out = [SENTINEL; 32];
    for len in 0..13 {
        assert_eq!(encode(&noise(len, 3), &mut out, false).unwrap(), Progress::default());
    }
    for len in 0..16 {
        assert_eq!(decode(&vec![b'#'; len], &mut out, false).unwrap(), Progress::default());
    }
    assert_eq!(out, [SENTINEL; 32]);
}

#[test]
fn writers_roundtrip() {
    let data = noise(3333, 11);
    let mut enc = EncoderWriter::new(Vec::new());
    for chunk in data.chunks(7) {
        enc.write_all(chunk).unwrap();
    }
    let text = enc.finish().unwrap();
    assert_eq!(text, encode_to_vec(&data).unwrap());

    let mut dec = DecoderWriter::with_codec(Vec::new(), Codec::with_tier(Tier::Scalar).unwrap());
    for chunk in text.chunks(11) {
        dec.write_all(chunk).unwrap();
    }
    assert_eq!(dec.finish().unwrap(), data);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_matches_sequential() {
    let data = noise(1_000_003, 5);
    let text = base91_core::encode_parallel(&data).unwrap();
    assert_eq!(text, encode_to_vec(&data).unwrap());
    assert_eq!(base91_core::decode_parallel(&text).unwrap(), data);
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn prop_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let text = encode_to_vec(&data).unwrap();
        prop_assert_eq!(text.len(), encoded_length(data.len()).unwrap());
        prop_assert!(is_valid_text(&text));
        prop_assert_eq!(decode_to_vec(&text).unwrap(), data);
    }

    #[test]
    fn prop_streaming_split(data in proptest::collection::vec(any::<u8>(), 0..512), split in 0usize..512) {
        let split = split.min(data.len());
        prop_assert_eq!(encode_in_two(&data, split), encode_to_vec(&data).unwrap());
    }

    #[test]
    fn prop_valid_text_decodes(len in 0usize..400, seed in any::<u64>()) {
        let symbols: Vec<u8> = noise(len, seed)
            .into_iter()
            .map(|b| base91_core::alphabet::digit_to_symbol(b % 91))
            .collect();
        let valid = decoded_length(len).is_some();
        prop_assert_eq!(is_valid_text(&symbols), valid);
        prop_assert_eq!(decode_to_vec(&symbols).is_ok(), valid);
    }
}
