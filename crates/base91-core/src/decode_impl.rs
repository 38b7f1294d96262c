//! Block and tail decoding.
//!
//! The inverse of [`crate::encode_impl`]: sixteen symbols become two lane
//! words, each compacted back to 52 packed bits, and the 104 bits are written
//! out as 13 little-endian bytes. Symbols are not validated here; anything
//! outside the alphabet decodes to deterministic garbage.

use crate::alphabet::decode_pair;
use crate::lanes::{merge32, merge64};
use crate::length::{BLOCK_BYTES, BLOCK_SYMBOLS, TAIL_BYTES};
use crate::simd::{pad_symbols, Kernel};

/// Reassemble 13 bytes from the two lane words of one block.
#[inline]
pub(crate) fn merge_block(lanes: [u64; 2]) -> [u8; BLOCK_BYTES] {
    let lo = merge64(lanes[0]);
    let hi = merge64(lanes[1]);
    let mut out = [0u8; BLOCK_BYTES];
    out[..8].copy_from_slice(&(lo | hi << 52).to_le_bytes());
    out[8..].copy_from_slice(&(hi >> 12).to_le_bytes()[..5]);
    out
}

/// Decode whole blocks. `input` is a multiple of 16 symbols and `output`
/// is exactly 13 bytes per block.
pub(crate) fn decode_blocks<K: Kernel>(k: K, input: &[u8], output: &mut [u8]) {
    debug_assert_eq!(input.len() % BLOCK_SYMBOLS, 0);
    debug_assert_eq!(output.len(), input.len() / BLOCK_SYMBOLS * BLOCK_BYTES);

    let (quads, rest) = input.as_chunks::<{ 4 * BLOCK_SYMBOLS }>();
    let (out_quads, out_rest) = output.as_chunks_mut::<{ 4 * BLOCK_BYTES }>();
    for (src, dst) in quads.iter().zip(out_quads.iter_mut()) {
        let lanes = k.decode64(src);
        let (blocks, _) = dst.as_chunks_mut::<BLOCK_BYTES>();
        for (block, pair) in blocks.iter_mut().zip(lanes.as_chunks::<2>().0) {
            *block = merge_block(*pair);
        }
    }

    // at most three blocks left: one pair and one single
    let (pairs, single) = rest.as_chunks::<{ 2 * BLOCK_SYMBOLS }>();
    let (out_pairs, out_single) = out_rest.as_chunks_mut::<{ 2 * BLOCK_BYTES }>();
    for (src, dst) in pairs.iter().zip(out_pairs.iter_mut()) {
        let [a, b, c, d] = k.decode32(src);
        dst[..BLOCK_BYTES].copy_from_slice(&merge_block([a, b]));
        dst[BLOCK_BYTES..].copy_from_slice(&merge_block([c, d]));
    }
    if let Some(src) = single.as_chunks::<BLOCK_SYMBOLS>().0.first() {
        out_single.copy_from_slice(&merge_block(k.decode16(src)));
    }
}

/// Decode a final tail of symbols (any length `TAIL_BYTES` accepts) into
/// the start of `output`. Returns the number of bytes written.
///
/// The tail is padded with the zero symbol to the kernel width, so padded
/// lanes contribute zero bits.
pub(crate) fn decode_tail<K: Kernel>(k: K, tail: &[u8], output: &mut [u8]) -> usize {
    let Some(n) = TAIL_BYTES.get(tail.len()).copied().flatten() else {
        unreachable!("tail of {} symbols was not length-checked", tail.len());
    };
    let out = &mut output[..n];
    match tail.len() {
        0 => {}
        2 => out[0] = decode_pair([tail[0], tail[1]]) as u8,
        3 | 4 => {
            let packed = merge32(k.decode8(&pad_symbols(tail)) as u32);
            out.copy_from_slice(&packed.to_le_bytes()[..n]);
        }
        5 | 7 | 8 => {
            let packed = merge64(k.decode8(&pad_symbols(tail)));
            out.copy_from_slice(&packed.to_le_bytes()[..n]);
        }
        _ => {
            let bytes = merge_block(k.decode16(&pad_symbols(tail)));
            out.copy_from_slice(&bytes[..n]);
        }
    }
    n
}
