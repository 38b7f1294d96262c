//! Block and tail encoding.
//!
//! A 13-byte block holds eight 13-bit groups. Two overlapping little-endian
//! reads cover it: bytes `0..8` give groups 0-3 and bytes `5..13` shifted
//! right by 12 give groups 4-7 (bit 52 of the stream is bit 12 of byte 5).
//! Each read is split into 16-bit lanes and handed to the tier kernel.

use crate::alphabet::encode_pair;
use crate::lanes::{split32, split64};
use crate::length::{BLOCK_BYTES, BLOCK_SYMBOLS, TAIL_SYMBOLS};
use crate::simd::Kernel;

#[inline]
fn read_u16(src: &[u8]) -> u16 {
    let mut buf = [0u8; 2];
    buf.copy_from_slice(&src[..2]);
    u16::from_le_bytes(buf)
}

#[inline]
fn read_u32(src: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&src[..4]);
    u32::from_le_bytes(buf)
}

#[inline]
fn read_u64(src: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&src[..8]);
    u64::from_le_bytes(buf)
}

/// Split one full block into its two lane words.
#[inline]
fn block_lanes(block: &[u8; BLOCK_BYTES]) -> [u64; 2] {
    [split64(read_u64(block)), split64(read_u64(&block[5..]) >> 12)]
}

/// Encode whole blocks. `input` is a multiple of 13 bytes and `output` is
/// exactly 16 symbols per block.
pub(crate) fn encode_blocks<K: Kernel>(k: K, input: &[u8], output: &mut [u8]) {
    debug_assert_eq!(input.len() % BLOCK_BYTES, 0);
    debug_assert_eq!(output.len(), input.len() / BLOCK_BYTES * BLOCK_SYMBOLS);

    let (quads, rest) = input.as_chunks::<{ 4 * BLOCK_BYTES }>();
    let (out_quads, out_rest) = output.as_chunks_mut::<{ 4 * BLOCK_SYMBOLS }>();
    for (src, dst) in quads.iter().zip(out_quads.iter_mut()) {
        let (blocks, _) = src.as_chunks::<BLOCK_BYTES>();
        let [a, b] = block_lanes(&blocks[0]);
        let [c, d] = block_lanes(&blocks[1]);
        let [e, f] = block_lanes(&blocks[2]);
        let [g, h] = block_lanes(&blocks[3]);
        *dst = k.encode64([a, b, c, d, e, f, g, h]);
    }

    let (blocks, _) = rest.as_chunks::<BLOCK_BYTES>();
    match blocks {
        [] => {}
        [x] => out_rest.copy_from_slice(&k.encode16(block_lanes(x))),
        [x, y] => {
            let ([a, b], [c, d]) = (block_lanes(x), block_lanes(y));
            out_rest.copy_from_slice(&k.encode32([a, b, c, d]));
        }
        [x, y, z] => {
            let ([a, b], [c, d]) = (block_lanes(x), block_lanes(y));
            let (pair, single) = out_rest.split_at_mut(2 * BLOCK_SYMBOLS);
            pair.copy_from_slice(&k.encode32([a, b, c, d]));
            single.copy_from_slice(&k.encode16(block_lanes(z)));
        }
        _ => unreachable!("at most three blocks remain after the 52-byte loop"),
    }
}

/// Encode a final tail of 1..=12 bytes into exactly `TAIL_SYMBOLS[len]`
/// symbols at the start of `output`.
///
/// Every length reads only its own bytes, zero-extended to the narrowest
/// word that holds them; the last group of a tail may be partial and its
/// quotient symbol is dropped when the partial group is known to be below 91.
pub(crate) fn encode_tail<K: Kernel>(k: K, tail: &[u8], output: &mut [u8]) {
    let n = TAIL_SYMBOLS[tail.len()];
    let out = &mut output[..n];
    match tail.len() {
        0 => {}
        // one partial group, 8 bits
        1 => out.copy_from_slice(&encode_pair(u16::from(tail[0]))),
        // 13 + 3 bits
        2 => {
            let lanes = split32(u32::from(read_u16(tail)));
            out.copy_from_slice(&k.encode8(u64::from(lanes))[..n]);
        }
        // 13 + 11 bits
        3 => {
            let word = u32::from(read_u16(tail)) | u32::from(tail[2]) << 16;
            out.copy_from_slice(&k.encode8(u64::from(split32(word)))[..n]);
        }
        // 26 + 6 bits
        4 => {
            let lanes = split64(u64::from(read_u32(tail)));
            out.copy_from_slice(&k.encode8(lanes)[..n]);
        }
        // 39 + 1 bits
        5 => {
            let word = u64::from(read_u32(tail)) | u64::from(tail[4]) << 32;
            out.copy_from_slice(&k.encode8(split64(word))[..n]);
        }
        // 39 + 9 bits
        6 => {
            let word = u64::from(read_u32(tail)) | u64::from(read_u16(&tail[4..])) << 32;
            out.copy_from_slice(&k.encode8(split64(word))[..n]);
        }
        // 52 + 4 bits; the fifth group is whatever sits above bit 52
        7 => {
            let word = u64::from(read_u32(tail)) | u64::from(read_u32(&tail[3..])) << 24;
            out.copy_from_slice(&k.encode16([split64(word), word >> 52])[..n]);
        }
        // 52 + 12 bits
        8 => {
            let word = read_u64(tail);
            out.copy_from_slice(&k.encode16([split64(word), word >> 52])[..n]);
        }
        // 52 + 13 + 7 bits
        9 => {
            let high = split32(read_u32(&tail[5..]) >> 12);
            let lanes = [split64(read_u64(tail)), u64::from(high)];
            out.copy_from_slice(&k.encode16(lanes)[..n]);
        }
        // 52 + 26 + 2 bits
        10 => {
            let high = split64(u64::from(read_u32(&tail[6..])) >> 4);
            out.copy_from_slice(&k.encode16([split64(read_u64(tail)), high])[..n]);
        }
        // 52 + 26 + 10 bits
        11 => {
            let high = split64(read_u64(&tail[3..]) >> 28);
            out.copy_from_slice(&k.encode16([split64(read_u64(tail)), high])[..n]);
        }
        // 52 + 39 + 5 bits
        12 => {
            let high = split64(read_u64(&tail[4..]) >> 20);
            out.copy_from_slice(&k.encode16([split64(read_u64(tail)), high])[..n]);
        }
        len => unreachable!("tail of {len} bytes is a whole block"),
    }
}
