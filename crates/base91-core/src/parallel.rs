//! Multi-threaded one-shot conversion on the global rayon pool.
//!
//! Input is cut at block boundaries, so every chunk but the last is pure
//! blocks and the output is byte-identical to the sequential path.

use rayon::prelude::*;

use crate::codec::Codec;
use crate::error::Base91Error;
use crate::length::{decoded_length, encoded_length, validate_text, BLOCK_BYTES, BLOCK_SYMBOLS};

/// Blocks per rayon task.
const CHUNK_BLOCKS: usize = 16 * 1024;

/// Encode `input` across the rayon pool.
///
/// # Errors
///
/// [`Base91Error::LengthExceedsMaximum`] for oversized input.
pub fn encode_parallel(input: &[u8]) -> Result<Vec<u8>, Base91Error> {
    let codec = Codec::new();
    let mut out = vec![0u8; encoded_length(input.len())?];
    input
        .par_chunks(CHUNK_BLOCKS * BLOCK_BYTES)
        .zip(out.par_chunks_mut(CHUNK_BLOCKS * BLOCK_SYMBOLS))
        .try_for_each(|(src, dst)| codec.encode(src, dst, true).map(drop))?;
    Ok(out)
}

/// Validate `text`, then decode it across the rayon pool.
///
/// # Errors
///
/// [`Base91Error::InvalidLength`] or [`Base91Error::InvalidSymbol`], as
/// for [`crate::decode_to_vec`].
pub fn decode_parallel(text: &[u8]) -> Result<Vec<u8>, Base91Error> {
    let codec = Codec::new();
    validate_text(text)?;
    let length = decoded_length(text.len()).ok_or(Base91Error::InvalidLength {
        length: text.len(),
    })?;
    let mut out = vec![0u8; length];
    text.par_chunks(CHUNK_BLOCKS * BLOCK_SYMBOLS)
        .zip(out.par_chunks_mut(CHUNK_BLOCKS * BLOCK_BYTES))
        .try_for_each(|(src, dst)| codec.decode(src, dst, true).map(drop))?;
    Ok(out)
}
