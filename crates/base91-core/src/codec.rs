//! The streaming driver: length checks, capacity checks, then blocks and
//! tail through the kernel of one tier.

use crate::decode_impl::{decode_blocks, decode_tail};
use crate::encode_impl::{encode_blocks, encode_tail};
use crate::error::Base91Error;
use crate::length::{
    decoded_length, encoded_length, validate_text, BLOCK_BYTES, BLOCK_SYMBOLS, MAX_ENCODE_LENGTH,
};
use crate::simd::dispatch;
use crate::tier::Tier;

/// How much of the input a call consumed and how much output it wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Input bytes (or symbols) processed.
    pub consumed: usize,
    /// Output symbols (or bytes) written to the front of the destination.
    pub written: usize,
}

/// An encoder/decoder pinned to one hardware tier.
///
/// [`Codec::new`] picks the widest tier the host supports. Every tier
/// produces identical output, so [`Codec::with_tier`] only matters for
/// benchmarking and equivalence testing.
///
/// # Examples
///
/// ```
/// use base91_core::{Codec, Tier};
///
/// let codec = Codec::with_tier(Tier::Scalar).unwrap();
/// let mut text = [0u8; 16];
/// let progress = codec.encode(&[0u8; 13], &mut text, true).unwrap();
/// assert_eq!(progress.written, 16);
/// assert_eq!(&text, b"################");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    tier: Tier,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec {
    /// A codec using the detected tier.
    pub fn new() -> Self {
        Codec {
            tier: Tier::detect(),
        }
    }

    /// A codec forced to `tier`.
    ///
    /// # Errors
    ///
    /// Returns [`Base91Error::UnsupportedTier`] if this host cannot run it.
    pub fn with_tier(tier: Tier) -> Result<Self, Base91Error> {
        if !tier.is_supported() {
            return Err(Base91Error::UnsupportedTier { tier });
        }
        Ok(Codec { tier })
    }

    /// The tier this codec runs.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Encode `input` into the front of `output`.
    ///
    /// With `is_final == false` only whole 13-byte blocks are consumed and
    /// the caller keeps the rest for a later call; fewer than 13 bytes
    /// consume nothing. With `is_final == true` the tail is encoded too.
    ///
    /// # Errors
    ///
    /// - [`Base91Error::LengthExceedsMaximum`] if `input` is longer than
    ///   [`MAX_ENCODE_LENGTH`].
    /// - [`Base91Error::DestinationTooShort`] if `output` cannot hold the
    ///   result; nothing is written in that case.
    pub fn encode(
        &self,
        input: &[u8],
        output: &mut [u8],
        is_final: bool,
    ) -> Result<Progress, Base91Error> {
        if !is_final {
            if input.len() < BLOCK_BYTES {
                return Ok(Progress::default());
            }
            if input.len() > MAX_ENCODE_LENGTH {
                return Err(Base91Error::LengthExceedsMaximum {
                    length: input.len(),
                    max: MAX_ENCODE_LENGTH,
                });
            }
        }

        let consumed = if is_final {
            input.len()
        } else {
            input.len() / BLOCK_BYTES * BLOCK_BYTES
        };
        let written = encoded_length(consumed)?;
        check_capacity(written, output.len())?;

        let (blocks, tail) = input[..consumed].split_at(consumed / BLOCK_BYTES * BLOCK_BYTES);
        let (out_blocks, out_tail) =
            output[..written].split_at_mut(blocks.len() / BLOCK_BYTES * BLOCK_SYMBOLS);
        dispatch!(self.tier, |k| {
            encode_blocks(k, blocks, out_blocks);
            encode_tail(k, tail, out_tail);
        });
        Ok(Progress { consumed, written })
    }

    /// Decode `text` into the front of `output`.
    ///
    /// Streaming follows [`Codec::encode`] with 16-symbol blocks. Symbols
    /// are not validated; bytes outside the alphabet produce unspecified
    /// (but tier-independent) output. Use [`crate::is_valid_text`] or
    /// [`crate::decode_to_vec`] when the input is untrusted.
    ///
    /// # Errors
    ///
    /// - [`Base91Error::InvalidLength`] if a final `text` length is 1, 6
    ///   or 11 modulo 16.
    /// - [`Base91Error::DestinationTooShort`] if `output` cannot hold the
    ///   result; nothing is written in that case.
    pub fn decode(
        &self,
        text: &[u8],
        output: &mut [u8],
        is_final: bool,
    ) -> Result<Progress, Base91Error> {
        if !is_final && text.len() < BLOCK_SYMBOLS {
            return Ok(Progress::default());
        }

        let consumed = if is_final {
            text.len()
        } else {
            text.len() / BLOCK_SYMBOLS * BLOCK_SYMBOLS
        };
        let written =
            decoded_length(consumed).ok_or(Base91Error::InvalidLength { length: consumed })?;
        check_capacity(written, output.len())?;

        let (blocks, tail) = text[..consumed].split_at(consumed / BLOCK_SYMBOLS * BLOCK_SYMBOLS);
        let (out_blocks, out_tail) =
            output[..written].split_at_mut(blocks.len() / BLOCK_SYMBOLS * BLOCK_BYTES);
        dispatch!(self.tier, |k| {
            decode_blocks(k, blocks, out_blocks);
            decode_tail(k, tail, out_tail);
        });
        Ok(Progress { consumed, written })
    }

    /// Encode all of `input` into a new buffer.
    pub fn encode_to_vec(&self, input: &[u8]) -> Result<Vec<u8>, Base91Error> {
        let mut out = vec![0u8; encoded_length(input.len())?];
        self.encode(input, &mut out, true)?;
        Ok(out)
    }

    /// Validate `text`, then decode it into a new buffer.
    pub fn decode_to_vec(&self, text: &[u8]) -> Result<Vec<u8>, Base91Error> {
        validate_text(text)?;
        let mut out = vec![0u8; decoded_length(text.len()).unwrap_or_default()];
        self.decode(text, &mut out, true)?;
        Ok(out)
    }
}

#[inline]
fn check_capacity(required: usize, actual: usize) -> Result<(), Base91Error> {
    if actual < required {
        return Err(Base91Error::DestinationTooShort { required, actual });
    }
    Ok(())
}

/// Encode with the detected tier. See [`Codec::encode`].
///
/// # Examples
///
/// ```
/// use base91_core::encode;
///
/// let mut text = [0u8; 2];
/// let progress = encode(&[0xFF], &mut text, true).unwrap();
/// assert_eq!((progress.consumed, progress.written), (1, 2));
/// ```
pub fn encode(input: &[u8], output: &mut [u8], is_final: bool) -> Result<Progress, Base91Error> {
    Codec::new().encode(input, output, is_final)
}

/// Decode with the detected tier. See [`Codec::decode`].
///
/// # Examples
///
/// ```
/// use base91_core::{decode, Base91Error};
///
/// let mut out = [0u8; 32];
/// assert_eq!(
///     decode(&[b'#'; 17], &mut out, true),
///     Err(Base91Error::InvalidLength { length: 17 })
/// );
/// ```
pub fn decode(text: &[u8], output: &mut [u8], is_final: bool) -> Result<Progress, Base91Error> {
    Codec::new().decode(text, output, is_final)
}

/// Encode `input` into a freshly allocated symbol buffer.
pub fn encode_to_vec(input: &[u8]) -> Result<Vec<u8>, Base91Error> {
    Codec::new().encode_to_vec(input)
}

/// Encode `input` into a `String`.
///
/// # Examples
///
/// ```
/// let text = base91_core::encode_to_string(b"hello").unwrap();
/// assert_eq!(base91_core::decode_to_vec(text.as_bytes()).unwrap(), b"hello");
/// ```
pub fn encode_to_string(input: &[u8]) -> Result<String, Base91Error> {
    let bytes = encode_to_vec(input)?;
    String::from_utf8(bytes).map_err(|e| {
        let position = e.utf8_error().valid_up_to();
        Base91Error::InvalidSymbol {
            position,
            byte: e.as_bytes()[position],
        }
    })
}

/// Validate and decode `text` into a freshly allocated buffer.
///
/// # Errors
///
/// [`Base91Error::InvalidLength`] or [`Base91Error::InvalidSymbol`] for
/// text no encoder could have produced.
pub fn decode_to_vec(text: &[u8]) -> Result<Vec<u8>, Base91Error> {
    Codec::new().decode_to_vec(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_final_encode_consumes_whole_blocks() {
        let codec = Codec::new();
        let input = [7u8; 30];
        let mut out = [0u8; 64];
        let progress = codec.encode(&input, &mut out, false).unwrap();
        assert_eq!(progress, Progress { consumed: 26, written: 32 });
        assert_eq!(codec.encode(&input[..12], &mut out, false).unwrap(), Progress::default());
    }

    #[test]
    fn test_non_final_decode_consumes_whole_blocks() {
        let codec = Codec::new();
        let text = [b'#'; 40];
        let mut out = [0xAAu8; 40];
        let progress = codec.decode(&text, &mut out, false).unwrap();
        assert_eq!(progress, Progress { consumed: 32, written: 26 });
        assert!(out[..26].iter().all(|&b| b == 0));
        assert!(out[26..].iter().all(|&b| b == 0xAA));
        assert_eq!(codec.decode(&text[..15], &mut out, false).unwrap(), Progress::default());
    }

    #[test]
    fn test_short_destination_is_rejected_untouched() {
        let mut out = [0xAAu8; 17];
        assert_eq!(
            encode(&[1u8; 14], &mut out, true),
            Err(Base91Error::DestinationTooShort {
                required: 18,
                actual: 17
            })
        );
        assert!(out.iter().all(|&b| b == 0xAA));

        let mut out = [0u8; 12];
        assert_eq!(
            decode(&[b'#'; 16], &mut out, false),
            Err(Base91Error::DestinationTooShort {
                required: 13,
                actual: 12
            })
        );
    }

    #[test]
    fn test_non_final_decode_ignores_invalid_tail_length() {
        // 17 symbols: the lone trailing symbol stays with the caller
        let mut out = [0u8; 13];
        let progress = decode(&[b'#'; 17], &mut out, false).unwrap();
        assert_eq!(progress, Progress { consumed: 16, written: 13 });
    }

    #[test]
    fn test_scalar_codec_always_available() {
        assert_eq!(Codec::with_tier(Tier::Scalar).unwrap().tier(), Tier::Scalar);
        for tier in Tier::ALL {
            assert_eq!(Codec::with_tier(tier).is_ok(), tier.is_supported());
        }
    }

    #[test]
    fn test_encode_to_string_is_ascii() {
        let data: Vec<u8> = (0..=255u8).cycle().take(700).collect();
        for len in [0, 1, 12, 13, 255, 256, 700] {
            let text = encode_to_string(&data[..len]).unwrap();
            assert!(text.is_ascii());
            assert_eq!(text.as_bytes(), encode_to_vec(&data[..len]).unwrap());
        }
    }

    #[test]
    fn test_decode_to_vec_validates() {
        assert_eq!(
            decode_to_vec(b"#\\"),
            Err(Base91Error::InvalidSymbol {
                position: 1,
                byte: b'\\'
            })
        );
        assert_eq!(decode_to_vec(b"$$").unwrap(), vec![92]);
    }
}
