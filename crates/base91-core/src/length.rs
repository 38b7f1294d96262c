//! Exact length arithmetic and text validation.
//!
//! Every 13 input bytes become 16 symbols. A shorter tail has one fixed
//! symbol count, and three text tail lengths (1, 6 and 11 mod 16) cannot be
//! produced by the encoder at all.

use crate::alphabet::is_symbol;
use crate::error::Base91Error;

/// Bytes in one block.
pub const BLOCK_BYTES: usize = 13;

/// Symbols in one block.
pub const BLOCK_SYMBOLS: usize = 16;

/// Largest input accepted by the encoder; its encoded length is `i32::MAX`.
pub const MAX_ENCODE_LENGTH: usize = 1_744_830_463;

/// Symbols produced by a tail of `n` bytes, indexed by `n`.
pub(crate) const TAIL_SYMBOLS: [usize; BLOCK_BYTES] = [0, 2, 3, 4, 5, 7, 8, 9, 10, 12, 13, 14, 15];

/// Bytes recovered from a tail of `n` symbols, indexed by `n`.
pub(crate) const TAIL_BYTES: [Option<usize>; BLOCK_SYMBOLS] = [
    Some(0),
    None,
    Some(1),
    Some(2),
    Some(3),
    Some(4),
    None,
    Some(5),
    Some(6),
    Some(7),
    Some(8),
    None,
    Some(9),
    Some(10),
    Some(11),
    Some(12),
];

/// Exact number of symbols produced by encoding `length` bytes.
///
/// # Errors
///
/// Returns [`Base91Error::LengthExceedsMaximum`] if `length` is above
/// [`MAX_ENCODE_LENGTH`].
///
/// # Examples
///
/// ```
/// use base91_core::encoded_length;
/// assert_eq!(encoded_length(0).unwrap(), 0);
/// assert_eq!(encoded_length(1).unwrap(), 2);
/// assert_eq!(encoded_length(13).unwrap(), 16);
/// assert_eq!(encoded_length(14).unwrap(), 18);
/// ```
pub fn encoded_length(length: usize) -> Result<usize, Base91Error> {
    if length > MAX_ENCODE_LENGTH {
        return Err(Base91Error::LengthExceedsMaximum {
            length,
            max: MAX_ENCODE_LENGTH,
        });
    }
    let (blocks, tail) = (length / BLOCK_BYTES, length % BLOCK_BYTES);
    Ok(blocks * BLOCK_SYMBOLS + TAIL_SYMBOLS[tail])
}

/// Exact number of bytes recovered from `length` symbols, or `None` when
/// no encoder output has that length.
///
/// # Examples
///
/// ```
/// use base91_core::decoded_length;
/// assert_eq!(decoded_length(16), Some(13));
/// assert_eq!(decoded_length(18), Some(14));
/// assert_eq!(decoded_length(17), None);
/// ```
pub fn decoded_length(length: usize) -> Option<usize> {
    let (blocks, tail) = (length / BLOCK_SYMBOLS, length % BLOCK_SYMBOLS);
    TAIL_BYTES[tail].map(|bytes| blocks * BLOCK_BYTES + bytes)
}

/// Convert a signed length (as handed over by bindings) to `usize`.
///
/// # Errors
///
/// Returns [`Base91Error::NegativeLength`] for values below zero.
pub fn checked_length(length: i64) -> Result<usize, Base91Error> {
    usize::try_from(length).map_err(|_| Base91Error::NegativeLength { length })
}

/// `true` if `text` has a decodable length and only alphabet symbols.
///
/// `0x5C` is rejected even though `decode` would silently map it.
///
/// # Examples
///
/// ```
/// use base91_core::is_valid_text;
/// assert!(is_valid_text(b"$$"));
/// assert!(!is_valid_text(b"$"));
/// assert!(!is_valid_text(b"\\$"));
/// ```
pub fn is_valid_text(text: &[u8]) -> bool {
    validate_text(text).is_ok()
}

/// Like [`is_valid_text`] but reports what is wrong.
///
/// # Errors
///
/// [`Base91Error::InvalidLength`] for an undecodable length, otherwise
/// [`Base91Error::InvalidSymbol`] for the first byte outside the alphabet.
pub fn validate_text(text: &[u8]) -> Result<(), Base91Error> {
    if decoded_length(text.len()).is_none() {
        return Err(Base91Error::InvalidLength { length: text.len() });
    }
    match text.iter().position(|&b| !is_symbol(b)) {
        Some(position) => Err(Base91Error::InvalidSymbol {
            position,
            byte: text[position],
        }),
        None => Ok(()),
    }
}
