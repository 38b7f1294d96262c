//! Error types for base91 encoding and decoding.

use thiserror::Error;

use crate::tier::Tier;

/// Errors that can occur during base91 encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base91Error {
    /// The destination buffer cannot hold the analytically computed output.
    #[error("destination too short: required at least {required} bytes, got {actual}")]
    DestinationTooShort {
        /// The minimum destination length.
        required: usize,
        /// The destination length that was supplied.
        actual: usize,
    },

    /// The text length leaves a lone unpaired digit (length mod 16 is 1, 6 or 11).
    #[error("invalid base91 text length: {length}")]
    InvalidLength {
        /// The rejected text length.
        length: usize,
    },

    /// The input is longer than the length arithmetic can represent.
    #[error("input length {length} exceeds the maximum encode length {max}")]
    LengthExceedsMaximum {
        /// The rejected input length.
        length: usize,
        /// The largest supported input length.
        max: usize,
    },

    /// A signed length query was given a negative value.
    #[error("length must not be negative, got {length}")]
    NegativeLength {
        /// The rejected length.
        length: i64,
    },

    /// A tier was requested on hardware that lacks the required instructions.
    #[error("tier {tier} is not supported on this host")]
    UnsupportedTier {
        /// The requested tier.
        tier: Tier,
    },

    /// A byte outside the base91 alphabet was found while validating text.
    #[error("invalid base91 symbol {byte:#04x} at position {position}")]
    InvalidSymbol {
        /// Offset of the offending byte in the text.
        position: usize,
        /// The offending byte.
        byte: u8,
    },
}
