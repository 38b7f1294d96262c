//! The base91 alphabet and the scalar digit codec.
//!
//! A 13-bit value `v` is written as the digit pair `(v % 91, v / 91)`, each
//! digit offset by `0x23`. The one digit that would land on `0x5C` (`\`) is
//! moved to `0x7E` (`~`), so the alphabet is `0x23..=0x7D` without `0x5C`,
//! plus `0x7E`.
//!
//! Every vector kernel reduces to the functions here.

/// Offset added to a digit to obtain its symbol.
pub const SYMBOL_OFFSET: u8 = 0x23;

/// The symbol the digit 57 would map to without substitution.
pub const EXCLUDED_SYMBOL: u8 = 0x5C;

/// The symbol written in place of [`EXCLUDED_SYMBOL`].
pub const SUBSTITUTE_SYMBOL: u8 = 0x7E;

/// Digit value produced by the substitute symbol before it is undone.
pub(crate) const SUBSTITUTE_DIGIT: u8 = SUBSTITUTE_SYMBOL - SYMBOL_OFFSET;

/// Digit value the substitute symbol stands for.
pub(crate) const EXCLUDED_DIGIT: u8 = EXCLUDED_SYMBOL - SYMBOL_OFFSET;

/// Symbol of the digit pair `(0, 0)`.
pub const ZERO_SYMBOL: u8 = SYMBOL_OFFSET;

/// Fixed-point reciprocal of 91: `q = (v * DIV91_MUL) >> 18` for `v < 8192`.
pub(crate) const DIV91_MUL: u16 = ((1u32 << 18) / 91 + 1) as u16;

/// Shift applied after a 16-bit multiply-high by [`DIV91_MUL`].
#[cfg(any(
    test,
    all(
        feature = "simd",
        any(
            target_arch = "x86_64",
            all(target_arch = "aarch64", target_endian = "little")
        )
    )
))]
pub(crate) const DIV91_HIGH_SHIFT: u32 = 2;

/// `256 - 91`: folds a `r | q << 8` lane into `r + 91 q`.
#[cfg(any(
    test,
    all(
        feature = "simd",
        any(
            target_arch = "x86_64",
            all(target_arch = "aarch64", target_endian = "little")
        )
    )
))]
pub(crate) const PAIR_FOLD: u16 = 256 - 91;

/// Largest value a digit pair carries during encoding.
pub const MAX_GROUP: u16 = (1 << 13) - 1;

/// Map a digit `0..=90` to its symbol.
#[inline]
pub const fn digit_to_symbol(digit: u8) -> u8 {
    let symbol = digit.wrapping_add(SYMBOL_OFFSET);
    if symbol == EXCLUDED_SYMBOL {
        SUBSTITUTE_SYMBOL
    } else {
        symbol
    }
}

/// Map a symbol to its digit.
///
/// Out-of-alphabet bytes are not rejected; they wrap the same way every
/// vector tier wraps them, so the result is deterministic but meaningless.
#[inline]
pub const fn symbol_to_digit(symbol: u8) -> u8 {
    let digit = symbol.wrapping_sub(SYMBOL_OFFSET);
    if digit == SUBSTITUTE_DIGIT {
        EXCLUDED_DIGIT
    } else {
        digit
    }
}

/// `true` if `byte` belongs to the 91-symbol alphabet.
#[inline]
pub const fn is_symbol(byte: u8) -> bool {
    byte >= SYMBOL_OFFSET && byte <= SUBSTITUTE_SYMBOL && byte != EXCLUDED_SYMBOL
}

/// Encode one 13-bit lane into a symbol lane: remainder symbol in the low
/// byte, quotient symbol in the high byte. Bits above the 13th are ignored.
#[inline]
pub const fn encode_lane(value: u16) -> u16 {
    let v = (value & MAX_GROUP) as u32;
    let q = (v * DIV91_MUL as u32) >> 18;
    let r = v - q * 91;
    digit_to_symbol(r as u8) as u16 | (digit_to_symbol(q as u8) as u16) << 8
}

/// Decode one symbol lane (remainder symbol low, quotient symbol high).
#[inline]
pub const fn decode_lane(symbols: u16) -> u16 {
    let r = symbol_to_digit(symbols as u8) as u16;
    let q = symbol_to_digit((symbols >> 8) as u8) as u16;
    r.wrapping_add(q.wrapping_mul(91))
}

/// Encode a 13-bit value as its `(remainder, quotient)` symbol pair.
///
/// # Examples
///
/// ```
/// use base91_core::alphabet::encode_pair;
/// assert_eq!(encode_pair(0), *b"##");
/// assert_eq!(encode_pair(92), *b"$$");
/// ```
#[inline]
pub const fn encode_pair(value: u16) -> [u8; 2] {
    encode_lane(value).to_le_bytes()
}

/// Decode a `(remainder, quotient)` symbol pair.
///
/// # Examples
///
/// ```
/// use base91_core::alphabet::decode_pair;
/// assert_eq!(decode_pair(*b"$$"), 92);
/// ```
#[inline]
pub const fn decode_pair(symbols: [u8; 2]) -> u16 {
    decode_lane(u16::from_le_bytes(symbols))
}
