//! # base91-core
//!
//! Fast base91 encoding and decoding in pure Rust.
//!
//! Every 13 input bytes become 16 printable ASCII symbols: the 104 bits are
//! cut into eight 13-bit groups and each group is written as two base-91
//! digits. The alphabet is `0x23..=0x7D` without the backslash, plus `~`, so
//! encoded text is safe inside JSON and most quoted strings. Blocks are
//! processed with the widest vector unit the host has (AVX-512BW, AVX2,
//! SSE2, NEON or a scalar fallback); the output never depends on it.
//!
//! ## Quick Start
//!
//! ```
//! use base91_core::{decode_to_vec, encode_to_string};
//!
//! let text = encode_to_string(b"Hello, world!").unwrap();
//! assert_eq!(text.len(), 16);
//! assert_eq!(decode_to_vec(text.as_bytes()).unwrap(), b"Hello, world!");
//! ```
//!
//! ## Streaming into caller buffers
//!
//! ```
//! use base91_core::{encode, encoded_length};
//!
//! let data = [42u8; 30];
//! let mut text = vec![0u8; encoded_length(data.len()).unwrap()];
//!
//! // whole blocks first, the caller keeps the rest
//! let first = encode(&data, &mut text, false).unwrap();
//! assert_eq!(first.consumed, 26);
//!
//! let last = encode(&data[first.consumed..], &mut text[first.written..], true).unwrap();
//! assert_eq!(first.written + last.written, text.len());
//! ```

pub mod alphabet;
pub mod error;
pub mod io;
pub mod lanes;
pub mod length;
pub mod tier;

mod codec;
mod decode_impl;
mod encode_impl;
#[cfg(feature = "parallel")]
mod parallel;
mod simd;

// Re-export primary functions at crate root.
pub use codec::{
    decode, decode_to_vec, encode, encode_to_string, encode_to_vec, Codec, Progress,
};
pub use error::Base91Error;
pub use io::{DecoderWriter, EncoderWriter};
pub use length::{
    checked_length, decoded_length, encoded_length, is_valid_text, validate_text,
    MAX_ENCODE_LENGTH,
};
#[cfg(feature = "parallel")]
pub use parallel::{decode_parallel, encode_parallel};
pub use tier::Tier;
