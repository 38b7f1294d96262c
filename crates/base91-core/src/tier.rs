//! Hardware tier selection.
//!
//! The codec computes identical output at every tier; the tier only decides
//! how many 16-bit lanes are processed per instruction. Detection runs once
//! per process and the result is cached.

use std::fmt;
use std::sync::OnceLock;

use crate::lanes::LaneImpl;

/// A vector width (or the scalar fallback) used for the block kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// 16-bit lane arithmetic on general purpose registers.
    Scalar,
    /// 64-bit vectors (NEON D registers).
    V64,
    /// 128-bit vectors (SSE2 or NEON).
    V128,
    /// 256-bit vectors (AVX2).
    V256,
    /// 512-bit vectors (AVX-512BW).
    V512,
}

static DETECTED: OnceLock<Tier> = OnceLock::new();

impl Tier {
    /// Every tier, narrowest first.
    pub const ALL: [Tier; 5] = [Tier::Scalar, Tier::V64, Tier::V128, Tier::V256, Tier::V512];

    /// The widest tier this host supports (cached after the first call).
    pub fn detect() -> Tier {
        *DETECTED.get_or_init(|| {
            let tier = Tier::ALL
                .into_iter()
                .rev()
                .find(|tier| tier.is_supported())
                .unwrap_or(Tier::Scalar);
            log::debug!(
                "base91: selected {tier} kernels, split/merge via {:?}",
                LaneImpl::detect()
            );
            tier
        })
    }

    /// Every tier this host can run, narrowest first.
    pub fn available() -> impl Iterator<Item = Tier> {
        Tier::ALL.into_iter().filter(|tier| tier.is_supported())
    }

    /// Whether this host has the instructions this tier needs.
    pub fn is_supported(self) -> bool {
        match self {
            Tier::Scalar => true,
            Tier::V64 => has_neon(),
            Tier::V128 => has_neon() || has_sse2(),
            Tier::V256 => has_avx2(),
            Tier::V512 => has_avx512bw(),
        }
    }

    /// Register width in bits (64 for the scalar fallback).
    pub fn width(self) -> u32 {
        match self {
            Tier::Scalar | Tier::V64 => 64,
            Tier::V128 => 128,
            Tier::V256 => 256,
            Tier::V512 => 512,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Scalar => "scalar",
            Tier::V64 => "v64",
            Tier::V128 => "v128",
            Tier::V256 => "v256",
            Tier::V512 => "v512",
        };
        f.write_str(name)
    }
}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
pub(crate) fn has_sse2() -> bool {
    is_x86_feature_detected!("sse2")
}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
pub(crate) fn has_avx2() -> bool {
    is_x86_feature_detected!("avx2")
}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
pub(crate) fn has_avx512bw() -> bool {
    is_x86_feature_detected!("avx512bw") && is_x86_feature_detected!("avx2")
}

#[cfg(not(all(target_arch = "x86_64", feature = "simd")))]
pub(crate) fn has_sse2() -> bool {
    false
}

#[cfg(not(all(target_arch = "x86_64", feature = "simd")))]
pub(crate) fn has_avx2() -> bool {
    false
}

#[cfg(not(all(target_arch = "x86_64", feature = "simd")))]
pub(crate) fn has_avx512bw() -> bool {
    false
}

/// NEON is mandatory on aarch64; the kernels assume little-endian lanes.
#[cfg(all(target_arch = "aarch64", target_endian = "little", feature = "simd"))]
pub(crate) fn has_neon() -> bool {
    std::arch::is_aarch64_feature_detected!("neon")
}

#[cfg(not(all(target_arch = "aarch64", target_endian = "little", feature = "simd")))]
pub(crate) fn has_neon() -> bool {
    false
}
