//! Bit-lane packing: moves 13-bit groups between their packed positions in
//! the input bit stream and independent 16-bit lanes.
//!
//! `split64` takes four groups at bit offsets 0, 13, 26 and 39 and deposits
//! them at 0, 16, 32 and 48; the upper three bits of each lane are zero and
//! bits 52..64 of the input are dropped. `merge64` is the exact inverse. The
//! 32-bit variants do the same with two groups.
//!
//! On x86_64 with BMI2 the transform is a single `pdep`/`pext` against a
//! fixed mask; everywhere else it is four mask-and-shift steps. The two are
//! bit-identical.

/// Lane mask: the low 13 bits of every 16-bit lane.
pub const LANE_MASK64: u64 = 0x1FFF_1FFF_1FFF_1FFF;

/// Two-lane version of [`LANE_MASK64`].
pub const LANE_MASK32: u32 = 0x1FFF_1FFF;

const GROUP64: u64 = 0x1FFF;
const GROUP32: u32 = 0x1FFF;

/// Which split/merge implementation the capability probe selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneImpl {
    /// BMI2 parallel bit deposit/extract.
    Pdep,
    /// Portable mask-and-shift.
    Shift,
}

impl LaneImpl {
    /// The implementation used on this host.
    pub fn detect() -> Self {
        if has_pdep() {
            LaneImpl::Pdep
        } else {
            LaneImpl::Shift
        }
    }
}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
#[inline]
fn has_pdep() -> bool {
    use std::sync::OnceLock;

    static HAS_BMI2: OnceLock<bool> = OnceLock::new();
    *HAS_BMI2.get_or_init(|| is_x86_feature_detected!("bmi2"))
}

#[cfg(not(all(target_arch = "x86_64", feature = "simd")))]
#[inline]
fn has_pdep() -> bool {
    false
}

/// Spread four packed 13-bit groups into four 16-bit lanes.
///
/// # Examples
///
/// ```
/// use base91_core::lanes::split64;
/// assert_eq!(split64(0x1FFF), 0x1FFF);
/// assert_eq!(split64(1 << 13), 1 << 16);
/// ```
#[inline]
pub fn split64(v: u64) -> u64 {
    #[cfg(all(target_arch = "x86_64", feature = "simd"))]
    if has_pdep() {
        // SAFETY: bmi2 was detected at runtime.
        return unsafe { split64_pdep(v) };
    }
    split64_shift(v)
}

/// Spread two packed 13-bit groups into two 16-bit lanes.
#[inline]
pub fn split32(v: u32) -> u32 {
    #[cfg(all(target_arch = "x86_64", feature = "simd"))]
    if has_pdep() {
        // SAFETY: bmi2 was detected at runtime.
        return unsafe { split32_pdep(v) };
    }
    split32_shift(v)
}

/// Compact four 16-bit lanes back into packed 13-bit groups.
///
/// # Examples
///
/// ```
/// use base91_core::lanes::{merge64, split64};
/// let packed = 0x000F_EDCB_A987_6543u64;
/// assert_eq!(merge64(split64(packed)), packed);
/// ```
#[inline]
pub fn merge64(v: u64) -> u64 {
    #[cfg(all(target_arch = "x86_64", feature = "simd"))]
    if has_pdep() {
        // SAFETY: bmi2 was detected at runtime.
        return unsafe { merge64_pext(v) };
    }
    merge64_shift(v)
}

/// Compact two 16-bit lanes back into packed 13-bit groups.
#[inline]
pub fn merge32(v: u32) -> u32 {
    #[cfg(all(target_arch = "x86_64", feature = "simd"))]
    if has_pdep() {
        // SAFETY: bmi2 was detected at runtime.
        return unsafe { merge32_pext(v) };
    }
    merge32_shift(v)
}

#[inline]
pub(crate) const fn split64_shift(v: u64) -> u64 {
    (v & GROUP64)
        | ((v & (GROUP64 << 13)) << (16 - 13))
        | ((v & (GROUP64 << 26)) << (32 - 26))
        | ((v & (GROUP64 << 39)) << (48 - 39))
}

#[inline]
pub(crate) const fn split32_shift(v: u32) -> u32 {
    (v & GROUP32) | ((v & (GROUP32 << 13)) << (16 - 13))
}

#[inline]
pub(crate) const fn merge64_shift(v: u64) -> u64 {
    (v & GROUP64)
        | ((v & (GROUP64 << 16)) >> (16 - 13))
        | ((v & (GROUP64 << 32)) >> (32 - 26))
        | ((v & (GROUP64 << 48)) >> (48 - 39))
}

#[inline]
pub(crate) const fn merge32_shift(v: u32) -> u32 {
    (v & GROUP32) | ((v & (GROUP32 << 16)) >> (16 - 13))
}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
#[target_feature(enable = "bmi2")]
unsafe fn split64_pdep(v: u64) -> u64 {
    std::arch::x86_64::_pdep_u64(v, LANE_MASK64)
}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
#[target_feature(enable = "bmi2")]
unsafe fn split32_pdep(v: u32) -> u32 {
    std::arch::x86_64::_pdep_u32(v, LANE_MASK32)
}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
#[target_feature(enable = "bmi2")]
unsafe fn merge64_pext(v: u64) -> u64 {
    std::arch::x86_64::_pext_u64(v, LANE_MASK64)
}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
#[target_feature(enable = "bmi2")]
unsafe fn merge32_pext(v: u32) -> u32 {
    std::arch::x86_64::_pext_u32(v, LANE_MASK32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes64(v: u64) -> [u64; 4] {
        [v & 0xFFFF, (v >> 16) & 0xFFFF, (v >> 32) & 0xFFFF, v >> 48]
    }

    #[test]
    fn test_split_places_each_group_in_its_lane() {
        for g in 0..=GROUP64 {
            for slot in 0..4 {
                let packed = g << (13 * slot);
                let mut expected = [0u64; 4];
                expected[slot] = g;
                assert_eq!(lanes64(split64_shift(packed)), expected);
                assert_eq!(merge64_shift(split64_shift(packed)), packed);
            }
        }
    }

    #[test]
    fn test_split_drops_bits_above_52() {
        assert_eq!(split64_shift(0xFFF0_0000_0000_0000), 0);
        assert_eq!(split64_shift(u64::MAX), LANE_MASK64);
        assert_eq!(split32_shift(u32::MAX), LANE_MASK32);
        assert_eq!(merge64_shift(u64::MAX), (1 << 52) - 1);
        assert_eq!(merge32_shift(u32::MAX), (1 << 26) - 1);
    }

    #[test]
    fn test_split32_matches_split64_low_lanes() {
        for g in 0..=GROUP32 {
            let packed = g | ((GROUP32 - g) << 13);
            let wide = split64_shift(u64::from(packed));
            assert_eq!(u64::from(split32_shift(packed)), wide);
            assert_eq!(merge32_shift(split32_shift(packed)), packed);
        }
    }

    #[cfg(all(target_arch = "x86_64", feature = "simd"))]
    #[test]
    fn test_pdep_matches_shift_over_full_group_domain() {
        if !has_pdep() {
            return;
        }
        for g in 0..=GROUP64 {
            let other = GROUP64 - g;
            let packed = g | (other << 13) | (g << 26) | (other << 39) | (0xABC << 52);
            let lanes = split64_shift(packed);
            // SAFETY: bmi2 checked above.
            unsafe {
                assert_eq!(split64_pdep(packed), lanes);
                assert_eq!(merge64_pext(lanes), merge64_shift(lanes));
                assert_eq!(merge64_pext(u64::MAX ^ lanes), merge64_shift(u64::MAX ^ lanes));
                let packed32 = (packed as u32) & ((1 << 26) - 1);
                assert_eq!(split32_pdep(packed32), split32_shift(packed32));
                assert_eq!(merge32_pext(lanes as u32), merge32_shift(lanes as u32));
            }
        }
    }

    #[test]
    fn test_dispatch_agrees_with_portable() {
        let mut x = 0x9E37_79B9_7F4A_7C15u64;
        for _ in 0..10_000 {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            assert_eq!(split64(x), split64_shift(x));
            assert_eq!(merge64(x), merge64_shift(x));
            assert_eq!(split32(x as u32), split32_shift(x as u32));
            assert_eq!(merge32(x as u32), merge32_shift(x as u32));
        }
    }
}
