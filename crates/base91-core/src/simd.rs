//! Lane kernels for every tier.
//!
//! A kernel turns split lane words (four 13-bit values per `u64`, one per
//! 16-bit lane) into symbol bytes, and symbol bytes back into lane words.
//! Each tier implements its native width and composes the wider ones from
//! it; narrower widths reuse the next tier down. All tiers are bit-identical
//! to [`crate::alphabet::encode_lane`] / [`crate::alphabet::decode_lane`].
//!
//! The tier types are capability tokens: a value of `Avx2` (say) can only
//! exist after AVX2 was detected, which is what makes the `unsafe` calls into
//! `#[target_feature]` functions sound.

use crate::alphabet::{decode_lane, encode_lane, ZERO_SYMBOL};
use crate::tier::Tier;

/// Symbol/lane conversion at the four block widths.
///
/// `encodeN` consumes `N / 8` lane words and yields `N` symbols;
/// `decodeN` is the inverse.
pub(crate) trait Kernel: Copy {
    fn encode8(self, lanes: u64) -> [u8; 8];

    fn encode16(self, lanes: [u64; 2]) -> [u8; 16] {
        join(self.encode8(lanes[0]), self.encode8(lanes[1]))
    }

    fn encode32(self, lanes: [u64; 4]) -> [u8; 32] {
        join(
            self.encode16([lanes[0], lanes[1]]),
            self.encode16([lanes[2], lanes[3]]),
        )
    }

    fn encode64(self, lanes: [u64; 8]) -> [u8; 64] {
        join(
            self.encode32([lanes[0], lanes[1], lanes[2], lanes[3]]),
            self.encode32([lanes[4], lanes[5], lanes[6], lanes[7]]),
        )
    }

    fn decode8(self, symbols: &[u8; 8]) -> u64;

    fn decode16(self, symbols: &[u8; 16]) -> [u64; 2] {
        let (halves, _) = symbols.as_chunks::<8>();
        [self.decode8(&halves[0]), self.decode8(&halves[1])]
    }

    fn decode32(self, symbols: &[u8; 32]) -> [u64; 4] {
        let (halves, _) = symbols.as_chunks::<16>();
        let [a, b] = self.decode16(&halves[0]);
        let [c, d] = self.decode16(&halves[1]);
        [a, b, c, d]
    }

    fn decode64(self, symbols: &[u8; 64]) -> [u64; 8] {
        let (halves, _) = symbols.as_chunks::<32>();
        let [a, b, c, d] = self.decode32(&halves[0]);
        let [e, f, g, h] = self.decode32(&halves[1]);
        [a, b, c, d, e, f, g, h]
    }
}

/// Concatenate two equal halves into an array of twice the length.
#[inline]
fn join<const N: usize, const M: usize>(lo: [u8; N], hi: [u8; N]) -> [u8; M] {
    debug_assert_eq!(N * 2, M);
    let mut out = [0u8; M];
    out[..N].copy_from_slice(&lo);
    out[N..].copy_from_slice(&hi);
    out
}

/// Pad a short symbol run with the zero digit so a wider kernel can decode it.
#[inline]
pub(crate) fn pad_symbols<const N: usize>(symbols: &[u8]) -> [u8; N] {
    let mut block = [ZERO_SYMBOL; N];
    block[..symbols.len()].copy_from_slice(symbols);
    block
}

/// Run `$body` with `$k` bound to the kernel token for `$tier`.
///
/// Tiers the host cannot run are a programming error at this point: the
/// public API only hands out supported tiers.
macro_rules! dispatch {
    ($tier:expr, |$k:ident| $body:expr) => {{
        use $crate::simd::*;
        let tier: $crate::tier::Tier = $tier;
        match tier {
            $crate::tier::Tier::Scalar => {
                let $k = Scalar;
                $body
            }
            #[cfg(all(target_arch = "x86_64", feature = "simd"))]
            $crate::tier::Tier::V128 => {
                let $k = Sse2::new().unwrap_or_else(|| unsupported(tier));
                $body
            }
            #[cfg(all(target_arch = "x86_64", feature = "simd"))]
            $crate::tier::Tier::V256 => {
                let $k = Avx2::new().unwrap_or_else(|| unsupported(tier));
                $body
            }
            #[cfg(all(target_arch = "x86_64", feature = "simd"))]
            $crate::tier::Tier::V512 => {
                let $k = Avx512::new().unwrap_or_else(|| unsupported(tier));
                $body
            }
            #[cfg(all(target_arch = "aarch64", target_endian = "little", feature = "simd"))]
            $crate::tier::Tier::V64 => {
                let $k = Neon64::new().unwrap_or_else(|| unsupported(tier));
                $body
            }
            #[cfg(all(target_arch = "aarch64", target_endian = "little", feature = "simd"))]
            $crate::tier::Tier::V128 => {
                let $k = Neon128::new().unwrap_or_else(|| unsupported(tier));
                $body
            }
            other => unsupported(other),
        }
    }};
}
pub(crate) use dispatch;

#[cold]
#[inline(never)]
pub(crate) fn unsupported(tier: Tier) -> ! {
    panic!("base91: {tier} kernels invoked on a host without the required instructions")
}

// ---------------------------------------------------------------------------
// Scalar: four 16-bit lanes per u64, one at a time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub(crate) struct Scalar;

impl Kernel for Scalar {
    #[inline]
    fn encode8(self, lanes: u64) -> [u8; 8] {
        let mut out = [0u8; 8];
        for (i, pair) in out.chunks_exact_mut(2).enumerate() {
            let symbols = encode_lane((lanes >> (16 * i)) as u16);
            pair.copy_from_slice(&symbols.to_le_bytes());
        }
        out
    }

    #[inline]
    fn decode8(self, symbols: &[u8; 8]) -> u64 {
        let (pairs, _) = symbols.as_chunks::<2>();
        pairs.iter().enumerate().fold(0u64, |acc, (i, pair)| {
            acc | u64::from(decode_lane(u16::from_le_bytes(*pair))) << (16 * i)
        })
    }
}

// ---------------------------------------------------------------------------
// x86_64: SSE2 (128), AVX2 (256), AVX-512BW (512)
// ---------------------------------------------------------------------------

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
pub(crate) use x86::{Avx2, Avx512, Sse2};

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
mod x86 {
    use std::arch::x86_64::*;

    use super::*;
    use crate::alphabet::{
        DIV91_HIGH_SHIFT, DIV91_MUL, EXCLUDED_DIGIT, EXCLUDED_SYMBOL, PAIR_FOLD, SUBSTITUTE_DIGIT,
        SUBSTITUTE_SYMBOL, SYMBOL_OFFSET,
    };
    use crate::tier::{has_avx2, has_avx512bw, has_sse2};

    #[derive(Debug, Clone, Copy)]
    pub(crate) struct Sse2(());

    #[derive(Debug, Clone, Copy)]
    pub(crate) struct Avx2(());

    #[derive(Debug, Clone, Copy)]
    pub(crate) struct Avx512(());

    impl Sse2 {
        pub(crate) fn new() -> Option<Self> {
            has_sse2().then_some(Sse2(()))
        }
    }

    impl Avx2 {
        pub(crate) fn new() -> Option<Self> {
            has_avx2().then_some(Avx2(()))
        }

        fn sse2(self) -> Sse2 {
            Sse2(())
        }
    }

    impl Avx512 {
        pub(crate) fn new() -> Option<Self> {
            has_avx512bw().then_some(Avx512(()))
        }

        fn avx2(self) -> Avx2 {
            Avx2(())
        }
    }

    impl Kernel for Sse2 {
        #[inline]
        fn encode8(self, lanes: u64) -> [u8; 8] {
            let wide = self.encode16([lanes, 0]);
            let (halves, _) = wide.as_chunks::<8>();
            halves[0]
        }

        #[inline]
        fn encode16(self, lanes: [u64; 2]) -> [u8; 16] {
            // SAFETY: an Sse2 token only exists when sse2 was detected.
            unsafe { encode16_sse2(lanes) }
        }

        #[inline]
        fn decode8(self, symbols: &[u8; 8]) -> u64 {
            self.decode16(&pad_symbols(symbols))[0]
        }

        #[inline]
        fn decode16(self, symbols: &[u8; 16]) -> [u64; 2] {
            // SAFETY: an Sse2 token only exists when sse2 was detected.
            unsafe { decode16_sse2(symbols) }
        }
    }

    impl Kernel for Avx2 {
        #[inline]
        fn encode8(self, lanes: u64) -> [u8; 8] {
            self.sse2().encode8(lanes)
        }

        #[inline]
        fn encode16(self, lanes: [u64; 2]) -> [u8; 16] {
            self.sse2().encode16(lanes)
        }

        #[inline]
        fn encode32(self, lanes: [u64; 4]) -> [u8; 32] {
            // SAFETY: an Avx2 token only exists when avx2 was detected.
            unsafe { encode32_avx2(lanes) }
        }

        #[inline]
        fn decode8(self, symbols: &[u8; 8]) -> u64 {
            self.sse2().decode8(symbols)
        }

        #[inline]
        fn decode16(self, symbols: &[u8; 16]) -> [u64; 2] {
            self.sse2().decode16(symbols)
        }

        #[inline]
        fn decode32(self, symbols: &[u8; 32]) -> [u64; 4] {
            // SAFETY: an Avx2 token only exists when avx2 was detected.
            unsafe { decode32_avx2(symbols) }
        }
    }

    impl Kernel for Avx512 {
        #[inline]
        fn encode8(self, lanes: u64) -> [u8; 8] {
            self.avx2().encode8(lanes)
        }

        #[inline]
        fn encode16(self, lanes: [u64; 2]) -> [u8; 16] {
            self.avx2().encode16(lanes)
        }

        #[inline]
        fn encode32(self, lanes: [u64; 4]) -> [u8; 32] {
            self.avx2().encode32(lanes)
        }

        #[inline]
        fn encode64(self, lanes: [u64; 8]) -> [u8; 64] {
            // SAFETY: an Avx512 token only exists when avx512bw was detected.
            unsafe { encode64_avx512(lanes) }
        }

        #[inline]
        fn decode8(self, symbols: &[u8; 8]) -> u64 {
            self.avx2().decode8(symbols)
        }

        #[inline]
        fn decode16(self, symbols: &[u8; 16]) -> [u64; 2] {
            self.avx2().decode16(symbols)
        }

        #[inline]
        fn decode32(self, symbols: &[u8; 32]) -> [u64; 4] {
            self.avx2().decode32(symbols)
        }

        #[inline]
        fn decode64(self, symbols: &[u8; 64]) -> [u64; 8] {
            // SAFETY: an Avx512 token only exists when avx512bw was detected.
            unsafe { decode64_avx512(symbols) }
        }
    }

    #[target_feature(enable = "sse2")]
    unsafe fn encode16_sse2(lanes: [u64; 2]) -> [u8; 16] {
        let v = _mm_loadu_si128(lanes.as_ptr().cast());
        let q = _mm_srli_epi16(
            _mm_mulhi_epu16(v, _mm_set1_epi16(DIV91_MUL as i16)),
            DIV91_HIGH_SHIFT as i32,
        );
        let r = _mm_sub_epi16(v, _mm_mullo_epi16(q, _mm_set1_epi16(91)));
        let pairs = _mm_or_si128(r, _mm_slli_epi16(q, 8));

        let symbols = _mm_add_epi8(pairs, _mm_set1_epi8(SYMBOL_OFFSET as i8));
        let hit = _mm_cmpeq_epi8(symbols, _mm_set1_epi8(EXCLUDED_SYMBOL as i8));
        let symbols = _mm_or_si128(
            _mm_and_si128(hit, _mm_set1_epi8(SUBSTITUTE_SYMBOL as i8)),
            _mm_andnot_si128(hit, symbols),
        );

        let mut out = [0u8; 16];
        _mm_storeu_si128(out.as_mut_ptr().cast(), symbols);
        out
    }

    #[target_feature(enable = "sse2")]
    unsafe fn decode16_sse2(symbols: &[u8; 16]) -> [u64; 2] {
        let s = _mm_loadu_si128(symbols.as_ptr().cast());
        let d = _mm_sub_epi8(s, _mm_set1_epi8(SYMBOL_OFFSET as i8));
        let hit = _mm_cmpeq_epi8(d, _mm_set1_epi8(SUBSTITUTE_DIGIT as i8));
        let d = _mm_or_si128(
            _mm_and_si128(hit, _mm_set1_epi8(EXCLUDED_DIGIT as i8)),
            _mm_andnot_si128(hit, d),
        );
        let q = _mm_srli_epi16(d, 8);
        let v = _mm_sub_epi16(d, _mm_mullo_epi16(q, _mm_set1_epi16(PAIR_FOLD as i16)));

        let mut out = [0u64; 2];
        _mm_storeu_si128(out.as_mut_ptr().cast(), v);
        out
    }

    #[target_feature(enable = "avx2")]
    unsafe fn encode32_avx2(lanes: [u64; 4]) -> [u8; 32] {
        let v = _mm256_loadu_si256(lanes.as_ptr().cast());
        let q = _mm256_srli_epi16(
            _mm256_mulhi_epu16(v, _mm256_set1_epi16(DIV91_MUL as i16)),
            DIV91_HIGH_SHIFT as i32,
        );
        let r = _mm256_sub_epi16(v, _mm256_mullo_epi16(q, _mm256_set1_epi16(91)));
        let pairs = _mm256_or_si256(r, _mm256_slli_epi16(q, 8));

        let symbols = _mm256_add_epi8(pairs, _mm256_set1_epi8(SYMBOL_OFFSET as i8));
        let hit = _mm256_cmpeq_epi8(symbols, _mm256_set1_epi8(EXCLUDED_SYMBOL as i8));
        let symbols = _mm256_blendv_epi8(
            symbols,
            _mm256_set1_epi8(SUBSTITUTE_SYMBOL as i8),
            hit,
        );

        let mut out = [0u8; 32];
        _mm256_storeu_si256(out.as_mut_ptr().cast(), symbols);
        out
    }

    #[target_feature(enable = "avx2")]
    unsafe fn decode32_avx2(symbols: &[u8; 32]) -> [u64; 4] {
        let s = _mm256_loadu_si256(symbols.as_ptr().cast());
        let d = _mm256_sub_epi8(s, _mm256_set1_epi8(SYMBOL_OFFSET as i8));
        let hit = _mm256_cmpeq_epi8(d, _mm256_set1_epi8(SUBSTITUTE_DIGIT as i8));
        let d = _mm256_blendv_epi8(d, _mm256_set1_epi8(EXCLUDED_DIGIT as i8), hit);
        let q = _mm256_srli_epi16(d, 8);
        let v = _mm256_sub_epi16(d, _mm256_mullo_epi16(q, _mm256_set1_epi16(PAIR_FOLD as i16)));

        let mut out = [0u64; 4];
        _mm256_storeu_si256(out.as_mut_ptr().cast(), v);
        out
    }

    #[target_feature(enable = "avx512bw")]
    unsafe fn encode64_avx512(lanes: [u64; 8]) -> [u8; 64] {
        let v = _mm512_loadu_si512(lanes.as_ptr().cast());
        let q = _mm512_srli_epi16(
            _mm512_mulhi_epu16(v, _mm512_set1_epi16(DIV91_MUL as i16)),
            DIV91_HIGH_SHIFT,
        );
        let r = _mm512_sub_epi16(v, _mm512_mullo_epi16(q, _mm512_set1_epi16(91)));
        let pairs = _mm512_or_si512(r, _mm512_slli_epi16(q, 8));

        let symbols = _mm512_add_epi8(pairs, _mm512_set1_epi8(SYMBOL_OFFSET as i8));
        let hit = _mm512_cmpeq_epi8_mask(symbols, _mm512_set1_epi8(EXCLUDED_SYMBOL as i8));
        let symbols = _mm512_mask_blend_epi8(hit, symbols, _mm512_set1_epi8(SUBSTITUTE_SYMBOL as i8));

        let mut out = [0u8; 64];
        _mm512_storeu_si512(out.as_mut_ptr().cast(), symbols);
        out
    }

    #[target_feature(enable = "avx512bw")]
    unsafe fn decode64_avx512(symbols: &[u8; 64]) -> [u64; 8] {
        let s = _mm512_loadu_si512(symbols.as_ptr().cast());
        let d = _mm512_sub_epi8(s, _mm512_set1_epi8(SYMBOL_OFFSET as i8));
        let hit = _mm512_cmpeq_epi8_mask(d, _mm512_set1_epi8(SUBSTITUTE_DIGIT as i8));
        let d = _mm512_mask_blend_epi8(hit, d, _mm512_set1_epi8(EXCLUDED_DIGIT as i8));
        let q = _mm512_srli_epi16(d, 8);
        let v = _mm512_sub_epi16(d, _mm512_mullo_epi16(q, _mm512_set1_epi16(PAIR_FOLD as i16)));

        let mut out = [0u64; 8];
        _mm512_storeu_si512(out.as_mut_ptr().cast(), v);
        out
    }
}

// ---------------------------------------------------------------------------
// aarch64: NEON D registers (64) and Q registers (128)
// ---------------------------------------------------------------------------

#[cfg(all(target_arch = "aarch64", target_endian = "little", feature = "simd"))]
pub(crate) use neon::{Neon128, Neon64};

#[cfg(all(target_arch = "aarch64", target_endian = "little", feature = "simd"))]
mod neon {
    use std::arch::aarch64::*;

    use super::*;
    use crate::alphabet::{
        DIV91_HIGH_SHIFT, DIV91_MUL, EXCLUDED_DIGIT, EXCLUDED_SYMBOL, PAIR_FOLD, SUBSTITUTE_DIGIT,
        SUBSTITUTE_SYMBOL, SYMBOL_OFFSET,
    };
    use crate::tier::has_neon;

    #[derive(Debug, Clone, Copy)]
    pub(crate) struct Neon64(());

    #[derive(Debug, Clone, Copy)]
    pub(crate) struct Neon128(());

    impl Neon64 {
        pub(crate) fn new() -> Option<Self> {
            has_neon().then_some(Neon64(()))
        }
    }

    impl Neon128 {
        pub(crate) fn new() -> Option<Self> {
            has_neon().then_some(Neon128(()))
        }

        fn neon64(self) -> Neon64 {
            Neon64(())
        }
    }

    impl Kernel for Neon64 {
        #[inline]
        fn encode8(self, lanes: u64) -> [u8; 8] {
            // SAFETY: a Neon64 token only exists when neon was detected.
            unsafe { encode8_neon(lanes) }
        }

        #[inline]
        fn decode8(self, symbols: &[u8; 8]) -> u64 {
            // SAFETY: a Neon64 token only exists when neon was detected.
            unsafe { decode8_neon(symbols) }
        }
    }

    impl Kernel for Neon128 {
        #[inline]
        fn encode8(self, lanes: u64) -> [u8; 8] {
            self.neon64().encode8(lanes)
        }

        #[inline]
        fn encode16(self, lanes: [u64; 2]) -> [u8; 16] {
            // SAFETY: a Neon128 token only exists when neon was detected.
            unsafe { encode16_neon(lanes) }
        }

        #[inline]
        fn decode8(self, symbols: &[u8; 8]) -> u64 {
            self.neon64().decode8(symbols)
        }

        #[inline]
        fn decode16(self, symbols: &[u8; 16]) -> [u64; 2] {
            // SAFETY: a Neon128 token only exists when neon was detected.
            unsafe { decode16_neon(symbols) }
        }
    }

    // NEON has no 16-bit multiply-high; widen, multiply, then narrow the
    // high halves back (same pattern as the x86 mulhi).

    #[target_feature(enable = "neon")]
    unsafe fn encode8_neon(lanes: u64) -> [u8; 8] {
        let v = vcreate_u16(lanes);
        let high = vshrn_n_u32::<16>(vmull_u16(v, vdup_n_u16(DIV91_MUL)));
        let q = vshr_n_u16::<{ DIV91_HIGH_SHIFT as i32 }>(high);
        let r = vmls_u16(v, q, vdup_n_u16(91));
        let pairs = vorr_u16(r, vshl_n_u16::<8>(q));

        let symbols = vadd_u8(vreinterpret_u8_u16(pairs), vdup_n_u8(SYMBOL_OFFSET));
        let hit = vceq_u8(symbols, vdup_n_u8(EXCLUDED_SYMBOL));
        let symbols = vbsl_u8(hit, vdup_n_u8(SUBSTITUTE_SYMBOL), symbols);

        let mut out = [0u8; 8];
        vst1_u8(out.as_mut_ptr(), symbols);
        out
    }

    #[target_feature(enable = "neon")]
    unsafe fn decode8_neon(symbols: &[u8; 8]) -> u64 {
        let d = vsub_u8(vld1_u8(symbols.as_ptr()), vdup_n_u8(SYMBOL_OFFSET));
        let hit = vceq_u8(d, vdup_n_u8(SUBSTITUTE_DIGIT));
        let d = vreinterpret_u16_u8(vbsl_u8(hit, vdup_n_u8(EXCLUDED_DIGIT), d));
        let v = vmls_u16(d, vshr_n_u16::<8>(d), vdup_n_u16(PAIR_FOLD));
        vget_lane_u64::<0>(vreinterpret_u64_u16(v))
    }

    #[target_feature(enable = "neon")]
    unsafe fn encode16_neon(lanes: [u64; 2]) -> [u8; 16] {
        let v = vld1q_u16(lanes.as_ptr().cast());
        let k = vdup_n_u16(DIV91_MUL);
        let lo = vshrn_n_u32::<16>(vmull_u16(vget_low_u16(v), k));
        let hi = vshrn_n_u32::<16>(vmull_u16(vget_high_u16(v), k));
        let q = vshrq_n_u16::<{ DIV91_HIGH_SHIFT as i32 }>(vcombine_u16(lo, hi));
        let r = vmlsq_u16(v, q, vdupq_n_u16(91));
        let pairs = vorrq_u16(r, vshlq_n_u16::<8>(q));

        let symbols = vaddq_u8(vreinterpretq_u8_u16(pairs), vdupq_n_u8(SYMBOL_OFFSET));
        let hit = vceqq_u8(symbols, vdupq_n_u8(EXCLUDED_SYMBOL));
        let symbols = vbslq_u8(hit, vdupq_n_u8(SUBSTITUTE_SYMBOL), symbols);

        let mut out = [0u8; 16];
        vst1q_u8(out.as_mut_ptr(), symbols);
        out
    }

    #[target_feature(enable = "neon")]
    unsafe fn decode16_neon(symbols: &[u8; 16]) -> [u64; 2] {
        let d = vsubq_u8(vld1q_u8(symbols.as_ptr()), vdupq_n_u8(SYMBOL_OFFSET));
        let hit = vceqq_u8(d, vdupq_n_u8(SUBSTITUTE_DIGIT));
        let d = vreinterpretq_u16_u8(vbslq_u8(hit, vdupq_n_u8(EXCLUDED_DIGIT), d));
        let v = vmlsq_u16(d, vshrq_n_u16::<8>(d), vdupq_n_u16(PAIR_FOLD));

        let mut out = [0u64; 2];
        vst1q_u16(out.as_mut_ptr().cast(), v);
        out
    }
}
