//! AVX2 backend: 256-bit registers on x86-64
//!
//! Most AVX2 shuffles work inside each 128-bit half. Operations that must
//! cross halves (full zips) fix the order up with `permute2x128`; the
//! three-way interleaves reuse the SSE2 kernels on each half.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::sse2::Sse2;
use super::Backend;
use crate::capability::Capability;
use crate::element::{Element, ElementKind, Float};

/// AVX2 backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Avx2;

#[inline(always)]
fn ps(a: __m256i) -> __m256 {
    unsafe { _mm256_castsi256_ps(a) }
}

#[inline(always)]
fn pd(a: __m256i) -> __m256d {
    unsafe { _mm256_castsi256_pd(a) }
}

#[inline(always)]
fn from_ps(a: __m256) -> __m256i {
    unsafe { _mm256_castps_si256(a) }
}

#[inline(always)]
fn from_pd(a: __m256d) -> __m256i {
    unsafe { _mm256_castpd_si256(a) }
}

#[inline(always)]
fn halves(a: __m256i) -> (__m128i, __m128i) {
    unsafe { (_mm256_castsi256_si128(a), _mm256_extracti128_si256::<1>(a)) }
}

#[inline(always)]
fn join(lo: __m128i, hi: __m128i) -> __m256i {
    unsafe { _mm256_set_m128i(hi, lo) }
}

#[inline(always)]
fn sign_bits<T: Element>() -> __m256i {
    Avx2::splat(T::from_lane_bits(1 << (8 * T::SIZE - 1)))
}

impl Backend for Avx2 {
    const CAPABILITY: Capability = Capability::Avx2;
    const WIDTH_BYTES: usize = 32;
    type Reg = __m256i;

    #[inline(always)]
    unsafe fn load(p: *const u8) -> __m256i {
        _mm256_load_si256(p.cast())
    }

    #[inline(always)]
    unsafe fn store(p: *mut u8, v: __m256i) {
        _mm256_store_si256(p.cast(), v)
    }

    #[inline(always)]
    fn zero() -> __m256i {
        unsafe { _mm256_setzero_si256() }
    }

    #[inline(always)]
    fn splat<T: Element>(v: T) -> __m256i {
        let bits = v.to_lane_bits();
        unsafe {
            match T::SIZE {
                1 => _mm256_set1_epi8(bits as i8),
                2 => _mm256_set1_epi16(bits as i16),
                4 => _mm256_set1_epi32(bits as i32),
                _ => _mm256_set1_epi64x(bits as i64),
            }
        }
    }

    #[inline(always)]
    fn add<T: Element>(a: __m256i, b: __m256i) -> __m256i {
        unsafe {
            match T::KIND {
                ElementKind::F32 => from_ps(_mm256_add_ps(ps(a), ps(b))),
                ElementKind::F64 => from_pd(_mm256_add_pd(pd(a), pd(b))),
                _ => match T::SIZE {
                    1 => _mm256_add_epi8(a, b),
                    2 => _mm256_add_epi16(a, b),
                    4 => _mm256_add_epi32(a, b),
                    _ => _mm256_add_epi64(a, b),
                },
            }
        }
    }

    #[inline(always)]
    fn sub<T: Element>(a: __m256i, b: __m256i) -> __m256i {
        unsafe {
            match T::KIND {
                ElementKind::F32 => from_ps(_mm256_sub_ps(ps(a), ps(b))),
                ElementKind::F64 => from_pd(_mm256_sub_pd(pd(a), pd(b))),
                _ => match T::SIZE {
                    1 => _mm256_sub_epi8(a, b),
                    2 => _mm256_sub_epi16(a, b),
                    4 => _mm256_sub_epi32(a, b),
                    _ => _mm256_sub_epi64(a, b),
                },
            }
        }
    }

    #[inline(always)]
    fn bit_and(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_and_si256(a, b) }
    }

    #[inline(always)]
    fn bit_or(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_or_si256(a, b) }
    }

    #[inline(always)]
    fn bit_xor(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_xor_si256(a, b) }
    }

    #[inline(always)]
    fn bit_andnot(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_andnot_si256(b, a) }
    }

    #[inline(always)]
    fn cmp_eq<T: Element>(a: __m256i, b: __m256i) -> __m256i {
        unsafe {
            match T::KIND {
                ElementKind::F32 => from_ps(_mm256_cmp_ps::<_CMP_EQ_OQ>(ps(a), ps(b))),
                ElementKind::F64 => from_pd(_mm256_cmp_pd::<_CMP_EQ_OQ>(pd(a), pd(b))),
                _ => match T::SIZE {
                    1 => _mm256_cmpeq_epi8(a, b),
                    2 => _mm256_cmpeq_epi16(a, b),
                    4 => _mm256_cmpeq_epi32(a, b),
                    _ => _mm256_cmpeq_epi64(a, b),
                },
            }
        }
    }

    #[inline(always)]
    fn cmp_lt<T: Element>(a: __m256i, b: __m256i) -> __m256i {
        unsafe {
            match T::KIND {
                ElementKind::F32 => from_ps(_mm256_cmp_ps::<_CMP_LT_OQ>(ps(a), ps(b))),
                ElementKind::F64 => from_pd(_mm256_cmp_pd::<_CMP_LT_OQ>(pd(a), pd(b))),
                kind => {
                    let (a, b) = if kind.is_signed() {
                        (a, b)
                    } else {
                        let sign = sign_bits::<T>();
                        (_mm256_xor_si256(a, sign), _mm256_xor_si256(b, sign))
                    };
                    match T::SIZE {
                        1 => _mm256_cmpgt_epi8(b, a),
                        2 => _mm256_cmpgt_epi16(b, a),
                        4 => _mm256_cmpgt_epi32(b, a),
                        _ => _mm256_cmpgt_epi64(b, a),
                    }
                }
            }
        }
    }

    #[inline(always)]
    fn isnan<T: Float>(a: __m256i) -> __m256i {
        Self::isnan2::<T>(a, a)
    }

    #[inline(always)]
    fn isnan2<T: Float>(a: __m256i, b: __m256i) -> __m256i {
        unsafe {
            match T::KIND {
                ElementKind::F32 => from_ps(_mm256_cmp_ps::<_CMP_UNORD_Q>(ps(a), ps(b))),
                _ => from_pd(_mm256_cmp_pd::<_CMP_UNORD_Q>(pd(a), pd(b))),
            }
        }
    }

    #[inline(always)]
    fn blend(mask: __m256i, a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_blendv_epi8(b, a, mask) }
    }

    #[inline(always)]
    fn move_r_bytes(a: __m256i, bytes: usize) -> __m256i {
        macro_rules! bslli {
            ($($n:literal)*) => {
                match bytes {
                    0 => a,
                    $($n => _mm256_bslli_epi128::<$n>(a),)*
                    _ => _mm256_setzero_si256(),
                }
            };
        }
        unsafe { bslli!(1 2 3 4 5 6 7 8 9 10 11 12 13 14 15) }
    }

    #[inline(always)]
    fn permute4<T: Element>(a: __m256i, sel: [usize; 4]) -> __m256i {
        let imm = (sel[0] | sel[1] << 2 | sel[2] << 4 | sel[3] << 6) as i32;
        unsafe {
            if T::SIZE == 2 {
                constify_imm8!(imm, |IMM| _mm256_shufflehi_epi16::<IMM>(
                    _mm256_shufflelo_epi16::<IMM>(a)
                ))
            } else {
                constify_imm8!(imm, |IMM| _mm256_shuffle_epi32::<IMM>(a))
            }
        }
    }

    #[inline(always)]
    fn permute2<T: Element>(a: __m256i, sel: [usize; 2]) -> __m256i {
        Self::permute4::<u32>(a, [2 * sel[0], 2 * sel[0] + 1, 2 * sel[1], 2 * sel[1] + 1])
    }

    #[inline(always)]
    fn interleave2<T: Element>(a: __m256i, b: __m256i) -> (__m256i, __m256i) {
        unsafe {
            let (lo, hi) = match T::SIZE {
                1 => (_mm256_unpacklo_epi8(a, b), _mm256_unpackhi_epi8(a, b)),
                2 => (_mm256_unpacklo_epi16(a, b), _mm256_unpackhi_epi16(a, b)),
                4 => (_mm256_unpacklo_epi32(a, b), _mm256_unpackhi_epi32(a, b)),
                _ => (_mm256_unpacklo_epi64(a, b), _mm256_unpackhi_epi64(a, b)),
            };
            // unpack works per half: lo = [zip(a.l, b.l).0 | zip(a.h, b.h).0]
            (
                _mm256_permute2x128_si256::<0x20>(lo, hi),
                _mm256_permute2x128_si256::<0x31>(lo, hi),
            )
        }
    }

    #[inline(always)]
    fn deinterleave2<T: Element>(r0: __m256i, r1: __m256i) -> (__m256i, __m256i) {
        let (h0, h1) = halves(r0);
        let (h2, h3) = halves(r1);
        let (a_lo, b_lo) = Sse2::deinterleave2::<T>(h0, h1);
        let (a_hi, b_hi) = Sse2::deinterleave2::<T>(h2, h3);
        (join(a_lo, a_hi), join(b_lo, b_hi))
    }

    #[inline(always)]
    fn interleave3<T: Element>(
        a: __m256i,
        b: __m256i,
        c: __m256i,
    ) -> (__m256i, __m256i, __m256i) {
        let (a_lo, a_hi) = halves(a);
        let (b_lo, b_hi) = halves(b);
        let (c_lo, c_hi) = halves(c);
        let (s0, s1, s2) = Sse2::interleave3::<T>(a_lo, b_lo, c_lo);
        let (t0, t1, t2) = Sse2::interleave3::<T>(a_hi, b_hi, c_hi);
        (join(s0, s1), join(s2, t0), join(t1, t2))
    }

    #[inline(always)]
    fn deinterleave3<T: Element>(
        r0: __m256i,
        r1: __m256i,
        r2: __m256i,
    ) -> (__m256i, __m256i, __m256i) {
        let (s0, s1) = halves(r0);
        let (s2, t0) = halves(r1);
        let (t1, t2) = halves(r2);
        let (a_lo, b_lo, c_lo) = Sse2::deinterleave3::<T>(s0, s1, s2);
        let (a_hi, b_hi, c_hi) = Sse2::deinterleave3::<T>(t0, t1, t2);
        (join(a_lo, a_hi), join(b_lo, b_hi), join(c_lo, c_hi))
    }
}

#[cfg(test)]
mod tests {
    use super::super::emulate::Staging;
    use super::*;

    fn reg<T: Element>(lanes: &[T]) -> __m256i {
        let mut staging = Staging::from_reg::<Avx2>(Avx2::zero());
        staging.lanes_mut::<Avx2, T>().copy_from_slice(lanes);
        staging.to_reg::<Avx2>()
    }

    fn lanes<T: Element>(r: __m256i) -> Vec<T> {
        Staging::from_reg::<Avx2>(r).lanes::<Avx2, T>().to_vec()
    }

    #[test]
    fn test_zip_crosses_halves() {
        let a: Vec<u32> = (0..8).collect();
        let b: Vec<u32> = (10..18).collect();
        let (r0, r1) = Avx2::interleave2::<u32>(reg(&a), reg(&b));
        assert_eq!(lanes::<u32>(r0), vec![0, 10, 1, 11, 2, 12, 3, 13]);
        assert_eq!(lanes::<u32>(r1), vec![4, 14, 5, 15, 6, 16, 7, 17]);

        let (da, db) = Avx2::deinterleave2::<u32>(r0, r1);
        assert_eq!(lanes::<u32>(da), a);
        assert_eq!(lanes::<u32>(db), b);
    }

    #[test]
    fn test_three_way_over_halves() {
        let a: Vec<f64> = vec![1.0, 2.0, 3.0, 4.0];
        let b: Vec<f64> = vec![5.0, 6.0, 7.0, 8.0];
        let c: Vec<f64> = vec![9.0, 10.0, 11.0, 12.0];
        let (r0, r1, r2) = Avx2::interleave3::<f64>(reg(&a), reg(&b), reg(&c));
        let flat: Vec<f64> = [r0, r1, r2].iter().flat_map(|r| lanes::<f64>(*r)).collect();
        assert_eq!(
            flat,
            vec![1.0, 5.0, 9.0, 2.0, 6.0, 10.0, 3.0, 7.0, 11.0, 4.0, 8.0, 12.0]
        );

        let (da, db, dc) = Avx2::deinterleave3::<f64>(r0, r1, r2);
        assert_eq!((lanes::<f64>(da), lanes::<f64>(db), lanes::<f64>(dc)), (a, b, c));
    }

    #[test]
    fn test_move_r_is_per_half() {
        let a: Vec<u8> = (1..=32).collect();
        let moved = lanes::<u8>(Avx2::move_r_bytes(reg(&a), 1));
        assert_eq!(moved[0], 0);
        assert_eq!(moved[1], 1);
        assert_eq!(moved[16], 0);
        assert_eq!(moved[17], 17);
    }
}
