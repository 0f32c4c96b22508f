//! SSE2 backend: 128-bit registers on x86 and x86-64
//!
//! Integer and float lanes share `__m128i`; float operations go through
//! bit casts, which compile to nothing.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::Backend;
use crate::capability::Capability;
use crate::element::{Element, ElementKind, Float};

/// SSE2 backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sse2;

/// `_MM_SHUFFLE` with the selectors written in lane order
pub(crate) const fn shuf(r0: i32, r1: i32, r2: i32, r3: i32) -> i32 {
    r0 | r1 << 2 | r2 << 4 | r3 << 6
}

#[inline(always)]
fn ps(a: __m128i) -> __m128 {
    unsafe { _mm_castsi128_ps(a) }
}

#[inline(always)]
fn pd(a: __m128i) -> __m128d {
    unsafe { _mm_castsi128_pd(a) }
}

#[inline(always)]
fn from_ps(a: __m128) -> __m128i {
    unsafe { _mm_castps_si128(a) }
}

#[inline(always)]
fn from_pd(a: __m128d) -> __m128i {
    unsafe { _mm_castpd_si128(a) }
}

/// Top bit of every lane; xor with it maps unsigned order onto signed order
#[inline(always)]
fn sign_bits<T: Element>() -> __m128i {
    Sse2::splat(T::from_lane_bits(1 << (8 * T::SIZE - 1)))
}

/// `[x0, x2, y0, y2]` of two float registers
#[inline(always)]
unsafe fn pick_even(x: __m128, y: __m128) -> __m128 {
    _mm_shuffle_ps::<{ shuf(0, 2, 0, 2) }>(x, y)
}

/// 64-bit equality from 32-bit halves
#[inline(always)]
unsafe fn cmpeq_epi64(a: __m128i, b: __m128i) -> __m128i {
    let eq = _mm_cmpeq_epi32(a, b);
    _mm_and_si128(eq, _mm_shuffle_epi32::<{ shuf(1, 0, 3, 2) }>(eq))
}

/// Signed 64-bit `a < b` from 32-bit compares
#[inline(always)]
unsafe fn cmplt_epi64(a: __m128i, b: __m128i) -> __m128i {
    // high dwords compare signed, low dwords unsigned
    let hi_lt = _mm_cmpgt_epi32(b, a);
    let hi_eq = _mm_cmpeq_epi32(a, b);
    let flip = _mm_set1_epi32(i32::MIN);
    let lo_lt = _mm_cmpgt_epi32(_mm_xor_si128(b, flip), _mm_xor_si128(a, flip));
    let lo_lt = _mm_shuffle_epi32::<{ shuf(0, 0, 2, 2) }>(lo_lt);
    let lt = _mm_or_si128(hi_lt, _mm_and_si128(hi_eq, lo_lt));
    _mm_shuffle_epi32::<{ shuf(1, 1, 3, 3) }>(lt)
}

impl Backend for Sse2 {
    const CAPABILITY: Capability = Capability::Sse2;
    const WIDTH_BYTES: usize = 16;
    type Reg = __m128i;

    #[inline(always)]
    unsafe fn load(p: *const u8) -> __m128i {
        _mm_load_si128(p.cast())
    }

    #[inline(always)]
    unsafe fn store(p: *mut u8, v: __m128i) {
        _mm_store_si128(p.cast(), v)
    }

    #[inline(always)]
    fn zero() -> __m128i {
        unsafe { _mm_setzero_si128() }
    }

    #[inline(always)]
    fn splat<T: Element>(v: T) -> __m128i {
        let bits = v.to_lane_bits();
        unsafe {
            match T::SIZE {
                1 => _mm_set1_epi8(bits as i8),
                2 => _mm_set1_epi16(bits as i16),
                4 => _mm_set1_epi32(bits as i32),
                _ => _mm_set1_epi64x(bits as i64),
            }
        }
    }

    #[inline(always)]
    fn add<T: Element>(a: __m128i, b: __m128i) -> __m128i {
        unsafe {
            match T::KIND {
                ElementKind::F32 => from_ps(_mm_add_ps(ps(a), ps(b))),
                ElementKind::F64 => from_pd(_mm_add_pd(pd(a), pd(b))),
                _ => match T::SIZE {
                    1 => _mm_add_epi8(a, b),
                    2 => _mm_add_epi16(a, b),
                    4 => _mm_add_epi32(a, b),
                    _ => _mm_add_epi64(a, b),
                },
            }
        }
    }

    #[inline(always)]
    fn sub<T: Element>(a: __m128i, b: __m128i) -> __m128i {
        unsafe {
            match T::KIND {
                ElementKind::F32 => from_ps(_mm_sub_ps(ps(a), ps(b))),
                ElementKind::F64 => from_pd(_mm_sub_pd(pd(a), pd(b))),
                _ => match T::SIZE {
                    1 => _mm_sub_epi8(a, b),
                    2 => _mm_sub_epi16(a, b),
                    4 => _mm_sub_epi32(a, b),
                    _ => _mm_sub_epi64(a, b),
                },
            }
        }
    }

    #[inline(always)]
    fn bit_and(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_and_si128(a, b) }
    }

    #[inline(always)]
    fn bit_or(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_or_si128(a, b) }
    }

    #[inline(always)]
    fn bit_xor(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_xor_si128(a, b) }
    }

    #[inline(always)]
    fn bit_andnot(a: __m128i, b: __m128i) -> __m128i {
        // the intrinsic negates its first operand
        unsafe { _mm_andnot_si128(b, a) }
    }

    #[inline(always)]
    fn cmp_eq<T: Element>(a: __m128i, b: __m128i) -> __m128i {
        unsafe {
            match T::KIND {
                ElementKind::F32 => from_ps(_mm_cmpeq_ps(ps(a), ps(b))),
                ElementKind::F64 => from_pd(_mm_cmpeq_pd(pd(a), pd(b))),
                _ => match T::SIZE {
                    1 => _mm_cmpeq_epi8(a, b),
                    2 => _mm_cmpeq_epi16(a, b),
                    4 => _mm_cmpeq_epi32(a, b),
                    _ => cmpeq_epi64(a, b),
                },
            }
        }
    }

    #[inline(always)]
    fn cmp_lt<T: Element>(a: __m128i, b: __m128i) -> __m128i {
        unsafe {
            match T::KIND {
                ElementKind::F32 => from_ps(_mm_cmplt_ps(ps(a), ps(b))),
                ElementKind::F64 => from_pd(_mm_cmplt_pd(pd(a), pd(b))),
                kind => {
                    let (a, b) = if kind.is_signed() {
                        (a, b)
                    } else {
                        let sign = sign_bits::<T>();
                        (_mm_xor_si128(a, sign), _mm_xor_si128(b, sign))
                    };
                    match T::SIZE {
                        1 => _mm_cmplt_epi8(a, b),
                        2 => _mm_cmplt_epi16(a, b),
                        4 => _mm_cmplt_epi32(a, b),
                        _ => cmplt_epi64(a, b),
                    }
                }
            }
        }
    }

    #[inline(always)]
    fn isnan<T: Float>(a: __m128i) -> __m128i {
        Self::isnan2::<T>(a, a)
    }

    #[inline(always)]
    fn isnan2<T: Float>(a: __m128i, b: __m128i) -> __m128i {
        unsafe {
            match T::KIND {
                ElementKind::F32 => from_ps(_mm_cmpunord_ps(ps(a), ps(b))),
                _ => from_pd(_mm_cmpunord_pd(pd(a), pd(b))),
            }
        }
    }

    #[inline(always)]
    fn move_r_bytes(a: __m128i, bytes: usize) -> __m128i {
        macro_rules! slli {
            ($($n:literal)*) => {
                match bytes {
                    0 => a,
                    $($n => _mm_slli_si128::<$n>(a),)*
                    _ => _mm_setzero_si128(),
                }
            };
        }
        unsafe { slli!(1 2 3 4 5 6 7 8 9 10 11 12 13 14 15) }
    }

    #[inline(always)]
    fn permute4<T: Element>(a: __m128i, sel: [usize; 4]) -> __m128i {
        let imm = (sel[0] | sel[1] << 2 | sel[2] << 4 | sel[3] << 6) as i32;
        unsafe {
            if T::SIZE == 2 {
                constify_imm8!(imm, |IMM| _mm_shufflehi_epi16::<IMM>(_mm_shufflelo_epi16::<IMM>(a)))
            } else {
                constify_imm8!(imm, |IMM| _mm_shuffle_epi32::<IMM>(a))
            }
        }
    }

    #[inline(always)]
    fn permute2<T: Element>(a: __m128i, sel: [usize; 2]) -> __m128i {
        Self::permute4::<u32>(a, [2 * sel[0], 2 * sel[0] + 1, 2 * sel[1], 2 * sel[1] + 1])
    }

    #[inline(always)]
    fn interleave2<T: Element>(a: __m128i, b: __m128i) -> (__m128i, __m128i) {
        unsafe {
            match T::SIZE {
                1 => (_mm_unpacklo_epi8(a, b), _mm_unpackhi_epi8(a, b)),
                2 => (_mm_unpacklo_epi16(a, b), _mm_unpackhi_epi16(a, b)),
                4 => (_mm_unpacklo_epi32(a, b), _mm_unpackhi_epi32(a, b)),
                _ => (_mm_unpacklo_epi64(a, b), _mm_unpackhi_epi64(a, b)),
            }
        }
    }

    #[inline(always)]
    fn deinterleave2<T: Element>(r0: __m128i, r1: __m128i) -> (__m128i, __m128i) {
        unsafe {
            match T::SIZE {
                4 => {
                    let (x, y) = (ps(r0), ps(r1));
                    (
                        from_ps(_mm_shuffle_ps::<{ shuf(0, 2, 0, 2) }>(x, y)),
                        from_ps(_mm_shuffle_ps::<{ shuf(1, 3, 1, 3) }>(x, y)),
                    )
                }
                8 => (_mm_unpacklo_epi64(r0, r1), _mm_unpackhi_epi64(r0, r1)),
                _ => super::deinterleave2_by_zips::<Self, T>(r0, r1),
            }
        }
    }

    #[inline(always)]
    fn interleave3<T: Element>(
        a: __m128i,
        b: __m128i,
        c: __m128i,
    ) -> (__m128i, __m128i, __m128i) {
        unsafe {
            match T::SIZE {
                4 => {
                    let (a, b, c) = (ps(a), ps(b), ps(c));
                    // a0 b0 c0 a1 | b1 c1 a2 b2 | c2 a3 b3 c3
                    let r0 = pick_even(
                        _mm_shuffle_ps::<{ shuf(0, 0, 0, 0) }>(a, b),
                        _mm_shuffle_ps::<{ shuf(0, 0, 1, 1) }>(c, a),
                    );
                    let r1 = pick_even(
                        _mm_shuffle_ps::<{ shuf(1, 1, 1, 1) }>(b, c),
                        _mm_shuffle_ps::<{ shuf(2, 2, 2, 2) }>(a, b),
                    );
                    let r2 = pick_even(
                        _mm_shuffle_ps::<{ shuf(2, 2, 3, 3) }>(c, a),
                        _mm_shuffle_ps::<{ shuf(3, 3, 3, 3) }>(b, c),
                    );
                    (from_ps(r0), from_ps(r1), from_ps(r2))
                }
                8 => {
                    let (a, b, c) = (pd(a), pd(b), pd(c));
                    (
                        from_pd(_mm_unpacklo_pd(a, b)),
                        from_pd(_mm_shuffle_pd::<0b10>(c, a)),
                        from_pd(_mm_unpackhi_pd(b, c)),
                    )
                }
                _ => {
                    let [r0, r1, r2] = super::emulate::interleave::<Self, T, 3>([a, b, c]);
                    (r0, r1, r2)
                }
            }
        }
    }

    #[inline(always)]
    fn deinterleave3<T: Element>(
        r0: __m128i,
        r1: __m128i,
        r2: __m128i,
    ) -> (__m128i, __m128i, __m128i) {
        unsafe {
            match T::SIZE {
                4 => {
                    let (x, y, z) = (ps(r0), ps(r1), ps(r2));
                    let a = pick_even(
                        _mm_shuffle_ps::<{ shuf(0, 0, 3, 3) }>(x, x),
                        _mm_shuffle_ps::<{ shuf(2, 2, 1, 1) }>(y, z),
                    );
                    let b = pick_even(
                        _mm_shuffle_ps::<{ shuf(1, 1, 0, 0) }>(x, y),
                        _mm_shuffle_ps::<{ shuf(3, 3, 2, 2) }>(y, z),
                    );
                    let c = pick_even(
                        _mm_shuffle_ps::<{ shuf(2, 2, 1, 1) }>(x, y),
                        _mm_shuffle_ps::<{ shuf(0, 0, 3, 3) }>(z, z),
                    );
                    (from_ps(a), from_ps(b), from_ps(c))
                }
                8 => {
                    let (x, y, z) = (pd(r0), pd(r1), pd(r2));
                    (
                        from_pd(_mm_shuffle_pd::<0b10>(x, y)),
                        from_pd(_mm_shuffle_pd::<0b01>(x, z)),
                        from_pd(_mm_shuffle_pd::<0b10>(y, z)),
                    )
                }
                _ => {
                    let [a, b, c] = super::emulate::deinterleave::<Self, T, 3>([r0, r1, r2]);
                    (a, b, c)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::emulate::Staging;
    use super::super::null::{Block, Null};
    use super::*;

    fn reg<T: Element>(lanes: &[T]) -> __m128i {
        let block = Block::from_lanes(lanes);
        unsafe { Sse2::load(block.0.as_ptr()) }
    }

    fn lanes<T: Element>(r: __m128i) -> Vec<T> {
        Staging::from_reg::<Sse2>(r).lanes::<Sse2, T>().to_vec()
    }

    #[test]
    fn test_unsigned_and_wide_compares() {
        let a = reg(&[1u64, u64::MAX]);
        let b = reg(&[u64::MAX, 1]);
        assert_eq!(lanes::<u64>(Sse2::cmp_lt::<u64>(a, b)), vec![u64::MAX, 0]);
        assert_eq!(lanes::<u64>(Sse2::cmp_lt::<i64>(a, b)), vec![0, u64::MAX]);
        assert_eq!(lanes::<u64>(Sse2::cmp_eq::<u64>(a, a)), vec![u64::MAX; 2]);

        let a = reg(&[-5i64, 7]);
        let b = reg(&[-5i64 + (1 << 32), 7]);
        assert_eq!(lanes::<u64>(Sse2::cmp_eq::<i64>(a, b)), vec![0, u64::MAX]);
        assert_eq!(lanes::<u64>(Sse2::cmp_lt::<i64>(a, b)), vec![u64::MAX, 0]);
    }

    #[test]
    fn test_three_way_matches_fallback() {
        let a = [1.0f32, 2.0, 3.0, 4.0];
        let b = [5.0f32, 6.0, 7.0, 8.0];
        let c = [9.0f32, 10.0, 11.0, 12.0];
        let (r0, r1, r2) = Sse2::interleave3::<f32>(reg(&a), reg(&b), reg(&c));
        let (n0, n1, n2) = Null::interleave3::<f32>(
            Block::from_lanes(&a),
            Block::from_lanes(&b),
            Block::from_lanes(&c),
        );
        assert_eq!(lanes::<f32>(r0), n0.lanes::<f32>());
        assert_eq!(lanes::<f32>(r1), n1.lanes::<f32>());
        assert_eq!(lanes::<f32>(r2), n2.lanes::<f32>());

        let (da, db, dc) = Sse2::deinterleave3::<f32>(r0, r1, r2);
        assert_eq!(lanes::<f32>(da), a);
        assert_eq!(lanes::<f32>(db), b);
        assert_eq!(lanes::<f32>(dc), c);

        let (r0, r1, r2) = Sse2::interleave3::<u64>(reg(&[1u64, 2]), reg(&[3u64, 4]), reg(&[5u64, 6]));
        assert_eq!(lanes::<u64>(r0), vec![1, 3]);
        assert_eq!(lanes::<u64>(r1), vec![5, 2]);
        assert_eq!(lanes::<u64>(r2), vec![4, 6]);
        let (da, db, dc) = Sse2::deinterleave3::<u64>(r0, r1, r2);
        assert_eq!(
            (lanes::<u64>(da), lanes::<u64>(db), lanes::<u64>(dc)),
            (vec![1, 2], vec![3, 4], vec![5, 6])
        );
    }

    #[test]
    fn test_permute_immediates() {
        let a = reg(&[10u16, 11, 12, 13, 20, 21, 22, 23]);
        assert_eq!(
            lanes::<u16>(Sse2::permute4::<u16>(a, [1, 0, 3, 2])),
            vec![11, 10, 13, 12, 21, 20, 23, 22]
        );
        let a = reg(&[7u64, 9]);
        assert_eq!(lanes::<u64>(Sse2::permute2::<u64>(a, [1, 0])), vec![9, 7]);
    }
}
