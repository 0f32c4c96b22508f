//! NEON backend: 128-bit Advanced SIMD registers on AArch64
//!
//! NEON has native structured loads and stores for two, three and four
//! planes, so every packed access is a single instruction pair.

use std::arch::aarch64::*;

use super::Backend;
use crate::capability::Capability;
use crate::element::{Element, ElementKind, Float};

/// NEON backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neon;

/// Applies a 16-, 32- or 64-bit unsigned intrinsic to byte registers
macro_rules! by_width {
    ($size:expr, $a:expr, $b:expr, $op8:ident, $op16:ident, $op32:ident, $op64:ident) => {
        match $size {
            1 => $op8($a, $b),
            2 => vreinterpretq_u8_u16($op16(vreinterpretq_u16_u8($a), vreinterpretq_u16_u8($b))),
            4 => vreinterpretq_u8_u32($op32(vreinterpretq_u32_u8($a), vreinterpretq_u32_u8($b))),
            _ => vreinterpretq_u8_u64($op64(vreinterpretq_u64_u8($a), vreinterpretq_u64_u8($b))),
        }
    };
}

/// Byte indices for a table lookup that permutes groups of `G` lanes
fn permute_table<T: Element, const G: usize>(sel: [usize; G]) -> [u8; 16] {
    std::array::from_fn(|i| {
        let lane = i / T::SIZE;
        let byte = i % T::SIZE;
        let group = lane / G * G;
        ((group + sel[lane % G]) * T::SIZE + byte) as u8
    })
}

impl Backend for Neon {
    const CAPABILITY: Capability = Capability::Neon;
    const WIDTH_BYTES: usize = 16;
    type Reg = uint8x16_t;

    #[inline(always)]
    unsafe fn load(p: *const u8) -> uint8x16_t {
        vld1q_u8(p)
    }

    #[inline(always)]
    unsafe fn store(p: *mut u8, v: uint8x16_t) {
        vst1q_u8(p, v)
    }

    #[inline(always)]
    fn zero() -> uint8x16_t {
        unsafe { vdupq_n_u8(0) }
    }

    #[inline(always)]
    fn splat<T: Element>(v: T) -> uint8x16_t {
        let bits = v.to_lane_bits();
        unsafe {
            match T::SIZE {
                1 => vdupq_n_u8(bits as u8),
                2 => vreinterpretq_u8_u16(vdupq_n_u16(bits as u16)),
                4 => vreinterpretq_u8_u32(vdupq_n_u32(bits as u32)),
                _ => vreinterpretq_u8_u64(vdupq_n_u64(bits)),
            }
        }
    }

    #[inline(always)]
    fn add<T: Element>(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        unsafe {
            match T::KIND {
                ElementKind::F32 => vreinterpretq_u8_f32(vaddq_f32(
                    vreinterpretq_f32_u8(a),
                    vreinterpretq_f32_u8(b),
                )),
                ElementKind::F64 => vreinterpretq_u8_f64(vaddq_f64(
                    vreinterpretq_f64_u8(a),
                    vreinterpretq_f64_u8(b),
                )),
                _ => by_width!(T::SIZE, a, b, vaddq_u8, vaddq_u16, vaddq_u32, vaddq_u64),
            }
        }
    }

    #[inline(always)]
    fn sub<T: Element>(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        unsafe {
            match T::KIND {
                ElementKind::F32 => vreinterpretq_u8_f32(vsubq_f32(
                    vreinterpretq_f32_u8(a),
                    vreinterpretq_f32_u8(b),
                )),
                ElementKind::F64 => vreinterpretq_u8_f64(vsubq_f64(
                    vreinterpretq_f64_u8(a),
                    vreinterpretq_f64_u8(b),
                )),
                _ => by_width!(T::SIZE, a, b, vsubq_u8, vsubq_u16, vsubq_u32, vsubq_u64),
            }
        }
    }

    #[inline(always)]
    fn bit_and(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        unsafe { vandq_u8(a, b) }
    }

    #[inline(always)]
    fn bit_or(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        unsafe { vorrq_u8(a, b) }
    }

    #[inline(always)]
    fn bit_xor(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        unsafe { veorq_u8(a, b) }
    }

    #[inline(always)]
    fn bit_andnot(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        unsafe { vbicq_u8(a, b) }
    }

    #[inline(always)]
    fn bit_not(a: uint8x16_t) -> uint8x16_t {
        unsafe { vmvnq_u8(a) }
    }

    #[inline(always)]
    fn cmp_eq<T: Element>(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        unsafe {
            match T::KIND {
                ElementKind::F32 => vreinterpretq_u8_u32(vceqq_f32(
                    vreinterpretq_f32_u8(a),
                    vreinterpretq_f32_u8(b),
                )),
                ElementKind::F64 => vreinterpretq_u8_u64(vceqq_f64(
                    vreinterpretq_f64_u8(a),
                    vreinterpretq_f64_u8(b),
                )),
                _ => by_width!(T::SIZE, a, b, vceqq_u8, vceqq_u16, vceqq_u32, vceqq_u64),
            }
        }
    }

    #[inline(always)]
    fn cmp_lt<T: Element>(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        unsafe {
            match T::KIND {
                ElementKind::F32 => vreinterpretq_u8_u32(vcltq_f32(
                    vreinterpretq_f32_u8(a),
                    vreinterpretq_f32_u8(b),
                )),
                ElementKind::F64 => vreinterpretq_u8_u64(vcltq_f64(
                    vreinterpretq_f64_u8(a),
                    vreinterpretq_f64_u8(b),
                )),
                ElementKind::I8 => vcltq_s8(vreinterpretq_s8_u8(a), vreinterpretq_s8_u8(b)),
                ElementKind::I16 => vreinterpretq_u8_u16(vcltq_s16(
                    vreinterpretq_s16_u8(a),
                    vreinterpretq_s16_u8(b),
                )),
                ElementKind::I32 => vreinterpretq_u8_u32(vcltq_s32(
                    vreinterpretq_s32_u8(a),
                    vreinterpretq_s32_u8(b),
                )),
                ElementKind::I64 => vreinterpretq_u8_u64(vcltq_s64(
                    vreinterpretq_s64_u8(a),
                    vreinterpretq_s64_u8(b),
                )),
                _ => by_width!(T::SIZE, a, b, vcltq_u8, vcltq_u16, vcltq_u32, vcltq_u64),
            }
        }
    }

    #[inline(always)]
    fn isnan<T: Float>(a: uint8x16_t) -> uint8x16_t {
        // only NaN compares unequal to itself
        unsafe { vmvnq_u8(Self::cmp_eq::<T>(a, a)) }
    }

    #[inline(always)]
    fn blend(mask: uint8x16_t, a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        unsafe { vbslq_u8(mask, a, b) }
    }

    #[inline(always)]
    fn move_r_bytes(a: uint8x16_t, bytes: usize) -> uint8x16_t {
        macro_rules! ext {
            ($($n:literal)*) => {
                match bytes {
                    0 => a,
                    $($n => vextq_u8::<{ 16 - $n }>(vdupq_n_u8(0), a),)*
                    _ => vdupq_n_u8(0),
                }
            };
        }
        unsafe { ext!(1 2 3 4 5 6 7 8 9 10 11 12 13 14 15) }
    }

    #[inline(always)]
    fn permute4<T: Element>(a: uint8x16_t, sel: [usize; 4]) -> uint8x16_t {
        let table = permute_table::<T, 4>(sel);
        unsafe { vqtbl1q_u8(a, vld1q_u8(table.as_ptr())) }
    }

    #[inline(always)]
    fn permute2<T: Element>(a: uint8x16_t, sel: [usize; 2]) -> uint8x16_t {
        let table = permute_table::<T, 2>(sel);
        unsafe { vqtbl1q_u8(a, vld1q_u8(table.as_ptr())) }
    }

    #[inline(always)]
    fn interleave2<T: Element>(a: uint8x16_t, b: uint8x16_t) -> (uint8x16_t, uint8x16_t) {
        unsafe {
            (
                by_width!(T::SIZE, a, b, vzip1q_u8, vzip1q_u16, vzip1q_u32, vzip1q_u64),
                by_width!(T::SIZE, a, b, vzip2q_u8, vzip2q_u16, vzip2q_u32, vzip2q_u64),
            )
        }
    }

    #[inline(always)]
    fn deinterleave2<T: Element>(r0: uint8x16_t, r1: uint8x16_t) -> (uint8x16_t, uint8x16_t) {
        unsafe {
            (
                by_width!(T::SIZE, r0, r1, vuzp1q_u8, vuzp1q_u16, vuzp1q_u32, vuzp1q_u64),
                by_width!(T::SIZE, r0, r1, vuzp2q_u8, vuzp2q_u16, vuzp2q_u32, vuzp2q_u64),
            )
        }
    }

    #[inline(always)]
    unsafe fn store_packed2<T: Element>(p: *mut u8, a: uint8x16_t, b: uint8x16_t) {
        match T::SIZE {
            1 => vst2q_u8(p, uint8x16x2_t(a, b)),
            2 => vst2q_u16(
                p.cast(),
                uint16x8x2_t(vreinterpretq_u16_u8(a), vreinterpretq_u16_u8(b)),
            ),
            4 => vst2q_u32(
                p.cast(),
                uint32x4x2_t(vreinterpretq_u32_u8(a), vreinterpretq_u32_u8(b)),
            ),
            _ => vst2q_u64(
                p.cast(),
                uint64x2x2_t(vreinterpretq_u64_u8(a), vreinterpretq_u64_u8(b)),
            ),
        }
    }

    #[inline(always)]
    unsafe fn load_packed2<T: Element>(p: *const u8) -> (uint8x16_t, uint8x16_t) {
        match T::SIZE {
            1 => {
                let r = vld2q_u8(p);
                (r.0, r.1)
            }
            2 => {
                let r = vld2q_u16(p.cast());
                (vreinterpretq_u8_u16(r.0), vreinterpretq_u8_u16(r.1))
            }
            4 => {
                let r = vld2q_u32(p.cast());
                (vreinterpretq_u8_u32(r.0), vreinterpretq_u8_u32(r.1))
            }
            _ => {
                let r = vld2q_u64(p.cast());
                (vreinterpretq_u8_u64(r.0), vreinterpretq_u8_u64(r.1))
            }
        }
    }

    #[inline(always)]
    unsafe fn store_packed3<T: Element>(p: *mut u8, a: uint8x16_t, b: uint8x16_t, c: uint8x16_t) {
        match T::SIZE {
            1 => vst3q_u8(p, uint8x16x3_t(a, b, c)),
            2 => vst3q_u16(
                p.cast(),
                uint16x8x3_t(
                    vreinterpretq_u16_u8(a),
                    vreinterpretq_u16_u8(b),
                    vreinterpretq_u16_u8(c),
                ),
            ),
            4 => vst3q_u32(
                p.cast(),
                uint32x4x3_t(
                    vreinterpretq_u32_u8(a),
                    vreinterpretq_u32_u8(b),
                    vreinterpretq_u32_u8(c),
                ),
            ),
            _ => vst3q_u64(
                p.cast(),
                uint64x2x3_t(
                    vreinterpretq_u64_u8(a),
                    vreinterpretq_u64_u8(b),
                    vreinterpretq_u64_u8(c),
                ),
            ),
        }
    }

    #[inline(always)]
    unsafe fn load_packed3<T: Element>(p: *const u8) -> (uint8x16_t, uint8x16_t, uint8x16_t) {
        match T::SIZE {
            1 => {
                let r = vld3q_u8(p);
                (r.0, r.1, r.2)
            }
            2 => {
                let r = vld3q_u16(p.cast());
                (
                    vreinterpretq_u8_u16(r.0),
                    vreinterpretq_u8_u16(r.1),
                    vreinterpretq_u8_u16(r.2),
                )
            }
            4 => {
                let r = vld3q_u32(p.cast());
                (
                    vreinterpretq_u8_u32(r.0),
                    vreinterpretq_u8_u32(r.1),
                    vreinterpretq_u8_u32(r.2),
                )
            }
            _ => {
                let r = vld3q_u64(p.cast());
                (
                    vreinterpretq_u8_u64(r.0),
                    vreinterpretq_u8_u64(r.1),
                    vreinterpretq_u8_u64(r.2),
                )
            }
        }
    }

    #[inline(always)]
    unsafe fn store_packed4<T: Element>(
        p: *mut u8,
        a: uint8x16_t,
        b: uint8x16_t,
        c: uint8x16_t,
        d: uint8x16_t,
    ) {
        match T::SIZE {
            1 => vst4q_u8(p, uint8x16x4_t(a, b, c, d)),
            2 => vst4q_u16(
                p.cast(),
                uint16x8x4_t(
                    vreinterpretq_u16_u8(a),
                    vreinterpretq_u16_u8(b),
                    vreinterpretq_u16_u8(c),
                    vreinterpretq_u16_u8(d),
                ),
            ),
            4 => vst4q_u32(
                p.cast(),
                uint32x4x4_t(
                    vreinterpretq_u32_u8(a),
                    vreinterpretq_u32_u8(b),
                    vreinterpretq_u32_u8(c),
                    vreinterpretq_u32_u8(d),
                ),
            ),
            _ => vst4q_u64(
                p.cast(),
                uint64x2x4_t(
                    vreinterpretq_u64_u8(a),
                    vreinterpretq_u64_u8(b),
                    vreinterpretq_u64_u8(c),
                    vreinterpretq_u64_u8(d),
                ),
            ),
        }
    }

    #[inline(always)]
    unsafe fn load_packed4<T: Element>(
        p: *const u8,
    ) -> (uint8x16_t, uint8x16_t, uint8x16_t, uint8x16_t) {
        match T::SIZE {
            1 => {
                let r = vld4q_u8(p);
                (r.0, r.1, r.2, r.3)
            }
            2 => {
                let r = vld4q_u16(p.cast());
                (
                    vreinterpretq_u8_u16(r.0),
                    vreinterpretq_u8_u16(r.1),
                    vreinterpretq_u8_u16(r.2),
                    vreinterpretq_u8_u16(r.3),
                )
            }
            4 => {
                let r = vld4q_u32(p.cast());
                (
                    vreinterpretq_u8_u32(r.0),
                    vreinterpretq_u8_u32(r.1),
                    vreinterpretq_u8_u32(r.2),
                    vreinterpretq_u8_u32(r.3),
                )
            }
            _ => {
                let r = vld4q_u64(p.cast());
                (
                    vreinterpretq_u8_u64(r.0),
                    vreinterpretq_u8_u64(r.1),
                    vreinterpretq_u8_u64(r.2),
                    vreinterpretq_u8_u64(r.3),
                )
            }
        }
    }
}
