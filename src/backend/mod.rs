//! Instruction-set backends
//!
//! A backend knows how to run every operation on one native register. The
//! logical [`Vector`](crate::Vector) type decomposes into registers and
//! calls into the backend once per register; nothing above this module
//! touches intrinsics.
//!
//! Backends implement the small set of required methods. Everything else
//! has a default built from those, so a backend only overrides what its
//! instruction set does better.

use std::fmt;

use crate::capability::Capability;
use crate::element::{Element, Float};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[macro_use]
mod imm8;

pub(crate) mod emulate;
pub mod null;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
pub mod sse2;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "avx2"))]
pub mod avx2;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub mod neon;

#[cfg(any(
    all(feature = "null", any(feature = "sse2", feature = "avx2", feature = "neon")),
    all(feature = "sse2", any(feature = "avx2", feature = "neon")),
    all(feature = "avx2", feature = "neon"),
))]
compile_error!("at most one of the `null`, `sse2`, `avx2` and `neon` features may be enabled");

#[cfg(all(
    feature = "sse2",
    not(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))
))]
compile_error!("the `sse2` feature requires an x86 target with SSE2 enabled");

#[cfg(all(
    feature = "avx2",
    not(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "avx2"))
))]
compile_error!("the `avx2` feature requires an x86 target built with `-C target-feature=+avx2`");

#[cfg(all(
    feature = "neon",
    not(all(target_arch = "aarch64", target_feature = "neon"))
))]
compile_error!("the `neon` feature requires an aarch64 target with NEON enabled");

cfg_if::cfg_if! {
    if #[cfg(feature = "null")] {
        /// Backend selected for this build
        pub type Active = null::Null;
    } else if #[cfg(feature = "sse2")] {
        /// Backend selected for this build
        pub type Active = sse2::Sse2;
    } else if #[cfg(feature = "avx2")] {
        /// Backend selected for this build
        pub type Active = avx2::Avx2;
    } else if #[cfg(feature = "neon")] {
        /// Backend selected for this build
        pub type Active = neon::Neon;
    } else if #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "avx2"))] {
        /// Backend selected for this build
        pub type Active = avx2::Avx2;
    } else if #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))] {
        /// Backend selected for this build
        pub type Active = sse2::Sse2;
    } else if #[cfg(all(target_arch = "aarch64", target_feature = "neon"))] {
        /// Backend selected for this build
        pub type Active = neon::Neon;
    } else {
        /// Backend selected for this build
        pub type Active = null::Null;
    }
}

/// Operations on one native register.
///
/// Lane-typed methods take the element type as a generic parameter and
/// dispatch on `T::KIND`, which folds away after monomorphization. Mask
/// registers hold all-ones or all-zeros lanes of the element width.
///
/// Shuffles with an element-count selector (`move_r_bytes`, `permute2`,
/// `permute4`) act independently within each 16-byte block of the register.
pub trait Backend: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Capability this backend implements
    const CAPABILITY: Capability;

    /// Register width in bytes; also the alignment loads and stores require
    const WIDTH_BYTES: usize;

    /// Native register type
    type Reg: Copy;

    /// Loads one register.
    ///
    /// # Safety
    ///
    /// `p` must be valid for `WIDTH_BYTES` bytes of reads and aligned to
    /// `WIDTH_BYTES`.
    unsafe fn load(p: *const u8) -> Self::Reg;

    /// Stores one register.
    ///
    /// # Safety
    ///
    /// `p` must be valid for `WIDTH_BYTES` bytes of writes and aligned to
    /// `WIDTH_BYTES`.
    unsafe fn store(p: *mut u8, v: Self::Reg);

    /// All-zeros register
    fn zero() -> Self::Reg;

    /// Every lane set to `v`
    fn splat<T: Element>(v: T) -> Self::Reg;

    /// Lane-wise addition, wrapping for integers
    fn add<T: Element>(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Lane-wise subtraction, wrapping for integers
    fn sub<T: Element>(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// `a & b`
    fn bit_and(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// `a | b`
    fn bit_or(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// `a ^ b`
    fn bit_xor(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// `a & !b`
    fn bit_andnot(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// `!a`
    #[inline(always)]
    fn bit_not(a: Self::Reg) -> Self::Reg {
        Self::bit_xor(a, Self::splat(u8::MAX))
    }

    /// Lane-wise `a == b` as a mask
    fn cmp_eq<T: Element>(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Lane-wise `a < b` as a mask, signed or unsigned per `T`
    fn cmp_lt<T: Element>(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Lanes that hold a NaN
    fn isnan<T: Float>(a: Self::Reg) -> Self::Reg;

    /// Lanes where either input holds a NaN
    #[inline(always)]
    fn isnan2<T: Float>(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        Self::bit_or(Self::isnan::<T>(a), Self::isnan::<T>(b))
    }

    /// Takes `a` where `mask` is set and `b` elsewhere
    #[inline(always)]
    fn blend(mask: Self::Reg, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        Self::bit_or(Self::bit_and(a, mask), Self::bit_andnot(b, mask))
    }

    /// Moves every byte `bytes` positions towards the high end of its
    /// 16-byte block, filling with zeros. `bytes` is at most 16.
    fn move_r_bytes(a: Self::Reg, bytes: usize) -> Self::Reg;

    /// Within each group of four lanes, lane `i` takes lane `sel[i]`.
    /// Only called for 16- and 32-bit lanes; every selector is below 4.
    fn permute4<T: Element>(a: Self::Reg, sel: [usize; 4]) -> Self::Reg;

    /// Within each group of two 64-bit lanes, lane `i` takes lane `sel[i]`
    fn permute2<T: Element>(a: Self::Reg, sel: [usize; 2]) -> Self::Reg;

    /// Zips two registers: the result pair holds `a0 b0 a1 b1 ...`
    fn interleave2<T: Element>(a: Self::Reg, b: Self::Reg) -> (Self::Reg, Self::Reg);

    /// Inverse of [`interleave2`](Backend::interleave2)
    #[inline(always)]
    fn deinterleave2<T: Element>(r0: Self::Reg, r1: Self::Reg) -> (Self::Reg, Self::Reg) {
        deinterleave2_by_zips::<Self, T>(r0, r1)
    }

    /// Three-way interleave: the result triple holds `a0 b0 c0 a1 b1 c1 ...`
    #[inline(always)]
    fn interleave3<T: Element>(
        a: Self::Reg,
        b: Self::Reg,
        c: Self::Reg,
    ) -> (Self::Reg, Self::Reg, Self::Reg) {
        let [r0, r1, r2] = emulate::interleave::<Self, T, 3>([a, b, c]);
        (r0, r1, r2)
    }

    /// Inverse of [`interleave3`](Backend::interleave3)
    #[inline(always)]
    fn deinterleave3<T: Element>(
        r0: Self::Reg,
        r1: Self::Reg,
        r2: Self::Reg,
    ) -> (Self::Reg, Self::Reg, Self::Reg) {
        let [a, b, c] = emulate::deinterleave::<Self, T, 3>([r0, r1, r2]);
        (a, b, c)
    }

    /// Four-way interleave built from two levels of zips
    #[inline(always)]
    fn interleave4<T: Element>(
        a: Self::Reg,
        b: Self::Reg,
        c: Self::Reg,
        d: Self::Reg,
    ) -> (Self::Reg, Self::Reg, Self::Reg, Self::Reg) {
        let (ac_lo, ac_hi) = Self::interleave2::<T>(a, c);
        let (bd_lo, bd_hi) = Self::interleave2::<T>(b, d);
        let (r0, r1) = Self::interleave2::<T>(ac_lo, bd_lo);
        let (r2, r3) = Self::interleave2::<T>(ac_hi, bd_hi);
        (r0, r1, r2, r3)
    }

    /// Inverse of [`interleave4`](Backend::interleave4)
    #[inline(always)]
    fn deinterleave4<T: Element>(
        r0: Self::Reg,
        r1: Self::Reg,
        r2: Self::Reg,
        r3: Self::Reg,
    ) -> (Self::Reg, Self::Reg, Self::Reg, Self::Reg) {
        let (ac_lo, bd_lo) = Self::deinterleave2::<T>(r0, r1);
        let (ac_hi, bd_hi) = Self::deinterleave2::<T>(r2, r3);
        let (a, c) = Self::deinterleave2::<T>(ac_lo, ac_hi);
        let (b, d) = Self::deinterleave2::<T>(bd_lo, bd_hi);
        (a, b, c, d)
    }

    /// Writes `a` and `b` interleaved to `2 * WIDTH_BYTES` bytes at `p`.
    ///
    /// # Safety
    ///
    /// Same contract as [`store`](Backend::store), for the whole region.
    #[inline(always)]
    unsafe fn store_packed2<T: Element>(p: *mut u8, a: Self::Reg, b: Self::Reg) {
        let (r0, r1) = Self::interleave2::<T>(a, b);
        Self::store(p, r0);
        Self::store(p.add(Self::WIDTH_BYTES), r1);
    }

    /// Reads `2 * WIDTH_BYTES` interleaved bytes at `p` into two registers.
    ///
    /// # Safety
    ///
    /// Same contract as [`load`](Backend::load), for the whole region.
    #[inline(always)]
    unsafe fn load_packed2<T: Element>(p: *const u8) -> (Self::Reg, Self::Reg) {
        let r0 = Self::load(p);
        let r1 = Self::load(p.add(Self::WIDTH_BYTES));
        Self::deinterleave2::<T>(r0, r1)
    }

    /// Three-register variant of [`store_packed2`](Backend::store_packed2).
    ///
    /// # Safety
    ///
    /// Same contract as [`store`](Backend::store), for the whole region.
    #[inline(always)]
    unsafe fn store_packed3<T: Element>(p: *mut u8, a: Self::Reg, b: Self::Reg, c: Self::Reg) {
        let (r0, r1, r2) = Self::interleave3::<T>(a, b, c);
        Self::store(p, r0);
        Self::store(p.add(Self::WIDTH_BYTES), r1);
        Self::store(p.add(2 * Self::WIDTH_BYTES), r2);
    }

    /// Three-register variant of [`load_packed2`](Backend::load_packed2).
    ///
    /// # Safety
    ///
    /// Same contract as [`load`](Backend::load), for the whole region.
    #[inline(always)]
    unsafe fn load_packed3<T: Element>(p: *const u8) -> (Self::Reg, Self::Reg, Self::Reg) {
        let r0 = Self::load(p);
        let r1 = Self::load(p.add(Self::WIDTH_BYTES));
        let r2 = Self::load(p.add(2 * Self::WIDTH_BYTES));
        Self::deinterleave3::<T>(r0, r1, r2)
    }

    /// Four-register variant of [`store_packed2`](Backend::store_packed2).
    ///
    /// # Safety
    ///
    /// Same contract as [`store`](Backend::store), for the whole region.
    #[inline(always)]
    unsafe fn store_packed4<T: Element>(
        p: *mut u8,
        a: Self::Reg,
        b: Self::Reg,
        c: Self::Reg,
        d: Self::Reg,
    ) {
        let (r0, r1, r2, r3) = Self::interleave4::<T>(a, b, c, d);
        Self::store(p, r0);
        Self::store(p.add(Self::WIDTH_BYTES), r1);
        Self::store(p.add(2 * Self::WIDTH_BYTES), r2);
        Self::store(p.add(3 * Self::WIDTH_BYTES), r3);
    }

    /// Four-register variant of [`load_packed2`](Backend::load_packed2).
    ///
    /// # Safety
    ///
    /// Same contract as [`load`](Backend::load), for the whole region.
    #[inline(always)]
    unsafe fn load_packed4<T: Element>(
        p: *const u8,
    ) -> (Self::Reg, Self::Reg, Self::Reg, Self::Reg) {
        let r0 = Self::load(p);
        let r1 = Self::load(p.add(Self::WIDTH_BYTES));
        let r2 = Self::load(p.add(2 * Self::WIDTH_BYTES));
        let r3 = Self::load(p.add(3 * Self::WIDTH_BYTES));
        Self::deinterleave4::<T>(r0, r1, r2, r3)
    }
}

/// Inverts a zip by zipping again.
///
/// A zip of two `n`-lane registers is the perfect shuffle of `2n` lanes,
/// whose order is `log2(2n)`, so `log2(2n) - 1` more zips undo it.
#[inline(always)]
pub(crate) fn deinterleave2_by_zips<B: Backend, T: Element>(
    r0: B::Reg,
    r1: B::Reg,
) -> (B::Reg, B::Reg) {
    let lanes = B::WIDTH_BYTES / T::SIZE;
    let rounds = (2 * lanes).trailing_zeros() - 1;
    let (mut lo, mut hi) = (r0, r1);
    for _ in 0..rounds {
        (lo, hi) = B::interleave2::<T>(lo, hi);
    }
    (lo, hi)
}
