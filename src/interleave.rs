//! Interleaved ("packed") memory access
//!
//! `store_packedK` writes `K` vectors of `N` lanes as `N` groups of `K`
//! elements: `[a0, b0, .., a1, b1, .., ..]`. `load_packedK` is the inverse.
//! Vectors wider than one register are processed register by register;
//! register `i` of every input covers `K * base_lanes` consecutive
//! elements of memory starting at element `i * K * base_lanes`.

use crate::backend::Backend;
use crate::element::Element;
use crate::memory::{debug_assert_aligned, Aligned, AlignedMut};
use crate::vector::Vector;

pub use crate::backend::null::{deinterleave_lanes, interleave_lanes};

#[inline(always)]
fn check_len(ways: usize, lanes: usize, available: usize) {
    assert!(
        available >= ways * lanes,
        "packed access of {ways} x {lanes} elements, view holds {available}"
    );
}

/// Stores `a` and `b` interleaved.
///
/// # Panics
///
/// Panics if `dst` holds fewer than `2 * N` elements.
#[inline(always)]
pub fn store_packed2<T: Element, const N: usize, B: Backend>(
    dst: &mut AlignedMut<'_, T, B>,
    a: Vector<T, N, B>,
    b: Vector<T, N, B>,
) {
    check_len(2, N, dst.len());
    // SAFETY: aligned by construction of the view, length checked above
    unsafe { store_packed2_ptr(dst.as_mut_ptr(), a, b) }
}

/// Stores `a` and `b` interleaved at `p`.
///
/// # Safety
///
/// `p` must be aligned to `B::WIDTH_BYTES` and valid for `2 * N` writes.
#[inline(always)]
pub unsafe fn store_packed2_ptr<T: Element, const N: usize, B: Backend>(
    p: *mut T,
    a: Vector<T, N, B>,
    b: Vector<T, N, B>,
) {
    let p = p.cast::<u8>();
    debug_assert_aligned::<B>(p);
    for i in 0..Vector::<T, N, B>::VEC_LENGTH {
        B::store_packed2::<T>(p.add(2 * i * B::WIDTH_BYTES), a.reg(i), b.reg(i));
    }
}

/// Loads two vectors from `2 * N` interleaved elements.
///
/// # Panics
///
/// Panics if `src` holds fewer than `2 * N` elements.
#[inline(always)]
pub fn load_packed2<T: Element, const N: usize, B: Backend>(
    src: Aligned<'_, T, B>,
) -> (Vector<T, N, B>, Vector<T, N, B>) {
    check_len(2, N, src.len());
    // SAFETY: aligned by construction of the view, length checked above
    unsafe { load_packed2_ptr(src.as_ptr()) }
}

/// Loads two vectors from `2 * N` interleaved elements at `p`.
///
/// # Safety
///
/// `p` must be aligned to `B::WIDTH_BYTES` and valid for `2 * N` reads.
#[inline(always)]
pub unsafe fn load_packed2_ptr<T: Element, const N: usize, B: Backend>(
    p: *const T,
) -> (Vector<T, N, B>, Vector<T, N, B>) {
    let p = p.cast::<u8>();
    debug_assert_aligned::<B>(p);
    let (mut a, mut b) = (Vector::zero(), Vector::zero());
    for i in 0..Vector::<T, N, B>::VEC_LENGTH {
        let (ra, rb) = B::load_packed2::<T>(p.add(2 * i * B::WIDTH_BYTES));
        a.set_reg(i, ra);
        b.set_reg(i, rb);
    }
    (a, b)
}

/// Stores `a`, `b` and `c` interleaved.
///
/// # Panics
///
/// Panics if `dst` holds fewer than `3 * N` elements.
#[inline(always)]
pub fn store_packed3<T: Element, const N: usize, B: Backend>(
    dst: &mut AlignedMut<'_, T, B>,
    a: Vector<T, N, B>,
    b: Vector<T, N, B>,
    c: Vector<T, N, B>,
) {
    check_len(3, N, dst.len());
    // SAFETY: aligned by construction of the view, length checked above
    unsafe { store_packed3_ptr(dst.as_mut_ptr(), a, b, c) }
}

/// Stores `a`, `b` and `c` interleaved at `p`.
///
/// # Safety
///
/// `p` must be aligned to `B::WIDTH_BYTES` and valid for `3 * N` writes.
#[inline(always)]
pub unsafe fn store_packed3_ptr<T: Element, const N: usize, B: Backend>(
    p: *mut T,
    a: Vector<T, N, B>,
    b: Vector<T, N, B>,
    c: Vector<T, N, B>,
) {
    let p = p.cast::<u8>();
    debug_assert_aligned::<B>(p);
    for i in 0..Vector::<T, N, B>::VEC_LENGTH {
        B::store_packed3::<T>(p.add(3 * i * B::WIDTH_BYTES), a.reg(i), b.reg(i), c.reg(i));
    }
}

/// Loads three vectors from `3 * N` interleaved elements.
///
/// # Panics
///
/// Panics if `src` holds fewer than `3 * N` elements.
#[inline(always)]
pub fn load_packed3<T: Element, const N: usize, B: Backend>(
    src: Aligned<'_, T, B>,
) -> (Vector<T, N, B>, Vector<T, N, B>, Vector<T, N, B>) {
    check_len(3, N, src.len());
    // SAFETY: aligned by construction of the view, length checked above
    unsafe { load_packed3_ptr(src.as_ptr()) }
}

/// Loads three vectors from `3 * N` interleaved elements at `p`.
///
/// # Safety
///
/// `p` must be aligned to `B::WIDTH_BYTES` and valid for `3 * N` reads.
#[inline(always)]
pub unsafe fn load_packed3_ptr<T: Element, const N: usize, B: Backend>(
    p: *const T,
) -> (Vector<T, N, B>, Vector<T, N, B>, Vector<T, N, B>) {
    let p = p.cast::<u8>();
    debug_assert_aligned::<B>(p);
    let (mut a, mut b, mut c) = (Vector::zero(), Vector::zero(), Vector::zero());
    for i in 0..Vector::<T, N, B>::VEC_LENGTH {
        let (ra, rb, rc) = B::load_packed3::<T>(p.add(3 * i * B::WIDTH_BYTES));
        a.set_reg(i, ra);
        b.set_reg(i, rb);
        c.set_reg(i, rc);
    }
    (a, b, c)
}

/// Stores `a`, `b`, `c` and `d` interleaved.
///
/// # Panics
///
/// Panics if `dst` holds fewer than `4 * N` elements.
#[inline(always)]
pub fn store_packed4<T: Element, const N: usize, B: Backend>(
    dst: &mut AlignedMut<'_, T, B>,
    a: Vector<T, N, B>,
    b: Vector<T, N, B>,
    c: Vector<T, N, B>,
    d: Vector<T, N, B>,
) {
    check_len(4, N, dst.len());
    // SAFETY: aligned by construction of the view, length checked above
    unsafe { store_packed4_ptr(dst.as_mut_ptr(), a, b, c, d) }
}

/// Stores `a`, `b`, `c` and `d` interleaved at `p`.
///
/// # Safety
///
/// `p` must be aligned to `B::WIDTH_BYTES` and valid for `4 * N` writes.
#[inline(always)]
pub unsafe fn store_packed4_ptr<T: Element, const N: usize, B: Backend>(
    p: *mut T,
    a: Vector<T, N, B>,
    b: Vector<T, N, B>,
    c: Vector<T, N, B>,
    d: Vector<T, N, B>,
) {
    let p = p.cast::<u8>();
    debug_assert_aligned::<B>(p);
    for i in 0..Vector::<T, N, B>::VEC_LENGTH {
        B::store_packed4::<T>(
            p.add(4 * i * B::WIDTH_BYTES),
            a.reg(i),
            b.reg(i),
            c.reg(i),
            d.reg(i),
        );
    }
}

/// Loads four vectors from `4 * N` interleaved elements.
///
/// # Panics
///
/// Panics if `src` holds fewer than `4 * N` elements.
#[inline(always)]
pub fn load_packed4<T: Element, const N: usize, B: Backend>(
    src: Aligned<'_, T, B>,
) -> (Vector<T, N, B>, Vector<T, N, B>, Vector<T, N, B>, Vector<T, N, B>) {
    check_len(4, N, src.len());
    // SAFETY: aligned by construction of the view, length checked above
    unsafe { load_packed4_ptr(src.as_ptr()) }
}

/// Loads four vectors from `4 * N` interleaved elements at `p`.
///
/// # Safety
///
/// `p` must be aligned to `B::WIDTH_BYTES` and valid for `4 * N` reads.
#[inline(always)]
pub unsafe fn load_packed4_ptr<T: Element, const N: usize, B: Backend>(
    p: *const T,
) -> (Vector<T, N, B>, Vector<T, N, B>, Vector<T, N, B>, Vector<T, N, B>) {
    let p = p.cast::<u8>();
    debug_assert_aligned::<B>(p);
    let mut out = (Vector::zero(), Vector::zero(), Vector::zero(), Vector::zero());
    for i in 0..Vector::<T, N, B>::VEC_LENGTH {
        let (ra, rb, rc, rd) = B::load_packed4::<T>(p.add(4 * i * B::WIDTH_BYTES));
        out.0.set_reg(i, ra);
        out.1.set_reg(i, rb);
        out.2.set_reg(i, rc);
        out.3.set_reg(i, rd);
    }
    out
}
