//! Portable fallback backend
//!
//! Every operation is an explicit loop over lanes using the lane semantics
//! defined on [`Element`]. It is always compiled, whatever the target, and
//! serves as the reference the accelerated backends are tested against.

use bytemuck::{Pod, Zeroable};

use super::Backend;
use crate::capability::Capability;
use crate::element::{Element, Float};

/// Lane-by-lane backend over 16-byte blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

/// Register of the fallback backend
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Block(pub [u8; 16]);

impl Block {
    /// Builds a block from exactly `16 / size_of::<T>()` lanes
    pub fn from_lanes<T: Element>(lanes: &[T]) -> Self {
        let mut block = Self::zeroed();
        block.lanes_mut::<T>().copy_from_slice(lanes);
        block
    }

    /// Lanes of the block viewed as `T`
    #[inline(always)]
    pub fn lanes<T: Element>(&self) -> &[T] {
        bytemuck::cast_slice(&self.0)
    }

    /// Mutable lanes of the block viewed as `T`
    #[inline(always)]
    pub fn lanes_mut<T: Element>(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(&mut self.0)
    }
}

#[inline(always)]
fn map_bytes(a: Block, b: Block, f: impl Fn(u8, u8) -> u8) -> Block {
    Block(std::array::from_fn(|i| f(a.0[i], b.0[i])))
}

#[inline(always)]
fn map_lanes<T: Element>(a: Block, b: Block, f: impl Fn(T, T) -> T) -> Block {
    let mut out = Block::zeroed();
    for ((o, &x), &y) in out.lanes_mut::<T>().iter_mut().zip(a.lanes::<T>()).zip(b.lanes::<T>()) {
        *o = f(x, y);
    }
    out
}

#[inline(always)]
fn test_lanes<T: Element>(a: Block, b: Block, f: impl Fn(T, T) -> bool) -> Block {
    map_lanes::<T>(a, b, |x, y| T::mask_lane(f(x, y)))
}

/// Within each group of `G` lanes, lane `i` takes lane `sel[i]`
fn permute_groups<T: Element, const G: usize>(a: Block, sel: [usize; G]) -> Block {
    let src = a.lanes::<T>();
    let mut out = Block::zeroed();
    for (i, o) in out.lanes_mut::<T>().iter_mut().enumerate() {
        let group = i / G * G;
        *o = src[group + sel[i % G]];
    }
    out
}

/// Writes `planes[j][i]` to `out[i * K + j]`, where `K = planes.len()`.
///
/// Every plane must hold `out.len() / K` lanes.
pub fn interleave_lanes<T: Copy>(planes: &[&[T]], out: &mut [T]) {
    let ways = planes.len();
    for (j, plane) in planes.iter().enumerate() {
        for (i, &value) in plane.iter().enumerate() {
            out[i * ways + j] = value;
        }
    }
}

/// Writes `src[i * K + j]` to `planes[j][i]`, where `K = planes.len()`.
///
/// Every plane must hold `src.len() / K` lanes.
pub fn deinterleave_lanes<T: Copy>(src: &[T], planes: &mut [&mut [T]]) {
    let ways = planes.len();
    for (j, plane) in planes.iter_mut().enumerate() {
        for (i, value) in plane.iter_mut().enumerate() {
            *value = src[i * ways + j];
        }
    }
}

/// Interleaves `K` blocks straight to memory
///
/// # Safety
///
/// `p` must be valid for `K * 16` bytes of writes and aligned for `T`.
#[inline(always)]
unsafe fn store_interleaved<T: Element, const K: usize>(p: *mut u8, planes: [Block; K]) {
    let lanes = 16 / T::SIZE;
    let out = std::slice::from_raw_parts_mut(p.cast::<T>(), K * lanes);
    let sources: [&[T]; K] = std::array::from_fn(|j| planes[j].lanes::<T>());
    interleave_lanes(&sources, out);
}

/// Splits `K` interleaved blocks from memory
///
/// # Safety
///
/// `p` must be valid for `K * 16` bytes of reads and aligned for `T`.
#[inline(always)]
unsafe fn load_interleaved<T: Element, const K: usize>(p: *const u8) -> [Block; K] {
    let lanes = 16 / T::SIZE;
    let src = std::slice::from_raw_parts(p.cast::<T>(), K * lanes);
    let mut planes = [Block::zeroed(); K];
    deinterleave_lanes(src, &mut planes.each_mut().map(|b| b.lanes_mut::<T>()));
    planes
}

impl Backend for Null {
    const CAPABILITY: Capability = Capability::Null;
    const WIDTH_BYTES: usize = 16;
    type Reg = Block;

    #[inline(always)]
    unsafe fn load(p: *const u8) -> Block {
        let mut block = Block::zeroed();
        std::ptr::copy_nonoverlapping(p, block.0.as_mut_ptr(), 16);
        block
    }

    #[inline(always)]
    unsafe fn store(p: *mut u8, v: Block) {
        std::ptr::copy_nonoverlapping(v.0.as_ptr(), p, 16);
    }

    #[inline(always)]
    fn zero() -> Block {
        Block::zeroed()
    }

    #[inline(always)]
    fn splat<T: Element>(v: T) -> Block {
        let mut block = Block::zeroed();
        block.lanes_mut::<T>().fill(v);
        block
    }

    #[inline(always)]
    fn add<T: Element>(a: Block, b: Block) -> Block {
        map_lanes::<T>(a, b, T::lane_add)
    }

    #[inline(always)]
    fn sub<T: Element>(a: Block, b: Block) -> Block {
        map_lanes::<T>(a, b, T::lane_sub)
    }

    #[inline(always)]
    fn bit_and(a: Block, b: Block) -> Block {
        map_bytes(a, b, |x, y| x & y)
    }

    #[inline(always)]
    fn bit_or(a: Block, b: Block) -> Block {
        map_bytes(a, b, |x, y| x | y)
    }

    #[inline(always)]
    fn bit_xor(a: Block, b: Block) -> Block {
        map_bytes(a, b, |x, y| x ^ y)
    }

    #[inline(always)]
    fn bit_andnot(a: Block, b: Block) -> Block {
        map_bytes(a, b, |x, y| x & !y)
    }

    #[inline(always)]
    fn bit_not(a: Block) -> Block {
        Block(a.0.map(|x| !x))
    }

    #[inline(always)]
    fn cmp_eq<T: Element>(a: Block, b: Block) -> Block {
        test_lanes::<T>(a, b, |x, y| x == y)
    }

    #[inline(always)]
    fn cmp_lt<T: Element>(a: Block, b: Block) -> Block {
        test_lanes::<T>(a, b, |x, y| x < y)
    }

    #[inline(always)]
    fn isnan<T: Float>(a: Block) -> Block {
        test_lanes::<T>(a, a, |x, _| x.lane_is_nan())
    }

    #[inline(always)]
    fn isnan2<T: Float>(a: Block, b: Block) -> Block {
        test_lanes::<T>(a, b, |x, y| x.lane_is_nan() || y.lane_is_nan())
    }

    #[inline(always)]
    fn blend(mask: Block, a: Block, b: Block) -> Block {
        Block(std::array::from_fn(|i| (a.0[i] & mask.0[i]) | (b.0[i] & !mask.0[i])))
    }

    #[inline(always)]
    fn move_r_bytes(a: Block, bytes: usize) -> Block {
        let mut out = Block::zeroed();
        if bytes < 16 {
            out.0[bytes..].copy_from_slice(&a.0[..16 - bytes]);
        }
        out
    }

    #[inline(always)]
    fn permute4<T: Element>(a: Block, sel: [usize; 4]) -> Block {
        permute_groups::<T, 4>(a, sel)
    }

    #[inline(always)]
    fn permute2<T: Element>(a: Block, sel: [usize; 2]) -> Block {
        permute_groups::<T, 2>(a, sel)
    }

    #[inline(always)]
    fn interleave2<T: Element>(a: Block, b: Block) -> (Block, Block) {
        let mut out = [Block::zeroed(); 2];
        let flat: &mut [T] = bytemuck::cast_slice_mut(&mut out[..]);
        interleave_lanes(&[a.lanes::<T>(), b.lanes::<T>()], flat);
        (out[0], out[1])
    }

    #[inline(always)]
    fn deinterleave2<T: Element>(r0: Block, r1: Block) -> (Block, Block) {
        let regs = [r0, r1];
        let src: &[T] = bytemuck::cast_slice(&regs[..]);
        let (mut a, mut b) = (Block::zeroed(), Block::zeroed());
        deinterleave_lanes(src, &mut [a.lanes_mut::<T>(), b.lanes_mut::<T>()]);
        (a, b)
    }

    #[inline(always)]
    unsafe fn store_packed2<T: Element>(p: *mut u8, a: Block, b: Block) {
        store_interleaved::<T, 2>(p, [a, b]);
    }

    #[inline(always)]
    unsafe fn load_packed2<T: Element>(p: *const u8) -> (Block, Block) {
        let [a, b] = load_interleaved::<T, 2>(p);
        (a, b)
    }

    #[inline(always)]
    unsafe fn store_packed3<T: Element>(p: *mut u8, a: Block, b: Block, c: Block) {
        store_interleaved::<T, 3>(p, [a, b, c]);
    }

    #[inline(always)]
    unsafe fn load_packed3<T: Element>(p: *const u8) -> (Block, Block, Block) {
        let [a, b, c] = load_interleaved::<T, 3>(p);
        (a, b, c)
    }

    #[inline(always)]
    unsafe fn store_packed4<T: Element>(p: *mut u8, a: Block, b: Block, c: Block, d: Block) {
        store_interleaved::<T, 4>(p, [a, b, c, d]);
    }

    #[inline(always)]
    unsafe fn load_packed4<T: Element>(p: *const u8) -> (Block, Block, Block, Block) {
        let [a, b, c, d] = load_interleaved::<T, 4>(p);
        (a, b, c, d)
    }
}
