//! Lane-level emulation for operations a backend has no instruction for
//!
//! Registers are spilled to an aligned staging block, rearranged with the
//! fallback kernels and reloaded.

use bytemuck::{Pod, Zeroable};

use super::null::{deinterleave_lanes, interleave_lanes};
use super::Backend;
use crate::element::Element;

/// Scratch space for one register of any backend
#[repr(C, align(32))]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct Staging([u8; 32]);

impl Staging {
    #[inline(always)]
    pub(crate) fn from_reg<B: Backend>(reg: B::Reg) -> Self {
        let mut staging = Self::zeroed();
        // SAFETY: 32 bytes, 32-byte aligned, covers every backend width
        unsafe { B::store(staging.0.as_mut_ptr(), reg) };
        staging
    }

    #[inline(always)]
    pub(crate) fn to_reg<B: Backend>(&self) -> B::Reg {
        // SAFETY: as in `from_reg`
        unsafe { B::load(self.0.as_ptr()) }
    }

    #[inline(always)]
    pub(crate) fn lanes<B: Backend, T: Element>(&self) -> &[T] {
        bytemuck::cast_slice(&self.0[..B::WIDTH_BYTES])
    }

    #[inline(always)]
    pub(crate) fn lanes_mut<B: Backend, T: Element>(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(&mut self.0[..B::WIDTH_BYTES])
    }
}

/// `K`-way interleave of `K` registers, lane by lane
pub(crate) fn interleave<B: Backend, T: Element, const K: usize>(
    planes: [B::Reg; K],
) -> [B::Reg; K] {
    let n = B::WIDTH_BYTES / T::SIZE;
    let staged = planes.map(Staging::from_reg::<B>);
    let sources: [&[T]; K] = std::array::from_fn(|j| staged[j].lanes::<B, T>());

    let mut flat = [Staging::zeroed(); K];
    let out: &mut [T] = bytemuck::cast_slice_mut(&mut flat[..]);
    interleave_lanes(&sources, &mut out[..K * n]);

    compact(&flat, n * T::SIZE).map(|s| s.to_reg::<B>())
}

/// Inverse of [`interleave`]
pub(crate) fn deinterleave<B: Backend, T: Element, const K: usize>(
    regs: [B::Reg; K],
) -> [B::Reg; K] {
    let n = B::WIDTH_BYTES / T::SIZE;
    let mut flat = [Staging::zeroed(); K];
    {
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut flat[..]);
        for (i, reg) in regs.iter().enumerate() {
            let staged = Staging::from_reg::<B>(*reg);
            bytes[i * B::WIDTH_BYTES..(i + 1) * B::WIDTH_BYTES]
                .copy_from_slice(&staged.0[..B::WIDTH_BYTES]);
        }
    }

    let mut planes = [Staging::zeroed(); K];
    {
        let src: &[T] = bytemuck::cast_slice(&flat[..]);
        deinterleave_lanes(&src[..K * n], &mut planes.each_mut().map(|p| p.lanes_mut::<B, T>()));
    }
    planes.map(|p| p.to_reg::<B>())
}

/// Splits a densely written run of `K * width` bytes back into one staging
/// block per register
fn compact<const K: usize>(flat: &[Staging; K], width: usize) -> [Staging; K] {
    let bytes: &[u8] = bytemuck::cast_slice(&flat[..]);
    std::array::from_fn(|i| {
        let mut staging = Staging::zeroed();
        staging.0[..width].copy_from_slice(&bytes[i * width..(i + 1) * width]);
        staging
    })
}

#[cfg(test)]
mod tests {
    use super::super::null::{Block, Null};
    use super::*;

    #[test]
    fn test_emulated_three_way_round_trip() {
        let a = Block::from_lanes(&[0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
        let b = Null::splat(100u8);
        let c = Null::splat(200u8);

        let [r0, r1, r2] = interleave::<Null, u8, 3>([a, b, c]);
        assert_eq!(&r0.lanes::<u8>()[..6], &[0, 100, 200, 1, 100, 200]);
        assert_eq!(r2.lanes::<u8>()[15], 200);

        let [da, db, dc] = deinterleave::<Null, u8, 3>([r0, r1, r2]);
        assert_eq!(da, a);
        assert_eq!(db, b);
        assert_eq!(dc, c);
    }
}
