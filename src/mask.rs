//! Lane masks
//!
//! A mask has the same shape as the vector it was produced from. Every lane
//! is either all-ones (set) or all-zeros (clear); values built inside the
//! crate keep that invariant and foreign bit patterns are validated on the
//! way in.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::backend::{Active, Backend};
use crate::element::Element;
use crate::error::Error;
use crate::vector::Vector;

/// Per-lane boolean result of a comparison
pub struct Mask<T: Element, const N: usize, B: Backend = Active> {
    bits: Vector<T, N, B>,
}

/// Mask over signed 8-bit lanes
pub type MaskInt8<const N: usize, B = Active> = Mask<i8, N, B>;
/// Mask over unsigned 8-bit lanes
pub type MaskUint8<const N: usize, B = Active> = Mask<u8, N, B>;
/// Mask over signed 16-bit lanes
pub type MaskInt16<const N: usize, B = Active> = Mask<i16, N, B>;
/// Mask over unsigned 16-bit lanes
pub type MaskUint16<const N: usize, B = Active> = Mask<u16, N, B>;
/// Mask over signed 32-bit lanes
pub type MaskInt32<const N: usize, B = Active> = Mask<i32, N, B>;
/// Mask over unsigned 32-bit lanes
pub type MaskUint32<const N: usize, B = Active> = Mask<u32, N, B>;
/// Mask over signed 64-bit lanes
pub type MaskInt64<const N: usize, B = Active> = Mask<i64, N, B>;
/// Mask over unsigned 64-bit lanes
pub type MaskUint64<const N: usize, B = Active> = Mask<u64, N, B>;
/// Mask over single-precision lanes
pub type MaskFloat32<const N: usize, B = Active> = Mask<f32, N, B>;
/// Mask over double-precision lanes
pub type MaskFloat64<const N: usize, B = Active> = Mask<f64, N, B>;

impl<T: Element, const N: usize, B: Backend> Mask<T, N, B> {
    /// Wraps lanes that are already all-ones or all-zeros
    #[inline(always)]
    pub(crate) fn from_bits_unchecked(bits: Vector<T, N, B>) -> Self {
        debug_assert!(bits.as_slice().iter().all(|lane| lane.is_mask_lane()));
        Self { bits }
    }

    /// Every lane set, or every lane clear
    pub fn splat(set: bool) -> Self {
        Self::from_bits_unchecked(Vector::splat(T::mask_lane(set)))
    }

    /// Mask from per-lane flags
    pub fn from_bools(flags: [bool; N]) -> Self {
        Self::from_bits_unchecked(Vector::from_array(flags.map(T::mask_lane)))
    }

    /// Per-lane flags
    pub fn to_bools(&self) -> [bool; N] {
        let lanes = self.bits.as_slice();
        std::array::from_fn(|i| lanes[i].to_lane_bits() != 0)
    }

    /// Whether lane `i` is set.
    ///
    /// # Panics
    ///
    /// Panics if `i >= N`.
    pub fn test(&self, i: usize) -> bool {
        self.bits[i].to_lane_bits() != 0
    }

    /// Whether any lane is set
    pub fn any(&self) -> bool {
        self.bits.as_slice().iter().any(|lane| lane.to_lane_bits() != 0)
    }

    /// Whether every lane is set
    pub fn all(&self) -> bool {
        self.bits.as_slice().iter().all(|lane| lane.to_lane_bits() != 0)
    }

    /// Number of set lanes
    pub fn count(&self) -> usize {
        self.bits
            .as_slice()
            .iter()
            .filter(|lane| lane.to_lane_bits() != 0)
            .count()
    }

    /// The underlying all-ones / all-zeros lanes
    pub fn to_vector(self) -> Vector<T, N, B> {
        self.bits
    }

    /// Takes lanes of `a` where set and lanes of `b` where clear
    #[inline(always)]
    pub fn select(self, a: Vector<T, N, B>, b: Vector<T, N, B>) -> Vector<T, N, B> {
        self.bits.map3(a, b, B::blend)
    }
}

impl<T: Element, const N: usize, B: Backend> TryFrom<Vector<T, N, B>> for Mask<T, N, B> {
    type Error = Error;

    fn try_from(bits: Vector<T, N, B>) -> Result<Self, Error> {
        match bits.as_slice().iter().position(|lane| !lane.is_mask_lane()) {
            Some(lane) => Err(Error::InvalidMask { lane }),
            None => Ok(Self { bits }),
        }
    }
}

impl<T: Element, const N: usize, B: Backend> From<Mask<T, N, B>> for Vector<T, N, B> {
    fn from(mask: Mask<T, N, B>) -> Self {
        mask.bits
    }
}

impl<T: Element, const N: usize, B: Backend> Clone for Mask<T, N, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Element, const N: usize, B: Backend> Copy for Mask<T, N, B> {}

impl<T: Element, const N: usize, B: Backend> PartialEq for Mask<T, N, B> {
    fn eq(&self, other: &Self) -> bool {
        self.to_bools() == other.to_bools()
    }
}

impl<T: Element, const N: usize, B: Backend> Eq for Mask<T, N, B> {}

impl<T: Element, const N: usize, B: Backend> fmt::Debug for Mask<T, N, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mask")?;
        f.debug_list().entries(self.to_bools().iter()).finish()
    }
}

impl<T: Element, const N: usize, B: Backend> BitAnd for Mask<T, N, B> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self::from_bits_unchecked(self.bits & rhs.bits)
    }
}

impl<T: Element, const N: usize, B: Backend> BitOr for Mask<T, N, B> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self::from_bits_unchecked(self.bits | rhs.bits)
    }
}

impl<T: Element, const N: usize, B: Backend> BitXor for Mask<T, N, B> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self::from_bits_unchecked(self.bits ^ rhs.bits)
    }
}

impl<T: Element, const N: usize, B: Backend> Not for Mask<T, N, B> {
    type Output = Self;

    fn not(self) -> Self {
        Self::from_bits_unchecked(!self.bits)
    }
}
