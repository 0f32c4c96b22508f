//! Lane shifts and permutations with compile-time selectors
//!
//! All three operations act independently on each 128-bit group of lanes.
//! For 128-bit vectors the group is the whole vector; wider vectors behave
//! as several 128-bit vectors side by side.

use std::mem::size_of;

use crate::backend::Backend;
use crate::element::Element;
use crate::vector::Vector;

impl<T: Element, const N: usize, B: Backend> Vector<T, N, B> {
    /// Moves every lane `S` positions towards the high end of its 128-bit
    /// group. The low `S` lanes of each group become zero and the top `S`
    /// lanes fall off. `S` may be at most the lane count of a group.
    ///
    /// ```
    /// use simdweave::{backend::null::Null, Vector};
    ///
    /// let v = Vector::<u32, 4, Null>::from_array([1, 2, 3, 4]);
    /// assert_eq!(v.move_r::<1>().to_array(), [0, 1, 2, 3]);
    /// ```
    #[inline(always)]
    pub fn move_r<const S: usize>(self) -> Self {
        const {
            assert!(
                S * size_of::<T>() <= 16,
                "move_r shift exceeds the lanes of a 128-bit group"
            )
        }
        match S {
            0 => self,
            _ if S * T::SIZE == 16 => Self::zero(),
            _ => self.map(|a| B::move_r_bytes(a, S * T::SIZE)),
        }
    }

    /// Within each group of two lanes, output lane `i` takes input lane
    /// `S_i`. Lanes must be 16, 32 or 64 bits wide.
    #[inline(always)]
    pub fn permute2<const S0: usize, const S1: usize>(self) -> Self {
        const {
            assert!(size_of::<T>() >= 2, "permute2 needs lanes of at least 16 bits");
            assert!(S0 < 2 && S1 < 2, "permute2 selectors must be 0 or 1");
        }
        if T::SIZE == 8 {
            self.map(|a| B::permute2::<T>(a, [S0, S1]))
        } else {
            // pairs inside a four-lane group are two independent pairs
            self.map(|a| B::permute4::<T>(a, [S0, S1, S0 + 2, S1 + 2]))
        }
    }

    /// Within each group of four lanes, output lane `i` takes input lane
    /// `S_i`. Lanes must be 16 or 32 bits wide.
    ///
    /// ```
    /// use simdweave::{backend::null::Null, Vector};
    ///
    /// let v = Vector::<u32, 4, Null>::from_array([10, 11, 12, 13]);
    /// assert_eq!(v.permute4::<3, 2, 1, 0>().to_array(), [13, 12, 11, 10]);
    /// ```
    #[inline(always)]
    pub fn permute4<const S0: usize, const S1: usize, const S2: usize, const S3: usize>(
        self,
    ) -> Self {
        const {
            assert!(
                size_of::<T>() == 2 || size_of::<T>() == 4,
                "permute4 needs 16- or 32-bit lanes"
            );
            assert!(
                S0 < 4 && S1 < 4 && S2 < 4 && S3 < 4,
                "permute4 selectors must be below 4"
            );
        }
        self.map(|a| B::permute4::<T>(a, [S0, S1, S2, S3]))
    }
}
