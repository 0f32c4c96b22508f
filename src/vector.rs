//! Logical vectors and their native-width base vectors
//!
//! A `Vector<T, N, B>` holds `N` lanes of `T`. Storage is a plain lane
//! array aligned for every backend; operations decompose it into
//! `N / B::lanes()` native registers, apply the backend to each register
//! and write the results back. Register `i` covers lanes
//! `[i * base_lanes, (i + 1) * base_lanes)`.

use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;
use std::ops::Index;

use bytemuck::Zeroable;

use crate::backend::emulate::Staging;
use crate::backend::{Active, Backend};
use crate::capability::Capability;
use crate::element::Element;

/// Fixed-length vector of `N` lanes of `T` on backend `B`.
///
/// `N` must be a positive multiple of the lanes one native register of `B`
/// holds; other shapes are rejected when the vector is first constructed.
#[repr(C, align(32))]
pub struct Vector<T: Element, const N: usize, B: Backend = Active> {
    lanes: [T; N],
    backend: PhantomData<B>,
}

/// One native register's worth of lanes
pub struct Base<T: Element, B: Backend = Active> {
    reg: B::Reg,
    element: PhantomData<T>,
}

/// Signed 8-bit vector
pub type Int8<const N: usize, B = Active> = Vector<i8, N, B>;
/// Unsigned 8-bit vector
pub type Uint8<const N: usize, B = Active> = Vector<u8, N, B>;
/// Signed 16-bit vector
pub type Int16<const N: usize, B = Active> = Vector<i16, N, B>;
/// Unsigned 16-bit vector
pub type Uint16<const N: usize, B = Active> = Vector<u16, N, B>;
/// Signed 32-bit vector
pub type Int32<const N: usize, B = Active> = Vector<i32, N, B>;
/// Unsigned 32-bit vector
pub type Uint32<const N: usize, B = Active> = Vector<u32, N, B>;
/// Signed 64-bit vector
pub type Int64<const N: usize, B = Active> = Vector<i64, N, B>;
/// Unsigned 64-bit vector
pub type Uint64<const N: usize, B = Active> = Vector<u64, N, B>;
/// Single-precision vector
pub type Float32<const N: usize, B = Active> = Vector<f32, N, B>;
/// Double-precision vector
pub type Float64<const N: usize, B = Active> = Vector<f64, N, B>;

impl<T: Element, const N: usize, B: Backend> Vector<T, N, B> {
    /// Number of lanes
    pub const LANES: usize = N;

    /// Lanes per native register
    pub const BASE_LANES: usize = B::WIDTH_BYTES / size_of::<T>();

    /// Number of native registers the vector decomposes into
    pub const VEC_LENGTH: usize = N / Self::BASE_LANES;

    #[inline(always)]
    fn check_shape() {
        const {
            assert!(
                N > 0 && N % (B::WIDTH_BYTES / size_of::<T>()) == 0,
                "vector length must be a positive multiple of the native lane count"
            )
        }
    }

    /// Builds a vector from its lanes
    #[inline(always)]
    pub fn from_array(lanes: [T; N]) -> Self {
        Self::check_shape();
        Self {
            lanes,
            backend: PhantomData,
        }
    }

    /// Copies the first `N` lanes of `src`, which needs no particular alignment.
    ///
    /// # Panics
    ///
    /// Panics if `src` holds fewer than `N` lanes.
    pub fn from_slice(src: &[T]) -> Self {
        let mut v = Self::zero();
        v.lanes.copy_from_slice(&src[..N]);
        v
    }

    /// Every lane set to `value`
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        let reg = B::splat(value);
        Self::from_regs(|_| reg)
    }

    /// All lanes zero (all bits clear)
    #[inline(always)]
    pub fn zero() -> Self {
        Self::from_array([T::zeroed(); N])
    }

    /// Lane `i`, or `None` past the end
    #[inline]
    pub fn get(&self, i: usize) -> Option<T> {
        self.lanes.get(i).copied()
    }

    /// Lane `I`, checked at compile time
    #[inline(always)]
    pub fn extract<const I: usize>(&self) -> T {
        const { assert!(I < N, "lane index out of range") }
        self.lanes[I]
    }

    /// Copy with lane `I` replaced by `value`
    #[inline(always)]
    pub fn insert<const I: usize>(mut self, value: T) -> Self {
        const { assert!(I < N, "lane index out of range") }
        self.lanes[I] = value;
        self
    }

    /// The lanes as an array
    #[inline(always)]
    pub fn to_array(self) -> [T; N] {
        self.lanes
    }

    /// The lanes as a slice
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        &self.lanes
    }

    /// Copies the lanes into the first `N` slots of `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` holds fewer than `N` lanes.
    pub fn write_to_slice(self, dst: &mut [T]) {
        dst[..N].copy_from_slice(&self.lanes);
    }

    /// Capability of the backend this vector runs on
    pub const fn capability() -> Capability {
        B::CAPABILITY
    }

    /// Same lanes on another backend
    #[inline(always)]
    pub fn to_backend<C: Backend>(self) -> Vector<T, N, C> {
        Vector::from_array(self.lanes)
    }

    /// Lane equality where any two NaNs count as equal
    pub fn same_lanes(&self, other: &Self) -> bool {
        self.lanes
            .iter()
            .zip(other.lanes.iter())
            .all(|(a, b)| a.same_value(*b))
    }

    /// Base vector `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= VEC_LENGTH`.
    pub fn base(&self, i: usize) -> Base<T, B> {
        assert!(i < Self::VEC_LENGTH, "base index {i} out of range");
        Base::from_reg(self.reg(i))
    }

    /// The base vectors in lane order
    pub fn bases(&self) -> impl Iterator<Item = Base<T, B>> + '_ {
        (0..Self::VEC_LENGTH).map(move |i| Base::from_reg(self.reg(i)))
    }

    /// Reassembles a vector from exactly `VEC_LENGTH` base vectors.
    ///
    /// # Panics
    ///
    /// Panics if the iterator yields a different number of bases.
    pub fn from_bases<I: IntoIterator<Item = Base<T, B>>>(bases: I) -> Self {
        let mut v = Self::zero();
        let mut count = 0;
        for base in bases {
            assert!(count < Self::VEC_LENGTH, "too many base vectors");
            v.set_reg(count, base.into_reg());
            count += 1;
        }
        assert_eq!(count, Self::VEC_LENGTH, "too few base vectors");
        v
    }

    #[inline(always)]
    fn base_ptr(&self, i: usize) -> *const u8 {
        debug_assert!(i < Self::VEC_LENGTH);
        // SAFETY: in bounds for i < VEC_LENGTH
        unsafe { self.lanes.as_ptr().cast::<u8>().add(i * B::WIDTH_BYTES) }
    }

    #[inline(always)]
    fn base_ptr_mut(&mut self, i: usize) -> *mut u8 {
        debug_assert!(i < Self::VEC_LENGTH);
        // SAFETY: in bounds for i < VEC_LENGTH
        unsafe { self.lanes.as_mut_ptr().cast::<u8>().add(i * B::WIDTH_BYTES) }
    }

    /// Native register `i`
    #[inline(always)]
    pub(crate) fn reg(&self, i: usize) -> B::Reg {
        // SAFETY: the struct is 32-byte aligned and N is a multiple of the
        // register lane count, so register i is whole and aligned
        unsafe { B::load(self.base_ptr(i)) }
    }

    #[inline(always)]
    pub(crate) fn set_reg(&mut self, i: usize, reg: B::Reg) {
        // SAFETY: same layout argument as `reg`; the pointer comes from a
        // unique borrow of the lanes
        unsafe { B::store(self.base_ptr_mut(i), reg) }
    }

    /// Builds a vector register by register
    #[inline(always)]
    pub(crate) fn from_regs(mut f: impl FnMut(usize) -> B::Reg) -> Self {
        let mut v = Self::zero();
        for i in 0..Self::VEC_LENGTH {
            v.set_reg(i, f(i));
        }
        v
    }

    /// Applies `f` to every register
    #[inline(always)]
    pub(crate) fn map(self, f: impl Fn(B::Reg) -> B::Reg) -> Self {
        Self::from_regs(|i| f(self.reg(i)))
    }

    /// Applies `f` to corresponding registers of two vectors
    #[inline(always)]
    pub(crate) fn map2(self, rhs: Self, f: impl Fn(B::Reg, B::Reg) -> B::Reg) -> Self {
        Self::from_regs(|i| f(self.reg(i), rhs.reg(i)))
    }

    /// Applies `f` to corresponding registers of three vectors
    #[inline(always)]
    pub(crate) fn map3(
        self,
        b: Self,
        c: Self,
        f: impl Fn(B::Reg, B::Reg, B::Reg) -> B::Reg,
    ) -> Self {
        Self::from_regs(|i| f(self.reg(i), b.reg(i), c.reg(i)))
    }
}

impl<T: Element, const N: usize, B: Backend> Clone for Vector<T, N, B> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Element, const N: usize, B: Backend> Copy for Vector<T, N, B> {}

impl<T: Element, const N: usize, B: Backend> Default for Vector<T, N, B> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Element, const N: usize, B: Backend> PartialEq for Vector<T, N, B> {
    fn eq(&self, other: &Self) -> bool {
        self.lanes == other.lanes
    }
}

impl<T: Element, const N: usize, B: Backend> fmt::Debug for Vector<T, N, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", T::KIND, N)?;
        f.debug_list().entries(self.lanes.iter()).finish()
    }
}

impl<T: Element, const N: usize, B: Backend> From<[T; N]> for Vector<T, N, B> {
    fn from(lanes: [T; N]) -> Self {
        Self::from_array(lanes)
    }
}

impl<T: Element, const N: usize, B: Backend> From<Vector<T, N, B>> for [T; N] {
    fn from(v: Vector<T, N, B>) -> Self {
        v.lanes
    }
}

impl<T: Element, const N: usize, B: Backend> Index<usize> for Vector<T, N, B> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.lanes[i]
    }
}

impl<T: Element, B: Backend> Base<T, B> {
    /// Lanes in one native register
    pub const LANES: usize = B::WIDTH_BYTES / size_of::<T>();

    /// Wraps a native register
    #[inline(always)]
    pub fn from_reg(reg: B::Reg) -> Self {
        Self {
            reg,
            element: PhantomData,
        }
    }

    /// The native register
    #[inline(always)]
    pub fn into_reg(self) -> B::Reg {
        self.reg
    }

    /// Every lane set to `value`
    pub fn splat(value: T) -> Self {
        Self::from_reg(B::splat(value))
    }

    /// All lanes zero
    pub fn zero() -> Self {
        Self::from_reg(B::zero())
    }

    /// Builds a base vector from exactly `LANES` lanes.
    ///
    /// # Panics
    ///
    /// Panics if `lanes.len() != LANES`.
    pub fn from_slice(lanes: &[T]) -> Self {
        let mut staging = Staging::zeroed();
        staging.lanes_mut::<B, T>().copy_from_slice(lanes);
        Self::from_reg(staging.to_reg::<B>())
    }

    /// The lanes, lowest first
    pub fn to_vec(self) -> Vec<T> {
        Staging::from_reg::<B>(self.reg).lanes::<B, T>().to_vec()
    }
}

impl<T: Element, B: Backend> Clone for Base<T, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Element, B: Backend> Copy for Base<T, B> {}

impl<T: Element, B: Backend> fmt::Debug for Base<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Base").field(&self.to_vec()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::null::Null;

    #[test]
    fn test_shape_constants() {
        assert_eq!(Vector::<u8, 32, Null>::VEC_LENGTH, 2);
        assert_eq!(Vector::<f64, 4, Null>::BASE_LANES, 2);
        assert_eq!(Vector::<u32, 8>::LANES, 8);
        assert_eq!(Vector::<u32, 8, Null>::capability(), Capability::Null);
    }

    #[test]
    fn test_bases_follow_lane_order() {
        let v = Vector::<u32, 8, Null>::from_array([0, 1, 2, 3, 4, 5, 6, 7]);
        let bases: Vec<_> = v.bases().map(|b| b.to_vec()).collect();
        assert_eq!(bases, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]]);
        assert_eq!(Vector::<u32, 8, Null>::from_bases(v.bases()), v);
        assert_eq!(v.base(1).to_vec(), vec![4, 5, 6, 7]);
    }

    #[test]
    #[should_panic(expected = "too few base vectors")]
    fn test_from_bases_rejects_short_input() {
        let _ = Vector::<u32, 8, Null>::from_bases([Base::splat(1)]);
    }

    #[test]
    fn test_lane_access() {
        let v = Float32::<8>::splat(1.5).insert::<3>(-2.0);
        assert_eq!(v.extract::<3>(), -2.0);
        assert_eq!(v[0], 1.5);
        assert_eq!(v.get(8), None);
        assert_eq!(format!("{:?}", Vector::<u8, 16, Null>::zero()).get(..5), Some("u8x16"));
    }

    #[test]
    fn test_same_lanes_equates_nans() {
        let a = Float64::<4>::splat(f64::NAN);
        let b = Float64::<4>::splat(-f64::NAN);
        assert!(a.same_lanes(&b));
        assert_ne!(a, b);
    }
}
