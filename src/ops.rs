//! Arithmetic, bitwise and comparison operations
//!
//! Every operation is available as an operator or method on [`Vector`] and
//! as a free function. The free functions accept either a vector or a bare
//! scalar of the lane type for each operand; a scalar is broadcast to every
//! lane first. Operands must agree on element type, length and backend.

use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Sub,
    SubAssign,
};

use crate::backend::Backend;
use crate::element::{Element, Float};
use crate::mask::Mask;
use crate::vector::Vector;

/// A vector or a scalar that broadcasts to one
pub trait Operand<T: Element, const N: usize, B: Backend> {
    /// The operand as a vector
    fn into_vector(self) -> Vector<T, N, B>;
}

impl<T: Element, const N: usize, B: Backend> Operand<T, N, B> for Vector<T, N, B> {
    #[inline(always)]
    fn into_vector(self) -> Vector<T, N, B> {
        self
    }
}

macro_rules! impl_scalar_operand {
    ($($t:ty),*) => {$(
        impl<const N: usize, B: Backend> Operand<$t, N, B> for $t {
            #[inline(always)]
            fn into_vector(self) -> Vector<$t, N, B> {
                Vector::splat(self)
            }
        }
    )*};
}

impl_scalar_operand!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $assign:ident, $assign_method:ident, $kernel:expr) => {
        impl<T: Element, const N: usize, B: Backend> $trait for Vector<T, N, B> {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                self.map2(rhs, $kernel)
            }
        }

        impl<T: Element, const N: usize, B: Backend> $assign for Vector<T, N, B> {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                *self = $trait::$method(*self, rhs);
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, |a, b| B::add::<T>(a, b));
impl_binary_op!(Sub, sub, SubAssign, sub_assign, |a, b| B::sub::<T>(a, b));
impl_binary_op!(BitAnd, bitand, BitAndAssign, bitand_assign, B::bit_and);
impl_binary_op!(BitOr, bitor, BitOrAssign, bitor_assign, B::bit_or);
impl_binary_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, B::bit_xor);

impl<T: Element, const N: usize, B: Backend> Not for Vector<T, N, B> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        self.map(B::bit_not)
    }
}

macro_rules! impl_scalar_op {
    ($trait:ident, $method:ident; $($t:ty),*) => {$(
        impl<const N: usize, B: Backend> $trait<$t> for Vector<$t, N, B> {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: $t) -> Self {
                $trait::$method(self, Self::splat(rhs))
            }
        }

        impl<const N: usize, B: Backend> $trait<Vector<$t, N, B>> for $t {
            type Output = Vector<$t, N, B>;

            #[inline(always)]
            fn $method(self, rhs: Vector<$t, N, B>) -> Vector<$t, N, B> {
                $trait::$method(Vector::splat(self), rhs)
            }
        }
    )*};
}

impl_scalar_op!(Add, add; i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);
impl_scalar_op!(Sub, sub; i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);
impl_scalar_op!(BitAnd, bitand; i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);
impl_scalar_op!(BitOr, bitor; i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);
impl_scalar_op!(BitXor, bitxor; i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl<T: Element, const N: usize, B: Backend> Vector<T, N, B> {
    /// `self & !rhs`, lane-wise on bits
    #[inline(always)]
    pub fn and_not(self, rhs: Self) -> Self {
        self.map2(rhs, B::bit_andnot)
    }

    /// Lanes where `self == rhs`
    #[inline(always)]
    pub fn cmp_eq(self, rhs: Self) -> Mask<T, N, B> {
        Mask::from_bits_unchecked(self.map2(rhs, |a, b| B::cmp_eq::<T>(a, b)))
    }

    /// Lanes where `self != rhs`
    #[inline(always)]
    pub fn cmp_ne(self, rhs: Self) -> Mask<T, N, B> {
        !self.cmp_eq(rhs)
    }

    /// Lanes where `self < rhs`
    #[inline(always)]
    pub fn cmp_lt(self, rhs: Self) -> Mask<T, N, B> {
        Mask::from_bits_unchecked(self.map2(rhs, |a, b| B::cmp_lt::<T>(a, b)))
    }

    /// Lanes where `self > rhs`
    #[inline(always)]
    pub fn cmp_gt(self, rhs: Self) -> Mask<T, N, B> {
        rhs.cmp_lt(self)
    }
}

impl<T: Float, const N: usize, B: Backend> Vector<T, N, B> {
    /// Lanes holding a NaN
    #[inline(always)]
    pub fn isnan(self) -> Mask<T, N, B> {
        Mask::from_bits_unchecked(self.map(|a| B::isnan::<T>(a)))
    }

    /// Lanes where `self` or `rhs` holds a NaN
    #[inline(always)]
    pub fn isnan2(self, rhs: Self) -> Mask<T, N, B> {
        Mask::from_bits_unchecked(self.map2(rhs, |a, b| B::isnan2::<T>(a, b)))
    }
}

/// Lane-wise `a + b`, wrapping for integers
#[inline(always)]
pub fn add<T, const N: usize, B>(a: impl Operand<T, N, B>, b: impl Operand<T, N, B>) -> Vector<T, N, B>
where
    T: Element,
    B: Backend,
{
    a.into_vector() + b.into_vector()
}

/// Lane-wise `a - b`, wrapping for integers
#[inline(always)]
pub fn sub<T, const N: usize, B>(a: impl Operand<T, N, B>, b: impl Operand<T, N, B>) -> Vector<T, N, B>
where
    T: Element,
    B: Backend,
{
    a.into_vector() - b.into_vector()
}

/// `a & b` on lane bits
#[inline(always)]
pub fn bit_and<T, const N: usize, B>(
    a: impl Operand<T, N, B>,
    b: impl Operand<T, N, B>,
) -> Vector<T, N, B>
where
    T: Element,
    B: Backend,
{
    a.into_vector() & b.into_vector()
}

/// `a | b` on lane bits
#[inline(always)]
pub fn bit_or<T, const N: usize, B>(
    a: impl Operand<T, N, B>,
    b: impl Operand<T, N, B>,
) -> Vector<T, N, B>
where
    T: Element,
    B: Backend,
{
    a.into_vector() | b.into_vector()
}

/// `a ^ b` on lane bits
#[inline(always)]
pub fn bit_xor<T, const N: usize, B>(
    a: impl Operand<T, N, B>,
    b: impl Operand<T, N, B>,
) -> Vector<T, N, B>
where
    T: Element,
    B: Backend,
{
    a.into_vector() ^ b.into_vector()
}

/// `a & !b` on lane bits
#[inline(always)]
pub fn bit_andnot<T, const N: usize, B>(
    a: impl Operand<T, N, B>,
    b: impl Operand<T, N, B>,
) -> Vector<T, N, B>
where
    T: Element,
    B: Backend,
{
    a.into_vector().and_not(b.into_vector())
}

/// `!a` on lane bits
#[inline(always)]
pub fn bit_not<T: Element, const N: usize, B: Backend>(a: Vector<T, N, B>) -> Vector<T, N, B> {
    !a
}

/// Lanes where `a == b`
#[inline(always)]
pub fn cmp_eq<T, const N: usize, B>(a: impl Operand<T, N, B>, b: impl Operand<T, N, B>) -> Mask<T, N, B>
where
    T: Element,
    B: Backend,
{
    a.into_vector().cmp_eq(b.into_vector())
}

/// Lanes where `a < b`
#[inline(always)]
pub fn cmp_lt<T, const N: usize, B>(a: impl Operand<T, N, B>, b: impl Operand<T, N, B>) -> Mask<T, N, B>
where
    T: Element,
    B: Backend,
{
    a.into_vector().cmp_lt(b.into_vector())
}

/// Lanes where `a > b`
#[inline(always)]
pub fn cmp_gt<T, const N: usize, B>(a: impl Operand<T, N, B>, b: impl Operand<T, N, B>) -> Mask<T, N, B>
where
    T: Element,
    B: Backend,
{
    a.into_vector().cmp_gt(b.into_vector())
}

/// Lanes of `a` that hold a NaN
#[inline(always)]
pub fn isnan<T: Float, const N: usize, B: Backend>(a: Vector<T, N, B>) -> Mask<T, N, B> {
    a.isnan()
}

/// Lanes where `a` or `b` holds a NaN
#[inline(always)]
pub fn isnan2<T, const N: usize, B>(a: impl Operand<T, N, B>, b: impl Operand<T, N, B>) -> Mask<T, N, B>
where
    T: Float,
    B: Backend,
{
    a.into_vector().isnan2(b.into_vector())
}

/// Lanes of `a` where `mask` is set, lanes of `b` elsewhere
#[inline(always)]
pub fn select<T, const N: usize, B>(
    mask: Mask<T, N, B>,
    a: impl Operand<T, N, B>,
    b: impl Operand<T, N, B>,
) -> Vector<T, N, B>
where
    T: Element,
    B: Backend,
{
    mask.select(a.into_vector(), b.into_vector())
}
