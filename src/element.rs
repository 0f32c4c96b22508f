//! Scalar element kinds that may occupy a vector lane

use bytemuck::Pod;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

mod sealed {
    pub trait Sealed {}
}

/// Runtime tag for an element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Signed 8-bit integer
    I8,
    /// Unsigned 8-bit integer
    U8,
    /// Signed 16-bit integer
    I16,
    /// Unsigned 16-bit integer
    U16,
    /// Signed 32-bit integer
    I32,
    /// Unsigned 32-bit integer
    U32,
    /// Signed 64-bit integer
    I64,
    /// Unsigned 64-bit integer
    U64,
    /// IEEE-754 binary32
    F32,
    /// IEEE-754 binary64
    F64,
}

impl ElementKind {
    /// Every supported kind, narrowest first
    pub const ALL: [ElementKind; 10] = [
        ElementKind::I8,
        ElementKind::U8,
        ElementKind::I16,
        ElementKind::U16,
        ElementKind::I32,
        ElementKind::U32,
        ElementKind::I64,
        ElementKind::U64,
        ElementKind::F32,
        ElementKind::F64,
    ];

    /// Size of one lane in bytes
    pub const fn size(self) -> usize {
        match self {
            ElementKind::I8 | ElementKind::U8 => 1,
            ElementKind::I16 | ElementKind::U16 => 2,
            ElementKind::I32 | ElementKind::U32 | ElementKind::F32 => 4,
            ElementKind::I64 | ElementKind::U64 | ElementKind::F64 => 8,
        }
    }

    /// Whether the kind is an IEEE-754 float
    pub const fn is_float(self) -> bool {
        matches!(self, ElementKind::F32 | ElementKind::F64)
    }

    /// Whether ordering comparisons treat the lane as signed
    pub const fn is_signed(self) -> bool {
        !matches!(
            self,
            ElementKind::U8 | ElementKind::U16 | ElementKind::U32 | ElementKind::U64
        )
    }

    /// Lower-case name, as used in configuration files
    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::I8 => "i8",
            ElementKind::U8 => "u8",
            ElementKind::I16 => "i16",
            ElementKind::U16 => "u16",
            ElementKind::I32 => "i32",
            ElementKind::U32 => "u32",
            ElementKind::I64 => "i64",
            ElementKind::U64 => "u64",
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::invalid_input(format!("unknown element kind '{s}'")))
    }
}

/// A scalar type that can be stored in a vector lane.
///
/// The lane-level methods define the reference semantics used by the
/// fallback backend: integer arithmetic wraps, float arithmetic follows the
/// host, and comparisons follow the host operators.
pub trait Element:
    sealed::Sealed + Pod + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + 'static
{
    /// Runtime tag of this type
    const KIND: ElementKind;

    /// Size of one lane in bytes
    const SIZE: usize = Self::KIND.size();

    /// Bit pattern of the lane, zero-extended to 64 bits
    fn to_lane_bits(self) -> u64;

    /// Builds a lane from the low `SIZE * 8` bits of `bits`
    fn from_lane_bits(bits: u64) -> Self;

    /// Lane addition; wrapping for integers
    fn lane_add(self, rhs: Self) -> Self;

    /// Lane subtraction; wrapping for integers
    fn lane_sub(self, rhs: Self) -> Self;

    /// NaN test; always false for integers
    fn lane_is_nan(self) -> bool;

    /// All-ones bit pattern of this width
    fn ones_bits() -> u64 {
        u64::MAX >> (64 - 8 * Self::SIZE)
    }

    /// Mask lane: all-ones when `set`, all-zeros otherwise
    fn mask_lane(set: bool) -> Self {
        Self::from_lane_bits(if set { u64::MAX } else { 0 })
    }

    /// Whether the lane holds a valid mask pattern
    fn is_mask_lane(self) -> bool {
        let bits = self.to_lane_bits();
        bits == 0 || bits == Self::ones_bits()
    }

    /// Bit equality, except that any two NaNs compare equal
    fn same_value(self, other: Self) -> bool {
        self.to_lane_bits() == other.to_lane_bits() || (self.lane_is_nan() && other.lane_is_nan())
    }
}

/// Floating-point element types
pub trait Float: Element {}

macro_rules! impl_int_element {
    ($($t:ty => $kind:ident, $unsigned:ty;)*) => {$(
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const KIND: ElementKind = ElementKind::$kind;

            #[inline(always)]
            fn to_lane_bits(self) -> u64 {
                self as $unsigned as u64
            }

            #[inline(always)]
            fn from_lane_bits(bits: u64) -> Self {
                bits as $unsigned as $t
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                <$t>::wrapping_add(self, rhs)
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                <$t>::wrapping_sub(self, rhs)
            }

            #[inline(always)]
            fn lane_is_nan(self) -> bool {
                false
            }
        }
    )*};
}

impl_int_element! {
    i8 => I8, u8;
    u8 => U8, u8;
    i16 => I16, u16;
    u16 => U16, u16;
    i32 => I32, u32;
    u32 => U32, u32;
    i64 => I64, u64;
    u64 => U64, u64;
}

macro_rules! impl_float_element {
    ($($t:ty => $kind:ident, $bits:ty;)*) => {$(
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const KIND: ElementKind = ElementKind::$kind;

            #[inline(always)]
            fn to_lane_bits(self) -> u64 {
                <$t>::to_bits(self) as u64
            }

            #[inline(always)]
            fn from_lane_bits(bits: u64) -> Self {
                <$t>::from_bits(bits as $bits)
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline(always)]
            fn lane_is_nan(self) -> bool {
                <$t>::is_nan(self)
            }
        }

        impl Float for $t {}
    )*};
}

impl_float_element! {
    f32 => F32, u32;
    f64 => F64, u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_sizes_match_types() {
        assert_eq!(<i8 as Element>::SIZE, 1);
        assert_eq!(<u16 as Element>::SIZE, 2);
        assert_eq!(<f32 as Element>::SIZE, 4);
        assert_eq!(<i64 as Element>::SIZE, 8);
        for kind in ElementKind::ALL {
            assert!(matches!(kind.size(), 1 | 2 | 4 | 8));
        }
    }

    #[test]
    fn test_mask_lanes() {
        assert_eq!(u8::mask_lane(true), 0xff);
        assert_eq!(i16::mask_lane(true), -1);
        assert_eq!(u32::mask_lane(false), 0);
        assert_eq!(f32::mask_lane(true).to_bits(), u32::MAX);
        assert_eq!(f64::mask_lane(true).to_bits(), u64::MAX);
        assert!(f32::mask_lane(true).is_mask_lane());
        assert!(!5u32.is_mask_lane());
    }

    #[test]
    fn test_lane_bits_round_trip() {
        assert_eq!((-1i8).to_lane_bits(), 0xff);
        assert_eq!(i8::from_lane_bits(0x1ff), -1);
        assert_eq!(f64::from_lane_bits(1.5f64.to_lane_bits()), 1.5);
    }

    #[test]
    fn test_wrapping_lane_arithmetic() {
        assert_eq!(u8::MAX.lane_add(1), 0);
        assert_eq!(i32::MIN.lane_sub(1), i32::MAX);
        assert_eq!(1.5f32.lane_add(2.0), 3.5);
    }

    #[test]
    fn test_same_value_treats_nans_alike() {
        let quiet = f32::NAN;
        let other = f32::from_bits(0x7fc0_0001);
        assert!(quiet.same_value(other));
        assert!(!0.0f32.same_value(-0.0));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!("f32".parse::<ElementKind>().unwrap(), ElementKind::F32);
        assert!("f16".parse::<ElementKind>().is_err());
        assert_eq!(serde_json::to_string(&ElementKind::U64).unwrap(), "\"u64\"");
        assert!(ElementKind::I64.is_signed());
        assert!(!ElementKind::U8.is_signed());
    }
}
