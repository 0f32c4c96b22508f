//! simdweave - portable fixed-width SIMD vectors
//!
//! This crate provides vectors of a fixed number of lanes whose operations
//! compile to the native instruction set chosen at build time (SSE2, AVX2,
//! NEON, or a portable lane-by-lane fallback). A vector longer than one
//! native register is split into several registers transparently.
//!
//! ```
//! use simdweave::{AlignedBuffer, Float32, store_packed2};
//!
//! let a = Float32::<8>::from_array([0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
//! let b = a + 10.0f32;
//!
//! let mut buffer = AlignedBuffer::<f32>::zeroed(16);
//! store_packed2(&mut buffer.view_mut(), a, b);
//! assert_eq!(&buffer.as_slice()[..4], &[0.0, 10.0, 1.0, 11.0]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod backend;
pub mod capability;
pub mod config;
pub mod element;
pub mod error;
pub mod interleave;
pub mod logging;
pub mod mask;
pub mod memory;
pub mod ops;
pub mod planar;
pub mod selftest;
pub mod shuffle;
pub mod vector;

// Re-exports
pub use backend::{Active, Backend};
pub use capability::{Capability, Op, Support};
pub use config::Config;
pub use element::{Element, ElementKind, Float};
pub use error::{Error, Result};
pub use interleave::{
    load_packed2, load_packed3, load_packed4, store_packed2, store_packed3, store_packed4,
};
pub use mask::{
    Mask, MaskFloat32, MaskFloat64, MaskInt16, MaskInt32, MaskInt64, MaskInt8, MaskUint16,
    MaskUint32, MaskUint64, MaskUint8,
};
pub use memory::{load, store, Aligned, AlignedBuffer, AlignedMut};
pub use ops::{
    add, bit_and, bit_andnot, bit_not, bit_or, bit_xor, cmp_eq, cmp_gt, cmp_lt, isnan, isnan2,
    select, sub, Operand,
};
pub use vector::{
    Base, Float32, Float64, Int16, Int32, Int64, Int8, Uint16, Uint32, Uint64, Uint8, Vector,
};
