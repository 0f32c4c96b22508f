//! Capability profile of the compiled artifact
//!
//! Exactly one instruction-set family is active per build. It is chosen by
//! cargo features (`null`, `sse2`, `avx2`, `neon`) or, when none is
//! requested, by the target features the crate is compiled with. Nothing in
//! this crate switches capability at runtime; [`Capability::is_available_on_host`]
//! only exists so tools can report a mismatch between build and host.

use serde::Serialize;
use std::fmt;

use crate::backend::{Active, Backend};
use crate::element::ElementKind;

/// Instruction-set family a backend is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Portable lane-by-lane fallback
    Null,
    /// x86 SSE2, 128-bit registers
    Sse2,
    /// x86 AVX2, 256-bit registers
    Avx2,
    /// AArch64 Advanced SIMD, 128-bit registers
    Neon,
}

/// Operation families tracked by the support matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// `add` and `sub`
    AddSub,
    /// `bit_and`, `bit_or`, `bit_xor`, `bit_andnot`, `bit_not`
    Bitwise,
    /// `cmp_eq`
    CmpEq,
    /// `cmp_lt` and `cmp_gt`
    CmpLt,
    /// `isnan` and `isnan2`
    IsNan,
    /// `select`
    Select,
    /// `move_r`
    MoveR,
    /// `permute2` and `permute4`
    Permute,
    /// Aligned `load` and `store`
    LoadStore,
    /// `load_packed2` and `store_packed2`
    Packed2,
    /// `load_packed3` and `store_packed3`
    Packed3,
    /// `load_packed4` and `store_packed4`
    Packed4,
}

impl Op {
    /// Every tracked operation family
    pub const ALL: [Op; 12] = [
        Op::AddSub,
        Op::Bitwise,
        Op::CmpEq,
        Op::CmpLt,
        Op::IsNan,
        Op::Select,
        Op::MoveR,
        Op::Permute,
        Op::LoadStore,
        Op::Packed2,
        Op::Packed3,
        Op::Packed4,
    ];

    /// Short display name
    pub const fn name(self) -> &'static str {
        match self {
            Op::AddSub => "add/sub",
            Op::Bitwise => "bitwise",
            Op::CmpEq => "cmp_eq",
            Op::CmpLt => "cmp_lt",
            Op::IsNan => "isnan",
            Op::Select => "select",
            Op::MoveR => "move_r",
            Op::Permute => "permute",
            Op::LoadStore => "load/store",
            Op::Packed2 => "packed2",
            Op::Packed3 => "packed3",
            Op::Packed4 => "packed4",
        }
    }
}

/// How a backend implements one (operation, element kind) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Support {
    /// A single instruction (or one per register)
    Native,
    /// A short sequence of native instructions
    Composite,
    /// Routed through the lane-by-lane fallback
    Emulated,
    /// Rejected at compile time
    Unsupported,
}

impl Support {
    /// One-letter code used in tables
    pub const fn code(self) -> char {
        match self {
            Support::Native => 'N',
            Support::Composite => 'C',
            Support::Emulated => 'E',
            Support::Unsupported => '-',
        }
    }
}

impl Capability {
    /// Capability of the backend this crate was compiled for
    pub const ACTIVE: Capability = <Active as Backend>::CAPABILITY;

    /// Every capability, in order of increasing preference
    pub const ALL: [Capability; 4] = [
        Capability::Null,
        Capability::Sse2,
        Capability::Avx2,
        Capability::Neon,
    ];

    /// Native register width in bytes, which is also the required alignment
    pub const fn width_bytes(self) -> usize {
        match self {
            Capability::Avx2 => 32,
            Capability::Null | Capability::Sse2 | Capability::Neon => 16,
        }
    }

    /// Lanes of `kind` held by one native register
    pub const fn base_lanes(self, kind: ElementKind) -> usize {
        self.width_bytes() / kind.size()
    }

    /// Lower-case display name
    pub const fn name(self) -> &'static str {
        match self {
            Capability::Null => "null",
            Capability::Sse2 => "sse2",
            Capability::Avx2 => "avx2",
            Capability::Neon => "neon",
        }
    }

    /// Whether the running CPU can execute code built for this capability
    pub fn is_available_on_host(self) -> bool {
        match self {
            Capability::Null => true,
            Capability::Sse2 => {
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                {
                    is_x86_feature_detected!("sse2")
                }
                #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
                {
                    false
                }
            }
            Capability::Avx2 => {
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                {
                    is_x86_feature_detected!("avx2")
                }
                #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
                {
                    false
                }
            }
            Capability::Neon => {
                #[cfg(target_arch = "aarch64")]
                {
                    std::arch::is_aarch64_feature_detected!("neon")
                }
                #[cfg(not(target_arch = "aarch64"))]
                {
                    false
                }
            }
        }
    }

    /// Support matrix entry for one operation on one element kind.
    ///
    /// The table mirrors the backends: x86 has no 8/16-bit three-way
    /// shuffle, so those interleaves are emulated there, and 8-bit lanes have
    /// no permute on any backend.
    pub const fn support(self, op: Op, kind: ElementKind) -> Support {
        use ElementKind as K;
        use Support::*;

        match (op, kind) {
            (Op::IsNan, k) if !k.is_float() => return Unsupported,
            (Op::Permute, K::I8 | K::U8) => return Unsupported,
            _ => {}
        }

        match self {
            Capability::Null => Emulated,
            Capability::Sse2 => match op {
                Op::AddSub | Op::Bitwise | Op::MoveR | Op::LoadStore | Op::IsNan => Native,
                Op::CmpEq => match kind.size() {
                    8 if !kind.is_float() => Composite,
                    _ => Native,
                },
                Op::CmpLt => match kind {
                    K::I8 | K::I16 | K::I32 | K::F32 | K::F64 => Native,
                    _ => Composite,
                },
                Op::Select | Op::Packed2 | Op::Packed4 => Composite,
                Op::Permute => match kind.size() {
                    2 => Composite,
                    _ => Native,
                },
                Op::Packed3 => match kind.size() {
                    1 | 2 => Emulated,
                    _ => Composite,
                },
            },
            Capability::Avx2 => match op {
                Op::AddSub | Op::Bitwise | Op::MoveR | Op::LoadStore | Op::IsNan => Native,
                Op::CmpEq | Op::Select => Native,
                Op::CmpLt => match kind {
                    K::I8 | K::I16 | K::I32 | K::I64 | K::F32 | K::F64 => Native,
                    _ => Composite,
                },
                Op::Packed2 | Op::Packed4 => Composite,
                Op::Permute => match kind.size() {
                    2 => Composite,
                    _ => Native,
                },
                Op::Packed3 => match kind.size() {
                    1 | 2 => Emulated,
                    _ => Composite,
                },
            },
            Capability::Neon => match op {
                Op::IsNan | Op::Permute => Composite,
                _ => Native,
            },
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_matches_backend_width() {
        assert_eq!(Capability::ACTIVE.width_bytes(), <Active as Backend>::WIDTH_BYTES);
        assert!(Capability::ACTIVE.is_available_on_host());
    }

    #[test]
    fn test_base_lanes() {
        assert_eq!(Capability::Sse2.base_lanes(ElementKind::U8), 16);
        assert_eq!(Capability::Avx2.base_lanes(ElementKind::F32), 8);
        assert_eq!(Capability::Neon.base_lanes(ElementKind::F64), 2);
    }

    #[test]
    fn test_support_matrix_rejects_impossible_pairs() {
        for cap in Capability::ALL {
            assert_eq!(cap.support(Op::IsNan, ElementKind::I32), Support::Unsupported);
            assert_eq!(cap.support(Op::Permute, ElementKind::U8), Support::Unsupported);
            assert_ne!(cap.support(Op::AddSub, ElementKind::F64), Support::Unsupported);
        }
        assert_eq!(Capability::Sse2.support(Op::Packed3, ElementKind::U8), Support::Emulated);
        assert_eq!(Capability::Sse2.support(Op::Packed3, ElementKind::F32), Support::Composite);
        assert_eq!(Capability::Neon.support(Op::Packed3, ElementKind::U16), Support::Native);
    }

    #[test]
    fn test_support_matrix_tracks_backend_kernels() {
        use ElementKind as K;
        use Support::*;

        let entries = [
            (Capability::Sse2, Op::CmpEq, K::I64, Composite),
            (Capability::Sse2, Op::CmpEq, K::U64, Composite),
            (Capability::Sse2, Op::CmpEq, K::F64, Native),
            (Capability::Sse2, Op::CmpLt, K::U32, Composite),
            (Capability::Sse2, Op::CmpLt, K::I64, Composite),
            (Capability::Sse2, Op::CmpLt, K::I16, Native),
            (Capability::Sse2, Op::Permute, K::I16, Composite),
            (Capability::Sse2, Op::Permute, K::U64, Native),
            (Capability::Sse2, Op::Select, K::F32, Composite),
            (Capability::Avx2, Op::CmpLt, K::U64, Composite),
            (Capability::Avx2, Op::CmpLt, K::I64, Native),
            (Capability::Avx2, Op::Select, K::U8, Native),
            (Capability::Avx2, Op::Packed3, K::I16, Emulated),
            (Capability::Avx2, Op::Packed3, K::F64, Composite),
            (Capability::Neon, Op::Permute, K::U16, Composite),
            (Capability::Neon, Op::Permute, K::F32, Composite),
            (Capability::Neon, Op::Permute, K::U64, Composite),
            (Capability::Neon, Op::IsNan, K::F64, Composite),
            (Capability::Neon, Op::CmpLt, K::U64, Native),
            (Capability::Null, Op::AddSub, K::U8, Emulated),
        ];
        for (cap, op, kind, expected) in entries {
            assert_eq!(cap.support(op, kind), expected, "{cap} {op:?} {kind}");
        }
    }
}
