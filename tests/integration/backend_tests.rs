//! The compiled backend agrees with the lane-by-lane reference

use super::fixtures::assert_same_lanes;
use proptest::prelude::*;
use simdweave::backend::null::Null;
use simdweave::{
    add, bit_andnot, cmp_eq, cmp_gt, cmp_lt, isnan, isnan2, select, sub, Active, Capability,
    Element, Float32, Float64, Int16, Int64, Mask, MaskFloat32, Uint32, Uint8, Vector,
};

fn same<T: Element, const N: usize>(got: Vector<T, N, Active>, want: Vector<T, N, Null>) -> bool {
    got.as_slice()
        .iter()
        .zip(want.as_slice())
        .all(|(g, w)| g.same_value(*w))
}

fn same_mask<T: Element, const N: usize>(got: Mask<T, N, Active>, want: Mask<T, N, Null>) -> bool {
    got.to_bools() == want.to_bools()
}

fn floats(values: [i32; 8]) -> [f32; 8] {
    values.map(|v| v as f32 / 4.0)
}

proptest! {
    #[test]
    fn prop_u8_arithmetic_wraps_like_reference(
        a in prop::array::uniform32(any::<u8>()),
        b in prop::array::uniform32(any::<u8>()),
    ) {
        let (va, vb) = (Uint8::<32>::from_array(a), Uint8::<32>::from_array(b));
        let (na, nb) = (va.to_backend::<Null>(), vb.to_backend::<Null>());

        prop_assert!(same(va + vb, na + nb));
        prop_assert!(same(va - vb, na - nb));
        prop_assert!(same(bit_andnot(va, vb), bit_andnot(na, nb)));
        prop_assert!(same_mask(cmp_lt(va, vb), cmp_lt(na, nb)));
        prop_assert!(same_mask(cmp_gt(va, vb), cmp_gt(na, nb)));
        for i in 0..32 {
            prop_assert_eq!((va + vb)[i], a[i].wrapping_add(b[i]));
        }
    }

    #[test]
    fn prop_signed_compares_match_reference(
        a in prop::array::uniform16(any::<i16>()),
        b in prop::array::uniform16(any::<i16>()),
    ) {
        let (va, vb) = (Int16::<16>::from_array(a), Int16::<16>::from_array(b));
        let lt = va.cmp_lt(vb).to_bools();
        for i in 0..16 {
            prop_assert_eq!(lt[i], a[i] < b[i]);
        }
        prop_assert!(same_mask(va.cmp_eq(vb), va.to_backend::<Null>().cmp_eq(vb.to_backend::<Null>())));
    }

    #[test]
    fn prop_u32_select_matches_reference(
        a in prop::array::uniform8(any::<u32>()),
        b in prop::array::uniform8(any::<u32>()),
    ) {
        let (va, vb) = (Uint32::<8>::from_array(a), Uint32::<8>::from_array(b));
        let (na, nb) = (va.to_backend::<Null>(), vb.to_backend::<Null>());
        let picked = select(cmp_lt(va, vb), va, vb);
        for i in 0..8 {
            prop_assert_eq!(picked[i], a[i].min(b[i]));
        }
        prop_assert!(same(picked, select(cmp_lt(na, nb), na, nb)));
    }

    #[test]
    fn prop_i64_compares_use_full_width(
        a in prop::array::uniform4(any::<i64>()),
        b in prop::array::uniform4(any::<i64>()),
    ) {
        let (va, vb) = (Int64::<4>::from_array(a), Int64::<4>::from_array(b));
        let lt = va.cmp_lt(vb).to_bools();
        let eq = va.cmp_eq(vb).to_bools();
        for i in 0..4 {
            prop_assert_eq!(lt[i], a[i] < b[i]);
            prop_assert_eq!(eq[i], a[i] == b[i]);
        }
    }

    #[test]
    fn prop_f32_ops_match_reference(
        a in prop::array::uniform8(-4000i32..4000),
        b in prop::array::uniform8(-4000i32..4000),
        nan_lane in 0usize..8,
    ) {
        let mut fa = floats(a);
        fa[nan_lane] = f32::NAN;
        let (va, vb) = (Float32::<8>::from_array(fa), Float32::<8>::from_array(floats(b)));
        let (na, nb) = (va.to_backend::<Null>(), vb.to_backend::<Null>());

        prop_assert!(same(add(va, vb), add(na, nb)));
        prop_assert!(same(sub(va, vb), sub(na, nb)));
        prop_assert!(same_mask(cmp_eq(va, vb), cmp_eq(na, nb)));
        prop_assert!(same_mask(cmp_lt(va, vb), cmp_lt(na, nb)));
        prop_assert!(same_mask(isnan2(va, vb), isnan2(na, nb)));

        let nan = isnan(va).to_bools();
        for i in 0..8 {
            prop_assert_eq!(nan[i], i == nan_lane);
        }
    }
}

#[test]
fn test_scalar_operands_broadcast() {
    let v = Float64::<4>::from_array([1.0, 2.0, 3.0, 4.0]);
    assert_eq!(add(v, 0.5f64).to_array(), [1.5, 2.5, 3.5, 4.5]);
    assert_eq!(sub(10.0f64, v).to_array(), [9.0, 8.0, 7.0, 6.0]);
    assert_eq!(cmp_lt(v, 2.5f64).to_bools(), [true, true, false, false]);
}

#[test]
fn test_nan_compares_false() {
    let v = Float32::<8>::splat(f32::NAN);
    assert!(!cmp_eq(v, v).any());
    assert!(!cmp_lt(v, 0.0f32).any());
    let nan: MaskFloat32<8> = isnan(v);
    assert!(nan.all());
}

#[test]
fn test_active_capability_matches_build() {
    let active = Capability::ACTIVE;
    assert_eq!(Uint8::<32>::capability(), active);
    assert_eq!(
        active.width_bytes(),
        <Active as simdweave::Backend>::WIDTH_BYTES
    );
    assert!(active.is_available_on_host());
}

#[test]
fn test_mask_from_vector_rejects_partial_lanes() {
    let bits = Uint32::<8>::from_array([0, u32::MAX, 0, 1, 0, 0, 0, 0]);
    let err = Mask::try_from(bits).unwrap_err();
    assert!(matches!(err, simdweave::Error::InvalidMask { lane: 3 }));
}

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
mod sse2 {
    use super::*;
    use simdweave::backend::sse2::Sse2;

    proptest! {
        #[test]
        fn prop_sse2_u64_compares_match_reference(
            a in prop::array::uniform2(any::<u64>()),
            b in prop::array::uniform2(any::<u64>()),
        ) {
            let (va, vb) = (Vector::<u64, 2, Sse2>::from_array(a), Vector::<u64, 2, Sse2>::from_array(b));
            let lt = va.cmp_lt(vb).to_bools();
            let eq = va.cmp_eq(vb).to_bools();
            for i in 0..2 {
                prop_assert_eq!(lt[i], a[i] < b[i]);
                prop_assert_eq!(eq[i], a[i] == b[i]);
            }
        }

        #[test]
        fn prop_sse2_u8_select_matches_reference(
            a in prop::array::uniform16(any::<u8>()),
            b in prop::array::uniform16(any::<u8>()),
        ) {
            let (va, vb) = (Vector::<u8, 16, Sse2>::from_array(a), Vector::<u8, 16, Sse2>::from_array(b));
            let (na, nb) = (va.to_backend::<Null>(), vb.to_backend::<Null>());
            let got = va.cmp_gt(vb).select(va, vb);
            let want = na.cmp_gt(nb).select(na, nb);
            assert_same_lanes(got.as_slice(), want.as_slice(), "select");
        }
    }
}
