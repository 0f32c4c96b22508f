//! Wide vectors behave like their native registers side by side
//!
//! Each test builds a vector of several native registers from known bases,
//! applies one operation to the whole vector, and checks every register of
//! the result against the same operation on a single native-width vector.

use super::fixtures::assert_same_lanes;
use simdweave::{cmp_lt, select, Base, Float32, Uint16, Vector};

const U16_LANES: usize = <Base<u16>>::LANES;
const F32_LANES: usize = <Base<f32>>::LANES;

type NativeU16 = Vector<u16, U16_LANES>;
type NativeF32 = Vector<f32, F32_LANES>;
type WideU16 = Uint16<64>;
type WideF32 = Float32<32>;

fn u16_bases(seed: u16) -> Vec<Base<u16>> {
    (0..WideU16::VEC_LENGTH)
        .map(|i| {
            let lanes: Vec<u16> = (0..U16_LANES)
                .map(|j| seed.wrapping_mul((i * U16_LANES + j) as u16 + 1).wrapping_add(j as u16))
                .collect();
            Base::from_slice(&lanes)
        })
        .collect()
}

fn f32_bases(scale: f32) -> Vec<Base<f32>> {
    (0..WideF32::VEC_LENGTH)
        .map(|i| {
            let lanes: Vec<f32> = (0..F32_LANES)
                .map(|j| ((i * F32_LANES + j) as f32 - 7.0) * scale)
                .collect();
            Base::from_slice(&lanes)
        })
        .collect()
}

fn native_u16(base: Base<u16>) -> NativeU16 {
    NativeU16::from_bases([base])
}

fn native_f32(base: Base<f32>) -> NativeF32 {
    NativeF32::from_bases([base])
}

#[test]
fn test_shape_spans_several_registers() {
    assert!(WideU16::VEC_LENGTH > 1);
    assert!(WideF32::VEC_LENGTH > 1);
    assert_eq!(u16_bases(3).len(), WideU16::VEC_LENGTH);
}

#[test]
fn test_add_per_register() {
    let (xa, xb) = (u16_bases(977), u16_bases(40503));
    let wide = WideU16::from_bases(xa.clone()) + WideU16::from_bases(xb.clone());
    for i in 0..WideU16::VEC_LENGTH {
        let want = native_u16(xa[i]) + native_u16(xb[i]);
        assert_eq!(wide.base(i).to_vec(), want.to_array().to_vec(), "register {i}");
    }

    let (fa, fb) = (f32_bases(0.5), f32_bases(-1.25));
    let wide = WideF32::from_bases(fa.clone()) - WideF32::from_bases(fb.clone());
    for i in 0..WideF32::VEC_LENGTH {
        let want = native_f32(fa[i]) - native_f32(fb[i]);
        assert_same_lanes(&wide.base(i).to_vec(), want.as_slice(), "f32 sub");
    }
}

#[test]
fn test_compare_and_select_per_register() {
    let (xa, xb) = (u16_bases(977), u16_bases(40503));
    let (a, b) = (WideU16::from_bases(xa.clone()), WideU16::from_bases(xb.clone()));
    let mask = cmp_lt(a, b);
    let picked = select(mask, a, b);
    for i in 0..WideU16::VEC_LENGTH {
        let (na, nb) = (native_u16(xa[i]), native_u16(xb[i]));
        let native_mask = cmp_lt(na, nb);
        assert_eq!(
            mask.to_vector().base(i).to_vec(),
            native_mask.to_vector().to_array().to_vec(),
            "mask register {i}"
        );
        assert_eq!(
            picked.base(i).to_vec(),
            select(native_mask, na, nb).to_array().to_vec(),
            "select register {i}"
        );
    }

    let (fa, fb) = (f32_bases(0.5), f32_bases(-1.25));
    let mask = WideF32::from_bases(fa.clone()).cmp_gt(WideF32::from_bases(fb.clone()));
    for i in 0..WideF32::VEC_LENGTH {
        let native_mask = native_f32(fa[i]).cmp_gt(native_f32(fb[i]));
        assert_eq!(
            mask.to_vector().base(i).to_vec().iter().map(|l| l.to_bits()).collect::<Vec<_>>(),
            native_mask.to_vector().to_array().iter().map(|l| l.to_bits()).collect::<Vec<_>>(),
            "f32 mask register {i}"
        );
    }
}

#[test]
fn test_permute4_per_register() {
    let xa = u16_bases(977);
    let wide = WideU16::from_bases(xa.clone()).permute4::<3, 1, 2, 0>();
    for i in 0..WideU16::VEC_LENGTH {
        let want = native_u16(xa[i]).permute4::<3, 1, 2, 0>();
        assert_eq!(wide.base(i).to_vec(), want.to_array().to_vec(), "register {i}");
    }

    let fa = f32_bases(0.75);
    let wide = WideF32::from_bases(fa.clone()).permute4::<2, 2, 0, 1>();
    for i in 0..WideF32::VEC_LENGTH {
        let want = native_f32(fa[i]).permute4::<2, 2, 0, 1>();
        assert_same_lanes(&wide.base(i).to_vec(), want.as_slice(), "f32 permute4");
    }
}

#[test]
fn test_move_r_per_register() {
    let xa = u16_bases(977);
    let wide = WideU16::from_bases(xa.clone()).move_r::<3>();
    for i in 0..WideU16::VEC_LENGTH {
        let want = native_u16(xa[i]).move_r::<3>();
        assert_eq!(wide.base(i).to_vec(), want.to_array().to_vec(), "register {i}");
        assert_eq!(wide.base(i).to_vec()[..3], [0, 0, 0]);
    }
}
