//! Interleaved memory layouts of the packed loads and stores

use super::fixtures::{assert_same_lanes, ramp};
use simdweave::backend::null::Null;
use simdweave::interleave::{
    interleave_lanes, load_packed2_ptr, store_packed3_ptr,
};
use simdweave::{
    load_packed2, load_packed3, load_packed4, store_packed2, store_packed3, store_packed4,
    AlignedBuffer, Element, Float64, Int8, Uint32, Vector,
};

/// Scalar interleave of whole vectors
fn reference<T: Element, const N: usize>(planes: &[Vector<T, N>]) -> Vec<T> {
    let slices: Vec<&[T]> = planes.iter().map(|p| p.as_slice()).collect();
    let mut out = vec![T::default(); planes.len() * N];
    interleave_lanes(&slices, &mut out);
    out
}

#[test]
fn test_packed2_spans_registers() {
    let a = Int8::<64>::from_array(ramp(0));
    let b = Int8::<64>::from_array(ramp(64));
    let mut buffer = AlignedBuffer::<i8>::zeroed(128);
    store_packed2(&mut buffer.view_mut(), a, b);
    assert_eq!(buffer.as_slice(), &reference(&[a, b])[..]);

    let (la, lb) = load_packed2::<i8, 64, _>(buffer.view());
    assert_eq!((la, lb), (a, b));
}

#[test]
fn test_packed3_u8_takes_emulated_path() {
    let planes: [Vector<u8, 32>; 3] = [
        Vector::from_array(ramp(0)),
        Vector::from_array(ramp(100)),
        Vector::from_array(ramp(200)),
    ];
    let mut buffer = AlignedBuffer::<u8>::zeroed(96);
    store_packed3(&mut buffer.view_mut(), planes[0], planes[1], planes[2]);
    assert_eq!(&buffer.as_slice()[..6], &[0, 100, 200, 1, 101, 201]);
    assert_eq!(buffer.as_slice(), &reference(&planes)[..]);

    let (a, b, c) = load_packed3::<u8, 32, _>(buffer.view());
    assert_eq!([a, b, c], planes);
}

#[test]
fn test_packed3_u32_wide_vectors() {
    let planes: [Uint32<16>; 3] = [
        Uint32::from_array(ramp(0)),
        Uint32::from_array(ramp(1000)),
        Uint32::from_array(ramp(2000)),
    ];
    let mut buffer = AlignedBuffer::<u32>::zeroed(48);
    store_packed3(&mut buffer.view_mut(), planes[0], planes[1], planes[2]);
    assert_eq!(buffer.as_slice(), &reference(&planes)[..]);

    let (a, b, c) = load_packed3::<u32, 16, _>(buffer.view());
    assert_eq!([a, b, c], planes);
}

#[test]
fn test_packed4_f64_with_nan() {
    let a = Float64::<4>::from_array([1.0, f64::NAN, 3.0, 4.0]);
    let b = Float64::<4>::splat(-0.5);
    let c = Float64::<4>::from_array([9.0, 8.0, 7.0, 6.0]);
    let d = Float64::<4>::zero();
    let mut buffer = AlignedBuffer::<f64>::zeroed(16);
    store_packed4(&mut buffer.view_mut(), a, b, c, d);
    assert_same_lanes(buffer.as_slice(), &reference(&[a, b, c, d]), "store_packed4");

    let (la, lb, lc, ld) = load_packed4::<f64, 4, _>(buffer.view());
    assert!(la.same_lanes(&a));
    assert_eq!((lb, lc, ld), (b, c, d));
}

#[test]
fn test_active_layout_matches_reference_backend() {
    let a = Uint32::<8>::from_array(ramp(5));
    let b = Uint32::<8>::from_array(ramp(50));
    let mut active = AlignedBuffer::<u32>::zeroed(16);
    let mut null = AlignedBuffer::<u32>::zeroed(16);
    store_packed2(&mut active.view_mut(), a, b);
    store_packed2(&mut null.view_mut::<Null>(), a.to_backend::<Null>(), b.to_backend::<Null>());
    assert_eq!(active.as_slice(), null.as_slice());
}

#[test]
fn test_raw_pointer_variants() {
    let planes: [Uint32<8>; 3] = [
        Uint32::from_array(ramp(0)),
        Uint32::from_array(ramp(10)),
        Uint32::from_array(ramp(20)),
    ];
    let mut buffer = AlignedBuffer::<u32>::zeroed(24);
    // SAFETY: the buffer is aligned for every backend and holds 3 * 8 lanes
    unsafe {
        store_packed3_ptr(buffer.as_mut_slice().as_mut_ptr(), planes[0], planes[1], planes[2]);
    }
    assert_eq!(buffer.as_slice(), &reference(&planes)[..]);

    // SAFETY: as above, reading the first 2 * 8 lanes
    let (a, b): (Uint32<8>, Uint32<8>) = unsafe { load_packed2_ptr(buffer.as_slice().as_ptr()) };
    assert_eq!(a.to_array(), [0, 20, 11, 2, 22, 13, 4, 24]);
    assert_eq!(b.to_array(), [10, 1, 21, 12, 3, 23, 14, 5]);
}

#[test]
#[should_panic(expected = "packed access")]
fn test_short_buffer_panics() {
    let v = Uint32::<8>::splat(1);
    let mut buffer = AlignedBuffer::<u32>::zeroed(20);
    store_packed3(&mut buffer.view_mut(), v, v, v);
}
