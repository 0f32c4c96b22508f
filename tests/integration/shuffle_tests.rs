//! Lane shift and permute tables

use super::fixtures::ramp;
use simdweave::backend::null::Null;
use simdweave::{Float32, Int16, Uint64, Uint8, Vector};
use test_case::test_case;

/// Expected `move_r` result on a ramp starting at 1: each 16-byte group
/// shifts independently and zero fills from its low end
fn moved_ramp(lanes: usize, group: usize, shift: usize) -> Vec<u64> {
    (0..lanes)
        .map(|i| {
            let j = i % group;
            if j < shift {
                0
            } else {
                (i - shift + 1) as u64
            }
        })
        .collect()
}

fn bits<T: simdweave::Element>(lanes: &[T]) -> Vec<u64> {
    lanes.iter().map(|l| l.to_lane_bits()).collect()
}

#[test_case(Uint8::<32>::from_array(ramp(1)).move_r::<0>().to_array().to_vec(), 0 ; "u8 by 0")]
#[test_case(Uint8::<32>::from_array(ramp(1)).move_r::<1>().to_array().to_vec(), 1 ; "u8 by 1")]
#[test_case(Uint8::<32>::from_array(ramp(1)).move_r::<7>().to_array().to_vec(), 7 ; "u8 by 7")]
#[test_case(Uint8::<32>::from_array(ramp(1)).move_r::<15>().to_array().to_vec(), 15 ; "u8 by 15")]
#[test_case(Uint8::<32>::from_array(ramp(1)).move_r::<16>().to_array().to_vec(), 16 ; "u8 by 16")]
fn test_move_r_u8(moved: Vec<u8>, shift: usize) {
    assert_eq!(bits(&moved), moved_ramp(32, 16, shift));
}

#[test_case(Int16::<16>::from_array(ramp(1)).move_r::<1>().to_array().to_vec(), 1 ; "i16 by 1")]
#[test_case(Int16::<16>::from_array(ramp(1)).move_r::<5>().to_array().to_vec(), 5 ; "i16 by 5")]
#[test_case(Int16::<16>::from_array(ramp(1)).move_r::<8>().to_array().to_vec(), 8 ; "i16 by 8")]
fn test_move_r_i16(moved: Vec<i16>, shift: usize) {
    assert_eq!(bits(&moved), moved_ramp(16, 8, shift));
}

#[test_case(Uint64::<4>::from_array(ramp(1)).move_r::<1>().to_array().to_vec(), 1 ; "u64 by 1")]
#[test_case(Uint64::<4>::from_array(ramp(1)).move_r::<2>().to_array().to_vec(), 2 ; "u64 by 2")]
fn test_move_r_u64(moved: Vec<u64>, shift: usize) {
    assert_eq!(moved, moved_ramp(4, 2, shift));
}

#[test]
fn test_move_r_matches_reference_backend() {
    let v = Uint8::<32>::from_array(ramp(40));
    assert_eq!(
        v.move_r::<3>().to_array(),
        v.to_backend::<Null>().move_r::<3>().to_array()
    );
}

#[test_case([0, 1, 2, 3] ; "identity")]
#[test_case([3, 2, 1, 0] ; "reverse")]
#[test_case([1, 1, 1, 1] ; "broadcast")]
#[test_case([1, 0, 3, 2] ; "swap pairs")]
#[test_case([2, 0, 3, 1] ; "mixed")]
fn test_permute4_f32_group_local(sel: [usize; 4]) {
    let v = Float32::<8>::from_array([0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    let got = match sel {
        [0, 1, 2, 3] => v.permute4::<0, 1, 2, 3>(),
        [3, 2, 1, 0] => v.permute4::<3, 2, 1, 0>(),
        [1, 1, 1, 1] => v.permute4::<1, 1, 1, 1>(),
        [1, 0, 3, 2] => v.permute4::<1, 0, 3, 2>(),
        _ => v.permute4::<2, 0, 3, 1>(),
    };
    let want: Vec<f32> = (0..8).map(|i| (i / 4 * 4 + sel[i % 4]) as f32).collect();
    assert_eq!(got.to_array().to_vec(), want);
}

#[test]
fn test_permute4_i16_all_backends_agree() {
    let v = Int16::<16>::from_array(ramp(100));
    let n = v.to_backend::<Null>();
    assert_eq!(
        v.permute4::<3, 0, 0, 2>().to_array(),
        n.permute4::<3, 0, 0, 2>().to_array()
    );
    assert_eq!(v.permute2::<1, 0>().to_array(), n.permute2::<1, 0>().to_array());
}

#[test]
fn test_permute2_u64_swaps_pairs() {
    let v = Uint64::<4>::from_array([10, 11, 12, 13]);
    assert_eq!(v.permute2::<1, 0>().to_array(), [11, 10, 13, 12]);
    assert_eq!(v.permute2::<0, 0>().to_array(), [10, 10, 12, 12]);
}

#[test]
fn test_shuffles_on_reference_backend_128() {
    let v = Vector::<u16, 8, Null>::from_array(ramp(1));
    assert_eq!(v.move_r::<3>().to_array(), [0, 0, 0, 1, 2, 3, 4, 5]);
    assert_eq!(v.permute2::<1, 1>().to_array(), [2, 2, 4, 4, 6, 6, 8, 8]);
}
