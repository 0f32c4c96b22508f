//! Test fixtures and utilities for integration tests

use simdweave::Element;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for test outputs
pub fn create_test_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

/// `[start, start + 1, ..]` in the lane type
pub fn ramp<T: Element, const N: usize>(start: u64) -> [T; N] {
    std::array::from_fn(|i| T::from_lane_bits(start + i as u64))
}

/// Lane-by-lane comparison with every NaN equal to every other NaN
pub fn assert_same_lanes<T: Element>(got: &[T], want: &[T], what: &str) {
    assert_eq!(got.len(), want.len(), "{what}: length differs");
    for (lane, (g, w)) in got.iter().zip(want).enumerate() {
        assert!(g.same_value(*w), "{what}: lane {lane} is {g:?}, expected {w:?}");
    }
}

/// Native-endian bytes of a slice
pub fn to_bytes<T: Element>(values: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(values).to_vec()
}
