//! Planar file conversion

use super::fixtures::{create_test_dir, to_bytes};
use super::init_test_logging;
use simdweave::planar::{deinterleave_planes, interleave_planes, pack_files, unpack_file};
use simdweave::{ElementKind, Error};
use std::fs;
use test_case::test_case;

#[test_case(2 ; "two planes")]
#[test_case(3 ; "three planes")]
#[test_case(4 ; "four planes")]
fn test_u16_planes_round_trip(ways: usize) {
    let planes: Vec<Vec<u16>> = (0..ways)
        .map(|p| (0..101).map(|i| (p * 1000 + i) as u16).collect())
        .collect();
    let slices: Vec<&[u16]> = planes.iter().map(|p| &p[..]).collect();

    let packed = interleave_planes::<u16, 32>(&slices).unwrap();
    assert_eq!(packed.len(), ways * 101);
    for (i, value) in packed.as_slice().iter().enumerate() {
        assert_eq!(*value as usize, (i % ways) * 1000 + i / ways);
    }

    let back = deinterleave_planes::<u16, 32>(packed.as_slice(), ways).unwrap();
    assert_eq!(back, planes);
}

#[test]
fn test_empty_planes() {
    let packed = interleave_planes::<f64, 8>(&[&[][..], &[][..]]).unwrap();
    assert!(packed.is_empty());
    let back = deinterleave_planes::<f64, 8>(&[], 2).unwrap();
    assert_eq!(back, vec![Vec::<f64>::new(), Vec::new()]);
}

#[test]
fn test_pack_and_unpack_files() {
    init_test_logging();
    let (_dir, path) = create_test_dir();

    let r: Vec<f32> = (0..70).map(|i| i as f32).collect();
    let g: Vec<f32> = (0..70).map(|i| i as f32 + 0.25).collect();
    let b: Vec<f32> = (0..70).map(|i| -(i as f32)).collect();
    let inputs: Vec<_> = [("r.raw", &r), ("g.raw", &g), ("b.raw", &b)]
        .iter()
        .map(|(name, data)| {
            let file = path.join(name);
            fs::write(&file, to_bytes(&data[..])).unwrap();
            file
        })
        .collect();

    let packed = path.join("out/rgb.raw");
    let report = pack_files(&inputs, &packed, ElementKind::F32).unwrap();
    assert_eq!(report.ways, 3);
    assert_eq!(report.elements_per_plane, 70);
    assert_eq!(report.vector_elements + report.tail_elements, 70);
    assert_eq!(fs::metadata(&packed).unwrap().len(), 3 * 70 * 4);

    let outputs: Vec<_> = ["r2.raw", "g2.raw", "b2.raw"].iter().map(|n| path.join(n)).collect();
    unpack_file(&packed, &outputs, ElementKind::F32).unwrap();
    assert_eq!(fs::read(&outputs[0]).unwrap(), to_bytes(&r));
    assert_eq!(fs::read(&outputs[1]).unwrap(), to_bytes(&g));
    assert_eq!(fs::read(&outputs[2]).unwrap(), to_bytes(&b));
}

#[test]
fn test_pack_rejects_uneven_planes() {
    let (_dir, path) = create_test_dir();
    let a = path.join("a.raw");
    let b = path.join("b.raw");
    fs::write(&a, [0u8; 16]).unwrap();
    fs::write(&b, [0u8; 12]).unwrap();

    let err = pack_files(&[a, b], &path.join("ab.raw"), ElementKind::U32).unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { expected: 4, actual: 3 }));
}

#[test]
fn test_unpack_rejects_partial_elements() {
    let (_dir, path) = create_test_dir();
    let input = path.join("odd.raw");
    fs::write(&input, [0u8; 7]).unwrap();

    let outputs = [path.join("x.raw"), path.join("y.raw")];
    assert!(matches!(
        unpack_file(&input, &outputs, ElementKind::U16),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_missing_input_is_io_error() {
    let (_dir, path) = create_test_dir();
    let inputs = [path.join("missing0.raw"), path.join("missing1.raw")];
    assert!(matches!(
        pack_files(&inputs, &path.join("out.raw"), ElementKind::U8),
        Err(Error::Io(_))
    ));
}
