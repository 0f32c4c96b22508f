//! Planar to interleaved conversion over whole buffers and files
//!
//! The bulk of each buffer goes through the packed vector stores and loads
//! of the active backend, 64 bytes per plane at a time; the tail that does
//! not fill a whole vector goes through the scalar lane kernels.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::backend::{Active, Backend};
use crate::capability::Capability;
use crate::element::{Element, ElementKind};
use crate::error::{Error, Result};
use crate::interleave::{self, deinterleave_lanes, interleave_lanes};
use crate::memory::AlignedBuffer;
use crate::vector::Vector;

/// Bytes of one plane handled per vector step
pub const STEP_BYTES: usize = 64;

/// Summary of one conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackReport {
    /// Backend that ran the conversion
    pub capability: Capability,
    /// Element type of the data
    pub element: ElementKind,
    /// Number of planes
    pub ways: usize,
    /// Elements per plane
    pub elements_per_plane: usize,
    /// Elements handled by vector code
    pub vector_elements: usize,
    /// Elements handled by the scalar tail
    pub tail_elements: usize,
    /// Wall time in microseconds
    pub elapsed_us: u128,
}

fn check_ways(ways: usize) -> Result<()> {
    if !(2..=4).contains(&ways) {
        return Err(Error::invalid_input(format!(
            "interleaving needs 2, 3 or 4 planes, got {ways}"
        )));
    }
    Ok(())
}

/// Interleaves equally long planes into one buffer.
///
/// `N` is the number of lanes per vector step; it must be a whole number
/// of native registers for `T`.
pub fn interleave_planes<T: Element, const N: usize>(planes: &[&[T]]) -> Result<AlignedBuffer<T>> {
    let ways = planes.len();
    check_ways(ways)?;
    let len = planes[0].len();
    if let Some(bad) = planes.iter().find(|p| p.len() != len) {
        return Err(Error::length_mismatch(len, bad.len()));
    }

    let mut out = AlignedBuffer::<T>::zeroed(len * ways);
    let steps = len / N;
    {
        let mut view = out.view_mut::<Active>();
        for (step, mut chunk) in view.chunks_exact_mut(ways * N).enumerate() {
            let at = step * N;
            let v = |j: usize| Vector::<T, N, Active>::from_slice(&planes[j][at..]);
            match ways {
                2 => interleave::store_packed2(&mut chunk, v(0), v(1)),
                3 => interleave::store_packed3(&mut chunk, v(0), v(1), v(2)),
                _ => interleave::store_packed4(&mut chunk, v(0), v(1), v(2), v(3)),
            }
        }
    }

    let done = steps * N;
    let tails: Vec<&[T]> = planes.iter().map(|p| &p[done..]).collect();
    interleave_lanes(&tails, &mut out.as_mut_slice()[done * ways..]);
    Ok(out)
}

/// Splits an interleaved buffer into `ways` planes
pub fn deinterleave_planes<T: Element, const N: usize>(
    data: &[T],
    ways: usize,
) -> Result<Vec<Vec<T>>> {
    check_ways(ways)?;
    if data.len() % ways != 0 {
        return Err(Error::invalid_input(format!(
            "{} elements do not split into {ways} planes",
            data.len()
        )));
    }

    let len = data.len() / ways;
    let mut planes = vec![vec![T::default(); len]; ways];
    let aligned = AlignedBuffer::from_slice(data);
    let view = aligned.view::<Active>();

    for (step, chunk) in view.chunks_exact(ways * N).enumerate() {
        let at = step * N;
        match ways {
            2 => {
                let (a, b) = interleave::load_packed2::<T, N, Active>(chunk);
                a.write_to_slice(&mut planes[0][at..]);
                b.write_to_slice(&mut planes[1][at..]);
            }
            3 => {
                let (a, b, c) = interleave::load_packed3::<T, N, Active>(chunk);
                a.write_to_slice(&mut planes[0][at..]);
                b.write_to_slice(&mut planes[1][at..]);
                c.write_to_slice(&mut planes[2][at..]);
            }
            _ => {
                let (a, b, c, d) = interleave::load_packed4::<T, N, Active>(chunk);
                a.write_to_slice(&mut planes[0][at..]);
                b.write_to_slice(&mut planes[1][at..]);
                c.write_to_slice(&mut planes[2][at..]);
                d.write_to_slice(&mut planes[3][at..]);
            }
        }
    }

    let done = len / N * N;
    let mut tails: Vec<&mut [T]> = planes.iter_mut().map(|p| &mut p[done..]).collect();
    deinterleave_lanes(&data[done * ways..], &mut tails);
    Ok(planes)
}

/// Runs `$body` with `$t` bound to the Rust type of `$kind` and `$n` to the
/// lanes in one 64-byte step
macro_rules! with_element {
    ($kind:expr, |$t:ident, $n:ident| $body:block) => {
        match $kind {
            ElementKind::I8 => { type $t = i8; const $n: usize = STEP_BYTES; $body }
            ElementKind::U8 => { type $t = u8; const $n: usize = STEP_BYTES; $body }
            ElementKind::I16 => { type $t = i16; const $n: usize = STEP_BYTES / 2; $body }
            ElementKind::U16 => { type $t = u16; const $n: usize = STEP_BYTES / 2; $body }
            ElementKind::I32 => { type $t = i32; const $n: usize = STEP_BYTES / 4; $body }
            ElementKind::U32 => { type $t = u32; const $n: usize = STEP_BYTES / 4; $body }
            ElementKind::F32 => { type $t = f32; const $n: usize = STEP_BYTES / 4; $body }
            ElementKind::I64 => { type $t = i64; const $n: usize = STEP_BYTES / 8; $body }
            ElementKind::U64 => { type $t = u64; const $n: usize = STEP_BYTES / 8; $body }
            ElementKind::F64 => { type $t = f64; const $n: usize = STEP_BYTES / 8; $body }
        }
    };
}

/// Interleaves raw planar files of `element` values into `output`
#[instrument(skip(inputs), fields(planes = inputs.len()))]
pub fn pack_files(inputs: &[PathBuf], output: &Path, element: ElementKind) -> Result<PackReport> {
    check_ways(inputs.len())?;
    let start = Instant::now();

    let raw = inputs
        .iter()
        .map(|path| {
            debug!(path = %path.display(), "reading plane");
            fs::read(path)
        })
        .collect::<std::io::Result<Vec<_>>>()?;

    let (bytes, elements_per_plane, step) = with_element!(element, |E, LANES| {
        let planes = raw
            .iter()
            .map(|bytes| AlignedBuffer::<E>::from_bytes(bytes))
            .collect::<Result<Vec<_>>>()?;
        let slices: Vec<&[E]> = planes.iter().map(|p| p.as_slice()).collect();
        let packed = interleave_planes::<E, LANES>(&slices)?;
        (packed.as_bytes().to_vec(), planes[0].len(), LANES)
    });

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &bytes)?;

    let report = PackReport {
        capability: Capability::ACTIVE,
        element,
        ways: inputs.len(),
        elements_per_plane,
        vector_elements: elements_per_plane / step * step,
        tail_elements: elements_per_plane % step,
        elapsed_us: start.elapsed().as_micros(),
    };
    info!(
        output = %output.display(),
        bytes = bytes.len(),
        backend = %report.capability,
        "interleaved planes"
    );
    Ok(report)
}

/// Splits a raw interleaved file of `element` values into planar files
#[instrument(skip(outputs), fields(planes = outputs.len()))]
pub fn unpack_file(input: &Path, outputs: &[PathBuf], element: ElementKind) -> Result<PackReport> {
    let ways = outputs.len();
    check_ways(ways)?;
    let start = Instant::now();

    let raw = fs::read(input)?;
    debug!(bytes = raw.len(), "read interleaved input");

    let (planes, elements_per_plane, step) = with_element!(element, |E, LANES| {
        let data = AlignedBuffer::<E>::from_bytes(&raw)?;
        let planes = deinterleave_planes::<E, LANES>(data.as_slice(), ways)?;
        let len = planes[0].len();
        let bytes: Vec<Vec<u8>> = planes
            .iter()
            .map(|p| bytemuck::cast_slice::<E, u8>(p).to_vec())
            .collect();
        (bytes, len, LANES)
    });

    for (path, bytes) in outputs.iter().zip(&planes) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
    }

    let report = PackReport {
        capability: <Active as Backend>::CAPABILITY,
        element,
        ways,
        elements_per_plane,
        vector_elements: elements_per_plane / step * step,
        tail_elements: elements_per_plane % step,
        elapsed_us: start.elapsed().as_micros(),
    };
    info!(input = %input.display(), planes = ways, "deinterleaved file");
    Ok(report)
}
