//! simdweave benchmarking suite
//!
//! Each group times the compiled backend against the scalar lane kernels
//! that the portable fallback is built from.

#![warn(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Elements per plane
    pub sizes: Vec<usize>,
    /// Interleave widths
    pub ways: Vec<usize>,
    /// Measurement time per benchmark
    pub measurement_time: Duration,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: vec![1024, 16384, 262144],
            ways: vec![2, 3, 4],
            measurement_time: Duration::from_secs(3),
        }
    }
}

/// Criterion preset used by the bench targets
pub fn criterion(config: &BenchConfig) -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(config.measurement_time)
        .sample_size(50)
}

/// Element-wise operation benchmarks
pub mod ops_benchmarks {
    use super::*;
    use simdweave::{AlignedBuffer, Float32};

    const LANES: usize = 16;

    /// Buffer-wide `a + b` through vectors and through a scalar loop
    pub fn bench_add(c: &mut Criterion, config: &BenchConfig) {
        let mut group = c.benchmark_group("add_f32");

        for &size in &config.sizes {
            let a = AlignedBuffer::from_slice(&(0..size).map(|i| i as f32).collect::<Vec<_>>());
            let b = AlignedBuffer::from_slice(&vec![0.5f32; size]);
            let mut out = AlignedBuffer::<f32>::zeroed(size);

            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::new("vector", size), &size, |bench, _| {
                bench.iter(|| {
                    let mut dst = out.view_mut();
                    for ((x, y), mut o) in a
                        .view()
                        .chunks_exact(LANES)
                        .zip(b.view().chunks_exact(LANES))
                        .zip(dst.chunks_exact_mut(LANES))
                    {
                        (Float32::<LANES>::load(x) + Float32::<LANES>::load(y)).store(&mut o);
                    }
                    black_box(&mut out);
                });
            });
            group.bench_with_input(BenchmarkId::new("scalar", size), &size, |bench, _| {
                let mut plain = vec![0.0f32; size];
                bench.iter(|| {
                    for ((o, x), y) in plain.iter_mut().zip(a.as_slice()).zip(b.as_slice()) {
                        *o = x + y;
                    }
                    black_box(&mut plain);
                });
            });
        }

        group.finish();
    }

    /// Buffer-wide `select(a < b, a, b)`
    pub fn bench_select_min(c: &mut Criterion, config: &BenchConfig) {
        let mut group = c.benchmark_group("select_min_f32");

        for &size in &config.sizes {
            let a = AlignedBuffer::from_slice(&(0..size).map(|i| (i % 97) as f32).collect::<Vec<_>>());
            let b = AlignedBuffer::from_slice(&(0..size).map(|i| (i % 89) as f32).collect::<Vec<_>>());
            let mut out = AlignedBuffer::<f32>::zeroed(size);

            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::new("vector", size), &size, |bench, _| {
                bench.iter(|| {
                    let mut dst = out.view_mut();
                    for ((x, y), mut o) in a
                        .view()
                        .chunks_exact(LANES)
                        .zip(b.view().chunks_exact(LANES))
                        .zip(dst.chunks_exact_mut(LANES))
                    {
                        let (x, y) = (Float32::<LANES>::load(x), Float32::<LANES>::load(y));
                        simdweave::select(x.cmp_lt(y), x, y).store(&mut o);
                    }
                    black_box(&mut out);
                });
            });
        }

        group.finish();
    }
}

/// Interleaving benchmarks
pub mod interleave_benchmarks {
    use super::*;
    use simdweave::interleave::{deinterleave_lanes, interleave_lanes};
    use simdweave::planar::{deinterleave_planes, interleave_planes};

    fn planes(ways: usize, size: usize) -> Vec<Vec<u16>> {
        (0..ways)
            .map(|p| (0..size).map(|i| (p * 1000 + i) as u16).collect())
            .collect()
    }

    /// Planar to interleaved, vector path and scalar kernel
    pub fn bench_interleave(c: &mut Criterion, config: &BenchConfig) {
        let mut group = c.benchmark_group("interleave_u16");

        for &ways in &config.ways {
            for &size in &config.sizes {
                let data = planes(ways, size);
                let slices: Vec<&[u16]> = data.iter().map(|p| &p[..]).collect();
                let id = format!("{ways}x{size}");

                group.throughput(Throughput::Elements((ways * size) as u64));
                group.bench_with_input(BenchmarkId::new("vector", &id), &slices, |bench, slices| {
                    bench.iter(|| black_box(interleave_planes::<u16, 32>(slices)));
                });
                group.bench_with_input(BenchmarkId::new("scalar", &id), &slices, |bench, slices| {
                    let mut out = vec![0u16; ways * size];
                    bench.iter(|| {
                        interleave_lanes(slices, &mut out);
                        black_box(&mut out);
                    });
                });
            }
        }

        group.finish();
    }

    /// Interleaved to planar, vector path and scalar kernel
    pub fn bench_deinterleave(c: &mut Criterion, config: &BenchConfig) {
        let mut group = c.benchmark_group("deinterleave_u16");

        for &ways in &config.ways {
            for &size in &config.sizes {
                let data = planes(ways, size);
                let slices: Vec<&[u16]> = data.iter().map(|p| &p[..]).collect();
                let mut packed = vec![0u16; ways * size];
                interleave_lanes(&slices, &mut packed);
                let id = format!("{ways}x{size}");

                group.throughput(Throughput::Elements((ways * size) as u64));
                group.bench_with_input(BenchmarkId::new("vector", &id), &packed, |bench, packed| {
                    bench.iter(|| black_box(deinterleave_planes::<u16, 32>(packed, ways)));
                });
                group.bench_with_input(BenchmarkId::new("scalar", &id), &packed, |bench, packed| {
                    let mut out = planes(ways, size);
                    bench.iter(|| {
                        let mut views: Vec<&mut [u16]> = out.iter_mut().map(|p| &mut p[..]).collect();
                        deinterleave_lanes(packed, &mut views);
                        black_box(&mut views);
                    });
                });
            }
        }

        group.finish();
    }
}

/// Shuffle benchmarks
pub mod shuffle_benchmarks {
    use super::*;
    use simdweave::{Uint32, Uint8};

    /// Chains of `move_r` and `permute4` on one vector
    pub fn bench_shuffles(c: &mut Criterion, _config: &BenchConfig) {
        let mut group = c.benchmark_group("shuffle");

        let bytes = Uint8::<64>::from_array(std::array::from_fn(|i| i as u8));
        group.bench_function("move_r_u8", |bench| {
            bench.iter(|| black_box(black_box(bytes).move_r::<3>().move_r::<5>()));
        });

        let words = Uint32::<16>::from_array(std::array::from_fn(|i| i as u32));
        group.bench_function("permute4_u32", |bench| {
            bench.iter(|| black_box(black_box(words).permute4::<3, 2, 1, 0>().permute4::<1, 1, 0, 2>()));
        });

        group.finish();
    }
}

/// Run all benchmarks with the given configuration
pub fn run_all_benchmarks(c: &mut Criterion, config: &BenchConfig) {
    ops_benchmarks::bench_add(c, config);
    ops_benchmarks::bench_select_min(c, config);

    interleave_benchmarks::bench_interleave(c, config);
    interleave_benchmarks::bench_deinterleave(c, config);

    shuffle_benchmarks::bench_shuffles(c, config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_config_default() {
        let config = BenchConfig::default();
        assert!(!config.sizes.is_empty());
        assert!(config.ways.iter().all(|w| (2..=4).contains(w)));
    }
}
