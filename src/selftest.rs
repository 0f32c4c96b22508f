//! Backend self-test
//!
//! Runs every operation family on random vectors with the active backend
//! and with the lane-by-lane [`Null`] backend, and reports lanes where the
//! two disagree. Floats compare by value with all NaNs equal.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::backend::null::Null;
use crate::backend::Active;
use crate::capability::Capability;
use crate::config::SelfTestConfig;
use crate::element::{Element, ElementKind, Float};
use crate::interleave::{
    load_packed2, load_packed3, load_packed4, store_packed2, store_packed3, store_packed4,
};
use crate::memory::AlignedBuffer;
use crate::vector::Vector;

/// One lane where the active backend disagreed with the reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    /// Operation that disagreed
    pub operation: &'static str,
    /// Element type it ran on
    pub element: ElementKind,
    /// First differing lane and both values
    pub detail: String,
}

/// Outcome of a self-test run
#[derive(Debug, Clone, Serialize)]
pub struct SelfTestReport {
    /// Backend under test
    pub capability: Capability,
    /// Random rounds per element type
    pub iterations: usize,
    /// Comparisons made
    pub checks: usize,
    /// Comparisons that failed
    pub failures: Vec<Mismatch>,
}

impl SelfTestReport {
    /// Whether every comparison matched
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

struct Checker {
    report: SelfTestReport,
}

impl Checker {
    fn lanes<T: Element>(&mut self, operation: &'static str, got: &[T], want: &[T]) {
        self.report.checks += 1;
        let Some(lane) = got.iter().zip(want).position(|(g, w)| !g.same_value(*w)) else {
            return;
        };
        let detail = format!("lane {lane}: got {:?}, expected {:?}", got[lane], want[lane]);
        warn!(operation, element = %T::KIND, %detail, "backend mismatch");
        self.report.failures.push(Mismatch {
            operation,
            element: T::KIND,
            detail,
        });
    }

    fn vector<T: Element, const N: usize>(
        &mut self,
        operation: &'static str,
        got: Vector<T, N, Active>,
        want: Vector<T, N, Null>,
    ) {
        self.lanes(operation, got.as_slice(), want.as_slice());
    }
}

fn random_lane<T: Element>(rng: &mut StdRng) -> T {
    match T::KIND {
        ElementKind::F32 => T::from_lane_bits((rng.random_range(-4096i32..4096) as f32 / 8.0).to_bits() as u64),
        ElementKind::F64 => T::from_lane_bits((rng.random_range(-4096i32..4096) as f64 / 8.0).to_bits()),
        _ => T::from_lane_bits(rng.random()),
    }
}

fn random_vector<T: Element, const N: usize>(rng: &mut StdRng) -> Vector<T, N, Active> {
    Vector::from_array(std::array::from_fn(|_| random_lane(rng)))
}

fn check_common<T: Element, const N: usize>(rng: &mut StdRng, checker: &mut Checker) {
    let a = random_vector::<T, N>(rng);
    // share a few lanes so equality compares see both outcomes
    let b = random_vector::<T, N>(rng).insert::<0>(a.extract::<0>()).insert::<3>(a.extract::<3>());
    let c = random_vector::<T, N>(rng);
    let d = random_vector::<T, N>(rng);
    let (na, nb, nc, nd) = (
        a.to_backend::<Null>(),
        b.to_backend::<Null>(),
        c.to_backend::<Null>(),
        d.to_backend::<Null>(),
    );

    checker.vector("add", a + b, na + nb);
    checker.vector("sub", a - b, na - nb);
    checker.vector("bit_and", a & b, na & nb);
    checker.vector("bit_or", a | b, na | nb);
    checker.vector("bit_xor", a ^ b, na ^ nb);
    checker.vector("bit_andnot", a.and_not(b), na.and_not(nb));
    checker.vector("bit_not", !a, !na);
    checker.vector("cmp_eq", a.cmp_eq(b).to_vector(), na.cmp_eq(nb).to_vector());
    checker.vector("cmp_lt", a.cmp_lt(b).to_vector(), na.cmp_lt(nb).to_vector());
    checker.vector("cmp_gt", a.cmp_gt(b).to_vector(), na.cmp_gt(nb).to_vector());
    checker.vector("select", a.cmp_lt(b).select(c, d), na.cmp_lt(nb).select(nc, nd));
    checker.vector("move_r", a.move_r::<1>(), na.move_r::<1>());
    checker.vector("move_r", a.move_r::<2>(), na.move_r::<2>());

    let mut got = AlignedBuffer::<T>::zeroed(4 * N);
    let mut want = AlignedBuffer::<T>::zeroed(4 * N);

    store_packed2(&mut got.view_mut::<Active>(), a, b);
    store_packed2(&mut want.view_mut::<Null>(), na, nb);
    checker.lanes("store_packed2", &got.as_slice()[..2 * N], &want.as_slice()[..2 * N]);
    let (la, lb) = load_packed2::<T, N, Active>(want.view());
    checker.vector("load_packed2", la, na);
    checker.vector("load_packed2", lb, nb);

    store_packed3(&mut got.view_mut::<Active>(), a, b, c);
    store_packed3(&mut want.view_mut::<Null>(), na, nb, nc);
    checker.lanes("store_packed3", &got.as_slice()[..3 * N], &want.as_slice()[..3 * N]);
    let (la, lb, lc) = load_packed3::<T, N, Active>(want.view());
    checker.vector("load_packed3", la, na);
    checker.vector("load_packed3", lb, nb);
    checker.vector("load_packed3", lc, nc);

    store_packed4(&mut got.view_mut::<Active>(), a, b, c, d);
    store_packed4(&mut want.view_mut::<Null>(), na, nb, nc, nd);
    checker.lanes("store_packed4", got.as_slice(), want.as_slice());
    let (la, lb, lc, ld) = load_packed4::<T, N, Active>(want.view());
    checker.vector("load_packed4", la, na);
    checker.vector("load_packed4", lb, nb);
    checker.vector("load_packed4", lc, nc);
    checker.vector("load_packed4", ld, nd);
}

/// 16- and 32-bit lanes
fn check_permute4<T: Element, const N: usize>(rng: &mut StdRng, checker: &mut Checker) {
    let a = random_vector::<T, N>(rng);
    let na = a.to_backend::<Null>();
    checker.vector("permute4", a.permute4::<3, 2, 1, 0>(), na.permute4::<3, 2, 1, 0>());
    checker.vector("permute4", a.permute4::<1, 1, 3, 0>(), na.permute4::<1, 1, 3, 0>());
    checker.vector("permute2", a.permute2::<1, 0>(), na.permute2::<1, 0>());
}

/// 64-bit lanes
fn check_permute2<T: Element, const N: usize>(rng: &mut StdRng, checker: &mut Checker) {
    let a = random_vector::<T, N>(rng);
    let na = a.to_backend::<Null>();
    checker.vector("permute2", a.permute2::<1, 0>(), na.permute2::<1, 0>());
    checker.vector("permute2", a.permute2::<1, 1>(), na.permute2::<1, 1>());
}

fn check_nan<T: Float, const N: usize>(rng: &mut StdRng, checker: &mut Checker) {
    let nan = T::from_lane_bits(match T::KIND {
        ElementKind::F32 => 0x7fc0_0000,
        _ => 0x7ff8_0000_0000_0000,
    });
    let a = random_vector::<T, N>(rng).insert::<1>(nan);
    let b = random_vector::<T, N>(rng).insert::<2>(nan);
    let (na, nb) = (a.to_backend::<Null>(), b.to_backend::<Null>());

    checker.vector("isnan", a.isnan().to_vector(), na.isnan().to_vector());
    checker.vector("isnan2", a.isnan2(b).to_vector(), na.isnan2(nb).to_vector());
    checker.vector("cmp_eq", a.cmp_eq(b).to_vector(), na.cmp_eq(nb).to_vector());
    checker.vector("cmp_lt", a.cmp_lt(b).to_vector(), na.cmp_lt(nb).to_vector());
}

/// Compares the active backend against the reference backend.
#[instrument(skip(config), fields(backend = %Capability::ACTIVE))]
pub fn run(config: &SelfTestConfig) -> SelfTestReport {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut checker = Checker {
        report: SelfTestReport {
            capability: Capability::ACTIVE,
            iterations: config.iterations,
            checks: 0,
            failures: Vec::new(),
        },
    };

    // 64 bytes per vector: a whole number of registers on every backend
    for round in 0..config.iterations {
        let rng = &mut rng;
        let c = &mut checker;
        check_common::<i8, 64>(rng, c);
        check_common::<u8, 64>(rng, c);
        check_common::<i16, 32>(rng, c);
        check_common::<u16, 32>(rng, c);
        check_common::<i32, 16>(rng, c);
        check_common::<u32, 16>(rng, c);
        check_common::<f32, 16>(rng, c);
        check_common::<i64, 8>(rng, c);
        check_common::<u64, 8>(rng, c);
        check_common::<f64, 8>(rng, c);

        check_permute4::<i16, 32>(rng, c);
        check_permute4::<u16, 32>(rng, c);
        check_permute4::<i32, 16>(rng, c);
        check_permute4::<u32, 16>(rng, c);
        check_permute4::<f32, 16>(rng, c);
        check_permute2::<i64, 8>(rng, c);
        check_permute2::<u64, 8>(rng, c);
        check_permute2::<f64, 8>(rng, c);

        check_nan::<f32, 16>(rng, c);
        check_nan::<f64, 8>(rng, c);

        if round % 64 == 63 {
            debug!(round = round + 1, checks = c.report.checks, "self-test progress");
        }
    }

    let report = checker.report;
    info!(
        checks = report.checks,
        failures = report.failures.len(),
        "self-test finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_backend_matches_reference() {
        let report = run(&SelfTestConfig {
            iterations: 16,
            seed: 7,
        });
        assert!(report.passed(), "{:#?}", report.failures);
        assert!(report.checks > 16 * 100);
    }

    #[test]
    fn test_checker_reports_first_bad_lane() {
        let mut checker = Checker {
            report: SelfTestReport {
                capability: Capability::Null,
                iterations: 1,
                checks: 0,
                failures: Vec::new(),
            },
        };
        checker.lanes("add", &[1u32, 2, 3], &[1, 5, 4]);
        checker.lanes("isnan", &[f32::NAN], &[-f32::NAN]);
        assert_eq!(checker.report.checks, 2);
        assert_eq!(checker.report.failures.len(), 1);
        assert_eq!(checker.report.failures[0].detail, "lane 1: got 2, expected 5");
    }
}
