//! Integration tests for simdweave
//!
//! These check the compiled backend against the portable reference,
//! the shuffle tables, interleaved memory layouts, file conversion and
//! the command-line tool.

mod backend_tests;
mod cli_tests;
mod decomposition_tests;
mod fixtures;
mod interleave_tests;
mod planar_tests;
mod shuffle_tests;

/// Common test initialization
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("simdweave=debug")
        .try_init();
}
