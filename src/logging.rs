//! Tracing subscriber setup for the command-line tool

use anyhow::Result;
use std::io::{self, IsTerminal};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter directive for a verbosity count, starting from `base_level`
pub fn filter_directive(verbosity: u8, base_level: &str) -> String {
    match verbosity {
        0 => format!("simdweave={base_level},warn"),
        1 => "simdweave=debug,info".to_string(),
        2 => "simdweave=trace,debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `verbosity`.
pub fn init_logging(verbosity: u8, base_level: &str, json_output: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(verbosity, base_level)))?;

    if json_output {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(env_filter);

        tracing_subscriber::registry().with(json_layer).try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
            .with_filter(env_filter);

        tracing_subscriber::registry().with(fmt_layer).try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(0, "info"), "simdweave=info,warn");
        assert_eq!(filter_directive(0, "error"), "simdweave=error,warn");
        assert_eq!(filter_directive(2, "info"), "simdweave=trace,debug");
        assert_eq!(filter_directive(9, "info"), "trace");
        for v in 0..4 {
            assert!(EnvFilter::try_new(filter_directive(v, "debug")).is_ok());
        }
    }
}
