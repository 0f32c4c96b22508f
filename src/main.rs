use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use simdweave::{logging, planar, selftest, Capability, Config, ElementKind, Op, Support};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "simdweave")]
#[command(about = "Portable SIMD vectors - backend info, self-test and planar file interleaving", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SIMDWEAVE_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs and reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the compiled backend and its support matrix
    Info,

    /// Compare the compiled backend against the portable reference
    Selftest {
        /// Random rounds per element type
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Interleave 2 to 4 raw planar files into one file
    Pack {
        /// Element type stored in the files
        #[arg(short, long)]
        element: Option<ElementKind>,

        /// Interleaved output file
        #[arg(short, long)]
        output: PathBuf,

        /// Planar input files
        #[arg(required = true, num_args = 2..=4)]
        inputs: Vec<PathBuf>,
    },

    /// Split a raw interleaved file into 2 to 4 planar files
    Unpack {
        /// Element type stored in the files
        #[arg(short, long)]
        element: Option<ElementKind>,

        /// Interleaved input file
        #[arg(short, long)]
        input: PathBuf,

        /// Planar output files
        #[arg(required = true, num_args = 2..=4)]
        outputs: Vec<PathBuf>,
    },

    /// Validate a configuration file, or write the defaults to it
    Config {
        /// Configuration file to validate
        #[arg(short, long)]
        file: PathBuf,

        /// Write the default configuration instead of validating
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    logging::init_logging(
        cli.verbose,
        &config.system.log_level,
        cli.json || config.system.json_logs,
    )?;

    match cli.command {
        Commands::Info => show_system_info(cli.json)?,

        Commands::Selftest { iterations, seed } => {
            let mut settings = config.selftest.clone();
            if let Some(iterations) = iterations {
                settings.iterations = iterations;
            }
            if let Some(seed) = seed {
                settings.seed = seed;
            }
            run_selftest(&settings, cli.json)?;
        }

        Commands::Pack {
            element,
            output,
            inputs,
        } => {
            let element = element.unwrap_or(config.layout.element);
            let report = planar::pack_files(&inputs, &output, element)
                .context("Failed to interleave planar files")?;
            print_report(&report, cli.json)?;
        }

        Commands::Unpack {
            element,
            input,
            outputs,
        } => {
            let element = element.unwrap_or(config.layout.element);
            if outputs.len() != config.layout.ways {
                warn!(
                    requested = outputs.len(),
                    configured = config.layout.ways,
                    "output count differs from layout.ways"
                );
            }
            let report = planar::unpack_file(&input, &outputs, element)
                .context("Failed to deinterleave file")?;
            print_report(&report, cli.json)?;
        }

        Commands::Config { file, init } => {
            if init {
                Config::default()
                    .to_file(&file)
                    .context("Failed to write configuration file")?;
                info!("Default configuration written to {}", file.display());
            } else {
                validate_config(file)?;
            }
        }
    }

    Ok(())
}

fn run_selftest(settings: &simdweave::config::SelfTestConfig, json: bool) -> Result<()> {
    if settings.iterations == 0 {
        bail!("self-test needs at least one iteration");
    }

    info!(
        backend = %Capability::ACTIVE,
        iterations = settings.iterations,
        seed = settings.seed,
        "Running backend self-test"
    );
    let report = selftest::run(settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} backend: {} checks, {} failures",
            report.capability,
            report.checks,
            report.failures.len()
        );
        for failure in &report.failures {
            println!("  {} on {}: {}", failure.operation, failure.element, failure.detail);
        }
    }

    if !report.passed() {
        bail!("{} mismatches against the reference backend", report.failures.len());
    }
    Ok(())
}

fn print_report(report: &planar::PackReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!(
            "{} x {} {} elements on {} ({} vector, {} tail) in {} us",
            report.ways,
            report.elements_per_plane,
            report.element,
            report.capability,
            report.vector_elements,
            report.tail_elements,
            report.elapsed_us
        );
    }
    Ok(())
}

fn validate_config(config_path: PathBuf) -> Result<()> {
    info!("Validating configuration file: {}", config_path.display());

    let config = Config::from_file(&config_path).context("Failed to load configuration file")?;

    // from_file already ran validate()
    info!("Configuration is valid");
    info!("Configuration summary:");
    info!("  - Layout: {} ways of {}", config.layout.ways, config.layout.element);
    info!(
        "  - Self-test: {} iterations, seed {:#x}",
        config.selftest.iterations, config.selftest.seed
    );
    info!("  - Log level: {}", config.system.log_level);

    Ok(())
}

fn show_system_info(json: bool) -> Result<()> {
    let active = Capability::ACTIVE;

    if json {
        let matrix: Vec<_> = Op::ALL
            .iter()
            .map(|&op| {
                let support: BTreeMap<&str, Support> = ElementKind::ALL
                    .iter()
                    .map(|&kind| (kind.name(), active.support(op, kind)))
                    .collect();
                serde_json::json!({ "op": op, "support": support })
            })
            .collect();
        let info = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "backend": active,
            "width_bytes": active.width_bytes(),
            "host_supports_backend": active.is_available_on_host(),
            "matrix": matrix,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("simdweave - portable SIMD vectors");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "Built with Rust: {}",
        option_env!("CARGO_PKG_RUST_VERSION").unwrap_or("unknown")
    );
    println!();
    println!("Backend: {} ({}-byte registers)", active, active.width_bytes());
    for capability in Capability::ALL {
        let mark = if capability == active { "*" } else { " " };
        let host = if capability.is_available_on_host() {
            "available on this host"
        } else {
            "not available on this host"
        };
        println!("  {mark} {:<5} {host}", capability.name());
    }
    if !active.is_available_on_host() {
        warn!(backend = %active, "compiled backend is not supported by this host");
    }
    println!();

    print!("{:<12}", "operation");
    for kind in ElementKind::ALL {
        print!("{:>5}", kind.name());
    }
    println!();
    for op in Op::ALL {
        print!("{:<12}", op.name());
        for kind in ElementKind::ALL {
            print!("{:>5}", active.support(op, kind).code());
        }
        println!();
    }
    println!();
    println!("  N native  C composite  E emulated  - unsupported");
    println!();
    println!("Usage:");
    println!("  simdweave selftest -i 1024          # Check the backend against the reference");
    println!("  simdweave pack -e f32 -o rgb.raw r.raw g.raw b.raw");
    println!("  simdweave unpack -e f32 -i rgb.raw r.raw g.raw b.raw");
    println!("  simdweave config -f config.json     # Validate configuration");
    println!("  simdweave info                      # Show this information");

    Ok(())
}
