//! handel-vmtest binary
//!
//! Runs a file or directory of VM-test JSON fixtures and exits non-zero if
//! any of them fail.

use anyhow::{bail, Context, Result};
use clap::Parser;
use handel_evm::ProtocolSpec;
use handel_vmtests::TestRunner;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// VM-test fixture runner
#[derive(Parser, Debug)]
#[command(name = "handel-vmtest")]
#[command(about = "Run VM-test JSON fixtures against the Handel interpreter")]
#[command(version)]
struct Cli {
    /// Fixture file or directory
    path: PathBuf,

    /// Fork rules (frontier, homestead, tangerine-whistle)
    #[arg(long, default_value = "frontier")]
    fork: String,

    /// JSON file with explicit protocol flags, overrides --fork
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Report every test
    #[arg(short, long)]
    verbose: bool,
}

fn load_spec(cli: &Cli) -> Result<ProtocolSpec> {
    match &cli.spec {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(ProtocolSpec::by_name(&cli.fork)?),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let spec = load_spec(&cli)?;
    tracing::info!(?spec, path = %cli.path.display(), "running fixtures");

    let runner = TestRunner::new(spec, cli.verbose);
    let stats = runner
        .run_path(&cli.path)
        .with_context(|| format!("running fixtures in {}", cli.path.display()))?;
    stats.print_summary();

    if stats.failed > 0 {
        bail!("{} of {} tests failed", stats.failed, stats.total);
    }
    Ok(())
}
