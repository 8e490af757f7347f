use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::path::PathBuf;

use lightmesh::config::OverflowPolicy;
use lightmesh::config_loader::{self, CliOverrides};
use lightmesh::orchestrator::{self, RunOptions};
use lightmesh::report::render_concentrators;

/// Concentrator/relay topology generator for street-lighting networks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Semicolon-delimited point inventory (CSV with header row)
    #[arg(short, long)]
    input: PathBuf,

    /// Output path for the topology JSON document
    #[arg(short, long, default_value = "topology.json")]
    output: PathBuf,

    /// Optional clustering configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use exactly this many concentrators instead of estimating
    #[arg(short = 'n', long)]
    concentrators: Option<usize>,

    /// Maximum relays per concentrator
    #[arg(long)]
    max_capacity: Option<usize>,

    /// What to do with relays no concentrator has room for
    #[arg(long, value_enum)]
    overflow_policy: Option<OverflowPolicy>,

    /// Recompute even if the output already exists
    #[arg(short, long)]
    force: bool,

    /// Worker threads for the parallel phases (0 = one per core)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            concentrators: self.concentrators,
            max_capacity: self.max_capacity,
            overflow_policy: self.overflow_policy,
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    info!("Starting lightmesh v{}", env!("CARGO_PKG_VERSION"));
    info!("Input: {:?}", args.input);
    info!("Output: {:?}", args.output);

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .wrap_err("Failed to configure worker threads")?;
        info!("Using {} worker threads", args.threads);
    }

    let mut config = config_loader::load_config_or_default(args.config.as_deref())?;
    config_loader::apply_overrides(&mut config, &args.overrides())?;

    let options = RunOptions {
        input: args.input.clone(),
        output: args.output.clone(),
        config,
        force: args.force,
    };

    let summary = orchestrator::run(&options)?;

    if summary.skipped_rows > 0 {
        warn!("{} input rows were skipped", summary.skipped_rows);
    }
    if !summary.report.dropped.is_empty() {
        warn!(
            "{} relays left without a concentrator: {:?}",
            summary.report.dropped.len(),
            summary.report.dropped
        );
    }

    info!("Concentrators:");
    for line in render_concentrators(&summary.topology).lines() {
        info!("{}", line);
    }

    info!("Done: {}", args.output.display());
    Ok(())
}
