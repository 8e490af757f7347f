//! Topology generation orchestrator.
//!
//! Coordinates a full run: loading points, sizing and selecting the
//! concentrator set, assigning relays, checking the result and writing the
//! topology document.

use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result, WrapErr};
use log::{debug, info, warn};

use crate::config::{ClusteringConfig, OverflowPolicy};
use crate::report::{read_topology, render_stats, write_topology};
use crate::source::load_points;
use crate::topology::{
    assign_relays, estimate_concentrator_count, select_concentrators, AssignmentReport, ClusteringError,
    Topology, TopologyStats,
};
use crate::utils::validation::{validate_against_points, validate_topology};

/// Inputs of a single run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: ClusteringConfig,
    /// Recompute even if `output` already exists
    pub force: bool,
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub topology: Topology,
    pub stats: TopologyStats,
    pub report: AssignmentReport,
    /// Input rows that were skipped while loading
    pub skipped_rows: usize,
    /// The topology came from an existing output document
    pub loaded_existing: bool,
}

/// Run the whole pipeline described by `options`
pub fn run(options: &RunOptions) -> Result<RunSummary> {
    if options.output.exists() && !options.force {
        return load_existing(options);
    }

    let loaded = load_points(&options.input)?;
    let points = loaded.points;
    let config = &options.config;

    if points.len() < config.minimum_viable_point_count {
        return Err(ClusteringError::TooFewPoints {
            found: points.len(),
            minimum: config.minimum_viable_point_count,
        }
        .into());
    }

    let count = match config.concentrator_count {
        Some(count) => {
            info!("Using configured concentrator count: {}", count);
            count
        }
        None => {
            let count = estimate_concentrator_count(points.len(), config)?;
            info!("Estimated concentrator count: {}", count);
            count
        }
    };

    let selected = select_concentrators(&points, count)?;

    let (topology, report) = assign_relays(&points, &selected, config)?;

    let capacity = match config.overflow_policy {
        OverflowPolicy::Exceed => None,
        _ => Some(config.max_capacity),
    };
    validate_topology(&topology, capacity).map_err(|e| eyre!("Generated topology is invalid: {}", e))?;
    validate_against_points(&topology, &points).map_err(|e| eyre!("Generated topology is invalid: {}", e))?;

    write_topology(&topology, &options.output)
        .wrap_err_with(|| format!("Failed to emit topology for {}", options.input.display()))?;

    let stats = TopologyStats::from_topology(&topology, points.len());
    log_stats(&stats, config);

    Ok(RunSummary {
        topology,
        stats,
        report,
        skipped_rows: loaded.skipped.len(),
        loaded_existing: false,
    })
}

fn load_existing(options: &RunOptions) -> Result<RunSummary> {
    info!(
        "Output {} already exists, loading it (use --force to recompute)",
        options.output.display()
    );

    let document = read_topology(&options.output)?;
    let topology = document.topology;
    if let Some(generated_at) = document.generated_at {
        debug!("Existing topology generated at {}", generated_at);
    }

    let total = topology.concentrator_count() + topology.relay_count();
    let stats = TopologyStats::from_topology(&topology, total);
    log_stats(&stats, &options.config);

    Ok(RunSummary {
        topology,
        stats,
        report: AssignmentReport::default(),
        skipped_rows: 0,
        loaded_existing: true,
    })
}

fn log_stats(stats: &TopologyStats, config: &ClusteringConfig) {
    for line in render_stats(stats).lines() {
        info!("{}", line);
    }

    for (id, relays) in stats.outside_band(config.min_load, config.max_load) {
        warn!(
            "Concentrator {} has {} relays, outside the {}-{} load band",
            id, relays, config.min_load, config.max_load
        );
    }
}
