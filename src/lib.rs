//! # LightMesh - Concentrator/relay topology planner for street-lighting networks
//!
//! This library turns an inventory of geolocated lighting points into a
//! two-tier communication topology: a small set of well-spread
//! *concentrators*, each holding a bounded list of nearby *relays*.
//!
//! ## Overview
//!
//! A run goes through four steps:
//!
//! 1. **Estimate** how many concentrators the point count needs, from a
//!    target relay load per concentrator
//! 2. **Select** concentrators with greedy farthest-point sampling, starting
//!    from the point nearest the centroid
//! 3. **Assign** every other point to its nearest concentrator
//! 4. **Rebalance** so no concentrator holds more than `max_capacity` relays
//!
//! All distances are great-circle (haversine) distances in kilometres.
//!
//! ## Architecture
//!
//! - `geo`: haversine distance and centroid
//! - `topology`: point/cluster types, estimator, selector, assigner, statistics
//! - `config`: clustering parameters and overflow policy
//! - `config_loader`: YAML loading and CLI overrides
//! - `source`: semicolon-delimited point inventory loader
//! - `report`: topology JSON document and text summaries
//! - `utils`: structural validation of finished topologies
//! - `orchestrator`: end-to-end pipeline
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use lightmesh::{config_loader, orchestrator};
//!
//! let config = config_loader::load_config_or_default(None)?;
//! let summary = orchestrator::run(&orchestrator::RunOptions {
//!     input: PathBuf::from("points.csv"),
//!     output: PathBuf::from("topology.json"),
//!     config,
//!     force: false,
//! })?;
//! println!("{} concentrators", summary.stats.concentrators);
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```
//!
//! ## Configuration Format
//!
//! Every field is optional:
//!
//! ```yaml
//! min_load: 450
//! max_load: 500
//! target_load: 475
//! reserve: 20
//! max_capacity: 500
//! concentrator_count: 12      # skip estimation
//! minimum_viable_point_count: 10
//! overflow_policy: drop       # drop | fail | exceed
//! ```
//!
//! ## Error Handling
//!
//! The clustering core returns typed errors (`ClusteringError`,
//! `ValidationError`, `SourceError`); file handling and orchestration use
//! `color_eyre` reports with context.

pub mod config;
pub mod config_loader;
pub mod geo;
pub mod orchestrator;
pub mod report;
pub mod source;
pub mod topology;
pub mod utils;
