//! Topology document output and human-readable summaries.
//!
//! The JSON document is the hand-off to downstream consumers:
//!
//! ```json
//! {
//!   "concentrators": [
//!     { "id": 1, "point": { ... }, "relays": [ { ... } ] }
//!   ],
//!   "generatedAt": "2026-01-01T00:00:00Z"
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::topology::{Topology, TopologyStats};

/// Serialized topology plus generation metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyDocument {
    #[serde(flatten)]
    pub topology: Topology,
    #[serde(rename = "generatedAt", default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl TopologyDocument {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            generated_at: Some(Utc::now()),
        }
    }
}

/// Borrowed view of a [`TopologyDocument`] for writing
#[derive(Serialize)]
struct TopologyDocumentRef<'a> {
    #[serde(flatten)]
    topology: &'a Topology,
    #[serde(rename = "generatedAt")]
    generated_at: DateTime<Utc>,
}

/// Write a topology document as pretty-printed JSON
pub fn write_topology(topology: &Topology, output_path: &Path) -> Result<()> {
    let document = TopologyDocumentRef {
        topology,
        generated_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&document).context("Failed to serialize topology to JSON")?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write topology to {}", output_path.display()))?;

    log::info!("Topology written to {}", output_path.display());
    Ok(())
}

/// Read a previously written topology document
pub fn read_topology(path: &Path) -> Result<TopologyDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read topology from {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse topology in {}", path.display()))
}

/// Human-readable statistics block
pub fn render_stats(stats: &TopologyStats) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("=".repeat(60));
    lines.push("                 CONCENTRATOR TOPOLOGY".to_string());
    lines.push("=".repeat(60));
    lines.push(String::new());

    lines.push(format!("Points:        {}", stats.total_points));
    lines.push(format!("Concentrators: {}", stats.concentrators));
    lines.push(format!("Relays:        {}", stats.relays));
    lines.push(format!("Unassigned:    {}", stats.unassigned));
    lines.push(format!(
        "Relays per concentrator: min {}, max {}, mean {:.1}",
        stats.min_load, stats.max_load, stats.mean_load
    ));
    lines.push(String::new());

    lines.push("Distribution:".to_string());
    for (i, (id, relays)) in stats.distribution.iter().enumerate() {
        lines.push(format!("  {:>3}. concentrator {}: {} relays", i + 1, id, relays));
    }

    lines.join("\n")
}

/// Human-readable listing of concentrator locations
pub fn render_concentrators(topology: &Topology) -> String {
    topology
        .concentrators
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{:>3}. ID: {} - Lat: {:.5}, Lon: {:.5} - Relays: {}",
                i + 1,
                c.id,
                c.point.latitude,
                c.point.longitude,
                c.relays.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
