//! Inspection CLI for emitted topology documents.
//!
//! Prints statistics, looks up concentrators and relays, and checks the
//! structural invariants of a `topology.json` produced by `lightmesh`.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};

use lightmesh::report::{read_topology, render_concentrators, render_stats};
use lightmesh::topology::{Point, TopologyStats};
use lightmesh::utils::validation::validate_topology;

#[derive(Parser)]
#[command(name = "topology-info")]
#[command(about = "Inspect concentrator topologies produced by lightmesh")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Topology document to inspect
    #[arg(short, long, default_value = "topology.json")]
    topology: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics and concentrator locations
    Summary,

    /// Show one concentrator and its relays
    Concentrator {
        /// Concentrator id
        id: i64,
    },

    /// Show one relay of a concentrator
    Relay {
        /// Concentrator id
        concentrator: i64,
        /// Relay id
        relay: i64,
    },

    /// Check id uniqueness and (optionally) relay capacity
    Check {
        /// Maximum relays per concentrator
        #[arg(long)]
        max_capacity: Option<usize>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level)).init();

    let document = read_topology(&cli.topology)?;
    let topology = document.topology;
    log::info!(
        "Loaded {} concentrators from {}",
        topology.concentrator_count(),
        cli.topology.display()
    );

    match cli.command {
        Commands::Summary => {
            let total = topology.concentrator_count() + topology.relay_count();
            let stats = TopologyStats::from_topology(&topology, total);

            println!("Topology: {}", cli.topology.display());
            if let Some(generated_at) = document.generated_at {
                println!("Generated at: {}", generated_at.to_rfc3339());
            }
            println!();
            println!("{}", render_stats(&stats));
            println!();
            println!("{}", render_concentrators(&topology));
        }

        Commands::Concentrator { id } => {
            let cluster = topology
                .concentrator(id)
                .ok_or_else(|| eyre!("No concentrator with id {}", id))?;

            println!("Concentrator {}", cluster.id);
            print_point("  ", &cluster.point);
            println!("  Relays: {}", cluster.relays.len());
            for relay in topology.relays_of(id) {
                println!(
                    "    {} ({:.6}, {:.6}) {:.3} km",
                    relay.id,
                    relay.latitude,
                    relay.longitude,
                    cluster.point.distance_km(relay)
                );
            }
        }

        Commands::Relay { concentrator, relay } => {
            let hub = topology
                .concentrator(concentrator)
                .ok_or_else(|| eyre!("No concentrator with id {}", concentrator))?;
            let point = topology
                .relay(concentrator, relay)
                .ok_or_else(|| eyre!("Concentrator {} has no relay {}", concentrator, relay))?;

            println!("Relay {} of concentrator {}", point.id, concentrator);
            print_point("  ", point);
            println!("  Distance to concentrator: {:.3} km", hub.point.distance_km(point));
        }

        Commands::Check { max_capacity } => match validate_topology(&topology, max_capacity) {
            Ok(()) => println!(
                "OK: {} concentrators, {} relays",
                topology.concentrator_count(),
                topology.relay_count()
            ),
            Err(e) => {
                eprintln!("INVALID: {}", e);
                process::exit(1);
            }
        },
    }

    Ok(())
}

fn print_point(indent: &str, point: &Point) {
    println!("{}Location: {:.6}, {:.6}", indent, point.latitude, point.longitude);
    println!("{}Type: {}", indent, point.kind);
    println!("{}Power: {} W", indent, point.power);
    println!("{}Area: {}", indent, point.area);
}
