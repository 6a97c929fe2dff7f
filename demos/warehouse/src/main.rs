//! warehouse: robots shuttling between docks and pick faces.
//!
//! Usage: `warehouse [config.json] [nav_graph.json]`
//!
//! Without arguments the embedded twelve-vertex warehouse floor and the
//! default `FleetConfig` are used.  Set `RUST_LOG=debug` to see every lane
//! grant and release.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fleet_core::{FleetConfig, SimRng, VertexId};
use fleet_graph::{BfsRouter, LoadOptions, NavGraph, load_nav_graph_json, load_nav_graph_reader};
use fleet_output::{CsvWriter, FleetOutputObserver};
use fleet_robot::{FULL_CHARGE, RobotState};
use fleet_sim::{Command, Fleet, FleetBuilder, FleetObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const ROBOT_COUNT:   usize = 5;
const DISPATCH_PROB: f64   = 0.3;
const OUTPUT_DIR:    &str  = "output/warehouse";

const NAV_GRAPH_JSON: &str = include_str!("../data/nav_graph.json");

// ── Setup ─────────────────────────────────────────────────────────────────────

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();
}

fn load_config(path: Option<&Path>) -> Result<FleetConfig> {
    let Some(path) = path else {
        return Ok(FleetConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config: FleetConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn load_graph(path: Option<&Path>) -> Result<NavGraph> {
    let options = LoadOptions::default();
    let graph = match path {
        Some(p) => load_nav_graph_json(p, &options)
            .with_context(|| format!("loading {}", p.display()))?,
        None => load_nav_graph_reader(Cursor::new(NAV_GRAPH_JSON), &options)?,
    };
    Ok(graph)
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Queue commands for the next tick: top up robots parked on a charger,
/// send some of the rest somewhere new.
fn dispatch(fleet: &mut Fleet<BfsRouter>, rng: &mut SimRng, vertices: &[VertexId]) {
    let graph = fleet.graph().clone();
    for status in fleet.list_robots() {
        if !matches!(status.state, RobotState::Idle | RobotState::Arrived) {
            continue;
        }
        let on_charger = graph.is_charging_station(status.current_vertex);
        if on_charger && status.charge_level.unwrap_or(0) < FULL_CHARGE {
            fleet.submit(Command::Charge { robot: status.id });
        } else if rng.gen_bool(DISPATCH_PROB) {
            if let Some(&vertex) = rng.choose(vertices) {
                fleet.submit(Command::AssignDestination { robot: status.id, vertex });
            }
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let config = load_config(args.first().map(PathBuf::as_path))?;
    let graph = load_graph(args.get(1).map(PathBuf::as_path))?;
    info!(
        vertices = graph.vertex_count(),
        lanes = graph.lane_count(),
        ticks = config.total_ticks,
        seed = config.seed,
        "starting warehouse run"
    );

    // 1. Pick distinct start vertices.
    let mut rng = SimRng::new(config.seed);
    let vertices: Vec<VertexId> = graph.vertices().map(|v| v.id).collect();
    let mut starts = vertices.clone();
    let mut positions = Vec::with_capacity(ROBOT_COUNT);
    while positions.len() < ROBOT_COUNT && !starts.is_empty() {
        let i = rng.gen_range(0..starts.len());
        positions.push(starts.swap_remove(i));
    }

    // 2. Build the fleet.
    let mut fleet = FleetBuilder::new(graph, BfsRouter)
        .config(config.clone())
        .initial_positions(positions)
        .build()?;

    // 3. Set up output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut obs = FleetOutputObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?);

    // 4. Run.
    let t0 = Instant::now();
    let mut arrivals = 0;
    while fleet.now() < config.end_tick() {
        dispatch(&mut fleet, &mut rng, &vertices);
        let report = fleet.tick_with(&mut obs)?;
        arrivals += report.arrivals.len();
    }
    obs.on_sim_end(fleet.now());
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  arrivals            : {arrivals}");
    println!("  robot_snapshots.csv : {} rows", obs.snapshot_rows());
    println!("  tick_summaries.csv  : {} rows", obs.summary_rows());
    println!();

    println!("{:<6} {:<10} {:<8} {:<8} {:<7}", "Robot", "State", "Vertex", "Dest", "Charge");
    println!("{}", "-".repeat(43));
    for s in fleet.list_robots() {
        println!(
            "{:<6} {:<10} {:<8} {:<8} {:<7}",
            s.id.to_string(),
            s.state.as_str(),
            fleet.graph().vertex(s.current_vertex).map_or("?", |v| v.name.as_str()),
            s.destination.map(|d| d.to_string()).unwrap_or_default(),
            s.charge_level.map(|c| format!("{c}%")).unwrap_or_default(),
        );
    }

    Ok(())
}
