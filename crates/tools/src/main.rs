use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chase_core::{AdvanceStopReason, EncounterOutcome, SimConfig, SimEvent, Simulation};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use serde::Serialize;
use tools::{cubic_lattice, init_tracing, lattice_spawns};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of fixed ticks to simulate
    #[arg(short, long, default_value_t = 3000)]
    ticks: u32,
    /// Tick length in milliseconds
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Nodes per lattice axis
    #[arg(long, default_value_t = 5)]
    parts: usize,
    #[arg(long, default_value_t = 4)]
    pursuers: usize,
    /// Deliver a power pickup every N ticks (0 disables)
    #[arg(long, default_value_t = 600)]
    pickup_every: u32,
    /// TOML file overriding the default tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    nodes: usize,
    edges: usize,
    ticks: u64,
    player_hops: u64,
    pickups: u64,
    lives_lost: u64,
    pursuers_caught: u64,
    pursuer_arrivals: u64,
    mode_changes: u64,
    path_computations: u64,
    snapshot_hash: u64,
}

impl Summary {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::PlayerArrived { .. } => self.player_hops += 1,
            SimEvent::PursuerArrivedAtNode { .. } => self.pursuer_arrivals += 1,
            SimEvent::PursuerModeChanged { .. } => self.mode_changes += 1,
            SimEvent::EncounterResolved { outcome: EncounterOutcome::LifeLost, .. } => {
                self.lives_lost += 1
            }
            SimEvent::EncounterResolved { outcome: EncounterOutcome::PursuerCaught { .. }, .. } => {
                self.pursuers_caught += 1
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SimConfig { contact_radius: 5.0, ..SimConfig::default() },
    };
    let dt = Duration::from_millis(args.tick_ms);

    let mut layout_rng = ChaCha8Rng::seed_from_u64(args.seed);
    let topology = cubic_lattice(args.parts, 200.0, 0.2, &mut layout_rng);
    let spawns = lattice_spawns(args.parts, args.pursuers);

    let mut sim = Simulation::new(args.seed, config).context("Invalid simulation config")?;
    sim.start_level(&topology, &spawns).context("Failed to start level")?;
    let mut walker = ChaCha8Rng::seed_from_u64(args.seed ^ 0x5EED);
    let mut summary = Summary {
        seed: args.seed,
        nodes: topology.positions.len(),
        edges: sim.graph().map_or(0, |graph| graph.edge_count()),
        ..Summary::default()
    };
    info!(seed = args.seed, ticks = args.ticks, "running headless chase");

    for tick in 0..args.ticks {
        if let Some(node) = sim.player().and_then(|player| player.mover.current()) {
            let neighbors = sim.graph().context("Level vanished")?.neighbors(node)?;
            if !neighbors.is_empty() {
                let next = neighbors[walker.next_u64() as usize % neighbors.len()];
                sim.move_player(next).context("Random walk picked an illegal hop")?;
            }
        }
        if args.pickup_every > 0 && tick % args.pickup_every == args.pickup_every - 1 {
            sim.power_pickup_collected()?;
            summary.pickups += 1;
        }

        let result = sim.advance(dt, 1);
        for event in sim.drain_events() {
            summary.record(&event);
        }
        match result.stop_reason {
            AdvanceStopReason::LifeLost { .. } => sim.life_lost()?,
            AdvanceStopReason::NoLevel => anyhow::bail!("Level ended unexpectedly"),
            AdvanceStopReason::BudgetExhausted => {}
        }
    }

    summary.ticks = sim.current_tick();
    summary.path_computations = sim.path_computations();
    summary.snapshot_hash = sim.snapshot_hash();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
