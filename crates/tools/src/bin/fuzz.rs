use std::time::Duration;

use anyhow::{Result, ensure};
use chase_core::{AdvanceStopReason, BehaviorMode, EncounterOutcome, SimConfig, Simulation};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tools::{cubic_lattice, init_tracing, lattice_spawns};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 5000)]
    ticks: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn check_invariants(sim: &Simulation) -> Result<()> {
    let level = sim.level().ok_or_else(|| anyhow::anyhow!("Invariant failed: no level"))?;

    for pursuer in level.pursuers.values() {
        let mover = &pursuer.mover;
        ensure!(mover.position().is_finite(), "Invariant failed: non-finite pursuer position");
        ensure!(
            mover.is_idle() == (mover.current().is_some() && mover.target().is_none()),
            "Invariant failed: pursuer movement state mismatch"
        );
        if let Some(node) = mover.current() {
            ensure!(
                level.graph.position(node)? == mover.position(),
                "Invariant failed: idle pursuer off its node"
            );
        }
        ensure!(
            (pursuer.mode == BehaviorMode::Frightened) == pursuer.frightened.is_some(),
            "Invariant failed: frightened countdown out of sync with mode"
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for max {} ticks...", args.seed, args.ticks);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let parts = 2 + rng.next_u64() as usize % 5;
    let topology = cubic_lattice(parts, 150.0, 0.3, &mut rng);
    let config = SimConfig {
        contact_radius: choose(&mut rng, &[0.0, 3.0, 10.0]),
        wait_for_first_move: choose(&mut rng, &[true, false]),
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(args.seed, config)?;
    sim.start_level(&topology, &lattice_spawns(parts, 1 + rng.next_u64() as usize % 6))?;
    let dt = Duration::from_millis(choose(&mut rng, &[8, 16, 33]));

    while sim.current_tick() < u64::from(args.ticks) {
        if let Some(node) = sim.player().and_then(|player| player.mover.current())
            && rng.next_u64() % 4 != 0
        {
            let neighbors = sim.graph().map(|graph| graph.neighbors(node)).transpose()?;
            if let Some(neighbors) = neighbors.filter(|n| !n.is_empty()) {
                sim.move_player(choose(&mut rng, &neighbors))?;
            }
        }
        match rng.next_u64() % 200 {
            0 => sim.power_pickup_collected()?,
            1 => {
                let id = choose(&mut rng, &sim.pursuer_ids());
                let blocked = sim.player().map(|p| [p.mover.current(), p.mover.target()]);
                match sim.report_contact(id)? {
                    EncounterOutcome::LifeLost => sim.life_lost()?,
                    EncounterOutcome::PursuerCaught { relocated_to } => {
                        ensure!(
                            !blocked.unwrap_or_default().contains(&Some(relocated_to)),
                            "Invariant failed: caught pursuer relocated onto the player's path"
                        );
                    }
                }
            }
            _ => {}
        }

        let result = sim.advance(dt, 1);
        match result.stop_reason {
            AdvanceStopReason::LifeLost { pursuer } => {
                ensure!(sim.pursuer(pursuer).is_some(), "Invariant failed: unknown catcher");
                sim.life_lost()?;
            }
            AdvanceStopReason::NoLevel => anyhow::bail!("Invariant failed: level vanished"),
            AdvanceStopReason::BudgetExhausted => {}
        }
        check_invariants(&sim)?;
    }

    println!("Fuzzing completed successfully after {} ticks.", sim.current_tick());
    Ok(())
}
