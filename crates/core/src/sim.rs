//! Simulation context: owns the level graph, path cache, agents, clock, RNG and event log.
//! This file holds the external command surface and wires the focused submodules together.

use std::mem;
use std::time::Duration;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use slotmap::SlotMap;
use tracing::info;

use crate::config::{ConfigError, SimConfig};
use crate::graph::{Graph, Topology};
use crate::movement::Mover;
use crate::pathfinding::PathCache;
use crate::state::*;
use crate::types::*;

mod advance;
mod encounters;
mod events;
mod hash;
mod random;
mod targeting;
mod timers;

#[cfg(test)]
mod test_support;

use events::EventBus;
pub use events::Topic;

pub struct Simulation {
    seed: u64,
    config: SimConfig,
    rng: ChaCha8Rng,
    tick: u64,
    now: Duration,
    level: Option<LevelState>,
    bus: EventBus,
    log: Vec<SimEvent>,
}

impl Simulation {
    pub fn new(seed: u64, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            seed,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
            now: Duration::ZERO,
            level: None,
            bus: EventBus::default(),
            log: Vec::new(),
        })
    }

    /// Tears down any running level, then builds the new one. A rejected topology leaves
    /// no level running.
    pub fn start_level(&mut self, topology: &Topology, spawns: &LevelSpawns) -> Result<(), SimError> {
        self.end_level();

        let graph = Graph::build(topology)?;
        let player_spawn = NodeId(spawns.player);
        let player = Player {
            mover: Mover::at_node(&graph, player_spawn, self.config.player_speed)?,
            spawn: player_spawn,
            has_moved: false,
        };

        let mut pursuers = SlotMap::with_key();
        for spawn in &spawns.pursuers {
            let node = NodeId(spawn.node);
            let mover = Mover::at_node(&graph, node, self.config.pursuer_speed)?;
            pursuers.insert_with_key(|id| Pursuer {
                id,
                style: spawn.style,
                spawn: node,
                mover,
                mode: BehaviorMode::Chase,
                alternation: ModeAlternation::starting_at(self.now, self.config.warmup()),
                frightened: None,
                generation: 0,
                released: !self.config.wait_for_first_move,
            });
        }
        for id in pursuers.keys() {
            self.bus.subscribe(id, Topic::PowerPickup);
            self.bus.subscribe(id, Topic::PlayerFirstMove);
        }

        let mut paths = PathCache::new();
        paths.set_anchor(player_spawn);

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            pursuers = pursuers.len(),
            "level started"
        );
        self.log.push(SimEvent::LevelStarted { player_spawn, pursuers: pursuers.len() });
        self.level =
            Some(LevelState { graph, paths, player, pursuers, phase: LevelPhase::Running });
        Ok(())
    }

    pub fn end_level(&mut self) {
        let Some(level) = self.level.take() else {
            return;
        };
        for id in level.pursuers.keys() {
            self.bus.unsubscribe_all(id);
        }
        self.log.push(SimEvent::LevelEnded);
    }

    /// Starts the player walking to an adjacent node. Only accepted while the player is idle.
    pub fn move_player(&mut self, target: NodeId) -> Result<(), SimError> {
        let level = self.running_level_mut()?;
        let from = level.player.mover.node();
        level.player.mover.begin_transit(&level.graph, target)?;
        level.paths.set_anchor(target);
        let first_move = !mem::replace(&mut level.player.has_moved, true);

        self.log.push(SimEvent::PlayerTargetChanged { from, to: target });
        if first_move {
            self.dispatch(Topic::PlayerFirstMove);
        }
        Ok(())
    }

    pub fn power_pickup_collected(&mut self) -> Result<(), SimError> {
        self.running_level_mut()?;
        self.dispatch(Topic::PowerPickup);
        Ok(())
    }

    /// Respawns the player and every pursuer at their level spawn points.
    pub fn life_lost(&mut self) -> Result<(), SimError> {
        let now = self.now;
        let config = &self.config;
        let level = self.level.as_mut().ok_or(SimError::NoLevel)?;

        level.player.mover.place_at(&level.graph, level.player.spawn)?;
        level.player.has_moved = false;
        level.paths.set_anchor(level.player.spawn);

        for (id, pursuer) in level.pursuers.iter_mut() {
            pursuer.mover.place_at(&level.graph, pursuer.spawn)?;
            pursuer.mover.set_speed(config.pursuer_speed);
            pursuer.alternation = ModeAlternation::starting_at(now, config.warmup());
            pursuer.frightened = None;
            pursuer.generation += 1;
            pursuer.released = !config.wait_for_first_move;
            if pursuer.mode != BehaviorMode::Chase {
                pursuer.mode = BehaviorMode::Chase;
                self.log.push(SimEvent::PursuerModeChanged { pursuer: id, mode: BehaviorMode::Chase });
            }
        }
        level.phase = LevelPhase::Running;
        self.log.push(SimEvent::AgentsRespawned);
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Simulation clock, monotonic across levels.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn level(&self) -> Option<&LevelState> {
        self.level.as_ref()
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.level.as_ref().map(|level| &level.graph)
    }

    pub fn player(&self) -> Option<&Player> {
        self.level.as_ref().map(|level| &level.player)
    }

    pub fn pursuer(&self, id: PursuerId) -> Option<&Pursuer> {
        self.level.as_ref().and_then(|level| level.pursuers.get(id))
    }

    pub fn pursuer_ids(&self) -> Vec<PursuerId> {
        self.level.as_ref().map(LevelState::pursuer_ids).unwrap_or_default()
    }

    pub fn path_computations(&self) -> u64 {
        self.level.as_ref().map_or(0, |level| level.paths.computations())
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.bus.subscriber_count(topic)
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.log
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        mem::take(&mut self.log)
    }

    fn running_level_mut(&mut self) -> Result<&mut LevelState, SimError> {
        let level = self.level.as_mut().ok_or(SimError::NoLevel)?;
        match level.phase {
            LevelPhase::Running => Ok(level),
            LevelPhase::AwaitingRespawn { .. } => Err(SimError::AwaitingRespawn),
        }
    }

    fn dispatch(&mut self, topic: Topic) {
        for id in self.bus.subscribers(topic) {
            match topic {
                Topic::PowerPickup => self.frighten(id),
                Topic::PlayerFirstMove => self.release(id),
            }
        }
    }

    fn release(&mut self, id: PursuerId) {
        if let Some(pursuer) = self.level.as_mut().and_then(|level| level.pursuers.get_mut(id)) {
            pursuer.released = true;
        }
    }
}
