//! Pursuer/player contact outcomes.
//! This module exists to apply the two encounter results: a lost life freezes the level,
//! a caught frightened pursuer is relocated away from the player with its timers cleared.
//! It does not count lives or score; those stay with the caller.

use tracing::{debug, info};

use super::random::random_index;
use super::*;

impl Simulation {
    /// Resolves a contact detected outside the simulation.
    pub fn report_contact(&mut self, id: PursuerId) -> Result<EncounterOutcome, SimError> {
        let level = self.running_level_mut()?;
        if !level.pursuers.contains_key(id) {
            return Err(SimError::UnknownPursuer(id));
        }
        self.resolve_encounter(id).ok_or(SimError::UnknownPursuer(id))
    }

    pub(super) fn resolve_encounter(&mut self, id: PursuerId) -> Option<EncounterOutcome> {
        let mode = self.pursuer(id)?.mode;

        let outcome = if mode == BehaviorMode::Frightened {
            EncounterOutcome::PursuerCaught { relocated_to: self.catch_pursuer(id)? }
        } else {
            self.level.as_mut()?.phase = LevelPhase::AwaitingRespawn { caught_by: id };
            info!(tick = self.tick, "player caught, awaiting respawn");
            EncounterOutcome::LifeLost
        };
        self.log.push(SimEvent::EncounterResolved { pursuer: id, outcome });
        Some(outcome)
    }

    /// Sends a frightened pursuer to a random node off the player's path and drops it back
    /// into Chase. Returns where it landed.
    fn catch_pursuer(&mut self, id: PursuerId) -> Option<NodeId> {
        let now = self.now;
        let level = self.level.as_mut()?;
        let LevelState { graph, player, pursuers, .. } = level;
        let pursuer = pursuers.get_mut(id)?;

        let blocked = [player.mover.current(), player.mover.target()];
        let candidates: Vec<NodeId> =
            graph.node_ids().filter(|node| !blocked.contains(&Some(*node))).collect();
        let destination = if candidates.is_empty() {
            debug!(pursuer = ?id, "no relocation node off the player's path, staying put");
            pursuer.mover.node()
        } else {
            candidates[random_index(&mut self.rng, candidates.len())]
        };

        if let Err(err) = pursuer.mover.place_at(graph, destination) {
            debug_assert!(false, "relocation to a missing node: {err}");
            return None;
        }
        pursuer.generation += 1;
        pursuer.frightened = None;
        pursuer.mode = BehaviorMode::Chase;
        pursuer.alternation = pursuer.alternation.resume(now);
        pursuer.mover.set_speed(self.config.pursuer_speed);
        self.log.push(SimEvent::PursuerModeChanged { pursuer: id, mode: BehaviorMode::Chase });
        Some(destination)
    }

    /// Built-in proximity check, active only when `contact_radius` is above zero.
    pub(super) fn detect_contacts(&self) -> Vec<PursuerId> {
        let radius = self.config.contact_radius;
        let Some(level) = self.level.as_ref() else {
            return Vec::new();
        };
        if radius <= 0.0 {
            return Vec::new();
        }
        let player = level.player.mover.position();
        level
            .pursuers
            .iter()
            .filter(|(_, pursuer)| pursuer.mover.position().distance(player) <= radius)
            .map(|(id, _)| id)
            .collect()
    }
}
