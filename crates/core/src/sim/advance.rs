//! Per-tick simulation loop and stop-reason handling.
//! One step runs player motion, timer deadlines, pursuer decisions and motion, then contact
//! checks, each to completion before the next step begins.

use std::time::Duration;

use super::*;

impl Simulation {
    pub fn advance(&mut self, dt: Duration, max_steps: u32) -> AdvanceResult {
        let mut steps = 0;

        while steps < max_steps {
            match self.level.as_ref().map(|level| level.phase) {
                None => {
                    return AdvanceResult {
                        simulated_ticks: steps,
                        stop_reason: AdvanceStopReason::NoLevel,
                    };
                }
                Some(LevelPhase::AwaitingRespawn { caught_by }) => {
                    return AdvanceResult {
                        simulated_ticks: steps,
                        stop_reason: AdvanceStopReason::LifeLost { pursuer: caught_by },
                    };
                }
                Some(LevelPhase::Running) => {}
            }

            self.tick += 1;
            self.now += dt;
            steps += 1;

            self.step_player(dt);
            self.process_timers();
            self.step_pursuers(dt);

            for pursuer in self.detect_contacts() {
                if self.resolve_encounter(pursuer) == Some(EncounterOutcome::LifeLost) {
                    return AdvanceResult {
                        simulated_ticks: steps,
                        stop_reason: AdvanceStopReason::LifeLost { pursuer },
                    };
                }
            }
        }

        AdvanceResult { simulated_ticks: steps, stop_reason: AdvanceStopReason::BudgetExhausted }
    }

    fn step_player(&mut self, dt: Duration) {
        let Some(level) = self.level.as_mut() else {
            return;
        };
        if let Some(node) = level.player.mover.advance(dt) {
            self.log.push(SimEvent::PlayerArrived { node });
        }
    }

    fn step_pursuers(&mut self, dt: Duration) {
        for id in self.pursuer_ids() {
            self.plan_route(id);

            let Some(pursuer) = self.level.as_mut().and_then(|level| level.pursuers.get_mut(id))
            else {
                continue;
            };
            if let Some(node) = pursuer.mover.advance(dt) {
                self.log.push(SimEvent::PursuerArrivedAtNode { pursuer: id, node });
            }
        }
    }
}
