//! Deadline-driven behavior timers: Chase/Scatter alternation and the frightened countdown.
//! This module exists so timer state lives on the pursuer and is checked against the
//! simulation clock, never fired from a detached callback.

use tracing::debug;

use super::*;

/// Floor on the alternation period so an overdue clock always catches up in finite steps.
const MIN_TOGGLE_PERIOD: Duration = Duration::from_millis(1);

impl ModeAlternation {
    pub fn starting_at(now: Duration, warmup: Duration) -> Self {
        ModeAlternation::Running { next_toggle_at: now + warmup }
    }

    /// Freezes the clock, keeping whatever time was left before the next toggle.
    pub fn suspend(self, now: Duration) -> Self {
        match self {
            ModeAlternation::Running { next_toggle_at } => {
                ModeAlternation::Suspended { remaining: next_toggle_at.saturating_sub(now) }
            }
            suspended => suspended,
        }
    }

    pub fn resume(self, now: Duration) -> Self {
        match self {
            ModeAlternation::Suspended { remaining } => {
                ModeAlternation::Running { next_toggle_at: now + remaining }
            }
            running => running,
        }
    }
}

fn toggled(mode: BehaviorMode) -> BehaviorMode {
    match mode {
        BehaviorMode::Chase => BehaviorMode::Scatter,
        BehaviorMode::Scatter => BehaviorMode::Chase,
        BehaviorMode::Frightened => BehaviorMode::Frightened,
    }
}

impl Simulation {
    pub(super) fn process_timers(&mut self) {
        for id in self.pursuer_ids() {
            let countdown = self.pursuer(id).and_then(|pursuer| pursuer.frightened);
            if let Some(countdown) = countdown
                && countdown.deadline <= self.now
            {
                self.expire_frightened(id, countdown);
            }
            self.run_alternation(id);
        }
    }

    /// Power pickup handler. Entering the mode turns any transit around; a repeat pickup
    /// only re-arms the countdown.
    pub(super) fn frighten(&mut self, id: PursuerId) {
        let now = self.now;
        let Some(level) = self.level.as_mut() else {
            return;
        };
        let Some(pursuer) = level.pursuers.get_mut(id) else {
            return;
        };

        if pursuer.mode != BehaviorMode::Frightened {
            pursuer.alternation = pursuer.alternation.suspend(now);
            pursuer.mode = BehaviorMode::Frightened;
            pursuer.mover.set_speed(self.config.frightened_speed);
            if let Err(err) = pursuer.mover.reverse(&level.graph) {
                debug_assert!(false, "pursuer transit references a missing node: {err}");
            }
            self.log.push(SimEvent::PursuerModeChanged {
                pursuer: id,
                mode: BehaviorMode::Frightened,
            });
        }
        pursuer.frightened = Some(FrightenedCountdown {
            deadline: now + self.config.frightened_duration(),
            generation: pursuer.generation,
        });
    }

    fn expire_frightened(&mut self, id: PursuerId, countdown: FrightenedCountdown) {
        let now = self.now;
        let Some(pursuer) = self.level.as_mut().and_then(|level| level.pursuers.get_mut(id))
        else {
            return;
        };
        pursuer.frightened = None;

        if countdown.generation != pursuer.generation || pursuer.mode != BehaviorMode::Frightened {
            debug!(
                armed_generation = countdown.generation,
                generation = pursuer.generation,
                "discarding stale frightened countdown"
            );
            return;
        }

        pursuer.mode = BehaviorMode::Chase;
        pursuer.alternation = pursuer.alternation.resume(now);
        pursuer.mover.set_speed(self.config.pursuer_speed);
        self.log.push(SimEvent::PursuerModeChanged { pursuer: id, mode: BehaviorMode::Chase });
    }

    fn run_alternation(&mut self, id: PursuerId) {
        let now = self.now;
        let period = self.config.chase_timer().max(MIN_TOGGLE_PERIOD);
        let Some(pursuer) = self.level.as_mut().and_then(|level| level.pursuers.get_mut(id))
        else {
            return;
        };
        let ModeAlternation::Running { mut next_toggle_at } = pursuer.alternation else {
            return;
        };
        if pursuer.mode == BehaviorMode::Frightened {
            return;
        }

        while next_toggle_at <= now {
            pursuer.mode = toggled(pursuer.mode);
            next_toggle_at += period;
            self.log.push(SimEvent::PursuerModeChanged { pursuer: id, mode: pursuer.mode });
        }
        pursuer.alternation = ModeAlternation::Running { next_toggle_at };
    }
}
