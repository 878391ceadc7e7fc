//! Next-hop selection for idle pursuers.
//! This module exists to turn a pursuer's mode and chase style into one adjacent target node.
//! It does not move agents or change modes; the tick loop and timers own those.

use tracing::debug;

use super::random::{Extreme, ScatterHeading, random_heading, random_index};
use super::*;
use crate::types::PathError;

/// What a pursuer sees of the player when deciding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct PlayerView {
    /// Current node, or the transit target when moving.
    pub node: NodeId,
    pub origin: Option<NodeId>,
    pub target: Option<NodeId>,
    pub position: Vec3,
}

impl PlayerView {
    pub fn of(player: &Player) -> Self {
        Self {
            node: player.mover.node(),
            origin: player.mover.origin(),
            target: player.mover.target(),
            position: player.mover.position(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Decision {
    pub from: NodeId,
    pub position: Vec3,
    pub mode: BehaviorMode,
    pub style: ChaseStyle,
}

impl Simulation {
    /// Starts the next hop for a released, idle pursuer. Pursuers in transit keep going.
    pub(super) fn plan_route(&mut self, id: PursuerId) {
        let shy_range = self.config.shy_range;
        let Some(level) = self.level.as_mut() else {
            return;
        };
        let LevelState { graph, paths, player, pursuers, .. } = level;
        let Some(pursuer) = pursuers.get_mut(id) else {
            return;
        };
        if !pursuer.released {
            return;
        }
        let Some(from) = pursuer.mover.current() else {
            return;
        };

        let decision = Decision {
            from,
            position: pursuer.mover.position(),
            mode: pursuer.mode,
            style: pursuer.style,
        };
        let view = PlayerView::of(player);
        let Some(next) = choose_next_target(graph, paths, &mut self.rng, shy_range, &decision, &view)
        else {
            return;
        };
        if let Err(err) = pursuer.mover.begin_transit(graph, next) {
            debug_assert!(false, "planned hop {from:?} -> {next:?} rejected: {err}");
        }
    }
}

/// Picks an adjacent node for `decision`, falling back to a random neighbor when the
/// preferred rule yields nothing. `None` only when the pursuer has no neighbors at all.
pub(super) fn choose_next_target(
    graph: &Graph,
    paths: &mut PathCache,
    rng: &mut ChaCha8Rng,
    shy_range: f32,
    decision: &Decision,
    player: &PlayerView,
) -> Option<NodeId> {
    let from = decision.from;
    let preferred = match (decision.mode, decision.style) {
        (BehaviorMode::Frightened, _) => return frightened_target(graph, from, rng),
        (BehaviorMode::Scatter, _) => scatter_target(graph, from, random_heading(rng)),
        (BehaviorMode::Chase, ChaseStyle::Direct) => chase_toward(graph, paths, from, player.node),
        (BehaviorMode::Chase, ChaseStyle::Ambush) => {
            let goal = ambush_goal(graph, player).unwrap_or(player.node);
            chase_toward(graph, paths, from, goal)
        }
        (BehaviorMode::Chase, ChaseStyle::Shy) => {
            if decision.position.distance(player.position) > shy_range {
                chase_toward(graph, paths, from, player.node)
            } else {
                scatter_target(graph, from, random_heading(rng))
            }
        }
    };

    match preferred {
        Ok(Some(node)) if node != from => Some(node),
        Ok(_) => frightened_target(graph, from, rng),
        Err(PathError::Unreachable { origin, destination }) => {
            debug!(
                from = from.index(),
                origin = origin.index(),
                destination = destination.index(),
                "player unreachable, wandering"
            );
            frightened_target(graph, from, rng)
        }
        Err(PathError::Graph(err)) => {
            debug_assert!(false, "targeting queried a missing node: {err}");
            None
        }
    }
}

/// One hop from `from` toward `goal` along a cached shortest path rooted at `goal`.
pub(super) fn chase_toward(
    graph: &Graph,
    paths: &mut PathCache,
    from: NodeId,
    goal: NodeId,
) -> Result<Option<NodeId>, PathError> {
    if from == goal {
        return Ok(None);
    }
    if graph.is_connected(from, goal)? {
        return Ok(Some(goal));
    }
    paths.table(graph, goal)?.next_hop_toward_source(from)
}

/// Neighbor of the player's transit target that best continues its heading, never the
/// node it came from. `None` while the player is idle or at a dead end.
pub(super) fn ambush_goal(graph: &Graph, player: &PlayerView) -> Option<NodeId> {
    let (origin, target) = (player.origin?, player.target?);
    let anchor = graph.position(target).ok()?;
    let heading = anchor - graph.position(origin).ok()?;

    let mut best: Option<(NodeId, f32)> = None;
    for &candidate in graph.adjacent(target).ok()? {
        if candidate == origin {
            continue;
        }
        let Ok(position) = graph.position(candidate) else {
            continue;
        };
        let score = (position - anchor).dot(heading);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best.map(|(node, _)| node)
}

/// Most extreme neighbor along the heading's axis. Ties go to the lowest id.
pub(super) fn scatter_target(
    graph: &Graph,
    from: NodeId,
    heading: ScatterHeading,
) -> Result<Option<NodeId>, PathError> {
    let mut best: Option<(NodeId, f32)> = None;
    for &candidate in graph.adjacent(from)? {
        let value = graph.position(candidate)?.axis(heading.axis);
        let better = match (best, heading.extreme) {
            (None, _) => true,
            (Some((_, top)), Extreme::Max) => value > top,
            (Some((_, top)), Extreme::Min) => value < top,
        };
        if better {
            best = Some((candidate, value));
        }
    }
    Ok(best.map(|(node, _)| node))
}

/// Uniform pick among direct neighbors.
pub(super) fn frightened_target(
    graph: &Graph,
    from: NodeId,
    rng: &mut ChaCha8Rng,
) -> Option<NodeId> {
    let neighbors = match graph.neighbors(from) {
        Ok(neighbors) => neighbors,
        Err(err) => {
            debug_assert!(false, "frightened pursuer on a missing node: {err}");
            return None;
        }
    };
    if neighbors.is_empty() {
        return None;
    }
    Some(neighbors[random_index(rng, neighbors.len())])
}
