//! Continuous motion between adjacent nodes at a fixed speed.
//! Every hop re-anchors on the exact node position, so drift never accumulates.

use std::time::Duration;

use crate::graph::Graph;
use crate::types::{GraphError, MoveError, MovementState, NodeId, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Anchor {
    Idle { node: NodeId },
    Transiting { from: NodeId, to: NodeId, destination: Vec3 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mover {
    position: Vec3,
    anchor: Anchor,
    speed: f32,
}

impl Mover {
    pub fn at_node(graph: &Graph, node: NodeId, speed: f32) -> Result<Self, GraphError> {
        let position = graph.position(node)?;
        Ok(Self { position, anchor: Anchor::Idle { node }, speed })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn state(&self) -> MovementState {
        match self.anchor {
            Anchor::Idle { .. } => MovementState::Idle,
            Anchor::Transiting { .. } => MovementState::Transiting,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state() == MovementState::Idle
    }

    /// `None` while transiting.
    pub fn current(&self) -> Option<NodeId> {
        match self.anchor {
            Anchor::Idle { node } => Some(node),
            Anchor::Transiting { .. } => None,
        }
    }

    /// `None` while idle.
    pub fn target(&self) -> Option<NodeId> {
        match self.anchor {
            Anchor::Idle { .. } => None,
            Anchor::Transiting { to, .. } => Some(to),
        }
    }

    /// Node the current transit started from.
    pub fn origin(&self) -> Option<NodeId> {
        match self.anchor {
            Anchor::Idle { .. } => None,
            Anchor::Transiting { from, .. } => Some(from),
        }
    }

    /// Current node when idle, otherwise the node being walked to.
    pub fn node(&self) -> NodeId {
        match self.anchor {
            Anchor::Idle { node } => node,
            Anchor::Transiting { to, .. } => to,
        }
    }

    /// Snaps onto `node` and drops any transit in flight.
    pub fn place_at(&mut self, graph: &Graph, node: NodeId) -> Result<(), GraphError> {
        self.position = graph.position(node)?;
        self.anchor = Anchor::Idle { node };
        Ok(())
    }

    pub fn begin_transit(&mut self, graph: &Graph, target: NodeId) -> Result<(), MoveError> {
        let Anchor::Idle { node } = self.anchor else {
            return Err(MoveError::NotIdle);
        };
        if !graph.is_connected(node, target)? {
            return Err(MoveError::NotAdjacent { from: node, to: target });
        }
        let destination = graph.position(target)?;
        self.anchor = Anchor::Transiting { from: node, to: target, destination };
        Ok(())
    }

    /// Turns a transit around so the mover heads back to where it came from.
    pub fn reverse(&mut self, graph: &Graph) -> Result<(), GraphError> {
        if let Anchor::Transiting { from, to, .. } = self.anchor {
            let destination = graph.position(from)?;
            self.anchor = Anchor::Transiting { from: to, to: from, destination };
        }
        Ok(())
    }

    /// Moves one tick. Returns the node arrived at, if the transit finished this tick.
    pub fn advance(&mut self, dt: Duration) -> Option<NodeId> {
        let Anchor::Transiting { to, destination, .. } = self.anchor else {
            return None;
        };
        let step = self.speed * dt.as_secs_f32();
        let diff = destination - self.position;
        let distance = diff.length();
        if distance <= step {
            self.position = destination;
            self.anchor = Anchor::Idle { node: to };
            return Some(to);
        }
        self.position = self.position + diff * (step / distance);
        None
    }
}
