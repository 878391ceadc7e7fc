use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    pub struct PursuerId;
}

/// Dense node index, valid for the lifetime of one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn axis(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementState {
    Idle,
    Transiting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BehaviorMode {
    Chase,
    Scatter,
    Frightened,
}

/// Per-pursuer chase heuristic. Everything else in the pursuer state machine is shared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChaseStyle {
    /// Heads for the player's node along a shortest path.
    Direct,
    /// Aims one hop past the node the player is walking toward.
    Ambush,
    /// Chases from afar, scatters once inside the shy range.
    Shy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncounterOutcome {
    LifeLost,
    PursuerCaught { relocated_to: NodeId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelPhase {
    Running,
    /// Frozen after a lost life until the life-management side calls `life_lost`.
    AwaitingRespawn { caught_by: PursuerId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    LevelStarted { player_spawn: NodeId, pursuers: usize },
    LevelEnded,
    PlayerTargetChanged { from: NodeId, to: NodeId },
    PlayerArrived { node: NodeId },
    PursuerArrivedAtNode { pursuer: PursuerId, node: NodeId },
    PursuerModeChanged { pursuer: PursuerId, mode: BehaviorMode },
    EncounterResolved { pursuer: PursuerId, outcome: EncounterOutcome },
    AgentsRespawned,
}

#[derive(Clone, Debug)]
pub enum AdvanceStopReason {
    /// A pursuer reached the player; the level is frozen until `life_lost` is delivered.
    LifeLost { pursuer: PursuerId },
    NoLevel,
    BudgetExhausted,
}

#[derive(Clone, Debug)]
pub struct AdvanceResult {
    pub simulated_ticks: u32,
    pub stop_reason: AdvanceStopReason,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("invalid topology: {reason}")]
    InvalidTopology { reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("no path between {origin:?} and {destination:?}")]
    Unreachable { origin: NodeId, destination: NodeId },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("agent is already transiting")]
    NotIdle,
    #[error("{from:?} is not connected to {to:?}")]
    NotAdjacent { from: NodeId, to: NodeId },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("no level is running")]
    NoLevel,
    #[error("level is frozen until the lost life is handled")]
    AwaitingRespawn,
    #[error("unknown pursuer {0:?}")]
    UnknownPursuer(PursuerId),
    #[error("level topology rejected: {0}")]
    Topology(#[from] GraphError),
    #[error("move rejected: {0}")]
    Move(#[from] MoveError),
}
