pub mod config;
pub mod graph;
pub mod movement;
pub mod pathfinding;
pub mod sim;
pub mod state;
pub mod types;

pub use config::{ConfigError, SimConfig};
pub use graph::{Graph, Topology};
pub use movement::Mover;
pub use pathfinding::{PathCache, PathTable, shortest_paths};
pub use sim::{Simulation, Topic};
pub use state::{
    FrightenedCountdown, LevelSpawns, LevelState, ModeAlternation, Player, Pursuer, PursuerSpawn,
};
pub use types::*;
