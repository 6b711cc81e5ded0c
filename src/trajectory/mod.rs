// Trajectory pipeline
// Event grammar parse and per-particle trajectory build

pub mod build;
pub mod parse;
pub mod types;

pub use build::{build_trajectories, TrajectorySet};
pub use parse::{parse_events, EventNode, TrajectoryParse};
pub use types::{EventKind, ParticleEvent, Trajectory};
