// traceview - particle trajectory trace capture and scene building
// Module declarations and the public surface

//! Runs a particle simulation in trace mode, captures its stdout, and
//! turns the interleaved line stream into a renderable scene: instrument
//! geometry, particle trajectories, a world-space bounding volume, and a
//! default camera.
//!
//! [`TracePipe`] owns the child process and its drain thread. The trace
//! layer splits the stream into channels, the instrument and trajectory
//! pipelines parse and build their halves of the model, and
//! [`read_scene`] runs the whole thing end to end.

pub mod config;
pub mod geometry;
pub mod instrument;
pub mod pipe;
pub mod reader;
pub mod scene;
pub mod trace;
pub mod trajectory;

pub use config::RunnerConfig;
pub use geometry::{BoundingBox, Transform};
pub use instrument::{Component, DrawCommand, Instrument};
pub use pipe::{PipeError, TracePipe};
pub use reader::{read_scene, TraceReader};
pub use scene::SceneModel;
pub use trace::ParseError;
pub use trajectory::{EventKind, ParticleEvent, Trajectory};
