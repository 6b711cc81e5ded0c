// Trajectory model types
// Particle events and the per-particle trajectories they form

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// What happened to the particle at one recorded event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Particle entered a component region
    Enter,

    /// Particle scattered inside a component
    Scatter,

    /// Particle was absorbed. Terminal for its trajectory
    Absorb,

    /// Particle left a component region
    Leave,
}

impl EventKind {
    /// Parse the kind tag used by EVENT lines
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ENTER" => Some(EventKind::Enter),
            "SCATTER" => Some(EventKind::Scatter),
            "ABSORB" => Some(EventKind::Absorb),
            "LEAVE" => Some(EventKind::Leave),
            _ => None,
        }
    }

    /// The protocol tag for this kind
    pub fn as_tag(&self) -> &'static str {
        match self {
            EventKind::Enter => "ENTER",
            EventKind::Scatter => "SCATTER",
            EventKind::Absorb => "ABSORB",
            EventKind::Leave => "LEAVE",
        }
    }
}

/// One recorded state of a particle along its flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleEvent {
    /// What happened at this point
    pub kind: EventKind,

    /// World-space position
    pub position: DVec3,

    /// Velocity at the event
    pub velocity: DVec3,

    /// Time since the particle entered the simulation
    pub time: f64,

    /// Statistical weight carried by the particle at this event
    pub weight: f64,
}

/// The recorded flight of one particle: its events in arrival order.
/// Append-only while building; never reordered or deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Opaque particle id from the trace stream
    id: String,

    /// Events in emission order
    events: Vec<ParticleEvent>,
}

impl Trajectory {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Trajectory {
            id: id.into(),
            events: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, event: ParticleEvent) {
        self.events.push(event);
    }

    /// Particle id exactly as the trace stream emitted it
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Events in arrival order
    pub fn events(&self) -> &[ParticleEvent] {
        &self.events
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when no events were recorded
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
