// Trajectory builder
// Groups parsed events into per-particle trajectories. Particle ids appear
// in first-seen order; within one trajectory events keep arrival order.

use std::collections::HashMap;

use crate::trace::ParseError;
use crate::trajectory::parse::TrajectoryParse;
use crate::trajectory::types::Trajectory;

/// Built trajectories together with everything the parse had to flag
#[derive(Debug, Clone)]
pub struct TrajectorySet {
    /// Trajectories in first-seen particle id order
    pub trajectories: Vec<Trajectory>,

    /// Recoverable diagnostics accumulated while parsing the stream
    pub diagnostics: Vec<ParseError>,
}

/// Fold parsed event nodes into trajectories. Total: zero event lines
/// build an empty set with no diagnostics.
pub fn build_trajectories(parse: TrajectoryParse) -> TrajectorySet {
    let TrajectoryParse { nodes, errors } = parse;

    let mut trajectories: Vec<Trajectory> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for node in nodes {
        let slot = match index.get(&node.pid) {
            Some(&slot) => slot,
            None => {
                let slot = trajectories.len();
                index.insert(node.pid.clone(), slot);
                trajectories.push(Trajectory::new(node.pid));
                slot
            }
        };
        trajectories[slot].push(node.event);
    }

    TrajectorySet {
        trajectories,
        diagnostics: errors,
    }
}
