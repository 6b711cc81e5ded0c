// Event grammar parser
// Single-pass parse of the event channel. Each line is one complete event;
// malformed lines become recorded diagnostics, never failures.

use std::str::SplitWhitespace;

use crate::trace::fields::{ensure_done, take_f64, take_vec3};
use crate::trace::{protocol, ParseError, TraceLine};
use crate::trajectory::types::{EventKind, ParticleEvent};

/// One parsed event line: the particle it belongs to plus the event itself
#[derive(Debug, Clone, PartialEq)]
pub struct EventNode {
    /// Opaque particle id token
    pub pid: String,

    /// The event the line carries
    pub event: ParticleEvent,
}

/// Parse output: event nodes in stream order plus recoverable diagnostics
#[derive(Debug, Clone, Default)]
pub struct TrajectoryParse {
    /// Event nodes in stream order
    pub nodes: Vec<EventNode>,

    /// One entry per malformed line, in stream order
    pub errors: Vec<ParseError>,
}

/// Parse the event-channel lines of one trace stream
pub fn parse_events(lines: &[TraceLine]) -> TrajectoryParse {
    let mut parse = TrajectoryParse::default();

    for line in lines {
        let mut fields = line.text.split_whitespace();
        if fields.next() != Some(protocol::TAG_EVENT) {
            parse.errors.push(ParseError::new(line, "not an event line"));
            continue;
        }
        match parse_event(&mut fields) {
            Ok(node) => parse.nodes.push(node),
            Err(reason) => parse.errors.push(ParseError::new(line, reason)),
        }
    }

    parse
}

/// EVENT <pid> <kind> <x y z> <vx vy vz> <t> <p>
fn parse_event(fields: &mut SplitWhitespace) -> Result<EventNode, String> {
    let pid = fields
        .next()
        .ok_or_else(|| "missing particle id".to_string())?;
    let kind_tag = fields
        .next()
        .ok_or_else(|| "missing event kind".to_string())?;
    let kind = EventKind::from_tag(kind_tag)
        .ok_or_else(|| format!("unknown event kind `{kind_tag}`"))?;

    let position = take_vec3(fields, "position")?;
    let velocity = take_vec3(fields, "velocity")?;
    let time = take_f64(fields, "time")?;
    let weight = take_f64(fields, "weight")?;
    ensure_done(fields)?;

    Ok(EventNode {
        pid: pid.to_string(),
        event: ParticleEvent {
            kind,
            position,
            velocity,
            time,
            weight,
        },
    })
}
