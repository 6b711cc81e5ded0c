// Instrument grammar parser
// Single-pass, left-to-right parse of structure and draw lines into a flat
// grammar tree. Every line is self-describing (tag + fixed-arity fields),
// so no backtracking is ever needed. Malformed lines become recorded
// diagnostics, never failures.

use std::str::SplitWhitespace;

use crate::geometry::Transform;
use crate::instrument::types::{CirclePlane, DrawCommand};
use crate::trace::fields::{ensure_done, take_f64, take_vec3};
use crate::trace::{protocol, ParseError, TraceLine};

/// One node of the instrument parse tree, in stream order
#[derive(Debug, Clone, PartialEq)]
pub enum InstrNode {
    /// Instrument name from an INSTRUMENT line
    Name(String),

    /// Well-formed component declaration
    Component { name: String, transform: Transform },

    /// Component whose transform fields were malformed. The name survives
    /// so the builder can retain the component in position, flagged.
    InvalidComponent { name: String },

    /// Draw primitive scoped to the most recent component node. The parser
    /// never emits one before the first component.
    Draw(DrawCommand),
}

/// Parse output: the grammar tree plus recoverable diagnostics
#[derive(Debug, Clone, Default)]
pub struct InstrumentParse {
    /// Grammar tree in stream order
    pub nodes: Vec<InstrNode>,

    /// One entry per malformed line, in stream order
    pub errors: Vec<ParseError>,
}

/// Parse the merged structure+draw lines of one trace stream. The slice
/// must be in original stream order (see `TraceChannels::instrument_lines`).
pub fn parse_instrument(lines: &[TraceLine]) -> InstrumentParse {
    let mut parse = InstrumentParse::default();
    let mut named = false;
    let mut component_seen = false;

    for line in lines {
        let mut fields = line.text.split_whitespace();

        match fields.next() {
            Some(protocol::TAG_INSTRUMENT) => match parse_name(&mut fields) {
                Ok(name) if !named => {
                    named = true;
                    parse.nodes.push(InstrNode::Name(name));
                }
                Ok(_) => parse
                    .errors
                    .push(ParseError::new(line, "duplicate INSTRUMENT line")),
                Err(reason) => parse.errors.push(ParseError::new(line, reason)),
            },
            Some(protocol::TAG_COMPONENT) => {
                let Some(name) = fields.next() else {
                    parse
                        .errors
                        .push(ParseError::new(line, "missing component name"));
                    continue;
                };
                component_seen = true;
                match parse_placement(&mut fields) {
                    Ok(transform) => parse.nodes.push(InstrNode::Component {
                        name: name.to_string(),
                        transform,
                    }),
                    // A parseable name with malformed numeric fields still
                    // yields a node: the component is retained, flagged
                    // invalid, so component indices stay stable
                    Err(reason) => {
                        parse.nodes.push(InstrNode::InvalidComponent {
                            name: name.to_string(),
                        });
                        parse.errors.push(ParseError::new(line, reason));
                    }
                }
            }
            Some(protocol::TAG_DRAW) => {
                if !component_seen {
                    parse
                        .errors
                        .push(ParseError::new(line, "draw primitive before any component"));
                    continue;
                }
                match parse_draw(&mut fields) {
                    Ok(command) => parse.nodes.push(InstrNode::Draw(command)),
                    Err(reason) => parse.errors.push(ParseError::new(line, reason)),
                }
            }
            _ => parse
                .errors
                .push(ParseError::new(line, "not a structure or draw line")),
        }
    }

    parse
}

/// INSTRUMENT <name>
fn parse_name(fields: &mut SplitWhitespace) -> Result<String, String> {
    let name = fields
        .next()
        .ok_or_else(|| "missing instrument name".to_string())?;
    ensure_done(fields)?;
    Ok(name.to_string())
}

/// The six numeric placement fields of a component line:
/// COMPONENT <name> <x y z> <rx ry rz>
fn parse_placement(fields: &mut SplitWhitespace) -> Result<Transform, String> {
    let translation = take_vec3(fields, "position")?;
    let angles_deg = take_vec3(fields, "rotation")?;
    ensure_done(fields)?;
    Ok(Transform::from_euler_deg(angles_deg, translation))
}

/// DRAW <kind> <args...>
fn parse_draw(fields: &mut SplitWhitespace) -> Result<DrawCommand, String> {
    let kind = fields
        .next()
        .ok_or_else(|| "missing draw primitive kind".to_string())?;

    let command = match kind {
        "line" => {
            let start = take_vec3(fields, "line start")?;
            let end = take_vec3(fields, "line end")?;
            DrawCommand::Line { start, end }
        }
        "multiline" => {
            let count = take_count(fields)?;
            // The count comes from the producer, so it never sizes an
            // allocation; the list grows only as points actually parse
            let mut points = Vec::new();
            for i in 0..count {
                points.push(take_vec3(fields, &format!("multiline point {}", i + 1))?);
            }
            DrawCommand::Multiline { points }
        }
        "circle" => {
            let plane_tag = fields
                .next()
                .ok_or_else(|| "missing circle plane".to_string())?;
            let plane = CirclePlane::from_tag(plane_tag)
                .ok_or_else(|| format!("unknown circle plane `{plane_tag}`"))?;
            let center = take_vec3(fields, "circle center")?;
            let radius = take_f64(fields, "circle radius")?;
            DrawCommand::Circle {
                plane,
                center,
                radius,
            }
        }
        "sphere" => {
            let center = take_vec3(fields, "sphere center")?;
            let radius = take_f64(fields, "sphere radius")?;
            DrawCommand::Sphere { center, radius }
        }
        "box" => {
            let center = take_vec3(fields, "box center")?;
            let size = take_vec3(fields, "box size")?;
            DrawCommand::Box { center, size }
        }
        other => return Err(format!("unknown draw primitive `{other}`")),
    };

    ensure_done(fields)?;
    Ok(command)
}

/// The point-count prefix of a multiline
fn take_count(fields: &mut SplitWhitespace) -> Result<usize, String> {
    let raw = fields
        .next()
        .ok_or_else(|| "missing multiline point count".to_string())?;
    raw.parse::<usize>()
        .map_err(|_| format!("bad multiline point count `{raw}`"))
}
