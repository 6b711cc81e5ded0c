// Instrument builder
// One pure walk over the parse tree. Components land in declaration order,
// draws attach to the component most recently declared before them.

use crate::instrument::parse::{InstrNode, InstrumentParse};
use crate::instrument::types::{Component, Instrument};
use crate::trace::ParseError;

/// Name used when the stream never declared one
const UNNAMED_INSTRUMENT: &str = "instrument";

/// A built instrument together with everything the parse had to flag
#[derive(Debug, Clone)]
pub struct InstrumentModel {
    /// The ordered component sequence
    pub instrument: Instrument,

    /// Recoverable diagnostics accumulated while parsing the stream
    pub diagnostics: Vec<ParseError>,
}

/// Fold a parse tree into an instrument. Total: every tree produced by
/// `parse_instrument` builds, whatever its diagnostics say.
pub fn build_instrument(parse: InstrumentParse) -> InstrumentModel {
    let InstrumentParse { nodes, errors } = parse;

    let mut name: Option<String> = None;
    let mut components: Vec<Component> = Vec::new();

    for node in nodes {
        match node {
            InstrNode::Name(n) => name = Some(n),
            InstrNode::Component { name, transform } => {
                components.push(Component::new(name, transform));
            }
            InstrNode::InvalidComponent { name } => {
                components.push(Component::invalid(name));
            }
            InstrNode::Draw(command) => {
                // The parser never emits a draw before the first component
                if let Some(component) = components.last_mut() {
                    component.draws.push(command);
                }
            }
        }
    }

    InstrumentModel {
        instrument: Instrument::new(
            name.unwrap_or_else(|| UNNAMED_INSTRUMENT.to_string()),
            components,
        ),
        diagnostics: errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::parse::parse_instrument;
    use crate::instrument::types::DrawCommand;
    use crate::trace::TraceLine;

    fn build(text: &str) -> InstrumentModel {
        let lines: Vec<TraceLine> = text
            .lines()
            .enumerate()
            .map(|(i, l)| TraceLine::new(i + 1, l))
            .collect();
        build_instrument(parse_instrument(&lines))
    }

    #[test]
    fn test_single_component_with_draw() {
        let model = build("COMPONENT origin 0 0 0 0 0 0\nDRAW line 0 0 0 0 0 1");
        assert!(model.diagnostics.is_empty());

        let instrument = &model.instrument;
        assert_eq!(instrument.len(), 1);
        let origin = &instrument.components()[0];
        assert_eq!(origin.name, "origin");
        assert!(origin.valid);
        assert_eq!(origin.draws.len(), 1);
    }

    #[test]
    fn test_components_keep_declaration_order() {
        let model = build(
            "COMPONENT source 0 0 0 0 0 0\n\
             COMPONENT guide 0 0 1 0 0 0\n\
             COMPONENT monitor 0 0 5 0 0 0\n\
             COMPONENT detector 0 0 9 0 0 0",
        );
        let names: Vec<&str> = model
            .instrument
            .components()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["source", "guide", "monitor", "detector"]);
    }

    #[test]
    fn test_draws_scope_to_most_recent_component() {
        let model = build(
            "COMPONENT a 0 0 0 0 0 0\n\
             DRAW sphere 0 0 0 1\n\
             COMPONENT b 0 0 1 0 0 0\n\
             DRAW line 0 0 0 1 0 0\n\
             DRAW line 0 0 0 0 1 0",
        );
        let components = model.instrument.components();
        assert_eq!(components[0].draws.len(), 1);
        assert_eq!(components[1].draws.len(), 2);
    }

    #[test]
    fn test_invalid_component_retained_in_order() {
        let model = build(
            "COMPONENT a 0 0 0 0 0 0\n\
             COMPONENT broken 0 0 oops 0 0 0\n\
             COMPONENT c 0 0 2 0 0 0",
        );
        let components = model.instrument.components();
        assert_eq!(components.len(), 3);
        assert_eq!(components[1].name, "broken");
        assert!(!components[1].valid);
        assert!(components[0].valid && components[2].valid);
        assert_eq!(model.diagnostics.len(), 1);
    }

    #[test]
    fn test_draws_attach_to_invalid_component_too() {
        let model = build(
            "COMPONENT broken 0 0 oops 0 0 0\n\
             DRAW sphere 0 0 0 1",
        );
        let components = model.instrument.components();
        assert!(!components[0].valid);
        assert!(matches!(
            components[0].draws[0],
            DrawCommand::Sphere { .. }
        ));
    }

    #[test]
    fn test_instrument_name_from_stream() {
        let model = build("INSTRUMENT beamline\nCOMPONENT a 0 0 0 0 0 0");
        assert_eq!(model.instrument.name(), "beamline");
    }

    #[test]
    fn test_missing_instrument_name_falls_back() {
        let model = build("COMPONENT a 0 0 0 0 0 0");
        assert_eq!(model.instrument.name(), UNNAMED_INSTRUMENT);
    }

    #[test]
    fn test_bad_line_does_not_disturb_build() {
        let model = build(
            "COMPONENT a 0 0 0 0 0 0\n\
             DRAW line nonsense\n\
             COMPONENT b 0 0 1 0 0 0\n\
             DRAW sphere 0 0 0 0.5",
        );
        assert_eq!(model.diagnostics.len(), 1);
        assert_eq!(model.diagnostics[0].line, 2);
        let components = model.instrument.components();
        assert_eq!(components.len(), 2);
        assert!(components[0].draws.is_empty());
        assert_eq!(components[1].draws.len(), 1);
    }

    #[test]
    fn test_empty_stream_builds_empty_instrument() {
        let model = build("");
        assert!(model.instrument.is_empty());
        assert!(model.diagnostics.is_empty());
    }
}
