// Instrument pipeline
// Grammar parse and model build for the static apparatus geometry

pub mod build;
pub mod parse;
pub mod types;

pub use build::{build_instrument, InstrumentModel};
pub use parse::{parse_instrument, InstrNode, InstrumentParse};
pub use types::{CirclePlane, Component, DrawCommand, Instrument};
