// Trace stream handling
// Protocol vocabulary and the four-channel line demultiplexer

pub mod demux;
pub(crate) mod fields;
pub mod protocol;

pub use demux::{demux, demux_from, ParseError, TraceChannels, TraceLine};
pub use protocol::{is_sentinel, PHASE_SENTINEL};
