// Trace stream demultiplexer
// Splits raw interleaved trace text into four logical channels while
// preserving each channel's internal order and original line numbers

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trace::protocol;

/// One raw line together with its 1-based position in the original stream.
/// The position survives demultiplexing so parse diagnostics can point at
/// the exact input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceLine {
    /// 1-based line number in the raw trace stream
    pub number: usize,

    /// The raw line text, tag included
    pub text: String,
}

impl TraceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        TraceLine {
            number,
            text: text.into(),
        }
    }
}

/// A recoverable diagnostic for one malformed trace line. Recorded and
/// carried alongside the built model; never fatal to the stream.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("line {line}: {reason}: `{text}`")]
pub struct ParseError {
    /// 1-based line number in the raw trace stream
    pub line: usize,

    /// The raw line text
    pub text: String,

    /// What made the line unusable
    pub reason: String,
}

impl ParseError {
    /// Diagnostic for the given line
    pub fn new(line: &TraceLine, reason: impl Into<String>) -> Self {
        ParseError {
            line: line.number,
            text: line.text.clone(),
            reason: reason.into(),
        }
    }
}

/// The four logical channels of a trace stream. Each channel keeps its
/// lines in producer emission order regardless of how the channels were
/// interleaved in the raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceChannels {
    /// INSTRUMENT and COMPONENT lines
    pub structure: Vec<TraceLine>,

    /// DRAW lines
    pub draw: Vec<TraceLine>,

    /// EVENT lines
    pub events: Vec<TraceLine>,

    /// COMMENT lines, the phase sentinel, and anything unrecognized
    pub comments: Vec<TraceLine>,
}

impl TraceChannels {
    /// Structure and draw lines merged back into original stream order.
    /// Draw primitives scope to the most recently declared component, so
    /// the instrument parser needs the two channels in their raw relative
    /// order, not one after the other.
    pub fn instrument_lines(&self) -> Vec<TraceLine> {
        let mut merged = Vec::with_capacity(self.structure.len() + self.draw.len());
        let mut s = self.structure.iter().peekable();
        let mut d = self.draw.iter().peekable();

        loop {
            match (s.peek(), d.peek()) {
                (Some(a), Some(b)) => {
                    if a.number <= b.number {
                        merged.push(s.next().unwrap().clone());
                    } else {
                        merged.push(d.next().unwrap().clone());
                    }
                }
                (Some(_), None) => merged.push(s.next().unwrap().clone()),
                (None, Some(_)) => merged.push(d.next().unwrap().clone()),
                (None, None) => break,
            }
        }

        merged
    }
}

/// Classify every line of raw trace text into exactly one channel, keyed on
/// the line's first whitespace-delimited token. Classification is total:
/// lines that match no known tag (including the sentinel and blank lines)
/// fall back to the comment channel rather than failing.
pub fn demux(text: &str) -> TraceChannels {
    demux_from(text, 1)
}

/// Like [`demux`], but numbering lines from `first_line` instead of 1.
/// Used for the event phase, whose text starts midway through the stream.
pub fn demux_from(text: &str, first_line: usize) -> TraceChannels {
    let mut channels = TraceChannels::default();

    for (offset, raw) in text.lines().enumerate() {
        let line = TraceLine::new(first_line + offset, raw);
        let tag = raw.split_whitespace().next().unwrap_or("");

        match tag {
            protocol::TAG_INSTRUMENT | protocol::TAG_COMPONENT => channels.structure.push(line),
            protocol::TAG_DRAW => channels.draw.push(line),
            protocol::TAG_EVENT => channels.events.push(line),
            _ => channels.comments.push(line),
        }
    }

    channels
}
