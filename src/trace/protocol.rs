// Trace protocol vocabulary
// The line-tag contract with the producing simulation process. The producer
// emits one record per line; the first whitespace-delimited token decides
// the channel. Everything here mirrors the producer and must stay in sync
// with real captured output.
//
// Structure phase (before the sentinel):
//   INSTRUMENT <name>
//   COMPONENT <name> <x> <y> <z> <rx> <ry> <rz>     rotation in degrees, XYZ
//   DRAW line <x1 y1 z1> <x2 y2 z2>
//   DRAW multiline <n> <x1 y1 z1> ... <xn yn zn>
//   DRAW circle <xy|xz|yz> <cx cy cz> <r>
//   DRAW sphere <cx cy cz> <r>
//   DRAW box <cx cy cz> <sx sy sz>
//   <<SENTINEL>>
// Event phase (after the sentinel, until process exit):
//   EVENT <particle-id> <ENTER|SCATTER|ABSORB|LEAVE> <x y z> <vx vy vz> <t> <p>
// Anywhere:
//   COMMENT <free text>                             also the fallback channel

/// Tag of the optional structure line naming the instrument
pub const TAG_INSTRUMENT: &str = "INSTRUMENT";

/// Tag of a component declaration line
pub const TAG_COMPONENT: &str = "COMPONENT";

/// Tag of a draw primitive line
pub const TAG_DRAW: &str = "DRAW";

/// Tag of a particle event line
pub const TAG_EVENT: &str = "EVENT";

/// Tag of an explicit comment line
pub const TAG_COMMENT: &str = "COMMENT";

/// Distinguished line marking the end of the structure+draw phase. The
/// producer emits it exactly once, after the last draw primitive.
pub const PHASE_SENTINEL: &str = "<<SENTINEL>>";

/// True when the line is the phase sentinel (surrounding whitespace ignored)
pub fn is_sentinel(line: &str) -> bool {
    line.trim() == PHASE_SENTINEL
}
