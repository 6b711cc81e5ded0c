// Trace reading orchestration
// Runs the two stream phases end to end: structure and draw lines up to
// the sentinel, events to stream end, then scene assembly.

use crate::config::RunnerConfig;
use crate::instrument::{build_instrument, parse_instrument, InstrumentModel};
use crate::pipe::{PipeError, TracePipe};
use crate::scene::{self, SceneModel};
use crate::trace::{demux_from, is_sentinel, ParseError, TraceChannels, TraceLine};
use crate::trajectory::{build_trajectories, parse_events, TrajectorySet};

/// Phase-ordered reader over one running simulation
pub struct TraceReader {
    pipe: TracePipe,

    /// 1-based number of the next unread stream line
    next_line: usize,

    /// Event lines that arrived before the sentinel, held for the
    /// trajectory phase
    early_events: Vec<TraceLine>,
}

impl TraceReader {
    /// Spawn the configured simulation and wrap it for phase reads
    pub fn start(config: &RunnerConfig) -> Result<TraceReader, PipeError> {
        Ok(TraceReader {
            pipe: TracePipe::start(config)?,
            next_line: 1,
            early_events: Vec::new(),
        })
    }

    /// Read the stream up to the phase sentinel and build the instrument.
    /// Event lines that already arrived are held for `read_trajectories`.
    pub fn read_instrument(&mut self) -> Result<InstrumentModel, PipeError> {
        let text = self.pipe.await_phase_boundary()?;
        let mut channels = self.demux_phase(&text);
        self.early_events.append(&mut channels.events);

        let model = build_instrument(parse_instrument(&channels.instrument_lines()));
        log::info!(
            "instrument `{}`: {} components, {} diagnostics",
            model.instrument.name(),
            model.instrument.len(),
            model.diagnostics.len()
        );
        Ok(model)
    }

    /// Read the rest of the stream and build the trajectories. Call after
    /// `read_instrument` has returned.
    pub fn read_trajectories(&mut self) -> Result<TrajectorySet, PipeError> {
        self.pipe.await_completion()?;
        let text = self.pipe.drain_remaining();
        let channels = self.demux_phase(&text);

        let mut events = std::mem::take(&mut self.early_events);
        events.extend(channels.events);

        let mut set = build_trajectories(parse_events(&events));

        // The instrument was finalized at the sentinel; structure arriving
        // now can only be flagged
        for line in channels.structure.iter().chain(&channels.draw) {
            set.diagnostics
                .push(ParseError::new(line, "structure line after the instrument phase"));
        }

        log::info!(
            "{} trajectories, {} diagnostics",
            set.trajectories.len(),
            set.diagnostics.len()
        );
        Ok(set)
    }

    /// Abandon the run; the child is killed and reaped
    pub fn kill(&mut self) {
        self.pipe.kill();
    }

    /// Demux one phase of text, keeping stream-wide line numbers so every
    /// diagnostic points at the raw input
    fn demux_phase(&mut self, text: &str) -> TraceChannels {
        let channels = demux_from(text, self.next_line);
        self.next_line += text.lines().count();

        for line in &channels.comments {
            if !line.text.trim().is_empty() && !is_sentinel(&line.text) {
                log::info!("sim: {}", line.text);
            }
        }
        channels
    }
}

/// Run one configured simulation through both phases and assemble the
/// scene for the renderer
pub fn read_scene(config: &RunnerConfig) -> Result<SceneModel, PipeError> {
    let mut reader = TraceReader::start(config)?;
    let instrument = reader.read_instrument()?;
    let trajectories = reader.read_trajectories()?;
    Ok(scene::assemble(instrument, trajectories))
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    use tempfile::TempDir;

    /// Write an executable fake runner that ignores its arguments and
    /// prints a canned trace stream
    fn fake_runner(dir: &TempDir, stream: &str) -> PathBuf {
        let path = dir.path().join("fake-runner");
        let mut script = String::from("#!/bin/sh\n");
        for line in stream.lines() {
            script.push_str(&format!("printf '%s\\n' '{}'\n", line));
        }
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn config_for(runner: &PathBuf) -> RunnerConfig {
        let mut config = RunnerConfig::new("demo.instr");
        config.runner = runner.to_string_lossy().into_owned();
        config
    }

    #[test]
    fn test_read_scene_end_to_end() {
        let dir = TempDir::new().unwrap();
        let runner = fake_runner(
            &dir,
            "INSTRUMENT demo\n\
             COMPONENT origin 0 0 0 0 0 0\n\
             DRAW line 0 0 0 1 0 0\n\
             <<SENTINEL>>\n\
             EVENT p1 ENTER 0 0 0 0 0 1 0 1.0",
        );

        let scene = read_scene(&config_for(&runner)).unwrap();
        assert_eq!(scene.instrument.name(), "demo");
        assert_eq!(scene.instrument.len(), 1);
        assert_eq!(scene.instrument.components()[0].name, "origin");
        assert_eq!(scene.instrument.components()[0].draws.len(), 1);
        assert_eq!(scene.trajectories.len(), 1);
        assert_eq!(scene.trajectories[0].id(), "p1");
        assert!(scene.diagnostics.is_empty());
    }

    #[test]
    fn test_diagnostic_line_numbers_span_phases() {
        let dir = TempDir::new().unwrap();
        let runner = fake_runner(
            &dir,
            "INSTRUMENT demo\n\
             COMPONENT origin 0 0 0 0 0 0\n\
             DRAW line 0 0 0 1 0 0\n\
             <<SENTINEL>>\n\
             EVENT p1 ENTER 0 0 0 0 0 1 0 1.0\n\
             EVENT p1 WOBBLE 0 0 1 0 0 1 1 1.0",
        );

        let scene = read_scene(&config_for(&runner)).unwrap();
        assert_eq!(scene.diagnostics.len(), 1);
        // Sixth line of the whole stream, not of the second phase
        assert_eq!(scene.diagnostics[0].line, 6);
    }

    #[test]
    fn test_failing_runner_surfaces_before_parsing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake-runner");
        fs::write(&path, "#!/bin/sh\nprintf 'COMPONENT a 0 0 0 0 0 0\\n'\nexit 2\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        let mut reader = TraceReader::start(&config_for(&path)).unwrap();
        assert!(matches!(
            reader.read_instrument(),
            Err(PipeError::Process { .. })
        ));
    }

    #[test]
    fn test_event_before_sentinel_is_not_lost() {
        let dir = TempDir::new().unwrap();
        let runner = fake_runner(
            &dir,
            "COMPONENT origin 0 0 0 0 0 0\n\
             EVENT p1 ENTER 0 0 0 0 0 1 0 1.0\n\
             DRAW sphere 0 0 0 1\n\
             <<SENTINEL>>\n\
             EVENT p1 LEAVE 0 0 9 0 0 1 1 1.0",
        );

        let mut reader = TraceReader::start(&config_for(&runner)).unwrap();
        let model = reader.read_instrument().unwrap();
        assert_eq!(model.instrument.len(), 1);
        assert_eq!(model.instrument.components()[0].draws.len(), 1);

        let set = reader.read_trajectories().unwrap();
        assert_eq!(set.trajectories.len(), 1);
        assert_eq!(set.trajectories[0].len(), 2);
        assert!(set.diagnostics.is_empty());
    }

    #[test]
    fn test_structure_after_sentinel_is_flagged() {
        let dir = TempDir::new().unwrap();
        let runner = fake_runner(
            &dir,
            "COMPONENT origin 0 0 0 0 0 0\n\
             <<SENTINEL>>\n\
             COMPONENT late 0 0 1 0 0 0",
        );

        let mut reader = TraceReader::start(&config_for(&runner)).unwrap();
        let model = reader.read_instrument().unwrap();
        assert_eq!(model.instrument.len(), 1);

        let set = reader.read_trajectories().unwrap();
        assert_eq!(set.diagnostics.len(), 1);
        assert!(set.diagnostics[0]
            .reason
            .contains("after the instrument phase"));
    }
}
