// Runner configuration
// Explicit settings for launching one traced simulation run. Environment
// overrides are resolved once at construction, never read ad hoc later.

use std::env;

use serde::{Deserialize, Serialize};

/// Runner executable used when nothing overrides it
pub const DEFAULT_RUNNER: &str = "simrun";

/// Environment variable naming an alternative runner executable
pub const RUNNER_ENV_VAR: &str = "TRACEVIEW_RUNNER";

/// Particle count used when the caller does not pass one
pub const DEFAULT_PARTICLE_COUNT: u64 = 300;

/// Everything needed to launch one traced simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Runner executable name or path
    pub runner: String,

    /// Instrument definition file handed to the runner
    pub instrument: String,

    /// Number of particles to simulate
    pub particle_count: u64,

    /// Extra options passed through to the runner verbatim
    pub sim_options: Vec<String>,
}

impl RunnerConfig {
    /// Config for one instrument file, defaults everywhere else
    pub fn new(instrument: impl Into<String>) -> Self {
        RunnerConfig {
            runner: DEFAULT_RUNNER.to_string(),
            instrument: instrument.into(),
            particle_count: DEFAULT_PARTICLE_COUNT,
            sim_options: Vec::new(),
        }
    }

    /// Same, with the runner taken from `TRACEVIEW_RUNNER` when set.
    /// A set but empty variable is ignored.
    pub fn from_env(instrument: impl Into<String>) -> Self {
        Self::with_runner_override(instrument, env::var(RUNNER_ENV_VAR).ok())
    }

    /// Resolution behind `from_env`: applies an already-read environment
    /// value, ignoring unset or empty
    fn with_runner_override(instrument: impl Into<String>, runner: Option<String>) -> Self {
        let mut config = Self::new(instrument);
        if let Some(runner) = runner.filter(|r| !r.is_empty()) {
            log::debug!("runner overridden from environment: {}", runner);
            config.runner = runner;
        }
        config
    }

    /// Arguments handed to the runner: instrument file, trace mode,
    /// particle count, then the pass-through options
    pub fn runner_args(&self) -> Vec<String> {
        let mut args = vec![
            self.instrument.clone(),
            "--trace".to_string(),
            "-n".to_string(),
            self.particle_count.to_string(),
        ];
        args.extend(self.sim_options.iter().cloned());
        args
    }

    /// The full command line, runner first. Used for logging and error
    /// context; never empty.
    pub fn command_line(&self) -> Vec<String> {
        let mut argv = vec![self.runner.clone()];
        argv.extend(self.runner_args());
        argv
    }
}
