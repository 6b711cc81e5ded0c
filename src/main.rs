// traceview CLI shell
// Launches one traced simulation run and emits the assembled scene as
// JSON on stdout. Argument handling stays here at the boundary; the
// library does the actual work.

use std::env;
use std::path::Path;

use anyhow::{Context, Result};

use traceview::{read_scene, RunnerConfig};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(config) = parse_args(&args) else {
        eprintln!("Usage: {} <instrument-file> [-n <count>] [options...]", args[0]);
        std::process::exit(1);
    };

    if !Path::new(&config.instrument).exists() {
        eprintln!("No such instrument file: {}", config.instrument);
        std::process::exit(1);
    }

    let scene = read_scene(&config)
        .with_context(|| format!("trace run failed: {}", config.command_line().join(" ")))?;

    log::info!(
        "scene ready: {} components, {} trajectories, {} diagnostics, camera {:?}",
        scene.instrument.len(),
        scene.trajectories.len(),
        scene.diagnostics.len(),
        scene.camera
    );
    for diagnostic in &scene.diagnostics {
        log::warn!("{}", diagnostic);
    }

    let json = serde_json::to_string_pretty(&scene).context("serializing scene")?;
    println!("{}", json);

    Ok(())
}

/// `<instrument-file> [-n <count>] [options...]`. Unrecognized arguments
/// pass through to the runner verbatim. None means misuse.
fn parse_args(args: &[String]) -> Option<RunnerConfig> {
    let mut rest = args.iter().skip(1);
    let instrument = rest.next()?;
    let mut config = RunnerConfig::from_env(instrument.clone());

    while let Some(arg) = rest.next() {
        if arg == "-n" {
            config.particle_count = rest.next()?.parse().ok()?;
        } else {
            config.sim_options.push(arg.clone());
        }
    }
    Some(config)
}
