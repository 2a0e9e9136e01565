// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! - `view`: render a raw depth file, with optional point markers
//! - `live`: stream from a sensor and save snapshots on demand

use depthcam::app::Session;
use depthcam::backends::sensor::open_sensor;
use depthcam::config::Config;
use depthcam::terminal;
use depthcam::viewer::render_file;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

/// Options of the `view` command
pub struct ViewOptions {
    pub file: PathBuf,
    pub markers: Vec<String>,
    pub output: Option<PathBuf>,
}

/// Options of the `live` command
pub struct LiveOptions {
    pub replay: Option<PathBuf>,
}

/// Render a depth file to the terminal, or to a PNG with `--output`
pub fn view(
    config: &Config,
    options: ViewOptions,
    quit: &AtomicBool,
) -> Result<(), Box<dyn std::error::Error>> {
    let viewer = render_file(config, &options.file, &options.markers)?;
    if viewer.marker_usage.is_some() {
        eprintln!("Wrong number of arguments: markers are given as COLOR X Y triples");
    }
    for e in &viewer.skipped {
        eprintln!("Skipped marker: {}", e);
    }
    let image = viewer.image;

    match options.output {
        Some(path) => {
            image.save(&path)?;
            println!("Saved: {}", path.display());
            Ok(())
        }
        None => terminal::run_viewer(image.as_rgb_image(), &display_name(&options.file), quit),
    }
}

/// Stream from the configured sensor until the user quits
pub fn live(
    config: &Config,
    options: LiveOptions,
    quit: &AtomicBool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(config)?;
    let mut sensor = open_sensor(config, options.replay.as_deref())?;

    println!("Using sensor: {}", sensor.name());
    sensor.start()?;

    let result = terminal::run_live(&mut session, sensor.as_mut(), quit);
    sensor.stop();

    let written = session.snapshots_written();
    if written > 0 {
        println!("Saved {} depth snapshot(s) to {}", written, config.snapshot_dir.display());
    }

    result
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
