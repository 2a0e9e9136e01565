// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use depthcam::config::Config;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

mod cli;

#[derive(Parser)]
#[command(name = "depthcam")]
#[command(about = "Depth file viewer and live snapshot tool for Kinect depth cameras")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    /// Configuration file (default: ~/.config/depthcam/config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a raw depth file as a grayscale image
    View {
        /// Raw depth file (little-endian u16 samples, no header)
        file: PathBuf,

        /// Point markers as COLOR X Y triples, e.g. red 320 240 "#00ff00" 10 10
        #[arg(allow_negative_numbers = true)]
        markers: Vec<String>,

        /// Frame width of the file
        #[arg(long)]
        width: Option<u32>,

        /// Frame height of the file
        #[arg(long)]
        height: Option<u32>,

        /// Write a PNG instead of opening the terminal viewer
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stream from a depth camera and take depth snapshots
    Live {
        /// Depth camera index
        #[arg(short, long)]
        device: Option<usize>,

        /// Replay a raw depth file instead of using hardware
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Frame rate of the replay
        #[arg(long)]
        fps: Option<u32>,

        /// Downsampling factor of the depth view
        #[arg(long)]
        reduce: Option<u32>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=depthcam=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    // SIGINT outside raw mode (or from another process)
    let quit = Arc::new(AtomicBool::new(false));
    let quit_handler = quit.clone();
    ctrlc::set_handler(move || {
        quit_handler.store(true, Ordering::SeqCst);
    })?;

    match cli.command {
        Commands::View {
            file,
            markers,
            width,
            height,
            output,
        } => {
            if let Some(width) = width {
                config.frame_width = width;
            }
            if let Some(height) = height {
                config.frame_height = height;
            }
            config.validate()?;
            cli::view(
                &config,
                cli::ViewOptions {
                    file,
                    markers,
                    output,
                },
                &quit,
            )
        }
        Commands::Live {
            device,
            replay,
            fps,
            reduce,
        } => {
            if let Some(device) = device {
                config.device_index = device;
            }
            if let Some(fps) = fps {
                config.replay_fps = fps;
            }
            if let Some(reduce) = reduce {
                config.reduction_factor = reduce;
            }
            config.validate()?;
            cli::live(&config, cli::LiveOptions { replay }, &quit)
        }
    }
}
