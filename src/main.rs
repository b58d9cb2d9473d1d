//! Replays hand-landmark sessions through the constellation gesture controller.

use anyhow::{Context, Result};
use clap::Parser;
use constellation_gestures::{
    app::{AppConfig, InputSource, ReplayApp},
    config::{Config, EXAMPLE_CONFIG},
};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded session to replay (YAML)
    #[arg(short, long, conflicts_with = "synthetic")]
    session: Option<PathBuf>,

    /// Replay a generated demo session (default when no session is given)
    #[arg(long)]
    synthetic: bool,

    /// Seed for the generated session
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Render ticks per second
    #[arg(long, default_value = "60")]
    render_hz: u32,

    /// Replay at the recorded pace instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Write the replayed session to a file
    #[arg(long)]
    save_session: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Constellation gesture control");

    let gestures = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };
    gestures.validate().context("invalid configuration")?;

    let input = match args.session {
        Some(path) if !args.synthetic => InputSource::Session(path),
        _ => InputSource::Synthetic { seed: args.seed },
    };

    let config = AppConfig {
        input,
        render_hz: args.render_hz,
        realtime: args.realtime,
        save_session: args.save_session,
    };

    let mut app = ReplayApp::new(config, &gestures)?;
    let summary = app.run()?;
    println!("{summary}");

    Ok(())
}
