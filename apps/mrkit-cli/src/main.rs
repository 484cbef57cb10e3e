mod scenario;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glam::Vec2;
use mrkit_teleport::TeleportConfig;
use mrkit_teleport::angle::{classify_angle, is_neutral, stick_angle};
use tracing_subscriber::EnvFilter;

use crate::scenario::{Scenario, load_document};

#[derive(Parser)]
#[command(name = "mrkit-cli", about = "CLI tool for mrkit teleport and manipulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Show which stick band a thumbstick position selects
    Bands {
        #[arg(long, allow_hyphen_values = true)]
        x: f32,
        #[arg(long, allow_hyphen_values = true)]
        y: f32,
        /// Teleport config (YAML or JSON); defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Replay a scripted teleport scenario and print what happened
    Simulate {
        /// Scenario file (YAML or JSON)
        scenario: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("mrkit-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", mrkit_input::crate_info());
            println!("teleport: {}", mrkit_teleport::crate_info());
            println!("manipulation: {}", mrkit_manipulation::crate_info());
        }
        Commands::Bands { x, y, config } => {
            let config: TeleportConfig = match config {
                Some(path) => load_document(&path)?,
                None => TeleportConfig::default(),
            };
            if let Err(e) = config.validate() {
                anyhow::bail!("invalid teleport config: {e}");
            }
            let position = Vec2::new(x, y);
            if is_neutral(position, config.input_threshold) {
                println!("neutral (|stick| <= {})", config.input_threshold);
                return Ok(());
            }
            let angle = stick_angle(position, config.angle_offset);
            println!("angle={angle:.2} band={:?}", classify_angle(angle, &config));
        }
        Commands::Simulate { scenario } => {
            let parsed: Scenario = load_document(&scenario)?;
            tracing::info!(
                pointers = parsed.pointers.len(),
                steps = parsed.steps.len(),
                "running scenario"
            );
            let report = scenario::run(&parsed)?;

            for (step, pointer, transition) in &report.transitions {
                println!("step {step}: {pointer} {transition:?}");
            }
            println!("Events:");
            for event in &report.events {
                println!("  {event}");
            }
            let p = report.camera_position;
            println!(
                "Camera: position=({:.3}, {:.3}, {:.3}) yaw={:.1}",
                p.x, p.y, p.z, report.camera_yaw
            );
        }
    }

    Ok(())
}
