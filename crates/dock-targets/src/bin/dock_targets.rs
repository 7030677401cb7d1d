use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dock_targets::core::angular_error_degrees;
use dock_targets::io::{CornerFrame, DockTargetsConfig};
use log::LevelFilter;
use nalgebra::Quaternion;

#[cfg(not(feature = "tracing"))]
use log::info;

#[cfg(feature = "tracing")]
use tracing::info;

#[cfg(feature = "tracing")]
use dock_targets::core::init_tracing;
#[cfg(not(feature = "tracing"))]
use dock_targets::core::init_with_level;

#[derive(Debug, Parser)]
#[command(name = "dock-targets", version, about = "Dock target marker geometry tools")]
struct Cli {
    /// Log level for stderr output (off, error, warn, info, debug, trace).
    /// With the `tracing` feature, `RUST_LOG` overrides it when set.
    #[arg(long, global = true, default_value = "info", value_parser = parse_level_filter)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a marker table into 3D corner coordinates.
    Corners {
        /// JSON config with `unit`, `markers` and optional `dock_pose`.
        config: PathBuf,
        /// Write the report here instead of stdout (overrides `output_path`).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Map corners through the configured `dock_pose`.
        #[arg(long)]
        world: bool,
        /// Exit with an error if any marker spec is rejected.
        #[arg(long)]
        strict: bool,
    },
    /// Angular error in degrees between two orientation quaternions.
    Angle {
        /// First quaternion as `w,x,y,z` (must be unit norm).
        #[arg(long, allow_hyphen_values = true, value_parser = parse_quaternion)]
        q1: Quaternion<f64>,
        /// Second quaternion as `w,x,y,z` (must be unit norm).
        #[arg(long, allow_hyphen_values = true, value_parser = parse_quaternion)]
        q2: Quaternion<f64>,
    },
}

fn parse_level_filter(raw: &str) -> Result<LevelFilter, String> {
    raw.parse::<LevelFilter>()
        .map_err(|_| "expected one of off, error, warn, info, debug, trace".to_string())
}

fn parse_quaternion(raw: &str) -> Result<Quaternion<f64>, String> {
    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid quaternion component: {e}"))?;
    match parts.as_slice() {
        [w, x, y, z] => Ok(Quaternion::new(*w, *x, *y, *z)),
        _ => Err(format!(
            "expected 4 comma-separated components (w,x,y,z), got {}",
            parts.len()
        )),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    #[cfg(not(feature = "tracing"))]
    if let Err(err) = init_with_level(cli.log_level) {
        eprintln!("warning: logger not installed: {err}");
    }

    #[cfg(feature = "tracing")]
    init_tracing(cli.log_level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info"))]
fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Corners {
            config,
            output,
            world,
            strict,
        } => {
            let cfg = DockTargetsConfig::load_json(&config)?;
            info!(
                "loaded {} marker spec(s) from {}",
                cfg.markers.len(),
                config.display()
            );
            let frame = if world {
                CornerFrame::World
            } else {
                CornerFrame::Plate
            };
            let report = cfg.build_report(frame)?;

            match output.or_else(|| cfg.output_path()) {
                Some(path) => {
                    report.write_json(&path)?;
                    info!("report written to {}", path.display());
                }
                None => println!("{}", report.to_json_pretty()?),
            }

            if strict {
                report.ensure_complete()?;
            }
            Ok(())
        }
        Command::Angle { q1, q2 } => {
            println!("{:.6}", angular_error_degrees(&q1, &q2));
            Ok(())
        }
    }
}
