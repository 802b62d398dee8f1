//! VexRoute command line tool
//!
//! Headless access to the route engine: generate motion code from a saved
//! route, play the simulation with a fixed frame step, sample poses, mirror
//! a route for the other alliance, and show build and route information.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use vexroute::{
    init_json_logging, init_logging, planner_from_config, pose_on_field, Config, EmitterVariant,
    PlannerState, StartOutcome, BUILD_DATE, VERSION,
};

#[derive(Parser, Debug)]
#[command(name = "vexroute", version, about = "VEX robot route planner")]
struct Cli {
    /// Config file (.toml or .json); defaults to the platform config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log as JSON lines instead of text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate motion code for a route file
    Emit {
        route: PathBuf,
        /// Override the configured emitter variant
        #[arg(long)]
        variant: Option<EmitterVariant>,
        /// Override the configured decimal precision
        #[arg(long)]
        precision: Option<u8>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Play the route simulation and print the robot pose per frame
    Simulate {
        route: PathBuf,
        /// Simulated milliseconds per frame (defaults to the config)
        #[arg(long)]
        step_ms: Option<f64>,
        /// Print only every Nth frame
        #[arg(long, default_value_t = 1)]
        every: usize,
    },
    /// Print the pose at one or more progress values in [0, 1]
    Sample {
        route: PathBuf,
        #[arg(required = true)]
        progress: Vec<f64>,
    },
    /// Show version, config location and optional route statistics
    Info { route: Option<PathBuf> },
    /// Mirror a route across a field axis
    Mirror {
        route: PathBuf,
        #[arg(long, value_enum)]
        axis: Axis,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Axis {
    X,
    Y,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.log_json {
        init_json_logging()?;
    } else {
        init_logging()?;
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Emit {
            route,
            variant,
            precision,
            output,
        } => {
            let mut config = config;
            if let Some(variant) = variant {
                config.editor.variant = variant;
            }
            if let Some(precision) = precision {
                config.editor.precision = precision;
                config.validate().context("Invalid --precision")?;
            }
            let planner = open_route(&config, &route)?;
            write_output(output.as_deref(), &planner.code_text())
        }
        Command::Simulate {
            route,
            step_ms,
            every,
        } => {
            let step = step_ms.unwrap_or(config.simulation.frame_interval_ms);
            if !(step > 0.0) {
                bail!("--step-ms must be positive");
            }
            let mut planner = open_route(&config, &route)?;
            simulate(&mut planner, step, every.max(1))
        }
        Command::Sample { route, progress } => {
            let planner = open_route(&config, &route)?;
            sample(&planner, &progress)
        }
        Command::Info { route } => info_command(&config, cli.config.as_deref(), route.as_deref()),
        Command::Mirror {
            route,
            axis,
            output,
        } => {
            let mut planner = open_route(&config, &route)?;
            match axis {
                Axis::X => planner.mirror_x(),
                Axis::Y => planner.mirror_y(),
            }
            let mut json = planner.export_json()?;
            json.push('\n');
            write_output(output.as_deref(), &json)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default().context("Failed to load default config")?,
    };
    Ok(config)
}

fn open_route(config: &Config, route: &Path) -> anyhow::Result<PlannerState> {
    let mut planner = planner_from_config(config)?;
    planner
        .load_from_file(route)
        .with_context(|| format!("Failed to open route {}", route.display()))?;
    Ok(planner)
}

fn write_output(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn simulate(planner: &mut PlannerState, step_ms: f64, every: usize) -> anyhow::Result<()> {
    match planner.start_simulation() {
        StartOutcome::Started | StartOutcome::AlreadyRunning => {}
        StartOutcome::CannotRun => bail!("Route has no duration to simulate"),
    }

    println!("frame\ttime_ms\tprogress\tx\ty\theading");
    let mut frame = 0usize;
    let mut now = 0.0;
    while let Some(token) = planner.clock_mut().scheduler_mut().next_frame() {
        let Some(update) = planner.on_frame(token, now) else {
            break;
        };
        if frame % every == 0 || update.hide_agent {
            let pose = vexroute::planner::sample_at(planner.waypoints(), update.progress);
            if let Some(pose) = pose {
                let (field, heading) = pose_on_field(planner.transform(), &pose);
                println!(
                    "{}\t{:.0}\t{:.4}\t{:.2}\t{:.2}\t{:.1}",
                    frame, now, update.progress, field.x, field.y, heading
                );
            }
        }
        frame += 1;
        now += step_ms;
    }
    debug!(frames = frame, "simulation played");
    Ok(())
}

fn sample(planner: &PlannerState, progress: &[f64]) -> anyhow::Result<()> {
    for &p in progress {
        let Some(pose) = vexroute::planner::sample_at(planner.waypoints(), p) else {
            bail!("Route has no path to sample");
        };
        let (field, heading) = pose_on_field(planner.transform(), &pose);
        println!(
            "progress={} x={:.2} y={:.2} heading={:.1} segment={}",
            p, field.x, field.y, heading, pose.segment_index
        );
    }
    Ok(())
}

fn info_command(
    config: &Config,
    config_path: Option<&Path>,
    route: Option<&Path>,
) -> anyhow::Result<()> {
    println!("vexroute {VERSION} (built {BUILD_DATE})");
    match config_path {
        Some(path) => println!("config: {}", path.display()),
        None => match Config::default_path() {
            Ok(path) => println!("config: {} (default)", path.display()),
            Err(e) => println!("config: unavailable ({e})"),
        },
    }
    println!(
        "emitter: {} precision={}",
        config.editor.variant, config.editor.precision
    );

    if let Some(route) = route {
        let planner = open_route(config, route)?;
        let ppi = planner.transform().pixels_per_inch();
        let length_in = if ppi > 0.0 {
            planner.total_length_px() / ppi
        } else {
            0.0
        };
        println!("waypoints: {}", planner.waypoints().len());
        println!("length: {length_in:.2} in");
        println!("duration: {} ms", planner.total_duration_ms());
    }
    Ok(())
}
