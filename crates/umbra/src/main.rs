//! umbra: headless runner for the observation-gated world
//!
//! Drives the simulation from the command line, either standing still for a
//! number of ticks or following a movement script, and prints every event.

mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use script::{Command, load_script};
use umbra_core::light::LightId;
use umbra_core::world::Pose;
use umbra_core::{HorrorEvent, SimConfig, Simulation, TickInput};

/// Walking speed used by `walk` script commands, units per time-unit
const WALK_SPEED: f32 = 3.0;

/// Run the umbra simulation headless
#[derive(Parser, Debug)]
#[command(name = "umbra")]
#[command(author, version, about = "Walk through a world that changes when you look away", long_about = None)]
struct Args {
    /// Seed for every random stream
    #[arg(short = 's', long = "seed", default_value_t = 0)]
    seed: u64,

    /// Maximum number of ticks to run
    #[arg(short = 't', long = "ticks", default_value_t = 600)]
    ticks: u64,

    /// Time-units per tick
    #[arg(long = "dt", default_value_t = 0.1)]
    dt: f32,

    /// JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Movement script; without one the player stands still
    #[arg(long = "script")]
    script: Option<PathBuf>,

    /// Print the final world snapshot as JSON
    #[arg(long = "snapshot")]
    snapshot: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = match &args.config {
        Some(path) => SimConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };

    let commands = match &args.script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };

    if !(args.dt.is_finite() && args.dt > 0.0) {
        anyhow::bail!("--dt must be a positive number, got {}", args.dt);
    }

    let mut runner = Runner::new(Simulation::new(config, args.seed), args.dt, args.ticks);
    info!("umbra seed {} dt {} max ticks {}", args.seed, args.dt, args.ticks);

    if commands.is_empty() {
        while runner.step() {}
    } else {
        for command in commands {
            if !runner.run(command) {
                break;
            }
        }
    }

    let sim = &runner.sim;
    info!(
        "stopped at t={:.2} after {} ticks: {}",
        sim.now(),
        sim.ticks(),
        sim.mode()
    );

    if args.snapshot {
        let json = serde_json::to_string_pretty(&sim.snapshot())
            .context("serializing world snapshot")?;
        println!("{}", json);
    }

    Ok(())
}

/// Turns script commands into ticks.
struct Runner {
    sim: Simulation,
    pose: Pose,
    dt: f32,
    budget: u64,
    lit: Vec<LightId>,
}

impl Runner {
    fn new(sim: Simulation, dt: f32, budget: u64) -> Self {
        Self {
            sim,
            pose: Pose::default(),
            dt,
            budget,
            lit: Vec::new(),
        }
    }

    /// Run one command; false once the run should stop.
    fn run(&mut self, command: Command) -> bool {
        match command {
            Command::Walk(distance) => {
                let mut remaining = distance.abs();
                let direction = distance.signum();
                while remaining > 0.0 {
                    let stride = (WALK_SPEED * self.dt).min(remaining);
                    self.pose.advance(stride * direction);
                    remaining -= stride;
                    if !self.step() {
                        return false;
                    }
                }
                true
            }
            Command::Turn(radians) => {
                self.pose.turn(radians);
                self.step()
            }
            Command::Wait(seconds) => {
                let mut remaining = seconds;
                while remaining > 0.0 {
                    remaining -= self.dt;
                    if !self.step() {
                        return false;
                    }
                }
                true
            }
            Command::Light(kind) => {
                let id = self.sim.add_light(kind, self.pose.position, true);
                self.lit.push(id);
                self.step()
            }
            Command::Douse => {
                match self.lit.pop() {
                    Some(id) => {
                        let doused = self
                            .sim
                            .lights_mut()
                            .source_mut(id)
                            .is_some_and(|light| light.extinguish());
                        if !doused {
                            warn!("light {:?} was already out", id);
                        }
                    }
                    None => warn!("nothing to douse"),
                }
                self.step()
            }
        }
    }

    /// Advance one tick and print its events; false once the run should stop.
    fn step(&mut self) -> bool {
        if self.sim.ticks() >= self.budget {
            return false;
        }
        let report = self.sim.tick(TickInput::from_pose(self.pose, self.dt));
        for event in self.sim.drain_events() {
            print_event(report.now, &event);
        }
        !report.mode.is_over()
    }
}

fn print_event(now: f64, event: &HorrorEvent) {
    let marker = if event.is_terminal() {
        "!!"
    } else if event.is_beneficial() {
        "++"
    } else {
        "--"
    };
    println!("[{:>8.2}] {} {:?}", now, marker, event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::config::LightConfig;

    fn runner(budget: u64) -> Runner {
        let config = SimConfig {
            lights: LightConfig::calm(),
            ..SimConfig::default()
        };
        Runner::new(Simulation::new(config, 7), 0.1, budget)
    }

    #[test]
    fn test_step_leaves_no_backlog() {
        let mut runner = runner(2000);
        for _ in 0..40 {
            if !runner.run(Command::Walk(10.0)) || !runner.run(Command::Turn(1.0)) {
                break;
            }
        }
        assert!(runner.sim.ticks() > 0);
        assert!(runner.sim.drain_events().is_empty());
    }

    #[test]
    fn test_budget_stops_run() {
        let mut runner = runner(5);
        assert!(!runner.run(Command::Wait(10.0)));
        assert_eq!(runner.sim.ticks(), 5);
    }
}
