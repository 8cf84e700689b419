//! Command implementations for myohapticctl

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use clap::{Args, Subcommand};
use myohaptic_controller::prelude::*;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::CliError;
use crate::sim::{EffortProfile, SimulatedRig, TorqueLog};

/// A scheduled write to the `Activate` signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeSwitch {
    pub selector: u32,
    pub at_s: f64,
}

impl FromStr for ModeSwitch {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CliError::InvalidSwitch(s.to_string());
        let (mode, at) = s.split_once('@').ok_or_else(invalid)?;
        let selector = mode.trim().parse::<u32>().map_err(|e| {
            debug!(error = %e, "mode switch selector rejected");
            invalid()
        })?;
        let at_s = at.trim().parse::<f64>().map_err(|e| {
            debug!(error = %e, "mode switch time rejected");
            invalid()
        })?;
        if !at_s.is_finite() || at_s < 0.0 {
            return Err(invalid());
        }
        Ok(Self { selector, at_s })
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Controller configuration file (JSON); defaults are used when omitted
    #[arg(short, long, env = "MYOHAPTIC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Simulated duration in seconds
    #[arg(short, long, default_value_t = 10.0)]
    pub duration: f64,

    /// Initial mode selector, overriding the configuration
    #[arg(short, long)]
    pub mode: Option<u32>,

    /// Tick period in microseconds, overriding the configuration
    #[arg(long)]
    pub period_us: Option<u32>,

    /// Mode changes as MODE@SECONDS, applied through the telemetry board
    #[arg(short, long = "switch", value_name = "MODE@SECONDS")]
    pub switches: Vec<ModeSwitch>,

    /// Peak muscle effort of the synthetic EMG, in [0, 1]
    #[arg(long, default_value_t = 0.8)]
    pub effort: f32,

    /// Length of one contract/relax cycle in seconds
    #[arg(long, default_value_t = 4.0)]
    pub cycle: f64,

    /// Seed for the synthetic EMG noise
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Sleep one tick period between ticks
    #[arg(long)]
    pub realtime: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the default configuration
    Default,

    /// Parse and validate a configuration file
    Validate {
        /// Configuration file (JSON)
        path: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<ControllerConfig, CliError> {
    match path {
        Some(path) => {
            let config = ControllerConfig::from_path(path)?;
            info!(path = %path.display(), "Loaded controller configuration");
            Ok(config)
        }
        None => Ok(ControllerConfig::default()),
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run(args: &RunArgs, json_output: bool) -> Result<(), CliError> {
    if !args.duration.is_finite() || args.duration <= 0.0 {
        return Err(CliError::InvalidDuration(format!(
            "{} s must be positive",
            args.duration
        )));
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(mode) = args.mode {
        config.initial_mode = mode;
    }
    if let Some(period_us) = args.period_us {
        config.period_us = period_us;
    }

    let profile = EffortProfile {
        peak: args.effort.clamp(0.0, 1.0),
        cycle_s: args.cycle,
    };
    let rig = SimulatedRig::new(args.seed, profile);
    let mut control = ControlLoop::new(&config, rig, TorqueLog::default())?;

    let mut switches = args.switches.clone();
    switches.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
    let mut pending = switches.into_iter().peekable();

    let duration_us = args.duration * 1e6;
    info!(
        duration_s = args.duration,
        period_us = config.period_us,
        mode = config.initial_mode,
        "Starting simulated run"
    );

    let mut last = None;
    loop {
        #[allow(clippy::cast_precision_loss, reason = "simulated time stays far below 2^52 us")]
        let now_us = control.context().timestamp_us as f64;
        if now_us >= duration_us {
            break;
        }

        while let Some(switch) = pending.next_if(|s| s.at_s * 1e6 <= now_us) {
            #[allow(clippy::cast_precision_loss, reason = "selectors are small integers")]
            let value = switch.selector as f32;
            match control.telemetry().write(Signal::Activate, value) {
                Ok(()) => info!(selector = switch.selector, at_s = switch.at_s, "Mode switch applied"),
                Err(e) => warn!(error = %e, "Mode switch rejected"),
            }
        }

        let report = control.tick();
        control.sensor_mut().step(report.torque_nm, report.dt);
        last = Some(report);

        if args.realtime {
            let period = TickTimer::period_us(control.inputs().as_ref());
            std::thread::sleep(Duration::from_micros(u64::from(period)));
        }
    }

    let counters = control.counters().snapshot();
    let board = control.telemetry().snapshot();
    let torque = *control.actuator();
    let rig = control.sensor();

    if json_output {
        let signals: serde_json::Map<String, serde_json::Value> = board
            .iter()
            .map(|(name, value)| ((*name).to_string(), json!(value)))
            .collect();
        return print_json(&json!({
            "success": true,
            "simulated_s": rig.time_s(),
            "final_mode": last.map(|r| r.mode.as_str()),
            "phase": last.map(|r| r.phase.as_str()),
            "torque": {
                "last_nm": torque.last_nm,
                "peak_abs_nm": torque.peak_abs_nm,
                "mean_abs_nm": torque.mean_abs_nm(),
            },
            "paddle_deg": rig.paddle().angle_deg(),
            "effort": rig.effort(),
            "counters": counters_json(&counters),
            "signals": signals,
        }));
    }

    println!("Simulated {:.3} s ({} ticks)", rig.time_s(), counters.total_ticks);
    if let Some(report) = last {
        println!("  Mode:        {} (selector {})", report.mode, report.selector);
        println!("  Calibration: {}", report.phase.as_str());
    }
    println!(
        "  Torque:      last {:.6} N.m, peak {:.6} N.m, mean |t| {:.6} N.m",
        torque.last_nm,
        torque.peak_abs_nm,
        torque.mean_abs_nm()
    );
    println!(
        "  Paddle:      {:.2} deg at effort {:.2}",
        rig.paddle().angle_deg(),
        rig.effort()
    );
    println!(
        "  Faults:      {} (uncalibrated {}, timing {}, unknown mode {}, torque {}, sample {})",
        counters.total_faults(),
        counters.uncalibrated_ticks,
        counters.invalid_timing_ticks,
        counters.unknown_mode_ticks,
        counters.non_finite_torque_ticks,
        counters.non_finite_sample_ticks
    );
    println!("  Mode switches: {}", counters.mode_switches);
    println!("Signals:");
    for (name, value) in board {
        println!("  {name:<26} {value:>12.6}");
    }
    Ok(())
}

fn counters_json(counters: &CounterSnapshot) -> serde_json::Value {
    json!({
        "total_ticks": counters.total_ticks,
        "uncalibrated_ticks": counters.uncalibrated_ticks,
        "invalid_timing_ticks": counters.invalid_timing_ticks,
        "unknown_mode_ticks": counters.unknown_mode_ticks,
        "non_finite_torque_ticks": counters.non_finite_torque_ticks,
        "non_finite_sample_ticks": counters.non_finite_sample_ticks,
        "mode_switches": counters.mode_switches,
        "total_faults": counters.total_faults(),
    })
}

pub fn config(cmd: &ConfigCommands, json_output: bool) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Default => {
            println!("{}", ControllerConfig::default().to_json_pretty()?);
            Ok(())
        }
        ConfigCommands::Validate { path } => {
            let config = ControllerConfig::from_path(path)?;
            if json_output {
                print_json(&json!({
                    "success": true,
                    "path": path.display().to_string(),
                    "period_us": config.period_us,
                    "initial_mode": config.initial_mode,
                }))
            } else {
                println!(
                    "{} is valid (period {} us, initial mode {})",
                    path.display(),
                    config.period_us,
                    config.initial_mode
                );
                Ok(())
            }
        }
    }
}

pub fn signals(json_output: bool) -> Result<(), CliError> {
    if json_output {
        let list: Vec<serde_json::Value> = Signal::ALL
            .iter()
            .map(|s| {
                json!({
                    "name": s.name(),
                    "writable": s.access() == Access::ReadWrite,
                })
            })
            .collect();
        return print_json(&json!({ "success": true, "signals": list }));
    }

    for signal in Signal::ALL {
        let access = match signal.access() {
            Access::ReadOnly => "ro",
            Access::ReadWrite => "rw",
        };
        println!("{access}  {}", signal.name());
    }
    Ok(())
}
