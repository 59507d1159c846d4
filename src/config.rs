use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::constants::*;

pub const CONFIG_ENV_VAR: &str = "ORBITAL_LAUNCH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    pub target_altitude: f64,
    pub turn_start_altitude: f64,
    pub turn_end_altitude: f64,
    pub heading: f64,
    pub turn_hysteresis: f64,
    pub approach_fraction: f64,
    pub approach_throttle: f64,
    pub exit_atmosphere_altitude: f64,
    pub standard_gravity: f64,
    pub lead_time: f64,
    pub fine_tune_fraction: f64,
    pub fine_tune_throttle: f64,
    pub complete_fraction: f64,
    pub max_auto_stage: i32,
    pub stage_stats_every: u64,
    pub poll_interval_ms: u64,
    pub timeout_secs: Option<u64>,
    pub countdown_secs: u32,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub step_seconds: f64,
    pub warp_step_seconds: f64,
    pub altitude_noise: f64,
    pub seed: u64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        LaunchConfig {
            target_altitude: TARGET_ALTITUDE,
            turn_start_altitude: TURN_START_ALTITUDE,
            turn_end_altitude: TURN_END_ALTITUDE,
            heading: LAUNCH_HEADING,
            turn_hysteresis: TURN_HYSTERESIS,
            approach_fraction: APPROACH_FRACTION,
            approach_throttle: APPROACH_THROTTLE,
            exit_atmosphere_altitude: EXIT_ATMOSPHERE_ALTITUDE,
            standard_gravity: STANDARD_GRAVITY,
            lead_time: BURN_LEAD_TIME,
            fine_tune_fraction: FINE_TUNE_FRACTION,
            fine_tune_throttle: FINE_TUNE_THROTTLE,
            complete_fraction: ORBIT_COMPLETE_FRACTION,
            max_auto_stage: MAX_AUTO_STAGE,
            stage_stats_every: STAGE_STATS_EVERY,
            poll_interval_ms: POLL_INTERVAL_MS,
            timeout_secs: None,
            countdown_secs: COUNTDOWN_SECS,
            simulation: SimulationConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            step_seconds: SIMULATION_STEP,
            warp_step_seconds: WARP_STEP,
            altitude_noise: 0.0,
            seed: 42,
        }
    }
}

impl LaunchConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: LaunchConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`]. Defaults apply only when
    /// the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_altitude > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "target_altitude must be positive, got {}",
                self.target_altitude
            )));
        }
        if !(self.turn_start_altitude < self.turn_end_altitude) {
            return Err(ConfigError::Invalid(format!(
                "turn window is empty: start {} m, end {} m",
                self.turn_start_altitude, self.turn_end_altitude
            )));
        }
        for (name, fraction) in [
            ("approach_fraction", self.approach_fraction),
            ("fine_tune_fraction", self.fine_tune_fraction),
            ("complete_fraction", self.complete_fraction),
        ] {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be in (0, 1], got {fraction}"
                )));
            }
        }
        if self.fine_tune_fraction > self.complete_fraction {
            return Err(ConfigError::Invalid(format!(
                "fine_tune_fraction {} exceeds complete_fraction {}",
                self.fine_tune_fraction, self.complete_fraction
            )));
        }
        for (name, throttle) in [
            ("approach_throttle", self.approach_throttle),
            ("fine_tune_throttle", self.fine_tune_throttle),
        ] {
            if !(0.0..=1.0).contains(&throttle) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be in [0, 1], got {throttle}"
                )));
            }
        }
        for (name, value) in [
            ("turn_hysteresis", self.turn_hysteresis),
            ("lead_time", self.lead_time),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if !(self.exit_atmosphere_altitude > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "exit_atmosphere_altitude must be positive, got {}",
                self.exit_atmosphere_altitude
            )));
        }
        if self.max_auto_stage < 0 {
            return Err(ConfigError::Invalid(format!(
                "max_auto_stage must not be negative, got {}",
                self.max_auto_stage
            )));
        }
        if !(self.standard_gravity > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "standard_gravity must be positive, got {}",
                self.standard_gravity
            )));
        }
        if !(self.simulation.step_seconds > 0.0 && self.simulation.warp_step_seconds > 0.0) {
            return Err(ConfigError::Invalid(
                "simulation step sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
