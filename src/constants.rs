// Ascent profile
pub const TURN_START_ALTITUDE: f64 = 250.0; // m
pub const TURN_END_ALTITUDE: f64 = 45_000.0; // m
pub const TARGET_ALTITUDE: f64 = 100_000.0; // m
pub const LAUNCH_HEADING: f64 = 90.0; // degrees, due east
pub const TURN_HYSTERESIS: f64 = 0.5; // degrees

// Apoapsis targeting
pub const APPROACH_FRACTION: f64 = 0.9;
pub const APPROACH_THROTTLE: f64 = 0.25;

// Coast
pub const EXIT_ATMOSPHERE_ALTITUDE: f64 = 70_500.0; // m

// Circularization
pub const STANDARD_GRAVITY: f64 = 9.82; // m/s², converts Isp in seconds to exhaust velocity
pub const BURN_LEAD_TIME: f64 = 10.0; // s
pub const FINE_TUNE_FRACTION: f64 = 0.93;
pub const FINE_TUNE_THROTTLE: f64 = 0.05;
pub const ORBIT_COMPLETE_FRACTION: f64 = 0.999;

// Staging
pub const MAX_AUTO_STAGE: i32 = 0; // last stage to separate automatically
pub const STAGE_STATS_EVERY: u64 = 100; // ticks between fuel reports

// Polling
pub const POLL_INTERVAL_MS: u64 = 10;
pub const COUNTDOWN_SECS: u32 = 3;

// Built-in simulator
pub const KERBIN_RADIUS: f64 = 600_000.0; // m
pub const KERBIN_GRAVITATIONAL_PARAMETER: f64 = 3.5316e12; // m³/s²
pub const KERBIN_ATMOSPHERE_HEIGHT: f64 = 70_000.0; // m
pub const KERBIN_SCALE_HEIGHT: f64 = 5_600.0; // m
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225; // kg/m³
pub const SIMULATION_STEP: f64 = 0.1; // s
pub const WARP_STEP: f64 = 1.0; // s
