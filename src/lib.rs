pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use config::{ConfigError, LaunchConfig, SimulationConfig};
pub use constants::*;
pub use control::autopilot::{Autopilot, FlightPhase};
pub use control::fuel_management::{FuelType, ResourceReading};
pub use control::guidance::GravityTurn;
pub use control::launch_stages::{StageController, StageFuelStats};
pub use control::maneuver::BurnPlan;
pub use control::vessel::{NodeHandle, Vessel};
pub use errors::AutopilotError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::body::CelestialBody;
pub use trajectory_system::simulated_vessel::SimulatedVessel;
pub use trajectory_system::vehicle::{PartGroup, Vehicle};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::panel::{ConsolePanel, FlightPanel, FlightReadout};
pub use telemetry_system::telemetry::Telemetry;

// Re-export commonly used utilities
pub use utils::poller::{CancelToken, Poller};
pub use utils::vector2d::Vector2D;
