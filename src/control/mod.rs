pub mod autopilot;
pub mod fuel_management;
pub mod guidance;
pub mod launch_stages;
pub mod maneuver;
pub mod vessel;
