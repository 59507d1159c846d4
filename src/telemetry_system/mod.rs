pub mod panel;
pub mod telemetry;
