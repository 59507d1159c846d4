use tracing::debug;

use crate::errors::AutopilotError;

/// The three figures shown on the in-game flight panel.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct FlightReadout {
    pub thrust: f64,             // N
    pub apoapsis_altitude: f64,  // m
    pub periapsis_altitude: f64, // m
}

impl FlightReadout {
    pub fn thrust_label(&self) -> String {
        format!("Thrust: {} kN", (self.thrust / 1000.0) as i64)
    }

    pub fn apoapsis_label(&self) -> String {
        format!("Apoapsis: {} km", (self.apoapsis_altitude / 1000.0) as i64)
    }

    pub fn periapsis_label(&self) -> String {
        format!("Periapsis: {} km", (self.periapsis_altitude / 1000.0) as i64)
    }
}

pub trait FlightPanel {
    fn launch_clicked(&mut self) -> Result<bool, AutopilotError>;
    fn show(&mut self, readout: &FlightReadout) -> Result<(), AutopilotError>;
}

/// Panel that writes its labels to the log and presses Launch by itself.
#[derive(Debug, Default)]
pub struct ConsolePanel {
    pub last: Option<FlightReadout>,
    pub updates: u64,
}

impl ConsolePanel {
    pub fn new() -> Self {
        ConsolePanel::default()
    }
}

impl FlightPanel for ConsolePanel {
    fn launch_clicked(&mut self) -> Result<bool, AutopilotError> {
        Ok(true)
    }

    fn show(&mut self, readout: &FlightReadout) -> Result<(), AutopilotError> {
        debug!(
            "{} | {} | {}",
            readout.thrust_label(),
            readout.apoapsis_label(),
            readout.periapsis_label()
        );
        self.last = Some(*readout);
        self.updates += 1;
        Ok(())
    }
}
