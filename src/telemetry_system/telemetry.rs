use tracing::info;

use crate::control::autopilot::FlightPhase;
use crate::telemetry_system::panel::FlightReadout;

pub struct Telemetry {
    pub log: Vec<String>,
    max_altitude: f64,
    max_apoapsis: f64,
    max_periapsis: f64,
    stagings: Vec<(i32, f64)>,
    phase_times: Vec<(FlightPhase, f64)>,
    samples: u64,
}

impl Default for Telemetry {
    fn default() -> Self {
        Telemetry::new()
    }
}

impl Telemetry {
    pub fn new() -> Self {
        Telemetry {
            log: Vec::new(),
            max_altitude: f64::MIN,
            max_apoapsis: f64::MIN,
            max_periapsis: f64::MIN,
            stagings: Vec::new(),
            phase_times: Vec::new(),
            samples: 0,
        }
    }

    fn format_time(seconds: f64) -> String {
        if seconds >= 3600.0 {
            let hours = (seconds / 3600.0).floor();
            let minutes = ((seconds % 3600.0) / 60.0).floor();
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds % 60.0)
        } else if seconds >= 60.0 {
            let minutes = (seconds / 60.0).floor();
            format!("{:.0}m {:.2}s", minutes, seconds % 60.0)
        } else {
            format!("{:.2}s", seconds)
        }
    }

    fn format_altitude(altitude: f64) -> String {
        if altitude.abs() >= 1000.0 {
            format!("{:.2} km", altitude / 1000.0)
        } else {
            format!("{:.2} m", altitude)
        }
    }

    fn mission_time(&self, ut: f64) -> f64 {
        self.phase_times
            .first()
            .map_or(0.0, |(_, start)| ut - start)
    }

    pub fn collect_data(&mut self, altitude: f64, readout: &FlightReadout) {
        self.samples += 1;
        self.max_altitude = self.max_altitude.max(altitude);
        self.max_apoapsis = self.max_apoapsis.max(readout.apoapsis_altitude);
        self.max_periapsis = self.max_periapsis.max(readout.periapsis_altitude);
    }

    pub fn record_transition(&mut self, phase: FlightPhase, ut: f64) {
        self.phase_times.push((phase, ut));
        self.log.push(format!(
            "T+{}: entered {:?}",
            Self::format_time(self.mission_time(ut)),
            phase
        ));
    }

    pub fn record_staging(&mut self, stage: i32, ut: f64) {
        self.stagings.push((stage, ut));
        self.log.push(format!(
            "T+{}: activated stage {}",
            Self::format_time(self.mission_time(ut)),
            stage
        ));
    }

    pub fn phases(&self) -> Vec<FlightPhase> {
        self.phase_times.iter().map(|(phase, _)| *phase).collect()
    }

    pub fn staging_count(&self) -> usize {
        self.stagings.len()
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn display_data(&self) {
        info!("--- Flight Log ---");
        for entry in &self.log {
            info!("{}", entry);
        }

        info!("--- Flight Summary ---");
        if self.samples > 0 {
            info!("Max Altitude: {}", Self::format_altitude(self.max_altitude));
            info!("Max Apoapsis: {}", Self::format_altitude(self.max_apoapsis));
            info!(
                "Max Periapsis: {}",
                Self::format_altitude(self.max_periapsis)
            );
        }
        info!("Stages activated: {}", self.stagings.len());
    }
}
