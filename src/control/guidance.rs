/// Linear pitch program from vertical at `start_altitude` to horizontal at
/// `end_altitude`.
pub struct GravityTurn {
    pub start_altitude: f64,
    pub end_altitude: f64,
    pub heading: f64,
    hysteresis: f64,
    turn_angle: f64,
}

impl GravityTurn {
    pub fn new(start_altitude: f64, end_altitude: f64, heading: f64, hysteresis: f64) -> Self {
        GravityTurn {
            start_altitude,
            end_altitude,
            heading,
            hysteresis,
            turn_angle: 0.0,
        }
    }

    pub fn in_window(&self, altitude: f64) -> bool {
        altitude > self.start_altitude && altitude < self.end_altitude
    }

    /// Degrees tilted away from vertical, clamped to [0, 90].
    pub fn turn_angle_for(&self, altitude: f64) -> f64 {
        let frac = (altitude - self.start_altitude) / (self.end_altitude - self.start_altitude);
        frac.clamp(0.0, 1.0) * 90.0
    }

    pub fn target_pitch(&self, altitude: f64) -> f64 {
        90.0 - self.turn_angle_for(altitude)
    }

    pub fn turn_angle(&self) -> f64 {
        self.turn_angle
    }

    /// Returns the pitch to command, or `None` when outside the turn window or
    /// when the change since the last command is within the hysteresis band.
    pub fn update(&mut self, altitude: f64) -> Option<f64> {
        if !self.in_window(altitude) {
            return None;
        }

        let new_turn_angle = self.turn_angle_for(altitude);
        if (new_turn_angle - self.turn_angle).abs() > self.hysteresis {
            self.turn_angle = new_turn_angle;
            Some(90.0 - new_turn_angle)
        } else {
            None
        }
    }
}
