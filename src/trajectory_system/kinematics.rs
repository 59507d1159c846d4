use std::f64::consts::PI;

use crate::utils::vector2d::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl StateVector {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        StateVector { position, velocity }
    }
}

/// Advances `state` by `delta_time` with classic fourth-order Runge-Kutta.
/// `acceleration` is evaluated at each intermediate state.
pub fn rk4_step<F>(state: StateVector, delta_time: f64, acceleration: F) -> StateVector
where
    F: Fn(&StateVector) -> Vector2D,
{
    let derivatives = |s: &StateVector| (s.velocity, acceleration(s));
    let offset = |k: (Vector2D, Vector2D), h: f64| {
        StateVector::new(state.position + k.0 * h, state.velocity + k.1 * h)
    };

    let k1 = derivatives(&state);
    let k2 = derivatives(&offset(k1, delta_time / 2.0));
    let k3 = derivatives(&offset(k2, delta_time / 2.0));
    let k4 = derivatives(&offset(k3, delta_time));

    StateVector::new(
        state.position + (delta_time / 6.0) * (k1.0 + 2.0 * k2.0 + 2.0 * k3.0 + k4.0),
        state.velocity + (delta_time / 6.0) * (k1.1 + 2.0 * k2.1 + 2.0 * k3.1 + k4.1),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    gravitational_parameter: f64,
    eccentric_anomaly: f64,
}

impl OrbitalElements {
    /// Returns `None` for escape trajectories, which have no apoapsis.
    pub fn from_state(state: &StateVector, gravitational_parameter: f64) -> Option<Self> {
        let mu = gravitational_parameter;
        let r = state.position.magnitude();
        let speed_squared = state.velocity.dot(&state.velocity);
        let energy = speed_squared / 2.0 - mu / r;
        if energy >= 0.0 {
            return None;
        }

        let semi_major_axis = -mu / (2.0 * energy);
        let radial = state.position.dot(&state.velocity);
        let eccentricity_vector =
            (state.position * (speed_squared - mu / r) - state.velocity * radial) / mu;
        let eccentricity = eccentricity_vector.magnitude();

        let eccentric_anomaly = if eccentricity < 1e-9 {
            0.0
        } else {
            let cos_e = ((1.0 - r / semi_major_axis) / eccentricity).clamp(-1.0, 1.0);
            let anomaly = cos_e.acos();
            if radial < 0.0 {
                2.0 * PI - anomaly
            } else {
                anomaly
            }
        };

        Some(OrbitalElements {
            semi_major_axis,
            eccentricity,
            gravitational_parameter: mu,
            eccentric_anomaly,
        })
    }

    pub fn apoapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    pub fn periapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    pub fn period(&self) -> f64 {
        2.0 * PI * (self.semi_major_axis.powi(3) / self.gravitational_parameter).sqrt()
    }

    pub fn time_to_apoapsis(&self) -> f64 {
        let e = self.eccentric_anomaly;
        let mean_anomaly = e - self.eccentricity * e.sin();
        let mean_motion = 2.0 * PI / self.period();
        let time = (PI - mean_anomaly) / mean_motion;
        if time < 0.0 {
            time + self.period()
        } else {
            time
        }
    }
}
