use crate::errors::AutopilotError;

pub fn vis_viva_speed(mu: f64, r: f64, a: f64) -> Result<f64, AutopilotError> {
    if r == 0.0 || a == 0.0 {
        return Err(AutopilotError::DomainError(format!(
            "vis-viva needs non-zero radius and semi-major axis (r = {r}, a = {a})"
        )));
    }
    let speed_squared = mu * (2.0 / r - 1.0 / a);
    if !speed_squared.is_finite() || speed_squared < 0.0 {
        return Err(AutopilotError::DomainError(format!(
            "vis-viva is undefined for mu = {mu}, r = {r}, a = {a}"
        )));
    }
    Ok(speed_squared.sqrt())
}

/// Prograde delta-v that turns the current orbit circular at apoapsis radius `r`.
pub fn circularization_delta_v(
    mu: f64,
    r: f64,
    semi_major_axis: f64,
) -> Result<f64, AutopilotError> {
    let v1 = vis_viva_speed(mu, r, semi_major_axis)?;
    let v2 = vis_viva_speed(mu, r, r)?;
    Ok(v2 - v1)
}

/// Seconds of full thrust needed to deliver `delta_v`, from the ideal rocket
/// equation.
pub fn burn_time(
    delta_v: f64,
    mass: f64,
    thrust: f64,
    specific_impulse: f64,
    standard_gravity: f64,
) -> Result<f64, AutopilotError> {
    if !(mass > 0.0) {
        return Err(AutopilotError::DomainError(format!(
            "vessel mass must be positive, got {mass}"
        )));
    }
    if !(thrust > 0.0) {
        return Err(AutopilotError::DomainError(format!(
            "no thrust available for the burn ({thrust} N)"
        )));
    }
    let exhaust_velocity = specific_impulse * standard_gravity;
    if !(exhaust_velocity > 0.0) {
        return Err(AutopilotError::DomainError(format!(
            "specific impulse must be positive, got {specific_impulse} s"
        )));
    }

    let final_mass = mass / (delta_v / exhaust_velocity).exp();
    let flow_rate = thrust / exhaust_velocity;
    let time = (mass - final_mass) / flow_rate;
    if !time.is_finite() {
        return Err(AutopilotError::DomainError(format!(
            "burn time diverged for delta-v {delta_v} m/s"
        )));
    }
    Ok(time)
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BurnPlan {
    pub delta_v: f64,
    pub burn_time: f64,
    /// Universal time of the node, i.e. of apoapsis.
    pub node_ut: f64,
}

impl BurnPlan {
    /// Universal time at which to light the engine so the burn is centered on
    /// the coming apoapsis. Takes live readings since a warp shifts both.
    pub fn start_ut(&self, ut: f64, time_to_apoapsis: f64) -> f64 {
        ut + time_to_apoapsis - self.burn_time / 2.0
    }

    /// True once `time_to_apoapsis` has dropped inside half the burn.
    pub fn window_open(&self, time_to_apoapsis: f64) -> bool {
        time_to_apoapsis - self.burn_time / 2.0 <= 0.0
    }
}
