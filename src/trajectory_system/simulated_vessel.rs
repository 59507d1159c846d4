use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::aerodynamics::Aerodynamics;
use super::body::CelestialBody;
use super::kinematics::{rk4_step, OrbitalElements, StateVector};
use super::vehicle::Vehicle;
use crate::config::LaunchConfig;
use crate::control::fuel_management::ResourceReading;
use crate::control::vessel::{NodeHandle, Vessel};
use crate::errors::AutopilotError;
use crate::utils::vector2d::Vector2D;

#[derive(Clone, Copy, PartialEq, Debug)]
enum Attitude {
    Vertical,
    Surface { pitch: f64, heading: f64 },
    /// Along the node's burn vector, which for a prograde burn is prograde.
    Node(NodeHandle),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ManeuverNode {
    pub handle: NodeHandle,
    pub ut: f64,
    pub prograde: f64,
}

/// Planar flight simulation behind the [`Vessel`] surface.
///
/// Each [`Vessel::refresh`] advances the clock by one step. The vessel stays
/// clamped to the pad until its engines first produce thrust.
pub struct SimulatedVessel {
    body: CelestialBody,
    vehicle: Vehicle,
    aerodynamics: Aerodynamics,
    state: StateVector,
    elements: Option<OrbitalElements>,
    ut: f64,
    throttle: f64,
    thrust: f64,
    attitude: Attitude,
    sas: bool,
    rcs: bool,
    autopilot_engaged: bool,
    launched: bool,
    nodes: Vec<ManeuverNode>,
    next_node: u64,
    step: f64,
    warp_step: f64,
    standard_gravity: f64,
    altitude_noise: f64,
    rng: StdRng,
}

impl SimulatedVessel {
    pub fn new(
        body: CelestialBody,
        vehicle: Vehicle,
        aerodynamics: Aerodynamics,
        config: &LaunchConfig,
    ) -> Self {
        let state = StateVector::new(
            Vector2D::new(0.0, body.radius),
            Vector2D::new(body.surface_speed, 0.0),
        );
        let elements = OrbitalElements::from_state(&state, body.gravitational_parameter);
        SimulatedVessel {
            body,
            vehicle,
            aerodynamics,
            state,
            elements,
            ut: 0.0,
            throttle: 0.0,
            thrust: 0.0,
            attitude: Attitude::Vertical,
            sas: true,
            rcs: false,
            autopilot_engaged: false,
            launched: false,
            nodes: Vec::new(),
            next_node: 0,
            step: config.simulation.step_seconds,
            warp_step: config.simulation.warp_step_seconds,
            standard_gravity: config.standard_gravity,
            altitude_noise: config.simulation.altitude_noise,
            rng: StdRng::seed_from_u64(config.simulation.seed),
        }
    }

    pub fn from_config(config: &LaunchConfig) -> Self {
        SimulatedVessel::new(
            CelestialBody::kerbin(),
            Vehicle::two_stage_demo(),
            Aerodynamics::new(0.3, 1.5),
            config,
        )
    }

    pub fn body(&self) -> &CelestialBody {
        &self.body
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn nodes(&self) -> &[ManeuverNode] {
        &self.nodes
    }

    pub fn is_launched(&self) -> bool {
        self.launched
    }

    pub fn sas(&self) -> bool {
        self.sas
    }

    pub fn rcs(&self) -> bool {
        self.rcs
    }

    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    fn altitude(&self) -> f64 {
        self.body.altitude_of(&self.state.position)
    }

    fn elements(&self) -> Result<&OrbitalElements, AutopilotError> {
        self.elements.as_ref().ok_or_else(|| {
            AutopilotError::TelemetryError("vessel is on an escape trajectory".to_string())
        })
    }

    fn node_index(&self, node: NodeHandle) -> Result<usize, AutopilotError> {
        self.nodes
            .iter()
            .position(|n| n.handle == node)
            .ok_or_else(|| AutopilotError::CommandError(format!("no maneuver node {}", node.0)))
    }

    /// Thrust direction per unit thrust. Thrust pointed out of the orbital
    /// plane is lost.
    fn thrust_direction(&self, state: &StateVector, up: Vector2D, east: Vector2D) -> Vector2D {
        match self.attitude {
            Attitude::Vertical => up,
            Attitude::Surface { pitch, heading } => {
                let pitch = pitch.to_radians();
                let heading = heading.to_radians();
                east * (pitch.cos() * heading.sin()) + up * pitch.sin()
            }
            Attitude::Node(_) => state.velocity.normalize(),
        }
    }

    fn acceleration(&self, state: &StateVector, thrust_acceleration: f64, mass: f64) -> Vector2D {
        let up = state.position.normalize();
        let east = up.clockwise_normal();
        let gravity = self.body.gravity_vector(&state.position);

        // The atmosphere turns with the surface
        let radius = state.position.magnitude();
        let wind = east * (self.body.surface_speed * radius / self.body.radius);
        let density = self.body.air_density(radius - self.body.radius);
        let drag = self
            .aerodynamics
            .calculate_drag(state.velocity - wind, density)
            / mass;

        gravity + self.thrust_direction(state, up, east) * thrust_acceleration + drag
    }

    fn integrate(&mut self, delta_time: f64, thrust: f64, mass: f64) {
        let thrust_acceleration = thrust / mass;
        self.state = rk4_step(self.state, delta_time, |s| {
            self.acceleration(s, thrust_acceleration, mass)
        });
    }

    fn after_integration(&mut self) -> Result<(), AutopilotError> {
        self.elements = OrbitalElements::from_state(&self.state, self.body.gravitational_parameter);
        let altitude = self.altitude();
        if self.launched && altitude < 0.0 {
            return Err(AutopilotError::TelemetryError(format!(
                "vessel hit the surface at UT {:.1}",
                self.ut
            )));
        }
        Ok(())
    }
}

impl Vessel for SimulatedVessel {
    fn refresh(&mut self) -> Result<(), AutopilotError> {
        let mass = self.vehicle.mass();
        self.thrust = self
            .vehicle
            .burn(self.throttle, self.step, self.standard_gravity);

        if !self.launched && self.thrust > 0.0 {
            info!("Liftoff at UT {:.1}", self.ut);
            self.launched = true;
        }
        if self.launched {
            self.integrate(self.step, self.thrust, mass);
        }
        self.ut += self.step;
        self.after_integration()
    }

    fn ut(&mut self) -> Result<f64, AutopilotError> {
        Ok(self.ut)
    }

    fn mean_altitude(&mut self) -> Result<f64, AutopilotError> {
        let altitude = self.altitude();
        if self.altitude_noise > 0.0 {
            let noise = self.altitude_noise;
            Ok(altitude + self.rng.gen_range(-noise..=noise))
        } else {
            Ok(altitude)
        }
    }

    fn apoapsis_altitude(&mut self) -> Result<f64, AutopilotError> {
        Ok(self.elements()?.apoapsis() - self.body.radius)
    }

    fn periapsis_altitude(&mut self) -> Result<f64, AutopilotError> {
        Ok(self.elements()?.periapsis() - self.body.radius)
    }

    fn apoapsis(&mut self) -> Result<f64, AutopilotError> {
        Ok(self.elements()?.apoapsis())
    }

    fn semi_major_axis(&mut self) -> Result<f64, AutopilotError> {
        Ok(self.elements()?.semi_major_axis)
    }

    fn gravitational_parameter(&mut self) -> Result<f64, AutopilotError> {
        Ok(self.body.gravitational_parameter)
    }

    fn time_to_apoapsis(&mut self) -> Result<f64, AutopilotError> {
        Ok(self.elements()?.time_to_apoapsis())
    }

    fn mass(&mut self) -> Result<f64, AutopilotError> {
        Ok(self.vehicle.mass())
    }

    fn thrust(&mut self) -> Result<f64, AutopilotError> {
        Ok(self.thrust)
    }

    fn available_thrust(&mut self) -> Result<f64, AutopilotError> {
        Ok(self.vehicle.available_thrust())
    }

    fn specific_impulse(&mut self) -> Result<f64, AutopilotError> {
        Ok(self.vehicle.specific_impulse())
    }

    fn current_stage(&mut self) -> Result<i32, AutopilotError> {
        Ok(self.vehicle.current_stage())
    }

    fn resources_in_decouple_stage(
        &mut self,
        stage: i32,
    ) -> Result<ResourceReading, AutopilotError> {
        Ok(self.vehicle.resources_in_decouple_stage(stage))
    }

    fn set_throttle(&mut self, throttle: f64) -> Result<(), AutopilotError> {
        if !(0.0..=1.0).contains(&throttle) {
            return Err(AutopilotError::CommandError(format!(
                "throttle must be in [0, 1], got {}",
                throttle
            )));
        }
        self.throttle = throttle;
        Ok(())
    }

    fn set_sas(&mut self, enabled: bool) -> Result<(), AutopilotError> {
        self.sas = enabled;
        Ok(())
    }

    fn set_rcs(&mut self, enabled: bool) -> Result<(), AutopilotError> {
        self.rcs = enabled;
        Ok(())
    }

    fn engage_autopilot(&mut self) -> Result<(), AutopilotError> {
        self.autopilot_engaged = true;
        Ok(())
    }

    fn target_pitch_and_heading(&mut self, pitch: f64, heading: f64) -> Result<(), AutopilotError> {
        self.attitude = Attitude::Surface { pitch, heading };
        Ok(())
    }

    fn point_at_node(&mut self, node: NodeHandle) -> Result<(), AutopilotError> {
        self.node_index(node)?;
        self.attitude = Attitude::Node(node);
        Ok(())
    }

    // Attitude changes are instantaneous here.
    fn wait_for_attitude(&mut self) -> Result<(), AutopilotError> {
        if !self.autopilot_engaged {
            return Err(AutopilotError::CommandError(
                "autopilot is not engaged".to_string(),
            ));
        }
        debug!("Attitude locked: {:?}", self.attitude);
        Ok(())
    }

    fn activate_next_stage(&mut self) -> Result<(), AutopilotError> {
        if !self.vehicle.activate_next_stage() {
            return Err(AutopilotError::CommandError(
                "no stages left to activate".to_string(),
            ));
        }
        debug!(
            "Stage {} active, mass {:.0} kg",
            self.vehicle.current_stage(),
            self.vehicle.mass()
        );
        Ok(())
    }

    fn add_node(&mut self, ut: f64, prograde: f64) -> Result<NodeHandle, AutopilotError> {
        let handle = NodeHandle(self.next_node);
        self.next_node += 1;
        self.nodes.push(ManeuverNode {
            handle,
            ut,
            prograde,
        });
        Ok(handle)
    }

    fn remove_node(&mut self, node: NodeHandle) -> Result<(), AutopilotError> {
        let index = self.node_index(node)?;
        self.nodes.remove(index);
        Ok(())
    }

    /// Coasts to `ut` with the engines off.
    fn warp_to(&mut self, ut: f64) -> Result<(), AutopilotError> {
        if ut <= self.ut {
            return Ok(());
        }
        info!("Warping from UT {:.1} to UT {:.1}", self.ut, ut);
        let mass = self.vehicle.mass();
        loop {
            let remaining = ut - self.ut;
            if remaining <= self.warp_step {
                self.integrate(remaining, 0.0, mass);
                self.ut = ut;
                break;
            }
            self.integrate(self.warp_step, 0.0, mass);
            self.ut += self.warp_step;
        }
        self.thrust = 0.0;
        self.after_integration()
    }
}
