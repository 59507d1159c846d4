use crate::control::fuel_management::{FuelType, ResourceReading};

#[derive(Clone, Debug, PartialEq)]
pub struct PartGroup {
    pub name: String,
    /// Stage whose activation ignites this group's engine.
    pub activation_stage: i32,
    /// Stage whose activation drops this group. -1 keeps it attached.
    pub decouple_stage: i32,
    pub dry_mass: f64, // kg
    pub fuel: FuelType,
    pub fuel_amount: f64, // kg
    pub fuel_capacity: f64, // kg
    pub thrust: f64, // N, vacuum
    pub isp: f64, // s, vacuum
}

impl PartGroup {
    pub fn mass(&self) -> f64 {
        self.dry_mass + self.fuel_amount
    }

    fn has_engine(&self) -> bool {
        self.thrust > 0.0 && self.isp > 0.0
    }

    fn is_burning(&self, current_stage: i32) -> bool {
        self.has_engine() && self.activation_stage >= current_stage && self.fuel_amount > 0.0
    }

    /// Thrust the engine gives at `throttle`. Solid motors cannot be throttled.
    fn thrust_at(&self, throttle: f64) -> f64 {
        match self.fuel {
            FuelType::SolidFuel => self.thrust,
            FuelType::LiquidFuel => self.thrust * throttle,
        }
    }
}

/// Stack of part groups with stock-style stage numbering: stages count down to
/// zero and activating one ignites and drops the groups tagged with it.
#[derive(Clone, Debug)]
pub struct Vehicle {
    groups: Vec<PartGroup>,
    current_stage: i32,
}

impl Vehicle {
    pub fn new(groups: Vec<PartGroup>, current_stage: i32) -> Self {
        Vehicle {
            groups,
            current_stage,
        }
    }

    pub fn two_stage_demo() -> Self {
        Vehicle::new(
            vec![
                PartGroup {
                    name: "Booster".to_string(),
                    activation_stage: 2,
                    decouple_stage: 1,
                    dry_mass: 1_500.0,
                    fuel: FuelType::SolidFuel,
                    fuel_amount: 6_000.0,
                    fuel_capacity: 6_000.0,
                    thrust: 250_000.0,
                    isp: 230.0,
                },
                PartGroup {
                    name: "Upper stage".to_string(),
                    activation_stage: 0,
                    decouple_stage: -1,
                    dry_mass: 1_500.0,
                    fuel: FuelType::LiquidFuel,
                    fuel_amount: 4_000.0,
                    fuel_capacity: 4_000.0,
                    thrust: 60_000.0,
                    isp: 345.0,
                },
            ],
            3,
        )
    }

    pub fn groups(&self) -> &[PartGroup] {
        &self.groups
    }

    pub fn current_stage(&self) -> i32 {
        self.current_stage
    }

    pub fn mass(&self) -> f64 {
        self.groups.iter().map(PartGroup::mass).sum()
    }

    fn burning(&self) -> impl Iterator<Item = &PartGroup> {
        let stage = self.current_stage;
        self.groups
            .iter()
            .filter(move |group| group.is_burning(stage))
    }

    pub fn available_thrust(&self) -> f64 {
        self.burning().map(|group| group.thrust).sum()
    }

    /// Thrust-weighted Isp of the burning engines, zero when none burn.
    pub fn specific_impulse(&self) -> f64 {
        let (thrust, flow) = self.burning().fold((0.0, 0.0), |(thrust, flow), group| {
            (thrust + group.thrust, flow + group.thrust / group.isp)
        });
        if flow > 0.0 {
            thrust / flow
        } else {
            0.0
        }
    }

    pub fn resources_in_decouple_stage(&self, stage: i32) -> ResourceReading {
        let mut reading = ResourceReading::new();
        for group in &self.groups {
            if group.decouple_stage == stage {
                reading.add(group.fuel, group.fuel_amount, group.fuel_capacity);
            }
        }
        reading
    }

    /// Moves to the next stage and drops the groups it decouples.
    /// Returns false once no stages are left.
    pub fn activate_next_stage(&mut self) -> bool {
        if self.current_stage <= 0 {
            return false;
        }
        self.current_stage -= 1;
        let stage = self.current_stage;
        self.groups.retain(|group| group.decouple_stage != stage);
        true
    }

    /// Runs the burning engines for `delta_time` and returns the mean thrust
    /// they delivered over it. An engine that runs dry mid-step delivers the
    /// matching fraction of its thrust.
    pub fn burn(&mut self, throttle: f64, delta_time: f64, standard_gravity: f64) -> f64 {
        let stage = self.current_stage;
        let mut delivered = 0.0;
        for group in &mut self.groups {
            if !group.is_burning(stage) {
                continue;
            }
            let thrust = group.thrust_at(throttle);
            let needed = thrust / (group.isp * standard_gravity) * delta_time;
            if needed <= group.fuel_amount {
                group.fuel_amount -= needed;
                delivered += thrust;
            } else {
                delivered += thrust * group.fuel_amount / needed;
                group.fuel_amount = 0.0;
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const G0: f64 = 9.82;

    #[test]
    fn test_demo_mass_and_stage() {
        let vehicle = Vehicle::two_stage_demo();
        assert_eq!(vehicle.current_stage(), 3);
        assert_eq!(vehicle.mass(), 13_000.0);
        assert_eq!(vehicle.available_thrust(), 0.0);
        assert_eq!(vehicle.specific_impulse(), 0.0);
    }

    #[test]
    fn test_staging_sequence_drops_booster() {
        let mut vehicle = Vehicle::two_stage_demo();

        assert!(vehicle.activate_next_stage());
        assert_eq!(vehicle.available_thrust(), 250_000.0);
        let booster = vehicle.resources_in_decouple_stage(1);
        assert_eq!(booster.amount(FuelType::SolidFuel), 6_000.0);

        assert!(vehicle.activate_next_stage());
        assert_eq!(vehicle.groups().len(), 1);
        assert_eq!(vehicle.mass(), 5_500.0);
        assert_eq!(vehicle.available_thrust(), 0.0);
        // Interstage: nothing is dropped by stage 0
        let interstage = vehicle.resources_in_decouple_stage(0);
        assert!(!interstage.has_resource(FuelType::LiquidFuel));
        assert!(!interstage.has_resource(FuelType::SolidFuel));

        assert!(vehicle.activate_next_stage());
        assert_eq!(vehicle.available_thrust(), 60_000.0);
        assert_relative_eq!(vehicle.specific_impulse(), 345.0, epsilon = 1e-9);

        assert!(!vehicle.activate_next_stage());
        assert_eq!(vehicle.current_stage(), 0);
    }

    #[test]
    fn test_solid_motor_ignores_throttle() {
        let mut vehicle = Vehicle::two_stage_demo();
        vehicle.activate_next_stage();

        let thrust = vehicle.burn(0.0, 1.0, G0);
        assert_eq!(thrust, 250_000.0);
        let expected_left = 6_000.0 - 250_000.0 / (230.0 * G0);
        let booster = vehicle.resources_in_decouple_stage(1);
        assert_abs_diff_eq!(
            booster.amount(FuelType::SolidFuel),
            expected_left,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_liquid_engine_follows_throttle() {
        let mut vehicle = Vehicle::two_stage_demo();
        for _ in 0..3 {
            vehicle.activate_next_stage();
        }
        assert_eq!(vehicle.burn(0.25, 1.0, G0), 15_000.0);
        assert_eq!(vehicle.burn(0.0, 1.0, G0), 0.0);
    }

    #[test]
    fn test_engine_runs_dry_mid_step() {
        let mut vehicle = Vehicle::new(
            vec![PartGroup {
                name: "Tiny".to_string(),
                activation_stage: 0,
                decouple_stage: -1,
                dry_mass: 100.0,
                fuel: FuelType::LiquidFuel,
                fuel_amount: 5.0,
                fuel_capacity: 100.0,
                thrust: 9_820.0,
                isp: 100.0,
            }],
            0,
        );
        // 10 kg/s flow, so 5 kg lasts half of a one-second step
        let thrust = vehicle.burn(1.0, 1.0, G0);
        assert_relative_eq!(thrust, 4_910.0, epsilon = 1e-9);
        assert_eq!(vehicle.mass(), 100.0);
        assert_eq!(vehicle.available_thrust(), 0.0);
    }

    #[test]
    fn test_mixed_engines_specific_impulse() {
        let vehicle = Vehicle::new(
            vec![
                PartGroup {
                    name: "A".to_string(),
                    activation_stage: 0,
                    decouple_stage: -1,
                    dry_mass: 0.0,
                    fuel: FuelType::LiquidFuel,
                    fuel_amount: 1.0,
                    fuel_capacity: 1.0,
                    thrust: 100.0,
                    isp: 200.0,
                },
                PartGroup {
                    name: "B".to_string(),
                    activation_stage: 0,
                    decouple_stage: -1,
                    dry_mass: 0.0,
                    fuel: FuelType::SolidFuel,
                    fuel_amount: 1.0,
                    fuel_capacity: 1.0,
                    thrust: 100.0,
                    isp: 300.0,
                },
            ],
            0,
        );
        // 200 / (0.5 + 1/3)
        assert_relative_eq!(vehicle.specific_impulse(), 240.0, epsilon = 1e-9);
    }
}
