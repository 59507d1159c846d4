use crate::control::fuel_management::ResourceReading;
use crate::errors::AutopilotError;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeHandle(pub u64);

/// Telemetry and command surface of the active vessel.
///
/// Every call may fail (connection loss, vessel destroyed); callers propagate
/// the error and stop. Readings are cached by the implementation and brought
/// up to date by [`Vessel::refresh`], which the autopilot calls once per tick.
pub trait Vessel {
    fn refresh(&mut self) -> Result<(), AutopilotError> {
        Ok(())
    }

    fn ut(&mut self) -> Result<f64, AutopilotError>;
    fn mean_altitude(&mut self) -> Result<f64, AutopilotError>;
    fn apoapsis_altitude(&mut self) -> Result<f64, AutopilotError>;
    fn periapsis_altitude(&mut self) -> Result<f64, AutopilotError>;
    /// Apoapsis measured from the body's center.
    fn apoapsis(&mut self) -> Result<f64, AutopilotError>;
    fn semi_major_axis(&mut self) -> Result<f64, AutopilotError>;
    fn gravitational_parameter(&mut self) -> Result<f64, AutopilotError>;
    fn time_to_apoapsis(&mut self) -> Result<f64, AutopilotError>;
    fn mass(&mut self) -> Result<f64, AutopilotError>;
    fn thrust(&mut self) -> Result<f64, AutopilotError>;
    fn available_thrust(&mut self) -> Result<f64, AutopilotError>;
    /// Combined vacuum specific impulse of the active engines, in seconds.
    fn specific_impulse(&mut self) -> Result<f64, AutopilotError>;
    fn current_stage(&mut self) -> Result<i32, AutopilotError>;
    /// Resources in the parts that are dropped when `stage` is activated.
    fn resources_in_decouple_stage(
        &mut self,
        stage: i32,
    ) -> Result<ResourceReading, AutopilotError>;

    fn set_throttle(&mut self, throttle: f64) -> Result<(), AutopilotError>;
    fn set_sas(&mut self, enabled: bool) -> Result<(), AutopilotError>;
    fn set_rcs(&mut self, enabled: bool) -> Result<(), AutopilotError>;
    fn engage_autopilot(&mut self) -> Result<(), AutopilotError>;
    fn target_pitch_and_heading(&mut self, pitch: f64, heading: f64) -> Result<(), AutopilotError>;
    fn point_at_node(&mut self, node: NodeHandle) -> Result<(), AutopilotError>;
    /// Blocks until the autopilot reports attitude lock.
    fn wait_for_attitude(&mut self) -> Result<(), AutopilotError>;
    fn activate_next_stage(&mut self) -> Result<(), AutopilotError>;
    fn add_node(&mut self, ut: f64, prograde: f64) -> Result<NodeHandle, AutopilotError>;
    fn remove_node(&mut self, node: NodeHandle) -> Result<(), AutopilotError>;
    fn warp_to(&mut self, ut: f64) -> Result<(), AutopilotError>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::HashMap;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Command {
        Throttle(f64),
        Sas(bool),
        Rcs(bool),
        Engage,
        PitchHeading(f64, f64),
        PointAtNode(NodeHandle),
        WaitForAttitude,
        NextStage,
        AddNode(f64, f64),
        RemoveNode(NodeHandle),
        WarpTo(f64),
    }

    #[derive(Debug, Default)]
    pub struct MockVessel {
        pub ut: f64,
        pub altitude: f64,
        pub apoapsis_altitude: f64,
        pub periapsis_altitude: f64,
        pub apoapsis: f64,
        pub semi_major_axis: f64,
        pub mu: f64,
        pub time_to_apoapsis: f64,
        pub mass: f64,
        pub thrust: f64,
        pub available_thrust: f64,
        pub isp: f64,
        pub stage: i32,
        pub resources: HashMap<i32, ResourceReading>,
        pub commands: Vec<Command>,
        pub next_node: u64,
    }

    impl MockVessel {
        pub fn staging_calls(&self) -> usize {
            self.commands
                .iter()
                .filter(|command| **command == Command::NextStage)
                .count()
        }

        pub fn throttles(&self) -> Vec<f64> {
            self.commands
                .iter()
                .filter_map(|command| match command {
                    Command::Throttle(value) => Some(*value),
                    _ => None,
                })
                .collect()
        }
    }

    impl Vessel for MockVessel {
        fn ut(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.ut)
        }
        fn mean_altitude(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.altitude)
        }
        fn apoapsis_altitude(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.apoapsis_altitude)
        }
        fn periapsis_altitude(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.periapsis_altitude)
        }
        fn apoapsis(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.apoapsis)
        }
        fn semi_major_axis(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.semi_major_axis)
        }
        fn gravitational_parameter(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.mu)
        }
        fn time_to_apoapsis(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.time_to_apoapsis)
        }
        fn mass(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.mass)
        }
        fn thrust(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.thrust)
        }
        fn available_thrust(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.available_thrust)
        }
        fn specific_impulse(&mut self) -> Result<f64, AutopilotError> {
            Ok(self.isp)
        }
        fn current_stage(&mut self) -> Result<i32, AutopilotError> {
            Ok(self.stage)
        }
        fn resources_in_decouple_stage(
            &mut self,
            stage: i32,
        ) -> Result<ResourceReading, AutopilotError> {
            Ok(self.resources.get(&stage).cloned().unwrap_or_default())
        }
        fn set_throttle(&mut self, throttle: f64) -> Result<(), AutopilotError> {
            self.commands.push(Command::Throttle(throttle));
            Ok(())
        }
        fn set_sas(&mut self, enabled: bool) -> Result<(), AutopilotError> {
            self.commands.push(Command::Sas(enabled));
            Ok(())
        }
        fn set_rcs(&mut self, enabled: bool) -> Result<(), AutopilotError> {
            self.commands.push(Command::Rcs(enabled));
            Ok(())
        }
        fn engage_autopilot(&mut self) -> Result<(), AutopilotError> {
            self.commands.push(Command::Engage);
            Ok(())
        }
        fn target_pitch_and_heading(
            &mut self,
            pitch: f64,
            heading: f64,
        ) -> Result<(), AutopilotError> {
            self.commands.push(Command::PitchHeading(pitch, heading));
            Ok(())
        }
        fn point_at_node(&mut self, node: NodeHandle) -> Result<(), AutopilotError> {
            self.commands.push(Command::PointAtNode(node));
            Ok(())
        }
        fn wait_for_attitude(&mut self) -> Result<(), AutopilotError> {
            self.commands.push(Command::WaitForAttitude);
            Ok(())
        }
        fn activate_next_stage(&mut self) -> Result<(), AutopilotError> {
            self.commands.push(Command::NextStage);
            self.stage -= 1;
            Ok(())
        }
        fn add_node(&mut self, ut: f64, prograde: f64) -> Result<NodeHandle, AutopilotError> {
            self.commands.push(Command::AddNode(ut, prograde));
            self.next_node += 1;
            Ok(NodeHandle(self.next_node))
        }
        fn remove_node(&mut self, node: NodeHandle) -> Result<(), AutopilotError> {
            self.commands.push(Command::RemoveNode(node));
            Ok(())
        }
        fn warp_to(&mut self, ut: f64) -> Result<(), AutopilotError> {
            self.commands.push(Command::WarpTo(ut));
            self.ut = ut;
            Ok(())
        }
    }
}
