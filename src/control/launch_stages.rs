use tracing::info;

use super::fuel_management::{FuelType, ALL_FUELS};
use super::vessel::Vessel;
use crate::errors::AutopilotError;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct StageFuelStats {
    pub stage: i32,
    pub fuel: FuelType,
    pub fraction: f64,
}

pub struct StageController {
    max_auto_stage: i32,
    fuels: &'static [FuelType],
}

impl StageController {
    pub fn new(max_auto_stage: i32) -> Self {
        StageController {
            max_auto_stage,
            fuels: &ALL_FUELS,
        }
    }

    pub fn out_of_stages<V: Vessel + ?Sized>(
        &self,
        vessel: &mut V,
    ) -> Result<bool, AutopilotError> {
        Ok(vessel.current_stage()? <= self.max_auto_stage)
    }

    /// Activates the next stage when the current one is spent or carries no
    /// tracked fuel at all. Returns whether a stage was activated.
    pub fn autostage<V: Vessel + ?Sized>(&self, vessel: &mut V) -> Result<bool, AutopilotError> {
        if self.out_of_stages(vessel)? {
            return Ok(false);
        }

        let current_stage = vessel.current_stage()?;
        let resources = vessel.resources_in_decouple_stage(current_stage - 1)?;
        let mut interstage = true;
        for &fuel in self.fuels {
            if resources.out_of_fuel(fuel) {
                info!("Stage {} out of {}, staging", current_stage - 1, fuel);
                vessel.activate_next_stage()?;
                return Ok(true);
            }
            if resources.has_resource(fuel) {
                interstage = false;
            }
        }

        if interstage {
            info!("Stage {} carries no fuel, staging", current_stage - 1);
            vessel.activate_next_stage()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn stages_bottom_to_top(&self, current_stage: i32) -> impl Iterator<Item = i32> {
        (self.max_auto_stage..current_stage).rev()
    }

    pub fn show_stage_stats<V: Vessel + ?Sized>(
        &self,
        vessel: &mut V,
    ) -> Result<Vec<StageFuelStats>, AutopilotError> {
        let current_stage = vessel.current_stage()?;
        let mut stats = Vec::new();

        for stage in self.stages_bottom_to_top(current_stage) {
            let resources = vessel.resources_in_decouple_stage(stage)?;
            for &fuel in self.fuels {
                if let Some(fraction) = resources.fraction(fuel) {
                    info!(
                        "Stage {}   - {} percentage: {:3.0}%",
                        stage,
                        fuel,
                        fraction * 100.0
                    );
                    stats.push(StageFuelStats {
                        stage,
                        fuel,
                        fraction,
                    });
                }
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::fuel_management::ResourceReading;
    use crate::control::vessel::mock::{Command, MockVessel};
    use approx::assert_abs_diff_eq;

    fn create_test_vessel(stage: i32) -> MockVessel {
        MockVessel {
            stage,
            ..MockVessel::default()
        }
    }

    #[test]
    fn test_autostage_on_empty_tank() {
        let mut vessel = create_test_vessel(3);
        vessel.resources.insert(
            2,
            ResourceReading::new()
                .with(FuelType::LiquidFuel, 0.0, 360.0)
                .with(FuelType::SolidFuel, 0.0, 400.0),
        );

        let controller = StageController::new(0);
        assert!(controller.autostage(&mut vessel).unwrap());
        assert_eq!(
            vessel.staging_calls(),
            1,
            "Both tanks are empty but only one stage should fire per tick"
        );
        assert_eq!(vessel.stage, 2);
    }

    #[test]
    fn test_autostage_on_empty_solid_booster() {
        let mut vessel = create_test_vessel(2);
        vessel.resources.insert(
            1,
            ResourceReading::new().with(FuelType::SolidFuel, 0.0, 800.0),
        );

        let controller = StageController::new(0);
        assert!(controller.autostage(&mut vessel).unwrap());
        assert_eq!(vessel.commands, vec![Command::NextStage]);
    }

    #[test]
    fn test_no_staging_while_fuel_remains() {
        let mut vessel = create_test_vessel(2);
        vessel.resources.insert(
            1,
            ResourceReading::new()
                .with(FuelType::LiquidFuel, 120.0, 360.0)
                .with(FuelType::SolidFuel, 10.0, 400.0),
        );

        let controller = StageController::new(0);
        assert!(!controller.autostage(&mut vessel).unwrap());
        assert!(vessel.commands.is_empty());
    }

    #[test]
    fn test_interstage_is_skipped() {
        let mut vessel = create_test_vessel(2);
        vessel.resources.insert(1, ResourceReading::new());

        let controller = StageController::new(0);
        assert!(controller.autostage(&mut vessel).unwrap());
        assert_eq!(vessel.staging_calls(), 1);
    }

    #[test]
    fn test_floor_is_never_passed() {
        let controller = StageController::new(1);

        for stage in [1, 0, -1] {
            let mut vessel = create_test_vessel(stage);
            assert!(controller.out_of_stages(&mut vessel).unwrap());
            assert!(!controller.autostage(&mut vessel).unwrap());
            assert!(
                vessel.commands.is_empty(),
                "Stage {} is at or below the floor",
                stage
            );
        }
    }

    #[test]
    fn test_floor_follows_the_vessel() {
        let controller = StageController::new(1);
        let mut vessel = create_test_vessel(2);
        vessel.resources.insert(1, ResourceReading::new());

        assert!(!controller.out_of_stages(&mut vessel).unwrap());
        assert!(controller.autostage(&mut vessel).unwrap());
        assert!(controller.out_of_stages(&mut vessel).unwrap());
        assert!(!controller.autostage(&mut vessel).unwrap());
        assert_eq!(vessel.staging_calls(), 1);
    }

    #[test]
    fn test_stages_bottom_to_top() {
        let controller = StageController::new(0);
        let stages: Vec<i32> = controller.stages_bottom_to_top(4).collect();
        assert_eq!(stages, vec![3, 2, 1, 0]);

        let controller = StageController::new(2);
        assert_eq!(controller.stages_bottom_to_top(2).count(), 0);
    }

    #[test]
    fn test_stage_stats_skip_zero_capacity() {
        let mut vessel = create_test_vessel(3);
        vessel.resources.insert(
            2,
            ResourceReading::new().with(FuelType::SolidFuel, 200.0, 800.0),
        );
        vessel.resources.insert(
            1,
            ResourceReading::new().with(FuelType::LiquidFuel, 360.0, 360.0),
        );

        let controller = StageController::new(0);
        let stats = controller.show_stage_stats(&mut vessel).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].stage, 2);
        assert_eq!(stats[0].fuel, FuelType::SolidFuel);
        assert_abs_diff_eq!(stats[0].fraction, 0.25, epsilon = 1e-9);
        assert_eq!(stats[1].stage, 1);
        assert_abs_diff_eq!(stats[1].fraction, 1.0, epsilon = 1e-9);
        assert!(vessel.commands.is_empty(), "Reporting must not stage");
    }
}
