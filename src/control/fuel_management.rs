use std::collections::HashMap;
use std::fmt;

pub const ALL_FUELS: [FuelType; 2] = [FuelType::LiquidFuel, FuelType::SolidFuel];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FuelType {
    LiquidFuel,
    SolidFuel,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::LiquidFuel => "LiquidFuel",
            FuelType::SolidFuel => "SolidFuel",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
struct ResourceLevel {
    amount: f64,
    capacity: f64,
}

/// Snapshot of the fuel held by the parts of a single decouple stage.
#[derive(Clone, Debug, Default)]
pub struct ResourceReading {
    levels: HashMap<FuelType, ResourceLevel>,
}

impl ResourceReading {
    pub fn new() -> Self {
        ResourceReading::default()
    }

    pub fn with(mut self, fuel: FuelType, amount: f64, capacity: f64) -> Self {
        self.add(fuel, amount, capacity);
        self
    }

    /// Accumulates into any level already recorded for `fuel`.
    pub fn add(&mut self, fuel: FuelType, amount: f64, capacity: f64) {
        let level = self.levels.entry(fuel).or_default();
        level.amount += amount;
        level.capacity += capacity;
    }

    pub fn amount(&self, fuel: FuelType) -> f64 {
        self.levels.get(&fuel).map_or(0.0, |level| level.amount)
    }

    pub fn max(&self, fuel: FuelType) -> f64 {
        self.levels.get(&fuel).map_or(0.0, |level| level.capacity)
    }

    pub fn has_resource(&self, fuel: FuelType) -> bool {
        self.max(fuel) > 0.0
    }

    pub fn out_of_fuel(&self, fuel: FuelType) -> bool {
        self.max(fuel) > 0.0 && self.amount(fuel) <= 0.0
    }

    /// Remaining fraction, or `None` when the stage has no capacity for `fuel`.
    pub fn fraction(&self, fuel: FuelType) -> Option<f64> {
        let capacity = self.max(fuel);
        if capacity > 0.0 {
            Some(self.amount(fuel) / capacity)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_empty_reading_has_no_resources() {
        let reading = ResourceReading::new();
        for fuel in ALL_FUELS {
            assert!(!reading.has_resource(fuel));
            assert!(!reading.out_of_fuel(fuel));
            assert_eq!(reading.fraction(fuel), None);
        }
    }

    #[test]
    fn test_out_of_fuel_requires_capacity() {
        let reading = ResourceReading::new()
            .with(FuelType::LiquidFuel, 0.0, 360.0)
            .with(FuelType::SolidFuel, 0.0, 0.0);
        assert!(reading.out_of_fuel(FuelType::LiquidFuel));
        assert!(!reading.out_of_fuel(FuelType::SolidFuel));
    }

    #[test]
    fn test_levels_accumulate_across_parts() {
        let mut reading = ResourceReading::new();
        reading.add(FuelType::SolidFuel, 100.0, 400.0);
        reading.add(FuelType::SolidFuel, 300.0, 400.0);
        assert_abs_diff_eq!(reading.amount(FuelType::SolidFuel), 400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(reading.max(FuelType::SolidFuel), 800.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            reading.fraction(FuelType::SolidFuel).unwrap(),
            0.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_fuel_names() {
        assert_eq!(FuelType::LiquidFuel.to_string(), "LiquidFuel");
        assert_eq!(FuelType::SolidFuel.as_str(), "SolidFuel");
    }
}
