use crate::utils::vector2d::Vector2D;

#[derive(Debug, Clone)]
pub struct Aerodynamics {
    pub drag_coefficient: f64,
    pub reference_area: f64, // m²
}

impl Aerodynamics {
    pub fn new(drag_coefficient: f64, reference_area: f64) -> Self {
        Aerodynamics {
            drag_coefficient,
            reference_area,
        }
    }

    pub fn dynamic_pressure(&self, velocity: Vector2D, air_density: f64) -> f64 {
        0.5 * air_density * velocity.magnitude().powi(2)
    }

    pub fn calculate_drag(&self, velocity: Vector2D, air_density: f64) -> Vector2D {
        let speed = velocity.magnitude();
        if speed == 0.0 || air_density == 0.0 {
            return Vector2D::zero();
        }
        let drag_magnitude = self.dynamic_pressure(velocity, air_density)
            * self.reference_area
            * self.drag_coefficient;
        -velocity.normalize() * drag_magnitude
    }
}
