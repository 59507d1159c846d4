use crate::constants::{
    AIR_DENSITY_SEA_LEVEL, KERBIN_ATMOSPHERE_HEIGHT, KERBIN_GRAVITATIONAL_PARAMETER, KERBIN_RADIUS,
    KERBIN_SCALE_HEIGHT,
};
use crate::utils::vector2d::Vector2D;

#[derive(Clone, Debug)]
pub struct CelestialBody {
    pub name: String,
    pub radius: f64,
    pub gravitational_parameter: f64,
    pub atmosphere_height: f64,
    pub scale_height: f64,
    pub sea_level_density: f64,
    /// Eastward surface speed at the launch site.
    pub surface_speed: f64,
}

impl CelestialBody {
    pub fn kerbin() -> Self {
        CelestialBody {
            name: "Kerbin".to_string(),
            radius: KERBIN_RADIUS,
            gravitational_parameter: KERBIN_GRAVITATIONAL_PARAMETER,
            atmosphere_height: KERBIN_ATMOSPHERE_HEIGHT,
            scale_height: KERBIN_SCALE_HEIGHT,
            sea_level_density: AIR_DENSITY_SEA_LEVEL,
            surface_speed: 174.94,
        }
    }

    pub fn altitude_of(&self, position: &Vector2D) -> f64 {
        position.magnitude() - self.radius
    }

    pub fn surface_gravity(&self) -> f64 {
        self.gravitational_parameter / self.radius.powi(2)
    }

    pub fn gravity_at_altitude(&self, altitude: f64) -> f64 {
        let distance = self.radius + altitude;
        self.gravitational_parameter / distance.powi(2)
    }

    pub fn gravity_vector(&self, position: &Vector2D) -> Vector2D {
        let distance = position.magnitude();
        -*position * (self.gravitational_parameter / distance.powi(3))
    }

    pub fn is_in_atmosphere(&self, altitude: f64) -> bool {
        altitude < self.atmosphere_height
    }

    pub fn air_density(&self, altitude: f64) -> f64 {
        if !self.is_in_atmosphere(altitude) {
            return 0.0;
        }
        self.sea_level_density * (-altitude.max(0.0) / self.scale_height).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kerbin_surface_gravity() {
        let kerbin = CelestialBody::kerbin();
        assert_abs_diff_eq!(kerbin.surface_gravity(), 9.81, epsilon = 1e-2);
    }

    #[test]
    fn test_gravity_variation_with_altitude() {
        let kerbin = CelestialBody::kerbin();
        let sea_level = kerbin.gravity_at_altitude(0.0);
        let at_100km = kerbin.gravity_at_altitude(100_000.0);

        assert!(at_100km < sea_level);
        let expected_ratio = (kerbin.radius / (kerbin.radius + 100_000.0)).powi(2);
        assert_abs_diff_eq!(at_100km / sea_level, expected_ratio, epsilon = 1e-12);
    }

    #[test]
    fn test_gravity_vector_points_down() {
        let kerbin = CelestialBody::kerbin();
        let position = Vector2D::new(0.0, kerbin.radius);
        let gravity = kerbin.gravity_vector(&position);
        assert_abs_diff_eq!(gravity.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(gravity.y, -kerbin.surface_gravity(), epsilon = 1e-9);
    }

    #[test]
    fn test_atmosphere_density() {
        let kerbin = CelestialBody::kerbin();
        assert_abs_diff_eq!(kerbin.air_density(0.0), 1.225, epsilon = 1e-9);
        assert_abs_diff_eq!(
            kerbin.air_density(kerbin.scale_height),
            1.225 / std::f64::consts::E,
            epsilon = 1e-9
        );
        assert_eq!(kerbin.air_density(70_000.0), 0.0);
        assert_eq!(kerbin.air_density(100_000.0), 0.0);
    }

    #[test]
    fn test_altitude_of() {
        let kerbin = CelestialBody::kerbin();
        let position = Vector2D::new(kerbin.radius + 2_000.0, 0.0);
        assert_abs_diff_eq!(kerbin.altitude_of(&position), 2_000.0, epsilon = 1e-6);
    }
}
