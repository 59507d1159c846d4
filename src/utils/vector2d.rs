use std::ops::{Add, Div, Mul, Neg, Sub};

/// Vector in the orbital plane, body-centered, meters or meters per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn zero() -> Self {
        Vector2D::new(0.0, 0.0)
    }

    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            *self
        } else {
            Vector2D::new(self.x / mag, self.y / mag)
        }
    }

    pub fn dot(&self, other: &Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product; specific angular momentum when
    /// applied to position and velocity.
    pub fn cross(&self, other: &Vector2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotated a quarter turn clockwise. The simulator uses this as local east
    /// when applied to the radial unit vector.
    pub fn clockwise_normal(&self) -> Self {
        Vector2D::new(self.y, -self.x)
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }
}

impl Mul<Vector2D> for f64 {
    type Output = Vector2D;

    fn mul(self, vector: Vector2D) -> Vector2D {
        Vector2D::new(self * vector.x, self * vector.y)
    }
}

impl Div<f64> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Vector2D::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Vector2D::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_and_normal() {
        let up = Vector2D::new(0.0, 1.0);
        let east = up.clockwise_normal();
        assert_eq!(east, Vector2D::new(1.0, 0.0));
        // position up, velocity east: clockwise motion, negative momentum
        assert_eq!(up.cross(&east), -1.0);
        assert_eq!(east.cross(&up), 1.0);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vector2D::zero().normalize(), Vector2D::zero());
        assert_eq!(Vector2D::new(3.0, 4.0).normalize(), Vector2D::new(0.6, 0.8));
    }
}
