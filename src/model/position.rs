//! 3D point type.

/// A point in 3D space, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_pythagorean() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 12.0);
        assert!((a.distance(&b) - 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_symmetric_and_zero_on_self() {
        let a = Position::new(1.5, -2.0, 30.0);
        let b = Position::new(-7.0, 4.25, 0.0);
        assert!((a.distance(&b) - b.distance(&a)).abs() < 1e-12);
        assert_eq!(a.distance(&a), 0.0);
    }
}
