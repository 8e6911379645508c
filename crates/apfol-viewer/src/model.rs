//! Model framing.

use serde::{Deserialize, Serialize};

/// Edge length the largest model dimension is scaled to.
pub const FIT_SIZE: f64 = 2.0;

/// Axis-aligned size of a model's bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundsSize {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BoundsSize {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn max_dim(&self) -> f64 {
        self.x.max(self.y).max(self.z)
    }
}

/// Uniform scale that makes the largest dimension [`FIT_SIZE`] long.
///
/// `None` for degenerate bounds.
pub fn fit_scale(size: BoundsSize) -> Option<f64> {
    let max_dim = size.max_dim();
    if max_dim.is_finite() && max_dim > 0.0 {
        Some(FIT_SIZE / max_dim)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_uses_largest_dimension() {
        assert_eq!(fit_scale(BoundsSize::new(0.5, 4.0, 1.0)), Some(0.5));
        assert_eq!(fit_scale(BoundsSize::new(1.0, 1.0, 1.0)), Some(2.0));
    }

    #[test]
    fn test_fit_scale_degenerate() {
        assert_eq!(fit_scale(BoundsSize::default()), None);
        assert_eq!(fit_scale(BoundsSize::new(f64::NAN, 0.0, 0.0)), None);
    }
}
