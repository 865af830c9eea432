//! Geometry value types for trajectory states and hits.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A vector in the global detector frame.
///
/// The z axis points along the beam line, so the transverse plane is x-y.
/// Units are GeV when the vector carries a momentum.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlobalVector {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component (along the beam axis).
    pub z: f32,
}

impl GlobalVector {
    /// Creates a new vector.
    #[inline]
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude of the transverse component.
    #[inline]
    #[must_use]
    pub fn perp2(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Magnitude of the transverse component.
    #[inline]
    #[must_use]
    pub fn perp(&self) -> f32 {
        self.perp2().sqrt()
    }

    /// Squared magnitude.
    #[inline]
    #[must_use]
    pub fn mag2(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude.
    #[inline]
    #[must_use]
    pub fn mag(&self) -> f32 {
        self.mag2().sqrt()
    }
}

/// A position in the local frame of a sensor, in cm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalPoint {
    /// Local x coordinate (across the strips).
    pub x: f32,
    /// Local y coordinate (along the strips).
    pub y: f32,
}

impl LocalPoint {
    /// Creates a new local point.
    #[inline]
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Symmetric 2x2 position covariance in the local frame, in cm^2.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalError {
    /// Variance along local x.
    pub xx: f32,
    /// Covariance between local x and y.
    pub xy: f32,
    /// Variance along local y.
    pub yy: f32,
}

impl LocalError {
    /// Creates a new covariance matrix.
    #[inline]
    #[must_use]
    pub fn new(xx: f32, xy: f32, yy: f32) -> Self {
        Self { xx, xy, yy }
    }

    /// Returns the matrix scaled by a factor.
    #[inline]
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            xx: self.xx * factor,
            xy: self.xy * factor,
            yy: self.yy * factor,
        }
    }

    /// Checks that the matrix is finite with non-negative variances.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.xx.is_finite()
            && self.xy.is_finite()
            && self.yy.is_finite()
            && self.xx >= 0.0
            && self.yy >= 0.0
    }
}
