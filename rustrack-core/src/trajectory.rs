//! Trajectory state types.

use crate::geometry::{GlobalVector, LocalError, LocalPoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Trajectory parameters in the local frame of a sensor.
///
/// The local direction is the vector `(dxdz, dydz, 1)` normalized, so a
/// track crossing the sensor perpendicularly has `dxdz = dydz = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalTrajectoryParameters {
    /// Signed inverse momentum q/p, in 1/GeV.
    pub qbp: f32,
    /// Direction tangent in the local x-z plane.
    pub dxdz: f32,
    /// Direction tangent in the local y-z plane.
    pub dydz: f32,
}

impl LocalTrajectoryParameters {
    /// Creates new local parameters.
    #[inline]
    #[must_use]
    pub fn new(qbp: f32, dxdz: f32, dydz: f32) -> Self {
        Self { qbp, dxdz, dydz }
    }

    /// Magnitude of the z component of the normalized local direction.
    ///
    /// Equals the cosine of the local polar angle: 1 for perpendicular
    /// incidence, smaller for grazing tracks.
    #[inline]
    #[must_use]
    pub fn abs_dz(&self) -> f32 {
        1.0 / (1.0 + self.dxdz * self.dxdz + self.dydz * self.dydz).sqrt()
    }
}

/// Estimated state of a particle on a sensor surface.
///
/// Immutable value type: position and uncertainty in the local frame plus
/// the momentum vector in the global frame. States are produced by the
/// propagation machinery upstream and only read here.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectoryStateOnSurface {
    local_parameters: LocalTrajectoryParameters,
    local_position: LocalPoint,
    local_error: LocalError,
    global_momentum: GlobalVector,
}

impl TrajectoryStateOnSurface {
    /// Creates a new state.
    #[must_use]
    pub fn new(
        local_parameters: LocalTrajectoryParameters,
        local_position: LocalPoint,
        local_error: LocalError,
        global_momentum: GlobalVector,
    ) -> Self {
        Self {
            local_parameters,
            local_position,
            local_error,
            global_momentum,
        }
    }

    /// Local trajectory parameters.
    #[inline]
    #[must_use]
    pub fn local_parameters(&self) -> LocalTrajectoryParameters {
        self.local_parameters
    }

    /// Predicted position in the sensor-local frame.
    #[inline]
    #[must_use]
    pub fn local_position(&self) -> LocalPoint {
        self.local_position
    }

    /// Position covariance in the sensor-local frame.
    #[inline]
    #[must_use]
    pub fn local_error(&self) -> LocalError {
        self.local_error
    }

    /// Momentum vector in the global frame.
    #[inline]
    #[must_use]
    pub fn global_momentum(&self) -> GlobalVector {
        self.global_momentum
    }
}
