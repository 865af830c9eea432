//! Chi-square measurement estimator.

// Local errors and window half-widths are f32 quantities; the cut
// parameters are f64. The narrowing casts below are intrinsic.
#![allow(clippy::cast_possible_truncation)]

use rustrack_core::estimator::{Compatibility, MeasurementEstimator};
use rustrack_core::hit::TrackerHit;
use rustrack_core::payload::FilterPayload;
use rustrack_core::trajectory::TrajectoryStateOnSurface;

/// Default sagitta bound; negative means no bound is applied.
pub const DEFAULT_MAX_SAGITTA: f64 = -1.0;

/// Default minimal tolerance for local acceptance windows.
pub const DEFAULT_MIN_TOLERANCE: f64 = 10.0;

/// Estimates track-hit compatibility from the local chi-square.
///
/// A hit is compatible when the chi-square of its local position against
/// the predicted state, weighted by the combined 2x2 covariance, stays
/// within `max_chi2`. The remaining parameters tune the acceptance
/// windows derived by the search machinery: `n_sigma` inflates the
/// trajectory errors, `max_sagitta` bounds the allowed trajectory bending
/// and `min_tolerance` floors the window half-widths.
#[derive(Debug, Clone, PartialEq)]
pub struct Chi2MeasurementEstimator {
    max_chi2: f64,
    n_sigma: f64,
    max_sagitta: f64,
    min_tolerance: f64,
}

impl Chi2MeasurementEstimator {
    /// Creates an estimator with the given chi-square and sigma cuts and
    /// default window tuning.
    #[must_use]
    pub fn new(max_chi2: f64, n_sigma: f64) -> Self {
        Self::with_bounds(max_chi2, n_sigma, DEFAULT_MAX_SAGITTA, DEFAULT_MIN_TOLERANCE)
    }

    /// Creates an estimator with explicit window tuning.
    #[must_use]
    pub fn with_bounds(max_chi2: f64, n_sigma: f64, max_sagitta: f64, min_tolerance: f64) -> Self {
        Self {
            max_chi2,
            n_sigma,
            max_sagitta,
            min_tolerance,
        }
    }

    /// Half-widths of the local search window around the predicted
    /// position: the trajectory errors scaled by the sigma cut.
    #[must_use]
    pub fn maximal_local_displacement(&self, state: &TrajectoryStateOnSurface) -> (f32, f32) {
        let error = state.local_error();
        let scale = (self.n_sigma * self.n_sigma) as f32;
        ((error.xx * scale).sqrt(), (error.yy * scale).sqrt())
    }
}

impl MeasurementEstimator for Chi2MeasurementEstimator {
    fn estimate(&self, state: &TrajectoryStateOnSurface, hit: &TrackerHit) -> Compatibility {
        let rx = f64::from(hit.position.x - state.local_position().x);
        let ry = f64::from(hit.position.y - state.local_position().y);

        let state_error = state.local_error();
        let xx = f64::from(hit.error.xx + state_error.xx);
        let xy = f64::from(hit.error.xy + state_error.xy);
        let yy = f64::from(hit.error.yy + state_error.yy);

        // Combined covariance must be positive definite to be invertible.
        let det = xx * yy - xy * xy;
        if !det.is_finite() || det <= 0.0 {
            return Compatibility::incompatible();
        }

        let chi2 = (rx * rx * yy - 2.0 * rx * ry * xy + ry * ry * xx) / det;
        Compatibility {
            compatible: chi2 <= self.max_chi2,
            chi2,
        }
    }

    fn pre_filter(&self, _state: &TrajectoryStateOnSurface, _payload: &FilterPayload<'_>) -> bool {
        true
    }

    fn chi_squared_cut(&self) -> f64 {
        self.max_chi2
    }

    fn n_sigma_cut(&self) -> f64 {
        self.n_sigma
    }

    fn max_sagitta(&self) -> f64 {
        self.max_sagitta
    }

    fn min_tolerance(&self) -> f64 {
        self.min_tolerance
    }

    fn clone_box(&self) -> Box<dyn MeasurementEstimator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rustrack_core::detid::{DetId, SubDetector};
    use rustrack_core::geometry::{GlobalVector, LocalError, LocalPoint};
    use rustrack_core::trajectory::LocalTrajectoryParameters;

    fn state_at(x: f32, y: f32, error: LocalError) -> TrajectoryStateOnSurface {
        TrajectoryStateOnSurface::new(
            LocalTrajectoryParameters::new(0.5, 0.0, 0.0),
            LocalPoint::new(x, y),
            error,
            GlobalVector::new(1.0, 0.0, 0.0),
        )
    }

    fn hit_at(x: f32, y: f32, error: LocalError) -> TrackerHit {
        TrackerHit::new(
            DetId::new(SubDetector::PixelBarrel, 1),
            LocalPoint::new(x, y),
            error,
        )
    }

    #[test]
    fn diagonal_covariance_reduces_to_pull_sum() {
        let estimator = Chi2MeasurementEstimator::new(30.0, 3.0);
        let state = state_at(0.0, 0.0, LocalError::new(0.5, 0.0, 0.5));
        let hit = hit_at(1.0, 2.0, LocalError::new(0.5, 0.0, 0.5));

        // Combined variances are 1.0 in both coordinates.
        let result = estimator.estimate(&state, &hit);
        assert!(result.compatible);
        assert_relative_eq!(result.chi2, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn small_residual_small_variance() {
        let estimator = Chi2MeasurementEstimator::new(30.0, 3.0);
        let state = state_at(0.0, 0.0, LocalError::new(0.01, 0.0, 0.01));
        let hit = hit_at(0.1, 0.0, LocalError::new(0.01, 0.0, 0.01));

        // 0.1^2 / 0.02 = 0.5.
        let result = estimator.estimate(&state, &hit);
        assert!(result.compatible);
        assert_relative_eq!(result.chi2, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn correlated_covariance() {
        let estimator = Chi2MeasurementEstimator::new(30.0, 3.0);
        let state = state_at(0.0, 0.0, LocalError::new(1.0, 0.5, 1.0));
        let hit = hit_at(1.0, 1.0, LocalError::new(1.0, 0.5, 1.0));

        // det = 4 - 1 = 3, chi2 = (2 - 2 + 2) / 3.
        let result = estimator.estimate(&state, &hit);
        assert!(result.compatible);
        assert_relative_eq!(result.chi2, 2.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn rejects_beyond_cut() {
        let estimator = Chi2MeasurementEstimator::new(4.0, 3.0);
        let state = state_at(0.0, 0.0, LocalError::new(0.5, 0.0, 0.5));
        let hit = hit_at(3.0, 0.0, LocalError::new(0.5, 0.0, 0.5));

        let result = estimator.estimate(&state, &hit);
        assert!(!result.compatible);
        assert_relative_eq!(result.chi2, 9.0, epsilon = 1e-6);
    }

    #[test]
    fn chi2_at_cut_is_compatible() {
        let estimator = Chi2MeasurementEstimator::new(9.0, 3.0);
        let state = state_at(0.0, 0.0, LocalError::new(0.5, 0.0, 0.5));
        let hit = hit_at(3.0, 0.0, LocalError::new(0.5, 0.0, 0.5));

        assert!(estimator.estimate(&state, &hit).compatible);
    }

    #[test]
    fn degenerate_covariance_is_incompatible() {
        let estimator = Chi2MeasurementEstimator::new(30.0, 3.0);
        let state = state_at(0.0, 0.0, LocalError::new(0.0, 0.0, 0.0));
        let hit = hit_at(0.1, 0.1, LocalError::new(0.0, 0.0, 0.0));

        let result = estimator.estimate(&state, &hit);
        assert!(!result.compatible);
        assert_eq!(result.chi2, f64::MAX);
    }

    #[test]
    fn pre_filter_accepts_everything() {
        let estimator = Chi2MeasurementEstimator::new(30.0, 3.0);
        let state = state_at(0.0, 0.0, LocalError::new(1.0, 0.0, 1.0));
        assert!(estimator.pre_filter(&state, &FilterPayload::Empty));
    }

    #[test]
    fn default_window_tuning() {
        let estimator = Chi2MeasurementEstimator::new(30.0, 3.0);
        assert_relative_eq!(estimator.chi_squared_cut(), 30.0);
        assert_relative_eq!(estimator.n_sigma_cut(), 3.0);
        assert_relative_eq!(estimator.max_sagitta(), -1.0);
        assert_relative_eq!(estimator.min_tolerance(), 10.0);
    }

    #[test]
    fn maximal_local_displacement_scales_errors() {
        let estimator = Chi2MeasurementEstimator::new(30.0, 2.0);
        let state = state_at(0.0, 0.0, LocalError::new(4.0, 0.0, 9.0));

        let (dx, dy) = estimator.maximal_local_displacement(&state);
        assert_relative_eq!(dx, 4.0, epsilon = 1e-6);
        assert_relative_eq!(dy, 6.0, epsilon = 1e-6);
    }

    #[test]
    fn clone_box_preserves_cuts() {
        let estimator = Chi2MeasurementEstimator::with_bounds(12.0, 4.0, 2.0, 5.0);
        let boxed = estimator.clone_box();
        assert_relative_eq!(boxed.chi_squared_cut(), 12.0);
        assert_relative_eq!(boxed.n_sigma_cut(), 4.0);
        assert_relative_eq!(boxed.max_sagitta(), 2.0);
        assert_relative_eq!(boxed.min_tolerance(), 5.0);
    }
}
