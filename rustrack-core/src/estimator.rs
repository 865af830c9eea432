//! The measurement estimator capability set.

use crate::hit::TrackerHit;
use crate::payload::FilterPayload;
use crate::trajectory::TrajectoryStateOnSurface;

/// Outcome of a chi-square compatibility evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compatibility {
    /// Whether the hit passes the chi-square cut.
    pub compatible: bool,
    /// The chi-square value of the comparison.
    pub chi2: f64,
}

impl Compatibility {
    /// A rejected evaluation without a meaningful chi-square, used when
    /// the covariance is degenerate.
    #[inline]
    #[must_use]
    pub fn incompatible() -> Self {
        Self {
            compatible: false,
            chi2: f64::MAX,
        }
    }
}

/// Trait for measurement compatibility estimators.
///
/// An estimator decides whether a measured hit is statistically compatible
/// with a predicted trajectory state. Implementations are immutable after
/// construction and shared read-only across trajectory-search threads.
///
/// [`pre_filter`](MeasurementEstimator::pre_filter) is a cheap acceptance
/// test run once per candidate before the full evaluation; the default
/// accepts everything, and augmented estimators override it.
pub trait MeasurementEstimator: Send + Sync {
    /// Evaluates chi-square compatibility between a predicted state and a
    /// measured hit.
    fn estimate(&self, state: &TrajectoryStateOnSurface, hit: &TrackerHit) -> Compatibility;

    /// Cheap pre-check applied before [`estimate`](MeasurementEstimator::estimate).
    ///
    /// Must accept payload kinds it does not recognize; returning `false`
    /// discards the candidate without further cost.
    fn pre_filter(&self, state: &TrajectoryStateOnSurface, payload: &FilterPayload<'_>) -> bool {
        let _ = (state, payload);
        true
    }

    /// Chi-square acceptance bound.
    fn chi_squared_cut(&self) -> f64;

    /// Error inflation multiplier defining geometric acceptance windows.
    fn n_sigma_cut(&self) -> f64;

    /// Sagitta bound for acceptance windows; negative when unset.
    fn max_sagitta(&self) -> f64;

    /// Lower bound on acceptance window half-widths.
    fn min_tolerance(&self) -> f64;

    /// Deep, independent copy for contexts that own estimator values.
    fn clone_box(&self) -> Box<dyn MeasurementEstimator>;
}

impl Clone for Box<dyn MeasurementEstimator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
