//! Compatibility search over hit candidates.
//!
//! Combines the two estimator stages the way a measurement lookup does:
//! every candidate goes through the cheap `pre_filter` first and only
//! survivors pay for a chi-square evaluation.

use rayon::prelude::*;

use rustrack_core::estimator::MeasurementEstimator;
use rustrack_core::hit::HitCandidate;
use rustrack_core::trajectory::TrajectoryStateOnSurface;

/// An accepted candidate with its chi-square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompatibleMeasurement {
    /// Index of the candidate in the searched slice.
    pub index: usize,
    /// Chi-square of the accepted comparison.
    pub chi2: f64,
}

/// Counters describing one search pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Candidates examined.
    pub candidates: usize,
    /// Candidates discarded before any chi-square was computed.
    pub prefilter_rejected: usize,
    /// Candidates that reached the chi-square evaluation.
    pub evaluated: usize,
    /// Candidates accepted as compatible.
    pub accepted: usize,
}

impl SearchStatistics {
    /// Folds the counters of another pass into this one.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.candidates += other.candidates;
        self.prefilter_rejected += other.prefilter_rejected;
        self.evaluated += other.evaluated;
        self.accepted += other.accepted;
    }
}

#[derive(Clone, Copy)]
enum Outcome {
    Prefiltered,
    Rejected,
    Accepted(f64),
}

fn classify(
    estimator: &dyn MeasurementEstimator,
    state: &TrajectoryStateOnSurface,
    candidate: &HitCandidate,
) -> Outcome {
    if !estimator.pre_filter(state, &candidate.payload()) {
        return Outcome::Prefiltered;
    }
    let result = estimator.estimate(state, &candidate.hit);
    if result.compatible {
        Outcome::Accepted(result.chi2)
    } else {
        Outcome::Rejected
    }
}

fn tally(outcomes: &[Outcome]) -> (Vec<CompatibleMeasurement>, SearchStatistics) {
    let mut stats = SearchStatistics {
        candidates: outcomes.len(),
        ..SearchStatistics::default()
    };
    let mut accepted = Vec::new();
    for (index, outcome) in outcomes.iter().enumerate() {
        match *outcome {
            Outcome::Prefiltered => stats.prefilter_rejected += 1,
            Outcome::Rejected => stats.evaluated += 1,
            Outcome::Accepted(chi2) => {
                stats.evaluated += 1;
                stats.accepted += 1;
                accepted.push(CompatibleMeasurement { index, chi2 });
            }
        }
    }
    (accepted, stats)
}

/// Collects the candidates compatible with a trajectory state.
///
/// Accepted measurements come back ordered by candidate index together
/// with the pass counters.
#[must_use]
pub fn compatible_measurements(
    estimator: &dyn MeasurementEstimator,
    state: &TrajectoryStateOnSurface,
    candidates: &[HitCandidate],
) -> (Vec<CompatibleMeasurement>, SearchStatistics) {
    let outcomes: Vec<Outcome> = candidates
        .iter()
        .map(|candidate| classify(estimator, state, candidate))
        .collect();
    tally(&outcomes)
}

/// Parallel variant of [`compatible_measurements`].
///
/// Candidates are classified across the rayon pool; results and counters
/// are identical to the sequential pass, including the index order.
#[must_use]
pub fn compatible_measurements_par(
    estimator: &dyn MeasurementEstimator,
    state: &TrajectoryStateOnSurface,
    candidates: &[HitCandidate],
) -> (Vec<CompatibleMeasurement>, SearchStatistics) {
    let outcomes: Vec<Outcome> = candidates
        .par_iter()
        .map(|candidate| classify(estimator, state, candidate))
        .collect();
    tally(&outcomes)
}
