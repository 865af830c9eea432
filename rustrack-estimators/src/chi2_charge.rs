//! Chi-square estimator with a cluster charge pre-filter.

use rustrack_core::charge::charge_per_cm;
use rustrack_core::cluster::StripCluster;
use rustrack_core::detid::DetId;
use rustrack_core::estimator::{Compatibility, MeasurementEstimator};
use rustrack_core::hit::TrackerHit;
use rustrack_core::payload::FilterPayload;
use rustrack_core::trajectory::TrajectoryStateOnSurface;

use crate::chi2::Chi2MeasurementEstimator;

/// Charge thresholds for the augmented estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeCuts {
    /// Minimum pixel cluster charge. Stored but not applied; the pixel
    /// charge cut is not implemented.
    pub min_good_pixel_charge: f32,
    /// Minimum strip cluster charge per cm of traversed silicon.
    pub min_good_strip_charge: f32,
    /// Transverse momentum above which the charge cut is bypassed, in
    /// GeV. Negative disables the bypass entirely.
    pub pt_charge_cut_threshold: f32,
}

impl Default for ChargeCuts {
    fn default() -> Self {
        Self {
            min_good_pixel_charge: 0.0,
            min_good_strip_charge: 1620.0,
            pt_charge_cut_threshold: -1.0,
        }
    }
}

/// Chi-square estimator that rejects low-charge strip clusters first.
///
/// Wraps a [`Chi2MeasurementEstimator`] and keeps its compatibility
/// evaluation unchanged. `pre_filter` discards candidates whose strip
/// clusters fall below the charge-per-cm threshold, so backgrounds from
/// out-of-time or highly inclined hits never reach the chi-square stage.
/// Tracks above the momentum threshold skip the cut.
#[derive(Debug, Clone)]
pub struct Chi2ChargeMeasurementEstimator {
    chi2: Chi2MeasurementEstimator,
    min_good_pixel_charge: f32,
    min_good_strip_charge: f32,
    pt_charge_cut_threshold2: f32,
}

impl Chi2ChargeMeasurementEstimator {
    /// Wraps a base estimator with the given charge cuts.
    ///
    /// The momentum threshold is stored squared for comparison against
    /// `perp2`. A negative threshold stores `f32::MAX` instead, so the
    /// bypass never fires and the charge cut applies at every momentum.
    #[must_use]
    pub fn new(chi2: Chi2MeasurementEstimator, cuts: ChargeCuts) -> Self {
        let pt_charge_cut_threshold2 = if cuts.pt_charge_cut_threshold >= 0.0 {
            cuts.pt_charge_cut_threshold * cuts.pt_charge_cut_threshold
        } else {
            f32::MAX
        };
        Self {
            chi2,
            min_good_pixel_charge: cuts.min_good_pixel_charge,
            min_good_strip_charge: cuts.min_good_strip_charge,
            pt_charge_cut_threshold2,
        }
    }

    /// Minimum pixel cluster charge. Never consulted by the pre-filter.
    #[must_use]
    pub fn min_good_pixel_charge(&self) -> f32 {
        self.min_good_pixel_charge
    }

    /// Minimum strip cluster charge per cm.
    #[must_use]
    pub fn min_good_strip_charge(&self) -> f32 {
        self.min_good_strip_charge
    }

    /// Squared momentum bypass threshold; `f32::MAX` when the bypass is
    /// disabled.
    #[must_use]
    pub fn pt_charge_cut_threshold2(&self) -> f32 {
        self.pt_charge_cut_threshold2
    }

    fn check_cluster_charge(
        &self,
        det_id: DetId,
        cluster: &StripCluster,
        state: &TrajectoryStateOnSurface,
    ) -> bool {
        charge_per_cm(det_id, cluster, &state.local_parameters()) > self.min_good_strip_charge
    }
}

impl MeasurementEstimator for Chi2ChargeMeasurementEstimator {
    fn estimate(&self, state: &TrajectoryStateOnSurface, hit: &TrackerHit) -> Compatibility {
        self.chi2.estimate(state, hit)
    }

    fn pre_filter(&self, state: &TrajectoryStateOnSurface, payload: &FilterPayload<'_>) -> bool {
        let (det_id, primary, secondary) = match *payload {
            FilterPayload::ClusterFilter {
                det_id,
                primary,
                secondary,
            } => (det_id, primary, secondary),
            // Not a cluster payload, nothing to check.
            _ => return true,
        };

        if state.global_momentum().perp2() > self.pt_charge_cut_threshold2 {
            return true;
        }

        if det_id.is_strip() {
            let primary_ok =
                primary.is_none_or(|cluster| self.check_cluster_charge(det_id, cluster, state));
            let secondary_ok =
                secondary.is_none_or(|cluster| self.check_cluster_charge(det_id, cluster, state));
            return primary_ok && secondary_ok;
        }

        // Pixel charge cut not implemented as not used.
        true
    }

    fn chi_squared_cut(&self) -> f64 {
        self.chi2.chi_squared_cut()
    }

    fn n_sigma_cut(&self) -> f64 {
        self.chi2.n_sigma_cut()
    }

    fn max_sagitta(&self) -> f64 {
        self.chi2.max_sagitta()
    }

    fn min_tolerance(&self) -> f64 {
        self.chi2.min_tolerance()
    }

    fn clone_box(&self) -> Box<dyn MeasurementEstimator> {
        Box::new(self.clone())
    }
}
