//! Cluster charge normalization.
//!
//! Charge thresholds are calibrated per unit of path length through the
//! sensor, so raw cluster charge is divided by the traversed silicon
//! length before any comparison. This makes the cut independent of the
//! incidence angle.

use crate::cluster::StripCluster;
use crate::detid::{DetId, SubDetector};
use crate::trajectory::LocalTrajectoryParameters;

/// Inverse sensor thickness in 1/cm for a module.
///
/// Pixel sensors are 285 um thick, inner strip sensors (TIB/TID) 320 um,
/// outer strip sensors (TOB/TEC) 500 um.
#[inline]
#[must_use]
pub fn sensor_thickness_inverse(det_id: DetId) -> f32 {
    match det_id.subdet {
        SubDetector::PixelBarrel | SubDetector::PixelEndcap => 1.0 / 0.0285,
        SubDetector::Tib | SubDetector::Tid => 1.0 / 0.032,
        SubDetector::Tob | SubDetector::Tec => 1.0 / 0.05,
    }
}

/// Cluster charge normalized by the local path length through the sensor.
///
/// The path length is the sensor thickness divided by the cosine of the
/// local polar angle, so the normalized charge is
/// `charge * abs_dz / thickness`, in ADC counts per cm.
#[inline]
#[must_use]
pub fn charge_per_cm(
    det_id: DetId,
    cluster: &StripCluster,
    params: &LocalTrajectoryParameters,
) -> f32 {
    cluster.charge() * sensor_thickness_inverse(det_id) * params.abs_dz()
}
