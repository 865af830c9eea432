//! Measured hit and candidate types.

use crate::cluster::StripCluster;
use crate::detid::DetId;
use crate::geometry::{LocalError, LocalPoint};
use crate::payload::FilterPayload;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A measured tracker hit reduced to what compatibility estimation reads.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackerHit {
    /// Module the hit was recorded on.
    pub det_id: DetId,
    /// Measured position in the sensor-local frame.
    pub position: LocalPoint,
    /// Position covariance in the sensor-local frame.
    pub error: LocalError,
}

impl TrackerHit {
    /// Creates a new hit.
    #[inline]
    #[must_use]
    pub fn new(det_id: DetId, position: LocalPoint, error: LocalError) -> Self {
        Self {
            det_id,
            position,
            error,
        }
    }
}

/// A candidate measurement: a hit plus the cluster charge information its
/// filter payload carries.
///
/// Pixel candidates and candidates from sources without cluster data have
/// no clusters; their payload is [`FilterPayload::Empty`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HitCandidate {
    /// The measured hit.
    pub hit: TrackerHit,
    /// Primary cluster of the hit.
    pub primary: Option<StripCluster>,
    /// Secondary cluster of a matched hit.
    pub secondary: Option<StripCluster>,
}

impl HitCandidate {
    /// Creates a candidate without cluster information.
    #[must_use]
    pub fn new(hit: TrackerHit) -> Self {
        Self {
            hit,
            primary: None,
            secondary: None,
        }
    }

    /// Creates a candidate with a single cluster.
    #[must_use]
    pub fn with_cluster(hit: TrackerHit, primary: StripCluster) -> Self {
        Self {
            hit,
            primary: Some(primary),
            secondary: None,
        }
    }

    /// Creates a candidate for a matched hit with two clusters.
    #[must_use]
    pub fn with_matched_clusters(
        hit: TrackerHit,
        primary: StripCluster,
        secondary: StripCluster,
    ) -> Self {
        Self {
            hit,
            primary: Some(primary),
            secondary: Some(secondary),
        }
    }

    /// Borrows the filter payload this candidate carries.
    #[must_use]
    pub fn payload(&self) -> FilterPayload<'_> {
        if self.primary.is_none() && self.secondary.is_none() {
            FilterPayload::Empty
        } else {
            FilterPayload::ClusterFilter {
                det_id: self.hit.det_id,
                primary: self.primary.as_ref(),
                secondary: self.secondary.as_ref(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detid::SubDetector;

    fn strip_hit() -> TrackerHit {
        TrackerHit::new(
            DetId::new(SubDetector::Tob, 7),
            LocalPoint::new(0.1, 0.2),
            LocalError::new(0.01, 0.0, 0.01),
        )
    }

    #[test]
    fn test_candidate_without_clusters_has_empty_payload() {
        let candidate = HitCandidate::new(strip_hit());
        assert!(!candidate.payload().is_cluster_filter());
    }

    #[test]
    fn test_candidate_payload_borrows_clusters() {
        let candidate = HitCandidate::with_matched_clusters(
            strip_hit(),
            StripCluster::new(0, vec![80]),
            StripCluster::new(512, vec![90]),
        );
        match candidate.payload() {
            FilterPayload::ClusterFilter {
                det_id,
                primary,
                secondary,
            } => {
                assert_eq!(det_id, candidate.hit.det_id);
                assert!((primary.unwrap().charge() - 80.0).abs() < f32::EPSILON);
                assert!((secondary.unwrap().charge() - 90.0).abs() < f32::EPSILON);
            }
            _ => panic!("expected cluster payload"),
        }
    }
}
