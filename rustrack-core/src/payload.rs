//! Tagged payloads passed alongside candidate measurements.

use crate::cluster::StripCluster;
use crate::detid::DetId;

/// Opaque payload a measurement source attaches to a candidate hit.
///
/// Estimators inspect the variant tag and must treat kinds they do not
/// understand as accepted: a filter only ever rejects payloads it
/// recognizes. The enum is non-exhaustive so new payload kinds can be
/// added without breaking that contract.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum FilterPayload<'a> {
    /// Cluster charge information for one module.
    ///
    /// Matched hits from double-sided modules carry a second cluster;
    /// either reference may be absent.
    ClusterFilter {
        /// Module the clusters belong to.
        det_id: DetId,
        /// Primary cluster of the hit.
        primary: Option<&'a StripCluster>,
        /// Secondary cluster of a matched hit.
        secondary: Option<&'a StripCluster>,
    },
    /// No payload supplied by the measurement source.
    Empty,
}

impl<'a> FilterPayload<'a> {
    /// Payload for a single-cluster hit.
    #[must_use]
    pub fn cluster(det_id: DetId, primary: &'a StripCluster) -> Self {
        FilterPayload::ClusterFilter {
            det_id,
            primary: Some(primary),
            secondary: None,
        }
    }

    /// Payload for a matched hit with two clusters.
    #[must_use]
    pub fn matched(det_id: DetId, primary: &'a StripCluster, secondary: &'a StripCluster) -> Self {
        FilterPayload::ClusterFilter {
            det_id,
            primary: Some(primary),
            secondary: Some(secondary),
        }
    }

    /// True when the payload carries cluster information.
    #[inline]
    #[must_use]
    pub fn is_cluster_filter(&self) -> bool {
        matches!(self, FilterPayload::ClusterFilter { .. })
    }
}
