//! rustrack-core: Core traits and types for track-hit compatibility estimation.
//!
//! This crate provides the foundational abstractions for deciding whether a
//! measured detector hit is compatible with a predicted trajectory state:
//! geometry value types, detector identifiers, strip clusters, the tagged
//! filter payload, and the [`MeasurementEstimator`] capability set.
//!

pub mod charge;
pub mod cluster;
pub mod detid;
pub mod error;
pub mod estimator;
pub mod geometry;
pub mod hit;
pub mod payload;
pub mod trajectory;

pub use charge::{charge_per_cm, sensor_thickness_inverse};
pub use cluster::StripCluster;
pub use detid::{DetId, SubDetector};
pub use error::{Error, Result};
pub use estimator::{Compatibility, MeasurementEstimator};
pub use geometry::{GlobalVector, LocalError, LocalPoint};
pub use hit::{HitCandidate, TrackerHit};
pub use payload::FilterPayload;
pub use trajectory::{LocalTrajectoryParameters, TrajectoryStateOnSurface};
