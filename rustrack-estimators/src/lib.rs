//! rustrack-estimators: track-hit compatibility estimators.
//!
//! This crate provides the measurement estimator variants used during
//! pattern recognition:
//!
//! - [`Chi2MeasurementEstimator`]: plain chi-square compatibility with
//!   configurable cuts
//! - [`Chi2ChargeMeasurementEstimator`]: the same evaluation behind a
//!   cluster charge pre-filter that discards low-charge strip clusters
//!   on low-momentum tracks
//!
//! Components are described by JSON configurations with the historical
//! parameter names and produced through [`EstimatorRegistry`], which
//! memoizes one shared instance per component name. The search helpers
//! [`compatible_measurements`] and [`compatible_measurements_par`] run
//! the two estimator stages over candidate collections, sequentially or
//! across the rayon pool.

#![warn(missing_docs)]

mod charge_cut;
mod chi2;
mod chi2_charge;
mod config;
mod error;
mod producer;
mod search;

pub use charge_cut::cluster_charge_cut;
pub use chi2::{Chi2MeasurementEstimator, DEFAULT_MAX_SAGITTA, DEFAULT_MIN_TOLERANCE};
pub use chi2_charge::{ChargeCuts, Chi2ChargeMeasurementEstimator};
pub use config::{load_config_file, ChargeFilterConfig, ClusterChargeCut, EstimatorConfig};
pub use error::{ConfigError, Result};
pub use producer::{build_estimator, EstimatorRegistry};
pub use search::{
    compatible_measurements, compatible_measurements_par, CompatibleMeasurement, SearchStatistics,
};

// Convenience re-exports of the core estimator surface.
pub use rustrack_core::estimator::{Compatibility, MeasurementEstimator};
