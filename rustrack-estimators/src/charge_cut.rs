//! Cluster charge cut policy.

// The configured threshold is f64 like every other cut parameter; the
// filter compares f32 charges, so the narrowing cast is intrinsic.
#![allow(clippy::cast_possible_truncation)]

use crate::config::EstimatorConfig;
use crate::error::{ConfigError, Result};

/// Derives the strip charge threshold from a component configuration.
///
/// The policy reads the nested `clusterChargeCut` block and hands back
/// its `value` in ADC counts per cm. A negative value effectively keeps
/// every cluster since charges are non-negative.
///
/// # Errors
///
/// Returns [`ConfigError::MissingParameter`] when the configuration has
/// no charge-filter section.
pub fn cluster_charge_cut(config: &EstimatorConfig) -> Result<f32> {
    let section = config
        .charge_filter
        .as_ref()
        .ok_or_else(|| ConfigError::MissingParameter {
            parameter: "clusterChargeCut",
            component: config.component_name.clone(),
        })?;
    Ok(section.cluster_charge_cut.value as f32)
}
