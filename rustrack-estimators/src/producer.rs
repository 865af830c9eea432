//! Estimator production and the component registry.
//!
//! One estimator instance exists per configured component name. The
//! registry hands the same shared handle to every caller and only
//! rebuilds after a configuration changes, mirroring how reconstruction
//! setups reuse one estimator across many track candidates.

// The configured momentum threshold is f64; the filter stores f32.
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use rustrack_core::estimator::MeasurementEstimator;

use crate::charge_cut::cluster_charge_cut;
use crate::chi2::Chi2MeasurementEstimator;
use crate::chi2_charge::{ChargeCuts, Chi2ChargeMeasurementEstimator};
use crate::config::EstimatorConfig;
use crate::error::{ConfigError, Result};

/// Builds the estimator variant a configuration selects.
///
/// A charge-filter section selects [`Chi2ChargeMeasurementEstimator`]
/// with the strip threshold taken from the charge cut policy and the
/// pixel threshold fixed at zero. Without the section the plain
/// [`Chi2MeasurementEstimator`] is built.
///
/// # Errors
///
/// Propagates [`ConfigError::MissingParameter`] from the charge cut
/// policy.
pub fn build_estimator(config: &EstimatorConfig) -> Result<Arc<dyn MeasurementEstimator>> {
    let chi2 = Chi2MeasurementEstimator::with_bounds(
        config.max_chi2,
        config.n_sigma,
        config.max_sagitta,
        config.minimal_tolerance,
    );
    match &config.charge_filter {
        Some(section) => {
            let cuts = ChargeCuts {
                min_good_pixel_charge: 0.0,
                min_good_strip_charge: cluster_charge_cut(config)?,
                pt_charge_cut_threshold: section.pt_charge_cut_threshold as f32,
            };
            Ok(Arc::new(Chi2ChargeMeasurementEstimator::new(chi2, cuts)))
        }
        None => Ok(Arc::new(chi2)),
    }
}

struct RegistryEntry {
    config: EstimatorConfig,
    cached: Option<Arc<dyn MeasurementEstimator>>,
}

/// Registry of named estimator components.
///
/// [`produce`](EstimatorRegistry::produce) returns one shared instance
/// per name. Construction happens at most once per registered
/// configuration, also under concurrent first access; re-registering a
/// changed configuration drops the cached instance so the next request
/// rebuilds.
#[derive(Default)]
pub struct EstimatorRegistry {
    entries: RwLock<HashMap<String, RegistryEntry>>,
}

impl EstimatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a component configuration under its component name.
    ///
    /// An unchanged configuration keeps the cached instance alive. A
    /// changed one replaces the stored configuration and invalidates the
    /// cache; callers holding the old handle keep it, new callers get a
    /// fresh build.
    pub fn register(&self, config: EstimatorConfig) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get_mut(&config.component_name) {
            Some(entry) if entry.config == config => {}
            Some(entry) => {
                entry.config = config;
                entry.cached = None;
            }
            None => {
                entries.insert(
                    config.component_name.clone(),
                    RegistryEntry {
                        config,
                        cached: None,
                    },
                );
            }
        }
    }

    /// Returns the shared estimator registered under `name`, building it
    /// on first request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownComponent`] for an unregistered
    /// name and propagates construction errors from
    /// [`build_estimator`].
    pub fn produce(&self, name: &str) -> Result<Arc<dyn MeasurementEstimator>> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(name) {
                if let Some(cached) = &entry.cached {
                    return Ok(Arc::clone(cached));
                }
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownComponent(name.to_string()))?;
        // Another thread may have built while we waited for the write
        // lock; hand out its instance instead of a second build.
        if let Some(cached) = &entry.cached {
            return Ok(Arc::clone(cached));
        }
        let estimator = build_estimator(&entry.config)?;
        entry.cached = Some(Arc::clone(&estimator));
        Ok(estimator)
    }

    /// Registers a configuration and produces its estimator in one call.
    ///
    /// # Errors
    ///
    /// Same conditions as [`produce`](EstimatorRegistry::produce).
    pub fn produce_with(&self, config: EstimatorConfig) -> Result<Arc<dyn MeasurementEstimator>> {
        let name = config.component_name.clone();
        self.register(config);
        self.produce(&name)
    }

    /// Names of the registered components, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no component is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
