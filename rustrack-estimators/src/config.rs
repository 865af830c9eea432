//! Estimator component configuration.
//!
//! Configurations arrive as JSON blocks with the historical parameter
//! names (`ComponentName`, `MaxChi2`, `nSigma`, ...). Parsing goes
//! through private intermediate structs mirroring that schema; the public
//! [`EstimatorConfig`] only exists in validated form.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Default sagitta bound when the configuration omits `MaxSagitta`.
const DEFAULT_MAX_SAGITTA: f64 = -1.0;

/// Default minimal tolerance when the configuration omits
/// `MinimalTolerance`.
const DEFAULT_MINIMAL_TOLERANCE: f64 = 10.0;

/// Nested cluster charge cut block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterChargeCut {
    /// Threshold in ADC counts per cm. Negative keeps every cluster.
    pub value: f64,
}

/// Charge-filter section of a component configuration.
///
/// Present only for components that want the charge-augmented estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeFilterConfig {
    /// Transverse momentum above which the charge cut is bypassed, in
    /// GeV. Negative disables the bypass.
    pub pt_charge_cut_threshold: f64,
    /// The nested charge cut block.
    pub cluster_charge_cut: ClusterChargeCut,
}

/// Validated configuration of one estimator component.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    /// Name the component registers under.
    pub component_name: String,
    /// Chi-square acceptance bound.
    pub max_chi2: f64,
    /// Error inflation multiplier for acceptance windows.
    pub n_sigma: f64,
    /// Sagitta bound; negative when unset.
    pub max_sagitta: f64,
    /// Floor for acceptance window half-widths.
    pub minimal_tolerance: f64,
    /// Charge-filter section; `None` selects the plain chi-square
    /// variant.
    pub charge_filter: Option<ChargeFilterConfig>,
}

// Intermediates mirroring the external JSON schema. Every field is
// optional here; required-ness is enforced in validation so missing
// parameters surface with their external names.
#[derive(Deserialize)]
struct JsonEstimator {
    #[serde(rename = "ComponentName")]
    component_name: Option<String>,
    #[serde(rename = "MaxChi2")]
    max_chi2: Option<f64>,
    #[serde(rename = "nSigma")]
    n_sigma: Option<f64>,
    #[serde(rename = "MaxSagitta")]
    max_sagitta: Option<f64>,
    #[serde(rename = "MinimalTolerance")]
    minimal_tolerance: Option<f64>,
    #[serde(rename = "pTChargeCutThreshold")]
    pt_charge_cut_threshold: Option<f64>,
    #[serde(rename = "clusterChargeCut")]
    cluster_charge_cut: Option<JsonClusterChargeCut>,
}

#[derive(Deserialize)]
struct JsonClusterChargeCut {
    value: Option<f64>,
}

#[derive(Deserialize)]
struct JsonConfigFile {
    estimators: Vec<serde_json::Value>,
}

impl EstimatorConfig {
    /// Parses and validates a single component block from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON and
    /// [`ConfigError::MissingParameter`] when `ComponentName`, `MaxChi2`,
    /// `nSigma` or half of the charge-filter pair is absent.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: JsonEstimator = serde_json::from_str(json)?;
        Self::validate(parsed)
    }

    /// Parses and validates a single component block from a JSON value.
    ///
    /// # Errors
    ///
    /// Same conditions as [`EstimatorConfig::from_json`].
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let parsed: JsonEstimator = serde_json::from_value(value.clone())?;
        Self::validate(parsed)
    }

    fn validate(json: JsonEstimator) -> Result<Self> {
        let component_name = json
            .component_name
            .ok_or_else(|| ConfigError::MissingParameter {
                parameter: "ComponentName",
                component: String::from("(unnamed)"),
            })?;

        let required = |parameter: &'static str, value: Option<f64>| {
            value.ok_or_else(|| ConfigError::MissingParameter {
                parameter,
                component: component_name.clone(),
            })
        };

        let max_chi2 = required("MaxChi2", json.max_chi2)?;
        if !max_chi2.is_finite() || max_chi2 <= 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "MaxChi2",
                component: component_name,
                reason: format!("must be finite and positive, got {max_chi2}"),
            });
        }

        let n_sigma = required("nSigma", json.n_sigma)?;
        if !n_sigma.is_finite() || n_sigma < 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "nSigma",
                component: component_name,
                reason: format!("must be finite and non-negative, got {n_sigma}"),
            });
        }

        // The charge-filter parameters come as a pair; half a pair is a
        // configuration mistake, not a variant selection.
        let charge_filter = match (json.pt_charge_cut_threshold, json.cluster_charge_cut) {
            (None, None) => None,
            (Some(pt_charge_cut_threshold), Some(block)) => {
                let value = required("clusterChargeCut.value", block.value)?;
                Some(ChargeFilterConfig {
                    pt_charge_cut_threshold,
                    cluster_charge_cut: ClusterChargeCut { value },
                })
            }
            (Some(_), None) => {
                return Err(ConfigError::MissingParameter {
                    parameter: "clusterChargeCut",
                    component: component_name,
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingParameter {
                    parameter: "pTChargeCutThreshold",
                    component: component_name,
                })
            }
        };

        Ok(Self {
            component_name,
            max_chi2,
            n_sigma,
            max_sagitta: json.max_sagitta.unwrap_or(DEFAULT_MAX_SAGITTA),
            minimal_tolerance: json.minimal_tolerance.unwrap_or(DEFAULT_MINIMAL_TOLERANCE),
            charge_filter,
        })
    }
}

/// Loads every component configuration from a JSON file of the shape
/// `{"estimators": [...]}`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read and the
/// per-block conditions of [`EstimatorConfig::from_value`] otherwise.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<Vec<EstimatorConfig>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let parsed: JsonConfigFile = serde_json::from_reader(reader)?;
    parsed.estimators.iter().map(EstimatorConfig::from_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_full_charge_configuration() {
        let config = EstimatorConfig::from_json(
            r#"{
                "ComponentName": "Chi2Charge",
                "MaxChi2": 30.0,
                "nSigma": 3.0,
                "MaxSagitta": 2.0,
                "MinimalTolerance": 0.5,
                "pTChargeCutThreshold": 15.0,
                "clusterChargeCut": {"value": 1620.0}
            }"#,
        )
        .unwrap();

        assert_eq!(config.component_name, "Chi2Charge");
        assert_relative_eq!(config.max_chi2, 30.0);
        assert_relative_eq!(config.n_sigma, 3.0);
        assert_relative_eq!(config.max_sagitta, 2.0);
        assert_relative_eq!(config.minimal_tolerance, 0.5);

        let charge = config.charge_filter.unwrap();
        assert_relative_eq!(charge.pt_charge_cut_threshold, 15.0);
        assert_relative_eq!(charge.cluster_charge_cut.value, 1620.0);
    }

    #[test]
    fn optional_parameters_take_defaults() {
        let config = EstimatorConfig::from_json(
            r#"{"ComponentName": "Chi2", "MaxChi2": 30.0, "nSigma": 3.0}"#,
        )
        .unwrap();

        assert_relative_eq!(config.max_sagitta, -1.0);
        assert_relative_eq!(config.minimal_tolerance, 10.0);
        assert!(config.charge_filter.is_none());
    }

    #[test]
    fn missing_component_name_is_reported() {
        let err = EstimatorConfig::from_json(r#"{"MaxChi2": 30.0, "nSigma": 3.0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingParameter {
                parameter: "ComponentName",
                ..
            }
        ));
    }

    #[test]
    fn missing_required_cut_is_reported_with_component() {
        let err = EstimatorConfig::from_json(r#"{"ComponentName": "Chi2", "nSigma": 3.0}"#)
            .unwrap_err();
        match err {
            ConfigError::MissingParameter {
                parameter,
                component,
            } => {
                assert_eq!(parameter, "MaxChi2");
                assert_eq!(component, "Chi2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lone_momentum_threshold_is_rejected() {
        let err = EstimatorConfig::from_json(
            r#"{
                "ComponentName": "Chi2Charge",
                "MaxChi2": 30.0,
                "nSigma": 3.0,
                "pTChargeCutThreshold": 15.0
            }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingParameter {
                parameter: "clusterChargeCut",
                ..
            }
        ));
    }

    #[test]
    fn lone_charge_cut_block_is_rejected() {
        let err = EstimatorConfig::from_json(
            r#"{
                "ComponentName": "Chi2Charge",
                "MaxChi2": 30.0,
                "nSigma": 3.0,
                "clusterChargeCut": {"value": 1620.0}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingParameter {
                parameter: "pTChargeCutThreshold",
                ..
            }
        ));
    }

    #[test]
    fn charge_cut_block_without_value_is_rejected() {
        let err = EstimatorConfig::from_json(
            r#"{
                "ComponentName": "Chi2Charge",
                "MaxChi2": 30.0,
                "nSigma": 3.0,
                "pTChargeCutThreshold": 15.0,
                "clusterChargeCut": {}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingParameter {
                parameter: "clusterChargeCut.value",
                ..
            }
        ));
    }

    #[test]
    fn non_positive_chi2_cut_is_rejected() {
        let err = EstimatorConfig::from_json(
            r#"{"ComponentName": "Chi2", "MaxChi2": -5.0, "nSigma": 3.0}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                parameter: "MaxChi2",
                ..
            }
        ));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = EstimatorConfig::from_json(
            r#"{
                "ComponentName": "Chi2",
                "MaxChi2": 30.0,
                "nSigma": 3.0,
                "appendToDataLabel": ""
            }"#,
        )
        .unwrap();
        assert_eq!(config.component_name, "Chi2");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = EstimatorConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
