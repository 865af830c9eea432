//! Error types for estimator configuration and production.

use thiserror::Error;

/// Result type for configuration and production operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while parsing configurations or producing estimators.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration parameter is absent.
    #[error("missing required parameter `{parameter}` for component `{component}`")]
    MissingParameter {
        /// External name of the absent parameter.
        parameter: &'static str,
        /// Component the parameter belongs to.
        component: String,
    },

    /// A parameter carries a value the estimator cannot work with.
    #[error("invalid value for `{parameter}` of component `{component}`: {reason}")]
    InvalidValue {
        /// External name of the offending parameter.
        parameter: &'static str,
        /// Component the parameter belongs to.
        component: String,
        /// What is wrong with the value.
        reason: String,
    },

    /// No component is registered under the requested name.
    #[error("unknown estimator component `{0}`")]
    UnknownComponent(String),

    /// Malformed JSON configuration.
    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
