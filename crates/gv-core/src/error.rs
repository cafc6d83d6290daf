//! Error types for Gamma Variate.
//!
//! Every error carries a stable numeric code for machine parsing and a
//! remediation hint for humans. Errors are never recovered internally; they
//! surface to the caller unchanged.

use crate::config::ConfigError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for Gamma Variate operations.
pub type Result<T> = std::result::Result<T, GammaError>;

/// Unified error type for Gamma Variate.
#[derive(Error, Debug)]
pub enum GammaError {
    /// A shape, scale or evaluation point outside its domain.
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The rejection loop exceeded its iteration cap.
    ///
    /// Acceptance probability for the Marsaglia–Tsang envelope is above 0.95
    /// for every shape, so this points at a broken random source.
    #[error("rejection sampling stalled after {iterations} iterations")]
    SamplingStalled { iterations: u64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GammaError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        GammaError::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Returns the error code for this error type.
    ///
    /// - 10-19: caller input and configuration errors
    /// - 30-39: sampling errors
    pub fn code(&self) -> u32 {
        match self {
            GammaError::InvalidParameter { .. } => 10,
            GammaError::Config(inner) => inner.code(),
            GammaError::SamplingStalled { .. } => 30,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            GammaError::InvalidParameter { .. } => {
                "Shape and scale must be finite and strictly positive; x must not be NaN."
            }
            GammaError::SamplingStalled { .. } => {
                "The random source is not producing usable draws. Check the normal/uniform source, or raise max_iterations."
            }
            GammaError::Config(_) => {
                "Check the config file syntax, or unset GV_CONFIG to fall back to defaults."
            }
        }
    }

    /// Structured form for JSON error output.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
            remediation: self.remediation(),
        }
    }
}

/// Serializable error summary.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: u32,
    pub message: String,
    pub remediation: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_message_names_the_parameter() {
        let err = GammaError::invalid("shape", -1.0, "must be > 0");
        assert_eq!(err.to_string(), "invalid parameter shape=-1: must be > 0");
        assert_eq!(err.code(), 10);
    }

    #[test]
    fn stalled_error_code() {
        let err = GammaError::SamplingStalled { iterations: 5 };
        assert_eq!(err.code(), 30);
        assert!(err.to_string().contains("5 iterations"));
    }

    #[test]
    fn config_error_converts_and_keeps_code() {
        let inner = ConfigError::InvalidValue {
            field: "sampler.max_iterations".to_string(),
            message: "must be > 0".to_string(),
        };
        let code = inner.code();
        let err: GammaError = inner.into();
        assert_eq!(err.code(), code);
        assert!(err.to_string().contains("sampler.max_iterations"));
    }

    #[test]
    fn report_serializes() {
        let err = GammaError::SamplingStalled { iterations: 7 };
        let json = serde_json::to_value(err.report()).unwrap();
        assert_eq!(json["code"], 30);
        assert!(json["message"].as_str().unwrap().contains("stalled"));
    }
}
