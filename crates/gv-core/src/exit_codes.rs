//! Exit codes for the `gv` CLI.
//!
//! Exit code ranges:
//! - 0: success
//! - 10-19: caller errors (bad arguments, bad configuration)
//! - 20-29: internal or environment errors

use crate::config::ConfigError;
use crate::error::GammaError;

/// Exit codes for `gv` invocations. Stable contract for scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// Invalid arguments or configuration
    ArgsError = 10,

    /// Rejection sampler hit its iteration cap
    InternalError = 20,

    /// I/O error (config file unreadable, stdout closed)
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19, fixable by the caller.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Codes 20-29.
    pub fn is_internal_error(self) -> bool {
        self.as_i32() >= 20
    }

    pub fn is_error(self) -> bool {
        self.as_i32() >= 10
    }

    /// Name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&GammaError> for ExitCode {
    fn from(err: &GammaError) -> Self {
        match err {
            GammaError::InvalidParameter { .. } => ExitCode::ArgsError,
            GammaError::SamplingStalled { .. } => ExitCode::InternalError,
            GammaError::Config(ConfigError::IoError { .. }) => ExitCode::IoError,
            GammaError::Config(_) => ExitCode::ArgsError,
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_values_are_stable() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
        assert_eq!(ExitCode::IoError.as_i32(), 21);
    }

    #[test]
    fn test_ranges() {
        assert!(ExitCode::Clean.is_success());
        assert!(!ExitCode::Clean.is_error());
        assert!(ExitCode::ArgsError.is_user_error());
        assert!(!ExitCode::ArgsError.is_internal_error());
        assert!(ExitCode::InternalError.is_internal_error());
        assert!(ExitCode::IoError.is_error());
    }

    #[test]
    fn test_error_mapping() {
        let invalid = GammaError::InvalidParameter {
            name: "shape",
            value: 0.0,
            reason: "must be > 0",
        };
        assert_eq!(ExitCode::from(&invalid), ExitCode::ArgsError);

        let stalled = GammaError::SamplingStalled { iterations: 3 };
        assert_eq!(ExitCode::from(&stalled), ExitCode::InternalError);

        let missing = GammaError::from(ConfigError::NotFound {
            path: PathBuf::from("/missing.toml"),
        });
        assert_eq!(ExitCode::from(&missing), ExitCode::ArgsError);

        let io = GammaError::from(ConfigError::IoError {
            path: PathBuf::from("/unreadable.toml"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert_eq!(ExitCode::from(&io), ExitCode::IoError);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::ArgsError.to_string(), "ERR_ARGS (10)");
    }
}
