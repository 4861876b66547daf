use std::path::PathBuf;

use spatnav_core::error::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplayError>;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("scenario file does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("unknown element name: {name}")]
    UnknownElement { name: String },

    #[error("duplicate element name: {name}")]
    DuplicateElement { name: String },

    #[error("invalid scenario: {message}")]
    InvalidScenario { message: String },

    #[error("expected final selection {expected}, got {actual}")]
    ExpectationFailed { expected: String, actual: String },
}

impl ReplayError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_)
            | Self::UnknownElement { .. }
            | Self::DuplicateElement { .. }
            | Self::InvalidScenario { .. } => 2,
            Self::ExpectationFailed { .. } => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidScenario {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownElement { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_separate_input_from_outcome() {
        let missing = ReplayError::MissingPath {
            path: PathBuf::from("nope.json"),
        };
        assert_eq!(missing.exit_code(), 1);
        assert_eq!(ReplayError::unknown("x").exit_code(), 2);
        assert_eq!(ReplayError::invalid("bad").exit_code(), 2);
        let failed = ReplayError::ExpectationFailed {
            expected: "a".into(),
            actual: "-".into(),
        };
        assert_eq!(failed.exit_code(), 3);
        assert_eq!(failed.to_string(), "expected final selection a, got -");
    }
}
