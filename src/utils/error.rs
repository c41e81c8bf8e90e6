use crate::domain::model::{LineId, StationId};
use crate::domain::sections::SectionChainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubwayError {
    #[error("Section rejected: {0}")]
    Chain(#[from] SectionChainError),

    #[error("Station {id} not found")]
    StationNotFound { id: StationId },

    #[error("Line {id} not found")]
    LineNotFound { id: LineId },

    #[error("Station {id} is still used by line {line_id}")]
    StationInUse { id: StationId, line_id: LineId },

    #[error("A line named '{name}' already exists")]
    DuplicateLineName { name: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, SubwayError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Rejection,
    NotFound,
    Validation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// How chain rejections are surfaced at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RejectionStatus {
    /// One client-error code per rejection kind.
    #[default]
    Distinct,
    /// Every rejection is a 500, matching the legacy acceptance tests.
    Generic,
}

impl SubwayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Chain(SectionChainError::BrokenChain { .. }) => ErrorCategory::Configuration,
            Self::Chain(_) | Self::StationInUse { .. } | Self::DuplicateLineName { .. } => {
                ErrorCategory::Rejection
            }
            Self::StationNotFound { .. } | Self::LineNotFound { .. } => ErrorCategory::NotFound,
            Self::ValidationError { .. } | Self::InvalidValueError { .. } => {
                ErrorCategory::Validation
            }
            Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) | Self::TomlSerializeError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::NotFound => ErrorSeverity::Medium,
            ErrorCategory::Rejection | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// HTTP-style status for this error under the given rejection mapping.
    pub fn status_code(&self, mapping: RejectionStatus) -> u16 {
        if mapping == RejectionStatus::Generic && self.category() == ErrorCategory::Rejection {
            return 500;
        }

        match self {
            Self::Chain(SectionChainError::DuplicateSection { .. })
            | Self::Chain(SectionChainError::NotTerminus { .. })
            | Self::StationInUse { .. }
            | Self::DuplicateLineName { .. } => 409,
            Self::Chain(SectionChainError::BrokenChain { .. }) => 500,
            Self::Chain(_) | Self::ValidationError { .. } | Self::InvalidValueError { .. } => 400,
            Self::StationNotFound { .. } | Self::LineNotFound { .. } => 404,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Chain(SectionChainError::DuplicateSection { .. }) => {
                "Both stations are already on this line".to_string()
            }
            Self::Chain(SectionChainError::DisconnectedSection { .. }) => {
                "The new section must share a station with the line".to_string()
            }
            Self::Chain(SectionChainError::InvalidDistance { .. }) => {
                "The new section must be shorter than the section it splits".to_string()
            }
            Self::Chain(SectionChainError::MinimumSection) => {
                "A line cannot have fewer than one section".to_string()
            }
            Self::Chain(SectionChainError::NotTerminus { .. }) => {
                "Only the last station of a line can be removed".to_string()
            }
            Self::StationNotFound { id } => format!("Station {} does not exist", id),
            Self::LineNotFound { id } => format!("Line {} does not exist", id),
            Self::IoError(e) => format!("Could not access the network file: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Rejection => {
                "Check the line's current stations and retry with a valid section"
            }
            ErrorCategory::NotFound => "List stations and lines to find valid ids",
            ErrorCategory::Validation => "Fix the request fields and retry",
            ErrorCategory::Configuration => {
                "Check the network file for missing or inconsistent entries"
            }
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejections() -> Vec<SubwayError> {
        vec![
            SectionChainError::DuplicateSection {
                up: StationId(1),
                down: StationId(2),
            }
            .into(),
            SectionChainError::DisconnectedSection {
                up: StationId(8),
                down: StationId(9),
            }
            .into(),
            SectionChainError::MinimumSection.into(),
            SectionChainError::NotTerminus {
                station: StationId(1),
                terminus: StationId(2),
            }
            .into(),
        ]
    }

    #[test]
    fn test_distinct_mapping() {
        let codes: Vec<u16> = rejections()
            .iter()
            .map(|e| e.status_code(RejectionStatus::Distinct))
            .collect();
        assert_eq!(codes, vec![409, 400, 400, 409]);
    }

    #[test]
    fn test_generic_mapping_collapses_rejections() {
        for error in rejections() {
            assert_eq!(error.status_code(RejectionStatus::Generic), 500);
            assert_eq!(error.category(), ErrorCategory::Rejection);
        }
    }

    #[test]
    fn test_not_found_is_not_a_rejection() {
        let error = SubwayError::StationNotFound { id: StationId(3) };
        assert_eq!(error.category(), ErrorCategory::NotFound);
        assert_eq!(error.status_code(RejectionStatus::Generic), 404);
        assert_eq!(error.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_rejection_status_from_toml_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: RejectionStatus,
        }

        let parsed: Wrapper = toml::from_str("mode = \"generic\"").unwrap();
        assert_eq!(parsed.mode, RejectionStatus::Generic);
    }
}
