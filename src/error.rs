//! Error types for calls that violate the calling contract
//!
//! Domain conditions such as an unknown retirement system or SRS ineligibility
//! are not errors; they come back as outcomes carrying notes.

use thiserror::Error;

/// Errors surfaced by the engine and the scenario store
#[derive(Debug, Error)]
pub enum EngineError {
    /// A request field is outside the range the engine accepts
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Scenario file could not be read or written
    #[error("scenario I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario file is not a valid scenario document
    #[error("malformed scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Projection rows could not be written as CSV
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

impl EngineError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = EngineError::validation("endAge", "must not be below startAge");
        assert_eq!(err.to_string(), "invalid endAge: must not be below startAge");
    }
}
