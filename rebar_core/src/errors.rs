//! # Error Types
//!
//! Structured error types for rebar_core. Only genuinely exceptional
//! conditions become errors: malformed upstream input, invalid profiles,
//! file problems, and discrete searches that run off the end of a catalog.
//!
//! Expected design outcomes (an overstressed section, a flexural demand that
//! no bar combination can meet, side-face bars that are not needed) are
//! *not* errors. They travel through the pipeline as
//! [`Outcome`](crate::outcome::Outcome) values.
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(width_mm: u32) -> CalcResult<()> {
//!     if width_mm == 0 {
//!         return Err(CalcError::invalid_input(
//!             "width_mm",
//!             width_mm.to_string(),
//!             "Width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_width(0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for rebar_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for scheduling operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-finite, negative, out of range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Section designation could not be parsed (e.g. "B400X600-C45/55")
    #[error("Invalid section designation '{designation}': {reason}")]
    InvalidDesignation { designation: String, reason: String },

    /// Overstress flag was neither "True" nor "False"
    #[error("Invalid overstress flag for '{field}': '{value}' (expected \"True\" or \"False\")")]
    InvalidFlag { field: String, value: String },

    /// A discrete catalog search found no combination meeting the demand
    #[error("No catalog combination satisfies {stage} demand of {demand:.2} at {section}")]
    CatalogExhausted {
        stage: String,
        section: String,
        demand: f64,
    },

    /// Design-code profile is inconsistent
    #[error("Invalid design-code profile: {reason}")]
    InvalidProfile { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidDesignation error
    pub fn invalid_designation(designation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidDesignation {
            designation: designation.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidFlag error
    pub fn invalid_flag(field: impl Into<String>, value: impl Into<String>) -> Self {
        CalcError::InvalidFlag {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a CatalogExhausted error
    pub fn catalog_exhausted(stage: impl Into<String>, section: impl Into<String>, demand: f64) -> Self {
        CalcError::CatalogExhausted {
            stage: stage.into(),
            section: section.into(),
            demand,
        }
    }

    /// Create an InvalidProfile error
    pub fn invalid_profile(reason: impl Into<String>) -> Self {
        CalcError::InvalidProfile {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error stems from the beam's own input data
    /// (as opposed to profile, file, or internal problems).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::MissingField { .. }
                | CalcError::InvalidDesignation { .. }
                | CalcError::InvalidFlag { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::InvalidDesignation { .. } => "INVALID_DESIGNATION",
            CalcError::InvalidFlag { .. } => "INVALID_FLAG",
            CalcError::CatalogExhausted { .. } => "CATALOG_EXHAUSTED",
            CalcError::InvalidProfile { .. } => "INVALID_PROFILE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::catalog_exhausted("stirrup", "left", 12000.0);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("CatalogExhausted"));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("req_shear_mm2_per_m").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::invalid_flag("shear_combo", "maybe").error_code(), "INVALID_FLAG");
        assert_eq!(CalcError::invalid_profile("empty catalog").error_code(), "INVALID_PROFILE");
    }

    #[test]
    fn test_input_error_classification() {
        assert!(CalcError::invalid_designation("B400", "missing 'X'").is_input_error());
        assert!(!CalcError::catalog_exhausted("side face", "middle", 1.0).is_input_error());
    }

    #[test]
    fn test_display_message() {
        let error = CalcError::catalog_exhausted("stirrup", "right", 1234.567);
        assert_eq!(
            error.to_string(),
            "No catalog combination satisfies stirrup demand of 1234.57 at right"
        );
    }
}
