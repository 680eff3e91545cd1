//! # Error Types
//!
//! Structured error types for footing_core. Only conditions that stop the
//! pipeline are errors: invalid inputs, loads the footprint cannot carry, and
//! numeric solves that fail to converge. A footing that fails a design check
//! is a normal result (see [`crate::calculations::DesignCheck`]).
//!
//! ## Example
//!
//! ```rust
//! use footing_core::errors::{CalcError, CalcResult};
//!
//! fn validate_thickness(thickness_mm: f64) -> CalcResult<()> {
//!     if thickness_mm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "thickness_mm",
//!             thickness_mm.to_string(),
//!             "Thickness must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_thickness(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for footing_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for analysis and design operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is outside the permitted range or inconsistent with
    /// another input (e.g. column larger than the footing)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The contact pressure cannot be resolved within the footprint
    #[error("Geometry infeasible under {combination}: {reason}")]
    GeometryInfeasible { combination: String, reason: String },

    /// A bounded iterative solve ran out of iterations
    #[error(
        "{solver} did not converge within {iterations} iterations \
         (tolerance {tolerance:e}, last estimate {last_estimate})"
    )]
    ConvergenceFailed {
        solver: String,
        iterations: usize,
        tolerance: f64,
        last_estimate: f64,
    },

    /// A design code table is malformed
    #[error("Invalid design code table: {reason}")]
    Configuration { reason: String },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a GeometryInfeasible error
    pub fn geometry_infeasible(combination: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::GeometryInfeasible {
            combination: combination.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConvergenceFailed error carrying the last estimate
    pub fn convergence_failed(
        solver: impl Into<String>,
        iterations: usize,
        tolerance: f64,
        last_estimate: f64,
    ) -> Self {
        CalcError::ConvergenceFailed {
            solver: solver.into(),
            iterations,
            tolerance,
            last_estimate,
        }
    }

    /// Create a Configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        CalcError::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix this by changing the footing inputs
    /// (geometry, loads or materials) and running again
    pub fn is_input_related(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::GeometryInfeasible { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::GeometryInfeasible { .. } => "GEOMETRY_INFEASIBLE",
            CalcError::ConvergenceFailed { .. } => "CONVERGENCE_FAILED",
            CalcError::Configuration { .. } => "CONFIGURATION_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CalcError {
    fn from(err: toml::de::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}
