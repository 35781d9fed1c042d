//! Error types for the wingbox pipeline

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field of a material identifier that failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialField {
    Name,
    Temper,
    Basis,
    Thickness,
}

impl fmt::Display for MaterialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MaterialField::Name => "name",
            MaterialField::Temper => "temper",
            MaterialField::Basis => "basis",
            MaterialField::Thickness => "thickness",
        };
        f.write_str(label)
    }
}

/// Main error type for wingbox operations
#[derive(Error, Debug)]
pub enum WingboxError {
    #[error("Incoherent input for '{quantity}': expected {expected} entries, found {found}")]
    Coherence {
        quantity: String,
        expected: usize,
        found: usize,
    },

    #[error("Value out of range for '{field}': {message}")]
    OutOfRange { field: String, message: String },

    #[error("Invalid material '{id}': unknown {field}")]
    InvalidMaterial { id: String, field: MaterialField },

    #[error("Airfoil '{0}' not found in catalog")]
    AirfoilNotFound(String),

    #[error(
        "Load case {case}: no structural node within {radius:e} of point ({:.6}, {:.6}, {:.6})",
        .point[0], .point[1], .point[2]
    )]
    Mapping {
        case: usize,
        point: [f64; 3],
        radius: f64,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl WingboxError {
    pub fn coherence(quantity: &str, expected: usize, found: usize) -> Self {
        WingboxError::Coherence {
            quantity: quantity.to_string(),
            expected,
            found,
        }
    }

    pub fn out_of_range(field: &str, message: impl Into<String>) -> Self {
        WingboxError::OutOfRange {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// True for the errors raised while checking inputs, before any
    /// geometry or assembly work
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WingboxError::Coherence { .. }
                | WingboxError::OutOfRange { .. }
                | WingboxError::InvalidMaterial { .. }
                | WingboxError::AirfoilNotFound(_)
                | WingboxError::InvalidInput(_)
        )
    }
}

/// Result type for wingbox operations
pub type WingboxResult<T> = Result<T, WingboxError>;
