use crate::models::OutputType;
use thiserror::Error;

/// A parameter or task failed validation before anything was sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be divisible by {step}")]
    NotMultipleOf { field: &'static str, step: u32 },

    #[error("{field} must be at least {min}")]
    AtLeast { field: &'static str, min: i64 },

    #[error("{field} supports a maximum of {max} entries")]
    TooMany { field: &'static str, max: usize },

    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("invalid AIR identifier '{0}', expected namespace:id@version")]
    InvalidAir(String),

    #[error("{field} must be one of: {expected}, got '{value}'")]
    UnknownVariant {
        field: &'static str,
        value: String,
        expected: String,
    },
}

#[derive(Debug, Error)]
pub enum RunwareError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runware API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Error connecting to Runware API: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Error decoding response: {0}")]
    Decode(String),

    #[error("Requested output type '{0}' not found in response")]
    OutputNotFound(OutputType),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RunwareError {
    /// True for failures raised before any network call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, RunwareError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, RunwareError>;

pub(crate) fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_nan() || value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max }.into());
    }
    Ok(())
}

/// Width and height share the same rule: 128..=2048 in steps of 64.
pub(crate) fn check_dimension(field: &'static str, value: u32) -> Result<()> {
    check_range(field, f64::from(value), 128.0, 2048.0)?;
    if value % 64 != 0 {
        return Err(ValidationError::NotMultipleOf { field, step: 64 }.into());
    }
    Ok(())
}
