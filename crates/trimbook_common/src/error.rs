// --- File: crates/trimbook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Trimbook errors.
///
/// This enum provides a common set of error variants that can be used across all crates.
/// Each crate can extend this by implementing From<SpecificError> for TrimbookError.
#[derive(Error, Debug)]
pub enum TrimbookError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already booked)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// This trait can be implemented by error types to provide a consistent way
/// to convert errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for TrimbookError {
    fn status_code(&self) -> u16 {
        match self {
            TrimbookError::ParseError(_) => 400,
            TrimbookError::ConfigError(_) => 500,
            TrimbookError::ValidationError(_) => 400,
            TrimbookError::DatabaseError(_) => 500,
            TrimbookError::ExternalServiceError { .. } => 502,
            // The public booking API reports slot conflicts as 400, with a
            // message that distinguishes them from generic validation failures.
            TrimbookError::ConflictError(_) => 400,
            TrimbookError::NotFoundError(_) => 404,
            TrimbookError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<serde_json::Error> for TrimbookError {
    fn from(err: serde_json::Error) -> Self {
        TrimbookError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for TrimbookError {
    fn from(err: std::io::Error) -> Self {
        TrimbookError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> TrimbookError {
    TrimbookError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> TrimbookError {
    TrimbookError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> TrimbookError {
    TrimbookError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> TrimbookError {
    TrimbookError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> TrimbookError {
    TrimbookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> TrimbookError {
    TrimbookError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_400() {
        assert_eq!(conflict("Slot already booked").status_code(), 400);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(not_found("Barber not found").status_code(), 404);
    }

    #[test]
    fn external_service_error_maps_to_502() {
        let err = external_service_error("gcal", "timeout");
        assert_eq!(err.status_code(), 502);
        assert!(err.to_string().contains("gcal"));
    }
}
