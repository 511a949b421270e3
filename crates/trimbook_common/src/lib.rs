// --- File: crates/trimbook_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    conflict, external_service_error, internal_error, not_found, validation_error,
    HttpStatusCode, TrimbookError,
};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_result};
