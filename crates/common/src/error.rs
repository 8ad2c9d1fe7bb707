//! Error types for folio.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The target exists but its current status forbids the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    // === Server Errors ===
    /// Store or transaction failure. The operation was rolled back.
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Config(_) | Self::Internal(_)
        )
    }

    /// Log this error at a level matching its kind.
    pub fn log(&self, operation: &str) {
        let code = self.error_code();
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, operation, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, operation, "Client error occurred");
        }
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound("x".into()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::Conflict("x".into()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::InvalidState("x".into()).error_code(),
            "INVALID_STATE"
        );
        assert_eq!(
            AppError::Validation("x".into()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::Database("x".into()).error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_server_error_classification() {
        assert!(AppError::Database("tx aborted".into()).is_server_error());
        assert!(AppError::Internal("boom".into()).is_server_error());
        assert!(!AppError::NotFound("content".into()).is_server_error());
        assert!(!AppError::InvalidState("banned".into()).is_server_error());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = AppError::Conflict("slug 'hello' already used".into());
        assert_eq!(err.to_string(), "Conflict: slug 'hello' already used");
    }

    #[test]
    fn test_from_validation_errors() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("title", validator::ValidationError::new("length"));
        let err: AppError = errors.into();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("title")));
    }
}
