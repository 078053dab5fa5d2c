//! Application-wide error types.

use std::collections::BTreeMap;

use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Per-field validation messages, keyed by the field's wire name.
pub type FieldErrors = BTreeMap<String, String>;

/// Application error types.
///
/// Every failure that reaches the HTTP boundary is expressed as one of these.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body or path could not be parsed.
    #[error("Malformed request: {0}")]
    BadRequest(String),

    /// One or more fields violate their constraints.
    #[error("Validation failed for {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    Validation(FieldErrors),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (e.g., duplicate entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "MALFORMED_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message that is safe to show to a client.
    ///
    /// Server-side failures collapse to a generic sentence; their detail only
    /// goes to the log.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Validation(_) => "One or more fields are invalid".to_string(),
            Self::Database(_) | Self::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    /// Returns true for failures caused by the server rather than the request.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(field_errors(&errors))
    }
}

/// Flattens `validator` output into one message per field.
///
/// The first failing rule wins. Rules without an explicit message fall back to
/// their code (`email`, `length`, ...).
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .errors()
        .iter()
        .filter_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => list.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map_or_else(|| e.code.to_string(), ToString::to_string);
                (field.to_string(), message)
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
        #[validate(length(min = 6, message = "must be at least 6 characters"))]
        password: String,
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::BadRequest(String::new()).status_code(), 400);
        assert_eq!(AppError::Validation(FieldErrors::new()).status_code(), 400);
        assert_eq!(AppError::Unauthorized(String::new()).status_code(), 401);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::BadRequest(String::new()).error_code(),
            "MALFORMED_REQUEST"
        );
        assert_eq!(
            AppError::Validation(FieldErrors::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::Unauthorized(String::new()).error_code(),
            "UNAUTHORIZED"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "DATABASE_ERROR"
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = AppError::Database("connection refused on 10.0.0.3".into());
        assert!(err.is_server_error());
        assert_eq!(err.public_message(), "An internal error occurred");

        let err = AppError::NotFound("Transaction not found".into());
        assert!(!err.is_server_error());
        assert_eq!(err.public_message(), "Transaction not found");
    }

    #[test]
    fn test_field_errors_from_validator() {
        let signup = Signup {
            email: "not-an-email".into(),
            password: "abc".into(),
        };
        let errors = signup.validate().unwrap_err();
        let fields = field_errors(&errors);

        assert_eq!(fields.get("email").map(String::as_str), Some("email"));
        assert_eq!(
            fields.get("password").map(String::as_str),
            Some("must be at least 6 characters")
        );
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("amount".into(), "must be positive".into());
        fields.insert("category".into(), "length".into());
        assert_eq!(
            AppError::Validation(fields).to_string(),
            "Validation failed for amount, category"
        );
    }
}
