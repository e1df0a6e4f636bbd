//! Error types for edits, normalization and submission, plus the structured
//! form they take on the HTTP surface.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Rejected edit. The store is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("unknown field: {0}")]
    UnknownPath(String),

    #[error("{path}: cannot use {got:?}, expected {expected}")]
    InvalidValue {
        path: String,
        got: String,
        expected: String,
    },

    #[error("{path}: {got} is out of range, expected {expected}")]
    OutOfDomain {
        path: String,
        got: String,
        expected: String,
    },
}

impl EditError {
    pub fn path(&self) -> &str {
        match self {
            EditError::UnknownPath(path)
            | EditError::InvalidValue { path, .. }
            | EditError::OutOfDomain { path, .. } => path,
        }
    }
}

/// Why a configuration cannot be turned into a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must be filled in")]
    IncompleteField(String),

    #[error("warm contour requires insulation brand and thickness")]
    MissingWarmContourFields,

    #[error("cold contour requires frame thickness")]
    MissingColdContourFields,
}

impl ValidationError {
    /// Paths the user has to fix.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            ValidationError::IncompleteField(path) => vec![path.as_str()],
            ValidationError::MissingWarmContourFields => vec!["insulation.brand", "insulation.mm"],
            ValidationError::MissingColdContourFields => vec!["insulation.frame_mm"],
        }
    }
}

/// Outcome of a failed submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("a submission is already in flight")]
    InFlight,

    /// The pricing service refused the payload; messages are passed on as received.
    #[error("pricing service rejected the request: {}", messages.join("; "))]
    RemoteValidationRejected { status: u16, messages: Vec<String> },

    #[error("pricing service unavailable: {0}")]
    RemoteUnavailable(String),
}

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Edit errors
    UnknownField,
    InvalidFieldValue,
    OutOfRange,

    // Local validation
    IncompleteField,
    MissingWarmContourFields,
    MissingColdContourFields,

    // Submission
    SubmissionInFlight,
    RemoteValidationRejected,
    RemoteUnavailable,

    NotFound,
    InternalError,
}

/// Structured error for API responses.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: Vec::new(),
            details: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("{} not found", what))
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<EditError> for ApiError {
    fn from(err: EditError) -> Self {
        let code = match err {
            EditError::UnknownPath(_) => ErrorCode::UnknownField,
            EditError::InvalidValue { .. } => ErrorCode::InvalidFieldValue,
            EditError::OutOfDomain { .. } => ErrorCode::OutOfRange,
        };
        ApiError::new(code, err.to_string()).with_field(err.path())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let code = match err {
            ValidationError::IncompleteField(_) => ErrorCode::IncompleteField,
            ValidationError::MissingWarmContourFields => ErrorCode::MissingWarmContourFields,
            ValidationError::MissingColdContourFields => ErrorCode::MissingColdContourFields,
        };
        let mut api = ApiError::new(code, err.to_string());
        api.fields = err.paths().into_iter().map(String::from).collect();
        api
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(inner) => inner.into(),
            SubmitError::InFlight => ApiError::new(ErrorCode::SubmissionInFlight, err.to_string()),
            SubmitError::RemoteValidationRejected { ref messages, .. } => {
                let details = messages.clone();
                ApiError::new(ErrorCode::RemoteValidationRejected, err.to_string())
                    .with_details(details)
            }
            // The transport detail goes to the log, not to the user.
            SubmitError::RemoteUnavailable(_) => ApiError::new(
                ErrorCode::RemoteUnavailable,
                "The pricing service is unavailable, please try again later",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_value(ErrorCode::MissingWarmContourFields).unwrap();
        assert_eq!(json, "MISSING_WARM_CONTOUR_FIELDS");
    }

    #[test]
    fn test_validation_error_names_fields() {
        let api: ApiError = ValidationError::MissingWarmContourFields.into();
        assert_eq!(api.code, ErrorCode::MissingWarmContourFields);
        assert_eq!(api.fields, vec!["insulation.brand", "insulation.mm"]);
    }

    #[test]
    fn test_remote_rejection_keeps_messages() {
        let err = SubmitError::RemoteValidationRejected {
            status: 422,
            messages: vec!["house.length_m: must be greater than 0".to_string()],
        };
        let api: ApiError = err.into();
        assert_eq!(api.code, ErrorCode::RemoteValidationRejected);
        assert_eq!(api.details, vec!["house.length_m: must be greater than 0"]);
    }

    #[test]
    fn test_unavailable_hides_transport_detail() {
        let api: ApiError = SubmitError::RemoteUnavailable("connection refused".into()).into();
        assert_eq!(api.code, ErrorCode::RemoteUnavailable);
        assert!(!api.message.contains("connection refused"));
    }

    #[test]
    fn test_skip_empty_fields() {
        let json = serde_json::to_value(ApiError::not_found("estimate")).unwrap();
        assert!(json.get("fields").is_none());
        assert_eq!(json["code"], "NOT_FOUND");
    }
}
