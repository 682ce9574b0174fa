use contracts::domain::a004_esg_report::ValidationErrors;
use contracts::shared::api_error::{ApiErrorBody, ValidationIssues};

use super::transport::{HttpResponse, TransportError};

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
    #[error("failed to parse response: {0}")]
    Decode(String),
    #[error("{message}")]
    Unauthorized { message: String },
    #[error("{message}")]
    Forbidden { message: String },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Validation {
        message: String,
        issues: ValidationIssues,
    },
    #[error("{message}")]
    Server { status: u16, message: String },
    /// The refresh call itself was rejected or could not be made
    #[error("{message}")]
    RefreshFailed { message: String },
    /// Checked on the client before any request went out
    #[error("{0}")]
    Precondition(String),
}

/// What the UI should do with a failed call
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorOutcome {
    /// Toast, then route back to sign-in
    RedirectToAuth(String),
    /// Inline field errors plus a summary line
    FieldErrors {
        message: String,
        errors: ValidationErrors,
    },
    Toast(String),
    /// Already handled by the global auth-failure callback
    Silent,
}

impl ApiError {
    /// Classifies a non-2xx response by status and normalized body
    pub fn from_response(response: &HttpResponse) -> Self {
        let body = ApiErrorBody::parse(&response.body);
        let message = if body.message.is_empty() {
            format!("Request failed with status {}", response.status)
        } else {
            body.message
        };
        match response.status {
            400 => match body.issues {
                Some(issues) if !issues.is_empty() => ApiError::Validation { message, issues },
                _ => ApiError::Server {
                    status: 400,
                    message,
                },
            },
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            status => ApiError::Server { status, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Validation { .. } => Some(400),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn outcome(&self) -> ErrorOutcome {
        match self {
            ApiError::Forbidden { .. } => {
                ErrorOutcome::RedirectToAuth(PERMISSION_DENIED_MESSAGE.to_string())
            }
            ApiError::Validation { message, issues } => ErrorOutcome::FieldErrors {
                message: message.clone(),
                errors: ValidationErrors::from(issues.clone()),
            },
            ApiError::Unauthorized { .. } | ApiError::RefreshFailed { .. } => ErrorOutcome::Silent,
            ApiError::Server { status, message } if *status < 500 && !message.is_empty() => {
                ErrorOutcome::Toast(message.clone())
            }
            ApiError::NotFound { message } | ApiError::Precondition(message) => {
                ErrorOutcome::Toast(message.clone())
            }
            _ => ErrorOutcome::Toast(GENERIC_ERROR_MESSAGE.to_string()),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Network(err.to_string())
    }
}
