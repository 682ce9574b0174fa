//! Normalized error body returned by every failing backend endpoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<ValidationIssues>,
}

/// Field and form level validation messages (`issues` in the error body)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssues {
    #[serde(default)]
    pub field_errors: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub form_errors: Vec<String>,
}

impl ValidationIssues {
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.values().all(|v| v.is_empty())
    }

    /// First message for a field, used for inline display
    pub fn first_for(&self, field: &str) -> Option<&str> {
        self.field_errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }
}

impl ApiErrorBody {
    /// Parses a response body, falling back to the raw text as message.
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => parsed,
            Err(_) => ApiErrorBody {
                message: body.trim().to_string(),
                issues: None,
            },
        }
    }
}
