use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::uuid_id!(
    /// Company identifier
    CompanyId
);

/// Company as returned by `GET /companies`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub foundational: Option<FoundationalData>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /companies`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyDto {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

/// Body of `PATCH /companies/:id`; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl UpdateCompanyDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.legal_name.is_none()
            && self.country.is_none()
            && self.industry.is_none()
    }
}

/// Body of `PUT /companies/:id/foundational`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundationalData {
    pub legal_name: String,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub headquarters_country: Option<String>,
    #[serde(default)]
    pub fiscal_year_end_month: Option<u8>,
    #[serde(default)]
    pub listed: bool,
}

impl FoundationalData {
    pub fn validate(&self) -> Result<(), String> {
        if self.legal_name.trim().is_empty() {
            return Err("Legal name is required".to_string());
        }
        if let Some(month) = self.fiscal_year_end_month {
            if !(1..=12).contains(&month) {
                return Err("Fiscal year end month must be between 1 and 12".to_string());
            }
        }
        Ok(())
    }
}
