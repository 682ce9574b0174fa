use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything the four wizard steps collect. Every field is optional while
/// the user is typing; `validation::validate` turns it into an `EsgReport`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EsgDraft {
    pub general: GeneralSection,
    pub environment: EnvironmentSection,
    pub social: SocialSection,
    pub governance: GovernanceSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralSection {
    pub company_name: String,
    pub reporting_year: Option<i32>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    /// ISO 3166-1 alpha-2
    pub country: String,
    pub industry: String,
    pub headcount: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvironmentSection {
    pub scope1_tco2e: Option<f64>,
    pub scope2_tco2e: Option<f64>,
    pub scope3_tco2e: Option<f64>,
    pub energy_consumption_mwh: Option<f64>,
    pub renewable_share_pct: Option<f64>,
    pub water_withdrawal_m3: Option<f64>,
    pub waste_generated_t: Option<f64>,
    pub waste_recycled_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialSection {
    pub employees_total: Option<u32>,
    pub female_share_pct: Option<f64>,
    pub lost_time_injury_rate: Option<f64>,
    pub training_hours_per_employee: Option<f64>,
    pub turnover_rate_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GovernanceSection {
    pub board_size: Option<u32>,
    pub independent_directors: Option<u32>,
    pub female_directors: Option<u32>,
    pub has_anti_corruption_policy: bool,
    pub has_whistleblower_channel: bool,
    pub has_esg_committee: bool,
    pub last_audit_date: Option<NaiveDate>,
}

/// Parses a numeric form input; blank means "not filled in".
pub fn parse_optional<T: std::str::FromStr>(input: &str) -> Option<T> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        trimmed.replace(',', ".").parse().ok()
    }
}

/// Parses an `<input type="date">` value.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

pub fn format_optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
