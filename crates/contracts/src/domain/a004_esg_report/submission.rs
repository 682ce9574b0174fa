//! Mapping from the validated wizard aggregate to the backend DTO.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::EsgReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsgSubmission {
    pub company_name: String,
    pub reporting_year: i32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub country: Option<String>,
    pub industry: Option<String>,
    pub headcount: Option<u32>,
    pub environment: EnvironmentPayload,
    pub social: SocialPayload,
    pub governance: GovernancePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentPayload {
    pub scope1_tco2e: f64,
    pub scope2_tco2e: f64,
    pub scope3_tco2e: Option<f64>,
    pub total_emissions_tco2e: f64,
    pub energy_consumption_mwh: Option<f64>,
    /// 0.0..=1.0
    pub renewable_share: Option<f64>,
    pub water_withdrawal_m3: Option<f64>,
    pub waste_generated_t: Option<f64>,
    pub waste_recycled_share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPayload {
    pub employees_total: u32,
    pub female_share: Option<f64>,
    pub lost_time_injury_rate: Option<f64>,
    pub training_hours_per_employee: Option<f64>,
    pub turnover_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernancePayload {
    pub board_size: u32,
    pub independent_directors: Option<u32>,
    pub female_directors: Option<u32>,
    pub anti_corruption_policy: bool,
    pub whistleblower_channel: bool,
    pub esg_committee: bool,
    pub last_audit_date: Option<NaiveDate>,
}

fn ratio(pct: Option<f64>) -> Option<f64> {
    pct.map(|p| p / 100.0)
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl EsgSubmission {
    pub fn from_report(report: &EsgReport) -> Self {
        let env = &report.environment;
        let social = &report.social;
        let gov = &report.governance;
        let total = report.scope1_tco2e + report.scope2_tco2e + env.scope3_tco2e.unwrap_or(0.0);

        Self {
            company_name: report.entity.company_name.trim().to_string(),
            reporting_year: report.entity.reporting_year,
            period_start: report.entity.period_start,
            period_end: report.entity.period_end,
            country: non_blank(&report.entity.country).map(|c| c.to_uppercase()),
            industry: non_blank(&report.entity.industry),
            headcount: report.entity.headcount,
            environment: EnvironmentPayload {
                scope1_tco2e: report.scope1_tco2e,
                scope2_tco2e: report.scope2_tco2e,
                scope3_tco2e: env.scope3_tco2e,
                total_emissions_tco2e: total,
                energy_consumption_mwh: env.energy_consumption_mwh,
                renewable_share: ratio(env.renewable_share_pct),
                water_withdrawal_m3: env.water_withdrawal_m3,
                waste_generated_t: env.waste_generated_t,
                waste_recycled_share: ratio(env.waste_recycled_pct),
            },
            social: SocialPayload {
                employees_total: report.employees_total,
                female_share: ratio(social.female_share_pct),
                lost_time_injury_rate: social.lost_time_injury_rate,
                training_hours_per_employee: social.training_hours_per_employee,
                turnover_rate: ratio(social.turnover_rate_pct),
            },
            governance: GovernancePayload {
                board_size: report.board_size,
                independent_directors: gov.independent_directors,
                female_directors: gov.female_directors,
                anti_corruption_policy: gov.has_anti_corruption_policy,
                whistleblower_channel: gov.has_whistleblower_channel,
                esg_committee: gov.has_esg_committee,
                last_audit_date: gov.last_audit_date,
            },
        }
    }
}
