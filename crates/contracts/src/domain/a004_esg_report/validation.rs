//! Full-schema validation run when the wizard is submitted.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::draft::{EnvironmentSection, EsgDraft, GovernanceSection, SocialSection};
use crate::shared::api_error::ValidationIssues;

pub const MIN_REPORTING_YEAR: i32 = 1990;
pub const MAX_REPORTING_YEAR: i32 = 2100;

/// Messages keyed by field path, e.g. `environment.renewableSharePct`
#[derive(Debug, Clone, Default, PartialEq, thiserror::Error)]
#[error("{} field(s) failed validation", .fields.len())]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn first_for(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Number of invalid fields under a section prefix (`"social"`)
    pub fn count_in_section(&self, section: &str) -> usize {
        let prefix = format!("{}.", section);
        self.fields.keys().filter(|k| k.starts_with(&prefix)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.fields.iter()
    }
}

impl From<ValidationIssues> for ValidationErrors {
    fn from(issues: ValidationIssues) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, messages) in issues.field_errors {
            for message in messages {
                errors.add(&field, message);
            }
        }
        for message in issues.form_errors {
            errors.add("form", message);
        }
        errors
    }
}

/// Reporting entity block after validation
#[derive(Debug, Clone, PartialEq)]
pub struct ReportingEntity {
    pub company_name: String,
    pub reporting_year: i32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub country: String,
    pub industry: String,
    pub headcount: Option<u32>,
}

/// Validated aggregate handed to the submit callback
#[derive(Debug, Clone, PartialEq)]
pub struct EsgReport {
    pub entity: ReportingEntity,
    pub scope1_tco2e: f64,
    pub scope2_tco2e: f64,
    pub environment: EnvironmentSection,
    pub employees_total: u32,
    pub social: SocialSection,
    pub board_size: u32,
    pub governance: GovernanceSection,
}

fn check_pct(errors: &mut ValidationErrors, field: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !(0.0..=100.0).contains(&v) {
            errors.add(field, "Must be between 0 and 100");
        }
    }
}

fn check_non_negative(errors: &mut ValidationErrors, field: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !v.is_finite() || v < 0.0 {
            errors.add(field, "Must be zero or greater");
        }
    }
}

fn required<T: Copy>(errors: &mut ValidationErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.add(field, "Required");
    }
    value
}

pub fn validate(draft: &EsgDraft) -> Result<EsgReport, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let general = &draft.general;
    let company_name = general.company_name.trim();
    if company_name.is_empty() {
        errors.add("general.companyName", "Required");
    }
    let reporting_year = required(&mut errors, "general.reportingYear", general.reporting_year);
    if let Some(year) = reporting_year {
        if !(MIN_REPORTING_YEAR..=MAX_REPORTING_YEAR).contains(&year) {
            errors.add(
                "general.reportingYear",
                format!("Must be between {} and {}", MIN_REPORTING_YEAR, MAX_REPORTING_YEAR),
            );
        }
    }
    let period_start = required(&mut errors, "general.periodStart", general.period_start);
    let period_end = required(&mut errors, "general.periodEnd", general.period_end);
    if let (Some(start), Some(end)) = (period_start, period_end) {
        if start > end {
            errors.add("general.periodEnd", "Period end must not be before its start");
        }
    }
    let country = general.country.trim();
    if !country.is_empty() && (country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic())) {
        errors.add("general.country", "Use a two-letter country code");
    }

    let env = &draft.environment;
    let scope1 = required(&mut errors, "environment.scope1Tco2e", env.scope1_tco2e);
    let scope2 = required(&mut errors, "environment.scope2Tco2e", env.scope2_tco2e);
    check_non_negative(&mut errors, "environment.scope1Tco2e", env.scope1_tco2e);
    check_non_negative(&mut errors, "environment.scope2Tco2e", env.scope2_tco2e);
    check_non_negative(&mut errors, "environment.scope3Tco2e", env.scope3_tco2e);
    check_non_negative(&mut errors, "environment.energyConsumptionMwh", env.energy_consumption_mwh);
    check_non_negative(&mut errors, "environment.waterWithdrawalM3", env.water_withdrawal_m3);
    check_non_negative(&mut errors, "environment.wasteGeneratedT", env.waste_generated_t);
    check_pct(&mut errors, "environment.renewableSharePct", env.renewable_share_pct);
    check_pct(&mut errors, "environment.wasteRecycledPct", env.waste_recycled_pct);

    let social = &draft.social;
    let employees_total = required(&mut errors, "social.employeesTotal", social.employees_total);
    check_pct(&mut errors, "social.femaleSharePct", social.female_share_pct);
    check_pct(&mut errors, "social.turnoverRatePct", social.turnover_rate_pct);
    check_non_negative(&mut errors, "social.lostTimeInjuryRate", social.lost_time_injury_rate);
    check_non_negative(
        &mut errors,
        "social.trainingHoursPerEmployee",
        social.training_hours_per_employee,
    );

    let gov = &draft.governance;
    let board_size = required(&mut errors, "governance.boardSize", gov.board_size);
    if let Some(size) = board_size {
        if matches!(gov.independent_directors, Some(n) if n > size) {
            errors.add("governance.independentDirectors", "Cannot exceed board size");
        }
        if matches!(gov.female_directors, Some(n) if n > size) {
            errors.add("governance.femaleDirectors", "Cannot exceed board size");
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // All required values were checked above
    match (
        reporting_year,
        period_start,
        period_end,
        scope1,
        scope2,
        employees_total,
        board_size,
    ) {
        (
            Some(reporting_year),
            Some(period_start),
            Some(period_end),
            Some(scope1_tco2e),
            Some(scope2_tco2e),
            Some(employees_total),
            Some(board_size),
        ) => Ok(EsgReport {
            entity: ReportingEntity {
                company_name: company_name.to_string(),
                reporting_year,
                period_start,
                period_end,
                country: country.to_string(),
                industry: general.industry.trim().to_string(),
                headcount: general.headcount,
            },
            scope1_tco2e,
            scope2_tco2e,
            environment: env.clone(),
            employees_total,
            social: social.clone(),
            board_size,
            governance: gov.clone(),
        }),
        _ => Err(errors),
    }
}
