//! Step pointer, values and submission state of the ESG wizard.
//!
//! Navigation is deliberately free: `next`/`back`/`go_to` never validate.
//! Only submitting runs the full schema.

use contracts::domain::a004_esg_report::{validate, EsgDraft, EsgReport, ValidationErrors};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WizardStep {
    General,
    Environment,
    Social,
    Governance,
}

impl WizardStep {
    pub fn all() -> [WizardStep; 4] {
        [
            WizardStep::General,
            WizardStep::Environment,
            WizardStep::Social,
            WizardStep::Governance,
        ]
    }

    /// 1-based position shown in the step bar
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::General => 1,
            WizardStep::Environment => 2,
            WizardStep::Social => 3,
            WizardStep::Governance => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::all().into_iter().find(|s| s.number() == n)
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::General => "General",
            WizardStep::Environment => "Environment",
            WizardStep::Social => "Social",
            WizardStep::Governance => "Governance",
        }
    }

    /// Prefix of this step's fields in validation error paths
    pub fn section(&self) -> &'static str {
        match self {
            WizardStep::General => "general",
            WizardStep::Environment => "environment",
            WizardStep::Social => "social",
            WizardStep::Governance => "governance",
        }
    }

    pub fn next(&self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(*self)
    }

    pub fn previous(&self) -> Self {
        Self::from_number(self.number().saturating_sub(1)).unwrap_or(*self)
    }

    pub fn is_last(&self) -> bool {
        *self == WizardStep::Governance
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// Why [`WizardMachine::begin_submit`] did not start a submission
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitRejected {
    /// Not on the last step, or a submission is already running
    NotAllowed,
    /// The values failed validation; the errors are now attached
    Invalid(ValidationErrors),
}

#[derive(Clone, Debug, PartialEq)]
pub struct WizardMachine {
    step: WizardStep,
    values: EsgDraft,
    /// Values as of the last successful submit
    baseline: EsgDraft,
    submission: SubmissionState,
    errors: ValidationErrors,
}

impl Default for WizardMachine {
    fn default() -> Self {
        Self::new(EsgDraft::default())
    }
}

impl WizardMachine {
    /// Starts on step 1 with `values` (usually a hydrated draft); the
    /// baseline stays empty so a restored draft counts as unsaved work.
    pub fn new(values: EsgDraft) -> Self {
        Self {
            step: WizardStep::General,
            values,
            baseline: EsgDraft::default(),
            submission: SubmissionState::Idle,
            errors: ValidationErrors::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn values(&self) -> &EsgDraft {
        &self.values
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn next(&mut self) {
        self.step = self.step.next();
    }

    pub fn back(&mut self) {
        self.step = self.step.previous();
    }

    /// Every step counts as visited, so any step can be opened from the nav bar
    pub fn go_to(&mut self, step: WizardStep) {
        self.step = step;
    }

    pub fn update(&mut self, edit: impl FnOnce(&mut EsgDraft)) {
        edit(&mut self.values);
    }

    /// Replaces all values, e.g. with a draft written by another tab
    pub fn replace_values(&mut self, values: EsgDraft) {
        self.values = values;
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.baseline
    }

    pub fn can_submit(&self) -> bool {
        self.step.is_last() && self.submission == SubmissionState::Idle
    }

    /// Validates everything. On success the machine is `Submitting` and the
    /// caller gets the aggregate to send; on failure errors are attached.
    pub fn begin_submit(&mut self) -> Result<EsgReport, SubmitRejected> {
        if !self.can_submit() {
            return Err(SubmitRejected::NotAllowed);
        }
        match validate(&self.values) {
            Ok(report) => {
                self.errors = ValidationErrors::new();
                self.submission = SubmissionState::Submitting;
                Ok(report)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(SubmitRejected::Invalid(errors))
            }
        }
    }

    /// Server-side rejections are shown like local ones
    pub fn fail_submit(&mut self, errors: Option<ValidationErrors>) {
        if let Some(errors) = errors {
            self.errors = errors;
        }
        self.submission = SubmissionState::Idle;
    }

    pub fn finish_submit(&mut self) {
        self.baseline = self.values.clone();
        self.submission = SubmissionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn complete_values() -> EsgDraft {
        let mut draft = EsgDraft::default();
        draft.general.company_name = "Acme".into();
        draft.general.reporting_year = Some(2024);
        draft.general.period_start = NaiveDate::from_ymd_opt(2024, 1, 1);
        draft.general.period_end = NaiveDate::from_ymd_opt(2024, 12, 31);
        draft.environment.scope1_tco2e = Some(1.0);
        draft.environment.scope2_tco2e = Some(2.0);
        draft.social.employees_total = Some(10);
        draft.governance.board_size = Some(3);
        draft
    }

    #[test]
    fn step_navigation_is_clamped_and_unvalidated() {
        let mut machine = WizardMachine::default();
        machine.back();
        assert_eq!(machine.step(), WizardStep::General);
        for _ in 0..6 {
            machine.next();
        }
        assert_eq!(machine.step(), WizardStep::Governance);
        assert!(machine.errors().is_empty());
        machine.go_to(WizardStep::Social);
        assert_eq!(machine.step().number(), 3);
    }

    #[test]
    fn submit_only_on_last_step() {
        let mut machine = WizardMachine::new(complete_values());
        assert!(!machine.can_submit());
        assert_eq!(machine.begin_submit(), Err(SubmitRejected::NotAllowed));
        machine.go_to(WizardStep::Governance);
        assert!(machine.can_submit());
    }

    #[test]
    fn disallowed_submit_does_not_resurface_old_errors() {
        let mut machine = WizardMachine::default();
        machine.go_to(WizardStep::Governance);
        assert!(matches!(machine.begin_submit(), Err(SubmitRejected::Invalid(_))));
        assert!(!machine.errors().is_empty());

        // a second click while the first submission is running
        machine.replace_values(complete_values());
        machine.begin_submit().unwrap();
        assert_eq!(machine.begin_submit(), Err(SubmitRejected::NotAllowed));
        assert_eq!(machine.submission(), SubmissionState::Submitting);

        machine.back();
        assert_eq!(machine.begin_submit(), Err(SubmitRejected::NotAllowed));
    }

    #[test]
    fn invalid_submit_attaches_errors_and_stays_idle() {
        let mut machine = WizardMachine::default();
        machine.go_to(WizardStep::Governance);
        let Err(SubmitRejected::Invalid(errors)) = machine.begin_submit() else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.first_for("general.companyName"), Some("Required"));
        assert_eq!(machine.errors(), &errors);
        assert_eq!(machine.submission(), SubmissionState::Idle);
    }

    #[test]
    fn successful_submit_cleans_the_form() {
        let mut machine = WizardMachine::new(complete_values());
        assert!(machine.is_dirty());
        machine.go_to(WizardStep::Governance);
        let report = machine.begin_submit().unwrap();
        assert_eq!(report.entity.company_name, "Acme");
        assert_eq!(machine.submission(), SubmissionState::Submitting);
        assert!(!machine.can_submit());

        machine.finish_submit();
        assert!(!machine.is_dirty());
        assert_eq!(machine.submission(), SubmissionState::Idle);

        machine.update(|v| v.social.employees_total = Some(11));
        assert!(machine.is_dirty());
    }

    #[test]
    fn failed_request_keeps_values_dirty() {
        let mut machine = WizardMachine::new(complete_values());
        machine.go_to(WizardStep::Governance);
        machine.begin_submit().unwrap();
        let mut server = ValidationErrors::new();
        server.add("governance.boardSize", "Board size looks wrong");
        machine.fail_submit(Some(server));
        assert!(machine.is_dirty());
        assert_eq!(
            machine.errors().first_for("governance.boardSize"),
            Some("Board size looks wrong")
        );
        assert!(machine.can_submit());
    }
}
