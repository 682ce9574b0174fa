use leptos::prelude::*;

use super::fields::{checkbox_field, date_field, number_field, text_field};
use super::machine::WizardStep;
use super::view_model::{EsgWizardViewModel, SubmitHandler};
use crate::shared::icons::icon;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::{use_auth, AuthStatus};

#[component]
pub fn EsgWizard(on_submit: SubmitHandler) -> impl IntoView {
    let auth = use_auth();
    let user_id = auth.state.with_untracked(|s| s.user().map(|u| u.id.clone()));
    let vm = EsgWizardViewModel::new(use_toasts(), user_id.as_deref());
    let on_submit_sv = StoredValue::new_local(on_submit);
    vm.attach();
    // after sign-out the staged edits belong to nobody
    vm.bind_lifetime(move || {
        auth.state
            .try_with_untracked(|s| s.status != AuthStatus::Anonymous)
            .unwrap_or(false)
    });

    view! {
        <div class="details-container esg-wizard">
            <div class="details-header">
                <h3>"ESG data"</h3>
                {move || vm.last_saved.get().map(|t| view! {
                    <span class="draft-status">{format!("Draft saved at {}", t)}</span>
                })}
            </div>

            <StepBar vm=vm />

            <div class="details-form">
                {move || match vm.step() {
                    WizardStep::General => general_step(vm).into_any(),
                    WizardStep::Environment => environment_step(vm).into_any(),
                    WizardStep::Social => social_step(vm).into_any(),
                    WizardStep::Governance => governance_step(vm).into_any(),
                }}
            </div>

            <div class="details-actions">
                <button
                    class="btn btn-secondary"
                    on:click=move |_| vm.back()
                    disabled=move || vm.step() == WizardStep::General
                >
                    {icon("chevron-left")}
                    "Back"
                </button>
                <button class="btn btn-secondary" on:click=move |_| vm.save_draft_now()>
                    {icon("save")}
                    "Save draft"
                </button>
                <Show
                    when=move || vm.step().is_last()
                    fallback=move || view! {
                        <button class="btn btn-primary" on:click=move |_| vm.next()>
                            "Next"
                            {icon("chevron-right")}
                        </button>
                    }
                >
                    <button
                        class="btn btn-primary"
                        disabled=move || vm.is_submitting()
                        on:click=move |_| vm.submit(on_submit_sv.get_value())
                    >
                        {icon("check")}
                        {move || if vm.is_submitting() { "Submitting..." } else { "Submit" }}
                    </button>
                </Show>
            </div>
        </div>
    }
}

/// Steps are freely reachable; the badge counts errors from the last submit
#[component]
fn StepBar(vm: EsgWizardViewModel) -> impl IntoView {
    view! {
        <ol class="wizard-steps">
            {WizardStep::all()
                .into_iter()
                .map(|step| {
                    let errors = move || vm.machine.with(|m| m.errors().count_in_section(step.section()));
                    view! {
                        <li class:active=move || vm.step() == step>
                            <button type="button" class="wizard-step" on:click=move |_| vm.go_to(step)>
                                <span class="wizard-step-number">{step.number()}</span>
                                {step.title()}
                                {move || {
                                    let n = errors();
                                    (n > 0).then(|| view! { <span class="badge badge-error">{n}</span> })
                                }}
                            </button>
                        </li>
                    }
                })
                .collect_view()}
        </ol>
    }
}

fn general_step(vm: EsgWizardViewModel) -> impl IntoView {
    view! {
        {text_field(vm, "Company name", "general.companyName",
            |d| d.general.company_name.clone(), |d, v| d.general.company_name = v)}
        {number_field(vm, "Reporting year", "general.reportingYear",
            |d| d.general.reporting_year, |d, v| d.general.reporting_year = v)}
        {date_field(vm, "Period start", "general.periodStart",
            |d| d.general.period_start, |d, v| d.general.period_start = v)}
        {date_field(vm, "Period end", "general.periodEnd",
            |d| d.general.period_end, |d, v| d.general.period_end = v)}
        {text_field(vm, "Country (ISO code)", "general.country",
            |d| d.general.country.clone(), |d, v| d.general.country = v)}
        {text_field(vm, "Industry", "general.industry",
            |d| d.general.industry.clone(), |d, v| d.general.industry = v)}
        {number_field(vm, "Headcount", "general.headcount",
            |d| d.general.headcount, |d, v| d.general.headcount = v)}
    }
}

fn environment_step(vm: EsgWizardViewModel) -> impl IntoView {
    view! {
        {number_field(vm, "Scope 1 emissions, tCO2e", "environment.scope1Tco2e",
            |d| d.environment.scope1_tco2e, |d, v| d.environment.scope1_tco2e = v)}
        {number_field(vm, "Scope 2 emissions, tCO2e", "environment.scope2Tco2e",
            |d| d.environment.scope2_tco2e, |d, v| d.environment.scope2_tco2e = v)}
        {number_field(vm, "Scope 3 emissions, tCO2e", "environment.scope3Tco2e",
            |d| d.environment.scope3_tco2e, |d, v| d.environment.scope3_tco2e = v)}
        {number_field(vm, "Energy consumption, MWh", "environment.energyConsumptionMwh",
            |d| d.environment.energy_consumption_mwh, |d, v| d.environment.energy_consumption_mwh = v)}
        {number_field(vm, "Renewable share, %", "environment.renewableSharePct",
            |d| d.environment.renewable_share_pct, |d, v| d.environment.renewable_share_pct = v)}
        {number_field(vm, "Water withdrawal, m3", "environment.waterWithdrawalM3",
            |d| d.environment.water_withdrawal_m3, |d, v| d.environment.water_withdrawal_m3 = v)}
        {number_field(vm, "Waste generated, t", "environment.wasteGeneratedT",
            |d| d.environment.waste_generated_t, |d, v| d.environment.waste_generated_t = v)}
        {number_field(vm, "Waste recycled, %", "environment.wasteRecycledPct",
            |d| d.environment.waste_recycled_pct, |d, v| d.environment.waste_recycled_pct = v)}
    }
}

fn social_step(vm: EsgWizardViewModel) -> impl IntoView {
    view! {
        {number_field(vm, "Employees", "social.employeesTotal",
            |d| d.social.employees_total, |d, v| d.social.employees_total = v)}
        {number_field(vm, "Female share, %", "social.femaleSharePct",
            |d| d.social.female_share_pct, |d, v| d.social.female_share_pct = v)}
        {number_field(vm, "Lost time injury rate", "social.lostTimeInjuryRate",
            |d| d.social.lost_time_injury_rate, |d, v| d.social.lost_time_injury_rate = v)}
        {number_field(vm, "Training hours per employee", "social.trainingHoursPerEmployee",
            |d| d.social.training_hours_per_employee, |d, v| d.social.training_hours_per_employee = v)}
        {number_field(vm, "Turnover rate, %", "social.turnoverRatePct",
            |d| d.social.turnover_rate_pct, |d, v| d.social.turnover_rate_pct = v)}
    }
}

fn governance_step(vm: EsgWizardViewModel) -> impl IntoView {
    view! {
        {number_field(vm, "Board size", "governance.boardSize",
            |d| d.governance.board_size, |d, v| d.governance.board_size = v)}
        {number_field(vm, "Independent directors", "governance.independentDirectors",
            |d| d.governance.independent_directors, |d, v| d.governance.independent_directors = v)}
        {number_field(vm, "Female directors", "governance.femaleDirectors",
            |d| d.governance.female_directors, |d, v| d.governance.female_directors = v)}
        {checkbox_field(vm, "Anti-corruption policy",
            |d| d.governance.has_anti_corruption_policy, |d, v| d.governance.has_anti_corruption_policy = v)}
        {checkbox_field(vm, "Whistleblower channel",
            |d| d.governance.has_whistleblower_channel, |d, v| d.governance.has_whistleblower_channel = v)}
        {checkbox_field(vm, "ESG committee",
            |d| d.governance.has_esg_committee, |d, v| d.governance.has_esg_committee = v)}
        {date_field(vm, "Last external audit", "governance.lastAuditDate",
            |d| d.governance.last_audit_date, |d, v| d.governance.last_audit_date = v)}
    }
}
