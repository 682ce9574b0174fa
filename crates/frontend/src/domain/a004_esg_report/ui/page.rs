use contracts::domain::a004_esg_report::{EsgReport, EsgSubmission};
use futures::FutureExt;
use leptos::prelude::*;
use std::rc::Rc;

use super::wizard::{EsgWizard, SubmitHandler};
use crate::domain::a004_esg_report::api;
use crate::shared::http::ApiError;
use crate::system::auth::context::use_auth;

pub const NO_COMPANY_MESSAGE: &str = "Select a company before submitting ESG data";

fn require_company(company_id: Option<String>) -> Result<String, ApiError> {
    company_id.ok_or_else(|| ApiError::Precondition(NO_COMPANY_MESSAGE.to_string()))
}

/// Wizard bound to the active company
#[component]
#[allow(non_snake_case)]
pub fn EsgReportPage() -> impl IntoView {
    let auth = use_auth();

    let on_submit: SubmitHandler = Rc::new(move |report: EsgReport| {
        let client = auth.client();
        let company_id = auth.company_id();
        async move {
            let company_id = require_company(company_id)?;
            let submission = EsgSubmission::from_report(&report);
            log::info!(
                "Submitting ESG report {} for company {}",
                submission.reporting_year,
                company_id
            );
            api::submit_esg_report(&client, &company_id, &submission).await
        }
        .boxed_local()
    });

    view! { <EsgWizard on_submit=on_submit /> }
}
