use contracts::domain::a004_esg_report::EsgSubmission;

use crate::shared::api_utils::segment;
use crate::shared::http::{ApiClient, ApiError, HttpMethod};

pub async fn submit_esg_report(
    client: &ApiClient,
    company_id: &str,
    submission: &EsgSubmission,
) -> Result<(), ApiError> {
    let path = format!("/companies/{}/esg-reports", segment(company_id));
    client.send_unit(HttpMethod::Post, &path, submission).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::testing::ScriptedTransport;
    use crate::shared::http::ErrorOutcome;
    use crate::shared::storage::MemoryStorage;
    use crate::system::auth::token_store::TokenStore;
    use contracts::domain::a004_esg_report::{validate, EsgDraft};
    use chrono::NaiveDate;
    use futures::executor::block_on;
    use std::rc::Rc;

    fn submission() -> EsgSubmission {
        let mut draft = EsgDraft::default();
        draft.general.company_name = "Acme".into();
        draft.general.reporting_year = Some(2024);
        draft.general.period_start = NaiveDate::from_ymd_opt(2024, 1, 1);
        draft.general.period_end = NaiveDate::from_ymd_opt(2024, 12, 31);
        draft.environment.scope1_tco2e = Some(10.0);
        draft.environment.scope2_tco2e = Some(5.0);
        draft.social.employees_total = Some(12);
        draft.governance.board_size = Some(3);
        EsgSubmission::from_report(&validate(&draft).unwrap())
    }

    #[test]
    fn server_validation_maps_to_field_errors() {
        let transport = Rc::new(ScriptedTransport::new("t"));
        let tokens = TokenStore::init(Rc::new(MemoryStorage::new()));
        tokens.set_tokens("t", "r");
        let client = ApiClient::new(transport.clone(), tokens);
        transport.respond(
            HttpMethod::Post,
            "/companies/c1/esg-reports",
            400,
            r#"{"message":"Check the highlighted fields","issues":{"fieldErrors":{"environment.scope1Tco2e":["Too large"]},"formErrors":[]}}"#,
        );

        let err = block_on(submit_esg_report(&client, "c1", &submission())).unwrap_err();
        match err.outcome() {
            ErrorOutcome::FieldErrors { errors, .. } => {
                assert_eq!(errors.first_for("environment.scope1Tco2e"), Some("Too large"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        let body = transport.last_request("/companies/c1/esg-reports").unwrap().body.unwrap();
        assert!(body.contains("\"companyName\":\"Acme\""));
    }
}
