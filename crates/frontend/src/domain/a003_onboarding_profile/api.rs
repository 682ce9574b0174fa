use contracts::domain::a003_onboarding_profile::OnboardingProfile;

use crate::shared::api_utils::segment;
use crate::shared::http::{ApiClient, ApiError, HttpMethod};

fn profile_path(company_id: &str) -> String {
    format!("/companies/{}/onboarding-profile", segment(company_id))
}

/// `Ok(None)` when the company has not filled in the profile yet
pub async fn fetch_onboarding_profile(
    client: &ApiClient,
    company_id: &str,
) -> Result<Option<OnboardingProfile>, ApiError> {
    match client.get_json(&profile_path(company_id)).await {
        Ok(profile) => Ok(Some(profile)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn save_onboarding_profile(
    client: &ApiClient,
    company_id: &str,
    profile: &OnboardingProfile,
) -> Result<OnboardingProfile, ApiError> {
    client
        .send_json(HttpMethod::Put, &profile_path(company_id), &profile.clone().normalized())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::testing::ScriptedTransport;
    use crate::shared::storage::MemoryStorage;
    use crate::system::auth::token_store::TokenStore;
    use futures::executor::block_on;
    use std::rc::Rc;

    fn client() -> (Rc<ScriptedTransport>, ApiClient) {
        let transport = Rc::new(ScriptedTransport::new("t"));
        let tokens = TokenStore::init(Rc::new(MemoryStorage::new()));
        tokens.set_tokens("t", "r");
        (transport.clone(), ApiClient::new(transport, tokens))
    }

    #[test]
    fn missing_profile_is_not_an_error() {
        let (transport, client) = client();
        transport.respond(
            HttpMethod::Get,
            "/companies/c1/onboarding-profile",
            404,
            r#"{"message":"Not found"}"#,
        );
        assert_eq!(block_on(fetch_onboarding_profile(&client, "c1")), Ok(None));
    }

    #[test]
    fn other_failures_propagate() {
        let (transport, client) = client();
        transport.respond(HttpMethod::Get, "/companies/c1/onboarding-profile", 500, "boom");
        let err = block_on(fetch_onboarding_profile(&client, "c1")).unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn existing_profile_is_returned() {
        let (transport, client) = client();
        transport.respond(
            HttpMethod::Get,
            "/companies/c1/onboarding-profile",
            200,
            r#"{"reportingFrameworks":["GRI"],"completed":true}"#,
        );
        let profile = block_on(fetch_onboarding_profile(&client, "c1")).unwrap().unwrap();
        assert_eq!(profile.reporting_frameworks, vec!["GRI".to_string()]);
        assert!(profile.completed);
    }
}
