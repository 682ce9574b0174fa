use contracts::domain::a001_company::{Company, CreateCompanyDto, FoundationalData, UpdateCompanyDto};

use crate::shared::api_utils::segment;
use crate::shared::http::{ApiClient, ApiError, HttpMethod};

/// Companies the current user belongs to
pub async fn list_companies(client: &ApiClient) -> Result<Vec<Company>, ApiError> {
    client.get_json("/companies").await
}

pub async fn create_company(client: &ApiClient, dto: &CreateCompanyDto) -> Result<Company, ApiError> {
    client.send_json(HttpMethod::Post, "/companies", dto).await
}

/// Partial update; only fields set on `dto` are sent
pub async fn update_company(
    client: &ApiClient,
    company_id: &str,
    dto: &UpdateCompanyDto,
) -> Result<Company, ApiError> {
    let path = format!("/companies/{}", segment(company_id));
    client.send_json(HttpMethod::Patch, &path, dto).await
}

pub async fn save_foundational(
    client: &ApiClient,
    company_id: &str,
    data: &FoundationalData,
) -> Result<(), ApiError> {
    let path = format!("/companies/{}/foundational", segment(company_id));
    client.send_unit(HttpMethod::Put, &path, data).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::testing::ScriptedTransport;
    use crate::shared::storage::MemoryStorage;
    use crate::system::auth::token_store::TokenStore;
    use futures::executor::block_on;
    use std::rc::Rc;

    const COMPANY: &str = r#"{"id":"0b9c1f1e-52a4-4c55-8a43-6a8d5f3b9e01","name":"Acme"}"#;

    fn client() -> (Rc<ScriptedTransport>, ApiClient) {
        let transport = Rc::new(ScriptedTransport::new("t"));
        let tokens = TokenStore::init(Rc::new(MemoryStorage::new()));
        tokens.set_tokens("t", "r");
        (transport.clone(), ApiClient::new(transport, tokens))
    }

    #[test]
    fn lists_companies() {
        let (transport, client) = client();
        transport.respond(HttpMethod::Get, "/companies", 200, &format!("[{}]", COMPANY));
        let companies = block_on(list_companies(&client)).unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Acme");
    }

    #[test]
    fn patch_sends_only_changed_fields() {
        let (transport, client) = client();
        let id = "0b9c1f1e-52a4-4c55-8a43-6a8d5f3b9e01";
        transport.respond(HttpMethod::Patch, &format!("/companies/{}", id), 200, COMPANY);
        let dto = UpdateCompanyDto {
            industry: Some("Food".into()),
            ..Default::default()
        };
        block_on(update_company(&client, id, &dto)).unwrap();
        let sent = transport.last_request(&format!("/companies/{}", id)).unwrap();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.body.as_deref(), Some(r#"{"industry":"Food"}"#));
    }

    #[test]
    fn foundational_validation_errors_surface_as_field_errors() {
        let (transport, client) = client();
        transport.respond(
            HttpMethod::Put,
            "/companies/c1/foundational",
            400,
            r#"{"message":"Invalid","issues":{"fieldErrors":{"legalName":["Required"]},"formErrors":[]}}"#,
        );
        let err = block_on(save_foundational(&client, "c1", &FoundationalData::default())).unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }
}
