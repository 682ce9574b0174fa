use contracts::domain::a002_site::{CreateSiteDto, Site};

use crate::shared::api_utils::segment;
use crate::shared::http::{ApiClient, ApiError, HttpMethod};

fn sites_path(company_id: &str) -> String {
    format!("/companies/{}/sites", segment(company_id))
}

pub async fn list_sites(client: &ApiClient, company_id: &str) -> Result<Vec<Site>, ApiError> {
    client.get_json(&sites_path(company_id)).await
}

pub async fn create_site(client: &ApiClient, company_id: &str, dto: &CreateSiteDto) -> Result<Site, ApiError> {
    client
        .send_json(HttpMethod::Post, &sites_path(company_id), dto)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::testing::ScriptedTransport;
    use crate::shared::storage::MemoryStorage;
    use crate::system::auth::token_store::TokenStore;
    use contracts::domain::a002_site::SiteKind;
    use futures::executor::block_on;
    use std::rc::Rc;

    fn client() -> (Rc<ScriptedTransport>, ApiClient) {
        let transport = Rc::new(ScriptedTransport::new("t"));
        let tokens = TokenStore::init(Rc::new(MemoryStorage::new()));
        tokens.set_tokens("t", "r");
        (transport.clone(), ApiClient::new(transport, tokens))
    }

    #[test]
    fn company_id_is_path_encoded() {
        assert_eq!(sites_path("a b/c"), "/companies/a%20b%2Fc/sites");
    }

    #[test]
    fn create_posts_to_company_sites() {
        let (transport, client) = client();
        let site = r#"{
            "id":"5d0f0c6e-8f83-4c1b-9d3e-2b1f5a7c9e10",
            "companyId":"0b9c1f1e-52a4-4c55-8a43-6a8d5f3b9e01",
            "name":"Berlin plant",
            "kind":"factory"
        }"#;
        transport.respond(HttpMethod::Post, "/companies/c1/sites", 201, site);
        let dto = CreateSiteDto {
            name: "Berlin plant".into(),
            kind: SiteKind::Factory,
            ..Default::default()
        };
        let created = block_on(create_site(&client, "c1", &dto)).unwrap();
        assert_eq!(created.kind, SiteKind::Factory);
        assert_eq!(transport.seen_bearers("/companies/c1/sites"), vec![Some("t".to_string())]);
    }
}
