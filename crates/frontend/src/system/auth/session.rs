//! Sign-in/sign-up/sign-out flows on top of the token store and identity cache.

use contracts::system::auth::{LoginResponse, RegisterRequest};

use super::api;
use super::identity::{Identity, IdentityCache};
use crate::shared::http::{ApiClient, ApiError};

#[derive(Clone)]
pub struct AuthSession {
    client: ApiClient,
    identity: IdentityCache,
}

impl AuthSession {
    pub fn new(client: ApiClient, identity: IdentityCache) -> Self {
        Self { client, identity }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cached_identity(&self) -> Option<Identity> {
        if self.client.tokens().has_session() {
            self.identity.load()
        } else {
            None
        }
    }

    pub async fn sign_in(&self, email: String, password: String) -> Result<Identity, ApiError> {
        let response = api::login(&self.client, email.trim().to_string(), password).await?;
        Ok(self.establish(response))
    }

    pub async fn sign_up(&self, dto: RegisterRequest) -> Result<Identity, ApiError> {
        let response = api::register(&self.client, &dto).await?;
        Ok(self.establish(response))
    }

    /// Revokes the refresh token (best effort) and forgets the session
    pub async fn sign_out(&self) {
        if let Some(refresh_token) = self.client.tokens().refresh_token() {
            if let Err(e) = api::logout(&self.client, refresh_token).await {
                log::warn!("Logout request failed: {}", e);
            }
        }
        self.forget();
    }

    pub fn forget(&self) {
        self.client.tokens().clear();
        self.identity.clear();
    }

    /// Re-validates a restored session against the server.
    ///
    /// `Ok(None)` when there is nothing to validate. Auth failures forget the
    /// session; other failures are returned and leave the cache untouched.
    pub async fn validate(&self) -> Result<Option<Identity>, ApiError> {
        if !self.client.tokens().has_session() {
            return Ok(None);
        }
        match api::current_session(&self.client).await {
            Ok(session) => {
                let identity = Identity {
                    user: session.user,
                    company: session.company,
                    role: session.role,
                };
                self.identity.save(&identity);
                Ok(Some(identity))
            }
            Err(ApiError::Unauthorized { .. }) | Err(ApiError::RefreshFailed { .. }) => {
                self.forget();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn establish(&self, response: LoginResponse) -> Identity {
        self.client
            .tokens()
            .set_tokens(&response.access_token, &response.refresh_token);
        let identity = Identity {
            user: response.user,
            company: response.company,
            role: response.role,
        };
        self.identity.save(&identity);
        log::info!("Signed in as {}", identity.user.email);
        identity
    }
}
