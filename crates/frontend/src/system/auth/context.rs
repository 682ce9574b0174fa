use contracts::system::auth::{CompanyInfo, RegisterRequest, Role, UserInfo};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

use super::api;
use super::identity::{Identity, IdentityCache};
use super::session::AuthSession;
use super::token_store::TokenStore;
use crate::shared::api_utils::ApiConfig;
use crate::shared::http::{ApiClient, ApiError, GlooTransport};
use crate::shared::storage::{BrowserStorage, KeyValueStorage};
use crate::shared::toast::use_toasts;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    /// Restored session is being validated
    Checking,
    Authenticated,
    Anonymous,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub status: AuthStatus,
    pub identity: Option<Identity>,
}

impl AuthState {
    pub fn anonymous() -> Self {
        Self {
            status: AuthStatus::Anonymous,
            identity: None,
        }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            status: AuthStatus::Authenticated,
            identity: Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.identity.as_ref().map(|i| &i.user)
    }

    pub fn company(&self) -> Option<&CompanyInfo> {
        self.identity.as_ref().and_then(|i| i.company.as_ref())
    }

    pub fn role(&self) -> Role {
        self.identity.as_ref().map(|i| i.role).unwrap_or_default()
    }
}

/// Auth state plus the services behind it, provided by [`AuthProvider`]
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: RwSignal<AuthState>,
    session: StoredValue<AuthSession, LocalStorage>,
}

impl AuthContext {
    pub fn client(&self) -> ApiClient {
        self.session.with_value(|s| s.client().clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(|s| s.is_authenticated())
    }

    pub fn role(&self) -> Role {
        self.state.with(|s| s.role())
    }

    /// Active company; `None` until the user has one
    pub fn company_id(&self) -> Option<String> {
        self.state.with_untracked(|s| s.company().map(|c| c.id.clone()))
    }

    pub async fn sign_in(self, email: String, password: String) -> Result<(), ApiError> {
        let session = self.session.get_value();
        let identity = session.sign_in(email, password).await?;
        self.state.set(AuthState::authenticated(identity));
        Ok(())
    }

    pub async fn sign_up(self, dto: RegisterRequest) -> Result<(), ApiError> {
        let session = self.session.get_value();
        let identity = session.sign_up(dto).await?;
        self.state.set(AuthState::authenticated(identity));
        Ok(())
    }

    pub async fn sign_out(self) {
        let session = self.session.get_value();
        session.sign_out().await;
        self.state.set(AuthState::anonymous());
    }

    pub async fn forgot_password(self, email: String) -> Result<(), ApiError> {
        api::forgot_password(&self.client(), email.trim().to_string()).await
    }

    pub async fn reset_password(self, token: String, password: String) -> Result<(), ApiError> {
        api::reset_password(&self.client(), token, password).await
    }

    /// Drops the local session without calling the backend
    pub fn expire(&self) {
        self.session.with_value(|s| s.forget());
        self.state.set(AuthState::anonymous());
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let toasts = use_toasts();
    let storage: Rc<dyn KeyValueStorage> = Rc::new(BrowserStorage);
    let tokens = TokenStore::init(Rc::clone(&storage));
    tokens.listen_cross_tab();

    let transport = Rc::new(GlooTransport::new(ApiConfig::from_env()));
    let client = ApiClient::new(transport, tokens.clone());
    let identity = IdentityCache::new(storage);
    let session = AuthSession::new(client.clone(), identity.clone());

    let initial = match session.cached_identity() {
        Some(cached) => AuthState {
            status: AuthStatus::Checking,
            identity: Some(cached),
        },
        None if tokens.has_session() => AuthState {
            status: AuthStatus::Checking,
            identity: None,
        },
        None => AuthState::anonymous(),
    };
    let state = RwSignal::new(initial);

    let ctx = AuthContext {
        state,
        session: StoredValue::new_local(session.clone()),
    };

    {
        let identity = identity.clone();
        client.on_auth_failure(move |message| {
            identity.clear();
            state.set(AuthState::anonymous());
            toasts.error(message.to_string());
        });
    }

    // Another tab signed out
    tokens.subscribe(move |pair| {
        let gone = pair.access_token.is_none() && pair.refresh_token.is_none();
        if gone && state.get_untracked().status != AuthStatus::Anonymous {
            log::info!("Session ended in another tab");
            state.set(AuthState::anonymous());
        }
    });

    toasts.set_permission_denied_handler(Callback::new(move |_| ctx.expire()));

    if state.get_untracked().status == AuthStatus::Checking {
        spawn_local(async move {
            match session.validate().await {
                Ok(Some(identity)) => state.set(AuthState::authenticated(identity)),
                Ok(None) => state.set(AuthState::anonymous()),
                Err(e) => {
                    // offline or server trouble: keep the cached identity if we have one
                    log::warn!("Session validation failed: {}", e);
                    state.update(|s| {
                        s.status = if s.identity.is_some() {
                            AuthStatus::Authenticated
                        } else {
                            AuthStatus::Anonymous
                        };
                    });
                }
            }
        });
    }

    provide_context(ctx);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthProvider not found in component tree")
}
