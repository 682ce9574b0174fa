use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use web_sys::window;

/// Screens reachable through `?page=`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    #[default]
    EsgReport,
    Companies,
    CompanySettings,
    Sites,
    Onboarding,
}

impl Page {
    /// Reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Page::Login | Page::Register | Page::ForgotPassword | Page::ResetPassword
        )
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Login => "Sign in",
            Page::Register => "Create account",
            Page::ForgotPassword => "Forgot password",
            Page::ResetPassword => "Reset password",
            Page::EsgReport => "ESG data",
            Page::Companies => "Companies",
            Page::CompanySettings => "Company settings",
            Page::Sites => "Sites",
            Page::Onboarding => "Onboarding",
        }
    }

    pub fn href(&self) -> String {
        format!("?{}", query_string(&PageQuery::page(*self)))
    }
}

/// Query string of the app URL; `token` comes from password-reset emails
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl PageQuery {
    pub fn page(page: Page) -> Self {
        Self {
            page: Some(page),
            token: None,
        }
    }

    pub fn parse(search: &str) -> Self {
        serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default()
    }
}

fn query_string(query: &PageQuery) -> String {
    serde_qs::to_string(query).unwrap_or_default()
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub page: RwSignal<Page>,
    /// Reset token captured from the URL on startup
    pub reset_token: RwSignal<Option<String>>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let query = PageQuery::parse(&search);
        Self {
            page: RwSignal::new(query.page.unwrap_or_default()),
            reset_token: RwSignal::new(query.token),
        }
    }

    pub fn navigate(&self, page: Page) {
        log::debug!("navigate: {:?}", page);
        self.page.set(page);
    }

    /// Keeps `?page=` in step with the active page
    pub fn init_router_integration(&self) {
        let this = *self;
        Effect::new(move |_| {
            let page = this.page.get();
            let new_url = page.href();

            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();

            if current_search != new_url {
                if let Some(w) = window() {
                    if let Ok(history) = w.history() {
                        let _ = history.replace_state_with_url(
                            &wasm_bindgen::JsValue::NULL,
                            "",
                            Some(&new_url),
                        );
                    }
                }
            }
        });
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_global_context() -> AppGlobalContext {
    use_context::<AppGlobalContext>().expect("AppGlobalContext context not found")
}
