//! TopHeader component - application top bar with the signed-in user,
//! the active company and the sign-out action.

use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn TopHeader() -> impl IntoView {
    let auth = use_auth();

    let logout = move |_| {
        spawn_local(async move {
            auth.sign_out().await;
        });
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                {icon("leaf")}
                <span class="top-header__title">"ESG Reporting"</span>
                <span class="top-header__company">
                    {move || auth.state.with(|s| s.company().map(|c| c.name.clone()).unwrap_or_default())}
                </span>
            </div>

            <div class="top-header__actions">
                <div class="top-header__user">
                    {icon("users")}
                    <span>
                        {move || auth.state.with(|s| s.user().map(|u| u.display_name().to_string()).unwrap_or_default())}
                    </span>
                    <span class="badge">{move || auth.role().as_str()}</span>
                </div>

                <button class="top-header__icon-btn" on:click=logout title="Sign out">
                    {icon("log-out")}
                </button>
            </div>
        </div>
    }
}
