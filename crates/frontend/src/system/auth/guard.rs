use contracts::system::auth::Role;
use leptos::prelude::*;

use super::context::use_auth;

/// Component that requires authentication
/// Shows fallback if not authenticated
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    view! {
        <Show
            when=move || auth.is_authenticated()
            fallback=|| view! { <div class="guard-message">"Not authenticated. Please sign in."</div> }
        >
            {children()}
        </Show>
    }
}

/// Component that requires a role passing `allowed`
/// (e.g. `Role::can_manage_company`)
#[component]
pub fn RequireRole(allowed: fn(&Role) -> bool, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    view! {
        <Show
            when=move || auth.is_authenticated() && allowed(&auth.role())
            fallback=|| view! { <div class="guard-message">"Access denied. Your role does not allow this screen."</div> }
        >
            {children()}
        </Show>
    }
}
