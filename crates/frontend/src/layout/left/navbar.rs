use crate::layout::global_context::{use_global_context, Page};
use crate::shared::icons;
use crate::system::auth::context::use_auth;
use contracts::system::auth::Role;
use leptos::prelude::*;

/// Pages in the sidebar with the icon and the role check guarding them
const ENTRIES: [(Page, &str, fn(&Role) -> bool); 5] = [
    (Page::EsgReport, "leaf", |_| true),
    (Page::Sites, "map-pin", |_| true),
    (Page::Onboarding, "clipboard", |_| true),
    (Page::Companies, "building", |_| true),
    (Page::CompanySettings, "settings", Role::can_manage_company),
];

/// Plain anchors so the unsaved-changes guard sees every navigation
#[component]
pub fn Navbar() -> impl IntoView {
    let ctx = use_global_context();
    let auth = use_auth();

    view! {
        <nav class="main-nav-bar">
            <ul>
                {ENTRIES.into_iter().map(|(page, icon, allowed)| {
                    view! {
                        <Show when=move || allowed(&auth.role())>
                            <li class:active=move || ctx.page.get() == page>
                                <a
                                    href=page.href()
                                    on:click=move |ev| {
                                        ev.prevent_default();
                                        ctx.navigate(page);
                                    }
                                >
                                    {icons::icon(icon)}
                                    <span>{page.title()}</span>
                                </a>
                            </li>
                        </Show>
                    }
                }).collect_view()}
            </ul>
        </nav>
    }
}
