use crate::domain::a001_company::ui::{CompanyList, CompanySettings};
use crate::domain::a002_site::ui::SiteList;
use crate::domain::a003_onboarding_profile::ui::OnboardingProfileForm;
use crate::domain::a004_esg_report::ui::page::EsgReportPage;
use crate::layout::global_context::{use_global_context, Page};
use crate::layout::Shell;
use crate::system::auth::context::{use_auth, AuthStatus};
use crate::system::auth::guard::{RequireAuth, RequireRole};
use crate::system::pages::forgot_password::ForgotPasswordPage;
use crate::system::pages::login::LoginPage;
use crate::system::pages::register::RegisterPage;
use crate::system::pages::reset_password::ResetPasswordPage;
use contracts::system::auth::Role;
use leptos::prelude::*;

/// Where a page request actually lands for the given auth status
pub fn resolve_page(status: AuthStatus, requested: Page) -> Page {
    match status {
        AuthStatus::Authenticated if requested.is_public() => Page::EsgReport,
        AuthStatus::Anonymous if !requested.is_public() => Page::Login,
        _ => requested,
    }
}

fn app_page(page: Page) -> AnyView {
    match page {
        Page::EsgReport => view! {
            <RequireRole allowed=Role::can_edit_esg_data>
                <EsgReportPage />
            </RequireRole>
        }
        .into_any(),
        Page::Companies => view! { <CompanyList /> }.into_any(),
        Page::CompanySettings => view! {
            <RequireRole allowed=Role::can_manage_company>
                <CompanySettings />
            </RequireRole>
        }
        .into_any(),
        Page::Sites => view! { <SiteList /> }.into_any(),
        Page::Onboarding => view! { <OnboardingProfileForm /> }.into_any(),
        _ => ().into_any(),
    }
}

fn auth_page(page: Page) -> AnyView {
    match page {
        Page::Register => view! { <RegisterPage /> }.into_any(),
        Page::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        Page::ResetPassword => view! { <ResetPasswordPage /> }.into_any(),
        _ => view! { <LoginPage /> }.into_any(),
    }
}

#[component]
fn MainLayout() -> impl IntoView {
    let ctx = use_global_context();

    view! {
        <RequireAuth>
            <Shell>
                {move || app_page(ctx.page.get())}
            </Shell>
        </RequireAuth>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let auth = use_auth();
    let ctx = use_global_context();
    ctx.init_router_integration();

    let status = Memo::new(move |_| auth.state.with(|s| s.status));

    Effect::new(move |_| {
        let requested = ctx.page.get();
        let target = resolve_page(status.get(), requested);
        if target != requested {
            ctx.navigate(target);
        }
    });

    view! {
        {move || match status.get() {
            AuthStatus::Checking => view! { <div class="loading">"Restoring session..."</div> }.into_any(),
            AuthStatus::Authenticated => view! { <MainLayout /> }.into_any(),
            AuthStatus::Anonymous => view! { {move || auth_page(ctx.page.get())} }.into_any(),
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_users_land_on_login() {
        assert_eq!(resolve_page(AuthStatus::Anonymous, Page::Sites), Page::Login);
        assert_eq!(
            resolve_page(AuthStatus::Anonymous, Page::ResetPassword),
            Page::ResetPassword
        );
    }

    #[test]
    fn signed_in_users_skip_auth_screens() {
        assert_eq!(resolve_page(AuthStatus::Authenticated, Page::Login), Page::EsgReport);
        assert_eq!(resolve_page(AuthStatus::Authenticated, Page::Sites), Page::Sites);
    }

    #[test]
    fn checking_keeps_the_requested_page() {
        assert_eq!(resolve_page(AuthStatus::Checking, Page::Onboarding), Page::Onboarding);
    }
}
