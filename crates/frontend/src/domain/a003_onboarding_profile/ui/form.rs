use contracts::domain::a003_onboarding_profile::OnboardingProfile;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a003_onboarding_profile::api;
use crate::shared::icons::icon;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::use_auth;

const EMPLOYEE_BANDS: [&str; 4] = ["1-49", "50-249", "250-999", "1000+"];
const REVENUE_BANDS: [&str; 4] = ["<10M", "10M-50M", "50M-250M", "250M+"];

fn option_select(
    id: &'static str,
    options: &'static [&'static str],
    get: fn(&OnboardingProfile) -> Option<String>,
    set: fn(&mut OnboardingProfile, Option<String>),
    profile: RwSignal<OnboardingProfile>,
) -> impl IntoView {
    view! {
        <select id=id
            prop:value=move || profile.with(|p| get(p).unwrap_or_default())
            on:change=move |ev| {
                let value = event_target_value(&ev);
                profile.update(|p| set(p, if value.is_empty() { None } else { Some(value) }));
            }>
            <option value="">"-"</option>
            {options.iter().map(|o| view! { <option value=*o>{*o}</option> }).collect_view()}
        </select>
    }
}

/// Loads the profile once; a company without one starts from an empty form
#[component]
#[allow(non_snake_case)]
pub fn OnboardingProfileForm() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let profile = RwSignal::new(OnboardingProfile::default());
    let (loaded, set_loaded) = signal(false);

    if let Some(company_id) = auth.company_id() {
        spawn_local(async move {
            match api::fetch_onboarding_profile(&auth.client(), &company_id).await {
                Ok(Some(p)) => profile.set(p),
                Ok(None) => log::debug!("No onboarding profile yet"),
                Err(e) => {
                    toasts.report(&e);
                }
            }
            set_loaded.set(true);
        });
    }

    let toggle_framework = move |framework: &'static str, on: bool| {
        profile.update(|p| {
            p.reporting_frameworks.retain(|f| f != framework);
            if on {
                p.reporting_frameworks.push(framework.to_string());
            }
        });
    };

    let save = move || {
        let Some(company_id) = auth.company_id() else {
            return;
        };
        let draft = profile.get_untracked();
        spawn_local(async move {
            match api::save_onboarding_profile(&auth.client(), &company_id, &draft).await {
                Ok(saved) => {
                    profile.set(saved);
                    toasts.success("Onboarding profile saved");
                }
                Err(e) => {
                    toasts.report(&e);
                }
            }
        });
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"Onboarding profile"</h1>
                </div>
            </div>

            <Show when=move || loaded.get() fallback=|| view! { <div class="loading">"Loading..."</div> }>
                <div class="details-form">
                    <div class="form-group">
                        <label>"Reporting frameworks"</label>
                        {OnboardingProfile::FRAMEWORKS
                            .into_iter()
                            .map(|framework| view! {
                                <label class="form-check">
                                    <input type="checkbox"
                                        prop:checked=move || profile.with(|p| p.reporting_frameworks.iter().any(|f| f == framework))
                                        on:change=move |ev| toggle_framework(framework, event_target_checked(&ev)) />
                                    {framework}
                                </label>
                            })
                            .collect_view()}
                    </div>
                    <div class="form-group">
                        <label for="employee-band">"Employees"</label>
                        {option_select("employee-band", &EMPLOYEE_BANDS,
                            |p| p.employee_band.clone(), |p, v| p.employee_band = v, profile)}
                    </div>
                    <div class="form-group">
                        <label for="revenue-band">"Annual revenue"</label>
                        {option_select("revenue-band", &REVENUE_BANDS,
                            |p| p.revenue_band.clone(), |p, v| p.revenue_band = v, profile)}
                    </div>
                    <div class="form-group">
                        <label for="primary-goal">"Primary goal"</label>
                        <input id="primary-goal" type="text"
                            prop:value=move || profile.with(|p| p.primary_goal.clone().unwrap_or_default())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                profile.update(|p| p.primary_goal = if value.is_empty() { None } else { Some(value) });
                            } />
                    </div>
                    <div class="form-group form-check">
                        <label>
                            <input type="checkbox"
                                prop:checked=move || profile.with(|p| p.completed)
                                on:change=move |ev| profile.update(|p| p.completed = event_target_checked(&ev)) />
                            "Onboarding complete"
                        </label>
                    </div>
                    <button class="button button--primary" on:click=move |_| save()>
                        {icon("save")}
                        "Save"
                    </button>
                </div>
            </Show>
        </div>
    }
}
