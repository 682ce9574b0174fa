use contracts::domain::a001_company::{FoundationalData, UpdateCompanyDto};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_company::api;
use crate::shared::icons::icon;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::use_auth;

/// Company profile and foundational data; owners and admins only
#[component]
#[allow(non_snake_case)]
pub fn CompanySettings() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let (name, set_name) = signal(
        auth.state
            .with_untracked(|s| s.company().map(|c| c.name.clone()))
            .unwrap_or_default(),
    );
    let foundational = RwSignal::new(FoundationalData::default());
    let (form_error, set_form_error) = signal::<Option<String>>(None);

    let rename = move || {
        let Some(company_id) = auth.company_id() else {
            return;
        };
        let dto = UpdateCompanyDto {
            name: Some(name.get_untracked().trim().to_string()),
            ..Default::default()
        };
        spawn_local(async move {
            match api::update_company(&auth.client(), &company_id, &dto).await {
                Ok(_) => toasts.success("Company updated"),
                Err(e) => {
                    toasts.report(&e);
                }
            }
        });
    };

    let save_foundational = move || {
        let Some(company_id) = auth.company_id() else {
            return;
        };
        let data = foundational.get_untracked();
        if let Err(e) = data.validate() {
            set_form_error.set(Some(e));
            return;
        }
        set_form_error.set(None);
        spawn_local(async move {
            match api::save_foundational(&auth.client(), &company_id, &data).await {
                Ok(()) => toasts.success("Foundational data saved"),
                Err(e) => {
                    if let Some(errors) = toasts.report(&e) {
                        let summary = errors
                            .iter()
                            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
                            .collect::<Vec<_>>()
                            .join("; ");
                        set_form_error.set(Some(summary));
                    }
                }
            }
        });
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"Company settings"</h1>
                </div>
            </div>

            <div class="details-form">
                <div class="form-group">
                    <label for="settings-name">"Display name"</label>
                    <input id="settings-name" type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev)) />
                </div>
                <button class="button button--primary" on:click=move |_| rename()>
                    {icon("save")}
                    "Save name"
                </button>
            </div>

            <div class="details-form">
                <h3>"Foundational data"</h3>
                {move || form_error.get().map(|e| view! { <div class="error">{e}</div> })}
                <div class="form-group">
                    <label for="legal-name">"Legal name"</label>
                    <input id="legal-name" type="text"
                        prop:value=move || foundational.with(|f| f.legal_name.clone())
                        on:input=move |ev| foundational.update(|f| f.legal_name = event_target_value(&ev)) />
                </div>
                <div class="form-group">
                    <label for="registration-number">"Registration number"</label>
                    <input id="registration-number" type="text"
                        prop:value=move || foundational.with(|f| f.registration_number.clone().unwrap_or_default())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            foundational.update(|f| {
                                f.registration_number = if value.is_empty() { None } else { Some(value) };
                            });
                        } />
                </div>
                <div class="form-group">
                    <label for="hq-country">"Headquarters country"</label>
                    <input id="hq-country" type="text" maxlength="2"
                        prop:value=move || foundational.with(|f| f.headquarters_country.clone().unwrap_or_default())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            foundational.update(|f| {
                                f.headquarters_country = if value.is_empty() { None } else { Some(value) };
                            });
                        } />
                </div>
                <div class="form-group">
                    <label for="fy-end">"Fiscal year end month"</label>
                    <input id="fy-end" type="number" min="1" max="12"
                        prop:value=move || foundational.with(|f| f.fiscal_year_end_month.map(|m| m.to_string()).unwrap_or_default())
                        on:change=move |ev| {
                            let value = event_target_value(&ev).trim().parse::<u8>().ok();
                            foundational.update(|f| f.fiscal_year_end_month = value);
                        } />
                </div>
                <div class="form-group form-check">
                    <label>
                        <input type="checkbox"
                            prop:checked=move || foundational.with(|f| f.listed)
                            on:change=move |ev| foundational.update(|f| f.listed = event_target_checked(&ev)) />
                        "Publicly listed"
                    </label>
                </div>
                <button class="button button--primary" on:click=move |_| save_foundational()>
                    {icon("save")}
                    "Save foundational data"
                </button>
            </div>
        </div>
    }
}
