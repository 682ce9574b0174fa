use contracts::domain::a001_company::{Company, CreateCompanyDto};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_company::api;
use crate::shared::icons::icon;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::use_auth;

fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
#[allow(non_snake_case)]
pub fn CompanyList() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let (items, set_items) = signal::<Vec<Company>>(Vec::new());
    let (loading, set_loading) = signal(false);
    let (name, set_name) = signal(String::new());
    let (country, set_country) = signal(String::new());
    let (industry, set_industry) = signal(String::new());

    let fetch = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api::list_companies(&auth.client()).await {
                Ok(v) => set_items.set(v),
                Err(e) => {
                    toasts.report(&e);
                }
            }
            set_loading.set(false);
        });
    };

    let create = move || {
        let dto = CreateCompanyDto {
            name: name.get_untracked().trim().to_string(),
            country: blank_to_none(country.get_untracked()),
            industry: blank_to_none(industry.get_untracked()),
        };
        if dto.name.is_empty() {
            toasts.error("Company name is required");
            return;
        }
        spawn_local(async move {
            match api::create_company(&auth.client(), &dto).await {
                Ok(company) => {
                    toasts.success(format!("Company \"{}\" created", company.name));
                    set_name.set(String::new());
                    set_country.set(String::new());
                    set_industry.set(String::new());
                    fetch();
                }
                Err(e) => {
                    toasts.report(&e);
                }
            }
        });
    };

    fetch();

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"Companies"</h1>
                </div>
                <div class="header__actions">
                    <button class="button button--secondary" on:click=move |_| fetch() disabled=move || loading.get()>
                        {icon("refresh")}
                        "Refresh"
                    </button>
                </div>
            </div>

            <table class="table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Country"</th>
                        <th>"Industry"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || items.get()
                        key=|c| c.id
                        children=|c: Company| view! {
                            <tr>
                                <td>{c.name}</td>
                                <td>{c.country.unwrap_or_else(|| "-".to_string())}</td>
                                <td>{c.industry.unwrap_or_else(|| "-".to_string())}</td>
                            </tr>
                        }
                    />
                </tbody>
            </table>

            <Show when=move || auth.role().can_manage_company()>
                <div class="details-form">
                    <h3>"New company"</h3>
                    <div class="form-group">
                        <label for="company-name">"Name"</label>
                        <input id="company-name" type="text"
                            prop:value=move || name.get()
                            on:input=move |ev| set_name.set(event_target_value(&ev)) />
                    </div>
                    <div class="form-group">
                        <label for="company-country">"Country"</label>
                        <input id="company-country" type="text" maxlength="2"
                            prop:value=move || country.get()
                            on:input=move |ev| set_country.set(event_target_value(&ev)) />
                    </div>
                    <div class="form-group">
                        <label for="company-industry">"Industry"</label>
                        <input id="company-industry" type="text"
                            prop:value=move || industry.get()
                            on:input=move |ev| set_industry.set(event_target_value(&ev)) />
                    </div>
                    <button class="button button--primary" on:click=move |_| create()>
                        {icon("plus")}
                        "Create"
                    </button>
                </div>
            </Show>
        </div>
    }
}
