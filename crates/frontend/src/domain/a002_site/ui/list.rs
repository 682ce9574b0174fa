use contracts::domain::a002_site::{CreateSiteDto, Site, SiteKind};
use contracts::domain::a004_esg_report::parse_optional;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a002_site::api;
use crate::shared::icons::icon;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::use_auth;

#[component]
#[allow(non_snake_case)]
pub fn SiteList() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let (items, set_items) = signal::<Vec<Site>>(Vec::new());
    let form = RwSignal::new(CreateSiteDto::default());
    let (form_error, set_form_error) = signal::<Option<String>>(None);

    let fetch = move || {
        let Some(company_id) = auth.company_id() else {
            set_items.set(Vec::new());
            return;
        };
        spawn_local(async move {
            match api::list_sites(&auth.client(), &company_id).await {
                Ok(v) => set_items.set(v),
                Err(e) => {
                    toasts.report(&e);
                }
            }
        });
    };

    let create = move || {
        let Some(company_id) = auth.company_id() else {
            return;
        };
        let dto = form.get_untracked();
        if let Err(e) = dto.validate() {
            set_form_error.set(Some(e));
            return;
        }
        set_form_error.set(None);
        spawn_local(async move {
            match api::create_site(&auth.client(), &company_id, &dto).await {
                Ok(site) => {
                    toasts.success(format!("Site \"{}\" added", site.name));
                    form.set(CreateSiteDto::default());
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
                    <h1 class="header__title">"Sites"</h1>
                </div>
                <div class="header__actions">
                    <button class="button button--secondary" on:click=move |_| fetch()>
                        {icon("refresh")}
                        "Refresh"
                    </button>
                </div>
            </div>

            <table class="table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Type"</th>
                        <th>"Location"</th>
                        <th>"Floor area, m2"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || items.get()
                        key=|s| s.id
                        children=|s: Site| {
                            let location = [s.city.clone(), s.country.clone()]
                                .into_iter()
                                .flatten()
                                .collect::<Vec<_>>()
                                .join(", ");
                            view! {
                                <tr>
                                    <td>{s.name}</td>
                                    <td>{s.kind.as_str()}</td>
                                    <td>{location}</td>
                                    <td>{s.floor_area_m2.map(|a| format!("{:.0}", a)).unwrap_or_default()}</td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <Show when=move || auth.role().can_edit_esg_data()>
                <div class="details-form">
                    <h3>"Add site"</h3>
                    {move || form_error.get().map(|e| view! { <div class="error">{e}</div> })}
                    <div class="form-group">
                        <label for="site-name">"Name"</label>
                        <input id="site-name" type="text"
                            prop:value=move || form.with(|f| f.name.clone())
                            on:input=move |ev| form.update(|f| f.name = event_target_value(&ev)) />
                    </div>
                    <div class="form-group">
                        <label for="site-kind">"Type"</label>
                        <select id="site-kind"
                            prop:value=move || form.with(|f| f.kind.as_str())
                            on:change=move |ev| form.update(|f| f.kind = SiteKind::from_str(&event_target_value(&ev)))>
                            {SiteKind::all()
                                .into_iter()
                                .map(|k| view! { <option value=k.as_str()>{k.as_str()}</option> })
                                .collect_view()}
                        </select>
                    </div>
                    <div class="form-group">
                        <label for="site-city">"City"</label>
                        <input id="site-city" type="text"
                            prop:value=move || form.with(|f| f.city.clone().unwrap_or_default())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.city = if value.is_empty() { None } else { Some(value) });
                            } />
                    </div>
                    <div class="form-group">
                        <label for="site-country">"Country"</label>
                        <input id="site-country" type="text" maxlength="2"
                            prop:value=move || form.with(|f| f.country.clone().unwrap_or_default())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.country = if value.is_empty() { None } else { Some(value) });
                            } />
                    </div>
                    <div class="form-group">
                        <label for="site-area">"Floor area, m2"</label>
                        <input id="site-area" type="number" step="any"
                            prop:value=move || form.with(|f| f.floor_area_m2.map(|a| a.to_string()).unwrap_or_default())
                            on:change=move |ev| {
                                let value = parse_optional::<f64>(&event_target_value(&ev));
                                form.update(|f| f.floor_area_m2 = value);
                            } />
                    </div>
                    <button class="button button--primary" on:click=move |_| create()>
                        {icon("plus")}
                        "Add"
                    </button>
                </div>
            </Show>
        </div>
    }
}
