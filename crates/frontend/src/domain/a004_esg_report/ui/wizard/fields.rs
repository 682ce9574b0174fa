use contracts::domain::a004_esg_report::{format_optional, parse_date, parse_optional, EsgDraft};
use chrono::NaiveDate;
use leptos::prelude::*;
use std::str::FromStr;

use super::view_model::EsgWizardViewModel;

fn field_error(vm: EsgWizardViewModel, path: &'static str) -> impl IntoView {
    let error = vm.error_for(path);
    move || error.get().map(|e| view! { <div class="field-error">{e}</div> })
}

pub fn text_field(
    vm: EsgWizardViewModel,
    label: &'static str,
    path: &'static str,
    get: fn(&EsgDraft) -> String,
    set: fn(&mut EsgDraft, String),
) -> impl IntoView {
    let invalid = vm.error_for(path);
    view! {
        <div class="form-group" class:has-error=move || invalid.get().is_some()>
            <label for=path>{label}</label>
            <input
                type="text"
                id=path
                prop:value=move || vm.machine.with(|m| get(m.values()))
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    vm.edit(|d| set(d, value));
                }
            />
            {field_error(vm, path)}
        </div>
    }
}

/// Numeric inputs commit on `change` so partially typed decimals survive
pub fn number_field<T>(
    vm: EsgWizardViewModel,
    label: &'static str,
    path: &'static str,
    get: fn(&EsgDraft) -> Option<T>,
    set: fn(&mut EsgDraft, Option<T>),
) -> impl IntoView
where
    T: FromStr + ToString + Send + Sync + 'static,
{
    let invalid = vm.error_for(path);
    view! {
        <div class="form-group" class:has-error=move || invalid.get().is_some()>
            <label for=path>{label}</label>
            <input
                type="number"
                step="any"
                id=path
                prop:value=move || vm.machine.with(|m| format_optional(get(m.values())))
                on:change=move |ev| {
                    let value = parse_optional::<T>(&event_target_value(&ev));
                    vm.edit(|d| set(d, value));
                }
            />
            {field_error(vm, path)}
        </div>
    }
}

pub fn date_field(
    vm: EsgWizardViewModel,
    label: &'static str,
    path: &'static str,
    get: fn(&EsgDraft) -> Option<NaiveDate>,
    set: fn(&mut EsgDraft, Option<NaiveDate>),
) -> impl IntoView {
    let invalid = vm.error_for(path);
    view! {
        <div class="form-group" class:has-error=move || invalid.get().is_some()>
            <label for=path>{label}</label>
            <input
                type="date"
                id=path
                prop:value=move || {
                    vm.machine
                        .with(|m| get(m.values()).map(|d| d.format("%Y-%m-%d").to_string()))
                        .unwrap_or_default()
                }
                on:change=move |ev| {
                    let value = parse_date(&event_target_value(&ev));
                    vm.edit(|d| set(d, value));
                }
            />
            {field_error(vm, path)}
        </div>
    }
}

pub fn checkbox_field(
    vm: EsgWizardViewModel,
    label: &'static str,
    get: fn(&EsgDraft) -> bool,
    set: fn(&mut EsgDraft, bool),
) -> impl IntoView {
    view! {
        <div class="form-group form-check">
            <label>
                <input
                    type="checkbox"
                    prop:checked=move || vm.machine.with(|m| get(m.values()))
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        vm.edit(|d| set(d, checked));
                    }
                />
                {label}
            </label>
        </div>
    }
}
