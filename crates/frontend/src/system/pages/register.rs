use contracts::system::auth::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::layout::global_context::{use_global_context, Page};
use crate::shared::http::ErrorOutcome;
use crate::system::auth::context::use_auth;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Client-side checks run before the request is sent
pub fn check_registration(dto: &RegisterRequest, confirm: &str) -> Result<(), String> {
    if dto.full_name.trim().is_empty() {
        return Err("Enter your name".to_string());
    }
    if dto.company_name.trim().is_empty() {
        return Err("Enter your company name".to_string());
    }
    if !dto.email.contains('@') {
        return Err("Enter a valid email address".to_string());
    }
    if dto.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
    }
    if dto.password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let form = RwSignal::new(RegisterRequest::default());
    let (confirm, set_confirm) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let auth = use_auth();
    let ctx = use_global_context();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut dto = form.get_untracked();
        dto.email = dto.email.trim().to_string();
        if let Err(e) = check_registration(&dto, &confirm.get_untracked()) {
            set_error_message.set(Some(e));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);
        spawn_local(async move {
            if let Err(e) = auth.sign_up(dto).await {
                let message = match e.outcome() {
                    ErrorOutcome::FieldErrors { errors, message } => errors
                        .iter()
                        .next()
                        .and_then(|(_, messages)| messages.first().cloned())
                        .unwrap_or(message),
                    _ => e.to_string(),
                };
                set_error_message.set(Some(message));
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"ESG Reporting"</h1>
                <h2>"Create account"</h2>

                {move || error_message.get().map(|e| view! { <div class="error-message">{e}</div> })}

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="full-name">"Your name"</label>
                        <input type="text" id="full-name" required
                            prop:value=move || form.with(|f| f.full_name.clone())
                            on:input=move |ev| form.update(|f| f.full_name = event_target_value(&ev)) />
                    </div>
                    <div class="form-group">
                        <label for="company-name">"Company"</label>
                        <input type="text" id="company-name" required
                            prop:value=move || form.with(|f| f.company_name.clone())
                            on:input=move |ev| form.update(|f| f.company_name = event_target_value(&ev)) />
                    </div>
                    <div class="form-group">
                        <label for="email">"Email"</label>
                        <input type="email" id="email" required autocomplete="username"
                            prop:value=move || form.with(|f| f.email.clone())
                            on:input=move |ev| form.update(|f| f.email = event_target_value(&ev)) />
                    </div>
                    <div class="form-group">
                        <label for="password">"Password"</label>
                        <input type="password" id="password" required autocomplete="new-password"
                            prop:value=move || form.with(|f| f.password.clone())
                            on:input=move |ev| form.update(|f| f.password = event_target_value(&ev)) />
                    </div>
                    <div class="form-group">
                        <label for="confirm">"Confirm password"</label>
                        <input type="password" id="confirm" required autocomplete="new-password"
                            prop:value=move || confirm.get()
                            on:input=move |ev| set_confirm.set(event_target_value(&ev)) />
                    </div>
                    <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                        {move || if is_loading.get() { "Creating..." } else { "Create account" }}
                    </button>
                </form>

                <div class="login-info">
                    <a href=Page::Login.href() on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate(Page::Login);
                    }>"Already have an account? Sign in"</a>
                </div>
            </div>
        </div>
    }
}
