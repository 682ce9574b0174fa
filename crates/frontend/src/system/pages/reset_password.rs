use leptos::prelude::*;
use leptos::task::spawn_local;

use super::register::MIN_PASSWORD_LEN;
use crate::layout::global_context::{use_global_context, Page};
use crate::shared::toast::use_toasts;
use crate::system::auth::context::use_auth;

/// Landing page of the emailed reset link (`?page=reset-password&token=...`)
#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let auth = use_auth();
    let ctx = use_global_context();
    let toasts = use_toasts();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(token) = ctx.reset_token.get_untracked() else {
            set_error_message.set(Some("This reset link is invalid or incomplete".to_string()));
            return;
        };
        let password_val = password.get_untracked();
        if password_val.chars().count() < MIN_PASSWORD_LEN {
            set_error_message.set(Some(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
            return;
        }
        if password_val != confirm.get_untracked() {
            set_error_message.set(Some("Passwords do not match".to_string()));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);
        spawn_local(async move {
            match auth.reset_password(token, password_val).await {
                Ok(()) => {
                    ctx.reset_token.set(None);
                    toasts.success("Password updated. Please sign in.");
                    ctx.navigate(Page::Login);
                }
                Err(e) => set_error_message.set(Some(e.to_string())),
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"ESG Reporting"</h1>
                <h2>"Choose a new password"</h2>

                {move || error_message.get().map(|e| view! { <div class="error-message">{e}</div> })}

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="password">"New password"</label>
                        <input type="password" id="password" required autocomplete="new-password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev)) />
                    </div>
                    <div class="form-group">
                        <label for="confirm">"Confirm password"</label>
                        <input type="password" id="confirm" required autocomplete="new-password"
                            prop:value=move || confirm.get()
                            on:input=move |ev| set_confirm.set(event_target_value(&ev)) />
                    </div>
                    <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                        "Update password"
                    </button>
                </form>
            </div>
        </div>
    }
}
