use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::layout::global_context::{use_global_context, Page};
use crate::system::auth::context::use_auth;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let (email, set_email) = signal(String::new());
    let (sent, set_sent) = signal(false);
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let auth = use_auth();
    let ctx = use_global_context();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let email_val = email.get_untracked();
        set_is_loading.set(true);
        set_error_message.set(None);
        spawn_local(async move {
            match auth.forgot_password(email_val).await {
                Ok(()) => set_sent.set(true),
                Err(e) => set_error_message.set(Some(e.to_string())),
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"ESG Reporting"</h1>
                <h2>"Forgot password"</h2>

                {move || error_message.get().map(|e| view! { <div class="error-message">{e}</div> })}

                <Show
                    when=move || !sent.get()
                    fallback=|| view! {
                        <p class="login-info">"If that address has an account, a reset link is on its way."</p>
                    }
                >
                    <form on:submit=on_submit>
                        <div class="form-group">
                            <label for="email">"Email"</label>
                            <input type="email" id="email" required
                                prop:value=move || email.get()
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                disabled=move || is_loading.get() />
                        </div>
                        <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                            "Send reset link"
                        </button>
                    </form>
                </Show>

                <div class="login-info">
                    <a href=Page::Login.href() on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate(Page::Login);
                    }>"Back to sign in"</a>
                </div>
            </div>
        </div>
    }
}
