//! Transient notifications shown in the corner of the screen.

use contracts::domain::a004_esg_report::ValidationErrors;
#[cfg(target_arch = "wasm32")]
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::shared::http::{ApiError, ErrorOutcome};
use crate::shared::icons::icon;

#[cfg(target_arch = "wasm32")]
const AUTO_DISMISS_MS: u32 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    fn css_modifier(&self) -> &'static str {
        match self {
            ToastKind::Info => "toast--info",
            ToastKind::Success => "toast--success",
            ToastKind::Error => "toast--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct ToastService {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
    /// Set by the auth provider; invoked for permission-denied errors
    on_permission_denied: StoredValue<Option<Callback<()>>>,
}

impl ToastService {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
            on_permission_denied: StoredValue::new(None),
        }
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.toasts.update(|list| {
            list.push(Toast {
                id,
                kind,
                message: message.into(),
            })
        });

        #[cfg(target_arch = "wasm32")]
        {
            let this = *self;
            Timeout::new(AUTO_DISMISS_MS, move || this.dismiss(id)).forget();
        }
    }

    /// Messages currently on screen, oldest first
    pub fn messages(&self) -> Vec<(ToastKind, String)> {
        self.toasts
            .with_untracked(|list| list.iter().map(|t| (t.kind, t.message.clone())).collect())
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }

    pub fn set_permission_denied_handler(&self, handler: Callback<()>) {
        self.on_permission_denied.set_value(Some(handler));
    }

    /// Surfaces a failed call. Returns field errors for inline display when
    /// the server rejected the input.
    pub fn report(&self, err: &ApiError) -> Option<ValidationErrors> {
        log::warn!("API call failed: {}", err);
        match err.outcome() {
            ErrorOutcome::RedirectToAuth(message) => {
                self.error(message);
                if let Some(handler) = self.on_permission_denied.get_value() {
                    handler.run(());
                }
                None
            }
            ErrorOutcome::FieldErrors { message, errors } => {
                self.error(message);
                Some(errors)
            }
            ErrorOutcome::Toast(message) => {
                self.error(message);
                None
            }
            ErrorOutcome::Silent => None,
        }
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_toasts() -> ToastService {
    use_context::<ToastService>().expect("ToastService not found in component tree")
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let service = use_toasts();

    view! {
        <div class="toast-host" aria-live="polite">
            <For
                each=move || service.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=format!("toast {}", toast.kind.css_modifier())>
                            <span class="toast__message">{toast.message}</span>
                            <button class="button button--icon" on:click=move |_| service.dismiss(id)>
                                {icon("x")}
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
