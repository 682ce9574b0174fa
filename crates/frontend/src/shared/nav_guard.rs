//! Unsaved-changes guard for forms.
//!
//! While a form is dirty, clicks on in-app links ask for confirmation and
//! closing or reloading the tab triggers the browser prompt. Links carrying
//! [`BYPASS_ATTRIBUTE`] are never intercepted. The owner of the form keeps
//! the returned [`NavGuard`] and removes it when the form goes away.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{BeforeUnloadEvent, Element, MouseEvent};

pub const BYPASS_ATTRIBUTE: &str = "data-skip-unsaved-guard";
pub const LEAVE_PROMPT: &str = "You have unsaved changes. Leave this page anyway?";

/// What the guard needs to know about a clicked link
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkClick {
    pub href: String,
    pub target: Option<String>,
    pub download: bool,
    pub bypass: bool,
    /// ctrl/meta/shift/alt or a non-primary button
    pub modified: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Confirm,
}

pub fn decide(dirty: bool, link: &LinkClick) -> GuardDecision {
    if !dirty || link.bypass || link.download || link.modified {
        return GuardDecision::Allow;
    }
    if matches!(link.target.as_deref(), Some(t) if !t.is_empty() && t != "_self") {
        return GuardDecision::Allow;
    }
    let href = link.href.trim();
    if href.is_empty() || href.starts_with('#') {
        return GuardDecision::Allow;
    }
    if href.starts_with("mailto:") || href.starts_with("tel:") || href.starts_with("javascript:") {
        return GuardDecision::Allow;
    }
    GuardDecision::Confirm
}

/// Runs the decision; `confirm` is only asked when needed.
/// Returns `true` when navigation may proceed.
pub fn resolve(decision: GuardDecision, confirm: impl FnOnce(&str) -> bool) -> bool {
    match decision {
        GuardDecision::Allow => true,
        GuardDecision::Confirm => confirm(LEAVE_PROMPT),
    }
}

fn link_click(anchor: &Element, event: &MouseEvent) -> LinkClick {
    LinkClick {
        href: anchor.get_attribute("href").unwrap_or_default(),
        target: anchor.get_attribute("target"),
        download: anchor.has_attribute("download"),
        bypass: anchor.has_attribute(BYPASS_ATTRIBUTE),
        modified: event.ctrl_key()
            || event.meta_key()
            || event.shift_key()
            || event.alt_key()
            || event.button() != 0,
    }
}

fn browser_confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(true)
}

/// The installed listeners; [`NavGuard::remove`] detaches them.
pub struct NavGuard {
    on_click: Closure<dyn FnMut(MouseEvent)>,
    on_before_unload: Closure<dyn FnMut(BeforeUnloadEvent)>,
}

impl NavGuard {
    pub fn remove(self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(document) = window.document() {
            let _ = document.remove_event_listener_with_callback_and_bool(
                "click",
                self.on_click.as_ref().unchecked_ref(),
                true,
            );
        }
        let _ = window.remove_event_listener_with_callback(
            "beforeunload",
            self.on_before_unload.as_ref().unchecked_ref(),
        );
    }
}

/// Installs the document click and window `beforeunload` listeners.
///
/// `on_leave` runs when the tab is about to unload, before the prompt, so
/// pending work can be written out. Returns `None` outside a browser.
pub fn install(dirty: Signal<bool>, on_leave: impl Fn() + 'static) -> Option<NavGuard> {
    let window = web_sys::window()?;
    let document = window.document()?;
    let is_dirty = move || dirty.try_get_untracked().unwrap_or(false);

    let on_click = Closure::wrap(Box::new(move |event: MouseEvent| {
        let anchor = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("a[href]").ok().flatten());
        let Some(anchor) = anchor else {
            return;
        };
        let decision = decide(is_dirty(), &link_click(&anchor, &event));
        if !resolve(decision, browser_confirm) {
            event.prevent_default();
            event.stop_immediate_propagation();
        }
    }) as Box<dyn FnMut(_)>);

    let on_before_unload = Closure::wrap(Box::new(move |event: BeforeUnloadEvent| {
        on_leave();
        if is_dirty() {
            event.prevent_default();
            event.set_return_value(LEAVE_PROMPT);
        }
    }) as Box<dyn FnMut(_)>);

    // capture phase so declined clicks never reach the link's own handler
    let _ = document.add_event_listener_with_callback_and_bool(
        "click",
        on_click.as_ref().unchecked_ref(),
        true,
    );
    let _ = window
        .add_event_listener_with_callback("beforeunload", on_before_unload.as_ref().unchecked_ref());
    Some(NavGuard {
        on_click,
        on_before_unload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn link(href: &str) -> LinkClick {
        LinkClick {
            href: href.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn clean_form_never_prompts() {
        assert_eq!(decide(false, &link("/companies")), GuardDecision::Allow);
    }

    #[test]
    fn dirty_form_prompts_for_in_app_links() {
        assert_eq!(decide(true, &link("/companies")), GuardDecision::Confirm);
        assert_eq!(decide(true, &link("?page=sites")), GuardDecision::Confirm);
    }

    #[test]
    fn declining_the_prompt_blocks_navigation() {
        let asked = Cell::new(0);
        let proceed = resolve(decide(true, &link("/companies")), |message| {
            assert_eq!(message, LEAVE_PROMPT);
            asked.set(asked.get() + 1);
            false
        });
        assert!(!proceed);
        assert_eq!(asked.get(), 1);

        assert!(resolve(decide(true, &link("/companies")), |_| true));
    }

    #[test]
    fn bypass_attribute_never_prompts() {
        let bypass = LinkClick {
            bypass: true,
            ..link("/companies")
        };
        let proceed = resolve(decide(true, &bypass), |_| panic!("must not prompt"));
        assert!(proceed);
    }

    #[test]
    fn links_that_do_not_leave_the_page_are_ignored() {
        assert_eq!(decide(true, &link("#governance")), GuardDecision::Allow);
        assert_eq!(decide(true, &link("mailto:esg@example.com")), GuardDecision::Allow);
        let new_tab = LinkClick {
            target: Some("_blank".into()),
            ..link("/report.pdf")
        };
        assert_eq!(decide(true, &new_tab), GuardDecision::Allow);
        let ctrl_click = LinkClick {
            modified: true,
            ..link("/companies")
        };
        assert_eq!(decide(true, &ctrl_click), GuardDecision::Allow);
    }
}
