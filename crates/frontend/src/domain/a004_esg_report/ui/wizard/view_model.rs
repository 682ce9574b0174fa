use contracts::domain::a004_esg_report::{EsgDraft, EsgReport};
use futures::future::LocalBoxFuture;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::machine::{SubmissionState, SubmitRejected, WizardMachine, WizardStep};
use crate::shared::draft_store::{user_draft_key, DraftStore};
use crate::shared::http::ApiError;
use crate::shared::nav_guard::{self, NavGuard};
use crate::shared::storage::{BrowserStorage, KeyValueStorage};
use crate::shared::toast::ToastService;

/// Versioned so an incompatible draft shape can move to a new key.
/// Signed-in users get their own key derived from it.
pub const DRAFT_KEY: &str = "esg-wizard-draft:v1";

/// Receives the validated aggregate; the wizard waits for it to finish
pub type SubmitHandler = Rc<dyn Fn(EsgReport) -> LocalBoxFuture<'static, Result<(), ApiError>>>;

/// Browser listeners owned by a mounted wizard
#[derive(Default)]
struct Listeners {
    cross_tab: Option<Closure<dyn FnMut(web_sys::StorageEvent)>>,
    nav_guard: Option<NavGuard>,
}

/// ViewModel for the ESG data-entry wizard
///
/// - machine: step pointer, values, submission state, field errors
/// - drafts: debounced persistence plus cross-tab merge
/// - listeners: attached on mount, removed by [`Self::teardown`]
#[derive(Clone, Copy)]
pub struct EsgWizardViewModel {
    pub machine: RwSignal<WizardMachine>,
    pub last_saved: RwSignal<Option<String>>,
    drafts: StoredValue<Rc<DraftStore<EsgDraft>>, LocalStorage>,
    save_timer: StoredValue<Option<Timeout>, LocalStorage>,
    listeners: StoredValue<Listeners, LocalStorage>,
    toasts: ToastService,
}

impl EsgWizardViewModel {
    /// Wizard backed by `localStorage`, with the draft kept under `user_id`
    pub fn new(toasts: ToastService, user_id: Option<&str>) -> Self {
        let key = match user_id {
            Some(id) => user_draft_key(DRAFT_KEY, id),
            None => DRAFT_KEY.to_string(),
        };
        Self::with_storage(toasts, key, Rc::new(BrowserStorage))
    }

    pub fn with_storage(toasts: ToastService, key: String, storage: Rc<dyn KeyValueStorage>) -> Self {
        let drafts = Rc::new(DraftStore::new(key, storage));
        let restored = drafts.hydrate();
        if restored.is_some() {
            log::info!("Restored ESG draft from {}", drafts.key());
        }

        Self {
            machine: RwSignal::new(WizardMachine::new(restored.unwrap_or_default())),
            last_saved: RwSignal::new(None),
            drafts: StoredValue::new_local(drafts),
            save_timer: StoredValue::new_local(None),
            listeners: StoredValue::new_local(Listeners::default()),
            toasts,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.machine.with(|m| m.step())
    }

    pub fn is_submitting(&self) -> bool {
        self.machine
            .with(|m| m.submission() == SubmissionState::Submitting)
    }

    pub fn is_dirty(&self) -> Signal<bool> {
        let machine = self.machine;
        Signal::derive(move || machine.with(|m| m.is_dirty()))
    }

    /// Message for a field, if the last submit rejected it
    pub fn error_for(&self, path: &'static str) -> Signal<Option<String>> {
        let machine = self.machine;
        Signal::derive(move || machine.with(|m| m.errors().first_for(path).map(str::to_string)))
    }

    pub fn next(&self) {
        self.machine.update(|m| m.next());
    }

    pub fn back(&self) {
        self.machine.update(|m| m.back());
    }

    pub fn go_to(&self, step: WizardStep) {
        self.machine.update(|m| m.go_to(step));
    }

    /// Applies an edit and (re)arms the debounced draft write
    pub fn edit(&self, edit: impl FnOnce(&mut EsgDraft)) {
        self.machine.update(|m| m.update(edit));
        let values = self.machine.with_untracked(|m| m.values().clone());
        self.drafts.with_value(|d| d.stage(&values));

        // without browser timers the staged draft waits for flush_draft
        #[cfg(target_arch = "wasm32")]
        self.schedule_autosave();
    }

    #[cfg(target_arch = "wasm32")]
    fn schedule_autosave(&self) {
        use crate::shared::draft_store::DRAFT_DEBOUNCE_MS;

        let this = *self;
        // dropping the previous timeout cancels it
        let timer = Timeout::new(DRAFT_DEBOUNCE_MS, move || this.flush_draft());
        self.save_timer.set_value(Some(timer));
    }

    /// Writes the staged draft now, if there is one
    pub fn flush_draft(&self) {
        let flushed = self.drafts.try_with_value(|d| d.flush());
        match flushed {
            Some(Ok(true)) => {
                let _ = self.last_saved.try_set(Some(saved_at()));
            }
            Some(Ok(false)) | None => {}
            Some(Err(e)) => log::warn!("Draft autosave failed: {}", e),
        }
    }

    /// "Save draft" button: immediate write, pending autosave cancelled
    pub fn save_draft_now(&self) {
        self.save_timer.set_value(None);
        let values = self.machine.with_untracked(|m| m.values().clone());
        match self.drafts.with_value(|d| d.save_now(&values)) {
            Ok(()) => {
                self.last_saved.set(Some(saved_at()));
                self.toasts.success("Draft saved");
            }
            Err(e) => self.toasts.error(format!("Could not save draft: {}", e)),
        }
    }

    /// A `storage` event. Returns whether it replaced the live values.
    pub fn merge_external(&self, key: Option<&str>, value: Option<&str>) -> bool {
        let merged = self
            .drafts
            .try_with_value(|d| d.apply_external_change(key, value))
            .flatten();
        match merged {
            Some(draft) => {
                log::debug!("Merging ESG draft from another tab");
                self.machine.try_update(|m| m.replace_values(draft)).is_some()
            }
            None => false,
        }
    }

    /// Installs the cross-tab merge and the unsaved-changes guard. The guard
    /// writes the staged draft when the tab unloads.
    pub fn attach(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let this = *self;
        let cross_tab = Closure::wrap(Box::new(move |event: web_sys::StorageEvent| {
            this.merge_external(event.key().as_deref(), event.new_value().as_deref());
        }) as Box<dyn FnMut(_)>);
        let _ = window.add_event_listener_with_callback("storage", cross_tab.as_ref().unchecked_ref());

        let guard = nav_guard::install(self.is_dirty(), move || this.flush_draft());
        self.listeners.set_value(Listeners {
            cross_tab: Some(cross_tab),
            nav_guard: guard,
        });
    }

    /// Unmount: cancels the timer, writes or drops the staged draft and
    /// removes the listeners. `keep_draft` is false once the session ended.
    pub fn teardown(&self, keep_draft: bool) {
        let _ = self.save_timer.try_update_value(|t| t.take());
        if keep_draft {
            self.flush_draft();
        } else {
            let _ = self.drafts.try_with_value(|d| d.drop_pending());
        }

        let Some(listeners) = self.listeners.try_update_value(std::mem::take) else {
            return;
        };
        if let Some(guard) = listeners.nav_guard {
            guard.remove();
        }
        if let Some(closure) = listeners.cross_tab {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .remove_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
            }
        }
    }

    /// Runs [`Self::teardown`] when the current owner is cleaned up
    pub fn bind_lifetime(&self, keep_draft: impl Fn() -> bool + Send + Sync + 'static) {
        let this = *self;
        on_cleanup(move || this.teardown(keep_draft()));
    }

    /// Validates and hands the aggregate to `handler`
    pub fn submit(&self, handler: SubmitHandler) {
        if let Some(report) = self.begin_submit() {
            spawn_local(self.complete_submit(handler, report));
        }
    }

    /// Validation half of [`Self::submit`]; `Some` means the form is now submitting
    pub fn begin_submit(&self) -> Option<EsgReport> {
        let mut outcome = None;
        self.machine.update(|m| outcome = Some(m.begin_submit()));
        match outcome? {
            Ok(report) => Some(report),
            Err(SubmitRejected::NotAllowed) => {
                log::debug!("Submit ignored: not on the last step or already submitting");
                None
            }
            Err(SubmitRejected::Invalid(errors)) => {
                self.toasts
                    .error(format!("Please fix {} field(s) before submitting", errors.len()));
                None
            }
        }
    }

    pub async fn complete_submit(self, handler: SubmitHandler, report: EsgReport) {
        match handler(report).await {
            Ok(()) => {
                self.machine.update(|m| m.finish_submit());
                let _ = self.save_timer.try_update_value(|t| t.take());
                if let Some(Err(e)) = self.drafts.try_with_value(|d| d.discard()) {
                    log::warn!("Failed to discard submitted draft: {}", e);
                }
                self.last_saved.set(None);
                self.toasts.success("ESG data submitted");
            }
            Err(err) => {
                let field_errors = self.toasts.report(&err);
                self.machine.update(|m| m.fail_submit(field_errors));
            }
        }
    }
}

fn saved_at() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::HttpResponse;
    use crate::shared::storage::MemoryStorage;
    use crate::shared::toast::ToastKind;
    use chrono::NaiveDate;
    use futures::executor::block_on;
    use futures::FutureExt;

    const KEY: &str = "esg-wizard-draft:v1:u1";

    fn wizard(storage: &MemoryStorage) -> EsgWizardViewModel {
        EsgWizardViewModel::with_storage(ToastService::new(), KEY.to_string(), Rc::new(storage.clone()))
    }

    fn fill_valid(vm: &EsgWizardViewModel) {
        vm.edit(|d| {
            d.general.company_name = "Acme".into();
            d.general.reporting_year = Some(2024);
            d.general.period_start = NaiveDate::from_ymd_opt(2024, 1, 1);
            d.general.period_end = NaiveDate::from_ymd_opt(2024, 12, 31);
            d.environment.scope1_tco2e = Some(1.0);
            d.environment.scope2_tco2e = Some(2.0);
            d.social.employees_total = Some(10);
            d.governance.board_size = Some(3);
        });
    }

    fn stored(storage: &MemoryStorage) -> Option<EsgDraft> {
        storage.get(KEY).and_then(|raw| serde_json::from_str(&raw).ok())
    }

    fn accept() -> SubmitHandler {
        Rc::new(|_report| async { Ok(()) }.boxed_local())
    }

    fn reject(status: u16, body: &'static str) -> SubmitHandler {
        Rc::new(move |_report| {
            async move { Err(ApiError::from_response(&HttpResponse::new(status, body))) }.boxed_local()
        })
    }

    #[test]
    fn staged_edits_are_written_when_the_wizard_unmounts() {
        let owner = Owner::new();
        owner.set();
        let storage = MemoryStorage::new();
        let vm = wizard(&storage);

        let mounted = owner.child();
        mounted.with(|| vm.bind_lifetime(|| true));
        vm.edit(|d| d.general.company_name = "Acme".into());
        assert_eq!(stored(&storage), None);

        mounted.cleanup();
        assert_eq!(stored(&storage).unwrap().general.company_name, "Acme");
        assert!(vm.last_saved.get_untracked().is_some());
    }

    #[test]
    fn ended_session_drops_staged_edits_on_unmount() {
        let owner = Owner::new();
        owner.set();
        let storage = MemoryStorage::new();
        let vm = wizard(&storage);

        vm.edit(|d| d.general.company_name = "Acme".into());
        vm.teardown(false);
        vm.flush_draft();
        assert_eq!(storage.get(KEY), None);
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn restored_draft_is_dirty() {
        let owner = Owner::new();
        owner.set();
        let storage = MemoryStorage::new();
        storage
            .set(KEY, r#"{"general":{"companyName":"Acme"}}"#)
            .unwrap();

        let vm = wizard(&storage);
        assert_eq!(vm.machine.with_untracked(|m| m.values().general.company_name.clone()), "Acme");
        assert!(vm.is_dirty().get_untracked());
    }

    #[test]
    fn draft_from_another_tab_replaces_the_values() {
        let owner = Owner::new();
        owner.set();
        let storage = MemoryStorage::new();
        let vm = wizard(&storage);
        vm.edit(|d| d.general.company_name = "Local".into());

        let mut other = EsgDraft::default();
        other.general.company_name = "From tab B".into();
        other.social.employees_total = Some(42);
        let json = serde_json::to_string(&other).unwrap();

        assert!(!vm.merge_external(Some("esg-wizard-draft:v1:u2"), Some(&json)));
        assert!(vm.merge_external(Some(KEY), Some(&json)));
        assert_eq!(vm.machine.with_untracked(|m| m.values().clone()), other);

        // the merged value wins over the local edit that was still staged
        vm.flush_draft();
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn successful_submit_discards_the_draft_and_cleans_the_form() {
        let owner = Owner::new();
        owner.set();
        let storage = MemoryStorage::new();
        let vm = wizard(&storage);
        fill_valid(&vm);
        vm.save_draft_now();
        assert!(stored(&storage).is_some());

        vm.go_to(WizardStep::Governance);
        let report = vm.begin_submit().unwrap();
        assert!(vm.is_submitting());
        assert_eq!(vm.begin_submit(), None);

        block_on(vm.complete_submit(accept(), report));
        assert!(!vm.is_submitting());
        assert!(!vm.is_dirty().get_untracked());
        assert_eq!(storage.get(KEY), None);
        assert_eq!(vm.last_saved.get_untracked(), None);
        assert_eq!(
            vm.toasts.messages().last(),
            Some(&(ToastKind::Success, "ESG data submitted".to_string()))
        );
    }

    #[test]
    fn rejected_submit_keeps_the_draft_and_shows_field_errors() {
        let owner = Owner::new();
        owner.set();
        let storage = MemoryStorage::new();
        let vm = wizard(&storage);
        fill_valid(&vm);
        vm.save_draft_now();
        vm.go_to(WizardStep::Governance);
        let report = vm.begin_submit().unwrap();

        let handler = reject(
            400,
            r#"{"message":"Invalid ESG data","issues":{"fieldErrors":{"governance.boardSize":["Board size looks wrong"]},"formErrors":[]}}"#,
        );
        block_on(vm.complete_submit(handler, report));

        assert!(!vm.is_submitting());
        assert!(vm.is_dirty().get_untracked());
        assert_eq!(
            vm.error_for("governance.boardSize").get_untracked().as_deref(),
            Some("Board size looks wrong")
        );
        assert!(stored(&storage).is_some());
        assert_eq!(
            vm.toasts.messages().last(),
            Some(&(ToastKind::Error, "Invalid ESG data".to_string()))
        );
    }

    #[test]
    fn submit_before_the_last_step_is_ignored_quietly() {
        let owner = Owner::new();
        owner.set();
        let vm = wizard(&MemoryStorage::new());

        assert_eq!(vm.begin_submit(), None);
        assert!(vm.toasts.messages().is_empty());
        assert!(vm.machine.with_untracked(|m| m.errors().is_empty()));
    }

    #[test]
    fn invalid_values_are_reported_once_per_click() {
        let owner = Owner::new();
        owner.set();
        let vm = wizard(&MemoryStorage::new());
        vm.go_to(WizardStep::Governance);

        assert_eq!(vm.begin_submit(), None);
        let messages = vm.toasts.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, ToastKind::Error);
        assert!(messages[0].1.starts_with("Please fix"));
        assert!(vm.error_for("general.companyName").get_untracked().is_some());
    }
}
