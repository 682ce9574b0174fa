//! Single source of truth for the access/refresh token pair.
//!
//! The access token is mirrored in memory so attaching it to a request never
//! touches storage. Both tokens are persisted; changes made by another tab
//! arrive through the browser `storage` event.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::shared::storage::KeyValueStorage;

pub const ACCESS_TOKEN_KEY: &str = "esg_access_token";
pub const REFRESH_TOKEN_KEY: &str = "esg_refresh_token";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(u64);

type TokenListener = Rc<dyn Fn(&TokenPair)>;

struct TokenStoreInner {
    storage: Rc<dyn KeyValueStorage>,
    access: RefCell<Option<String>>,
    listeners: RefCell<Vec<(ListenerId, TokenListener)>>,
    next_listener: Cell<u64>,
}

#[derive(Clone)]
pub struct TokenStore {
    inner: Rc<TokenStoreInner>,
}

impl TokenStore {
    /// Loads the access token mirror from `storage`
    pub fn init(storage: Rc<dyn KeyValueStorage>) -> Self {
        let access = storage.get(ACCESS_TOKEN_KEY);
        Self {
            inner: Rc::new(TokenStoreInner {
                storage,
                access: RefCell::new(access),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.access.borrow().clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.storage.get(REFRESH_TOKEN_KEY)
    }

    pub fn snapshot(&self) -> TokenPair {
        TokenPair {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
        }
    }

    pub fn has_session(&self) -> bool {
        self.inner.access.borrow().is_some() || self.refresh_token().is_some()
    }

    pub fn set_access_token(&self, token: &str) {
        self.write(ACCESS_TOKEN_KEY, Some(token));
        *self.inner.access.borrow_mut() = Some(token.to_string());
        self.notify();
    }

    pub fn set_refresh_token(&self, token: &str) {
        self.write(REFRESH_TOKEN_KEY, Some(token));
        self.notify();
    }

    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) {
        self.write(ACCESS_TOKEN_KEY, Some(access_token));
        self.write(REFRESH_TOKEN_KEY, Some(refresh_token));
        *self.inner.access.borrow_mut() = Some(access_token.to_string());
        self.notify();
    }

    pub fn clear(&self) {
        self.write(ACCESS_TOKEN_KEY, None);
        self.write(REFRESH_TOKEN_KEY, None);
        *self.inner.access.borrow_mut() = None;
        self.notify();
    }

    pub fn subscribe(&self, listener: impl Fn(&TokenPair) + 'static) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    /// Handles a change made by another tab. `key == None` means the whole
    /// storage area was cleared.
    pub fn apply_storage_event(&self, key: Option<&str>, new_value: Option<String>) {
        match key {
            None => {
                *self.inner.access.borrow_mut() = None;
                self.notify();
            }
            Some(ACCESS_TOKEN_KEY) => {
                let changed = *self.inner.access.borrow() != new_value;
                if changed {
                    *self.inner.access.borrow_mut() = new_value;
                    self.notify();
                }
            }
            Some(REFRESH_TOKEN_KEY) => self.notify(),
            Some(_) => {}
        }
    }

    /// Feeds `storage` events of this window into [`Self::apply_storage_event`]
    pub fn listen_cross_tab(&self) {
        let store = self.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::StorageEvent| {
            store.apply_storage_event(event.key().as_deref(), event.new_value());
        }) as Box<dyn FnMut(_)>);

        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn write(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(v) => self.inner.storage.set(key, v),
            None => self.inner.storage.remove(key),
        };
        if let Err(e) = result {
            log::warn!("Failed to persist {}: {}", key, e);
        }
    }

    fn notify(&self) {
        let pair = self.snapshot();
        // listeners may subscribe/unsubscribe while being called
        let listeners: Vec<TokenListener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&pair);
        }
    }
}
