//! Draft persistence for long forms.
//!
//! Edits are staged and written by a debounced flush; "Save draft" writes
//! immediately. The last serialized value this tab wrote is remembered so a
//! `storage` event carrying that same value is not re-applied.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::shared::storage::{KeyValueStorage, StorageError};

/// Quiet period before a staged draft is written
pub const DRAFT_DEBOUNCE_MS: u32 = 300;

/// Storage key of `base` for one account, so a draft never surfaces in
/// another user's session on the same browser.
pub fn user_draft_key(base: &str, user_id: &str) -> String {
    format!("{}:{}", base, user_id)
}

pub struct DraftStore<T> {
    key: String,
    storage: Rc<dyn KeyValueStorage>,
    pending: RefCell<Option<String>>,
    last_written: RefCell<Option<String>>,
    _draft: PhantomData<T>,
}

impl<T> DraftStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(key: impl Into<String>, storage: Rc<dyn KeyValueStorage>) -> Self {
        Self {
            key: key.into(),
            storage,
            pending: RefCell::new(None),
            last_written: RefCell::new(None),
            _draft: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored draft. Unreadable drafts are logged and ignored.
    pub fn hydrate(&self) -> Option<T> {
        let raw = self.storage.get(&self.key)?;
        match serde_json::from_str(&raw) {
            Ok(draft) => {
                *self.last_written.borrow_mut() = Some(raw);
                Some(draft)
            }
            Err(e) => {
                log::warn!("Ignoring unreadable draft {}: {}", self.key, e);
                None
            }
        }
    }

    /// Records the latest values; nothing is written until [`Self::flush`]
    pub fn stage(&self, draft: &T) {
        match serde_json::to_string(draft) {
            Ok(json) => *self.pending.borrow_mut() = Some(json),
            Err(e) => log::error!("Failed to serialize draft {}: {}", self.key, e),
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Writes the staged snapshot, if any. Returns whether a write happened.
    pub fn flush(&self) -> Result<bool, StorageError> {
        let Some(json) = self.pending.borrow_mut().take() else {
            return Ok(false);
        };
        if self.last_written.borrow().as_deref() == Some(json.as_str()) {
            return Ok(false);
        }
        self.write(json)?;
        Ok(true)
    }

    /// Immediate write that bypasses the debounce
    pub fn save_now(&self, draft: &T) -> Result<(), StorageError> {
        self.pending.borrow_mut().take();
        let json =
            serde_json::to_string(draft).map_err(|e| StorageError::Write(e.to_string()))?;
        self.write(json)
    }

    /// A `storage` event from another tab. Returns the draft to merge when
    /// it is ours and differs from what this tab last wrote.
    pub fn apply_external_change(&self, key: Option<&str>, new_value: Option<&str>) -> Option<T> {
        if key != Some(self.key.as_str()) {
            return None;
        }
        let raw = new_value?;
        if self.last_written.borrow().as_deref() == Some(raw) {
            return None;
        }
        match serde_json::from_str(raw) {
            Ok(draft) => {
                *self.last_written.borrow_mut() = Some(raw.to_string());
                // a staged local edit would overwrite the merged value
                self.pending.borrow_mut().take();
                Some(draft)
            }
            Err(e) => {
                log::warn!("Ignoring unreadable draft from another tab: {}", e);
                None
            }
        }
    }

    /// Forgets staged edits without writing them
    pub fn drop_pending(&self) {
        self.pending.borrow_mut().take();
    }

    /// Removes the stored draft (after a successful submit)
    pub fn discard(&self) -> Result<(), StorageError> {
        self.pending.borrow_mut().take();
        self.last_written.borrow_mut().take();
        self.storage.remove(&self.key)
    }

    fn write(&self, json: String) -> Result<(), StorageError> {
        self.storage.set(&self.key, &json)?;
        *self.last_written.borrow_mut() = Some(json);
        Ok(())
    }
}
