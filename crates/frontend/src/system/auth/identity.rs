//! Cached user/company/role shown before the session is re-validated.

use contracts::system::auth::{CompanyInfo, Role, UserInfo};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

use crate::domain::a004_esg_report::ui::wizard::DRAFT_KEY as ESG_DRAFT_KEY;
use crate::shared::draft_store::user_draft_key;
use crate::shared::storage::KeyValueStorage;

pub const USER_KEY: &str = "esg_user";
pub const COMPANY_KEY: &str = "esg_company";
pub const ROLE_KEY: &str = "esg_role";

/// Form drafts kept per user; they go away with the identity
const USER_DRAFTS: [&str; 1] = [ESG_DRAFT_KEY];

#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    pub user: UserInfo,
    pub company: Option<CompanyInfo>,
    pub role: Role,
}

#[derive(Clone)]
pub struct IdentityCache {
    storage: Rc<dyn KeyValueStorage>,
}

impl IdentityCache {
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Option<Identity> {
        let user: UserInfo = self.read(USER_KEY)?;
        Some(Identity {
            user,
            company: self.read(COMPANY_KEY),
            role: self.read(ROLE_KEY).unwrap_or_default(),
        })
    }

    pub fn save(&self, identity: &Identity) {
        self.write(USER_KEY, &identity.user);
        match &identity.company {
            Some(company) => self.write(COMPANY_KEY, company),
            None => self.remove(COMPANY_KEY),
        }
        self.write(ROLE_KEY, &identity.role);
    }

    /// Forgets the identity and the drafts of the user it belonged to
    pub fn clear(&self) {
        if let Some(user) = self.read::<UserInfo>(USER_KEY) {
            for base in USER_DRAFTS {
                self.remove(&user_draft_key(base, &user.id));
            }
        }
        for key in [USER_KEY, COMPANY_KEY, ROLE_KEY] {
            self.remove(key);
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring unreadable {}: {}", key, e);
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(|e| e.to_string())
            .and_then(|json| self.storage.set(key, &json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            log::warn!("Failed to cache {}: {}", key, e);
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            log::warn!("Failed to remove {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::storage::MemoryStorage;

    fn identity() -> Identity {
        Identity {
            user: UserInfo {
                id: "u1".into(),
                email: "ana@example.com".into(),
                full_name: Some("Ana".into()),
            },
            company: Some(CompanyInfo {
                id: "c1".into(),
                name: "Acme".into(),
            }),
            role: Role::Admin,
        }
    }

    #[test]
    fn save_load_clear() {
        let storage = MemoryStorage::new();
        let cache = IdentityCache::new(Rc::new(storage.clone()));
        cache.save(&identity());
        assert_eq!(cache.load(), Some(identity()));
        cache.clear();
        assert_eq!(cache.load(), None);
        assert_eq!(storage.get(ROLE_KEY), None);
    }

    #[test]
    fn clear_drops_only_the_signed_out_users_draft() {
        let storage = MemoryStorage::new();
        let cache = IdentityCache::new(Rc::new(storage.clone()));
        cache.save(&identity());
        storage.set(&user_draft_key(ESG_DRAFT_KEY, "u1"), "{}").unwrap();
        storage.set(&user_draft_key(ESG_DRAFT_KEY, "u2"), "{}").unwrap();

        cache.clear();
        assert_eq!(storage.get(&user_draft_key(ESG_DRAFT_KEY, "u1")), None);
        assert!(storage.get(&user_draft_key(ESG_DRAFT_KEY, "u2")).is_some());
    }

    #[test]
    fn corrupt_role_falls_back_to_default() {
        let storage = MemoryStorage::new();
        let cache = IdentityCache::new(Rc::new(storage.clone()));
        cache.save(&identity());
        storage.set(ROLE_KEY, "not json").unwrap();
        assert_eq!(cache.load().map(|i| i.role), Some(Role::Viewer));
    }
}
