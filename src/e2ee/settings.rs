use crate::{e2ee::MasterKey, Id};
use serde_derive::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Whether the local database still needs a full re-encryption pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShouldReencrypt {
    No,
    Yes,
    /// The user has been nagged about it already.
    Notified,
}

impl Default for ShouldReencrypt {
    fn default() -> ShouldReencrypt { ShouldReencrypt::No }
}

/// Encryption-related configuration values: a handful of scalars plus
/// two per-key maps.
///
/// The application persists this alongside the rest of its settings;
/// here it only needs to be serde-serializable.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    master_password: Option<String>,
    should_reencrypt: ShouldReencrypt,
    password_cache: HashMap<Id, String>,
    disabled_master_keys: HashSet<Id>,
}

impl Settings {
    pub fn new() -> Settings { Settings::default() }

    pub fn master_password(&self) -> Option<&str> {
        self.master_password.as_deref()
    }

    pub fn set_master_password(&mut self, password: impl Into<String>) {
        self.master_password = Some(password.into());
    }

    pub fn should_reencrypt(&self) -> ShouldReencrypt {
        self.should_reencrypt
    }

    pub fn set_should_reencrypt(&mut self, value: ShouldReencrypt) {
        self.should_reencrypt = value;
    }

    /// The cached password for the key, if any.
    pub fn cached_password(&self, id: &Id) -> Option<&str> {
        self.password_cache.get(id).map(String::as_str)
    }

    pub fn cache_password(&mut self, id: Id, password: impl Into<String>) {
        self.password_cache.insert(id, password.into());
    }

    pub fn delete_cached_password(&mut self, id: &Id) {
        self.password_cache.remove(id);
    }

    /// Keys are enabled unless explicitly disabled.
    pub fn master_key_enabled(&self, key: &MasterKey) -> bool {
        !self.disabled_master_keys.contains(&key.id)
    }

    pub fn set_master_key_enabled(&mut self, id: &Id, enabled: bool) {
        if enabled {
            self.disabled_master_keys.remove(id);
        } else {
            self.disabled_master_keys.insert(id.clone());
        }
    }
}
