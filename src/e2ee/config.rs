//! State and handlers behind the encryption configuration screen.
//!
//! Everything correctness-critical (password verification, key
//! wrapping) lives in [`EncryptionService`]; this module only
//! sequences calls and tracks screen-local state.

use crate::{
    e2ee::{
        EncryptionService, MasterKey, Settings, ShouldReencrypt,
    },
    Id,
};
use async_trait::async_trait;
use chrono::{Local, TimeZone};
use std::collections::HashMap;

/// Per-key password check results, plus the master password's own
/// check against the active key.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PasswordChecks {
    pub per_key: HashMap<Id, bool>,
    pub master: bool,
}

/// Kicks off synchronisation after encryption-affecting changes.
#[async_trait]
pub trait Synchronizer: Send + Sync {
    /// Queue every local item for upload on the next run.
    async fn force_sync_all(&self) -> anyhow::Result<()>;

    /// Schedule a sync once the current one (if any) finishes.
    fn request_sync(&self);
}

/// UI-local state of the encryption configuration screen.
#[derive(Debug, Default)]
pub struct EncryptionConfig {
    input_passwords: HashMap<Id, String>,
    input_master_password: String,
    password_checks: PasswordChecks,
    master_password_keys: HashMap<Id, bool>,
    show_disabled_master_keys: bool,
}

impl EncryptionConfig {
    pub fn new() -> EncryptionConfig { EncryptionConfig::default() }

    pub fn set_input_password(&mut self, id: &Id, password: impl Into<String>) {
        self.input_passwords.insert(id.clone(), password.into());
    }

    pub fn input_password(&self, id: &Id) -> Option<&str> {
        self.input_passwords.get(id).map(String::as_str)
    }

    pub fn set_input_master_password(&mut self, password: impl Into<String>) {
        self.input_master_password = password.into();
    }

    pub fn input_master_password(&self) -> &str {
        &self.input_master_password
    }

    /// The results of the last [`refresh_password_checks()`] run.
    ///
    /// [`refresh_password_checks()`]: EncryptionConfig::refresh_password_checks
    pub fn password_checks(&self) -> &PasswordChecks {
        &self.password_checks
    }

    /// Which keys are covered by the master password, per the last
    /// refresh.
    pub fn master_password_keys(&self) -> &HashMap<Id, bool> {
        &self.master_password_keys
    }

    pub fn show_disabled_master_keys(&self) -> bool {
        self.show_disabled_master_keys
    }

    pub fn toggle_show_disabled_master_keys(&mut self) {
        self.show_disabled_master_keys = !self.show_disabled_master_keys;
    }

    /// Cache the password typed for `key`, or forget the cached one
    /// when the input is empty.
    pub fn save_password(&self, settings: &mut Settings, key: &MasterKey) {
        match self.input_passwords.get(&key.id) {
            Some(password) if !password.is_empty() => {
                settings.cache_password(key.id.clone(), password.clone());
            },
            _ => settings.delete_cached_password(&key.id),
        }
    }

    /// Persist the master-password input.
    ///
    /// Returns alert text when the new password fails validation
    /// against the active key.
    pub fn save_master_password(
        &self,
        settings: &mut Settings,
        service: &EncryptionService,
        master_keys: &[MasterKey],
        active_master_key_id: Option<&Id>,
    ) -> Option<String> {
        settings.set_master_password(self.input_master_password.clone());

        if master_password_is_valid(
            service,
            master_keys,
            active_master_key_id,
            &self.input_master_password,
        ) {
            None
        } else {
            Some(String::from("Password is invalid. Please try again."))
        }
    }

    /// Re-run every password check.
    ///
    /// For each key this resolves a candidate password (the master
    /// password when it unlocks the key, the cached per-key entry
    /// otherwise), records whether the candidate actually unlocks the
    /// key, and records whether the candidate came from the master
    /// password. The master password's own check against the active
    /// key lands in [`PasswordChecks::master`].
    pub fn refresh_password_checks(
        &mut self,
        service: &EncryptionService,
        master_keys: &[MasterKey],
        active_master_key_id: Option<&Id>,
        settings: &Settings,
    ) {
        let mut checks = PasswordChecks::default();
        let mut master_password_keys = HashMap::new();
        let master_password = settings.master_password();

        for key in master_keys {
            let password = find_master_key_password(service, key, settings);
            let ok = match &password {
                Some(password) => {
                    service.check_master_key_password(key, password)
                },
                None => false,
            };

            checks.per_key.insert(key.id.clone(), ok);
            master_password_keys
                .insert(key.id.clone(), password.as_deref() == master_password);
        }

        checks.master = master_password_is_valid(
            service,
            master_keys,
            active_master_key_id,
            master_password.unwrap_or(""),
        );

        self.password_checks = checks;
        self.master_password_keys = master_password_keys;
    }
}

/// Does the candidate master password unlock the active key?
///
/// An empty password or a missing active key both mean "no".
pub fn master_password_is_valid(
    service: &EncryptionService,
    master_keys: &[MasterKey],
    active_master_key_id: Option<&Id>,
    master_password: &str,
) -> bool {
    let active = active_master_key_id
        .and_then(|id| master_keys.iter().find(|mk| &mk.id == id));

    match active {
        Some(key) if !master_password.is_empty() => {
            service.check_master_key_password(key, master_password)
        },
        _ => false,
    }
}

/// Resolve the password to try against `key`: the master password
/// wins when it actually unlocks the key, then the cached per-key
/// entry.
fn find_master_key_password(
    service: &EncryptionService,
    key: &MasterKey,
    settings: &Settings,
) -> Option<String> {
    if let Some(master) = settings.master_password() {
        if service.check_master_key_password(key, master) {
            return Some(master.to_string());
        }
    }

    settings.cached_password(&key.id).map(str::to_string)
}

/// Flip a key's enabled flag.
pub fn toggle_master_key_enabled(settings: &mut Settings, key: &MasterKey) {
    let enabled = settings.master_key_enabled(key);
    settings.set_master_key_enabled(&key.id, !enabled);
}

/// Upgrade `key` to the current wrapping method, in place.
///
/// Returns the text shown to the user afterwards, whether that is a
/// prompt for the missing password, a success notice, or the failure
/// reason.
pub fn upgrade_master_key(
    service: &EncryptionService,
    key: &mut MasterKey,
    checks: &PasswordChecks,
    passwords: &HashMap<Id, String>,
    sync: &dyn Synchronizer,
) -> String {
    if !checks.per_key.get(&key.id).copied().unwrap_or(false) {
        return String::from(
            "Please enter your password in the master key list below before \
             upgrading the key.",
        );
    }

    let password = passwords.get(&key.id).map(String::as_str).unwrap_or("");

    match service.upgrade_master_key(key, password) {
        Ok(upgraded) => {
            *key = upgraded;
            sync.request_sync();
            String::from("The master key has been upgraded successfully!")
        },
        Err(error) => format!("Could not upgrade master key: {}", error),
    }
}

/// The confirmation text shown before enabling encryption.
pub fn enable_encryption_confirmation_messages(
    master_key: Option<&MasterKey>,
) -> Vec<String> {
    let mut messages = vec![String::from(
        "Enabling encryption means *all* your notes and attachments are \
         going to be re-synchronised and sent encrypted to the sync target. \
         Do not lose the password as, for security purposes, this will be \
         the *only* way to decrypt the data! To enable encryption, please \
         enter your password below.",
    )];

    if let Some(key) = master_key {
        messages.push(format!(
            "Encryption will be enabled using the master key created on {}",
            local_date_time(key.created_time),
        ));
    }

    messages
}

fn local_date_time(unix_ms: i64) -> String {
    Local
        .timestamp_millis_opt(unix_ms)
        .earliest()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| String::from("-"))
}

/// Queue a full re-encryption of the local data and clear the nag
/// flag. The "are you sure" prompt happens in the caller.
///
/// Returns the notice shown once the re-encryption is underway.
pub async fn reencrypt_data(
    sync: &dyn Synchronizer,
    settings: &mut Settings,
) -> anyhow::Result<String> {
    sync.force_sync_all().await?;
    sync.request_sync();
    settings.set_should_reencrypt(ShouldReencrypt::No);

    Ok(String::from(
        "Your data is going to be re-encrypted and synced again.",
    ))
}

/// Dismiss the re-encryption nag without syncing anything.
pub fn dont_reencrypt_data(settings: &mut Settings) {
    settings.set_should_reencrypt(ShouldReencrypt::No);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    const PASSWORD_A: &str = "first password";
    const PASSWORD_B: &str = "second password";

    fn service() -> EncryptionService { EncryptionService::new() }

    #[derive(Default)]
    struct FakeSync {
        forced: AtomicBool,
        requested: AtomicBool,
    }

    #[async_trait]
    impl Synchronizer for FakeSync {
        async fn force_sync_all(&self) -> anyhow::Result<()> {
            self.forced.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn request_sync(&self) {
            self.requested.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn master_password_checks_need_a_password_and_an_active_key() {
        let service = service();
        let key = service.generate_master_key(PASSWORD_A).unwrap();
        let keys = vec![key.clone()];

        assert!(!master_password_is_valid(&service, &keys, Some(&key.id), ""));
        assert!(!master_password_is_valid(&service, &keys, None, PASSWORD_A));
        assert!(!master_password_is_valid(
            &service,
            &keys,
            Some(&Id::random()),
            PASSWORD_A
        ));
        assert!(master_password_is_valid(
            &service,
            &keys,
            Some(&key.id),
            PASSWORD_A
        ));
    }

    #[test]
    fn refreshing_checks_resolves_each_keys_password() {
        let service = service();
        let cached_key = service.generate_master_key(PASSWORD_A).unwrap();
        let master_key = service.generate_master_key(PASSWORD_B).unwrap();
        let keys = vec![cached_key.clone(), master_key.clone()];

        let mut settings = Settings::new();
        settings.set_master_password(PASSWORD_B);
        settings.cache_password(cached_key.id.clone(), PASSWORD_A);

        let mut config = EncryptionConfig::new();
        config.refresh_password_checks(
            &service,
            &keys,
            Some(&master_key.id),
            &settings,
        );

        let checks = config.password_checks();
        assert_eq!(checks.per_key[&cached_key.id], true);
        assert_eq!(checks.per_key[&master_key.id], true);
        assert!(checks.master);

        // only the second key's password came from the master password
        assert_eq!(config.master_password_keys()[&cached_key.id], false);
        assert_eq!(config.master_password_keys()[&master_key.id], true);
    }

    #[test]
    fn unresolvable_passwords_fail_their_check() {
        let service = service();
        let key = service.generate_master_key(PASSWORD_A).unwrap();
        let keys = vec![key.clone()];

        let mut config = EncryptionConfig::new();
        config.refresh_password_checks(
            &service,
            &keys,
            Some(&key.id),
            &Settings::new(),
        );

        assert_eq!(config.password_checks().per_key[&key.id], false);
        assert!(!config.password_checks().master);
    }

    #[test]
    fn saving_an_invalid_master_password_warns_but_still_saves() {
        let service = service();
        let key = service.generate_master_key(PASSWORD_A).unwrap();
        let keys = vec![key.clone()];
        let mut settings = Settings::new();

        let mut config = EncryptionConfig::new();
        config.set_input_master_password("wrong");

        let alert = config.save_master_password(
            &mut settings,
            &service,
            &keys,
            Some(&key.id),
        );

        assert_eq!(
            alert.as_deref(),
            Some("Password is invalid. Please try again.")
        );
        assert_eq!(settings.master_password(), Some("wrong"));

        config.set_input_master_password(PASSWORD_A);
        let alert = config.save_master_password(
            &mut settings,
            &service,
            &keys,
            Some(&key.id),
        );

        assert_eq!(alert, None);
        assert_eq!(settings.master_password(), Some(PASSWORD_A));
    }

    #[test]
    fn empty_password_inputs_clear_the_cache() {
        let service = service();
        let key = service.generate_master_key(PASSWORD_A).unwrap();
        let mut settings = Settings::new();
        settings.cache_password(key.id.clone(), PASSWORD_A);

        let mut config = EncryptionConfig::new();
        config.set_input_password(&key.id, "");
        config.save_password(&mut settings, &key);

        assert_eq!(settings.cached_password(&key.id), None);

        config.set_input_password(&key.id, PASSWORD_A);
        config.save_password(&mut settings, &key);

        assert_eq!(settings.cached_password(&key.id), Some(PASSWORD_A));
    }

    #[test]
    fn upgrading_needs_a_passing_password_check() {
        let service = service();
        let mut key = service.generate_master_key(PASSWORD_A).unwrap();
        let sync = FakeSync::default();

        let got = upgrade_master_key(
            &service,
            &mut key,
            &PasswordChecks::default(),
            &HashMap::new(),
            &sync,
        );

        assert!(got.starts_with("Please enter your password"));
        assert!(!sync.requested.load(Ordering::SeqCst));
    }

    #[test]
    fn a_successful_upgrade_requests_a_sync() {
        let service = service();
        let mut key = service.generate_master_key(PASSWORD_A).unwrap();
        let sync = FakeSync::default();

        let mut checks = PasswordChecks::default();
        checks.per_key.insert(key.id.clone(), true);
        let mut passwords = HashMap::new();
        passwords.insert(key.id.clone(), PASSWORD_A.to_string());

        let got =
            upgrade_master_key(&service, &mut key, &checks, &passwords, &sync);

        assert_eq!(got, "The master key has been upgraded successfully!");
        assert!(sync.requested.load(Ordering::SeqCst));
        assert!(service.check_master_key_password(&key, PASSWORD_A));
    }

    #[test]
    fn a_failed_upgrade_reports_the_reason() {
        let service = service();
        let mut key = service.generate_master_key(PASSWORD_A).unwrap();
        let sync = FakeSync::default();

        let mut checks = PasswordChecks::default();
        checks.per_key.insert(key.id.clone(), true);
        let mut passwords = HashMap::new();
        passwords.insert(key.id.clone(), String::from("wrong"));

        let got =
            upgrade_master_key(&service, &mut key, &checks, &passwords, &sync);

        assert!(got.starts_with("Could not upgrade master key:"));
        assert!(!sync.requested.load(Ordering::SeqCst));
    }

    #[test]
    fn toggling_flips_the_enabled_flag() {
        let service = service();
        let key = service.generate_master_key(PASSWORD_A).unwrap();
        let mut settings = Settings::new();

        toggle_master_key_enabled(&mut settings, &key);
        assert!(!settings.master_key_enabled(&key));

        toggle_master_key_enabled(&mut settings, &key);
        assert!(settings.master_key_enabled(&key));
    }

    #[test]
    fn confirmation_messages_mention_an_existing_key() {
        let service = service();
        let key = service.generate_master_key(PASSWORD_A).unwrap();

        let without = enable_encryption_confirmation_messages(None);
        assert_eq!(without.len(), 1);

        let with = enable_encryption_confirmation_messages(Some(&key));
        assert_eq!(with.len(), 2);
        assert!(with[1].contains("master key created on"));
    }

    #[tokio::test]
    async fn reencrypting_syncs_and_clears_the_flag() {
        let sync = FakeSync::default();
        let mut settings = Settings::new();
        settings.set_should_reencrypt(ShouldReencrypt::Yes);

        let notice = reencrypt_data(&sync, &mut settings).await.unwrap();

        assert!(notice.contains("re-encrypted"));
        assert!(sync.forced.load(Ordering::SeqCst));
        assert!(sync.requested.load(Ordering::SeqCst));
        assert_eq!(settings.should_reencrypt(), ShouldReencrypt::No);
    }

    #[test]
    fn dismissing_clears_the_flag_without_syncing() {
        let mut settings = Settings::new();
        settings.set_should_reencrypt(ShouldReencrypt::Notified);

        dont_reencrypt_data(&mut settings);

        assert_eq!(settings.should_reencrypt(), ShouldReencrypt::No);
    }
}
