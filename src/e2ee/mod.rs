//! The client side of end-to-end encryption: master keys, the
//! service that checks and upgrades them, key-related settings, and
//! the state behind the encryption configuration screen.

mod config;
mod master_key;
mod service;
mod settings;
mod stats;

const SHA256_LEN: usize =
    <<sha2::Sha256 as digest::FixedOutput>::OutputSize as typenum::marker_traits::Unsigned>::USIZE;
const KDF_HASH_LEN: usize = SHA256_LEN;

pub use config::{
    dont_reencrypt_data, enable_encryption_confirmation_messages,
    master_password_is_valid, reencrypt_data, toggle_master_key_enabled,
    upgrade_master_key, EncryptionConfig, PasswordChecks, Synchronizer,
};
pub use master_key::{EncryptionMethod, MasterKey, UnknownEncryptionMethod};
pub use service::{DecryptionError, EncryptionService, PBKDF2_ITERATIONS};
pub use settings::{Settings, ShouldReencrypt};
pub use stats::{
    decrypted_stat_text, EncryptedItemsStats, ItemStore, StatsPoller,
    DEFAULT_POLL_INTERVAL,
};
