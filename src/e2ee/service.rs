use crate::{
    e2ee::{EncryptionMethod, MasterKey, KDF_HASH_LEN},
    Id,
};
use aes::Aes256;
use block_modes::{block_padding::Pkcs7, BlockMode, Cbc};
use chrono::Utc;
use digest::{Digest, FixedOutput};
use hmac::Hmac;
use rand::Rng;
use sha2::Sha256;

/// How many PBKDF2 rounds [`EncryptionMethod::Pbkdf2`] keys use.
pub const PBKDF2_ITERATIONS: usize = 100_000;

const KEY_MATERIAL_LEN: usize = 32;
const IV_LEN: usize = 16;

type Aes256Cbc = Cbc<Aes256, Pkcs7>;

/// Generates, checks and upgrades password-protected master keys.
#[derive(Debug, Default, Copy, Clone)]
pub struct EncryptionService;

impl EncryptionService {
    pub fn new() -> EncryptionService { EncryptionService }

    /// Create a fresh master key wrapped with the current method.
    pub fn generate_master_key(
        &self,
        password: &str,
    ) -> Result<MasterKey, DecryptionError> {
        self.generate_with_method(password, EncryptionMethod::CURRENT)
    }

    fn generate_with_method(
        &self,
        password: &str,
        method: EncryptionMethod,
    ) -> Result<MasterKey, DecryptionError> {
        let id = Id::random();
        let mut material = [0_u8; KEY_MATERIAL_LEN];
        rand::thread_rng().fill(&mut material[..]);

        let now = Utc::now().timestamp_millis();
        let content = wrap(&id, &material, password, method)?;

        Ok(MasterKey {
            id,
            created_time: now,
            updated_time: now,
            encryption_method: method,
            content,
            checksum: hex::encode(&Sha256::digest(&material)),
        })
    }

    /// Does `password` unlock `key`?
    ///
    /// Any decode or decrypt failure counts as a mismatch.
    pub fn check_master_key_password(
        &self,
        key: &MasterKey,
        password: &str,
    ) -> bool {
        match unwrap_material(key, password) {
            Ok(material) => {
                hex::encode(&Sha256::digest(&material)) == key.checksum
            },
            Err(_) => false,
        }
    }

    /// Re-wrap `key` with the current method, keeping its identity
    /// and key material.
    pub fn upgrade_master_key(
        &self,
        key: &MasterKey,
        password: &str,
    ) -> Result<MasterKey, DecryptionError> {
        let material = unwrap_material(key, password)?;

        if hex::encode(&Sha256::digest(&material)) != key.checksum {
            return Err(DecryptionError::WrongPassword);
        }

        let content =
            wrap(&key.id, &material, password, EncryptionMethod::CURRENT)?;

        Ok(MasterKey {
            id: key.id.clone(),
            created_time: key.created_time,
            updated_time: Utc::now().timestamp_millis(),
            encryption_method: EncryptionMethod::CURRENT,
            content,
            checksum: key.checksum.clone(),
        })
    }
}

/// Derive the AES key that wraps a master key's material. The key id
/// doubles as the salt, so every key derives differently even with
/// the same password.
fn derive_key(
    id: &Id,
    password: &str,
    method: EncryptionMethod,
) -> [u8; KDF_HASH_LEN] {
    match method {
        EncryptionMethod::Legacy => Sha256::new()
            .chain(id.as_str())
            .chain(password)
            .fixed_result()
            .into(),
        EncryptionMethod::Pbkdf2 => {
            let mut key = [0; KDF_HASH_LEN];
            pbkdf2::pbkdf2::<Hmac<Sha256>>(
                password.as_bytes(),
                id.as_bytes(),
                PBKDF2_ITERATIONS,
                &mut key,
            );
            key
        },
    }
}

fn wrap(
    id: &Id,
    material: &[u8],
    password: &str,
    method: EncryptionMethod,
) -> Result<String, DecryptionError> {
    let key = derive_key(id, password, method);
    let mut iv = [0_u8; IV_LEN];
    rand::thread_rng().fill(&mut iv[..]);

    let cipher = Aes256Cbc::new_from_slices(&key, &iv)?;
    let mut blob = iv.to_vec();
    blob.extend(cipher.encrypt_vec(material));

    Ok(base64::encode(&blob))
}

fn unwrap_material(
    key: &MasterKey,
    password: &str,
) -> Result<Vec<u8>, DecryptionError> {
    let blob = base64::decode(&key.content)?;

    if blob.len() < IV_LEN {
        return Err(DecryptionError::TruncatedContent);
    }
    let (iv, ciphertext) = blob.split_at(IV_LEN);

    let derived = derive_key(&key.id, password, key.encryption_method);
    let cipher = Aes256Cbc::new_from_slices(&derived, iv)?;

    Ok(cipher.decrypt_vec(ciphertext)?)
}

/// Errors that may occur while unwrapping a master key.
#[derive(Debug, thiserror::Error)]
pub enum DecryptionError {
    #[error("Unable to decode the key content")]
    Base64(#[from] base64::DecodeError),
    #[error("The key content is too short to hold an IV")]
    TruncatedContent,
    #[error("Invalid key or IV length")]
    KeyIv(#[from] block_modes::InvalidKeyIvLength),
    #[error("Unable to decrypt the key content")]
    BlockMode(#[from] block_modes::BlockModeError),
    #[error("The password does not match this key")]
    WrongPassword,
}
