use crate::Id;
use serde_derive::{Deserialize, Serialize};
use std::convert::TryFrom;

/// How a master key's material is wrapped by the user's password.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum EncryptionMethod {
    /// Single-pass SHA-256 key derivation. Kept so keys created by
    /// the first client generation can still be read and upgraded.
    Legacy,
    /// PBKDF2-HMAC-SHA256 with [`PBKDF2_ITERATIONS`] rounds.
    ///
    /// [`PBKDF2_ITERATIONS`]: crate::e2ee::PBKDF2_ITERATIONS
    Pbkdf2,
}

impl EncryptionMethod {
    /// The method used for newly generated and upgraded keys.
    pub const CURRENT: EncryptionMethod = EncryptionMethod::Pbkdf2;
}

impl From<EncryptionMethod> for u8 {
    fn from(other: EncryptionMethod) -> u8 {
        match other {
            EncryptionMethod::Legacy => 1,
            EncryptionMethod::Pbkdf2 => 2,
        }
    }
}

impl TryFrom<u8> for EncryptionMethod {
    type Error = UnknownEncryptionMethod;

    fn try_from(code: u8) -> Result<EncryptionMethod, Self::Error> {
        match code {
            1 => Ok(EncryptionMethod::Legacy),
            2 => Ok(EncryptionMethod::Pbkdf2),
            other => Err(UnknownEncryptionMethod(other)),
        }
    }
}

/// The encryption method wasn't one we know about.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0} is not a known encryption method")]
pub struct UnknownEncryptionMethod(u8);

/// An encryption key protected by a user password, used to decrypt
/// the actual data keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterKey {
    pub id: Id,
    /// Unix milliseconds.
    pub created_time: i64,
    pub updated_time: i64,
    pub encryption_method: EncryptionMethod,
    /// Base64 of the IV-prefixed, password-encrypted key material.
    pub content: String,
    /// Hex SHA-256 of the plaintext key material.
    pub checksum: String,
}
