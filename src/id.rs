use rand::Rng;
use serde_derive::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter},
    ops::Deref,
    str::FromStr,
};

/// A unique resource identifier.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Hash,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub struct Id(String);

impl Id {
    /// Mint a fresh identifier (32 lowercase hex characters).
    pub fn random() -> Id {
        let bytes: [u8; 16] = rand::thread_rng().gen();
        Id(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl<S: Into<String>> From<S> for Id {
    fn from(other: S) -> Id { Id(other.into()) }
}

impl Deref for Id {
    type Target = str;

    fn deref(&self) -> &str { &self.0 }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Id, Self::Err> { Ok(Id::from(s)) }
}
