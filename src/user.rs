use crate::Id;
use serde_derive::{Deserialize, Serialize};

/// The subset of a server-side user account the sharing workflow
/// cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
}

impl User {
    pub fn new(id: Id, email: impl Into<String>) -> User {
        User {
            id,
            email: email.into(),
        }
    }
}
