use crate::Id;
use serde_derive::{Deserialize, Serialize};

/// An authenticated API session.
///
/// The session's [`Id`] is what authenticates every subsequent call,
/// via the `X-API-AUTH` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Session {
    pub id: Id,
    pub user_id: Id,
}
