use crate::Id;
use serde_derive::{Deserialize, Serialize};
use std::{convert::TryFrom, str::FromStr};

/// How a share is scoped to the thing being shared.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum ShareType {
    /// An app-internal share of a single item.
    App,
    /// A whole notebook, shared from its root folder.
    RootFolder,
    /// A public link to a single note.
    Link,
}

impl From<ShareType> for u8 {
    fn from(other: ShareType) -> u8 {
        match other {
            ShareType::App => 1,
            ShareType::RootFolder => 2,
            ShareType::Link => 3,
        }
    }
}

impl TryFrom<u8> for ShareType {
    type Error = UnknownShareType;

    fn try_from(code: u8) -> Result<ShareType, Self::Error> {
        match code {
            1 => Ok(ShareType::App),
            2 => Ok(ShareType::RootFolder),
            3 => Ok(ShareType::Link),
            other => Err(UnknownShareType::Code(other)),
        }
    }
}

impl FromStr for ShareType {
    type Err = UnknownShareType;

    fn from_str(s: &str) -> Result<ShareType, Self::Err> {
        match s {
            "app" => Ok(ShareType::App),
            "root-folder" => Ok(ShareType::RootFolder),
            "link" => Ok(ShareType::Link),
            other => Err(UnknownShareType::Name(other.to_string())),
        }
    }
}

/// The share type wasn't one we know about.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnknownShareType {
    #[error("{0} is not a known share type code")]
    Code(u8),
    #[error("\"{0}\" is not a known share type name")]
    Name(String),
}

/// A record granting another user access to an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Share {
    pub id: Id,
    #[serde(default)]
    pub owner_id: Option<Id>,
    #[serde(rename = "type")]
    pub share_type: ShareType,
    /// Set for app-internal shares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<Id>,
    /// Set for [`ShareType::Link`] shares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<Id>,
    /// Set for [`ShareType::RootFolder`] shares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Id>,
}

/// One user's invitation/acceptance state for a share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ShareUser {
    pub id: Id,
    #[serde(default)]
    pub share_id: Option<Id>,
    #[serde(default)]
    pub user_id: Option<Id>,
    /// The email address the invitation was sent to.
    #[serde(default)]
    pub email: Option<String>,
    /// 1 once the invitee has accepted, 0 before that.
    #[serde(default)]
    pub is_accepted: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn share_types_serialize_as_their_codes() {
        assert_eq!(serde_json::to_value(ShareType::App).unwrap(), json!(1));
        assert_eq!(
            serde_json::to_value(ShareType::RootFolder).unwrap(),
            json!(2)
        );
        assert_eq!(serde_json::to_value(ShareType::Link).unwrap(), json!(3));
    }

    #[test]
    fn unknown_share_type_codes_are_rejected() {
        let got = serde_json::from_value::<ShareType>(json!(9));

        assert!(got.is_err());
    }

    #[test]
    fn parse_share_response() {
        let src = r#"{
            "id": "f9a1e3b0c27a4bb1a2e6d5c4b3a29181",
            "owner_id": "7b8a9cad00112233445566778899aabb",
            "type": 3,
            "note_id": "2f4cea51abc24dd5a0afb66c3de19d1c"
        }"#;

        let got: Share = serde_json::from_str(src).unwrap();

        assert_eq!(got.share_type, ShareType::Link);
        assert_eq!(
            got.note_id,
            Some(Id::from("2f4cea51abc24dd5a0afb66c3de19d1c"))
        );
        assert_eq!(got.item_id, None);
        assert_eq!(got.folder_id, None);
    }

    #[test]
    fn parse_share_user_response() {
        let src = r#"{
            "id": "0123456789abcdef0123456789abcdef",
            "share_id": "f9a1e3b0c27a4bb1a2e6d5c4b3a29181",
            "user_id": "aabbccddeeff00112233445566778899",
            "email": "sharee@example.com",
            "is_accepted": 0
        }"#;

        let got: ShareUser = serde_json::from_str(src).unwrap();

        assert_eq!(got.email.as_deref(), Some("sharee@example.com"));
        assert_eq!(got.is_accepted, 0);
    }
}
