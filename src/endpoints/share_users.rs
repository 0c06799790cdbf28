use crate::{Id, Session, ShareUser};
use reqwest::{Client, Method};
use serde_derive::Serialize;

/// Invite a user to a share by email.
///
/// The resulting [`ShareUser`] starts out unaccepted.
pub async fn invite_user(
    client: &Client,
    hostname: &str,
    session: &Session,
    share_id: &Id,
    email: &str,
) -> Result<ShareUser, super::EndpointError> {
    let path = format!("shares/{}/users", share_id);
    let data = Data { email };

    let response = super::send_json(
        client,
        Method::POST,
        hostname,
        &path,
        Some(session),
        &data,
    )
    .await?;

    response.json().await.map_err(Into::into)
}

/// Update a share-user record, returning the updated version.
pub async fn patch_share_user(
    client: &Client,
    hostname: &str,
    session: &Session,
    share_user_id: &Id,
    patch: &ShareUserPatch,
) -> Result<ShareUser, super::EndpointError> {
    let path = format!("share_users/{}", share_user_id);

    let response = super::send_json(
        client,
        Method::PATCH,
        hostname,
        &path,
        Some(session),
        patch,
    )
    .await?;

    response.json().await.map_err(Into::into)
}

#[derive(Debug, Copy, Clone, Serialize)]
struct Data<'a> {
    email: &'a str,
}

/// The body of a `PATCH /api/share_users/{id}` request.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct ShareUserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_accepted: Option<i64>,
}

impl ShareUserPatch {
    /// A patch that marks the invitation accepted.
    pub fn accepted() -> ShareUserPatch {
        ShareUserPatch {
            is_accepted: Some(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepted_patch_sets_the_flag() {
        let got = serde_json::to_value(ShareUserPatch::accepted()).unwrap();

        assert_eq!(got, json!({ "is_accepted": 1 }));
    }

    #[test]
    fn empty_patches_serialize_to_nothing() {
        let got = serde_json::to_value(ShareUserPatch::default()).unwrap();

        assert_eq!(got, json!({}));
    }
}
