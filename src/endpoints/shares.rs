use crate::{Id, Item, Session, Share, ShareType};
use reqwest::{Client, Method};
use serde_derive::Serialize;

/// Create a share scoped to an item.
pub async fn create_share(
    client: &Client,
    hostname: &str,
    session: &Session,
    request: &ShareRequest,
) -> Result<Share, super::EndpointError> {
    let response = super::send_json(
        client,
        Method::POST,
        hostname,
        "shares",
        Some(session),
        request,
    )
    .await?;

    response.json().await.map_err(Into::into)
}

/// Fetch a share by its [`Id`].
pub async fn get_share(
    client: &Client,
    hostname: &str,
    session: &Session,
    share_id: &Id,
) -> Result<Share, super::EndpointError> {
    let path = format!("shares/{}", share_id);

    let response = super::get(client, hostname, &path, Some(session)).await?;

    response.json().await.map_err(Into::into)
}

/// The body of a `POST /api/shares` request.
///
/// Exactly one scoping field is set, depending on the share type:
/// links carry the item as `note_id`, root-folder shares as
/// `folder_id`, and app-internal shares as `item_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareRequest {
    #[serde(rename = "type")]
    share_type: ShareType,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder_id: Option<Id>,
}

impl ShareRequest {
    /// Scope a new request to `item` according to `share_type`.
    pub fn new(share_type: ShareType, item: &Item) -> ShareRequest {
        let mut request = ShareRequest {
            share_type,
            item_id: None,
            note_id: None,
            folder_id: None,
        };

        match share_type {
            ShareType::Link => request.note_id = Some(item.id.clone()),
            ShareType::RootFolder => request.folder_id = Some(item.id.clone()),
            ShareType::App => request.item_id = Some(item.id.clone()),
        }

        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item() -> Item {
        serde_json::from_value(json!({
            "id": "2f4cea51abc24dd5a0afb66c3de19d1c",
            "name": "root:/test.txt:",
        }))
        .unwrap()
    }

    #[test]
    fn link_shares_are_scoped_by_note_id() {
        let request = ShareRequest::new(ShareType::Link, &item());

        let got = serde_json::to_value(&request).unwrap();

        assert_eq!(
            got,
            json!({
                "type": 3,
                "note_id": "2f4cea51abc24dd5a0afb66c3de19d1c",
            })
        );
    }

    #[test]
    fn root_folder_shares_are_scoped_by_folder_id() {
        let request = ShareRequest::new(ShareType::RootFolder, &item());

        let got = serde_json::to_value(&request).unwrap();

        assert_eq!(
            got,
            json!({
                "type": 2,
                "folder_id": "2f4cea51abc24dd5a0afb66c3de19d1c",
            })
        );
    }

    #[test]
    fn app_shares_carry_neither_note_nor_folder() {
        let request = ShareRequest::new(ShareType::App, &item());

        let got = serde_json::to_value(&request).unwrap();

        assert_eq!(
            got,
            json!({
                "type": 1,
                "item_id": "2f4cea51abc24dd5a0afb66c3de19d1c",
            })
        );
    }
}
