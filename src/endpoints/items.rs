use crate::{Item, Session};
use reqwest::Client;

/// Upload an item's content, creating the item if it doesn't exist
/// yet.
pub async fn create_item(
    client: &Client,
    hostname: &str,
    session: &Session,
    name: &str,
    content: &[u8],
) -> Result<Item, super::EndpointError> {
    let path = format!("items/{}/content", name);

    let response =
        super::put_bytes(client, hostname, &path, session, content.to_vec())
            .await?;

    response.json().await.map_err(Into::into)
}
