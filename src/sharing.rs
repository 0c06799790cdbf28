//! The whole share-with-a-user-and-accept handshake.

use crate::{
    endpoints::{self, EndpointError, ShareRequest, ShareUserPatch},
    Item, Session, Share, ShareType, ShareUser, User,
};
use reqwest::Client;

const DEFAULT_ITEM_NAME: &str = "root:/shared.txt:";
const DEFAULT_ITEM_CONTENT: &[u8] = b"shared item content";

/// Everything produced by [`share_with_user_and_accept()`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ShareOutcome {
    pub share: Share,
    pub item: Item,
    /// The invitee's record, after acceptance (`is_accepted` is 1).
    pub share_user: ShareUser,
}

/// Run the full sharing handshake between two users:
///
/// - the sharer uploads an item (unless one is supplied),
/// - the sharer creates a share scoped to that item,
/// - the sharer invites the other user by email,
/// - the invitee accepts.
///
/// Afterwards the invitee sees the sharer's item through the share.
/// The sequence is linear with no retries; the first failing call
/// aborts the workflow and its error says which step broke.
pub async fn share_with_user_and_accept(
    client: &Client,
    hostname: &str,
    sharer_session: &Session,
    sharee_session: &Session,
    sharee: &User,
    share_type: ShareType,
    item: Option<Item>,
) -> Result<ShareOutcome, ShareError> {
    let item = match item {
        Some(item) => item,
        None => endpoints::create_item(
            client,
            hostname,
            sharer_session,
            DEFAULT_ITEM_NAME,
            DEFAULT_ITEM_CONTENT,
        )
        .await
        .map_err(ShareError::CreateItem)?,
    };

    let request = ShareRequest::new(share_type, &item);
    let share = endpoints::create_share(client, hostname, sharer_session, &request)
        .await
        .map_err(ShareError::CreateShare)?;

    let invited = endpoints::invite_user(
        client,
        hostname,
        sharer_session,
        &share.id,
        &sharee.email,
    )
    .await
    .map_err(ShareError::InviteUser)?;

    let share_user = endpoints::patch_share_user(
        client,
        hostname,
        sharee_session,
        &invited.id,
        &ShareUserPatch::accepted(),
    )
    .await
    .map_err(ShareError::AcceptInvite)?;

    log::debug!("{} accepted share {}", sharee.email, share.id);

    Ok(ShareOutcome {
        share,
        item,
        share_user,
    })
}

/// A failure from one of the workflow's underlying calls.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Unable to create the shared item")]
    CreateItem(#[source] EndpointError),
    #[error("Unable to create the share")]
    CreateShare(#[source] EndpointError),
    #[error("Unable to invite the user")]
    InviteUser(#[source] EndpointError),
    #[error("Unable to accept the invitation")]
    AcceptInvite(#[source] EndpointError),
}
