//! The sync server's REST endpoints.

mod items;
mod login;
mod share_users;
mod shares;

pub use items::create_item;
pub use login::{login, LoginError};
pub use share_users::{invite_user, patch_share_user, ShareUserPatch};
pub use shares::{create_share, get_share, ShareRequest};

use crate::Session;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde_derive::Deserialize;
use std::fmt::Debug;
use url::Url;

/// The header carrying the session id on authenticated calls.
pub const SESSION_HEADER: &str = "X-API-AUTH";

/// Typical endpoint errors.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// The HTTP client encountered an error.
    #[error("Unable to send the request")]
    HttpClient(#[from] reqwest::Error),
    /// The hostname couldn't be turned into a valid URL.
    #[error("Unable to interpret the hostname")]
    BadUrl(#[from] url::ParseError),
    /// The server answered with an error payload.
    #[error("The server rejected the request with {status}: {message}")]
    Api { status: StatusCode, message: String },
}

fn api_url(hostname: &str, path: &str) -> Result<Url, url::ParseError> {
    // a bare hostname is assumed to be TLS; dev servers can pass an
    // explicit http:// prefix
    if hostname.starts_with("http://") || hostname.starts_with("https://") {
        Url::parse(&format!("{}/api/{}", hostname, path))
    } else {
        Url::parse(&format!("https://{}/api/{}", hostname, path))
    }
}

async fn send_json<D>(
    client: &Client,
    method: Method,
    hostname: &str,
    path: &str,
    session: Option<&Session>,
    data: &D,
) -> Result<Response, EndpointError>
where
    D: Debug + Serialize,
{
    let url = api_url(hostname, path)?;

    log::debug!("Sending a {} request to {}", method, url);
    log::trace!("Payload: {:#?}", data);

    let mut request = client.request(method, url).json(data);
    if let Some(session) = session {
        request = request.header(SESSION_HEADER, session.id.as_str());
    }

    check_status(request.send().await?).await
}

async fn put_bytes(
    client: &Client,
    hostname: &str,
    path: &str,
    session: &Session,
    body: Vec<u8>,
) -> Result<Response, EndpointError> {
    let url = api_url(hostname, path)?;

    log::debug!("Sending a PUT request to {} ({} bytes)", url, body.len());

    let response = client
        .put(url)
        .header(SESSION_HEADER, session.id.as_str())
        .body(body)
        .send()
        .await?;

    check_status(response).await
}

async fn get(
    client: &Client,
    hostname: &str,
    path: &str,
    session: Option<&Session>,
) -> Result<Response, EndpointError> {
    let url = api_url(hostname, path)?;

    log::debug!("Sending a GET request to {}", url);

    let mut request = client.get(url);
    if let Some(session) = session {
        request = request.header(SESSION_HEADER, session.id.as_str());
    }

    check_status(request.send().await?).await
}

/// Turn a non-success response into [`EndpointError::Api`], keeping
/// whatever message the server put in the `error` field.
async fn check_status(response: Response) -> Result<Response, EndpointError> {
    let status = response.status();

    if status.is_success() {
        log::trace!("Headers: {:#?}", response.headers());
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    Err(EndpointError::Api { status, message })
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_urls_default_to_tls() {
        let got = api_url("notewell.example.com", "shares").unwrap();

        assert_eq!(got.as_str(), "https://notewell.example.com/api/shares");
    }

    #[test]
    fn explicit_schemes_are_kept() {
        let got = api_url("http://localhost:22300", "sessions").unwrap();

        assert_eq!(got.as_str(), "http://localhost:22300/api/sessions");
    }

    #[test]
    fn item_names_survive_url_construction() {
        let got =
            api_url("notewell.example.com", "items/root:/test.txt:/content")
                .unwrap();

        assert_eq!(
            got.as_str(),
            "https://notewell.example.com/api/items/root:/test.txt:/content"
        );
    }
}
