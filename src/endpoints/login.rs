use crate::Session;
use reqwest::{Client, Method, StatusCode};
use serde_derive::{Deserialize, Serialize};

/// Authenticate with the sync server and start a new [`Session`].
pub async fn login(
    client: &Client,
    hostname: &str,
    email: &str,
    password: &str,
) -> Result<Session, LoginError> {
    let data = Data { email, password };

    let response =
        super::send_json(client, Method::POST, hostname, "sessions", None, &data)
            .await
            .map_err(interpret_error)?;

    let session: Session = response
        .json()
        .await
        .map_err(|e| LoginError::Endpoint(e.into()))?;

    log::info!("Logged in as {}", email);

    Ok(session)
}

fn interpret_error(err: super::EndpointError) -> LoginError {
    match err {
        super::EndpointError::Api { status, message }
            if status == StatusCode::UNAUTHORIZED
                || status == StatusCode::FORBIDDEN =>
        {
            log::error!("Login failed: {}", message);
            LoginError::RejectedByServer { message }
        },
        other => LoginError::Endpoint(other),
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
struct Data<'a> {
    email: &'a str,
    password: &'a str,
}

/// Possible errors that may be returned by [`login()`].
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// The request itself failed.
    #[error("Unable to send the login request")]
    Endpoint(#[from] super::EndpointError),
    /// The server refused the credentials.
    #[error("Login was rejected by the server: {}", message)]
    RejectedByServer { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_session_response() {
        let src = r#"{
            "id": "c0ffee00c0ffee00c0ffee00c0ffee00",
            "user_id": "7b8a9cad00112233445566778899aabb"
        }"#;

        let got: Session = serde_json::from_str(src).unwrap();

        assert_eq!(got.id.as_str(), "c0ffee00c0ffee00c0ffee00c0ffee00");
        assert_eq!(got.user_id.as_str(), "7b8a9cad00112233445566778899aabb");
    }

    #[test]
    fn forbidden_becomes_rejected_by_server() {
        let err = super::super::EndpointError::Api {
            status: StatusCode::FORBIDDEN,
            message: String::from("Invalid username or password"),
        };

        match interpret_error(err) {
            LoginError::RejectedByServer { message } => {
                assert_eq!(message, "Invalid username or password")
            },
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[test]
    fn other_api_errors_pass_through() {
        let err = super::super::EndpointError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::from("boom"),
        };

        assert!(matches!(
            interpret_error(err),
            LoginError::Endpoint(super::super::EndpointError::Api { .. })
        ));
    }
}
