// Admin authentication
//
// Email/password login against `POST /admin/login`. The response carries a
// JWT in `data.token`; it becomes the bearer header of the returned client.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{DataEnvelope, LoginData};
use crate::transport::TransportConfig;

const LOGIN_PATH: &str = "/admin/login";

impl AdminClient {
    /// Log in with admin credentials and return an authenticated client.
    pub async fn login(
        base_url: Url,
        email: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let token = request_token(&base_url, email, password, transport).await?;
        Self::new(base_url, &token, transport)
    }
}

/// Exchange credentials for a bearer token.
///
/// A response without `data.token` is an authentication failure whose
/// message carries the account and the raw response body. The password is
/// never included.
pub async fn request_token(
    base_url: &Url,
    email: &str,
    password: &SecretString,
    transport: &TransportConfig,
) -> Result<SecretString, Error> {
    let http = transport.build_client()?;
    let url = base_url.join(LOGIN_PATH)?;

    debug!("logging in at {url}");

    let body = json!({
        "email": email,
        "password": password.expose_secret(),
    });

    let resp = http.post(url).json(&body).send().await?;
    let status = resp.status();
    let raw = resp.text().await?;

    let token = serde_json::from_str::<DataEnvelope<LoginData>>(&raw)
        .ok()
        .and_then(|envelope| envelope.data)
        .and_then(|data| data.token)
        .filter(|token| !token.is_empty());

    match token {
        Some(token) => {
            debug!("login successful");
            Ok(SecretString::from(token))
        }
        None => {
            let response = serde_json::from_str::<Value>(&raw)
                .map_or_else(|_| raw.clone(), |value| value.to_string());
            Err(Error::Authentication {
                message: format!(
                    "failed to login with email {email} (HTTP {status}); response was: {response}"
                ),
            })
        }
    }
}
