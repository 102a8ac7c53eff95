// Admin API HTTP client
//
// Wraps `reqwest::Client` with bearer-token auth, absolute-path URL
// construction and uniform response handling. Endpoint groups (content
// manager, media library) are implemented as inherent methods in separate
// files to keep this module focused on transport mechanics.

use std::future::Future;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Page size used for every paginated listing.
pub const PAGE_SIZE: u32 = 100;

/// Error body shape returned by the admin API: `{"error":{"status":N,"message":"..."}}`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Authenticated client for one backend instance.
///
/// Every request carries the `Authorization: Bearer <token>` header obtained
/// from [`AdminClient::login`]. Asset downloads go through a separate plain
/// client so the token never leaks to external storage hosts.
#[derive(Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    downloads: reqwest::Client,
    base_url: Url,
}

impl AdminClient {
    /// Build a client from an already issued bearer token.
    pub fn new(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid bearer token header value: {e}"),
            })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        Ok(Self {
            http: transport.build_client_with_headers(headers)?,
            downloads: transport.build_client()?,
            base_url,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            downloads: http.clone(),
            http,
            base_url,
        }
    }

    /// The instance base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an absolute API path (e.g. `/upload/folders`) against the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Resolve a file URL as reported by the media library.
    ///
    /// Local providers report relative paths (`/uploads/x.png`); cloud
    /// providers report absolute URLs which are returned untouched.
    pub fn absolute_url(&self, raw: &str) -> Result<Url, Error> {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(Url::parse(raw)?);
        }
        self.url(raw)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::handle_empty(resp).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        form: reqwest::multipart::Form,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url} params={params:?} (multipart)");

        let resp = self
            .http
            .post(url)
            .query(params)
            .multipart(form)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// GET an arbitrary URL without the bearer header.
    pub(crate) async fn get_unauthenticated(&self, url: Url) -> Result<reqwest::Response, Error> {
        debug!("GET {url} (download)");

        let resp = self.downloads.get(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: format!("token rejected (HTTP {status})"),
            };
        }

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                }
            });

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

// ── Pagination helper ────────────────────────────────────────────────

/// Collect every page of a page-number paginated listing.
///
/// Requests pages `1, 2, ...` of `page_size` items and stops at the first
/// page holding fewer than `page_size` items.
pub async fn paginate<T, F, Fut>(page_size: u32, mut fetch: F) -> Result<Vec<T>, Error>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, Error>>,
{
    let mut all = Vec::new();
    let mut page = 1;
    let limit = usize::try_from(page_size).unwrap_or(usize::MAX);

    loop {
        let items = fetch(page, page_size).await?;
        let received = items.len();
        all.extend(items);

        if received < limit {
            break;
        }
        page += 1;
    }

    Ok(all)
}
