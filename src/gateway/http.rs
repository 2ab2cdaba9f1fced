//! JSON media-library gateway over `reqwest`.
//!
//! Endpoints, relative to the service base URL:
//! - `POST auth/login`  `{"identity","secret"}` → `{"session_token","requires_second_factor"}`
//! - `POST auth/verify` `{"code"}` (bearer) → 2xx when accepted
//! - `GET  assets` (bearer) → `{"assets":[{"filename","download_url"}],"next_page"?}`
//!
//! Asset content is fetched from each entry's `download_url` with the same
//! bearer token.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{
    AuthError, ByteStream, Credentials, GatewayError, RemoteAsset, Session, SessionGateway,
    StreamError,
};

const USER_AGENT: &str = concat!("icloud-media-dl/", env!("CARGO_PKG_VERSION"));

/// Applied to login, verify and listing calls. Asset downloads are bounded
/// only by the caller's acquisition timeout, never by a total deadline.
const API_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Guards against a service that keeps handing out the same page.
const MAX_PAGES: usize = 100_000;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    session_token: String,
    #[serde(default)]
    requires_second_factor: bool,
}

#[derive(Debug, Deserialize)]
struct AssetPage {
    assets: Vec<AssetEntry>,
    #[serde(default)]
    next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssetEntry {
    filename: String,
    download_url: String,
}

pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Map a non-success login status to the matching auth failure.
fn login_failure(status: StatusCode, body: String) -> AuthError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AuthError::BadCredentials,
        _ => AuthError::Protocol(format!("login returned HTTP {}: {}", status.as_u16(), body)),
    }
}

/// `Some(accepted)` for statuses that answer the code question; `None`
/// means the service itself failed.
fn verify_verdict(status: StatusCode) -> Option<bool> {
    if status.is_success() {
        Some(true)
    } else if matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    ) {
        Some(false)
    } else {
        None
    }
}

#[async_trait::async_trait]
impl SessionGateway for HttpGateway {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Box<dyn Session>, AuthError> {
        tracing::debug!("Authenticating as {}", credentials.identity);
        let body = serde_json::json!({
            "identity": credentials.identity,
            "secret": credentials.secret,
        });
        let response = self
            .client
            .post(endpoint(&self.base_url, "auth/login"))
            .timeout(API_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(login_failure(status, text));
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Protocol(format!("unreadable login response: {e}")))?;

        Ok(Box::new(HttpSession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Arc::from(login.session_token),
            requires_second_factor: login.requires_second_factor,
        }))
    }
}

struct HttpSession {
    client: Client,
    base_url: String,
    token: Arc<str>,
    requires_second_factor: bool,
}

impl HttpSession {
    async fn fetch_page(&self, url: &str) -> Result<AssetPage, GatewayError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .timeout(API_TIMEOUT)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::ApiStatus {
                status: status.as_u16(),
                message,
            });
        }
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| GatewayError::Malformed(e.to_string()))
    }
}

#[async_trait::async_trait]
impl Session for HttpSession {
    fn requires_second_factor(&self) -> bool {
        self.requires_second_factor
    }

    async fn submit_second_factor_code(&mut self, code: &str) -> Result<bool, AuthError> {
        let response = self
            .client
            .post(endpoint(&self.base_url, "auth/verify"))
            .bearer_auth(&self.token)
            .timeout(API_TIMEOUT)
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await?;

        let status = response.status();
        match verify_verdict(status) {
            Some(accepted) => {
                if accepted {
                    self.requires_second_factor = false;
                }
                Ok(accepted)
            }
            None => {
                let text = response.text().await.unwrap_or_default();
                Err(AuthError::Protocol(format!(
                    "verification returned HTTP {}: {}",
                    status.as_u16(),
                    text
                )))
            }
        }
    }

    async fn list_assets(&self) -> Result<Vec<Arc<dyn RemoteAsset>>, GatewayError> {
        let mut assets: Vec<Arc<dyn RemoteAsset>> = Vec::new();
        let mut next = Some(endpoint(&self.base_url, "assets"));
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(GatewayError::Malformed(format!(
                    "asset listing exceeded {MAX_PAGES} pages"
                )));
            }
            let page = self.fetch_page(&url).await?;
            tracing::debug!("Fetched asset page {} with {} entries", pages, page.assets.len());
            for entry in page.assets {
                assets.push(Arc::new(HttpAsset {
                    client: self.client.clone(),
                    token: Arc::clone(&self.token),
                    filename: entry.filename,
                    download_url: entry.download_url,
                }));
            }
            next = page.next_page.filter(|n| *n != url);
        }

        Ok(assets)
    }
}

struct HttpAsset {
    client: Client,
    token: Arc<str>,
    filename: String,
    download_url: String,
}

#[async_trait::async_trait]
impl RemoteAsset for HttpAsset {
    fn filename(&self) -> &str {
        &self.filename
    }

    async fn open_stream(&self, timeout: Duration) -> Result<ByteStream, StreamError> {
        let request = self
            .client
            .get(&self.download_url)
            .bearer_auth(&self.token)
            .send();
        let response = tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| {
                StreamError::Other(format!("no response within {}s", timeout.as_secs()))
            })??;

        if !response.status().is_success() {
            return Err(StreamError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(StreamError::from))
            .boxed())
    }
}
