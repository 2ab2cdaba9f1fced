//! Remote media library boundary.
//!
//! The download engine only sees these traits: a gateway that logs in, a
//! session that may demand one second-factor code and lists assets, and
//! asset handles that can open a byte stream. [`http::HttpGateway`] is the
//! production implementation.

pub mod error;
pub mod http;
#[cfg(test)]
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::BoxStream;

pub use error::{AuthError, GatewayError, StreamError};

/// Chunks of remote file content in arrival order. Chunk sizes are
/// whatever the transport yields; the downloader re-chunks them.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, StreamError>>;

/// Operator credentials. The secret is never printed.
#[derive(Clone)]
pub struct Credentials {
    pub identity: String,
    pub secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[async_trait::async_trait]
pub trait SessionGateway: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Box<dyn Session>, AuthError>;
}

#[async_trait::async_trait]
pub trait Session: Send + Sync {
    fn requires_second_factor(&self) -> bool;

    /// Submit the one-time code. `Ok(false)` means the service refused it.
    async fn submit_second_factor_code(&mut self, code: &str) -> Result<bool, AuthError>;

    /// Enumerate every asset once, in service order.
    async fn list_assets(&self) -> Result<Vec<Arc<dyn RemoteAsset>>, GatewayError>;
}

#[async_trait::async_trait]
pub trait RemoteAsset: Send + Sync {
    fn filename(&self) -> &str;

    /// Open the content stream. Implementations should honour `timeout`
    /// for the request head; the downloader enforces it regardless.
    async fn open_stream(&self, timeout: Duration) -> Result<ByteStream, StreamError>;
}
