//! In-memory gateway used by the engine tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};

use super::{
    AuthError, ByteStream, Credentials, GatewayError, RemoteAsset, Session, SessionGateway,
    StreamError,
};
use crate::pause::PauseController;

pub const SECOND_FACTOR_CODE: &str = "123456";

#[derive(Clone)]
pub struct MemoryAsset {
    filename: String,
    chunks: Vec<Vec<u8>>,
    open_delay: Duration,
    fail_open: bool,
    break_after: Option<usize>,
    toggle_pause_at: Option<(usize, PauseController)>,
    opens: Arc<AtomicUsize>,
}

impl MemoryAsset {
    pub fn new(filename: &str, content: &[u8]) -> Self {
        Self::chunked(filename, vec![content.to_vec()])
    }

    pub fn chunked(filename: &str, chunks: Vec<Vec<u8>>) -> Self {
        Self {
            filename: filename.to_string(),
            chunks,
            open_delay: Duration::ZERO,
            fail_open: false,
            break_after: None,
            toggle_pause_at: None,
            opens: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Delay before the stream is handed out, to trip acquisition timeouts.
    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Yield `n` chunks, then an error.
    pub fn breaking_after(mut self, n: usize) -> Self {
        self.break_after = Some(n);
        self
    }

    /// Flip `pause` right before chunk `index` is yielded.
    pub fn toggling_pause_at(mut self, index: usize, pause: PauseController) -> Self {
        self.toggle_pause_at = Some((index, pause));
        self
    }

    pub fn content(&self) -> Vec<u8> {
        self.chunks.concat()
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RemoteAsset for MemoryAsset {
    fn filename(&self) -> &str {
        &self.filename
    }

    async fn open_stream(&self, _timeout: Duration) -> Result<ByteStream, StreamError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if !self.open_delay.is_zero() {
            tokio::time::sleep(self.open_delay).await;
        }
        if self.fail_open {
            return Err(StreamError::HttpStatus { status: 404 });
        }

        let limit = self.break_after.unwrap_or(usize::MAX);
        let broken = self.break_after.is_some();
        let toggle = self.toggle_pause_at.clone();
        let items: Vec<Result<Vec<u8>, StreamError>> = self
            .chunks
            .iter()
            .take(limit)
            .cloned()
            .map(Ok)
            .chain(broken.then(|| Err(StreamError::Other("connection reset".into()))))
            .collect();

        Ok(stream::iter(items.into_iter().enumerate())
            .map(move |(index, item)| {
                if let Some((at, pause)) = &toggle {
                    if *at == index {
                        pause.toggle();
                    }
                }
                item
            })
            .boxed())
    }
}

pub struct MemoryGateway {
    identity: String,
    secret: String,
    second_factor: bool,
    assets: Vec<MemoryAsset>,
    fail_listing: bool,
}

impl MemoryGateway {
    pub fn new(assets: Vec<MemoryAsset>) -> Self {
        Self {
            identity: "user@example.com".into(),
            secret: "hunter2".into(),
            second_factor: false,
            assets,
            fail_listing: false,
        }
    }

    pub fn with_second_factor(mut self) -> Self {
        self.second_factor = true;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn credentials() -> Credentials {
        Credentials {
            identity: "user@example.com".into(),
            secret: "hunter2".into(),
        }
    }

    pub fn session(&self) -> MemorySession {
        MemorySession {
            second_factor_pending: self.second_factor,
            assets: self.assets.clone(),
            fail_listing: self.fail_listing,
        }
    }
}

#[async_trait::async_trait]
impl SessionGateway for MemoryGateway {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Box<dyn Session>, AuthError> {
        if credentials.identity != self.identity || credentials.secret != self.secret {
            return Err(AuthError::BadCredentials);
        }
        Ok(Box::new(self.session()))
    }
}

pub struct MemorySession {
    second_factor_pending: bool,
    assets: Vec<MemoryAsset>,
    fail_listing: bool,
}

#[async_trait::async_trait]
impl Session for MemorySession {
    fn requires_second_factor(&self) -> bool {
        self.second_factor_pending
    }

    async fn submit_second_factor_code(&mut self, code: &str) -> Result<bool, AuthError> {
        let accepted = code == SECOND_FACTOR_CODE;
        if accepted {
            self.second_factor_pending = false;
        }
        Ok(accepted)
    }

    async fn list_assets(&self) -> Result<Vec<Arc<dyn RemoteAsset>>, GatewayError> {
        if self.fail_listing {
            return Err(GatewayError::ApiStatus {
                status: 503,
                message: "library unavailable".into(),
            });
        }
        Ok(self
            .assets
            .iter()
            .cloned()
            .map(|a| Arc::new(a) as Arc<dyn RemoteAsset>)
            .collect())
    }
}
