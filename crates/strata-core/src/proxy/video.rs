//! Video service collaborator, its caching proxy, and the client that uses either.

use super::{CacheProxy, Invalidate};
use crate::StrataError;
use crate::primitives::{DEFAULT_CATALOG_SIZE, DEFAULT_SERVICE_LATENCY_MS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Identifier of a video in a service's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VideoId(pub u64);

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The operations a video service offers.
///
/// Implementations are assumed slow and occasionally failing; failures are
/// reported as `StrataError::DelegationFailure`.
pub trait VideoService: Send + Sync {
    /// List the available videos.
    fn list(&self) -> Result<String, StrataError>;

    /// Describe one video.
    fn info(&self, id: VideoId) -> Result<String, StrataError>;

    /// Fetch one video.
    fn download(&self, id: VideoId) -> Result<String, StrataError>;
}

/// Request identity used as the proxy's cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    /// `VideoService::list`.
    List,
    /// `VideoService::info`.
    Info(VideoId),
    /// `VideoService::download`.
    Download(VideoId),
}

// =============================================================================
// SIMULATED THIRD-PARTY SERVICE
// =============================================================================

/// An in-process stand-in for a remote video service.
///
/// Every call sleeps for the configured latency and is counted. Ids outside
/// the catalog fail.
#[derive(Debug)]
pub struct ThirdPartyVideoService {
    catalog: BTreeMap<VideoId, String>,
    latency: Duration,
    calls: AtomicU64,
}

impl Default for ThirdPartyVideoService {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SERVICE_LATENCY_MS))
    }
}

impl ThirdPartyVideoService {
    /// Create a service with the default catalog and the given latency.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        let catalog = (1..=DEFAULT_CATALOG_SIZE)
            .map(|n| (VideoId(n), format!("Video {n}")))
            .collect();
        Self::with_catalog(catalog, latency)
    }

    /// Create a service serving exactly `catalog`.
    #[must_use]
    pub fn with_catalog(catalog: BTreeMap<VideoId, String>, latency: Duration) -> Self {
        Self {
            catalog,
            latency,
            calls: AtomicU64::new(0),
        }
    }

    /// Number of requests this service has processed.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn serve(&self, what: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::info!(latency_ms = self.latency.as_millis() as u64, "service processing {what} request");
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
    }

    fn title(&self, id: VideoId) -> Result<&str, StrataError> {
        self.catalog
            .get(&id)
            .map(String::as_str)
            .ok_or_else(|| StrataError::DelegationFailure(format!("video {id} does not exist")))
    }
}

impl VideoService for ThirdPartyVideoService {
    fn list(&self) -> Result<String, StrataError> {
        self.serve("list");
        let titles: Vec<String> = self
            .catalog
            .iter()
            .map(|(id, title)| format!("{id} {title}"))
            .collect();
        Ok(format!("Videos: {}", titles.join(", ")))
    }

    fn info(&self, id: VideoId) -> Result<String, StrataError> {
        self.serve("info");
        let title = self.title(id)?;
        Ok(format!("Video {id}: {title}"))
    }

    fn download(&self, id: VideoId) -> Result<String, StrataError> {
        self.serve("download");
        let title = self.title(id)?;
        Ok(format!("<video {id} \"{title}\">"))
    }
}

// =============================================================================
// CACHING PROXY
// =============================================================================

/// A `VideoService` that answers repeated requests from a per-request cache.
#[derive(Debug)]
pub struct VideoProxy<S> {
    service: S,
    cache: CacheProxy<Request, String>,
}

impl<S: VideoService> VideoProxy<S> {
    /// Front `service` with an empty cache.
    pub fn new(service: S) -> Self {
        Self {
            service,
            cache: CacheProxy::new(),
        }
    }

    /// The proxied service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The underlying cache, for inspection.
    pub fn cache(&self) -> &CacheProxy<Request, String> {
        &self.cache
    }

    /// Alias of `invalidate`.
    pub fn reset(&self) {
        self.invalidate();
    }
}

impl<S: VideoService> VideoService for VideoProxy<S> {
    fn list(&self) -> Result<String, StrataError> {
        self.cache.fetch(&Request::List, || self.service.list())
    }

    fn info(&self, id: VideoId) -> Result<String, StrataError> {
        self.cache.fetch(&Request::Info(id), || self.service.info(id))
    }

    fn download(&self, id: VideoId) -> Result<String, StrataError> {
        self.cache
            .fetch(&Request::Download(id), || self.service.download(id))
    }
}

impl<S> Invalidate for VideoProxy<S> {
    fn invalidate(&self) {
        self.cache.invalidate();
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// A client that renders pages from any `VideoService`.
///
/// Handing it a `VideoProxy` instead of the real service is invisible to it.
#[derive(Debug)]
pub struct VideoManager<S> {
    service: S,
}

impl<S: VideoService> VideoManager<S> {
    /// Create a manager over `service`.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// The service in use.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Render the page of one video.
    pub fn render_video_page(&self, id: VideoId) -> Result<String, StrataError> {
        self.service.info(id)
    }

    /// Render the list of video previews.
    pub fn render_list_panel(&self) -> Result<String, StrataError> {
        self.service.list()
    }

    /// Render the list panel followed by the page of `id`.
    pub fn react_on_user_input(&self, id: VideoId) -> Result<String, StrataError> {
        let panel = self.render_list_panel()?;
        let page = self.render_video_page(id)?;
        Ok(format!("{panel}\n{page}"))
    }
}

impl<S: VideoService + Invalidate> VideoManager<S> {
    /// Drop everything the service has cached.
    pub fn reset(&self) {
        self.service.invalidate();
    }
}

// =============================================================================
// TESTS
// =============================================================================
