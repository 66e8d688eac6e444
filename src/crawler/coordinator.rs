//! Crawl driver - breadth-first orchestration over the worker pools
//!
//! The driver walks the link graph one depth layer at a time. Every URL of
//! the current layer is pushed through the per-host throttle into the
//! download pool; successful downloads (except in the final layer) hand
//! their document to the extraction pool, which feeds newly discovered URLs
//! into the next layer. A wait-group rendezvous closes each layer, so no
//! deeper download starts while shallower work is still in flight.

use crate::config::CrawlerConfig;
use crate::crawler::barrier::WaitGroup;
use crate::crawler::pool::WorkerPool;
use crate::crawler::throttle::HostThrottle;
use crate::fetch::{Document, Downloader};
use crate::url::{extract_host, matches_any};
use crate::{ConfigError, CrawlError, FathomError};
use dashmap::DashSet;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one [`Crawler::download`] call
#[derive(Debug, Default)]
pub struct CrawlResult {
    /// URLs fetched successfully, in no particular order
    pub downloaded: Vec<String>,

    /// Failure recorded per URL that could not be fetched
    pub errors: HashMap<String, CrawlError>,
}

/// A depth-bounded breadth-first web crawler.
///
/// The instance owns the two worker pools and the host throttle; they are
/// shared by every `download` call made through it, so the configured
/// limits hold across concurrent crawls. Host gates accumulate for the
/// crawler's lifetime.
pub struct Crawler {
    inner: Arc<CrawlerInner>,
}

struct CrawlerInner {
    downloader: Arc<dyn Downloader>,
    download_pool: WorkerPool,
    extract_pool: WorkerPool,
    throttle: HostThrottle,
    shutdown: watch::Sender<bool>,
    closed: AtomicBool,
}

/// Book-keeping for a single `download` call
struct CrawlState {
    barrier: WaitGroup,

    /// Every URL ever admitted; membership is the dedup check
    visited: DashSet<String>,

    /// URLs discovered for the next layer
    next_layer: DashSet<String>,

    downloaded: DashSet<String>,
    errors: Mutex<HashMap<String, CrawlError>>,
}

impl CrawlState {
    fn new() -> Self {
        Self {
            barrier: WaitGroup::new(),
            visited: DashSet::new(),
            next_layer: DashSet::new(),
            downloaded: DashSet::new(),
            errors: Mutex::new(HashMap::new()),
        }
    }

    fn record_error(&self, url: String, error: CrawlError) {
        self.errors.lock().unwrap().insert(url, error);
    }
}

impl Crawler {
    /// Creates a crawler with explicit limits.
    ///
    /// `downloaders` and `extractors` size the two worker pools; `per_host`
    /// caps simultaneous downloads from one origin. All three must be
    /// positive.
    pub fn new(
        downloader: Arc<dyn Downloader>,
        downloaders: usize,
        extractors: usize,
        per_host: usize,
    ) -> crate::Result<Self> {
        if downloaders == 0 || extractors == 0 || per_host == 0 {
            return Err(FathomError::Config(ConfigError::Validation(format!(
                "downloaders, extractors and per-host must be positive, got {}, {} and {}",
                downloaders, extractors, per_host
            ))));
        }

        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            inner: Arc::new(CrawlerInner {
                downloader,
                download_pool: WorkerPool::new("download", downloaders),
                extract_pool: WorkerPool::new("extract", extractors),
                throttle: HostThrottle::new(per_host),
                shutdown,
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Creates a crawler sized from a configuration section
    pub fn from_config(
        downloader: Arc<dyn Downloader>,
        config: &CrawlerConfig,
    ) -> crate::Result<Self> {
        Self::new(
            downloader,
            config.downloaders,
            config.extractors,
            config.per_host,
        )
    }

    /// Crawls breadth-first from `seed` for `depth` layers.
    ///
    /// Layer 0 fetches the seed; each later layer fetches the URLs
    /// discovered by the previous one. The final layer downloads but never
    /// extracts, so links first seen there are not followed — that is the
    /// defined meaning of `depth`. A `depth` of zero runs no layers at all.
    ///
    /// URLs containing any `excludes` substring are skipped outright and
    /// appear in neither output. URLs whose host cannot be derived are
    /// recorded in the error map without consuming any capacity. Every
    /// other failure is per-URL: the crawl always runs to completion, and
    /// the only hard error is calling this on a closed crawler.
    pub async fn download(
        &self,
        seed: &str,
        depth: u32,
        excludes: &[String],
    ) -> crate::Result<CrawlResult> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(FathomError::Closed);
        }

        let state = Arc::new(CrawlState::new());
        state.visited.insert(seed.to_string());
        state.next_layer.insert(seed.to_string());

        for layer in 0..depth {
            let batch: Vec<String> = state.next_layer.iter().map(|url| url.key().clone()).collect();
            state.next_layer.clear();
            let is_last_layer = layer + 1 == depth;

            tracing::debug!("Layer {}: {} candidate URLs", layer, batch.len());

            for url in batch {
                if matches_any(&url, excludes) {
                    tracing::debug!("Skipping excluded URL: {}", url);
                    continue;
                }

                match extract_host(&url) {
                    Ok(host) => spawn_download(&self.inner, &state, url, host, is_last_layer),
                    Err(e) => state.record_error(url, CrawlError::Malformed(e)),
                }
            }

            // layer rendezvous: downloads plus any extraction they spawned
            state.barrier.wait().await;
        }

        let downloaded: Vec<String> = state.downloaded.iter().map(|url| url.key().clone()).collect();
        let errors = std::mem::take(&mut *state.errors.lock().unwrap());

        tracing::info!(
            "Crawl finished: {} downloaded, {} failed",
            downloaded.len(),
            errors.len()
        );

        Ok(CrawlResult { downloaded, errors })
    }

    /// Shuts the crawler down.
    ///
    /// Stops accepting new `download` calls, cancels outstanding tasks and
    /// waits up to ten seconds for each pool to drain. A pool that fails to
    /// drain in time is logged as a diagnostic; `close` itself never fails,
    /// and repeated calls are no-ops.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::debug!("Closing crawler");
        let _ = self.inner.shutdown.send(true);
        self.inner.throttle.seal();
        self.inner.download_pool.close();
        self.inner.extract_pool.close();

        self.inner.download_pool.drain(SHUTDOWN_TIMEOUT).await;
        self.inner.extract_pool.drain(SHUTDOWN_TIMEOUT).await;
    }
}

fn spawn_download(
    inner: &Arc<CrawlerInner>,
    state: &Arc<CrawlState>,
    url: String,
    host: String,
    is_last_layer: bool,
) {
    state.barrier.register();

    let inner = Arc::clone(inner);
    let state = Arc::clone(state);
    let mut shutdown = inner.shutdown.subscribe();
    let tracker = inner.download_pool.track();

    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_signalled(&mut shutdown) => {
                tracing::debug!("Download of {} cancelled by shutdown", url);
            }
            _ = run_download(&inner, &state, &url, &host, is_last_layer) => {}
        }
        state.barrier.arrive();
        drop(tracker);
    });
}

async fn run_download(
    inner: &Arc<CrawlerInner>,
    state: &Arc<CrawlState>,
    url: &str,
    host: &str,
    is_last_layer: bool,
) {
    // admission first: a queued download must not occupy a pool slot
    let _admission = match inner.throttle.admit(host).await {
        Some(permit) => permit,
        None => return,
    };
    let _slot = match inner.download_pool.checkout().await {
        Some(permit) => permit,
        None => return,
    };

    match inner.downloader.fetch(url).await {
        Ok(document) => {
            state.downloaded.insert(url.to_string());
            if !is_last_layer {
                spawn_extract(inner, state, url.to_string(), document);
            }
        }
        Err(e) => {
            tracing::debug!("Fetch failed for {}: {}", url, e);
            state.record_error(url.to_string(), CrawlError::Fetch(e));
        }
    }
    // permits drop here: the slot frees a download worker and the
    // admission lets the host's next queued task through
}

fn spawn_extract(
    inner: &Arc<CrawlerInner>,
    state: &Arc<CrawlState>,
    url: String,
    document: Box<dyn Document>,
) {
    // registered before the download task arrives, so the layer stays open
    state.barrier.register();

    let inner = Arc::clone(inner);
    let state = Arc::clone(state);
    let mut shutdown = inner.shutdown.subscribe();
    let tracker = inner.extract_pool.track();

    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_signalled(&mut shutdown) => {
                tracing::debug!("Extraction for {} cancelled by shutdown", url);
            }
            _ = run_extract(&inner, &state, &url, document) => {}
        }
        state.barrier.arrive();
        drop(tracker);
    });
}

async fn run_extract(
    inner: &CrawlerInner,
    state: &Arc<CrawlState>,
    url: &str,
    document: Box<dyn Document>,
) {
    let _slot = match inner.extract_pool.checkout().await {
        Some(permit) => permit,
        None => return,
    };

    match document.extract_links() {
        Ok(links) => {
            for link in links {
                if state.visited.insert(link.clone()) {
                    state.next_layer.insert(link);
                }
            }
        }
        Err(e) => {
            // the page itself still counts as downloaded
            tracing::warn!("Link extraction failed for {}: {}", url, e);
        }
    }
}

async fn shutdown_signalled(shutdown: &mut watch::Receiver<bool>) {
    // a closed channel means the crawler is gone, which counts as shutdown
    let _ = shutdown.wait_for(|stop| *stop).await;
}
