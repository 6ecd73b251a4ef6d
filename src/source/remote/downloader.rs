//! Batched, rate-limit-aware downloader backing [`super::RemoteSource`].
//!
//! Pairs a semaphore-bounded worker pool with a
//! `tokio_util::sync::CancellationToken`, refilling the internal FIFO from
//! an interval-ticked background loop rather than on every `next()` call.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::id_cursor::IdCursor;
use super::rate_limit::FailureCounter;
use crate::error::{ImageDownloadError, SourceError};
use crate::types::RasterImage;

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub base_url: String,
    /// CSS selector for the element that carries the image URL.
    pub image_selector: String,
    /// Attribute on the matched element holding the absolute/relative URL.
    pub image_attr: String,
    pub worker_count: usize,
    pub low_water_mark: usize,
    pub batch_size: usize,
    pub fifo_capacity: usize,
    pub failure_warn_every: u32,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub next_timeout: Duration,
    pub user_agent: String,
    pub poll_interval: Duration,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example-gallery.invalid".to_string(),
            image_selector: "#screenshot".to_string(),
            image_attr: "src".to_string(),
            worker_count: 2,
            low_water_mark: 8,
            batch_size: 4,
            fifo_capacity: 16,
            failure_warn_every: 5,
            connect_timeout: Duration::from_millis(1500),
            read_timeout: Duration::from_secs(10),
            next_timeout: Duration::from_secs(10),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
            poll_interval: Duration::from_millis(200),
        }
    }
}

struct Downloaded {
    id: String,
    content: RasterImage,
}

/// Owns the background refill task and the internal FIFO of downloaded
/// images; `next()` pulls from that FIFO with a bounded wait.
pub struct GalleryBatchDownloader {
    rx: mpsc::Receiver<Downloaded>,
    fifo_len: Arc<AtomicUsize>,
    cancel: CancellationToken,
    task: Option<tokio::task::JoinHandle<()>>,
    next_timeout: Duration,
    failures: FailureCounter,
}

impl GalleryBatchDownloader {
    pub fn spawn(config: GalleryConfig, seed_id: &str) -> Self {
        let failures = FailureCounter::new(config.failure_warn_every);
        Self::spawn_with_counter(config, seed_id, failures)
    }

    /// Test seam: inject a [`FailureCounter`] so tests can observe the
    /// rate-limit warning cadence without racing a real clock.
    pub fn spawn_with_counter(config: GalleryConfig, seed_id: &str, failures: FailureCounter) -> Self {
        let (tx, rx) = mpsc::channel(config.fifo_capacity.max(1));
        let fifo_len = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .expect("failed to build gallery http client");

        let cursor = IdCursor::new(seed_id);
        let next_timeout = config.next_timeout;
        let task_cancel = cancel.clone();
        let task_failures = failures.clone();
        let task_len = fifo_len.clone();

        let task = tokio::spawn(refill_loop(
            config, client, cursor, tx, task_len, task_cancel, task_failures,
        ));

        Self {
            rx,
            fifo_len,
            cancel,
            task: Some(task),
            next_timeout,
            failures,
        }
    }

    pub fn fifo_len(&self) -> usize {
        self.fifo_len.load(Ordering::Acquire)
    }

    pub fn failure_counter(&self) -> &FailureCounter {
        &self.failures
    }

    pub async fn next(&mut self) -> Result<(String, RasterImage), SourceError> {
        let wait = tokio::time::timeout(self.next_timeout, self.rx.recv()).await;
        match wait {
            Ok(Some(item)) => {
                self.fifo_len.fetch_sub(1, Ordering::AcqRel);
                Ok((item.id, item.content))
            }
            Ok(None) => Err(SourceError::NoImageAvailable),
            Err(_) => Err(SourceError::NoImageAvailable),
        }
    }

    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn refill_loop(
    config: GalleryConfig,
    client: Client,
    mut cursor: IdCursor,
    tx: mpsc::Sender<Downloaded>,
    fifo_len: Arc<AtomicUsize>,
    cancel: CancellationToken,
    failures: FailureCounter,
) {
    let permits = Arc::new(Semaphore::new(config.worker_count.max(1)));
    let mut ticker = tokio::time::interval(config.poll_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        if fifo_len.load(Ordering::Acquire) > config.low_water_mark {
            continue;
        }

        for _ in 0..config.batch_size {
            let id = cursor.next_id().to_string();
            let permit = match permits.clone().try_acquire_owned() {
                Ok(p) => p,
                Err(_) => break, // worker pool saturated; try again next tick
            };

            let client = client.clone();
            let tx = tx.clone();
            let fifo_len = fifo_len.clone();
            let failures = failures.clone();
            let cancel = cancel.clone();
            let config = config.clone();

            tokio::spawn(async move {
                let _permit = permit;
                run_job(&config, &client, id, tx, fifo_len, failures, cancel).await;
            });
        }
    }
}

async fn run_job(
    config: &GalleryConfig,
    client: &Client,
    id: String,
    tx: mpsc::Sender<Downloaded>,
    fifo_len: Arc<AtomicUsize>,
    failures: FailureCounter,
    cancel: CancellationToken,
) {
    if cancel.is_cancelled() {
        return;
    }

    match fetch_image(config, client, &id).await {
        Ok(content) => {
            failures.record_success();
            if tx
                .send(Downloaded {
                    id: id.clone(),
                    content,
                })
                .await
                .is_ok()
            {
                fifo_len.fetch_add(1, Ordering::AcqRel);
                debug!(id = %id, "image enqueued");
            }
        }
        Err(e) => {
            if failures.record_failure() {
                warn!(
                    consecutive_failures = failures.current(),
                    "gallery download rate limit: repeated failures fetching images"
                );
            }
            debug!(id = %id, error = %e, "image fetch failed, discarding");
        }
    }
}

async fn fetch_image(config: &GalleryConfig, client: &Client, id: &str) -> Result<RasterImage, ImageDownloadError> {
    let page_url = format!("{}/{}", config.base_url.trim_end_matches('/'), id);
    let image_url = resolve_image_url(config, client, &page_url).await?;

    let response = client
        .get(&image_url)
        .send()
        .await
        .map_err(map_net_error)?;

    if !response.status().is_success() {
        return Err(ImageDownloadError::HttpStatus {
            status: response.status().as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(map_net_error)?;
    Ok(RasterImage::from_bytes(bytes))
}

async fn resolve_image_url(config: &GalleryConfig, client: &Client, page_url: &str) -> Result<String, ImageDownloadError> {
    let response = client.get(page_url).send().await.map_err(map_net_error)?;
    if !response.status().is_success() {
        return Err(ImageDownloadError::HttpStatus {
            status: response.status().as_u16(),
        });
    }
    let body = response.text().await.map_err(map_net_error)?;

    let selector = Selector::parse(&config.image_selector).map_err(|_| ImageDownloadError::NoImageElement)?;
    let document = Html::parse_document(&body);
    let element = document
        .select(&selector)
        .next()
        .ok_or(ImageDownloadError::NoImageElement)?;
    let src = element
        .value()
        .attr(&config.image_attr)
        .ok_or(ImageDownloadError::NoImageElement)?;

    Ok(absolutize(&config.base_url, src))
}

fn absolutize(base: &str, maybe_relative: &str) -> String {
    if maybe_relative.starts_with("http://") || maybe_relative.starts_with("https://") {
        maybe_relative.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), maybe_relative.trim_start_matches('/'))
    }
}

fn map_net_error(e: reqwest::Error) -> ImageDownloadError {
    if e.is_timeout() {
        ImageDownloadError::Timeout
    } else {
        ImageDownloadError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> GalleryConfig {
        GalleryConfig {
            base_url,
            image_selector: "#shot".to_string(),
            image_attr: "src".to_string(),
            worker_count: 2,
            low_water_mark: 1,
            batch_size: 2,
            fifo_capacity: 8,
            failure_warn_every: 5,
            connect_timeout: Duration::from_millis(500),
            read_timeout: Duration::from_secs(5),
            next_timeout: Duration::from_secs(2),
            user_agent: "test-agent/1.0".to_string(),
            poll_interval: Duration::from_millis(20),
        }
    }

    #[tokio::test]
    async fn downloads_image_found_via_html_selector() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/000000"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><img id="shot" src="/static/img.png"></body></html>"#,
            ))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/static/img.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
            .mount(&server)
            .await;

        // seed "zzzzzz" so the first generated id wraps to "000000", matching the mock.
        let mut downloader = GalleryBatchDownloader::spawn(test_config(server.uri()), "zzzzzz");
        let (id, content) = downloader.next().await.expect("expected a downloaded image");
        assert!(!id.is_empty());
        assert!(!content.is_empty());
        downloader.shutdown().await;
    }

    #[tokio::test]
    async fn next_times_out_to_no_image_available_when_source_is_empty() {
        let server = MockServer::start().await;
        // No mocks registered: every page fetch 404s, so the FIFO stays empty.
        let mut config = test_config(server.uri());
        config.next_timeout = Duration::from_millis(300);

        let mut downloader = GalleryBatchDownloader::spawn(config, "000000");
        let result = downloader.next().await;
        assert!(matches!(result, Err(SourceError::NoImageAvailable)));
        downloader.shutdown().await;
    }
}
