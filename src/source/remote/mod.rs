//! Default remote [`super::Source`]: a public screenshot gallery addressed
//! by 6-character base-36 identifiers, fed by a batched downloader.

mod downloader;
mod id_cursor;
mod rate_limit;

pub use downloader::GalleryConfig;
pub use id_cursor::IdCursor;
pub use rate_limit::FailureCounter;

use async_trait::async_trait;
use tracing::info;

use crate::error::SourceError;
use crate::types::RasterImage;

use self::downloader::GalleryBatchDownloader;
use super::Source;

pub struct RemoteSource {
    downloader: GalleryBatchDownloader,
    current_id: String,
    current_content: RasterImage,
}

impl RemoteSource {
    /// Construct with a valid first image already loaded, per the `Source`
    /// contract.
    pub async fn connect(config: GalleryConfig, seed_id: &str) -> Result<Self, SourceError> {
        let mut downloader = GalleryBatchDownloader::spawn(config, seed_id);
        let (current_id, current_content) = downloader.next().await?;
        info!(id = %current_id, "remote source connected");
        Ok(Self {
            downloader,
            current_id,
            current_content,
        })
    }
}

#[async_trait]
impl Source for RemoteSource {
    async fn next(&mut self) -> Result<(), SourceError> {
        let (id, content) = self.downloader.next().await?;
        self.current_id = id;
        self.current_content = content;
        Ok(())
    }

    fn current_id(&self) -> &str {
        &self.current_id
    }

    fn current_content(&self) -> &RasterImage {
        &self.current_content
    }

    async fn shutdown(&mut self) {
        self.downloader.shutdown().await;
    }
}
