//! File-system backed [`Source`] used for tests and offline runs.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::types::RasterImage;

use super::Source;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Enumerates a directory of image files at construction and yields them in
/// sorted-by-filename order.
pub struct DiskSource {
    current_id: String,
    current_content: RasterImage,
    pending: VecDeque<PathBuf>,
}

impl DiskSource {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, SourceError> {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| {
                warn!(dir = %dir.display(), error = %e, "failed to read disk source directory");
                SourceError::NoImageAvailable
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();

        let mut pending: VecDeque<PathBuf> = files.into();
        let first = pending.pop_front().ok_or(SourceError::NoImageAvailable)?;
        let (current_id, current_content) = Self::load(&first)?;

        debug!(count = pending.len() + 1, dir = %dir.display(), "disk source enumerated images");

        Ok(Self {
            current_id,
            current_content,
            pending,
        })
    }

    fn load(path: &Path) -> Result<(String, RasterImage), SourceError> {
        let id = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(SourceError::NoImageAvailable)?
            .to_string();
        let bytes = std::fs::read(path).map_err(|_| SourceError::NoImageAvailable)?;
        Ok((id, RasterImage::from_bytes(bytes)))
    }
}

#[async_trait]
impl Source for DiskSource {
    async fn next(&mut self) -> Result<(), SourceError> {
        let path = self.pending.pop_front().ok_or(SourceError::NoImageAvailable)?;
        let (id, content) = Self::load(&path)?;
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
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str) {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]));
        image::DynamicImage::ImageRgb8(img)
            .save_with_format(dir.join(name), image::ImageFormat::Png)
            .unwrap();
    }

    #[tokio::test]
    async fn enumerates_in_sorted_order_and_loads_first_eagerly() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "b.png");
        write_png(dir.path(), "a.png");

        let mut source = DiskSource::new(dir.path()).unwrap();
        assert_eq!(source.current_id(), "a.png");

        source.next().await.unwrap();
        assert_eq!(source.current_id(), "b.png");

        assert!(matches!(source.next().await, Err(SourceError::NoImageAvailable)));
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "only.png");
        let mut source = DiskSource::new(dir.path()).unwrap();
        source.shutdown().await;
        source.shutdown().await;
    }

    #[test]
    fn empty_directory_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DiskSource::new(dir.path()).is_err());
    }
}
