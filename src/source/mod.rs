//! Pluggable image providers, the pipeline's ingress.

pub mod disk;
pub mod remote;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::types::RasterImage;

/// A lazy, possibly-finite sequence of `(id, image)` pairs.
///
/// Implementations are not required to be thread-safe; the pipeline
/// confines a `Source` to a single stage task for its entire lifetime.
/// A `Source` must be constructed with a valid first image already loaded,
/// so `current_id`/`current_content` are meaningful before the first call
/// to `next`.
#[async_trait]
pub trait Source: Send {
    /// Advance to the next image. On success, `current_id`/`current_content`
    /// reflect the new image. Must either produce a valid image or fail;
    /// never return a placeholder.
    async fn next(&mut self) -> Result<(), SourceError>;

    /// Identifier of the most recently loaded image.
    fn current_id(&self) -> &str;

    /// Raster of the most recently loaded image.
    fn current_content(&self) -> &RasterImage;

    /// Idempotent release of background resources.
    async fn shutdown(&mut self);
}
