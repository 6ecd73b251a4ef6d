//! Pure `image -> text` OCR components.

pub mod noop;
pub mod tesseract;

use async_trait::async_trait;

use crate::types::RasterImage;

pub use noop::NoOpExtractor;
pub use tesseract::TesseractExtractor;

/// Total, never fails: returns `""` when no text is found or extraction is
/// impossible. The pipeline always hands `extract` an owned deep copy of
/// the raster so an implementation is free to treat it as scratch space.
#[async_trait]
pub trait TextExtractor: Send {
    async fn extract(&mut self, image: RasterImage) -> String;
}
