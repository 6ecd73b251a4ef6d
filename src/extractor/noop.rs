use async_trait::async_trait;

use crate::types::RasterImage;

use super::TextExtractor;

const DISABLED_SENTINEL: &str = "[OCR DISABLED]";

/// Substituted in when `enable_ocr(false)` is passed to the builder.
pub struct NoOpExtractor;

#[async_trait]
impl TextExtractor for NoOpExtractor {
    async fn extract(&mut self, _image: RasterImage) -> String {
        DISABLED_SENTINEL.to_string()
    }
}
