use crate::types::RasterImage;

use super::Flagger;

/// Sentinel flagger substituted in when `enable_hunting(false)` is passed to
/// the builder: flags every image, turning the system into a passthrough
/// scraper over the OCR stage.
pub struct FlagAllFlagger;

impl Flagger for FlagAllFlagger {
    fn module_name(&self) -> &str {
        "HUNTING DISABLED"
    }

    fn flag(&mut self, _id: &str, _content: &RasterImage, _text: &str) -> Option<String> {
        Some("HUNTING DISABLED".to_string())
    }
}
