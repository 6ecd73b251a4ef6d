//! Shared value types that cross the pipeline's queue boundaries.

use bytes::Bytes;

/// An in-memory raster image.
///
/// Rasters move by cheap `Bytes` clone across stage boundaries; any accessor
/// that hands a raster to a caller (sink, client) returns an owned copy so
/// the caller can never observe or cause mutation of pipeline-internal state.
#[derive(Debug, Clone)]
pub struct RasterImage {
    encoded: Bytes,
}

impl RasterImage {
    pub fn from_bytes(encoded: impl Into<Bytes>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// The raw encoded bytes (PNG/JPEG/etc, whatever the source handed us).
    pub fn encoded_bytes(&self) -> &Bytes {
        &self.encoded
    }

    pub fn len(&self) -> usize {
        self.encoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty()
    }

    /// Decode to get pixel dimensions. Used by invariant checks
    /// ("content is a raster of nonzero dimensions") and by the CSV sink
    /// when re-encoding to PNG for disk persistence.
    pub fn decode(&self) -> Result<image::DynamicImage, image::ImageError> {
        image::load_from_memory(&self.encoded)
    }

    /// A defensive copy: cloning `Bytes` is a refcount bump, not a data
    /// copy, but the returned `RasterImage` is a logically independent
    /// value a caller may do anything with.
    pub fn deep_copy(&self) -> Self {
        Self {
            encoded: Bytes::copy_from_slice(&self.encoded),
        }
    }
}

/// An image that has passed through the image stage: OCR has already run.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub id: String,
    pub content: RasterImage,
    pub text: String,
}

impl ImageRecord {
    pub fn new(id: impl Into<String>, content: RasterImage, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content,
            text: text.into(),
        }
    }
}

/// A flagged image plus the reason it was flagged and who flagged it.
///
/// Named `ScavengeResult` to avoid colliding with `std::result::Result`.
#[derive(Debug, Clone)]
pub struct ScavengeResult {
    pub author: String,
    pub details: String,
    pub image_id: String,
    pub content: RasterImage,
    pub text: String,
}

impl ScavengeResult {
    pub fn from_record(author: impl Into<String>, details: impl Into<String>, record: &ImageRecord) -> Self {
        Self {
            author: author.into(),
            details: details.into(),
            image_id: record.id.clone(),
            content: record.content.clone(),
            text: record.text.clone(),
        }
    }

    /// `true` iff `author`, `details`, `image_id` are non-empty and
    /// `content` has nonzero bytes. `text` may legitimately be empty.
    pub fn is_well_formed(&self) -> bool {
        !self.author.is_empty()
            && !self.details.is_empty()
            && !self.image_id.is_empty()
            && !self.content.is_empty()
    }
}
