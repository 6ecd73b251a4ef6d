//! File-based configuration: an optional `serde_yaml`-backed struct
//! mirroring the builder's options, so common deployments don't need to
//! hand-build a [`crate::builder::ScavengerBuilder`] in code. `.env` loading
//! (via `dotenvy`) is a CLI-only concern, never performed by the library
//! itself.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::builder::ScavengerBuilder;
use crate::error::ScavengerError;
use crate::source::remote::GalleryConfig;

/// On-disk mirror of [`ScavengerBuilder`]'s options, loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScavengerFileConfig {
    pub image_buffer_size: i64,
    pub result_buffer_size: i64,
    pub enable_ocr: bool,
    pub enable_hunting: bool,
    pub enable_result_sink: bool,
    pub emit_per_flagger: bool,
    pub ocr_language: String,
    pub images_dir: String,
    pub csv_path: String,
    pub extensive_csv: bool,
    pub remote: RemoteSourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSourceConfig {
    pub base_url: String,
    pub image_selector: String,
    pub image_attr: String,
    pub worker_count: usize,
    pub low_water_mark: usize,
    pub batch_size: usize,
    pub fifo_capacity: usize,
    pub failure_warn_every: u32,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub next_timeout_ms: u64,
}

impl Default for RemoteSourceConfig {
    fn default() -> Self {
        let defaults = GalleryConfig::default();
        Self {
            base_url: defaults.base_url,
            image_selector: defaults.image_selector,
            image_attr: defaults.image_attr,
            worker_count: defaults.worker_count,
            low_water_mark: defaults.low_water_mark,
            batch_size: defaults.batch_size,
            fifo_capacity: defaults.fifo_capacity,
            failure_warn_every: defaults.failure_warn_every,
            connect_timeout_ms: defaults.connect_timeout.as_millis() as u64,
            read_timeout_ms: defaults.read_timeout.as_millis() as u64,
            next_timeout_ms: defaults.next_timeout.as_millis() as u64,
        }
    }
}

impl RemoteSourceConfig {
    fn into_gallery_config(self) -> GalleryConfig {
        let defaults = GalleryConfig::default();
        GalleryConfig {
            base_url: self.base_url,
            image_selector: self.image_selector,
            image_attr: self.image_attr,
            worker_count: self.worker_count,
            low_water_mark: self.low_water_mark,
            batch_size: self.batch_size,
            fifo_capacity: self.fifo_capacity,
            failure_warn_every: self.failure_warn_every,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            next_timeout: Duration::from_millis(self.next_timeout_ms),
            user_agent: defaults.user_agent,
            poll_interval: defaults.poll_interval,
        }
    }
}

impl Default for ScavengerFileConfig {
    fn default() -> Self {
        Self {
            image_buffer_size: 16,
            result_buffer_size: 8,
            enable_ocr: true,
            enable_hunting: true,
            enable_result_sink: true,
            emit_per_flagger: false,
            ocr_language: "eng".to_string(),
            images_dir: "huntedImages".to_string(),
            csv_path: "AbbreviatedResults.csv".to_string(),
            extensive_csv: false,
            remote: RemoteSourceConfig::default(),
        }
    }
}

impl ScavengerFileConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScavengerError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ScavengerError::Config(format!("reading {}: {e}", path.as_ref().display())))?;
        serde_yaml::from_str(&contents).map_err(|e| ScavengerError::Config(e.to_string()))
    }

    /// Folds this config onto a builder, leaving source/extractor/flagger
    /// overrides already applied by the caller untouched.
    pub fn apply(self, mut builder: ScavengerBuilder) -> ScavengerBuilder {
        use crate::extractor::TesseractExtractor;
        use crate::sink::CsvResultSink;

        builder = builder
            .image_buffer_size(self.image_buffer_size)
            .result_buffer_size(self.result_buffer_size)
            .enable_ocr(self.enable_ocr)
            .enable_hunting(self.enable_hunting)
            .enable_result_sink(self.enable_result_sink)
            .emit_per_flagger(self.emit_per_flagger)
            .gallery_config(self.remote.into_gallery_config());

        if self.enable_ocr {
            builder = builder.text_extractor(Box::new(TesseractExtractor::with_language(self.ocr_language)));
        }

        if self.enable_result_sink {
            let sink = if self.extensive_csv {
                CsvResultSink::extensive(self.images_dir, self.csv_path)
            } else {
                CsvResultSink::abbreviated(self.images_dir, self.csv_path)
            };
            builder = builder.result_sink(Box::new(sink));
        }

        builder
    }
}
