//! Validated construction: applies defaults lazily, substitutes no-op
//! implementations for disabled features, guarantees a valid initial result
//! before returning.

use crate::error::ScavengerResult;
use crate::extractor::{NoOpExtractor, TesseractExtractor, TextExtractor};
use crate::flagger::{DefaultFlaggerFactory, FlagAllFlagger, FlaggerFactory, FlaggerSet};
use crate::scavenger::Scavenger;
use crate::sink::{CsvResultSink, NoOpSink, ResultSink};
use crate::source::remote::{GalleryConfig, RemoteSource};
use crate::source::Source;

const DEFAULT_IMAGE_BUFFER_SIZE: usize = 16;
const DEFAULT_RESULT_BUFFER_SIZE: usize = 8;

/// Builds a [`Scavenger`]. Every option has a documented default; setters
/// are order-independent and may be called in any combination.
pub struct ScavengerBuilder {
    source: Option<Box<dyn Source>>,
    text_extractor: Option<Box<dyn TextExtractor>>,
    flagger_factory: Option<Box<dyn FlaggerFactory>>,
    result_sink: Option<Box<dyn ResultSink>>,
    image_buffer_size: usize,
    result_buffer_size: usize,
    enable_ocr: bool,
    enable_hunting: bool,
    enable_result_sink: bool,
    emit_per_flagger: bool,
    gallery_config: GalleryConfig,
}

impl ScavengerBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            text_extractor: None,
            flagger_factory: None,
            result_sink: None,
            image_buffer_size: DEFAULT_IMAGE_BUFFER_SIZE,
            result_buffer_size: DEFAULT_RESULT_BUFFER_SIZE,
            enable_ocr: true,
            enable_hunting: true,
            enable_result_sink: true,
            emit_per_flagger: false,
            gallery_config: GalleryConfig::default(),
        }
    }

    pub fn source(mut self, source: Box<dyn Source>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn text_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.text_extractor = Some(extractor);
        self
    }

    pub fn flagger_factory(mut self, factory: Box<dyn FlaggerFactory>) -> Self {
        self.flagger_factory = Some(factory);
        self
    }

    pub fn result_sink(mut self, sink: Box<dyn ResultSink>) -> Self {
        self.result_sink = Some(sink);
        self
    }

    /// `size <= 0` is rejected; the existing (default or previously set)
    /// value is kept.
    pub fn image_buffer_size(mut self, size: i64) -> Self {
        if size > 0 {
            self.image_buffer_size = size as usize;
        }
        self
    }

    pub fn result_buffer_size(mut self, size: i64) -> Self {
        if size > 0 {
            self.result_buffer_size = size as usize;
        }
        self
    }

    pub fn enable_ocr(mut self, enabled: bool) -> Self {
        self.enable_ocr = enabled;
        self
    }

    pub fn enable_hunting(mut self, enabled: bool) -> Self {
        self.enable_hunting = enabled;
        self
    }

    pub fn enable_result_sink(mut self, enabled: bool) -> Self {
        self.enable_result_sink = enabled;
        self
    }

    /// Opt-in to the legacy "evaluate every flagger" behavior (see
    /// `FlaggerSet`); default is first-match-wins.
    pub fn emit_per_flagger(mut self, enabled: bool) -> Self {
        self.emit_per_flagger = enabled;
        self
    }

    pub fn gallery_config(mut self, config: GalleryConfig) -> Self {
        self.gallery_config = config;
        self
    }

    pub async fn build(self) -> ScavengerResult<Scavenger> {
        let source: Box<dyn Source> = match self.source {
            Some(source) => source,
            None => {
                let remote = RemoteSource::connect(self.gallery_config, "000000")
                    .await
                    .map_err(|e| crate::error::ScavengerError::Config(e.to_string()))?;
                Box::new(remote)
            }
        };

        let text_extractor: Box<dyn TextExtractor> = if !self.enable_ocr {
            Box::new(NoOpExtractor)
        } else {
            match self.text_extractor {
                Some(extractor) => extractor,
                None => Box::new(TesseractExtractor::new()),
            }
        };

        let flaggers = if !self.enable_hunting {
            FlaggerSet::new(vec![Box::new(FlagAllFlagger)])
        } else {
            let factory: Box<dyn FlaggerFactory> =
                self.flagger_factory.unwrap_or_else(|| Box::new(DefaultFlaggerFactory));
            FlaggerSet::new(factory.initialized_flaggers()).with_emit_per_flagger(self.emit_per_flagger)
        };

        let result_sink: Box<dyn ResultSink> = if !self.enable_result_sink {
            Box::new(NoOpSink)
        } else {
            self.result_sink
                .unwrap_or_else(|| Box::new(CsvResultSink::abbreviated("huntedImages", "AbbreviatedResults.csv")))
        };

        Scavenger::new(
            source,
            text_extractor,
            flaggers,
            result_sink,
            self.image_buffer_size,
            self.result_buffer_size,
        )
        .await
    }
}

impl Default for ScavengerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
