//! Ordered analyzers that decide, per image, whether it is sensitive and why.

pub mod factory;
pub mod flag_all;
pub mod keyword;
pub mod pattern;

pub use factory::{DefaultFlaggerFactory, FlaggerFactory};
pub use flag_all::FlagAllFlagger;
pub use keyword::KeywordFlagger;
pub use pattern::PatternFlagger;

use crate::types::RasterImage;

/// `Some(comment)` is a positive finding with human-readable justification;
/// `None` is "not flagging". Implementations must treat `content` as
/// read-only and must be total; a flagger that can't decide returns `None`
/// rather than propagating an error.
pub trait Flagger: Send {
    /// Stable, unique, human-readable identifier used as `ScavengeResult::author`.
    fn module_name(&self) -> &str;

    fn flag(&mut self, id: &str, content: &RasterImage, text: &str) -> Option<String>;
}

/// An ordered sequence of flaggers, evaluated per image.
///
/// `emit_per_flagger` toggles between the authoritative first-match-wins
/// behavior (default, `false`) and evaluating every flagger and emitting
/// one result each (see DESIGN.md).
pub struct FlaggerSet {
    flaggers: Vec<Box<dyn Flagger>>,
    emit_per_flagger: bool,
}

impl FlaggerSet {
    pub fn new(flaggers: Vec<Box<dyn Flagger>>) -> Self {
        Self {
            flaggers,
            emit_per_flagger: false,
        }
    }

    pub fn with_emit_per_flagger(mut self, emit_per_flagger: bool) -> Self {
        self.emit_per_flagger = emit_per_flagger;
        self
    }

    /// Evaluate every flagger against one image, stopping at the first
    /// positive finding unless `emit_per_flagger` is set.
    pub fn evaluate(&mut self, id: &str, content: &RasterImage, text: &str) -> Vec<(String, String)> {
        let mut findings = Vec::new();
        for flagger in self.flaggers.iter_mut() {
            if let Some(comment) = flagger.flag(id, content, text) {
                findings.push((flagger.module_name().to_string(), comment));
                if !self.emit_per_flagger {
                    break;
                }
            }
        }
        findings
    }
}
