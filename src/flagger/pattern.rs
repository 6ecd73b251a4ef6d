use regex::Regex;

use crate::types::RasterImage;

use super::Flagger;

/// Compiled-once regex list; reports the first match against any pattern in
/// order, formatted as `"<match>" matched with regex: <pattern>`.
pub struct PatternFlagger {
    patterns: Vec<(String, Regex)>,
}

impl PatternFlagger {
    pub fn new(patterns: Vec<(String, Regex)>) -> Self {
        Self { patterns }
    }

    /// Default patterns: email address and IPv4 address.
    pub fn with_defaults() -> Self {
        let defaults = [
            (r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+", "email address"),
            (r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b", "IPv4 address"),
        ];

        let patterns = defaults
            .iter()
            .map(|(pattern, _label)| {
                let compiled = Regex::new(pattern).expect("default pattern flagger regex is valid");
                (pattern.to_string(), compiled)
            })
            .collect();

        Self::new(patterns)
    }
}

impl Flagger for PatternFlagger {
    fn module_name(&self) -> &str {
        "PATTERN"
    }

    fn flag(&mut self, _id: &str, _content: &RasterImage, text: &str) -> Option<String> {
        for (source, regex) in &self.patterns {
            if let Some(m) = regex.find(text) {
                return Some(format!("\"{}\" matched with regex: {}", m.as_str(), source));
            }
        }
        None
    }
}
