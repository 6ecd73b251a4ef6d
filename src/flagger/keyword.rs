use crate::types::RasterImage;

use super::Flagger;

const DEFAULT_KEYWORDS: &[&str] = &[
    "password",
    "secret",
    "api_key",
    "api key",
    "private key",
    "ssh",
    "token",
    "credential",
    "bearer",
    "aws_access_key_id",
    "aws_secret_access_key",
];

/// Case-insensitive substring search over a fixed keyword list; reports the
/// first matching keyword as `Detected keyword: "<keyword>"`.
pub struct KeywordFlagger {
    keywords: Vec<String>,
}

impl KeywordFlagger {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect())
    }
}

impl Flagger for KeywordFlagger {
    fn module_name(&self) -> &str {
        "KEYWORD"
    }

    fn flag(&mut self, _id: &str, _content: &RasterImage, text: &str) -> Option<String> {
        let lowered = text.to_ascii_lowercase();
        for keyword in &self.keywords {
            if lowered.contains(&keyword.to_ascii_lowercase()) {
                return Some(format!("Detected keyword: \"{}\"", keyword));
            }
        }
        None
    }
}
