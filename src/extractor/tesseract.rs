//! Default OCR adapter: shells out to the `tesseract` CLI.
//!
//! Writes the frame to a temp file, invokes the binary, reads stdout back,
//! then removes the temp file. A thin, swappable boundary, one concrete
//! working implementation of [`super::TextExtractor`].

use async_trait::async_trait;
use tokio::process::Command;
use tracing::warn;
use uuid::Uuid;

use crate::types::RasterImage;

use super::TextExtractor;

pub struct TesseractExtractor {
    lang: String,
}

impl TesseractExtractor {
    pub fn new() -> Self {
        Self {
            lang: "eng".to_string(),
        }
    }

    pub fn with_language(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    async fn run(&self, image: &RasterImage) -> std::io::Result<String> {
        let dir = std::env::temp_dir();
        let input_path = dir.join(format!("scavenger-ocr-{}.png", Uuid::new_v4()));
        tokio::fs::write(&input_path, image.encoded_bytes()).await?;

        let output = Command::new("tesseract")
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .await;

        let _ = tokio::fs::remove_file(&input_path).await;

        let output = output?;
        if !output.status.success() {
            return Ok(String::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for TesseractExtractor {
    async fn extract(&mut self, image: RasterImage) -> String {
        match self.run(&image).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "tesseract extraction failed, returning empty text");
                String::new()
            }
        }
    }
}
