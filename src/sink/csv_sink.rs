//! CSV-backed result sink.
//!
//! Two variants differ only in column choice, so `CsvResultSink` takes a
//! `ColumnStrategy` (a pair of plain functions) instead of being subclassed.

use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::SinkError;
use crate::types::ScavengeResult;

use super::ResultSink;

pub struct ColumnStrategy {
    pub header_row: fn() -> Vec<&'static str>,
    pub row_for: fn(&ScavengeResult) -> Vec<String>,
}

fn abbreviated_header() -> Vec<&'static str> {
    vec!["id", "author", "details"]
}

fn abbreviated_row(result: &ScavengeResult) -> Vec<String> {
    vec![result.image_id.clone(), result.author.clone(), result.details.clone()]
}

fn extensive_header() -> Vec<&'static str> {
    vec!["id", "author", "details", "text"]
}

fn extensive_row(result: &ScavengeResult) -> Vec<String> {
    vec![
        result.image_id.clone(),
        result.author.clone(),
        result.details.clone(),
        result.text.clone(),
    ]
}

pub struct CsvResultSink {
    images_dir: PathBuf,
    writer: Option<csv::Writer<BufWriter<File>>>,
    csv_path: PathBuf,
    strategy: ColumnStrategy,
    accepted: usize,
}

impl CsvResultSink {
    pub fn abbreviated(images_dir: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self::new(
            images_dir,
            csv_path,
            ColumnStrategy {
                header_row: abbreviated_header,
                row_for: abbreviated_row,
            },
        )
    }

    pub fn extensive(images_dir: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self::new(
            images_dir,
            csv_path,
            ColumnStrategy {
                header_row: extensive_header,
                row_for: extensive_row,
            },
        )
    }

    pub fn new(images_dir: impl Into<PathBuf>, csv_path: impl Into<PathBuf>, strategy: ColumnStrategy) -> Self {
        let images_dir = images_dir.into();
        let csv_path = csv_path.into();

        let writer = Self::open_writer(&images_dir, &csv_path, &strategy)
            .map_err(|e| warn!(error = %e, "failed to open result sink, results will not persist"))
            .ok();

        Self {
            images_dir,
            writer,
            csv_path,
            strategy,
            accepted: 0,
        }
    }

    fn open_writer(
        images_dir: &Path,
        csv_path: &Path,
        strategy: &ColumnStrategy,
    ) -> Result<csv::Writer<BufWriter<File>>, SinkError> {
        fs::create_dir_all(images_dir).map_err(|e| SinkError::DirCreate(e.to_string()))?;

        let write_header = !csv_path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(csv_path)
            .map_err(|e| SinkError::CsvWrite(e.to_string()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        if write_header {
            writer
                .write_record((strategy.header_row)())
                .map_err(|e| SinkError::CsvWrite(e.to_string()))?;
        }
        Ok(writer)
    }

    fn persist_image(&self, result: &ScavengeResult) -> Result<(), SinkError> {
        let decoded = result
            .content
            .decode()
            .map_err(|e| SinkError::ImageWrite(e.to_string()))?;
        let path = self.images_dir.join(format!("{}.png", result.image_id));
        decoded
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| SinkError::ImageWrite(e.to_string()))
    }
}

impl ResultSink for CsvResultSink {
    fn add(&mut self, result: ScavengeResult) {
        if !result.is_well_formed() {
            warn!(image_id = %result.image_id, "dropping result with empty required field");
            return;
        }

        if let Err(e) = self.persist_image(&result) {
            warn!(image_id = %result.image_id, error = %e, "failed to persist flagged image");
        }

        let Some(writer) = self.writer.as_mut() else {
            warn!("result sink has no open writer, dropping csv row");
            return;
        };

        match writer
            .write_record((self.strategy.row_for)(&result))
            .and_then(|_| writer.flush().map_err(csv::Error::from))
        {
            Ok(()) => self.accepted += 1,
            Err(e) => warn!(image_id = %result.image_id, error = %e, "failed to write csv row"),
        }
    }

    fn print(&self) {
        println!(
            "scavenger results: {} accepted, written to {}",
            self.accepted,
            self.csv_path.display()
        );
    }

    fn close(&mut self) {
        self.writer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RasterImage;

    fn png_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([9, 9, 9]));
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn writes_header_once_and_appends_rows() {
        let dir = tempfile::tempdir().unwrap();
        let images_dir = dir.path().join("huntedImages");
        let csv_path = dir.path().join("AbbreviatedResults.csv");

        let mut sink = CsvResultSink::abbreviated(&images_dir, &csv_path);
        sink.add(ScavengeResult {
            author: "KEYWORD".to_string(),
            details: "Detected keyword: \"password\"".to_string(),
            image_id: "A.png".to_string(),
            content: RasterImage::from_bytes(png_bytes()),
            text: "my password is hunter2".to_string(),
        });
        sink.close();

        let contents = fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "id,author,details");
        assert!(lines[1].contains("A.png"));
        assert!(images_dir.join("A.png.png").exists());
    }

    #[test]
    fn drops_results_with_empty_required_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvResultSink::abbreviated(dir.path().join("img"), dir.path().join("out.csv"));
        sink.add(ScavengeResult {
            author: String::new(),
            details: "x".to_string(),
            image_id: "A.png".to_string(),
            content: RasterImage::from_bytes(png_bytes()),
            text: String::new(),
        });
        sink.close();
        assert!(!dir.path().join("out.csv").exists() || fs::read_to_string(dir.path().join("out.csv")).unwrap().lines().count() <= 1);
    }
}
