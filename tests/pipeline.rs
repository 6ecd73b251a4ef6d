//! End-to-end tests driving the public `ScavengerBuilder` / `Scavenger` API
//! over a `DiskSource` or a synthetic in-memory source, exercising the full
//! three-stage pipeline rather than any single module in isolation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scavenger::builder::ScavengerBuilder;
use scavenger::error::SourceError;
use scavenger::extractor::TextExtractor;
use scavenger::sink::CsvResultSink;
use scavenger::source::disk::DiskSource;
use scavenger::source::Source;
use scavenger::types::RasterImage;

fn tiny_png() -> Vec<u8> {
    let mut buf = Vec::new();
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([7, 7, 7]));
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Hands back a fixed OCR text per fixture, looked up by the pixel width
/// baked into each test image. The extractor only ever sees raw bytes, so
/// each fixture is built at a distinct width to make that a reliable key.
struct ScriptedExtractor {
    by_width: HashMap<u32, &'static str>,
}

#[async_trait]
impl TextExtractor for ScriptedExtractor {
    async fn extract(&mut self, image: RasterImage) -> String {
        let width = image.decode().map(|img| img.width()).unwrap_or(0);
        self.by_width.get(&width).copied().unwrap_or("").to_string()
    }
}

fn write_fixture(dir: &std::path::Path, name: &str, width: u32) {
    let img = image::RgbImage::from_pixel(width, 2, image::Rgb([1, 1, 1]));
    image::DynamicImage::ImageRgb8(img)
        .save_with_format(dir.join(name), image::ImageFormat::Png)
        .unwrap();
}

async fn wait_until_finished(scavenger: &scavenger::Scavenger, max_iters: usize) {
    for _ in 0..max_iters {
        if scavenger.is_finished() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("pipeline did not finish within the expected number of polls");
}

#[tokio::test]
async fn disk_source_flags_keyword_and_pattern_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "A.png", 10);
    write_fixture(dir.path(), "B.png", 20);
    write_fixture(dir.path(), "C.png", 30);

    let mut by_width = HashMap::new();
    by_width.insert(10, "my password is hunter2");
    by_width.insert(20, "contact me: a@b.co");

    let out_dir = dir.path().join("out");
    let csv_path = dir.path().join("results.csv");

    let mut scavenger = ScavengerBuilder::new()
        .source(Box::new(DiskSource::new(dir.path()).unwrap()))
        .text_extractor(Box::new(ScriptedExtractor { by_width }))
        .result_sink(Box::new(CsvResultSink::abbreviated(&out_dir, &csv_path)))
        .build()
        .await
        .unwrap();

    assert_eq!(scavenger.result_author(), "KEYWORD");
    assert_eq!(scavenger.result_image_id(), "A.png");
    assert_eq!(scavenger.result_details(), "Detected keyword: \"password\"");

    while !scavenger.has_next_result() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    scavenger.load_next_result().unwrap();
    assert_eq!(scavenger.result_author(), "PATTERN");
    assert_eq!(scavenger.result_image_id(), "B.png");
    assert_eq!(
        scavenger.result_details(),
        "\"a@b.co\" matched with regex: [a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\\.[a-zA-Z0-9-.]+"
    );

    wait_until_finished(&scavenger, 200).await;
    assert!(!scavenger.has_next_result());
    assert!(scavenger.is_finished());
}

#[tokio::test]
async fn source_with_no_matching_image_exhausts_with_no_results() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "only.png", 40);

    let scavenger = ScavengerBuilder::new()
        .source(Box::new(DiskSource::new(dir.path()).unwrap()))
        .text_extractor(Box::new(ScriptedExtractor { by_width: HashMap::new() }))
        .enable_result_sink(false)
        .build()
        .await
        .unwrap();

    assert_eq!(scavenger.result_image_id(), "");
    assert_eq!(scavenger.result_author(), "");
    assert!(!scavenger.has_next_result());

    wait_until_finished(&scavenger, 200).await;
    assert!(!scavenger.has_next_result());
}

#[tokio::test]
async fn hunting_disabled_flags_every_image_in_source_order() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "A.png", 11);
    write_fixture(dir.path(), "B.png", 22);

    let mut scavenger = ScavengerBuilder::new()
        .source(Box::new(DiskSource::new(dir.path()).unwrap()))
        .enable_ocr(false)
        .enable_hunting(false)
        .enable_result_sink(false)
        .build()
        .await
        .unwrap();

    let mut seen = vec![(scavenger.result_image_id().to_string(), scavenger.result_author().to_string())];

    wait_until_finished(&scavenger, 200).await;
    while scavenger.has_next_result() {
        scavenger.load_next_result().unwrap();
        seen.push((scavenger.result_image_id().to_string(), scavenger.result_author().to_string()));
    }

    assert_eq!(seen, vec![
        ("A.png".to_string(), "HUNTING DISABLED".to_string()),
        ("B.png".to_string(), "HUNTING DISABLED".to_string()),
    ]);
}

#[tokio::test]
async fn disabled_result_sink_accepts_silently_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "A.png", 13);

    let mut by_width = HashMap::new();
    by_width.insert(13, "password");

    let scavenger = ScavengerBuilder::new()
        .source(Box::new(DiskSource::new(dir.path()).unwrap()))
        .text_extractor(Box::new(ScriptedExtractor { by_width }))
        .enable_result_sink(false)
        .build()
        .await
        .unwrap();

    assert_eq!(scavenger.result_author(), "KEYWORD");
    wait_until_finished(&scavenger, 200).await;

    assert!(!dir.path().join("huntedImages").exists());
    assert!(!dir.path().join("AbbreviatedResults.csv").exists());
}

struct CountingSource {
    current_id: String,
    index: u32,
    total: u32,
    content: RasterImage,
}

impl CountingSource {
    fn new(total: u32, content: RasterImage) -> Self {
        Self {
            current_id: format!("{:04}", 1),
            index: 1,
            total,
            content,
        }
    }
}

#[async_trait]
impl Source for CountingSource {
    async fn next(&mut self) -> Result<(), SourceError> {
        if self.index >= self.total {
            return Err(SourceError::NoImageAvailable);
        }
        self.index += 1;
        self.current_id = format!("{:04}", self.index);
        Ok(())
    }

    fn current_id(&self) -> &str {
        &self.current_id
    }

    fn current_content(&self) -> &RasterImage {
        &self.content
    }

    async fn shutdown(&mut self) {}
}

struct CountingExtractor {
    counter: Arc<AtomicU32>,
}

#[async_trait]
impl TextExtractor for CountingExtractor {
    async fn extract(&mut self, _image: RasterImage) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        if n % 3 == 0 {
            "password leaked".to_string()
        } else {
            "nothing to see".to_string()
        }
    }
}

#[tokio::test]
async fn concurrent_stress_delivers_every_match_exactly_once_in_order() {
    let content = RasterImage::from_bytes(tiny_png());
    let counter = Arc::new(AtomicU32::new(0));

    let mut scavenger = ScavengerBuilder::new()
        .source(Box::new(CountingSource::new(1000, content)))
        .text_extractor(Box::new(CountingExtractor { counter }))
        .image_buffer_size(2)
        .result_buffer_size(1)
        .enable_result_sink(false)
        .build()
        .await
        .unwrap();

    let mut matches = vec![scavenger.result_image_id().to_string()];

    loop {
        if scavenger.has_next_result() {
            scavenger.load_next_result().unwrap();
            matches.push(scavenger.result_image_id().to_string());
        } else if scavenger.is_finished() {
            break;
        } else {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    let expected: Vec<String> = (1..=999u32).filter(|n| n % 3 == 0).map(|n| format!("{n:04}")).collect();
    assert_eq!(matches, expected);

    let unique: std::collections::HashSet<_> = matches.iter().collect();
    assert_eq!(unique.len(), matches.len());
}
