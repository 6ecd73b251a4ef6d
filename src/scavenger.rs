//! The orchestrator: owns both queues and both stage tasks, exposes the
//! client-facing pull interface.

use tokio::task::JoinHandle;
use tracing::info;

use crate::error::{ScavengerError, ScavengerResult};
use crate::flagger::FlaggerSet;
use crate::queue::{ImageQueue, ResultQueue};
use crate::sink::ResultSink;
use crate::source::Source;
use crate::stages::{HuntingStageTask, ImageBufferTask};
use crate::status::{HuntStatus, SourceStatus};
use crate::types::RasterImage;

/// Composes source, extractor, flagger set and sink into a running pipeline.
///
/// Only reachable via [`crate::builder::ScavengerBuilder::build`]: the
/// constructor needs to `await` the first result before it can hand out a
/// valid instance, so it cannot be a plain `new`.
pub struct Scavenger {
    result_queue: ResultQueue,
    sink: Box<dyn ResultSink>,
    source_status: SourceStatus,
    hunt_status: HuntStatus,
    image_task: JoinHandle<()>,
    hunting_task: JoinHandle<()>,
    current: Option<crate::types::ScavengeResult>,
}

impl Scavenger {
    pub(crate) async fn new(
        source: Box<dyn Source>,
        extractor: Box<dyn crate::extractor::TextExtractor>,
        flaggers: FlaggerSet,
        mut sink: Box<dyn ResultSink>,
        image_buffer_size: usize,
        result_buffer_size: usize,
    ) -> ScavengerResult<Self> {
        let (image_queue, image_queue_handle) = ImageQueue::new(image_buffer_size);
        let (mut result_queue, result_queue_handle) = ResultQueue::new(result_buffer_size);

        let source_status = SourceStatus::new();
        let hunt_status = HuntStatus::new();

        let image_task =
            ImageBufferTask::spawn(source, extractor, image_queue_handle, source_status.clone());
        let hunting_task = HuntingStageTask::spawn(
            flaggers,
            image_queue,
            result_queue_handle,
            source_status.clone(),
            hunt_status.clone(),
        );

        // Waits for the first result so a freshly built Scavenger already has
        // one loaded when the source produces a match quickly. A source whose
        // images never flag anything drains to `None` here instead. That is
        // not an error, just a pipeline with no current result that reaches
        // `is_finished()` without the caller ever observing one.
        let current = match result_queue.take().await {
            Some(result) => {
                sink.add(result.clone());
                Some(result)
            }
            None => None,
        };

        Ok(Self {
            result_queue,
            sink,
            source_status,
            hunt_status,
            image_task,
            hunting_task,
            current,
        })
    }

    /// Non-blocking: true iff the result queue is non-empty.
    pub fn has_next_result(&self) -> bool {
        !self.result_queue.is_empty()
    }

    /// Pops the next result (non-blocking), adopts it as current, forwards
    /// it to the sink. Callers are expected to gate with [`Self::has_next_result`].
    pub fn load_next_result(&mut self) -> ScavengerResult<()> {
        let Some(result) = self.result_queue.try_take() else {
            return Err(ScavengerError::NoResultAvailable);
        };
        self.sink.add(result.clone());
        self.current = Some(result);
        Ok(())
    }

    /// True iff the result queue is empty and both stages are done. Computed
    /// fresh on every call, never cached; once true it stays true, since
    /// both underlying conditions are themselves monotonic.
    pub fn is_finished(&self) -> bool {
        self.result_queue.is_empty() && self.source_status.is_done() && self.hunt_status.is_done()
    }

    pub fn result_image_id(&self) -> &str {
        self.current.as_ref().map(|r| r.image_id.as_str()).unwrap_or("")
    }

    /// Defensive copy: the caller may do anything with the returned raster
    /// without affecting the Scavenger's internal state.
    pub fn result_image_content(&self) -> Option<RasterImage> {
        self.current.as_ref().map(|r| r.content.deep_copy())
    }

    pub fn result_image_text(&self) -> &str {
        self.current.as_ref().map(|r| r.text.as_str()).unwrap_or("")
    }

    pub fn result_author(&self) -> &str {
        self.current.as_ref().map(|r| r.author.as_str()).unwrap_or("")
    }

    pub fn result_details(&self) -> &str {
        self.current.as_ref().map(|r| r.details.as_str()).unwrap_or("")
    }

    pub fn result_data(&self) -> Option<&crate::types::ScavengeResult> {
        self.current.as_ref()
    }

    pub fn print_results(&self) {
        self.sink.print();
    }

    pub fn print_results_and_exit(&mut self) {
        self.print_results();
        self.exit();
    }

    /// Closes the sink, cancels both stage handles, and aborts both stage
    /// tasks immediately without waiting for them to drain. Idempotent.
    /// Never touches the host process.
    pub fn exit(&mut self) {
        self.sink.close();
        self.source_status.cancel();
        self.hunt_status.cancel();
        self.image_task.abort();
        self.hunting_task.abort();
        info!("scavenger pipeline shut down");
    }
}

impl Drop for Scavenger {
    fn drop(&mut self) {
        self.exit();
    }
}
