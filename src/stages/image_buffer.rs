//! Image stage: owns the `Source` and `TextExtractor`, runs as one task,
//! and is the only caller of either for the pipeline's lifetime.

use tracing::{debug, info};

use crate::extractor::TextExtractor;
use crate::queue::ImageQueueHandle;
use crate::source::Source;
use crate::status::SourceStatus;
use crate::types::ImageRecord;

pub struct ImageBufferTask;

impl ImageBufferTask {
    pub fn spawn(
        mut source: Box<dyn Source>,
        mut extractor: Box<dyn TextExtractor>,
        queue: ImageQueueHandle,
        status: SourceStatus,
    ) -> tokio::task::JoinHandle<()> {
        let cancel = status.cancellation_token();

        tokio::spawn(async move {
            loop {
                if cancel.is_cancelled() {
                    break;
                }

                let id = source.current_id().to_string();
                let content = source.current_content().clone();
                let text = extractor.extract(content.deep_copy()).await;
                let record = ImageRecord::new(id.clone(), content, text);

                let enqueued = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => false,
                    ok = queue.put(record) => ok,
                };
                if !enqueued {
                    break;
                }
                debug!(id = %id, "image enqueued for hunting");

                let advanced = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    result = source.next() => Some(result),
                };

                match advanced {
                    Some(Ok(())) => {}
                    Some(Err(_)) | None => {
                        info!("image source exhausted or cancelled");
                        break;
                    }
                }
            }

            source.shutdown().await;
            status.mark_done();
        })
    }
}
