//! Hunting stage: owns the `FlaggerSet`, runs as one task, and is the only
//! caller of any flagger for the pipeline's lifetime.

use tracing::debug;

use crate::flagger::FlaggerSet;
use crate::queue::{ImageQueue, ResultQueueHandle};
use crate::status::{HuntStatus, SourceStatus};
use crate::types::ScavengeResult;

pub struct HuntingStageTask;

impl HuntingStageTask {
    pub fn spawn(
        mut flaggers: FlaggerSet,
        mut image_queue: ImageQueue,
        result_queue: ResultQueueHandle,
        source_status: SourceStatus,
        hunt_status: HuntStatus,
    ) -> tokio::task::JoinHandle<()> {
        let cancel = hunt_status.cancellation_token();

        tokio::spawn(async move {
            loop {
                if cancel.is_cancelled() {
                    break;
                }
                if image_queue.is_empty() && source_status.is_done() {
                    break;
                }

                let record = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    record = image_queue.take() => record,
                };
                let Some(record) = record else {
                    break;
                };

                let findings = flaggers.evaluate(&record.id, &record.content, &record.text);
                for (author, comment) in findings {
                    debug!(id = %record.id, author = %author, "image flagged");
                    let result = ScavengeResult::from_record(author, comment, &record);
                    let delivered = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => false,
                        ok = result_queue.put(result) => ok,
                    };
                    if !delivered {
                        break;
                    }
                }
            }

            hunt_status.mark_done();
        })
    }
}
