use crate::types::ScavengeResult;

use super::ResultSink;

const DISABLED_NOTICE: &str = "Result sink is disabled, no results were stored.";

/// Substituted in when `enable_result_sink(false)` is passed to the builder.
pub struct NoOpSink;

impl ResultSink for NoOpSink {
    fn add(&mut self, _result: ScavengeResult) {}

    fn print(&self) {
        println!("{DISABLED_NOTICE}");
    }

    fn close(&mut self) {}
}
