//! Consumers of [`crate::types::ScavengeResult`], the pipeline's egress.

pub mod csv_sink;
pub mod noop;

pub use csv_sink::CsvResultSink;
pub use noop::NoOpSink;

use crate::types::ScavengeResult;

/// `add` must tolerate being called repeatedly until `close`; persistence
/// failures are absorbed and logged, never propagated to the hunting stage.
pub trait ResultSink: Send {
    fn add(&mut self, result: ScavengeResult);

    /// Render stored results as a human-readable summary.
    fn print(&self);

    /// Idempotent; releases any held file handles. Behavior of `add`/`print`
    /// after `close` is undefined.
    fn close(&mut self);
}
