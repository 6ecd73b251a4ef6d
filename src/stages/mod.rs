//! Long-running stage loops: each owns exactly one leaf component for the
//! lifetime of the pipeline, and runs as a single cooperatively-scheduled
//! tokio task rather than a pool of callbacks.

pub mod hunting;
pub mod image_buffer;

pub use hunting::HuntingStageTask;
pub use image_buffer::ImageBufferTask;
