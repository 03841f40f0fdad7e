// thumbsmith/src/engine/mod.rs
mod batch;
pub mod pipeline;

pub use batch::{BatchResult, BatchScheduler, TaskOutcome, TaskReport, ThumbnailSpec};
pub use pipeline::GlobalTransform;
