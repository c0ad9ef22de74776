//! Cleaning sessions and their observers.

mod observer;
mod pipeline;

pub use observer::SessionObserver;
pub use pipeline::PipelineSession;
