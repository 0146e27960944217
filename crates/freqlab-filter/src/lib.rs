//! Frequency-domain filtering for single-channel images.
//!
//! Masks, display views, the filter pipeline and its preview worker.

pub mod mask;
pub mod pipeline;
pub mod preview;
pub mod source;
pub mod visualize;
