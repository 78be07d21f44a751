//! Data structures shared across pipeline stages.

pub mod filename;
pub mod paper;

pub use filename::sanitize_title;
pub use paper::PaperMeta;
