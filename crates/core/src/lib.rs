pub mod classify;
pub mod error;
pub mod identity;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod significance;

pub use error::{CanopyError, Result};
pub use pipeline::{Pipeline, PipelineConfig};
