//! Services for rcx-da
//!
//! Intake and orchestration do the I/O; mapper and scorer are pure.

pub mod extractor;
pub mod intake;
pub mod mapper;
pub mod pipeline;
pub mod scorer;

pub use intake::{IntakeService, Upload};
pub use mapper::{map_extraction, MappedSummary};
pub use pipeline::{PipelineError, RunePipeline};
pub use scorer::deal_quality_index;
