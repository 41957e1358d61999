//! Shot-pair processing core for the pump-probe transient-absorption rig.
//!
//! The modules turn one acquisition cycle's probe/reference readouts into a
//! differential-transmission spectrum through explicit, ordered stages.

pub mod acquisition;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{PipelineStage, ProcessingError, ProcessingResult};
pub use processing::ShotPairProcessor;
