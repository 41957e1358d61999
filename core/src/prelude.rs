use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered states a [`ShotPairProcessor`](crate::processing::ShotPairProcessor) moves through.
///
/// Bracketed stages of the pipeline (background, alignment, referencing) may
/// be skipped, but the ordering never goes backwards except through `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PipelineStage {
    Created,
    Trimmed,
    BiasCorrected,
    Separated,
    BackgroundSubtracted,
    ReferenceAligned,
    Referenced,
    Averaged,
    DttComputed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Created => "created",
            PipelineStage::Trimmed => "trimmed",
            PipelineStage::BiasCorrected => "bias-corrected",
            PipelineStage::Separated => "separated",
            PipelineStage::BackgroundSubtracted => "background-subtracted",
            PipelineStage::ReferenceAligned => "reference-aligned",
            PipelineStage::Referenced => "referenced",
            PipelineStage::Averaged => "averaged",
            PipelineStage::DttComputed => "dtt-computed",
        };
        f.write_str(name)
    }
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProcessingError {
    #[error("pixel window must contain at least one pixel")]
    InvalidWindow,
    #[error(
        "pixel window [{first_pixel}, {first_pixel}+{num_pixels}) exceeds {raw_pixels} raw pixels"
    )]
    WindowOutOfRange {
        first_pixel: usize,
        num_pixels: usize,
        raw_pixels: usize,
    },
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("need at least two shots to separate on/off, got {shots}")]
    NotEnoughShots { shots: usize },
    #[error("{operation} requires stage {required}, processor is {current}")]
    StageNotReached {
        operation: &'static str,
        required: PipelineStage,
        current: PipelineStage,
    },
    #[error("{operation} cannot run once the processor is {current}")]
    StageAlreadyPassed {
        operation: &'static str,
        current: PipelineStage,
    },
}

pub type ProcessingResult<T> = Result<T, ProcessingError>;
