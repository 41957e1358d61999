pub mod align;
pub mod average;
pub mod background;
pub mod bias;
pub mod dtt;
pub mod error_estimate;
pub mod processor;
pub mod reference;
pub mod separate;
pub mod trim;

pub use align::ReferenceAdjustment;
pub use average::{ReferencedMeans, ShotMeans};
pub use bias::PixelCorrection;
pub use dtt::{DttConfig, DttOutcome, DttPolicy, DTT_STABILIZATION_OFFSET};
pub use error_estimate::ShotErrors;
pub use processor::ShotPairProcessor;
pub use reference::ReferencedShots;
pub use separate::{ShotPolarity, ShotSet};
pub use trim::PixelWindow;
