pub mod anomaly;
pub mod cycle;

pub use anomaly::HighDttEvent;
pub use cycle::{CycleAncillary, CycleFrame};
