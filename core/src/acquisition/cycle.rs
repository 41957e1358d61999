use crate::processing::separate::ShotPolarity;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Ancillary metadata captured alongside each acquisition cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleAncillary {
    pub timestamp: f64,
    pub delay_ps: f64,
    #[serde(default)]
    pub polarity: ShotPolarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Raw probe/reference readouts for one cycle, shaped (shots x raw_pixels).
///
/// The probe matrix still holds the trigger/timing channel outside the active
/// pixel window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleFrame {
    pub probe: Array2<f64>,
    pub reference: Array2<f64>,
    pub ancillary: CycleAncillary,
}

impl CycleFrame {
    pub fn new(probe: Array2<f64>, reference: Array2<f64>, ancillary: CycleAncillary) -> Self {
        Self {
            probe,
            reference,
            ancillary,
        }
    }

    pub fn shots(&self) -> usize {
        self.probe.nrows()
    }

    pub fn raw_pixels(&self) -> usize {
        self.probe.ncols()
    }
}
