use crate::math::stats::StatsHelper;
use crate::processing::reference::ReferencedShots;
use crate::processing::separate::ShotSet;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Per-pixel mean spectra of each on/off shot subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotMeans {
    pub probe_on: Array1<f64>,
    pub probe_off: Array1<f64>,
    pub reference_on: Array1<f64>,
    pub reference_off: Array1<f64>,
}

impl ShotMeans {
    pub fn from_shots(shots: &ShotSet) -> Self {
        Self {
            probe_on: StatsHelper::mean_over_shots(shots.probe_on.view()),
            probe_off: StatsHelper::mean_over_shots(shots.probe_off.view()),
            reference_on: StatsHelper::mean_over_shots(shots.reference_on.view()),
            reference_off: StatsHelper::mean_over_shots(shots.reference_off.view()),
        }
    }

    pub fn num_pixels(&self) -> usize {
        self.probe_on.len()
    }
}

/// Mean spectra of the reference-divided probe subsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencedMeans {
    pub probe_on: Array1<f64>,
    pub probe_off: Array1<f64>,
}

impl ReferencedMeans {
    pub fn from_shots(shots: &ReferencedShots) -> Self {
        Self {
            probe_on: StatsHelper::mean_over_shots(shots.probe_on.view()),
            probe_off: StatsHelper::mean_over_shots(shots.probe_off.view()),
        }
    }
}
