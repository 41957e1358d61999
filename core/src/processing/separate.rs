use crate::prelude::{ProcessingError, ProcessingResult};
use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Which row parity carries the pump-on shots.
///
/// `Standard` treats odd rows as pump-on. `Flipped` is used for the long-delay
/// acquisition mode where the trigger is offset by one shot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotPolarity {
    #[default]
    Standard,
    Flipped,
}

impl ShotPolarity {
    pub fn from_tau_flip(tau_flip: bool) -> Self {
        if tau_flip {
            ShotPolarity::Flipped
        } else {
            ShotPolarity::Standard
        }
    }
}

/// De-interleaved pump-on/pump-off shot matrices, each (pairs x pixels).
#[derive(Debug, Clone, PartialEq)]
pub struct ShotSet {
    pub probe_on: Array2<f64>,
    pub probe_off: Array2<f64>,
    pub reference_on: Array2<f64>,
    pub reference_off: Array2<f64>,
}

impl ShotSet {
    pub fn pairs(&self) -> usize {
        self.probe_on.nrows()
    }

    pub fn num_pixels(&self) -> usize {
        self.probe_on.ncols()
    }
}

fn every_other_row(shots: ArrayView2<f64>, start: usize, end: usize) -> Array2<f64> {
    shots.slice(s![start..end;2, ..]).to_owned()
}

/// Splits interleaved probe/reference shots into on/off halves.
///
/// Both halves get `shots / 2` rows; an odd trailing shot is dropped.
pub fn separate(
    probe: ArrayView2<f64>,
    reference: ArrayView2<f64>,
    polarity: ShotPolarity,
) -> ProcessingResult<ShotSet> {
    if probe.dim() != reference.dim() {
        return Err(ProcessingError::ShapeMismatch(format!(
            "probe {:?} vs reference {:?}",
            probe.dim(),
            reference.dim()
        )));
    }
    let shots = probe.nrows();
    if shots < 2 {
        return Err(ProcessingError::NotEnoughShots { shots });
    }

    let used = (shots / 2) * 2;
    let set = match polarity {
        ShotPolarity::Standard => ShotSet {
            probe_on: every_other_row(probe, 1, used),
            probe_off: every_other_row(probe, 0, used),
            reference_on: every_other_row(reference, 1, used),
            reference_off: every_other_row(reference, 0, used),
        },
        ShotPolarity::Flipped => ShotSet {
            probe_on: every_other_row(probe, 0, used),
            probe_off: every_other_row(probe, 1, used),
            reference_on: every_other_row(reference, 0, used),
            reference_off: every_other_row(reference, 1, used),
        },
    };
    Ok(set)
}
