//! Even/odd pixel gain correction.
//!
//! Line-array cameras read even and odd pixels through separate analog paths,
//! which leaves a fixed multiplicative offset between neighbours. The fitted
//! vector holds `mean[i] / mean[i + 1]` on even pixels and exactly `1.0` on odd
//! ones, so dividing by it maps every even pixel onto its odd partner's gain.

use crate::math::stats::StatsHelper;
use crate::prelude::{ProcessingError, ProcessingResult};
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelCorrection {
    pub probe: Array1<f64>,
    pub reference: Array1<f64>,
}

/// Per-pixel even/odd gain ratio of a (shots x pixels) matrix.
///
/// A trailing even pixel without an odd partner keeps a ratio of `1.0`.
pub fn even_odd_ratio(raw: ArrayView2<f64>) -> Array1<f64> {
    let mean = StatsHelper::mean_over_shots(raw);
    let len = mean.len();
    let mut ratio = Array1::ones(len);
    for even in (0..len).step_by(2) {
        if even + 1 < len {
            ratio[even] = mean[even] / mean[even + 1];
        }
    }
    ratio
}

impl PixelCorrection {
    pub fn fit(raw_probe: ArrayView2<f64>, raw_reference: ArrayView2<f64>) -> Self {
        Self {
            probe: even_odd_ratio(raw_probe),
            reference: even_odd_ratio(raw_reference),
        }
    }

    #[cfg(test)]
    pub fn identity(num_pixels: usize) -> Self {
        Self {
            probe: Array1::ones(num_pixels),
            reference: Array1::ones(num_pixels),
        }
    }

    /// Divides every shot of both matrices by the matching correction vector.
    pub fn apply(
        &self,
        probe: ArrayView2<f64>,
        reference: ArrayView2<f64>,
    ) -> ProcessingResult<(Array2<f64>, Array2<f64>)> {
        if probe.ncols() != self.probe.len() || reference.ncols() != self.reference.len() {
            return Err(ProcessingError::ShapeMismatch(format!(
                "correction covers {}/{} pixels, arrays have {}/{}",
                self.probe.len(),
                self.reference.len(),
                probe.ncols(),
                reference.ncols()
            )));
        }
        Ok((&probe / &self.probe, &reference / &self.reference))
    }
}
