//! Reference spectrum warping.
//!
//! Each reference shot is scaled vertically, then its pixel axis is stretched
//! about `scale_center` by `scale_factor` and shifted by `horizontal_offset`.
//! The warped curve is resampled back onto the unmodified pixel axis so it
//! lines up with the probe spectrum.

use crate::math::interp::InterpHelper;
use crate::processing::separate::ShotSet;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceAdjustment {
    pub vertical_scale: f64,
    pub vertical_offset: f64,
    pub horizontal_offset: f64,
    pub scale_center: f64,
    pub scale_factor: f64,
}

impl Default for ReferenceAdjustment {
    fn default() -> Self {
        Self {
            vertical_scale: 1.0,
            vertical_offset: 0.0,
            horizontal_offset: 0.0,
            scale_center: 0.0,
            scale_factor: 1.0,
        }
    }
}

impl From<(f64, f64, f64, f64, f64)> for ReferenceAdjustment {
    fn from(
        (vertical_scale, vertical_offset, horizontal_offset, scale_center, scale_factor): (
            f64,
            f64,
            f64,
            f64,
            f64,
        ),
    ) -> Self {
        Self {
            vertical_scale,
            vertical_offset,
            horizontal_offset,
            scale_center,
            scale_factor,
        }
    }
}

impl ReferenceAdjustment {
    /// Non-positive or non-finite scales mean "disabled" and are replaced by 1.
    /// Non-finite offsets and centers are replaced by 0.
    pub fn normalized(self) -> Self {
        let scale = |v: f64| if v > 0.0 && v.is_finite() { v } else { 1.0 };
        let offset = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            vertical_scale: scale(self.vertical_scale),
            vertical_offset: offset(self.vertical_offset),
            horizontal_offset: offset(self.horizontal_offset),
            scale_center: offset(self.scale_center),
            scale_factor: scale(self.scale_factor),
        }
    }

    /// Positions of the original pixels after stretching and shifting.
    pub fn warped_axis(&self, num_pixels: usize) -> Vec<f64> {
        (0..num_pixels)
            .map(|pixel| {
                (pixel as f64 - self.scale_center) * self.scale_factor + self.scale_center
                    - self.horizontal_offset
            })
            .collect()
    }

    /// Warps one spectrum. Expects an already normalized adjustment.
    pub fn warp_spectrum(&self, spectrum: ArrayView1<f64>, warped_axis: &[f64]) -> Array1<f64> {
        let axis: Vec<f64> = (0..spectrum.len()).map(|pixel| pixel as f64).collect();
        let scaled: Vec<f64> = spectrum
            .iter()
            .map(|&value| value * self.vertical_scale + self.vertical_offset)
            .collect();
        Array1::from(InterpHelper::resample(warped_axis, &scaled, &axis))
    }

    fn warp_shots(&self, shots: ArrayView2<f64>, warped_axis: &[f64]) -> Array2<f64> {
        let mut warped = Array2::zeros(shots.raw_dim());
        for (row, mut out) in shots.outer_iter().zip(warped.outer_iter_mut()) {
            out.assign(&self.warp_spectrum(row, warped_axis));
        }
        warped
    }
}

/// Warps every pump-on and pump-off reference shot; probe shots pass through.
pub fn align_reference(shots: &ShotSet, adjustment: ReferenceAdjustment) -> ShotSet {
    let adjustment = adjustment.normalized();
    let warped_axis = adjustment.warped_axis(shots.num_pixels());
    ShotSet {
        probe_on: shots.probe_on.clone(),
        probe_off: shots.probe_off.clone(),
        reference_on: adjustment.warp_shots(shots.reference_on.view(), &warped_axis),
        reference_off: adjustment.warp_shots(shots.reference_off.view(), &warped_axis),
    }
}
