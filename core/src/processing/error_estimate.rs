use crate::math::stats::StatsHelper;
use crate::processing::average::ShotMeans;
use crate::processing::reference::ReferencedShots;
use crate::processing::separate::ShotSet;
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Shot-to-shot noise estimates for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotErrors {
    pub probe_shot_error: Array1<f64>,
    pub ref_shot_error: Array1<f64>,
    /// Spread of the referenced pump-off shots; only set for referenced policies.
    pub dtt_error: Option<Array1<f64>>,
}

/// Per-pixel std of `2 (on - off) / (on + off)` across shot pairs.
///
/// The numerator always uses the per-shot matrices. With `averaged` the
/// denominator uses the mean spectra instead.
pub fn relative_difference_noise(
    on: ArrayView2<f64>,
    off: ArrayView2<f64>,
    on_mean: ArrayView1<f64>,
    off_mean: ArrayView1<f64>,
    averaged: bool,
) -> Array1<f64> {
    let numerator = (&on - &off) * 2.0;
    let relative = if averaged {
        let denominator = &on_mean + &off_mean;
        &numerator / &denominator
    } else {
        let denominator = &on + &off;
        &numerator / &denominator
    };
    StatsHelper::std_over_shots(relative.view())
}

pub fn estimate(
    shots: &ShotSet,
    means: &ShotMeans,
    referenced: Option<&ReferencedShots>,
    averaged: bool,
) -> ShotErrors {
    let probe_shot_error = relative_difference_noise(
        shots.probe_on.view(),
        shots.probe_off.view(),
        means.probe_on.view(),
        means.probe_off.view(),
        averaged,
    );
    let ref_shot_error = relative_difference_noise(
        shots.reference_on.view(),
        shots.reference_off.view(),
        means.reference_on.view(),
        means.reference_off.view(),
        averaged,
    );
    let dtt_error =
        referenced.map(|referenced| StatsHelper::std_over_shots(referenced.probe_off.view()));

    ShotErrors {
        probe_shot_error,
        ref_shot_error,
        dtt_error,
    }
}
