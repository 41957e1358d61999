use crate::acquisition::HighDttEvent;
use crate::math::stats::StatsHelper;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Added to the off-shot denominator so near-zero transmission cannot blow up.
pub const DTT_STABILIZATION_OFFSET: f64 = 10.0;

/// The four `(use_reference, use_avg_off_shots)` combinations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DttPolicy {
    RawPerShotOff,
    #[default]
    RawAveragedOff,
    ReferencedPerShotOff,
    ReferencedAveragedOff,
}

impl DttPolicy {
    pub fn from_flags(use_reference: bool, use_avg_off_shots: bool) -> Self {
        match (use_reference, use_avg_off_shots) {
            (false, false) => DttPolicy::RawPerShotOff,
            (false, true) => DttPolicy::RawAveragedOff,
            (true, false) => DttPolicy::ReferencedPerShotOff,
            (true, true) => DttPolicy::ReferencedAveragedOff,
        }
    }

    pub fn uses_reference(self) -> bool {
        matches!(
            self,
            DttPolicy::ReferencedPerShotOff | DttPolicy::ReferencedAveragedOff
        )
    }

    pub fn uses_avg_off_shots(self) -> bool {
        matches!(
            self,
            DttPolicy::RawAveragedOff | DttPolicy::ReferencedAveragedOff
        )
    }
}

/// Per-invocation dtt settings supplied by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DttConfig {
    pub policy: DttPolicy,
    /// Pixel range `[low, high)` inspected by the anomaly check.
    pub cutoff: (usize, usize),
    pub max_dtt: f64,
}

impl Default for DttConfig {
    fn default() -> Self {
        Self {
            policy: DttPolicy::RawAveragedOff,
            cutoff: (0, 100),
            max_dtt: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DttOutcome {
    pub dtt_array: Array2<f64>,
    pub dtt: Array1<f64>,
    /// Largest finite |dtt| inside the cutoff window.
    pub peak_dtt: Option<f64>,
    pub high_dtt: Option<HighDttEvent>,
}

impl DttOutcome {
    pub fn is_high(&self) -> bool {
        self.high_dtt.is_some()
    }
}

/// `(on - off) / (off_term + 10)` for every shot pair.
pub fn shot_pair_dtt(
    on: ArrayView2<f64>,
    off: ArrayView2<f64>,
    off_mean: ArrayView1<f64>,
    averaged_off: bool,
) -> Array2<f64> {
    let difference = &on - &off;
    if averaged_off {
        let denominator = off_mean.mapv(|v| v + DTT_STABILIZATION_OFFSET);
        &difference / &denominator
    } else {
        let denominator = off.mapv(|v| v + DTT_STABILIZATION_OFFSET);
        &difference / &denominator
    }
}

/// Largest finite |dtt| in `[low, high)`; the window is clipped to the spectrum.
pub fn peak_in_window(dtt: ArrayView1<f64>, cutoff: (usize, usize)) -> Option<f64> {
    let high = cutoff.1.min(dtt.len());
    let low = cutoff.0.min(high);
    StatsHelper::max_abs_finite(dtt.slice(s![low..high]).iter())
}

pub fn evaluate(
    on: ArrayView2<f64>,
    off: ArrayView2<f64>,
    off_mean: ArrayView1<f64>,
    config: &DttConfig,
) -> DttOutcome {
    let dtt_array = shot_pair_dtt(on, off, off_mean, config.policy.uses_avg_off_shots());
    let dtt = StatsHelper::mean_over_shots(dtt_array.view());
    let peak_dtt = peak_in_window(dtt.view(), config.cutoff);
    let high_dtt = peak_dtt
        .filter(|&peak| peak > config.max_dtt)
        .map(|peak| HighDttEvent::new(peak, config.max_dtt));

    DttOutcome {
        dtt_array,
        dtt,
        peak_dtt,
        high_dtt,
    }
}
