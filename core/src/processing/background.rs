use crate::prelude::{ProcessingError, ProcessingResult};
use crate::processing::average::ShotMeans;
use crate::processing::separate::ShotSet;

/// Subtracts a background cycle's mean spectra from every shot of `shots`.
pub fn subtract_background(shots: &ShotSet, background: &ShotMeans) -> ProcessingResult<ShotSet> {
    if background.num_pixels() != shots.num_pixels() {
        return Err(ProcessingError::ShapeMismatch(format!(
            "background has {} pixels, cycle has {}",
            background.num_pixels(),
            shots.num_pixels()
        )));
    }

    Ok(ShotSet {
        probe_on: &shots.probe_on - &background.probe_on,
        probe_off: &shots.probe_off - &background.probe_off,
        reference_on: &shots.reference_on - &background.reference_on,
        reference_off: &shots.reference_off - &background.reference_off,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn background_is_broadcast_over_shots() {
        let shots = ShotSet {
            probe_on: array![[5.0, 6.0], [7.0, 8.0]],
            probe_off: array![[4.0, 4.0], [4.0, 4.0]],
            reference_on: array![[3.0, 3.0], [3.0, 3.0]],
            reference_off: array![[2.0, 2.0], [2.0, 2.0]],
        };
        let background = ShotMeans {
            probe_on: array![1.0, 2.0],
            probe_off: array![4.0, 0.0],
            reference_on: array![1.0, 1.0],
            reference_off: array![0.5, 0.5],
        };
        let cleaned = subtract_background(&shots, &background).unwrap();
        assert_eq!(cleaned.probe_on, array![[4.0, 4.0], [6.0, 6.0]]);
        assert_eq!(cleaned.probe_off, array![[0.0, 4.0], [0.0, 4.0]]);
        assert_eq!(cleaned.reference_on, array![[2.0, 2.0], [2.0, 2.0]]);
        assert_eq!(cleaned.reference_off, array![[1.5, 1.5], [1.5, 1.5]]);
    }

    #[test]
    fn background_width_must_match() {
        let shots = ShotSet {
            probe_on: array![[1.0, 1.0]],
            probe_off: array![[1.0, 1.0]],
            reference_on: array![[1.0, 1.0]],
            reference_off: array![[1.0, 1.0]],
        };
        let background = ShotMeans {
            probe_on: Array1::zeros(3),
            probe_off: Array1::zeros(3),
            reference_on: Array1::zeros(3),
            reference_off: Array1::zeros(3),
        };
        assert!(subtract_background(&shots, &background).is_err());
    }
}
