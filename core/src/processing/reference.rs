use crate::processing::separate::ShotSet;
use ndarray::Array2;

/// Probe shots divided element-wise by their reference shots.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencedShots {
    pub probe_on: Array2<f64>,
    pub probe_off: Array2<f64>,
}

/// Near-zero reference values are not guarded; they surface as non-finite
/// entries and are filtered by the dtt anomaly check.
pub fn divide_by_reference(shots: &ShotSet) -> ReferencedShots {
    ReferencedShots {
        probe_on: &shots.probe_on / &shots.reference_on,
        probe_off: &shots.probe_off / &shots.reference_off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn probe_is_divided_row_for_row() {
        let shots = ShotSet {
            probe_on: array![[4.0, 9.0], [8.0, 3.0]],
            probe_off: array![[1.0, 1.0], [6.0, 6.0]],
            reference_on: array![[2.0, 3.0], [4.0, 3.0]],
            reference_off: array![[1.0, 2.0], [3.0, 0.0]],
        };
        let referenced = divide_by_reference(&shots);
        assert_eq!(referenced.probe_on, array![[2.0, 3.0], [2.0, 1.0]]);
        assert_eq!(referenced.probe_off[[0, 1]], 0.5);
        assert_eq!(referenced.probe_off[[1, 0]], 2.0);
        assert!(referenced.probe_off[[1, 1]].is_infinite());
    }
}
