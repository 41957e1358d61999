use ndarray::{Array1, ArrayView2, Axis};

pub struct StatsHelper;

impl StatsHelper {
    /// Per-pixel mean across shots (rows). An empty shot set yields NaN pixels.
    pub fn mean_over_shots(shots: ArrayView2<f64>) -> Array1<f64> {
        shots
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::from_elem(shots.ncols(), f64::NAN))
    }

    /// Per-pixel population standard deviation (ddof = 0) across shots.
    pub fn std_over_shots(shots: ArrayView2<f64>) -> Array1<f64> {
        shots.std_axis(Axis(0), 0.0)
    }

    /// Largest absolute value among the finite entries, if any.
    pub fn max_abs_finite<'a, I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = &'a f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .map(|v| v.abs())
            .fold(None, |acc, v| match acc {
                Some(best) if best >= v => Some(best),
                _ => Some(v),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn mean_of_two_shots_is_midpoint() {
        let shots = array![[2.0, 10.0], [4.0, 20.0]];
        let mean = StatsHelper::mean_over_shots(shots.view());
        assert_abs_diff_eq!(mean[0], 3.0);
        assert_abs_diff_eq!(mean[1], 15.0);
    }

    #[test]
    fn std_uses_population_normalization() {
        let shots = array![[1.0], [3.0]];
        let std = StatsHelper::std_over_shots(shots.view());
        assert_abs_diff_eq!(std[0], 1.0);
    }

    #[test]
    fn max_abs_skips_non_finite_values() {
        let values = [0.5, f64::NAN, -2.0, f64::INFINITY, 1.0];
        assert_eq!(StatsHelper::max_abs_finite(values.iter()), Some(2.0));
        assert_eq!(StatsHelper::max_abs_finite([f64::NAN].iter()), None);
        let empty: [f64; 0] = [];
        assert_eq!(StatsHelper::max_abs_finite(empty.iter()), None);
    }
}
