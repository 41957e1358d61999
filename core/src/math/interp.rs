/// Piecewise-linear resampling helpers.
pub struct InterpHelper;

impl InterpHelper {
    /// Evaluates the polyline through `(xp[i], fp[i])` at `x`.
    ///
    /// `xp` must be increasing. Points left of `xp[0]` take `fp[0]` and points
    /// right of the last knot take the last value.
    pub fn linear(xp: &[f64], fp: &[f64], x: f64) -> f64 {
        let len = xp.len().min(fp.len());
        if len == 0 || x.is_nan() {
            return f64::NAN;
        }
        if x <= xp[0] {
            return fp[0];
        }
        if x >= xp[len - 1] {
            return fp[len - 1];
        }

        // first knot strictly greater than x; 0 only when the knots are NaN
        let right = xp[..len].partition_point(|&knot| knot <= x);
        if right == 0 {
            return fp[0];
        }
        let left = right - 1;
        let span = xp[right] - xp[left];
        if span <= 0.0 {
            return fp[left];
        }
        let frac = (x - xp[left]) / span;
        fp[left] + frac * (fp[right] - fp[left])
    }

    /// Resamples `fp` (defined at `xp`) onto every point of `x`.
    pub fn resample(xp: &[f64], fp: &[f64], x: &[f64]) -> Vec<f64> {
        x.iter().map(|&point| Self::linear(xp, fp, point)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn interpolates_between_knots() {
        let xp = [0.0, 1.0, 2.0];
        let fp = [0.0, 10.0, 30.0];
        assert_abs_diff_eq!(InterpHelper::linear(&xp, &fp, 0.5), 5.0);
        assert_abs_diff_eq!(InterpHelper::linear(&xp, &fp, 1.5), 20.0);
        assert_abs_diff_eq!(InterpHelper::linear(&xp, &fp, 1.0), 10.0);
    }

    #[test]
    fn clamps_to_edge_values() {
        let xp = [1.0, 2.0];
        let fp = [4.0, 8.0];
        assert_eq!(InterpHelper::linear(&xp, &fp, -3.0), 4.0);
        assert_eq!(InterpHelper::linear(&xp, &fp, 9.0), 8.0);
    }

    #[test]
    fn nan_knots_fall_back_to_first_value() {
        let xp = [f64::NAN, f64::NAN, f64::NAN];
        let fp = [4.0, 5.0, 6.0];
        assert_eq!(InterpHelper::linear(&xp, &fp, 1.0), 4.0);
        assert!(InterpHelper::linear(&[0.0, 1.0], &fp, f64::NAN).is_nan());
    }

    #[test]
    fn resample_on_identical_axis_is_identity() {
        let axis = [0.0, 1.0, 2.0, 3.0];
        let values = [3.0, -1.0, 7.5, 2.0];
        assert_eq!(InterpHelper::resample(&axis, &values, &axis), values.to_vec());
    }
}
