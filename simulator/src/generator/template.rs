/// Unit-height Gaussian band sampled on `length` detector pixels.
pub fn gaussian_band(length: usize, center: f64, width: f64) -> Vec<f64> {
    let width = if width > 0.0 { width } else { 1.0 };
    (0..length)
        .map(|pixel| {
            let offset = (pixel as f64 - center) / width;
            (-0.5 * offset * offset).exp()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_peaks_at_center() {
        let band = gaussian_band(9, 4.0, 2.0);
        assert_eq!(band[4], 1.0);
        assert!(band[0] < band[2]);
        assert!((band[3] - band[5]).abs() < 1e-12);
    }
}
