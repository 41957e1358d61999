use crate::prelude::{ProcessingError, ProcessingResult};
use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Active-pixel window `[first_pixel, first_pixel + num_pixels)` of the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelWindow {
    pub first_pixel: usize,
    pub num_pixels: usize,
}

impl PixelWindow {
    pub fn new(first_pixel: usize, num_pixels: usize) -> Self {
        Self {
            first_pixel,
            num_pixels,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.first_pixel..self.first_pixel.saturating_add(self.num_pixels)
    }

    /// Rejects empty windows and windows that run past the raw readout.
    pub fn validate(&self, raw_pixels: usize) -> ProcessingResult<()> {
        if self.num_pixels == 0 {
            return Err(ProcessingError::InvalidWindow);
        }
        match self.first_pixel.checked_add(self.num_pixels) {
            Some(end) if end <= raw_pixels => Ok(()),
            _ => Err(ProcessingError::WindowOutOfRange {
                first_pixel: self.first_pixel,
                num_pixels: self.num_pixels,
                raw_pixels,
            }),
        }
    }
}

/// Copies the window's columns out of a raw (shots x raw_pixels) matrix.
pub fn trim(raw: ArrayView2<f64>, window: &PixelWindow) -> ProcessingResult<Array2<f64>> {
    window.validate(raw.ncols())?;
    Ok(raw.slice(s![.., window.range()]).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn trim_keeps_window_columns_exactly() {
        let raw = array![[0.0, 1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0, 9.0]];
        let trimmed = trim(raw.view(), &PixelWindow::new(1, 3)).unwrap();
        assert_eq!(trimmed.dim(), (2, 3));
        assert_eq!(trimmed, array![[1.0, 2.0, 3.0], [6.0, 7.0, 8.0]]);
    }

    #[test]
    fn window_touching_last_pixel_is_valid() {
        let raw = Array2::<f64>::zeros((3, 4));
        assert!(trim(raw.view(), &PixelWindow::new(2, 2)).is_ok());
    }

    #[test]
    fn window_past_readout_is_rejected() {
        let raw = Array2::<f64>::zeros((3, 4));
        let err = trim(raw.view(), &PixelWindow::new(2, 3)).unwrap_err();
        assert_eq!(
            err,
            ProcessingError::WindowOutOfRange {
                first_pixel: 2,
                num_pixels: 3,
                raw_pixels: 4,
            }
        );
    }

    #[test]
    fn empty_window_is_rejected() {
        let raw = Array2::<f64>::zeros((2, 4));
        assert_eq!(
            trim(raw.view(), &PixelWindow::new(0, 0)).unwrap_err(),
            ProcessingError::InvalidWindow
        );
    }

    #[test]
    fn overflowing_window_is_rejected() {
        assert!(PixelWindow::new(usize::MAX, 2).validate(8).is_err());
    }
}
