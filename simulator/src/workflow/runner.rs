use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use tacore::acquisition::{CycleFrame, HighDttEvent};
use tacore::processing::{PixelCorrection, ShotPairProcessor};

pub struct CycleResult {
    pub pairs: usize,
    pub dtt: Vec<f64>,
    pub peak_dtt: Option<f64>,
    pub high_dtt: Option<HighDttEvent>,
    pub probe_shot_error: Vec<f64>,
    pub ref_shot_error: Vec<f64>,
    pub dtt_error: Option<Vec<f64>>,
}

/// Averaged background cycle plus the pixel correction fitted from it.
pub struct Background {
    processor: ShotPairProcessor,
    correction: PixelCorrection,
}

impl Background {
    pub fn correction(&self) -> &PixelCorrection {
        &self.correction
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn prepare_background(&self, frame: &CycleFrame) -> anyhow::Result<Background> {
        let mut processor = ShotPairProcessor::from_frame(frame, self.config.window)
            .context("trimming background cycle")?;
        let correction = processor.pixel_correction();
        if self.config.correct_pixels {
            processor
                .apply_pixel_correction(&correction)
                .context("correcting background pixels")?;
        }
        processor
            .separate_on_off(self.config.polarity)
            .context("separating background shots")?;
        processor
            .average_shots()
            .context("averaging background shots")?;
        Ok(Background {
            processor,
            correction,
        })
    }

    pub fn execute(
        &self,
        frame: &CycleFrame,
        background: Option<&Background>,
    ) -> anyhow::Result<CycleResult> {
        let config = &self.config;
        let mut processor =
            ShotPairProcessor::from_frame(frame, config.window).context("trimming cycle")?;

        if config.correct_pixels {
            let correction = match background {
                Some(background) => background.correction().clone(),
                None => processor.pixel_correction(),
            };
            processor
                .apply_pixel_correction(&correction)
                .context("correcting pixels")?;
        }

        processor
            .separate_on_off(config.polarity)
            .context("separating shots")?;

        if config.subtract_background {
            let background =
                background.context("background subtraction requested without a background")?;
            processor
                .subtract_background(&background.processor)
                .context("subtracting background")?;
        }

        if let Some(adjustment) = config.reference_adjustment {
            processor
                .align_reference(adjustment)
                .context("aligning reference")?;
        }

        if config.needs_reference() {
            processor
                .correct_probe_with_reference()
                .context("referencing probe")?;
        }

        processor.average_shots().context("averaging shots")?;

        let outcome = processor
            .calculate_dtt(&config.dtt)
            .context("calculating dtt")?;
        let dtt = outcome.dtt.to_vec();
        let peak_dtt = outcome.peak_dtt;
        let high_dtt = outcome.high_dtt.clone();

        let pairs = processor.shots().map(|shots| shots.pairs()).unwrap_or(0);
        let errors = processor
            .calculate_dtt_error(config.error_policy)
            .context("estimating shot noise")?;

        Ok(CycleResult {
            pairs,
            dtt,
            peak_dtt,
            high_dtt,
            probe_shot_error: errors.probe_shot_error.to_vec(),
            ref_shot_error: errors.ref_shot_error.to_vec(),
            dtt_error: errors.dtt_error.as_ref().map(|error| error.to_vec()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_background_frame, build_cycle_frame};
    use tacore::processing::DttConfig;

    #[test]
    fn runner_executes_workflow() {
        let cfg = WorkflowConfig::from_args(2, 64, 200, 1, 3, false);
        let runner = Runner::new(cfg.clone());
        let background = runner
            .prepare_background(&build_background_frame(&cfg.generator).unwrap())
            .unwrap();
        let frame = build_cycle_frame(&cfg.generator).unwrap();
        let result = runner.execute(&frame, Some(&background)).unwrap();

        assert_eq!(result.pairs, 100);
        assert_eq!(result.dtt.len(), 64);
        assert!(result.high_dtt.is_none());
        assert!(result.dtt_error.is_some());
        let peak = result.peak_dtt.unwrap();
        assert!(peak > 0.01 && peak < 0.03, "peak {}", peak);
    }

    #[test]
    fn background_correction_recovers_even_odd_gain() {
        let cfg = WorkflowConfig::default();
        let runner = Runner::new(cfg.clone());
        let background = runner
            .prepare_background(&build_background_frame(&cfg.generator).unwrap())
            .unwrap();
        let ratio = background.correction().probe[0];
        assert!((ratio - 1.08).abs() < 0.01, "ratio {}", ratio);
        assert_eq!(background.correction().probe[1], 1.0);
    }

    #[test]
    fn low_threshold_flags_high_dtt() {
        let mut cfg = WorkflowConfig::default();
        cfg.dtt = DttConfig {
            max_dtt: 0.001,
            ..Default::default()
        };
        let runner = Runner::new(cfg.clone());
        let background = runner
            .prepare_background(&build_background_frame(&cfg.generator).unwrap())
            .unwrap();
        let frame = build_cycle_frame(&cfg.generator).unwrap();
        let result = runner.execute(&frame, Some(&background)).unwrap();
        assert!(result.high_dtt.is_some());
        assert_eq!(result.dtt.len(), 64);
    }

    #[test]
    fn background_subtraction_requires_background() {
        let runner = Runner::new(WorkflowConfig::default());
        let frame = build_cycle_frame(&runner.config().generator).unwrap();
        assert!(runner.execute(&frame, None).is_err());
    }
}
