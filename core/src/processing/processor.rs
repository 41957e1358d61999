use crate::acquisition::CycleFrame;
use crate::prelude::{PipelineStage, ProcessingError, ProcessingResult};
use crate::processing::align::{self, ReferenceAdjustment};
use crate::processing::average::{ReferencedMeans, ShotMeans};
use crate::processing::background;
use crate::processing::bias::PixelCorrection;
use crate::processing::dtt::{self, DttConfig, DttOutcome, DttPolicy};
use crate::processing::error_estimate::{self, ShotErrors};
use crate::processing::reference::{self, ReferencedShots};
use crate::processing::separate::{self, ShotPolarity, ShotSet};
use crate::processing::trim::{self, PixelWindow};
use crate::telemetry::log::LogManager;
use ndarray::{Array2, ArrayView2};

/// Turns one cycle's probe/reference readouts into a dtt spectrum.
///
/// Every operation checks the current [`PipelineStage`] and fails with a
/// stage error instead of reading buffers an earlier stage has not produced.
/// Stage outputs are fresh owned buffers; nothing is shared with the caller or
/// with a background processor.
pub struct ShotPairProcessor {
    stage: PipelineStage,
    window: PixelWindow,
    untrimmed_probe: Array2<i64>,
    raw_probe: Array2<f64>,
    raw_reference: Array2<f64>,
    probe: Array2<f64>,
    reference: Array2<f64>,
    shots: Option<ShotSet>,
    referenced: Option<ReferencedShots>,
    means: Option<ShotMeans>,
    referenced_means: Option<ReferencedMeans>,
    dtt: Option<DttOutcome>,
    errors: Option<ShotErrors>,
    logger: LogManager,
}

fn check_shapes(probe: ArrayView2<f64>, reference: ArrayView2<f64>) -> ProcessingResult<()> {
    if probe.dim() != reference.dim() {
        return Err(ProcessingError::ShapeMismatch(format!(
            "probe {:?} vs reference {:?}",
            probe.dim(),
            reference.dim()
        )));
    }
    Ok(())
}

impl ShotPairProcessor {
    pub fn new(
        probe: ArrayView2<f64>,
        reference: ArrayView2<f64>,
        window: PixelWindow,
    ) -> ProcessingResult<Self> {
        check_shapes(probe, reference)?;
        let trimmed_probe = trim::trim(probe, &window)?;
        let trimmed_reference = trim::trim(reference, &window)?;

        let processor = Self {
            stage: PipelineStage::Trimmed,
            window,
            untrimmed_probe: probe.mapv(|v| v as i64),
            raw_probe: trimmed_probe.clone(),
            raw_reference: trimmed_reference.clone(),
            probe: trimmed_probe,
            reference: trimmed_reference,
            shots: None,
            referenced: None,
            means: None,
            referenced_means: None,
            dtt: None,
            errors: None,
            logger: LogManager::new(),
        };
        processor.logger.record(&format!(
            "Trimmed {} shots to pixels {:?}",
            probe.nrows(),
            window.range()
        ));
        Ok(processor)
    }

    pub fn from_frame(frame: &CycleFrame, window: PixelWindow) -> ProcessingResult<Self> {
        Self::new(frame.probe.view(), frame.reference.view(), window)
    }

    /// Loads a new cycle into this processor.
    ///
    /// The raw copies captured at construction are kept, so
    /// [`pixel_correction`](Self::pixel_correction) keeps fitting against the
    /// same basis (typically a background measurement). All stage outputs are
    /// discarded and the processor returns to `Trimmed`.
    pub fn update(
        &mut self,
        probe: ArrayView2<f64>,
        reference: ArrayView2<f64>,
        window: PixelWindow,
    ) -> ProcessingResult<()> {
        check_shapes(probe, reference)?;
        let trimmed_probe = trim::trim(probe, &window)?;
        let trimmed_reference = trim::trim(reference, &window)?;

        self.untrimmed_probe = probe.mapv(|v| v as i64);
        self.probe = trimmed_probe;
        self.reference = trimmed_reference;
        self.window = window;
        self.shots = None;
        self.referenced = None;
        self.means = None;
        self.referenced_means = None;
        self.dtt = None;
        self.errors = None;
        self.stage = PipelineStage::Trimmed;
        self.logger
            .record(&format!("Updated cycle with {} shots", probe.nrows()));
        Ok(())
    }

    fn require(
        &self,
        operation: &'static str,
        earliest: PipelineStage,
        latest: PipelineStage,
    ) -> ProcessingResult<()> {
        if self.stage < earliest {
            Err(ProcessingError::StageNotReached {
                operation,
                required: earliest,
                current: self.stage,
            })
        } else if self.stage > latest {
            Err(ProcessingError::StageAlreadyPassed {
                operation,
                current: self.stage,
            })
        } else {
            Ok(())
        }
    }

    fn separated(&self, operation: &'static str) -> ProcessingResult<&ShotSet> {
        self.shots
            .as_ref()
            .ok_or(ProcessingError::StageNotReached {
                operation,
                required: PipelineStage::Separated,
                current: self.stage,
            })
    }

    fn averaged(&self, operation: &'static str) -> ProcessingResult<&ShotMeans> {
        self.means
            .as_ref()
            .ok_or(ProcessingError::StageNotReached {
                operation,
                required: PipelineStage::Averaged,
                current: self.stage,
            })
    }

    fn referenced_pair(
        &self,
        operation: &'static str,
    ) -> ProcessingResult<(&ReferencedShots, &ReferencedMeans)> {
        match (self.referenced.as_ref(), self.referenced_means.as_ref()) {
            (Some(shots), Some(means)) => Ok((shots, means)),
            _ => Err(ProcessingError::StageNotReached {
                operation,
                required: PipelineStage::Referenced,
                current: self.stage,
            }),
        }
    }

    /// Fits the even/odd gain correction from the untouched raw copies.
    pub fn pixel_correction(&self) -> PixelCorrection {
        PixelCorrection::fit(self.raw_probe.view(), self.raw_reference.view())
    }

    pub fn apply_pixel_correction(&mut self, correction: &PixelCorrection) -> ProcessingResult<()> {
        const OP: &str = "apply_pixel_correction";
        self.require(OP, PipelineStage::Trimmed, PipelineStage::Trimmed)?;
        let (probe, reference) = correction.apply(self.probe.view(), self.reference.view())?;
        self.probe = probe;
        self.reference = reference;
        self.stage = PipelineStage::BiasCorrected;
        self.logger.record("Applied even/odd pixel correction");
        Ok(())
    }

    pub fn separate_on_off(&mut self, polarity: ShotPolarity) -> ProcessingResult<()> {
        const OP: &str = "separate_on_off";
        self.require(OP, PipelineStage::Trimmed, PipelineStage::BiasCorrected)?;
        let shots = self.probe.nrows();
        let set = separate::separate(self.probe.view(), self.reference.view(), polarity)?;
        if shots % 2 == 1 {
            self.logger
                .trace(&format!("Dropped trailing shot {} of odd-length cycle", shots - 1));
        }
        self.logger.record(&format!(
            "Separated {} shot pairs ({:?} polarity)",
            set.pairs(),
            polarity
        ));
        self.shots = Some(set);
        self.stage = PipelineStage::Separated;
        Ok(())
    }

    /// Removes a fully averaged background cycle from this cycle's shots.
    pub fn subtract_background(&mut self, background: &ShotPairProcessor) -> ProcessingResult<()> {
        const OP: &str = "subtract_background";
        self.require(OP, PipelineStage::Separated, PipelineStage::Separated)?;
        let background_means = background.averaged(OP)?;
        let cleaned = background::subtract_background(self.separated(OP)?, background_means)?;
        self.shots = Some(cleaned);
        self.stage = PipelineStage::BackgroundSubtracted;
        self.logger.record("Subtracted background spectra");
        Ok(())
    }

    pub fn align_reference(&mut self, adjustment: ReferenceAdjustment) -> ProcessingResult<()> {
        const OP: &str = "align_reference";
        self.require(
            OP,
            PipelineStage::Separated,
            PipelineStage::BackgroundSubtracted,
        )?;
        let aligned = align::align_reference(self.separated(OP)?, adjustment);
        self.shots = Some(aligned);
        self.stage = PipelineStage::ReferenceAligned;
        self.logger
            .record(&format!("Aligned reference with {:?}", adjustment.normalized()));
        Ok(())
    }

    pub fn correct_probe_with_reference(&mut self) -> ProcessingResult<()> {
        const OP: &str = "correct_probe_with_reference";
        self.require(OP, PipelineStage::Separated, PipelineStage::ReferenceAligned)?;
        let referenced = reference::divide_by_reference(self.separated(OP)?);
        self.referenced = Some(referenced);
        self.stage = PipelineStage::Referenced;
        self.logger.record("Divided probe shots by reference");
        Ok(())
    }

    /// Averages the on/off subsets, and the referenced subsets when present.
    pub fn average_shots(&mut self) -> ProcessingResult<()> {
        const OP: &str = "average_shots";
        self.require(OP, PipelineStage::Separated, PipelineStage::Referenced)?;
        let means = ShotMeans::from_shots(self.separated(OP)?);
        self.referenced_means = self.referenced.as_ref().map(ReferencedMeans::from_shots);
        self.means = Some(means);
        self.stage = PipelineStage::Averaged;
        self.logger.record(&format!(
            "Averaged shots (referenced: {})",
            self.referenced_means.is_some()
        ));
        Ok(())
    }

    pub fn calculate_dtt(&mut self, config: &DttConfig) -> ProcessingResult<&DttOutcome> {
        const OP: &str = "calculate_dtt";
        self.require(OP, PipelineStage::Averaged, PipelineStage::DttComputed)?;

        let outcome = if config.policy.uses_reference() {
            let (shots, means) = self.referenced_pair(OP)?;
            dtt::evaluate(
                shots.probe_on.view(),
                shots.probe_off.view(),
                means.probe_off.view(),
                config,
            )
        } else {
            let shots = self.separated(OP)?;
            let means = self.averaged(OP)?;
            dtt::evaluate(
                shots.probe_on.view(),
                shots.probe_off.view(),
                means.probe_off.view(),
                config,
            )
        };

        if let Some(event) = &outcome.high_dtt {
            self.logger.alert(&event.describe());
        }
        self.logger.record(&format!(
            "Computed dtt ({:?}), peak {:?}",
            config.policy, outcome.peak_dtt
        ));
        self.stage = PipelineStage::DttComputed;
        Ok(&*self.dtt.insert(outcome))
    }

    pub fn calculate_dtt_error(&mut self, policy: DttPolicy) -> ProcessingResult<&ShotErrors> {
        const OP: &str = "calculate_dtt_error";
        self.require(OP, PipelineStage::Averaged, PipelineStage::DttComputed)?;
        let referenced = if policy.uses_reference() {
            Some(self.referenced_pair(OP)?.0)
        } else {
            None
        };
        let errors = error_estimate::estimate(
            self.separated(OP)?,
            self.averaged(OP)?,
            referenced,
            policy.uses_avg_off_shots(),
        );
        self.logger.record(&format!("Estimated shot noise ({:?})", policy));
        Ok(&*self.errors.insert(errors))
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn window(&self) -> PixelWindow {
        self.window
    }

    /// Full-width probe readout including the trigger/timing channel.
    pub fn untrimmed_probe(&self) -> &Array2<i64> {
        &self.untrimmed_probe
    }

    pub fn raw_probe(&self) -> &Array2<f64> {
        &self.raw_probe
    }

    pub fn raw_reference(&self) -> &Array2<f64> {
        &self.raw_reference
    }

    pub fn probe(&self) -> &Array2<f64> {
        &self.probe
    }

    pub fn reference(&self) -> &Array2<f64> {
        &self.reference
    }

    pub fn shots(&self) -> Option<&ShotSet> {
        self.shots.as_ref()
    }

    pub fn referenced_shots(&self) -> Option<&ReferencedShots> {
        self.referenced.as_ref()
    }

    pub fn means(&self) -> Option<&ShotMeans> {
        self.means.as_ref()
    }

    pub fn referenced_means(&self) -> Option<&ReferencedMeans> {
        self.referenced_means.as_ref()
    }

    pub fn dtt(&self) -> Option<&DttOutcome> {
        self.dtt.as_ref()
    }

    pub fn errors(&self) -> Option<&ShotErrors> {
        self.errors.as_ref()
    }
}
