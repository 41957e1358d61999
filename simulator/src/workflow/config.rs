use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tacore::processing::{DttConfig, DttPolicy, PixelWindow, ReferenceAdjustment, ShotPolarity};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub window: PixelWindow,
    pub polarity: ShotPolarity,
    pub cycles: usize,
    pub correct_pixels: bool,
    pub subtract_background: bool,
    pub reference_adjustment: Option<ReferenceAdjustment>,
    pub dtt: DttConfig,
    pub error_policy: DttPolicy,
    pub generator: GeneratorConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            window: PixelWindow::new(2, 64),
            polarity: ShotPolarity::Standard,
            cycles: 1,
            correct_pixels: true,
            subtract_background: true,
            reference_adjustment: None,
            dtt: DttConfig::default(),
            error_policy: DttPolicy::ReferencedAveragedOff,
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        first_pixel: usize,
        num_pixels: usize,
        shots: usize,
        cycles: usize,
        seed: u64,
        tau_flip: bool,
    ) -> Self {
        let polarity = ShotPolarity::from_tau_flip(tau_flip);
        Self {
            window: PixelWindow::new(first_pixel, num_pixels),
            polarity,
            cycles,
            generator: GeneratorConfig {
                shots,
                seed,
                polarity,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Referencing runs whenever either the dtt or the error policy needs it.
    pub fn needs_reference(&self) -> bool {
        self.dtt.policy.uses_reference() || self.error_policy.uses_reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_sets_window_and_polarity() {
        let cfg = WorkflowConfig::from_args(1, 32, 100, 3, 7, true);
        assert_eq!(cfg.window, PixelWindow::new(1, 32));
        assert_eq!(cfg.polarity, ShotPolarity::Flipped);
        assert_eq!(cfg.generator.polarity, ShotPolarity::Flipped);
        assert_eq!(cfg.generator.shots, 100);
        assert_eq!(cfg.cycles, 3);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"window:\n  first_pixel: 4\n  num_pixels: 32\npolarity: flipped\n\
dtt:\n  policy: referenced_per_shot_off\n  cutoff: [2, 30]\n  max_dtt: 0.5\n\
reference_adjustment:\n  horizontal_offset: 0.5\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.window.first_pixel, 4);
        assert_eq!(cfg.polarity, ShotPolarity::Flipped);
        assert_eq!(cfg.dtt.policy, DttPolicy::ReferencedPerShotOff);
        assert_eq!(cfg.dtt.cutoff, (2, 30));
        let adjustment = cfg.reference_adjustment.unwrap();
        assert_eq!(adjustment.horizontal_offset, 0.5);
        assert_eq!(adjustment.scale_factor, 1.0);
        assert!(cfg.needs_reference());
    }

    #[test]
    fn default_config_references_for_error_estimate() {
        let cfg = WorkflowConfig::default();
        assert!(!cfg.dtt.policy.uses_reference());
        assert!(cfg.needs_reference());
    }
}
