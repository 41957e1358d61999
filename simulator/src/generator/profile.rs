use crate::generator::template::gaussian_band;
use anyhow::{ensure, Context};
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tacore::acquisition::{CycleAncillary, CycleFrame};
use tacore::processing::ShotPolarity;

/// Configuration for synthesizing one acquisition cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub shots: usize,
    pub raw_pixels: usize,
    /// Camera counts with the probe blocked.
    pub dark_level: f64,
    pub probe_amplitude: f64,
    pub reference_amplitude: f64,
    pub band_center: f64,
    pub band_width: f64,
    /// Fractional probe change on pump-on shots at the band maximum.
    pub dtt_amplitude: f64,
    /// Gain of even pixels relative to odd pixels.
    pub even_odd_gain: f64,
    pub noise: f64,
    pub trigger_level: f64,
    pub delay_ps: f64,
    pub seed: u64,
    pub polarity: ShotPolarity,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            shots: 200,
            raw_pixels: 68,
            dark_level: 150.0,
            probe_amplitude: 3000.0,
            reference_amplitude: 2800.0,
            band_center: 34.0,
            band_width: 14.0,
            dtt_amplitude: 0.02,
            even_odd_gain: 1.08,
            noise: 2.0,
            trigger_level: 4095.0,
            delay_ps: 10.0,
            seed: 0,
            polarity: ShotPolarity::Standard,
        }
    }
}

impl GeneratorConfig {
    /// Same detector and seed with the probe blocked and no pump signal.
    pub fn background(&self) -> Self {
        Self {
            probe_amplitude: 0.0,
            reference_amplitude: 0.0,
            dtt_amplitude: 0.0,
            seed: self.seed.wrapping_add(u64::MAX / 2),
            ..self.clone()
        }
    }

    /// The trigger channel occupies the last raw pixel.
    pub fn trigger_pixel(&self) -> usize {
        self.raw_pixels.saturating_sub(1)
    }

    fn pump_on(&self, shot: usize) -> bool {
        match self.polarity {
            ShotPolarity::Standard => shot % 2 == 1,
            ShotPolarity::Flipped => shot % 2 == 0,
        }
    }
}

fn jitter(rng: &mut StdRng, noise: f64) -> f64 {
    if noise > 0.0 {
        rng.gen_range(-noise..noise)
    } else {
        0.0
    }
}

pub fn build_cycle_frame(config: &GeneratorConfig) -> anyhow::Result<CycleFrame> {
    ensure!(config.shots >= 2, "generator needs at least two shots");
    ensure!(config.raw_pixels >= 2, "generator needs a trigger pixel and signal pixels");
    let cells = config
        .shots
        .checked_mul(config.raw_pixels)
        .context("overflow computing frame size for generator")?;

    let trigger_pixel = config.trigger_pixel();
    let band = gaussian_band(trigger_pixel, config.band_center, config.band_width);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut probe = Vec::with_capacity(cells);
    let mut reference = Vec::with_capacity(cells);

    for shot in 0..config.shots {
        let pumped = config.pump_on(shot);
        for pixel in 0..config.raw_pixels {
            if pixel == trigger_pixel {
                probe.push(if pumped { config.trigger_level } else { 0.0 });
                reference.push(0.0);
                continue;
            }
            let gain = if pixel % 2 == 0 {
                config.even_odd_gain
            } else {
                1.0
            };
            let shape = band[pixel];
            let response = if pumped {
                1.0 + config.dtt_amplitude * shape
            } else {
                1.0
            };
            let probe_counts = config.probe_amplitude * shape * response;
            let reference_counts = config.reference_amplitude * shape;
            probe.push((config.dark_level + probe_counts) * gain + jitter(&mut rng, config.noise));
            reference.push(
                (config.dark_level + reference_counts) * gain + jitter(&mut rng, config.noise),
            );
        }
    }

    let shape = (config.shots, config.raw_pixels);
    let ancillary = CycleAncillary {
        timestamp: 0.0,
        delay_ps: config.delay_ps,
        polarity: config.polarity,
        label: None,
    };
    Ok(CycleFrame::new(
        Array2::from_shape_vec(shape, probe).context("shaping probe frame")?,
        Array2::from_shape_vec(shape, reference).context("shaping reference frame")?,
        ancillary,
    ))
}

pub fn build_background_frame(config: &GeneratorConfig) -> anyhow::Result<CycleFrame> {
    let mut frame = build_cycle_frame(&config.background())?;
    frame.ancillary.label = Some("background".into());
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_expected_frame_shape() {
        let frame = build_cycle_frame(&GeneratorConfig::default()).unwrap();
        assert_eq!(frame.shots(), 200);
        assert_eq!(frame.raw_pixels(), 68);
        assert_eq!(frame.probe.dim(), frame.reference.dim());
    }

    #[test]
    fn trigger_column_marks_pump_on_shots() {
        let config = GeneratorConfig {
            shots: 4,
            polarity: ShotPolarity::Flipped,
            ..Default::default()
        };
        let frame = build_cycle_frame(&config).unwrap();
        let trigger = frame.probe.column(config.trigger_pixel()).to_vec();
        assert_eq!(trigger, vec![4095.0, 0.0, 4095.0, 0.0]);
    }

    #[test]
    fn background_frame_is_dark_without_pump() {
        let config = GeneratorConfig {
            shots: 6,
            noise: 0.0,
            ..Default::default()
        };
        let frame = build_background_frame(&config).unwrap();
        assert_eq!(frame.probe[[0, 1]], 150.0);
        assert_eq!(frame.probe[[1, 1]], 150.0);
        assert!((frame.probe[[0, 0]] - 150.0 * 1.08).abs() < 1e-9);
        assert_eq!(frame.ancillary.label.as_deref(), Some("background"));
    }

    #[test]
    fn same_seed_reproduces_frame() {
        let config = GeneratorConfig {
            shots: 8,
            seed: 42,
            ..Default::default()
        };
        let first = build_cycle_frame(&config).unwrap();
        let second = build_cycle_frame(&config).unwrap();
        assert_eq!(first.probe, second.probe);
    }

    #[test]
    fn too_few_shots_are_rejected() {
        let config = GeneratorConfig {
            shots: 1,
            ..Default::default()
        };
        assert!(build_cycle_frame(&config).is_err());
    }
}
