use crate::workflow::runner::CycleResult;
use serde::{Deserialize, Serialize};

/// One processed cycle as written to the JSON-lines report.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CycleReport {
    pub cycle: usize,
    pub delay_ps: f64,
    pub pairs: usize,
    pub peak_dtt: Option<f64>,
    pub high_dtt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_dtt_at: Option<String>,
    pub dtt: Vec<f64>,
    pub probe_shot_error: Vec<f64>,
    pub ref_shot_error: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtt_error: Option<Vec<f64>>,
}

impl CycleReport {
    pub fn from_result(cycle: usize, delay_ps: f64, result: &CycleResult) -> Self {
        Self {
            cycle,
            delay_ps,
            pairs: result.pairs,
            peak_dtt: result.peak_dtt,
            high_dtt: result.high_dtt.is_some(),
            high_dtt_at: result
                .high_dtt
                .as_ref()
                .map(|event| event.timestamp.to_rfc3339()),
            dtt: result.dtt.clone(),
            probe_shot_error: result.probe_shot_error.clone(),
            ref_shot_error: result.ref_shot_error.clone(),
            dtt_error: result.dtt_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacore::acquisition::HighDttEvent;

    #[test]
    fn report_carries_high_dtt_timestamp() {
        let result = CycleResult {
            pairs: 2,
            dtt: vec![0.5, 2.0],
            peak_dtt: Some(2.0),
            high_dtt: Some(HighDttEvent::new(2.0, 1.0)),
            probe_shot_error: vec![0.0, 0.0],
            ref_shot_error: vec![0.0, 0.0],
            dtt_error: None,
        };
        let report = CycleReport::from_result(3, 25.0, &result);
        assert!(report.high_dtt);
        assert!(report.high_dtt_at.is_some());
        assert_eq!(report.cycle, 3);

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("dtt_error"));
    }
}
