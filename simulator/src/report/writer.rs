use crate::report::model::CycleReport;
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Appends one JSON object per cycle to `path`, creating parent directories.
pub fn append_reports(path: &Path, reports: &[CycleReport]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    for report in reports {
        let line = serde_json::to_string(report).context("serializing cycle report")?;
        writeln!(file, "{}", line).with_context(|| format!("writing report {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_are_appended_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cycles.jsonl");
        let report = CycleReport {
            cycle: 1,
            dtt: vec![0.1],
            ..Default::default()
        };

        append_reports(&path, &[report.clone()]).unwrap();
        append_reports(&path, &[report]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: CycleReport = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.cycle, 1);
        assert_eq!(parsed.dtt, vec![0.1]);
    }
}
