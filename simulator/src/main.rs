use anyhow::Context;
use clap::Parser;
use generator::profile::{build_background_frame, build_cycle_frame, GeneratorConfig};
use log::{info, warn};
use report::model::CycleReport;
use report::writer::append_reports;
use std::path::PathBuf;
use tacore::telemetry::MetricsRecorder;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline driver for the TA shot-pair processor")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 2)]
    first_pixel: usize,
    #[arg(long, default_value_t = 64)]
    num_pixels: usize,
    #[arg(long, default_value_t = 200)]
    shots: usize,
    #[arg(long, default_value_t = 1)]
    cycles: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Treat even shots as pump-on (long-delay acquisition mode)
    #[arg(long, default_value_t = false)]
    flip: bool,
    /// Append per-cycle JSON lines to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.first_pixel,
            args.num_pixels,
            args.shots,
            args.cycles,
            args.seed,
            args.flip,
        )
    };

    let runner = Runner::new(workflow_config);
    let workflow_config = runner.config();
    let metrics = MetricsRecorder::new();

    let background = if workflow_config.subtract_background || workflow_config.correct_pixels {
        let frame = build_background_frame(&workflow_config.generator)?;
        Some(
            runner
                .prepare_background(&frame)
                .context("preparing background cycle")?,
        )
    } else {
        None
    };

    let mut reports = Vec::with_capacity(workflow_config.cycles);
    for cycle in 0..workflow_config.cycles {
        let generator = GeneratorConfig {
            seed: workflow_config.generator.seed.wrapping_add(cycle as u64),
            ..workflow_config.generator.clone()
        };
        let frame = build_cycle_frame(&generator)?;
        match runner.execute(&frame, background.as_ref()) {
            Ok(result) => {
                metrics.record_processed();
                if result.high_dtt.is_some() {
                    metrics.record_high_dtt();
                }
                info!(
                    "cycle {} -> pairs {}, peak dtt {:?}",
                    cycle, result.pairs, result.peak_dtt
                );
                reports.push(CycleReport::from_result(
                    cycle,
                    frame.ancillary.delay_ps,
                    &result,
                ));
            }
            Err(err) => {
                metrics.record_error();
                warn!("cycle {} failed: {:#}", cycle, err);
            }
        }
    }

    let snapshot = metrics.snapshot();
    println!(
        "Processed {} cycles -> high dtt {}, errors {}",
        snapshot.processed, snapshot.high_dtt, snapshot.errors
    );
    if let Some(last) = reports.last() {
        println!(
            "Last cycle: {} pairs, peak dtt {:?}",
            last.pairs, last.peak_dtt
        );
    }

    if let Some(path) = args.report {
        append_reports(&path, &reports)?;
    }

    Ok(())
}
