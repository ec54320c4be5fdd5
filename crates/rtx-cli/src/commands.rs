use anyhow::Result;
use rtx_cli::pipeline::{render_config, run, run_yoy};
use rtx_cli::types::{FrameSummary, RunRequest, RunResult, YoyRequest};

use crate::cli::{ConfigArgs, RunArgs, YoyArgs};

pub fn run_pipeline(args: &RunArgs) -> Result<RunResult> {
    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        args.daily_activity
            .parent()
            .map(|parent| parent.join("output"))
            .unwrap_or_else(|| "output".into())
    });
    run(&RunRequest {
        daily_activity: args.daily_activity.clone(),
        responses: args.responses.clone(),
        dictionary: args.dictionary.clone(),
        output_dir,
        config: args.config.clone(),
        emit_client_date_frame: args.emit_client_date_frame,
        report: args.report.clone(),
        dry_run: args.dry_run,
    })
}

pub fn run_yoy_frame(args: &YoyArgs) -> Result<FrameSummary> {
    run_yoy(&YoyRequest {
        long_frame: args.long_frame.clone(),
        client_date_frame: args.client_date_frame.clone(),
        config: args.config.clone(),
        output: args.output.clone(),
    })
}

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    print!("{}", render_config(args.config.as_deref())?);
    Ok(())
}
