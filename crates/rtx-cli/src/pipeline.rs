//! File-level orchestration around the transform pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rtx_ingest::{config_to_toml, load_config_or_default, read_table, write_table};
use rtx_model::{PipelineConfig, Table};
use rtx_transform::{PipelineInputs, recompute_yoy, run_pipeline};
use tracing::{info, info_span};

use crate::types::{FrameSummary, RunRequest, RunResult, YoyRequest};

pub const LONG_FRAME_FILE: &str = "long_frame.csv";
pub const WIDE_FRAME_FILE: &str = "wide_frame.csv";
pub const YOY_FRAME_FILE: &str = "yoy_frame.csv";
pub const CLIENT_DATE_FRAME_FILE: &str = "client_date_frame.csv";

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    load_config_or_default(path).with_context(|| match path {
        Some(path) => format!("load config {}", path.display()),
        None => "load default config".to_string(),
    })
}

fn read_input(path: &Path, name: &str) -> Result<Table> {
    read_table(path, name).with_context(|| format!("read {name} export {}", path.display()))
}

fn write_frame(
    table: &Table,
    output_dir: &Path,
    file_name: &str,
    dry_run: bool,
) -> Result<Option<PathBuf>> {
    if dry_run {
        return Ok(None);
    }
    let path = output_dir.join(file_name);
    write_table(table, &path).with_context(|| format!("write {}", path.display()))?;
    Ok(Some(path))
}

/// Read the three exports, run every stage and write the produced frames.
pub fn run(request: &RunRequest) -> Result<RunResult> {
    let run_span = info_span!("run", output_dir = %request.output_dir.display());
    let _run_guard = run_span.enter();
    let run_start = Instant::now();

    let config = load_config(request.config.as_deref())?;
    let dictionary = read_input(&request.dictionary, "dictionary")?;
    let daily_activity = read_input(&request.daily_activity, "daily_activity")?;
    let responses = read_input(&request.responses, "responses")?;

    let output = run_pipeline(
        PipelineInputs {
            dictionary: &dictionary,
            daily_activity: &daily_activity,
            responses: &responses,
        },
        &config,
    )
    .context("run pipeline")?;

    if !request.dry_run {
        fs::create_dir_all(&request.output_dir).with_context(|| {
            format!("create output directory {}", request.output_dir.display())
        })?;
    }
    let dir = request.output_dir.as_path();
    let dry_run = request.dry_run;

    let mut frames = vec![
        FrameSummary {
            name: "long",
            rows: output.long.len(),
            path: write_frame(&output.long.to_table(), dir, LONG_FRAME_FILE, dry_run)?,
        },
        FrameSummary {
            name: "wide",
            rows: output.wide.len(),
            path: write_frame(&output.wide.to_table(), dir, WIDE_FRAME_FILE, dry_run)?,
        },
        FrameSummary {
            name: "yoy",
            rows: output.yoy.len(),
            path: write_frame(&output.yoy.to_table(), dir, YOY_FRAME_FILE, dry_run)?,
        },
    ];
    let client_date_path = if request.emit_client_date_frame {
        write_frame(
            &output.client_dates.to_table(&config),
            dir,
            CLIENT_DATE_FRAME_FILE,
            dry_run,
        )?
    } else {
        None
    };
    frames.push(FrameSummary {
        name: "client_date",
        rows: output.client_dates.len(),
        path: client_date_path,
    });

    let report_path = match &request.report {
        Some(path) if !dry_run => {
            let json =
                serde_json::to_string_pretty(&output.report).context("serialize run report")?;
            fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
            Some(path.clone())
        }
        _ => None,
    };

    info!(
        dry_run,
        duration_ms = run_start.elapsed().as_millis(),
        "run complete"
    );
    Ok(RunResult {
        output_dir: request.output_dir.clone(),
        frames,
        report: output.report,
        report_path,
        dry_run,
    })
}

/// Recompute the year-over-year frame from a persisted long frame.
pub fn run_yoy(request: &YoyRequest) -> Result<FrameSummary> {
    let _span = info_span!("yoy", output = %request.output.display()).entered();
    let config = load_config(request.config.as_deref())?;
    let long = read_input(&request.long_frame, "long_frame")?;
    let client_dates = request
        .client_date_frame
        .as_deref()
        .map(|path| read_input(path, "client_date_frame"))
        .transpose()?;

    let recomputed =
        recompute_yoy(&long, client_dates.as_ref(), &config).context("recompute yoy frame")?;
    if let Some(parent) = request.output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    write_table(&recomputed.yoy.to_table(), &request.output)
        .with_context(|| format!("write {}", request.output.display()))?;
    Ok(FrameSummary {
        name: "yoy",
        rows: recomputed.yoy.len(),
        path: Some(request.output.clone()),
    })
}

/// Effective configuration rendered as TOML.
pub fn render_config(path: Option<&Path>) -> Result<String> {
    let config = load_config(path)?;
    config_to_toml(&config).context("render config")
}
