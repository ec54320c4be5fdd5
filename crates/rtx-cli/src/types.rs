use std::path::PathBuf;

use rtx_transform::PipelineReport;

/// Paths and switches of one `rtx run`.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub daily_activity: PathBuf,
    pub responses: PathBuf,
    pub dictionary: PathBuf,
    pub output_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub emit_client_date_frame: bool,
    pub report: Option<PathBuf>,
    pub dry_run: bool,
}

/// Paths of one `rtx yoy`.
#[derive(Debug, Clone)]
pub struct YoyRequest {
    pub long_frame: PathBuf,
    pub client_date_frame: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FrameSummary {
    pub name: &'static str,
    pub rows: usize,
    /// Where the frame was written; `None` on a dry run or when not requested.
    pub path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub frames: Vec<FrameSummary>,
    pub report: PipelineReport,
    pub report_path: Option<PathBuf>,
    pub dry_run: bool,
}
