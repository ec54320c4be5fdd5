//! End-to-end run from the three exports to the produced frames.

use std::time::Instant;

use rtx_model::{Imputation, PipelineConfig, Table};
use tracing::{debug, info, info_span};

use crate::client_dates::ClientDateFrame;
use crate::error::Result;
use crate::fill::forward_fill;
use crate::join::join_responses;
use crate::mapping::DictionaryMappings;
use crate::report::PipelineReport;
use crate::responses::process_responses;
use crate::skeleton::{Skeleton, build_skeleton};
use crate::stage::{ClientNameMap, LongFrame, stage};
use crate::wide::WideFrame;
use crate::yoy::{YoyFrame, build_yoy_frame};

/// The raw exports a run consumes.
#[derive(Debug, Clone, Copy)]
pub struct PipelineInputs<'a> {
    pub dictionary: &'a Table,
    pub daily_activity: &'a Table,
    pub responses: &'a Table,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub long: LongFrame,
    pub client_dates: ClientDateFrame,
    pub yoy: YoyFrame,
    pub wide: WideFrame,
    pub report: PipelineReport,
}

/// Frames recomputed from a persisted long frame.
#[derive(Debug, Clone)]
pub struct YoyRecomputation {
    pub client_dates: ClientDateFrame,
    pub yoy: YoyFrame,
}

fn timed<T>(stage: &'static str, f: impl FnOnce() -> T) -> T {
    info_span!("stage", stage).in_scope(|| {
        let start = Instant::now();
        let out = f();
        debug!(stage, duration_ms = start.elapsed().as_millis(), "stage complete");
        out
    })
}

/// Run every stage on the given exports.
///
/// # Errors
///
/// Fails when `config` is inconsistent, when an export lacks one of its key
/// columns, or when the year-over-year pivot has client dates but no long rows.
pub fn run_pipeline(inputs: PipelineInputs<'_>, config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;
    let run_span = info_span!(
        "run_pipeline",
        dictionary_rows = inputs.dictionary.height(),
        daily_activity_rows = inputs.daily_activity.height(),
        response_rows = inputs.responses.height()
    );
    let _run_guard = run_span.enter();
    let run_start = Instant::now();
    let mut report = PipelineReport::default();

    let mappings = timed("mapping", || DictionaryMappings::from_table(inputs.dictionary))?;
    report.survey_mappings = mappings.surveys.len();
    report.value_mappings = mappings.values.len();
    report.question_triples = mappings.questions.len();

    let Skeleton {
        rows: skeleton,
        dropped_activity_rows,
        date_fallbacks,
    } = timed("skeleton", || {
        build_skeleton(inputs.daily_activity, &mappings, config)
    })?;
    report.skeleton_rows = skeleton.len();
    report.dropped_activity_rows = dropped_activity_rows;
    report.record_fallbacks("skeleton", date_fallbacks);

    let responses = timed("responses", || process_responses(inputs.responses, &mappings))?;
    let names = ClientNameMap::from_responses(inputs.responses)?;
    report.response_rows = responses.rows.len();
    report.unknown_survey_rows = responses.unknown_survey_rows;
    report.record_fallbacks("responses", responses.date_fallbacks.clone());

    let joined = timed("join", || join_responses(skeleton, &responses.rows));
    report.answered_rows = joined.iter().filter(|row| !row.value.is_blank()).count();

    let filled = timed("fill", || forward_fill(joined));
    for row in &filled {
        match row.imputation {
            Imputation::Yes => report.imputed_rows += 1,
            Imputation::NeverSeen => report.never_seen_rows += 1,
            Imputation::No => {}
        }
    }

    let long = timed("stage", || stage(filled, &names));
    report.long_rows = long.len();

    let client_dates = timed("client_dates", || ClientDateFrame::build(&long, config));
    report.client_date_rows = client_dates.len();
    report.record_fallbacks("client_date_frame", client_dates.date_fallbacks.clone());

    let yoy = timed("yoy", || build_yoy_frame(&client_dates, &long, config))?;
    report.yoy_rows = yoy.len();

    let wide = timed("wide", || WideFrame::build(&long, &config.wide_pivot));
    report.wide_rows = wide.len();

    info!(
        long_rows = report.long_rows,
        client_date_rows = report.client_date_rows,
        yoy_rows = report.yoy_rows,
        wide_rows = report.wide_rows,
        date_fallbacks = report.total_date_fallbacks(),
        duration_ms = run_start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(PipelineOutput {
        long,
        client_dates,
        yoy,
        wide,
        report,
    })
}

/// Recompute the year-over-year frame from a persisted long frame.
///
/// The client date frame is read from `client_date_frame` when given and
/// rebuilt from the long frame otherwise.
///
/// # Errors
///
/// Fails when `config` is inconsistent, when a table lacks its columns, or
/// when the long frame has no rows while client dates exist.
pub fn recompute_yoy(
    long_frame: &Table,
    client_date_frame: Option<&Table>,
    config: &PipelineConfig,
) -> Result<YoyRecomputation> {
    config.validate()?;
    let _span = info_span!("recompute_yoy", long_rows = long_frame.height()).entered();
    if let Some(table) = client_date_frame {
        let client_dates = ClientDateFrame::from_table(table, config)?;
        if client_dates.is_empty() {
            return Ok(YoyRecomputation {
                client_dates,
                yoy: YoyFrame::NoClientDates,
            });
        }
        let long = LongFrame::from_table(long_frame)?;
        let yoy = build_yoy_frame(&client_dates, &long, config)?;
        return Ok(YoyRecomputation { client_dates, yoy });
    }
    let long = LongFrame::from_table(long_frame)?;
    let client_dates = ClientDateFrame::build(&long, config);
    let yoy = build_yoy_frame(&client_dates, &long, config)?;
    Ok(YoyRecomputation { client_dates, yoy })
}
