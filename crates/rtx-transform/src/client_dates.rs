//! Per client and survey: the distinct assessments bounding each reporting window.
//!
//! A client needs two distinct assessments to measure movement. For every
//! (client, treatment code) group the builder picks an ending assessment (the
//! latest in the window) and a starting assessment (the earliest one with a
//! different instance code). Within a program year that has a single
//! assessment, the latest assessment of the preceding year may serve as the
//! start instead.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rtx_model::schema::{CLIENT_DATE_LEADING_COLUMNS, NO_DATA_MARKER, OVERALL_PERIOD};
use rtx_model::{PipelineConfig, ProgramYear, Table, TreatmentInstanceCode, parse_flag};
use tracing::info;

use crate::datetime::{ParsedInstant, format_canonical, parse_datetime};
use crate::error::Result;
use crate::report::FallbackTally;
use crate::stage::LongFrame;

/// One distinct assessment of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentInstance {
    pub code: TreatmentInstanceCode,
    pub instant: NaiveDateTime,
}

/// Start and end assessments of one reporting window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: Option<AssessmentInstance>,
    pub end: Option<AssessmentInstance>,
    /// Counted in the metrics denominator for this window.
    pub eligible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDateRow {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub treatment_code: String,
    pub survey_name: String,
    /// Program-year windows, labelled, in configuration order.
    pub program_years: Vec<(String, PeriodWindow)>,
    pub overall: PeriodWindow,
}

impl ClientDateRow {
    /// Window for a program-year label or [`OVERALL_PERIOD`].
    pub fn period(&self, label: &str) -> Option<&PeriodWindow> {
        if label == OVERALL_PERIOD {
            return Some(&self.overall);
        }
        self.program_years
            .iter()
            .find(|(year, _)| year == label)
            .map(|(_, window)| window)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDateFrame {
    pub rows: Vec<ClientDateRow>,
    pub date_fallbacks: FallbackTally,
}

struct Group {
    patient_id: String,
    first_name: String,
    last_name: String,
    treatment_code: String,
    survey_name: String,
    instances: Vec<AssessmentInstance>,
    index: HashMap<TreatmentInstanceCode, usize>,
}

impl Group {
    /// Record an instance, keeping the earliest instant for a repeated code.
    fn observe(&mut self, code: &TreatmentInstanceCode, instant: NaiveDateTime) {
        match self.index.get(code) {
            Some(&i) => {
                if instant < self.instances[i].instant {
                    self.instances[i].instant = instant;
                }
            }
            None => {
                self.index.insert(code.clone(), self.instances.len());
                self.instances.push(AssessmentInstance {
                    code: code.clone(),
                    instant,
                });
            }
        }
    }
}

fn first_differing<'a>(
    instances: &[&'a AssessmentInstance],
    end: &AssessmentInstance,
) -> Option<&'a AssessmentInstance> {
    instances
        .iter()
        .copied()
        .find(|instance| instance.code != end.code)
}

fn overall_window(instances: &[AssessmentInstance]) -> PeriodWindow {
    let Some(end) = instances.last() else {
        return PeriodWindow::default();
    };
    let all: Vec<&AssessmentInstance> = instances.iter().collect();
    let start = first_differing(&all, end);
    PeriodWindow {
        eligible: instances.len() >= 2 && start.is_some(),
        start: start.cloned(),
        end: Some(end.clone()),
    }
}

fn in_window<'a>(
    instances: &'a [AssessmentInstance],
    year: &ProgramYear,
) -> Vec<&'a AssessmentInstance> {
    instances
        .iter()
        .filter(|instance| year.contains(instance.instant))
        .collect()
}

fn program_year_window(
    instances: &[AssessmentInstance],
    year: &ProgramYear,
    config: &PipelineConfig,
) -> PeriodWindow {
    let current = in_window(instances, year);
    let Some(&end) = current.last() else {
        return PeriodWindow::default();
    };
    let start = first_differing(&current, end).or_else(|| {
        let previous = config.program_year(year.previous.as_deref()?)?;
        in_window(instances, previous)
            .last()
            .copied()
            .filter(|latest| latest.code != end.code)
    });
    PeriodWindow {
        eligible: instances.len() >= 2 && start.is_some(),
        start: start.cloned(),
        end: Some(end.clone()),
    }
}

impl ClientDateFrame {
    pub const TABLE_NAME: &'static str = "client_date_frame";

    /// Group the long frame by client and treatment code and pick each
    /// group's start and end assessments per window.
    ///
    /// Rows with a blank client id, treatment code or instance code are
    /// ignored. Groups keep the order in which they first appear. Rows that
    /// carry their staged instant are not parsed again; the others parse
    /// `TreatmentDate` once per distinct text.
    pub fn build(long: &LongFrame, config: &PipelineConfig) -> Self {
        let mut groups: Vec<Group> = Vec::new();
        let mut group_index: HashMap<(String, String), usize> = HashMap::new();
        let mut parsed_dates: HashMap<String, ParsedInstant> = HashMap::new();
        let mut date_fallbacks = FallbackTally::default();

        for row in &long.rows {
            if row.patient_id.is_empty()
                || row.treatment_code.is_empty()
                || row.instance_code.is_empty()
            {
                continue;
            }
            let parsed = match row.treatment_instant {
                Some(parsed) => parsed,
                None => *parsed_dates
                    .entry(row.treatment_date.clone())
                    .or_insert_with(|| {
                        let parsed = parse_datetime(&row.treatment_date);
                        date_fallbacks.observe(parsed, &row.treatment_date);
                        parsed
                    }),
            };

            let key = (row.patient_id.clone(), row.treatment_code.clone());
            let i = *group_index.entry(key).or_insert_with(|| {
                groups.push(Group {
                    patient_id: row.patient_id.clone(),
                    first_name: row.first_name.clone(),
                    last_name: row.last_name.clone(),
                    treatment_code: row.treatment_code.clone(),
                    survey_name: row.survey_name.clone(),
                    instances: Vec::new(),
                    index: HashMap::new(),
                });
                groups.len() - 1
            });
            groups[i].observe(&row.instance_code, parsed.instant());
        }

        let rows: Vec<ClientDateRow> = groups
            .into_iter()
            .map(|mut group| {
                group.instances.sort_by_key(|instance| instance.instant);
                let program_years = config
                    .program_years
                    .iter()
                    .map(|year| {
                        (
                            year.label.clone(),
                            program_year_window(&group.instances, year, config),
                        )
                    })
                    .collect();
                ClientDateRow {
                    overall: overall_window(&group.instances),
                    program_years,
                    patient_id: group.patient_id,
                    first_name: group.first_name,
                    last_name: group.last_name,
                    treatment_code: group.treatment_code,
                    survey_name: group.survey_name,
                }
            })
            .collect();
        let eligible = rows.iter().filter(|row| row.overall.eligible).count();
        info!(
            client_date_rows = rows.len(),
            eligible_all_time = eligible,
            "built client date frame"
        );
        Self {
            rows,
            date_fallbacks,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column headers for the configured program years.
    pub fn headers(config: &PipelineConfig) -> Vec<String> {
        let mut headers: Vec<String> = CLIENT_DATE_LEADING_COLUMNS
            .iter()
            .map(|c| (*c).to_string())
            .collect();
        for year in &config.program_years {
            let y = &year.label;
            headers.extend([
                format!("{y}_start_date"),
                format!("{y}_start_treatment_instance_code"),
                format!("{y}_end_date"),
                format!("{y}_end_treatment_instance_code"),
                format!("Include_in_{y}_Metrics_Denominator"),
            ]);
        }
        headers.extend(
            [
                "overall_start_date",
                "overall_start_treatment_instance_code",
                "overall_end_date",
                "overall_end_treatment_instance_code",
                "Include_in_All_Time_Metrics_Denominator",
            ]
            .map(str::to_string),
        );
        headers
    }

    /// Render the frame; an empty frame becomes a single `No data` column.
    pub fn to_table(&self, config: &PipelineConfig) -> Table {
        if self.rows.is_empty() {
            return Table::with_columns(Self::TABLE_NAME, &[NO_DATA_MARKER]);
        }
        let mut table = Table::new(Self::TABLE_NAME, Self::headers(config));
        for row in &self.rows {
            let mut cells = vec![
                row.patient_id.clone(),
                row.first_name.clone(),
                row.last_name.clone(),
                row.treatment_code.clone(),
                row.survey_name.clone(),
            ];
            for year in &config.program_years {
                let window = row.period(&year.label).cloned().unwrap_or_default();
                push_window(&mut cells, &window);
            }
            push_window(&mut cells, &row.overall);
            table.push_row(cells);
        }
        table
    }

    /// Read a persisted client date frame.
    ///
    /// A `No data` marker table reads as an empty frame. Eligibility cells
    /// accept yes/true/y in any case.
    ///
    /// # Errors
    ///
    /// Fails when an expected column for the configured program years is missing.
    pub fn from_table(table: &Table, config: &PipelineConfig) -> Result<Self> {
        if table.find_column(NO_DATA_MARKER).is_some() && table.width() == 1 {
            return Ok(Self::default());
        }
        let headers = Self::headers(config);
        let cols = headers
            .iter()
            .map(|header| table.column(header))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut date_fallbacks = FallbackTally::default();
        let mut rows = Vec::with_capacity(table.height());
        for record in &table.rows {
            let cells: Vec<&str> = cols.iter().map(|&c| record[c].as_str()).collect();
            let mut read_window = |offset: usize| PeriodWindow {
                start: read_instance(cells[offset + 1], cells[offset], &mut date_fallbacks),
                end: read_instance(cells[offset + 3], cells[offset + 2], &mut date_fallbacks),
                eligible: parse_flag(cells[offset + 4]),
            };
            let program_years = config
                .program_years
                .iter()
                .enumerate()
                .map(|(i, year)| (year.label.clone(), read_window(5 + i * 5)))
                .collect();
            let overall = read_window(5 + config.program_years.len() * 5);
            rows.push(ClientDateRow {
                patient_id: cells[0].to_string(),
                first_name: cells[1].to_string(),
                last_name: cells[2].to_string(),
                treatment_code: cells[3].to_string(),
                survey_name: cells[4].to_string(),
                program_years,
                overall,
            });
        }
        Ok(Self {
            rows,
            date_fallbacks,
        })
    }
}

fn push_window(cells: &mut Vec<String>, window: &PeriodWindow) {
    for instance in [&window.start, &window.end] {
        match instance {
            Some(instance) => {
                cells.push(format_canonical(instance.instant));
                cells.push(instance.code.to_string());
            }
            None => cells.extend([String::new(), String::new()]),
        }
    }
    cells.push(if window.eligible { "Yes" } else { "" }.to_string());
}

fn read_instance(
    code: &str,
    date: &str,
    date_fallbacks: &mut FallbackTally,
) -> Option<AssessmentInstance> {
    if code.is_empty() {
        return None;
    }
    let parsed = parse_datetime(date);
    date_fallbacks.observe(parsed, date);
    Some(AssessmentInstance {
        code: TreatmentInstanceCode::from_formatted(code),
        instant: parsed.instant(),
    })
}
