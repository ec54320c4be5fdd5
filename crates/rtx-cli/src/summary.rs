use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rtx_cli::logging::redact_value;
use rtx_cli::types::{FrameSummary, RunResult};
use rtx_transform::PipelineReport;

pub fn print_summary(result: &RunResult) {
    if result.dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    if let Some(path) = &result.report_path {
        println!("Report: {}", path.display());
    }
    println!("{}", frame_table(&result.frames));
    println!("{}", stage_table(&result.report));
    print_fallbacks(&result.report);
}

pub fn print_frame(frame: &FrameSummary) {
    println!("{}", frame_table(std::slice::from_ref(frame)));
}

fn frame_table(frames: &[FrameSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Frame"),
        header_cell("Rows"),
        header_cell("File"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for frame in frames {
        let file_cell = match &frame.path {
            Some(path) => Cell::new(path.display()),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(frame.name),
            Cell::new(frame.rows),
            file_cell,
        ]);
    }
    table
}

fn stage_table(report: &PipelineReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let counts = [
        ("Survey mappings", report.survey_mappings),
        ("Value mappings", report.value_mappings),
        ("Question triples", report.question_triples),
        ("Skeleton rows", report.skeleton_rows),
        ("Dropped activity rows", report.dropped_activity_rows),
        ("Response rows", report.response_rows),
        ("Unknown survey rows", report.unknown_survey_rows),
        ("Answered rows", report.answered_rows),
        ("Imputed rows", report.imputed_rows),
        ("Never seen rows", report.never_seen_rows),
        ("Date fallbacks", report.total_date_fallbacks()),
    ];
    for (label, count) in counts {
        table.add_row(vec![Cell::new(label), count_cell(label, count)]);
    }
    table
}

fn print_fallbacks(report: &PipelineReport) {
    let stages: Vec<_> = report
        .date_fallbacks
        .iter()
        .filter(|stage| stage.tally.count > 0)
        .collect();
    if stages.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Fallbacks"),
        header_cell("Examples"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for stage in stages {
        let examples = stage
            .tally
            .samples
            .iter()
            .map(String::as_str)
            .map(redact_value)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(stage.stage),
            Cell::new(stage.tally.count)
                .fg(Color::Yellow)
                .add_attribute(Attribute::Bold),
            Cell::new(examples),
        ]);
    }
    println!();
    println!("Unparseable dates (current time used):");
    println!("{table}");
}

fn count_cell(label: &str, count: usize) -> Cell {
    let warn = matches!(
        label,
        "Dropped activity rows" | "Unknown survey rows" | "Date fallbacks"
    );
    if count == 0 {
        dim_cell(count)
    } else if warn {
        Cell::new(count).fg(Color::Yellow).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
