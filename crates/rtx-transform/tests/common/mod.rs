//! Table builders shared by the integration tests.

#![allow(dead_code)]

use rtx_model::Table;

pub fn table(name: &str, headers: &[&str], rows: &[&[&str]]) -> Table {
    let mut table = Table::with_columns(name, headers);
    for row in rows {
        table.push_row(row.iter().map(|cell| (*cell).to_string()).collect());
    }
    table
}

pub fn dictionary() -> Table {
    table(
        "dictionary",
        &[
            "TreatmentCode",
            "Document",
            "QuestionCode",
            "RawValue",
            "CleanedValue",
        ],
        &[
            &["9000", "Self Sufficiency", "emo-mgmt", "Thriving", "5"],
            &["9000", "Self Sufficiency", "emo-mgmt", "Struggling", "1"],
            &["9000", "Self Sufficiency", "budget", "Thriving", "5"],
            &["9000", "Self Sufficiency", "budget", "In Crisis", "0"],
            &["1000", "Intake", "housing", "", ""],
        ],
    )
}

pub fn daily_activity(rows: &[&[&str]]) -> Table {
    table(
        "daily_activity",
        &["PatientID", "TreatmentCode", "TreatmentDT"],
        rows,
    )
}

pub fn responses(rows: &[&[&str]]) -> Table {
    table(
        "responses",
        &[
            "ClientID",
            "FirstName",
            "LastName",
            "Date",
            "Time",
            "Document",
            "Code",
            "Value",
        ],
        rows,
    )
}
