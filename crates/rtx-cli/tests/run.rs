//! Integration tests for file-level runs.

use std::fs;
use std::path::Path;

use rtx_cli::pipeline::{
    CLIENT_DATE_FRAME_FILE, LONG_FRAME_FILE, WIDE_FRAME_FILE, YOY_FRAME_FILE, render_config, run,
    run_yoy,
};
use rtx_cli::types::{RunRequest, YoyRequest};
use rtx_ingest::read_table;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn request(dir: &Path) -> RunRequest {
    let dictionary = write(
        dir,
        "dictionary.csv",
        "TreatmentCode,Document,QuestionCode,RawValue,CleanedValue\n\
         9000,Self Sufficiency,emo-mgmt,Thriving,5\n\
         9000,Self Sufficiency,emo-mgmt,Struggling,1\n\
         9000,Self Sufficiency,budget,Thriving,5\n",
    );
    let daily_activity = write(
        dir,
        "daily.csv",
        "PatientID,TreatmentCode,TreatmentDT\n\
         C1,9000,2024-06-01 10:00:00\n\
         C1,9000,2025-02-01 10:00:00\n\
         C1,2000,2025-03-01 10:00:00\n",
    );
    let responses = write(
        dir,
        "responses.csv",
        "ClientID,FirstName,LastName,Date,Time,Document,Code,Value\n\
         C1,Ada,Lovelace,6/1/2024,10:00:00 AM,Self Sufficiency,emo-mgmt,Struggling\n\
         C1,Ada,Lovelace,6/1/2024,10:00:00 AM,Self Sufficiency,budget,Thriving\n\
         C1,Ada,Lovelace,2/1/2025,10:00:00 AM,Self Sufficiency,emo-mgmt,Thriving\n",
    );
    RunRequest {
        daily_activity,
        responses,
        dictionary,
        output_dir: dir.join("out"),
        config: None,
        emit_client_date_frame: true,
        report: Some(dir.join("report.json")),
        dry_run: false,
    }
}

#[test]
fn run_writes_every_frame_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let request = request(dir.path());
    let result = run(&request).unwrap();

    let out = dir.path().join("out");
    for file in [
        LONG_FRAME_FILE,
        WIDE_FRAME_FILE,
        YOY_FRAME_FILE,
        CLIENT_DATE_FRAME_FILE,
    ] {
        assert!(out.join(file).exists(), "missing {file}");
    }

    let long = read_table(&out.join(LONG_FRAME_FILE), "long_frame").unwrap();
    assert_eq!(long.height(), 4);
    assert_eq!(long.headers[10], "IsImputed");

    let wide = read_table(&out.join(WIDE_FRAME_FILE), "wide_frame").unwrap();
    assert_eq!(wide.height(), 2);
    assert_eq!(wide.value(0, 4), "1");
    assert_eq!(wide.value(1, 4), "5");

    let client_dates = read_table(&out.join(CLIENT_DATE_FRAME_FILE), "client_date_frame").unwrap();
    let all_time = client_dates
        .column("Include_in_All_Time_Metrics_Denominator")
        .unwrap();
    assert_eq!(client_dates.value(0, all_time), "Yes");

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["skeleton_rows"], 4);
    assert_eq!(report["dropped_activity_rows"], 1);
    assert_eq!(report["imputed_rows"], 1);
    assert_eq!(result.report.long_rows, 4);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = request(dir.path());
    request.dry_run = true;
    let result = run(&request).unwrap();
    assert!(result.dry_run);
    assert!(result.frames.iter().all(|frame| frame.path.is_none()));
    assert!(!dir.path().join("out").exists());
    assert!(!dir.path().join("report.json").exists());
}

#[test]
fn yoy_recomputes_from_written_frames() {
    let dir = tempfile::tempdir().unwrap();
    let request = request(dir.path());
    let result = run(&request).unwrap();
    let expected = result
        .frames
        .iter()
        .find(|frame| frame.name == "yoy")
        .unwrap()
        .rows;

    let out = dir.path().join("out");
    let rebuilt = run_yoy(&YoyRequest {
        long_frame: out.join(LONG_FRAME_FILE),
        client_date_frame: None,
        config: None,
        output: dir.path().join("again").join(YOY_FRAME_FILE),
    })
    .unwrap();
    assert_eq!(rebuilt.rows, expected);

    let reused = run_yoy(&YoyRequest {
        long_frame: out.join(LONG_FRAME_FILE),
        client_date_frame: Some(out.join(CLIENT_DATE_FRAME_FILE)),
        config: None,
        output: dir.path().join("reused.csv"),
    })
    .unwrap();
    assert_eq!(reused.rows, expected);

    let original = fs::read_to_string(out.join(YOY_FRAME_FILE)).unwrap();
    let recomputed = fs::read_to_string(dir.path().join("reused.csv")).unwrap();
    assert_eq!(original, recomputed);
}

#[test]
fn missing_export_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = request(dir.path());
    request.responses = dir.path().join("absent.csv");
    let err = run(&request).unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}

#[test]
fn config_renders_defaults() {
    let rendered = render_config(None).unwrap();
    assert!(rendered.contains("accepted_treatment_codes"));
    assert!(rendered.contains("Emotional & Mental Health"));
}
