mod common;

use std::fs;

use assert_cmd::Command;
use petanque::{AnalysisRecord, AnalysisReport};
use predicates::prelude::*;

use common::{black, jack_and_ball, save};

fn bin() -> Command {
    Command::cargo_bin("petanque-distance").expect("binary built")
}

#[test]
fn writes_annotated_image_and_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = save(dir.path(), "court.png", &jack_and_ball());
    let out = dir.path().join("annotated.png");
    let json = dir.path().join("result.json");

    bin()
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--json")
        .arg(&json)
        .args(["--jack-color", "yellow", "--log-level", "warn"])
        .assert()
        .success();

    assert!(out.is_file());
    let record = AnalysisRecord::load_json(&json).expect("record");
    assert_eq!(record.closest_ball_index, 0);
    assert_eq!(record.balls.len(), 1);
}

#[test]
fn defaults_write_into_the_working_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = save(dir.path(), "court.png", &jack_and_ball());

    bin()
        .current_dir(dir.path())
        .arg(&input)
        .arg("--log-level=off")
        .assert()
        .success();

    assert!(dir.path().join("annotated.png").is_file());
    assert!(dir.path().join("result.json").is_file());
}

#[test]
fn out_path_equal_to_input_is_refused() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = save(dir.path(), "photo.png", &black(720, 720));
    let before = fs::read(&input).expect("input bytes");

    bin()
        .current_dir(dir.path())
        .arg(&input)
        .arg("--out")
        .arg(&input)
        .arg("--log-level=off")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("overwrite the input"));

    assert_eq!(fs::read(&input).expect("input survives"), before);
}

#[test]
fn no_circles_exits_with_status_two() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = save(dir.path(), "black.png", &black(720, 720));
    let out = dir.path().join("annotated.png");
    let json = dir.path().join("result.json");
    let report = dir.path().join("report.json");

    bin()
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--json")
        .arg(&json)
        .arg("--report")
        .arg(&report)
        .arg("--log-level=off")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No circles detected"));

    assert!(!out.exists());
    assert!(!json.exists());
    let report = AnalysisReport::load_json(&report).expect("report");
    assert_eq!(report.error.as_deref(), Some("No circles detected"));
}

#[test]
fn unreadable_input_exits_with_status_two() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("court.jpg");
    fs::write(&input, b"not a jpeg").expect("write");

    bin()
        .current_dir(dir.path())
        .arg(&input)
        .arg("--log-level=off")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot decode image"));
}

#[test]
fn rejects_unknown_jack_color() {
    bin()
        .args(["court.jpg", "--jack-color", "purple"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("purple"));
}

#[test]
fn invalid_config_fails_before_processing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = save(dir.path(), "court.png", &jack_and_ball());
    let config = dir.path().join("params.json");
    fs::write(&config, "{ \"hough\": ").expect("write");

    bin()
        .current_dir(dir.path())
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid config"));

    assert!(!dir.path().join("result.json").exists());
}

#[test]
fn config_file_values_apply_and_flags_override() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = save(dir.path(), "court.png", &jack_and_ball());
    let config = dir.path().join("params.json");
    fs::write(&config, r#"{ "jack_color": "orange", "annotate": { "rank_numbers": false } }"#)
        .expect("write");
    let report = dir.path().join("report.json");

    bin()
        .current_dir(dir.path())
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .args(["--jack-color", "any", "--log-level=off"])
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let report = AnalysisReport::load_json(&report).expect("report");
    assert_eq!(report.jack_color, petanque::JackColor::Any);
    assert!(report.error.is_none());
}
