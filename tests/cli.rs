use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("config.toml"),
        "data_directories = [\"data\"]\noutput_directory = \"out\"\n",
    );
    let mut courses = String::from("Department,Related Dept\n");
    for _ in 0..4 {
        courses.push_str("CSE,EEE\n");
    }
    for _ in 0..2 {
        courses.push_str("CSE,LAW\n");
    }
    courses.push_str("LAW,CSE\n");
    write(&dir.path().join("data/related-course.csv"), &courses);
    write(
        &dir.path().join("data/2122a.csv"),
        "Subject,Merit\nComputer Science and Engineering,50\nLaw,100\n",
    );
    write(
        &dir.path().join("data/2122b.csv"),
        " Department ,Merit\nComputer Science and Engineering,70\n",
    );
    dir
}

fn analyzer(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("academic-network-analyzer").unwrap();
    cmd.current_dir(dir.path()).arg("--config").arg("config.toml");
    cmd
}

#[test]
fn creates_default_config_when_missing() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("academic-network-analyzer")
        .unwrap()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating default configuration file"));

    let config = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(config.contains("related-course.csv"));
    assert!(config.contains("Computer Science and Engineering"));
}

#[test]
fn missing_course_file_fails_without_writing_reports() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("config.toml"), "data_directories = [\"nowhere\"]\n");

    analyzer(&dir)
        .assert()
        .failure()
        .stdout(predicate::str::contains("related-course.csv"))
        .stdout(predicate::str::contains("not found"));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn writes_reports_and_recommendation_card() {
    let dir = workspace();

    analyzer(&dir)
        .args(["--department", "CSE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. EEE - 4 shared courses (40%)"))
        .stdout(predicate::str::contains("Historical merit range: 50 - 70"))
        .stdout(predicate::str::contains("Connected departments: 2"));

    let out = dir.path().join("out");
    let edges = fs::read_to_string(out.join("edges.csv")).unwrap();
    assert_eq!(
        edges,
        "Department,Related Dept,Shared Courses\nCSE,EEE,4\nCSE,LAW,2\nLAW,CSE,1\n"
    );
    let rankings = fs::read_to_string(out.join("rankings.csv")).unwrap();
    assert!(rankings.starts_with("Department,Influence Score,Outreach Score,Shared Courses In\n"));
    assert!(out.join("flow.json").is_file());
    assert!(out.join("prestige.csv").is_file());
    assert!(out.join("recommendations/CSE.txt").is_file());
    assert!(out.join("recommendations/CSE.json").is_file());
}

#[test]
fn min_weight_filters_edges_and_rejects_out_of_range() {
    let dir = workspace();

    analyzer(&dir).args(["--min-weight", "3"]).assert().success();
    let edges = fs::read_to_string(dir.path().join("out/edges.csv")).unwrap();
    assert_eq!(edges, "Department,Related Dept,Shared Courses\nCSE,EEE,4\n");

    analyzer(&dir).args(["--min-weight", "11"]).assert().failure();
}

#[test]
fn ranking_export_is_identical_across_runs() {
    let dir = workspace();

    analyzer(&dir).assert().success();
    let first = fs::read(dir.path().join("out/rankings.csv")).unwrap();
    analyzer(&dir).assert().success();
    let second = fs::read(dir.path().join("out/rankings.csv")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn lists_departments() {
    let dir = workspace();

    analyzer(&dir)
        .arg("--list-departments")
        .assert()
        .success()
        .stdout(predicate::str::contains("- CSE"))
        .stdout(predicate::str::contains("- LAW"));
}

#[test]
fn department_flag_is_trimmed_before_lookup() {
    let dir = workspace();

    analyzer(&dir)
        .args(["--department", "  CSE "])
        .assert()
        .success()
        .stdout(predicate::str::contains("has no connections").not())
        .stdout(predicate::str::contains("1. EEE - 4 shared courses (40%)"));
    assert!(dir.path().join("out/recommendations/CSE.txt").is_file());
}

#[test]
fn empty_alias_table_is_announced() {
    let dir = workspace();
    write(
        &dir.path().join("config.toml"),
        "data_directories = [\"data\"]\noutput_directory = \"out\"\n\n[aliases]\n",
    );

    analyzer(&dir)
        .args(["--department", "CSE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No department aliases configured"))
        .stdout(predicate::str::contains("Merit search term: CSE"));
}
