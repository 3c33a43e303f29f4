#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn cli(planning: &Path) -> Command {
    let mut cmd = Command::cargo_bin("planning-cli").unwrap();
    cmd.env_remove("PLANNING_FILE")
        .arg("--planning")
        .arg(planning);
    cmd
}

#[test]
fn create_conflict_and_current_status() {
    let dir = tempdir().unwrap();
    let planning = dir.path().join("planning.json");
    let drivers = dir.path().join("drivers.csv");
    std::fs::write(&drivers, "id,name\nd1,Alice\n").unwrap();

    cli(&planning)
        .args(["import-drivers", "--csv"])
        .arg(&drivers)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 driver(s) imported"));

    cli(&planning)
        .args([
            "create",
            "--driver",
            "d1",
            "--status",
            "WEEKDAY_SERVICE",
            "--start",
            "2024-03-04T08:00",
            "--end",
            "2024-03-04T18:00",
        ])
        .assert()
        .success();

    cli(&planning)
        .args([
            "create",
            "--driver",
            "d1",
            "--status",
            "LEAVE",
            "--start",
            "2024-03-04",
            "--end",
            "2024-03-05",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("WEEKDAY_SERVICE"));

    cli(&planning)
        .args(["current", "--driver", "d1", "--as-of", "2024-03-04T18:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("displayed: WEEKDAY_SERVICE @ SITE_A"));

    cli(&planning)
        .args(["current", "--driver", "d1", "--as-of", "2024-03-04T18:00:01Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("displayed: UNSPECIFIED"));
}

#[test]
fn rejects_unknown_status_and_bad_ranges() {
    let dir = tempdir().unwrap();
    let planning = dir.path().join("planning.json");

    cli(&planning)
        .args([
            "create", "--driver", "d1", "--status", "HOLIDAY", "--start", "2024-03-04", "--end",
            "2024-03-05",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HOLIDAY"));

    cli(&planning)
        .args([
            "check", "--driver", "d1", "--status", "LEAVE", "--start", "2024-03-05", "--end",
            "2024-03-05",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid time range"));

    assert!(!planning.exists());
}

#[test]
fn planning_export_and_delete() {
    let dir = tempdir().unwrap();
    let planning = dir.path().join("planning.json");
    let drivers = dir.path().join("drivers.csv");
    let out_csv = dir.path().join("planning.csv");
    std::fs::write(&drivers, "id,name\nd1,Alice\n").unwrap();

    cli(&planning)
        .args(["import-drivers", "--csv"])
        .arg(&drivers)
        .assert()
        .success();

    let output = cli(&planning)
        .args([
            "create",
            "--driver",
            "d1",
            "--status",
            "ON_CALL",
            "--location",
            "BOTH",
            "--start",
            "2024-03-04T17:00:00+00:00",
            "--end",
            "2024-03-04T23:00:00+00:00",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = String::from_utf8(output.stdout).unwrap().trim().to_string();

    cli(&planning)
        .args(["planning", "--as-of", "2024-03-04", "--out-csv"])
        .arg(&out_csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("ON_CALL | BOTH"));
    let csv = std::fs::read_to_string(&out_csv).unwrap();
    assert!(csv.contains(&format!("d1,Alice,{id},ON_CALL,BOTH")));

    cli(&planning).args(["delete", "--id", &id]).assert().success();
    cli(&planning)
        .args(["delete", "--id", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown assignment"));
}

#[test]
fn update_gap_check_exclude_and_json_report() {
    let dir = tempdir().unwrap();
    let planning = dir.path().join("planning.json");
    let drivers = dir.path().join("drivers.csv");
    let out_json = dir.path().join("planning-report.json");
    std::fs::write(&drivers, "id,name\nd1,Alice\n").unwrap();

    cli(&planning)
        .args(["import-drivers", "--csv"])
        .arg(&drivers)
        .assert()
        .success();

    let create = |status: &str, start: &str, end: &str| {
        let output = cli(&planning)
            .args(["create", "--driver", "d1", "--status", status, "--start", start, "--end", end])
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    };
    let weekday = create("WEEKDAY_SERVICE", "2024-03-04T08:00", "2024-03-04T18:00");
    let on_call = create("ON_CALL", "2024-03-04T17:00", "2024-03-04T23:00");

    let to_leave = [
        "update",
        "--id",
        weekday.as_str(),
        "--status",
        "LEAVE",
        "--start",
        "2024-03-04",
        "--end",
        "2024-03-05",
    ];
    cli(&planning)
        .args(to_leave)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(on_call.as_str()));

    cli(&planning)
        .arg("--keep-update-gap")
        .args(to_leave)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{weekday} updated")));

    let check = [
        "check",
        "--driver",
        "d1",
        "--status",
        "LEAVE",
        "--start",
        "2024-03-04T00:00",
        "--end",
        "2024-03-04T12:00",
    ];
    cli(&planning)
        .args(check)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(weekday.as_str()));
    cli(&planning)
        .args(check)
        .args(["--exclude", weekday.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no conflicts"));

    // la permanence est terminée à 23:30, le congé court encore
    cli(&planning)
        .args(["planning", "--as-of", "2024-03-04T23:30", "--out-json"])
        .arg(&out_json)
        .assert()
        .success();
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_json).unwrap()).unwrap();
    let rows = report[0]["assignments"].as_array().unwrap();
    assert_eq!(report[0]["driver_name"], "Alice");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], weekday.as_str());
    assert_eq!(rows[0]["status"], "LEAVE");
    assert_eq!(rows[0]["duration_days"], 2);
}
