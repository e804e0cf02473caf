//! CLI integration tests
//!
//! Each test drives the real binary against files in a temporary directory.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn slick() -> Command {
    let mut cmd = Command::cargo_bin("slick-rs").expect("binary is built by cargo test");
    cmd.env("RUST_LOG", "error");
    cmd
}

fn new_system(path: &Path) {
    slick()
        .args(["system", "new"])
        .arg(path)
        .args(["--name", "sparks", "--count", "20", "--image", "spark.png"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
}

#[test]
fn test_new_then_info() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("sparks.json");
    new_system(&path);

    slick()
        .args(["system", "info"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Emitters: 1"))
        .stdout(predicate::str::contains("sparks"))
        .stdout(predicate::str::contains("count 20"));

    slick()
        .args(["system", "info", "--detailed"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("spawnInterval"))
        .stdout(predicate::str::contains("spark.png"));
    Ok(())
}

#[test]
fn test_new_refuses_to_overwrite() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("sparks.json");
    new_system(&path);

    slick()
        .args(["system", "new"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    slick()
        .args(["system", "new", "--force"])
        .arg(&path)
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_count_and_duration_conflict() {
    slick()
        .args([
            "system",
            "new",
            "never-written.json",
            "--count",
            "5",
            "--duration",
            "100",
        ])
        .assert()
        .failure();
}

#[test]
fn test_validate() -> Result<()> {
    let dir = TempDir::new()?;
    let good = dir.path().join("good.json");
    new_system(&good);

    slick()
        .args(["system", "validate", "--warnings"])
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Particle system is valid"));

    let bad = dir.path().join("bad.json");
    fs::write(
        &bad,
        r#"{"emitter": [{"name": "bad", "spawnCount": {"min": 3, "max": 1}}]}"#,
    )?;
    slick()
        .args(["system", "validate"])
        .arg(&bad)
        .assert()
        .failure()
        .stdout(predicate::str::contains("bad.spawnCount"))
        .stderr(predicate::str::contains("validation failed with 1 error(s)"));
    Ok(())
}

#[test]
fn test_validate_rejects_unknown_extension() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("effect.xml");
    fs::write(&path, "<system/>")?;

    slick()
        .args(["system", "validate"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read particle system"));
    Ok(())
}

#[test]
fn test_convert_json_to_yaml() -> Result<()> {
    let dir = TempDir::new()?;
    let json = dir.path().join("sparks.json");
    let yaml = dir.path().join("sparks.yaml");
    new_system(&json);

    slick()
        .args(["system", "convert"])
        .arg(&json)
        .arg(&yaml)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 emitters"));

    let text = fs::read_to_string(&yaml)?;
    assert!(text.contains("name: sparks"));
    assert!(text.contains("spawnInterval:"));

    let back = dir.path().join("back.json");
    slick()
        .args(["system", "convert"])
        .arg(&yaml)
        .arg(&back)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&back)?, fs::read_to_string(&json)?);
    Ok(())
}

#[test]
fn test_simulate_json_report() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("sparks.json");
    new_system(&path);

    let output = slick()
        .args(["system", "simulate", "--frames", "200", "--seed", "7", "--json"])
        .arg(&path)
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["frames"], 200);
    assert_eq!(report["emitters"], 1);
    assert_eq!(report["completed_emitters"], 1);
    assert_eq!(report["final_particles"], 0);

    let peak = report["peak_particles"].as_u64().unwrap_or_default();
    assert!(peak > 0 && peak <= 20, "peak {peak}");
    // No image loader, so every particle is an untextured quad.
    assert_eq!(report["draws"]["sprites"], 0);
    assert!(report["draws"]["untextured_quads"].as_u64().unwrap_or_default() > 0);
    Ok(())
}

#[test]
fn test_simulate_table_report() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("sparks.json");
    new_system(&path);

    slick()
        .args(["--quiet", "system", "simulate", "--frames", "10", "--keep-completed"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Frames: 10 (160ms simulated)"))
        .stdout(predicate::str::contains("Peak Live Particles:"));
    Ok(())
}

#[test]
fn test_simulate_counts_kept_completed_emitters() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("sparks.json");
    new_system(&path);

    let output = slick()
        .args(["system", "simulate", "--frames", "200", "--seed", "7"])
        .args(["--keep-completed", "--json"])
        .arg(&path)
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["emitters"], 1);
    assert_eq!(report["completed_emitters"], 1);
    assert_eq!(report["final_particles"], 0);
    Ok(())
}

#[test]
fn test_verbose_flag_overrides_rust_log() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("sparks.json");
    new_system(&path);

    slick()
        .args(["-vv", "system", "info"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Reading"))
        .stderr(predicate::str::contains("as json"));

    slick()
        .args(["system", "info"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Reading").not());
    Ok(())
}

#[test]
fn test_emitter_extract_and_info() -> Result<()> {
    let dir = TempDir::new()?;
    let system = dir.path().join("sparks.json");
    let emitter = dir.path().join("one.yaml");
    new_system(&system);

    slick()
        .args(["emitter", "extract"])
        .arg(&system)
        .arg("sparks")
        .arg(&emitter)
        .assert()
        .success();

    slick()
        .args(["emitter", "info"])
        .arg(&emitter)
        .assert()
        .success()
        .stdout(predicate::str::contains("Emitter: sparks"))
        .stdout(predicate::str::contains("emitCount"))
        .stdout(predicate::str::contains("spark.png"));

    slick()
        .args(["emitter", "extract"])
        .arg(&system)
        .arg("smoke")
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No emitter named 'smoke'"))
        .stderr(predicate::str::contains("found: sparks"));
    Ok(())
}

#[test]
fn test_completions() {
    slick()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("slick-rs"));
}
