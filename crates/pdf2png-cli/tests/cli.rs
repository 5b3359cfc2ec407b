use assert_cmd::Command;
use predicates::prelude::*;

fn pdf2png() -> Command {
    Command::cargo_bin("pdf2png").unwrap()
}

#[test]
fn test_help_lists_commands() {
    pdf2png()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_convert_rejects_non_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "hello").unwrap();

    pdf2png()
        .arg("convert")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please provide a valid .pdf file"));

    assert!(!dir.path().join("notes.png").exists());
}

#[test]
fn test_convert_missing_input() {
    pdf2png()
        .args(["convert", "/nonexistent/input.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_convert_rejects_invalid_scale() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.pdf");
    std::fs::write(&input, b"%PDF-1.7").unwrap();

    pdf2png()
        .arg("convert")
        .arg(&input)
        .args(["--scale", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("render.scale"));
}

#[test]
fn test_batch_without_matches() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("image.png"), b"").unwrap();
    let pattern = dir.path().join("*").display().to_string();

    pdf2png()
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching PDF files"));
}

#[test]
fn test_config_init_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    let config_arg = config.display().to_string();

    pdf2png()
        .args(["--config", &config_arg, "config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    pdf2png()
        .args(["--config", &config_arg, "config", "get", "render.scale"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3"));

    pdf2png()
        .args(["--config", &config_arg, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
