use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mediaconv(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mediaconv").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("MEDIACONV_LOG_LEVEL")
        .env_remove("MEDIACONV_RESET_POLICY");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_containers_lists_the_table() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(mediaconv(&dir).arg("containers"));

    for (name, mime) in [
        ("mp4", "video/mp4"),
        ("webm", "video/webm"),
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("webp", "image/webp"),
        ("gif", "image/gif"),
    ] {
        let line = stdout
            .lines()
            .find(|line| line.starts_with(name))
            .unwrap_or_else(|| panic!("{} missing from:\n{}", name, stdout));
        assert!(line.contains(mime));
    }
}

#[test]
fn test_plan_prints_webp_command_as_json() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(mediaconv(&dir).args([
        "plan",
        "--input",
        "clip.mp4",
        "--ss",
        "2",
        "--container",
        "webp",
        "--framerate",
        "12",
        "--json",
    ]));

    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        plan["args"],
        serde_json::json!(["-ss", "2", "-i", "clip.mp4", "-r", "12", "-loop", "0", "output.webp"])
    );
    assert_eq!(plan["output_file_name"], "output.webp");
    assert_eq!(plan["output_mime"], "image/webp");
    assert_eq!(plan["resolved_output"]["container"], "webp");
}

#[test]
fn test_plan_respects_disabled_extras() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(mediaconv(&dir).args([
        "plan",
        "--input",
        "clip.gif",
        "--no-hq-gif",
    ]));

    assert!(stdout.contains("Arguments: -i clip.gif output.gif"));
    assert!(!stdout.contains("-filter_complex"));
}

#[test]
fn test_plan_without_container_fails() {
    let dir = TempDir::new().unwrap();
    mediaconv(&dir)
        .args(["plan", "--input", "recording"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No container selected"));
}

#[test]
fn test_render_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    mediaconv(&dir)
        .args(["render", "--input", "missing.mp4", "--container", "gif"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("mediaconv.toml"), "[session]\nreset_policy = 3\n").unwrap();

    mediaconv(&dir)
        .arg("containers")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_zero_framerate_is_rejected() {
    let dir = TempDir::new().unwrap();
    mediaconv(&dir)
        .args(["plan", "--input", "clip.mp4", "--framerate", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--framerate"));
}
