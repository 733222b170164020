use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tempfile::{NamedTempFile, TempDir};
use zip::ZipArchive;

use form22_core::testing::fixtures;

/// Write a config pointing at `template` and `output`.
fn offline_config(template: &Path, output: &Path, extra: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[run]
offline = true
output_dir = {:?}
{}

[template]
dir = {:?}

[recipient]
name = "Иванов Иван Иванович"
generation_date = "2021-03-15"
"#,
        output.display().to_string(),
        extra,
        template.display().to_string(),
    )
    .unwrap();
    file
}

/// Run the binary and return its exit status.
async fn run_cli(config_path: &Path, args: &[&str]) -> std::process::ExitStatus {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_form22"))
        .args(args)
        .env("FORM22_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .status()
        .await
        .expect("Failed to run form22")
}

fn read_content(path: &Path) -> String {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name("content.xml").unwrap();
    let mut text = String::new();
    entry.read_to_string(&mut text).unwrap();
    text
}

#[tokio::test]
async fn test_offline_run_writes_notice_per_code() {
    let template = TempDir::new().unwrap();
    fixtures::write_template(template.path()).unwrap();
    let output = TempDir::new().unwrap();
    let config = offline_config(template.path(), output.path(), "");

    let status = run_cli(config.path(), &["12345;67890"]).await;
    assert!(status.success());

    let notice = output.path().join("Извещение 12345.odg");
    assert!(notice.is_file());
    assert!(output.path().join("Извещение 67890.odg").is_file());

    let content = read_content(&notice);
    assert!(content.contains("<text:span>12345</text:span>"));
    assert!(content.contains("Иванов Иван Иванович"));
    assert!(content.contains("15 марта 2021"));
    assert!(!content.contains("${"));
}

#[tokio::test]
async fn test_empty_mode_writes_blank_notice() {
    let template = TempDir::new().unwrap();
    fixtures::write_template(template.path()).unwrap();
    let output = TempDir::new().unwrap();
    let config = offline_config(template.path(), output.path(), "empty = true");

    let status = run_cli(config.path(), &["12345"]).await;
    assert!(status.success());

    let notice = output.path().join("Извещение.odg");
    let content = read_content(&notice);
    assert!(!content.contains("Иванов"));
    assert!(!content.contains("12345"));
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_missing_template_fails() {
    let output = TempDir::new().unwrap();
    let config = offline_config(&output.path().join("absent"), output.path(), "");

    let status = run_cli(config.path(), &["12345"]).await;
    assert!(!status.success());
}

#[tokio::test]
async fn test_invalid_config_fails() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[orchestrator]\nmax_workers = 0").unwrap();

    let status = run_cli(config.path(), &[]).await;
    assert!(!status.success());
}
