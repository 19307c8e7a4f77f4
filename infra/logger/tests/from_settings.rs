use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use wirekit_logger::{FileRotation, FileSettings, Logger, LoggerSettings};

#[test]
fn settings_with_a_file_section_write_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");
    let settings = LoggerSettings {
        name: "integration-settings".to_owned(),
        console: false,
        filter: Some("wirekit=debug".to_owned()),
        file: Some(FileSettings {
            path: log_dir.clone(),
            rotation: FileRotation::Never,
            json: true,
            ..FileSettings::default()
        }),
        ..LoggerSettings::default()
    };

    let logger = Logger::from_settings(&settings)?;
    assert!(logger.has_file_output());
    tracing::debug!(target: "wirekit", module = "testModule", "Initialized module");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(log_file)?;
    let line = contents.lines().find(|line| line.contains("testModule")).expect("event should be logged");
    assert!(line.starts_with('{'), "expected a JSON line, got {line}");
    Ok(())
}
