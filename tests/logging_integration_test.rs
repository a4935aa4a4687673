// Integration tests for logging functionality
// Note: the logger installs a global subscriber, so this binary holds a single test

mod common;

use std::fs;

use common::{units, CountingRenderer, RecordingObserver, ScriptedService};
use smelter::domain::models::ConcurrencyPolicy;
use smelter::infrastructure::logging::{LogConfig, LogFormat, LoggerImpl, RotationPolicy};
use smelter::Scheduler;
use tempfile::TempDir;
use tracing::info;

#[test]
fn test_run_is_logged_to_file() {
    let temp_dir = TempDir::new().unwrap();

    let config = LogConfig {
        level: "debug".to_string(),
        format: LogFormat::Json,
        log_dir: Some(temp_dir.path().to_path_buf()),
        enable_stderr: false,
        rotation: RotationPolicy::Never,
    };
    let logger = LoggerImpl::init(&config).unwrap();

    info!(key = "value", "Test message with fields");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        let service = ScriptedService::new();
        Scheduler::new(service, CountingRenderer::new())
            .start_run(
                units(&["A.java", "B.java"]),
                ConcurrencyPolicy::bounded(2),
                RecordingObserver::new(),
            )
            .unwrap()
            .wait()
            .await
            .unwrap();
    });

    // Dropping the logger flushes the non-blocking file writer
    drop(logger);

    let contents = fs::read_to_string(temp_dir.path().join("smelter.log")).unwrap();
    assert!(contents.contains("Test message with fields"));
    assert!(contents.contains("starting analysis run"));
    assert!(contents.contains("analysis run completed"));
    assert!(contents.contains("dispatching job"));

    // Every line is a JSON object
    for line in contents.lines().filter(|l| !l.trim().is_empty()) {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value.get("level").is_some());
    }
}
