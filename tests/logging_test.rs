// Logging setup writes to a file in the requested directory

use react_rag_agent::logging::init_logging_in;

#[test]
fn test_init_logging_creates_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");

    init_logging_in(&logs).unwrap();
    tracing::info!("hello from the test");

    let entries: Vec<_> = std::fs::read_dir(&logs)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("agent.log"))
        .collect();
    assert!(!entries.is_empty());

    // A second global subscriber cannot be installed
    assert!(init_logging_in(&logs).is_err());
}
