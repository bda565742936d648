//! Filename verification against real directories

use std::fs;
use std::path::Path;
use std::sync::Arc;

use zoe_core::application::tasks::{check_filenames, list_filenames, verify_filenames};
use zoe_core::application::{FlowParams, FlowRegistry, FlowRunner};
use zoe_core::domain::{FlowRunState, ValidationError};
use zoe_core::port::id_provider::UuidProvider;
use zoe_core::port::time_provider::SystemTimeProvider;
use zoe_infra_system::{LocalFileSystem, StreamingShellExecutor};

fn populate(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), "").unwrap();
    }
}

#[test]
fn test_partition_is_exhaustive_and_disjoint() {
    let dir = tempfile::tempdir().unwrap();
    let names = [
        "hello_world.txt",
        "BadName.TXT",
        "ok2.csv",
        "_hidden.md",
        "trailing_.md",
        "data_2024.json",
        "with space.txt",
    ];
    populate(dir.path(), &names);

    let listing = list_filenames(&LocalFileSystem, dir.path()).unwrap();
    let report = check_filenames(listing.clone());

    assert_eq!(report.len(), listing.len());
    for name in &listing {
        let in_valid = report.valid.contains(name);
        let in_invalid = report.invalid.contains(name);
        assert!(in_valid ^ in_invalid, "{name} must be in exactly one set");
    }

    // Both sets keep the listing's order
    let valid_positions: Vec<usize> = report
        .valid
        .iter()
        .map(|n| listing.iter().position(|l| l == n).unwrap())
        .collect();
    assert!(valid_positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_validation_failure_lists_exactly_invalid_names() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(), &["hello_world.txt", "BadName.TXT", "ok2.csv"]);

    let err = verify_filenames(&LocalFileSystem, dir.path()).unwrap_err();

    assert_eq!(
        err,
        ValidationError::ValidationFailure {
            invalid: vec!["BadName.TXT".to_string()],
        }
    );
}

#[test]
fn test_missing_directory_is_not_a_classification() {
    let dir = tempfile::tempdir().unwrap();

    let err = verify_filenames(&LocalFileSystem, &dir.path().join("absent")).unwrap_err();

    assert!(matches!(err, ValidationError::DirectoryUnavailable { .. }));
}

#[tokio::test]
async fn test_verify_flow_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(), &["good_one.txt", "Bad-One.txt"]);

    let runner = FlowRunner::new(
        Arc::new(FlowRegistry::builtin()),
        Arc::new(StreamingShellExecutor::default()),
        Arc::new(LocalFileSystem),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
    );
    let params =
        FlowParams::new().with("folder_path", dir.path().to_string_lossy().into_owned());

    let run = runner
        .run(
            "flows/content_filenames_verification_flow:verify_filenames_flow",
            params,
        )
        .await
        .unwrap();

    assert_eq!(run.state, FlowRunState::Failed);
    let error = run.error.unwrap();
    assert!(error.contains("Bad-One.txt"));
    assert!(!error.contains("good_one.txt"));
    assert_eq!(run.messages[0], r#"Valid filenames: ["good_one.txt"]"#);
}
