use std::io::Write;

use nw_aligner::{AlignerError, AppConfig, ScoringScheme};

#[test]
fn loads_scoring_and_replay_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[scoring]
match_award = 2
mismatch_penalty = -3
gap_penalty = -2

[replay]
frame_delay_ms = 250
color = false
"#
    )
    .unwrap();

    let config = AppConfig::load(file.path()).unwrap();
    assert_eq!(config.scoring, ScoringScheme::new(2, -3, -2));
    assert_eq!(config.replay.frame_delay_ms, 250);
    assert_eq!(config.replay.min_frame_delay_ms, 100);
    assert!(!config.replay.color);
    assert!(config.replay.show_trace);
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, AlignerError::Config(_)));
}

#[test]
fn unknown_types_are_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[scoring]\ngap_penalty = \"high\"").unwrap();
    assert!(AppConfig::load(file.path()).is_err());
}
