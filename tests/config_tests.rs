//! Configuration loading, saving and validation

mod test_helpers;

use swim_metrics::config::{Config, EXAMPLE_CONFIG};
use swim_metrics::{Error, TurnKind};
use test_helpers::Swimmer;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("swim_metrics_{}_{name}.yaml", std::process::id()))
}

#[test]
fn test_config_file_round_trip() {
    let mut config = Config::default();
    config.length.min_secs = 10.0;
    config.swim.stop_timeout_secs = 8.0;
    config.direction.min_samples = 50;

    let path = temp_path("round_trip");
    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, config);
    loaded.validate().unwrap();
}

#[test]
fn test_example_config_file_loads() {
    let path = temp_path("example");
    std::fs::write(&path, EXAMPLE_CONFIG).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_missing_file_is_io_error() {
    let result = Config::from_file(temp_path("does_not_exist"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_unknown_values_rejected() {
    let result = Config::from_yaml("swim:\n  stop_timeout_secs: soon\n");
    match result {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("Failed to parse config")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_validation_messages_name_the_field() {
    let mut config = Config::default();
    config.swim.turn_confirm_secs = -1.0;
    match config.validate() {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("swim.turn_confirm_secs")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }

    let mut config = Config::default();
    config.stroke.min_roll_strokes = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.thrust.window_secs = 0.01;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.replay.progress_interval_secs = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_changes_engine_behaviour() {
    // A 20 s length is too short under a 30 s minimum
    let mut config = Config::default();
    config.length.min_secs = 30.0;
    let mut strict = Swimmer::with_config(config).unwrap();
    strict.stand(2.0).crawl(20.0).stand(6.0);
    assert!(strict.recorder().lengths.is_empty());

    // A longer stop timeout keeps the length open through a 6 s stand
    let mut config = Config::default();
    config.swim.stop_timeout_secs = 10.0;
    let mut patient = Swimmer::with_config(config).unwrap();
    patient.stand(2.0).crawl(20.0).stand(6.0);
    assert!(patient.recorder().lengths.is_empty());
    patient.stand(5.0);
    assert_eq!(patient.recorder().lengths.len(), 1);
    assert_eq!(patient.recorder().lengths[0].turn, TurnKind::Stopped);
}
