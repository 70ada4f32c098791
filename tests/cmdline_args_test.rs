//! Tests for command-line argument parsing

use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use swim_metrics::app::ReplayArgs;

#[test]
fn test_help_argument() {
    let result = ReplayArgs::try_parse_from(["swim-replay", "--help"]);

    // Help should cause an error (but a specific help error)
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn test_no_arguments() {
    let result = ReplayArgs::try_parse_from(["swim-replay"]);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_input_only_uses_defaults() {
    let args = ReplayArgs::try_parse_from(["swim-replay", "session.csv"]).unwrap();
    assert_eq!(args.input, Some(PathBuf::from("session.csv")));
    assert_eq!(args.config, None);
    assert_eq!(args.output, None);
    assert!(!args.events);
    assert!(!args.debug);
    assert!(!args.headers);
    assert_eq!(args.write_config, None);
}

#[test]
fn test_all_flags() {
    let args = ReplayArgs::try_parse_from([
        "swim-replay",
        "session.csv",
        "-C",
        "swim.yaml",
        "-o",
        "lengths.csv",
        "--events",
        "--debug",
        "--headers",
    ])
    .unwrap();
    assert_eq!(args.config, Some(PathBuf::from("swim.yaml")));
    assert_eq!(args.output, Some(PathBuf::from("lengths.csv")));
    assert!(args.events);
    assert!(args.debug);
    assert!(args.headers);
}

#[test]
fn test_short_flags() {
    let args = ReplayArgs::try_parse_from(["swim-replay", "-e", "-d", "session.csv"]).unwrap();
    assert!(args.events);
    assert!(args.debug);
}

#[test]
fn test_long_config_flag() {
    let args =
        ReplayArgs::try_parse_from(["swim-replay", "session.csv", "--config", "swim.yaml"]).unwrap();
    assert_eq!(args.config, Some(PathBuf::from("swim.yaml")));
}

#[test]
fn test_write_config_without_input() {
    let args = ReplayArgs::try_parse_from(["swim-replay", "--write-config", "swim.yaml"]).unwrap();
    assert_eq!(args.input, None);
    assert_eq!(args.write_config, Some(PathBuf::from("swim.yaml")));
}

#[test]
fn test_unknown_argument() {
    let result = ReplayArgs::try_parse_from(["swim-replay", "session.csv", "--cam", "0"]);
    assert!(result.is_err());
    assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::UnknownArgument);
}

#[test]
fn test_command_definition() {
    ReplayArgs::command().debug_assert();
}
