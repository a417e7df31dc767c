use clap::{CommandFactory, FromArgMatches, Parser};
use std::io::Write;
use tempfile::NamedTempFile;
use trp_penalty::config::EvaluatorConfig;
use trp_penalty::error::PenaltyError;
use trp_penalty::penalty::EvaluationParameters;

#[derive(Parser, Debug)]
struct Harness {
    #[command(flatten)]
    config: EvaluatorConfig,
}

fn parse(args: &[&str]) -> (EvaluatorConfig, clap::ArgMatches) {
    let matches = Harness::command()
        .try_get_matches_from(std::iter::once("harness").chain(args.iter().copied()))
        .unwrap();
    let harness = Harness::from_arg_matches(&matches).unwrap();
    (harness.config, matches)
}

#[test]
fn test_defaults() {
    let config = EvaluatorConfig::default();
    assert_eq!(config.scale, 100);
    assert_eq!(config.route_cap, None);
    assert_eq!(config.resolved_exponent(), 1.5);
}

#[test]
fn test_exponent_resolution_order() {
    let mut config = EvaluatorConfig {
        risk_threshold: 20,
        ..EvaluatorConfig::default()
    };
    assert_eq!(config.resolved_exponent(), 2.0);

    config.cost_exponent = Some(1.25);
    assert_eq!(config.resolved_exponent(), 1.25);
}

#[test]
fn test_load_partial_file_keeps_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "route_cap": 12.5, "risk_threshold": 15 }}"#).unwrap();

    let config = EvaluatorConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.scale, 100);
    assert_eq!(config.route_cap, Some(12.5));
    assert_eq!(config.resolved_exponent(), 1.5);
    assert_eq!(config.risk_threshold, 15);
}

#[test]
fn test_load_garbage_is_json_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "scale = 3").unwrap();
    let err = EvaluatorConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, PenaltyError::Json(_)));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = EvaluatorConfig::load_from_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, PenaltyError::Io(_)));
}

#[test]
fn test_cli_overrides_only_explicit_flags() {
    let mut from_file = EvaluatorConfig {
        scale: 10,
        route_cap: Some(3.0),
        cost_exponent: Some(2.0),
        risk_threshold: 0,
    };
    let (cli, matches) = parse(&["--cost-exponent", "1.1"]);
    from_file.merge_from_cli(&cli, &matches);

    // scale has a CLI default but was not typed, so the file value stays
    assert_eq!(from_file.scale, 10);
    assert_eq!(from_file.route_cap, Some(3.0));
    assert_eq!(from_file.cost_exponent, Some(1.1));
}

#[test]
fn test_cli_scale_flag_wins() {
    let mut from_file = EvaluatorConfig {
        scale: 10,
        ..EvaluatorConfig::default()
    };
    let (cli, matches) = parse(&["--scale", "1000", "--route-cap", "4"]);
    from_file.merge_from_cli(&cli, &matches);
    assert_eq!(from_file.scale, 1000);
    assert_eq!(from_file.route_cap, Some(4.0));
}

#[test]
fn test_parameters_are_validated() {
    let config = EvaluatorConfig {
        cost_exponent: Some(-1.0),
        ..EvaluatorConfig::default()
    };
    assert!(matches!(
        EvaluationParameters::try_from(&config),
        Err(PenaltyError::Config(_))
    ));

    let config = EvaluatorConfig {
        route_cap: Some(-2.0),
        ..EvaluatorConfig::default()
    };
    assert!(EvaluationParameters::try_from(&config).is_err());

    let params = EvaluationParameters::try_from(&EvaluatorConfig::default()).unwrap();
    assert_eq!(params, EvaluationParameters::default());
}
