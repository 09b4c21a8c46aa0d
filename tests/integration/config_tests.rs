use clap::Parser;
use dupseq::cli::{Cli, OutputFormat};
use dupseq::config::{Config, ConfigError};
use dupseq::pipeline::Policy;
use dupseq::scanner::DigestAlgorithm;
use figment::providers::{Env, Serialized};
use figment::Figment;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config.prefix, "foto");
    assert_eq!(config.pad_width, 4);
    assert_eq!(config.output, OutputFormat::Text);
}

#[test]
fn test_config_load_from_env() {
    // A dedicated prefix keeps this independent of the real DUPSEQ_ variables.
    std::env::set_var("DUPSEQ_ENVTEST_PREFIX", "fiesta");
    std::env::set_var("DUPSEQ_ENVTEST_PAD_WIDTH", "3");
    std::env::set_var("DUPSEQ_ENVTEST_DIGEST", "sha256");
    std::env::set_var("DUPSEQ_ENVTEST_TRASH", "true");

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DUPSEQ_ENVTEST_"));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.prefix, "fiesta");
    assert_eq!(config.pad_width, 3);
    assert_eq!(config.digest, DigestAlgorithm::Sha256);
    assert!(config.trash);

    std::env::remove_var("DUPSEQ_ENVTEST_PREFIX");
    std::env::remove_var("DUPSEQ_ENVTEST_PAD_WIDTH");
    std::env::remove_var("DUPSEQ_ENVTEST_DIGEST");
    std::env::remove_var("DUPSEQ_ENVTEST_TRASH");
}

#[test]
fn test_config_invalid_env_value() {
    std::env::set_var("DUPSEQ_BADTEST_PAD_WIDTH", "wide");

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DUPSEQ_BADTEST_"));
    let result: Result<Config, _> = figment.extract();

    assert!(result.is_err());
    std::env::remove_var("DUPSEQ_BADTEST_PAD_WIDTH");
}

#[test]
fn test_cli_overrides_env_layer() {
    let mut config = Config {
        prefix: "from-env".to_string(),
        pattern: "*.png".to_string(),
        ..Config::default()
    };
    let cli = Cli::try_parse_from(["dupseq", "pairs", "/d", "--prefix", "from-cli"]).unwrap();

    config.merge_args(&cli.command);

    assert_eq!(config.prefix, "from-cli");
    assert_eq!(config.pattern, "*.png");
    assert_eq!(config.policy, Policy::Pairing);
}

#[test]
fn test_from_command_validates() {
    let cli = Cli::try_parse_from(["dupseq", "dedup", "/d", "--pad-width", "0"]).unwrap();
    assert!(matches!(
        Config::from_command(&cli.command),
        Err(ConfigError::InvalidPadWidth(0))
    ));

    let cli = Cli::try_parse_from(["dupseq", "dedup", "/d", "--chunk-size", "0"]).unwrap();
    assert!(matches!(
        Config::from_command(&cli.command),
        Err(ConfigError::ZeroChunkSize)
    ));
}
