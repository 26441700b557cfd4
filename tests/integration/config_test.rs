//! Configuration integration tests

use tick_pulse::config::{Config, ConfigError};

#[test]
fn test_example_config_loads_and_validates() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = tokio_test::assert_ok!(Config::load(path));

    assert_eq!(config.feed.symbols, vec!["BTC/USD"]);
    assert_eq!(config.engine.history_capacity, 50);
    assert_eq!(config.engine.candle_bucket_size, 30);
    assert_eq!(config.engine.highlight_clear_ms, 500);
    assert_eq!(config.engine.reconnect_delay_ms, 3000);
    tokio_test::assert_ok!(config.validate());
}

#[test]
fn test_empty_symbol_set_fails_validation() {
    let toml = r#"
        [feed]
        url = "wss://example.com"
        symbols = []
    "#;

    let config = Config::from_toml_str(toml).unwrap();
    assert_eq!(config.validate(), Err(ConfigError::NoSymbols));
}

#[test]
fn test_zero_bucket_size_fails_validation() {
    let toml = r#"
        [feed]
        url = "wss://example.com"
        symbols = ["BTC/USD"]

        [engine]
        candle_bucket_size = 0
    "#;

    let config = Config::from_toml_str(toml).unwrap();
    assert_eq!(
        config.validate(),
        Err(ConfigError::NonPositive("candle_bucket_size"))
    );
}
