use autofocus_rs::config::Config;
use autofocus_rs::error::Error;
use std::time::Duration;

// Env-var tests share process state, so they run as one test.
#[test]
fn config_from_env() {
    unsafe {
        std::env::remove_var("AUTOFOCUS_INTERVAL_MS");
        std::env::remove_var("LOG_LEVEL");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.interval, Duration::from_millis(2000));
    assert_eq!(config.log_level, "info");

    unsafe {
        std::env::set_var("AUTOFOCUS_INTERVAL_MS", "1500");
        std::env::set_var("LOG_LEVEL", "debug");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.interval, Duration::from_millis(1500));
    assert_eq!(config.autofocus().interval, Duration::from_millis(1500));
    assert_eq!(config.log_level, "debug");

    for bad in ["0", "-5", "soon"] {
        unsafe {
            std::env::set_var("AUTOFOCUS_INTERVAL_MS", bad);
        }
        assert!(matches!(Config::from_env(), Err(Error::Config(_))), "{bad}");
    }

    // Clean up
    unsafe {
        std::env::remove_var("AUTOFOCUS_INTERVAL_MS");
        std::env::remove_var("LOG_LEVEL");
    }
}

#[test]
fn config_from_toml() {
    let config = Config::from_toml_str(
        r#"
        interval_ms = 750
        otel_endpoint = "http://localhost:4317"
        "#,
    )
    .unwrap();
    assert_eq!(config.interval, Duration::from_millis(750));
    assert_eq!(config.otel_endpoint.as_deref(), Some("http://localhost:4317"));
    assert_eq!(config.log_level, "info");
}

#[test]
fn empty_toml_uses_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.interval, Duration::from_millis(2000));
    assert!(config.otel_endpoint.is_none());
}

#[test]
fn config_from_toml_rejects_bad_values() {
    assert!(matches!(Config::from_toml_str("interval_ms = 0"), Err(Error::Config(_))));
    assert!(matches!(Config::from_toml_str("interval = 10"), Err(Error::Config(_))));
    assert!(matches!(Config::from_toml_str("interval_ms = \"fast\""), Err(Error::Config(_))));
}

#[test]
fn missing_config_file_is_a_config_error() {
    let path = std::env::temp_dir().join("autofocus-missing-config.toml");
    assert!(matches!(Config::from_file(&path), Err(Error::Config(_))));
}
