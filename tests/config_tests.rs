use std::path::Path;

use sales_regression_lab::config::Config;

#[test]
fn shipped_default_config_loads() {
    let config = Config::load_from_path(Path::new("config/default.toml")).unwrap();
    assert_eq!(config.server.bind_addr, "127.0.0.1:8501");
    assert_eq!(config.server.max_upload_bytes, 16 * 1024 * 1024);
    assert_eq!(config.split.seed, 42);
    assert!((config.split.holdout_fraction - 0.3).abs() < f64::EPSILON);
    assert!((config.split.test_fraction_of_holdout - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.solver.max_iterations, 1000);
    assert_eq!(config.solver.bayes_max_iterations, 300);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file.is_none());
}

#[test]
fn missing_file_is_an_error_naming_the_path() {
    let err = Config::load_from_path(Path::new("config/does-not-exist.toml")).unwrap_err();
    assert!(format!("{:#}", err).contains("does-not-exist.toml"));
}

#[test]
fn logging_file_is_optional() {
    let toml_str = r#"
[server]
bind_addr = "0.0.0.0:9000"

[split]
holdout_fraction = 0.2
test_fraction_of_holdout = 0.5
seed = 7

[logging]
level = "warn"
file = "dashboard.log"
"#;
    let config = Config::from_toml_str(toml_str).unwrap();
    assert_eq!(config.server.max_upload_bytes, 16 * 1024 * 1024);
    assert_eq!(config.split.seed, 7);
    assert_eq!(config.logging.file.as_deref(), Some("dashboard.log"));
}
