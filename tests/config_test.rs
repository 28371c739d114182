use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use portal_e2e::config::{Config, DEFAULT_DATABASE_URL};
use portal_e2e::error::Error;
use tokio_test::{assert_err, assert_ok};

fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, Error> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|name| vars.get(name).cloned())
}

#[test]
fn defaults_target_a_local_stack() {
    let config = assert_ok!(from_pairs(&[]));

    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.app_base_url, "http://localhost:5173");
    assert_eq!(config.webdriver_url, "http://localhost:9515");
    assert!(config.headless);
    assert_eq!(config.wait_timeout(), Duration::from_secs(10));
    assert_eq!(config.poll_interval(), Duration::from_millis(250));
    assert_eq!(config.recruiter_username, "johan");
    assert_eq!(config.report_path, PathBuf::from("test-reports/report.json"));
}

#[test]
fn overrides_and_blank_values() {
    let config = assert_ok!(from_pairs(&[
        ("APP_BASE_URL", "https://portal.example.org/"),
        ("BROWSER_HEADLESS", "false"),
        ("WAIT_TIMEOUT_SECS", "30"),
        ("RECRUITER_USERNAME", "  "),
    ]));

    assert!(!config.headless);
    assert_eq!(config.wait_timeout(), Duration::from_secs(30));
    assert_eq!(config.recruiter_username, "johan");
    assert_eq!(config.page_url("/registro/"), "https://portal.example.org/registro/");
}

#[test]
fn unparseable_numbers_are_config_errors() {
    let err = assert_err!(from_pairs(&[("POLL_INTERVAL_MS", "fast")]));
    assert!(matches!(err, Error::Config(ref m) if m.contains("POLL_INTERVAL_MS")));
}

#[test]
fn out_of_range_values_fail_validation() {
    assert!(matches!(
        from_pairs(&[("WAIT_TIMEOUT_SECS", "0")]),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        from_pairs(&[("WEBDRIVER_URL", "not a url")]),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        from_pairs(&[("TEST_PASSWORD", "short")]),
        Err(Error::Validation(_))
    ));
}
