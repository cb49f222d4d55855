use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.data_dir, std::path::PathBuf::from("./data"));
    assert_eq!(cfg.default_max_ads, 3);
    assert!((cfg.min_budget_share_pct - 5.0).abs() < f64::EPSILON);
    assert!((cfg.clickbait_min_click_rate - 15.0).abs() < f64::EPSILON);
    assert!((cfg.clickbait_max_conversion_rate - 5.0).abs() < f64::EPSILON);
    assert_eq!(cfg.trust_score_threshold, 3);
    assert_eq!(cfg.min_literacy_for_complex_form, 5);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("APRIORI_ENV", "production");
    map.insert("APRIORI_LOG_LEVEL", "debug");
    map.insert("APRIORI_DATA_DIR", "/var/lib/apriori");
    map.insert("APRIORI_MAX_ADS", "5");
    map.insert("APRIORI_MIN_BUDGET_SHARE_PCT", "2.5");
    map.insert("APRIORI_TRUST_SCORE_THRESHOLD", "4");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.data_dir, std::path::PathBuf::from("/var/lib/apriori"));
    assert_eq!(cfg.default_max_ads, 5);
    assert!((cfg.min_budget_share_pct - 2.5).abs() < f64::EPSILON);
    assert_eq!(cfg.trust_score_threshold, 4);
}

#[test]
fn build_app_config_rejects_zero_max_ads() {
    let mut map = HashMap::new();
    map.insert("APRIORI_MAX_ADS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "APRIORI_MAX_ADS"),
        "expected InvalidEnvVar(APRIORI_MAX_ADS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_max_ads() {
    let mut map = HashMap::new();
    map.insert("APRIORI_MAX_ADS", "three");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "APRIORI_MAX_ADS"),
        "expected InvalidEnvVar(APRIORI_MAX_ADS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_percentage_above_hundred() {
    let mut map = HashMap::new();
    map.insert("APRIORI_CLICKBAIT_MIN_CLICK_RATE", "150");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "APRIORI_CLICKBAIT_MIN_CLICK_RATE"),
        "expected InvalidEnvVar(APRIORI_CLICKBAIT_MIN_CLICK_RATE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_literacy_floor() {
    let mut map = HashMap::new();
    map.insert("APRIORI_MIN_LITERACY_FOR_COMPLEX_FORM", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "APRIORI_MIN_LITERACY_FOR_COMPLEX_FORM"),
        "expected InvalidEnvVar(APRIORI_MIN_LITERACY_FOR_COMPLEX_FORM), got: {result:?}"
    );
}
