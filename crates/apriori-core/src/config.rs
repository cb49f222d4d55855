use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; defaults match the documented portfolio and
/// validation policy.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u8 = |var: &str, default: &str| -> Result<u8, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u8>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_pct = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| invalid(var, e.to_string()))?;
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid(var, format!("{value} is outside 0-100")));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("APRIORI_ENV", "development"));
    let log_level = or_default("APRIORI_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("APRIORI_DATA_DIR", "./data"));

    let default_max_ads = parse_usize("APRIORI_MAX_ADS", "3")?;
    if default_max_ads == 0 {
        return Err(invalid("APRIORI_MAX_ADS", "must be at least 1".to_string()));
    }

    let min_budget_share_pct = parse_pct("APRIORI_MIN_BUDGET_SHARE_PCT", "5.0")?;
    let clickbait_min_click_rate = parse_pct("APRIORI_CLICKBAIT_MIN_CLICK_RATE", "15.0")?;
    let clickbait_max_conversion_rate =
        parse_pct("APRIORI_CLICKBAIT_MAX_CONVERSION_RATE", "5.0")?;

    let trust_score_threshold = parse_u8("APRIORI_TRUST_SCORE_THRESHOLD", "3")?;
    let min_literacy_for_complex_form = parse_u8("APRIORI_MIN_LITERACY_FOR_COMPLEX_FORM", "5")?;

    Ok(AppConfig {
        env,
        log_level,
        data_dir,
        default_max_ads,
        min_budget_share_pct,
        clickbait_min_click_rate,
        clickbait_max_conversion_rate,
        trust_score_threshold,
        min_literacy_for_complex_form,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
