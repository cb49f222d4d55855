use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Directory simulation reports are written to when no explicit output
    /// path is given.
    pub data_dir: PathBuf,
    /// Portfolio size cap used when the caller does not pass one. Always `>= 1`.
    pub default_max_ads: usize,
    /// Minimum budget share (percent) an ad must earn to be selected.
    pub min_budget_share_pct: f64,
    /// Click rate (percent) above which a low-converting ad is a clickbait trap.
    pub clickbait_min_click_rate: f64,
    /// Conversion rate (percent) below which a high-clicking ad is a clickbait trap.
    pub clickbait_max_conversion_rate: f64,
    /// Clicks from personas whose trust is below this value are suspicious.
    pub trust_score_threshold: u8,
    /// Digital literacy below which form-heavy conversions are unrealistic.
    pub min_literacy_for_complex_form: u8,
}
