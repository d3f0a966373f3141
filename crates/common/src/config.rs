use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub general: General,
    pub paths: Paths,
    pub generator: Generator,
    pub classifier: Classifier,
    pub chart: Chart,
    pub observability: Option<Observability>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct General {
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
    pub raw_data: String,
    pub chart_png: String,
    pub chart_html: String,
    pub daily_csv: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Generator {
    pub days: u32,
    /// First simulated day. Defaults to `today - days` when absent.
    pub start_date: Option<NaiveDate>,
    pub seed: Option<u64>,
    pub base_daily_volume: f64,
    pub noise_std_dev: f64,
    pub min_daily_transactions: u32,
    pub unique_wallet_ratio: f64,
    pub high_activity_wallet_share: f64,
    pub high_activity_tx_share: f64,
    pub value_mean_usd: f64,
}

/// Organic iff `tx_count > min_tx_count`, `total_value_usd >= min_total_value_usd`
/// and `age_days > min_age_days`.
#[derive(Debug, Clone, Deserialize)]
pub struct Classifier {
    pub min_tx_count: u32,
    pub min_total_value_usd: f64,
    pub min_age_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Observability {
    /// Prometheus text-format dump written once the run finishes.
    pub metrics_textfile: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn metrics_textfile(&self) -> Option<&str> {
        self.observability
            .as_ref()
            .and_then(|o| o.metrics_textfile.as_deref())
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_toml_str(s)
    }
}
