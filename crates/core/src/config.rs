//! Configuration structures for the vacancy statistics system.

use crate::currency::CurrencyTable;
use crate::error::{Error, Result};
use crate::types::{ProfessionFilter, Year};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration for the statistics pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Aggregation configuration.
    pub stats: StatsConfig,
    /// Reference-rate table.
    pub currency: CurrencyTable,
    /// Partitioned reducer configuration.
    pub reducer: ReducerConfig,
    /// CSV ingestion configuration.
    pub ingestion: IngestionConfig,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Load configuration from a JSON file. Missing sections use defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<()> {
        if self.stats.top_cities == 0 {
            return Err(Error::config("stats.top_cities must be at least 1"));
        }
        if self.stats.min_share_divisor == 0 {
            return Err(Error::config("stats.min_share_divisor must be at least 1"));
        }
        if self.stats.share_precision > 10 {
            return Err(Error::config("stats.share_precision must be at most 10"));
        }
        self.currency.validate()
    }
}

/// Aggregation engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Profession substring for the filtered year dynamics.
    pub profession: ProfessionFilter,
    /// Number of cities kept by each ranking before the share filter.
    pub top_cities: usize,
    /// A city needs at least `total / min_share_divisor` postings (100 = 1%).
    pub min_share_divisor: u64,
    /// Decimal places of city posting shares.
    pub share_precision: u32,
    /// Year reported when no vacancy matches the profession filter.
    pub fallback_year: Year,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            profession: ProfessionFilter::default(),
            top_cities: 10,
            min_share_divisor: 100,
            share_precision: 4,
            fallback_year: 2022,
        }
    }
}

/// Partitioned reducer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReducerConfig {
    /// Number of worker threads (0 = half the available parallelism).
    pub workers: usize,
}

/// CSV ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Skip rows with empty fields or a wrong field count instead of failing.
    pub skip_incomplete_rows: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            skip_incomplete_rows: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.stats.top_cities, 10);
        assert_eq!(config.stats.min_share_divisor, 100);
        assert_eq!(config.stats.share_precision, 4);
        assert_eq!(config.stats.fallback_year, 2022);
        assert_eq!(config.reducer.workers, 0);
        assert!(config.ingestion.skip_incomplete_rows);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"stats": {{"profession": "Аналитик"}}, "reducer": {{"workers": 3}}}}"#
        )
        .unwrap();

        let config = Config::from_json_file(file.path()).unwrap();
        assert_eq!(config.stats.profession.as_str(), "Аналитик");
        assert_eq!(config.stats.top_cities, 10);
        assert_eq!(config.reducer.workers, 3);
        assert_eq!(config.currency, CurrencyTable::default());
    }

    #[test]
    fn test_currency_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"currency": {{"RUR": 1.0, "USD": 75.5}}}}"#).unwrap();

        let config = Config::from_json_file(file.path()).unwrap();
        assert_eq!(config.currency.len(), 2);
        assert_eq!(config.currency.rate("USD").unwrap(), 75.5);
        assert!(config.currency.rate("EUR").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_top_cities() {
        let mut config = Config::default();
        config.stats.top_cities = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
