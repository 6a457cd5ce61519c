use chrono::TimeDelta;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// HTTP listener configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Age thresholds for cached records.
///
/// Protocol snapshots and daily series are checked by emptiness, not age,
/// so only point metrics carry a threshold.
#[derive(Debug, Deserialize, Clone)]
pub struct FreshnessSettings {
    #[serde(default = "default_point_metric_max_age")]
    pub point_metric_max_age_secs: u64,
}

impl Default for FreshnessSettings {
    fn default() -> Self {
        Self {
            point_metric_max_age_secs: default_point_metric_max_age(),
        }
    }
}

impl FreshnessSettings {
    /// Point metric max age as a signed duration.
    pub fn point_metric_max_age(&self) -> Result<TimeDelta, ConfigError> {
        i64::try_from(self.point_metric_max_age_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "freshness.point_metric_max_age_secs out of range: {}",
                    self.point_metric_max_age_secs
                ))
            })
    }
}

fn default_point_metric_max_age() -> u64 {
    300 // 5 minutes
}

/// Default and maximum `days` windows for the daily series endpoints.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct WindowSettings {
    #[serde(default = "default_wallet_flow_days")]
    pub wallet_flow_days: u32,
    #[serde(default = "default_volume_days")]
    pub volume_days: u32,
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            wallet_flow_days: default_wallet_flow_days(),
            volume_days: default_volume_days(),
            max_days: default_max_days(),
        }
    }
}

fn default_wallet_flow_days() -> u32 {
    7
}

fn default_volume_days() -> u32 {
    30
}

fn default_max_days() -> u32 {
    365
}

/// Background refresh configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RefreshSettings {
    /// Interval for the periodic full refresh. 0 disables the job.
    #[serde(default)]
    pub interval_secs: u64,
}

/// Where the SOL price and 24h change come from.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    /// Uniform-random values within the documented ranges.
    #[default]
    Synthetic,
    /// CoinGecko simple-price API.
    Coingecko,
}

/// SOL price feed configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct PriceFeedSettings {
    #[serde(default)]
    pub source: PriceSource,
    #[serde(default = "default_price_feed_url")]
    pub url: String,
    #[serde(default = "default_price_feed_timeout")]
    pub timeout_secs: u64,
}

impl Default for PriceFeedSettings {
    fn default() -> Self {
        Self {
            source: PriceSource::default(),
            url: default_price_feed_url(),
            timeout_secs: default_price_feed_timeout(),
        }
    }
}

fn default_price_feed_url() -> String {
    "https://api.coingecko.com/api/v3/simple/price".to_string()
}

fn default_price_feed_timeout() -> u64 {
    10
}

/// Root application configuration.
///
/// Loaded from an optional `config.{yaml,toml,json}` in the working directory,
/// then overridden by `SOLPULSE__SECTION__KEY` environment variables.
/// Every field has a default, so no file is required.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub freshness: FreshnessSettings,
    #[serde(default)]
    pub windows: WindowSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub price_feed: PriceFeedSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("SOLPULSE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        settings.freshness.point_metric_max_age()?;

        Ok(settings)
    }
}
