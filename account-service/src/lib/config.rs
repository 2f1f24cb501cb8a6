use std::env;
use std::fmt;

use auth::HashCost;
use chrono::Duration;
use chrono::Utc;
use config::builder::ConfigBuilder;
use config::builder::DefaultState;
use config::Config as RawConfig;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use thiserror::Error;

#[derive(Deserialize, Clone)]
pub struct Config {
    /// Listen port
    pub port: u16,
    /// HS256 signing secret, loaded once at startup
    pub jwt_secret: String,
    /// Token lifetime, e.g. "1h", "30m", "7d" or a number of seconds
    pub jwt_expires_in: String,
    /// Postgres connection string; the in-memory store is used when absent
    #[serde(default)]
    pub database_url: Option<String>,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,
    /// Console log encoding
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("jwt_secret", &"***")
            .field("jwt_expires_in", &self.jwt_expires_in)
            .field("database_url", &self.database_url.as_ref().map(|_| "***"))
            .field("hash_memory_kib", &self.hash_memory_kib)
            .field("hash_iterations", &self.hash_iterations)
            .field("hash_parallelism", &self.hash_parallelism)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (PORT, JWT_SECRET, JWT_EXPIRES_IN, DATABASE_URL, HASH_*,
    ///    LOG_FORMAT)
    ///
    /// Values are kept as strings until deserialization, so a numeric-looking
    /// JWT_SECRET is used exactly as given.
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let files = RawConfig::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        Self::build(files, Environment::default())
    }

    /// Load configuration from an explicit set of variables instead of the
    /// process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self::build(
            RawConfig::builder(),
            Environment::default().source(Some(source)),
        )
    }

    fn build(
        builder: ConfigBuilder<DefaultState>,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let defaults = HashCost::default();

        let config: Config = builder
            .set_default("port", 5000)?
            .set_default("jwt_expires_in", "1h")?
            .set_default("hash_memory_kib", defaults.memory_kib)?
            .set_default("hash_iterations", defaults.iterations)?
            .set_default("hash_parallelism", defaults.parallelism)?
            .set_default("log_format", "text")?
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("JWT_SECRET must not be empty".to_string()));
        }
        let ttl = self.token_ttl()?;
        if Utc::now().checked_add_signed(ttl).is_none() {
            return Err(ConfigError::Message(format!(
                "JWT_EXPIRES_IN: {:?} puts token expiry out of range",
                self.jwt_expires_in
            )));
        }
        Ok(())
    }

    /// Parsed `jwt_expires_in`.
    pub fn token_ttl(&self) -> Result<Duration, ConfigError> {
        parse_ttl(&self.jwt_expires_in)
            .map_err(|e| ConfigError::Message(format!("JWT_EXPIRES_IN: {}", e)))
    }

    pub fn hash_cost(&self) -> HashCost {
        HashCost {
            memory_kib: self.hash_memory_kib,
            iterations: self.hash_iterations,
            parallelism: self.hash_parallelism,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TtlError {
    #[error("duration is empty")]
    Empty,

    #[error("invalid number in {0:?}")]
    InvalidNumber(String),

    #[error("unknown unit {0:?}")]
    UnknownUnit(String),

    #[error("duration must be positive")]
    NotPositive,
}

/// Parse a token lifetime such as `"1h"`, `"90m"`, `"2 days"` or `"3600"`.
///
/// A bare number is read as seconds. Fractions are allowed (`"1.5h"`).
pub fn parse_ttl(raw: &str) -> Result<Duration, TtlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TtlError::Empty);
    }

    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);

    let value: f64 = number
        .parse()
        .map_err(|_| TtlError::InvalidNumber(raw.to_string()))?;

    let millis_per_unit: f64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1_000.0,
        "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60_000.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600_000.0,
        "d" | "day" | "days" => 86_400_000.0,
        "w" | "week" | "weeks" => 604_800_000.0,
        "y" | "yr" | "yrs" | "year" | "years" => 31_557_600_000.0,
        other => return Err(TtlError::UnknownUnit(other.to_string())),
    };

    let millis = (value * millis_per_unit).round();
    if !millis.is_finite() || millis < 1.0 {
        return Err(TtlError::NotPositive);
    }
    if millis > i64::MAX as f64 {
        return Err(TtlError::InvalidNumber(raw.to_string()));
    }

    Ok(Duration::milliseconds(millis as i64))
}
