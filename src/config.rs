//! Configuration for the payment form, the currency converter and the server.
//!
//! Configuration is read from JSON. Every key is optional, so `{}` yields the
//! defaults. Command-line flags in the binaries override these values.
//!
//! ```json
//! {
//!   "form": { "min_amount": 1, "max_amount": 1000000 },
//!   "converter": {
//!     "endpoint": "https://free.currconv.com/api/v7/convert",
//!     "api_key": "...",
//!     "timeout_secs": 10
//!   },
//!   "server": { "host": "0.0.0.0", "port": 3000 }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::amount::{AmountLimits, MAX_AMOUNT, MIN_AMOUNT};
use crate::error::ConfigError;

/// Default exchange-rate endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://free.currconv.com/api/v7/convert";

/// Default timeout for the exchange-rate request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Form validation settings.
    pub form: FormConfig,
    /// Currency converter settings.
    pub converter: ConverterConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

impl Config {
    /// Parses and checks configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot be used.
    ///
    /// Call again after applying command-line overrides.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.form.limits()?;
        if self.converter.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Reads configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Form validation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Smallest accepted amount in HUF.
    pub min_amount: u64,
    /// Largest accepted amount in HUF.
    pub max_amount: u64,
}

impl FormConfig {
    /// Returns the checked amount limits.
    pub fn limits(&self) -> Result<AmountLimits, ConfigError> {
        AmountLimits::new(self.min_amount, self.max_amount).ok_or(ConfigError::InvalidBounds {
            min: self.min_amount,
            max: self.max_amount,
        })
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            min_amount: MIN_AMOUNT,
            max_amount: MAX_AMOUNT,
        }
    }
}

/// Currency converter settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Exchange-rate endpoint URL.
    pub endpoint: String,
    /// API key sent as the `apiKey` query parameter.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ConverterConfig {
    /// Returns the request timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}
