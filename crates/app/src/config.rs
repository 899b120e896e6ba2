//! Application configuration.

use std::{path::PathBuf, time::Duration};

use clap::Args;

use crate::{
    address::DEFAULT_BASE_URL,
    checkout::CheckoutSettings,
};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Storefront settings.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Directory holding the persisted cart and orders
    #[arg(long, env = "VITRINE_DATA_DIR", default_value = ".vitrine", global = true)]
    pub data_dir: PathBuf,

    /// Fixtures directory with `catalog/{name}.yml`; the bundled catalog is used when omitted
    #[arg(long, env = "VITRINE_FIXTURES_DIR", global = true)]
    pub fixtures_dir: Option<PathBuf>,

    /// Catalog fixture name inside the fixtures directory
    #[arg(long, env = "VITRINE_CATALOG", default_value = "default", global = true)]
    pub catalog: String,

    /// Postal code service base URL
    #[arg(long, env = "VITRINE_CEP_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub cep_base_url: String,

    /// Simulated payment processing time, in milliseconds
    #[arg(long, env = "VITRINE_PROCESSING_DELAY_MS", default_value_t = 2000, global = true)]
    pub processing_delay_ms: u64,

    /// PIX countdown, in seconds
    #[arg(long, env = "VITRINE_PIX_COUNTDOWN_SECS", default_value_t = 10, global = true)]
    pub pix_countdown_secs: u64,

    /// Simulated support message send time, in milliseconds
    #[arg(long, env = "VITRINE_SUPPORT_DELAY_MS", default_value_t = 2000, global = true)]
    pub support_delay_ms: u64,
}

impl StoreConfig {
    /// Checkout latencies.
    #[must_use]
    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            processing_delay: Duration::from_millis(self.processing_delay_ms),
            pix_countdown: Duration::from_secs(self.pix_countdown_secs),
        }
    }

    /// Support send latency.
    #[must_use]
    pub fn support_delay(&self) -> Duration {
        Duration::from_millis(self.support_delay_ms)
    }
}
