//! CLI configuration

use std::{path::PathBuf, time::Duration};

use clap::Args;
use storefront::{
    context::StorefrontSettings, domain::carts::models::StockPolicy,
    domain::checkout::retry::RetryPolicy,
};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Catalog source settings.
#[derive(Debug, Args)]
pub(crate) struct StoreConfig {
    /// YAML catalog the in-memory store is seeded from
    #[arg(
        long,
        env = "STOREFRONT_FIXTURE",
        default_value = "fixtures/storefront.yml",
        global = true
    )]
    pub fixture: PathBuf,

    /// ISO code of the currency every price is in
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "TRY", global = true)]
    pub currency: String,
}

/// Cart and checkout settings.
#[derive(Debug, Args)]
pub(crate) struct CheckoutConfig {
    /// How quantities above the available stock are treated
    #[arg(long, env = "STOCK_POLICY", value_enum, default_value_t = StockPolicy::Unbounded, global = true)]
    pub stock_policy: StockPolicy,

    /// Timeout for each order write attempt, in milliseconds
    #[arg(long, env = "SUBMIT_TIMEOUT_MS", default_value_t = 10_000_u64, global = true)]
    pub submit_timeout_ms: u64,

    /// Order write attempts before giving up
    #[arg(long, env = "SUBMIT_ATTEMPTS", default_value_t = 3_u32, global = true)]
    pub submit_attempts: u32,

    /// Delay after the first failed attempt, doubled after each further one
    #[arg(long, env = "SUBMIT_BACKOFF_MS", default_value_t = 250_u64, global = true)]
    pub backoff_ms: u64,

    /// Longest delay between attempts, in milliseconds
    #[arg(long, env = "SUBMIT_MAX_BACKOFF_MS", default_value_t = 2_000_u64, global = true)]
    pub max_backoff_ms: u64,
}

impl CheckoutConfig {
    pub(crate) fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempt_timeout: Duration::from_millis(self.submit_timeout_ms),
            max_attempts: self.submit_attempts.max(1),
            initial_backoff: Duration::from_millis(self.backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }

    pub(crate) fn settings(&self) -> StorefrontSettings {
        StorefrontSettings {
            stock_policy: self.stock_policy,
            retry: self.retry_policy(),
        }
    }
}
