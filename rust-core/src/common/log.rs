//! Logging setup on top of `tracing`.
//!
//! Events across the crate use the field names `ev`, `code` and `dur_ms` so
//! JSON output stays greppable.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use super::config::{LogFormat, ScanCfg};

/// Install the global subscriber. Later calls are no-ops.
pub fn init(cfg: &ScanCfg) {
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match cfg.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!(ev = "log_init", format = ?cfg.log_format, "logging ready");
    }
}
