//! Runtime configuration loaded once from the environment.
//!
//! The snapshot is passed explicitly to whatever needs it; nothing in the
//! crate reads the environment at call time.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::error::{ScanError, ScanResult};

/// Simulated inference time used in demo mode.
pub const DEFAULT_DEMO_LATENCY_MS: u64 = 2000;

/// Output format for log lines.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ScanError::config(format!("unknown log format '{other}'"))),
        }
    }
}

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug)]
pub struct ScanCfg {
    /// Base URL of the inference backend. `None` selects demo mode.
    pub api_url: Option<String>,
    pub demo_latency: Duration,
    pub request_timeout: Option<Duration>,
    pub log_format: LogFormat,
    pub log_filter: String,
}

impl Default for ScanCfg {
    fn default() -> Self {
        Self {
            api_url: None,
            demo_latency: Duration::from_millis(DEFAULT_DEMO_LATENCY_MS),
            request_timeout: None,
            log_format: LogFormat::Pretty,
            log_filter: "info".to_string(),
        }
    }
}

impl ScanCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> ScanResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ScanResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let demo_latency = match parse_var::<u64, _>(&lookup, "NEUROSCAN_DEMO_LATENCY_MS")? {
            Some(ms) => Duration::from_millis(ms),
            None => defaults.demo_latency,
        };
        let request_timeout =
            parse_var::<u64, _>(&lookup, "NEUROSCAN_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);
        let log_format = match lookup("NEUROSCAN_LOG_FORMAT") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.log_format,
        };
        let log_filter = lookup("NEUROSCAN_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            api_url: normalize_url(lookup("NEUROSCAN_API_URL")),
            demo_latency,
            request_timeout,
            log_format,
            log_filter,
        })
    }

    /// Replace the endpoint, applying the same normalisation as the loader.
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        self.api_url = normalize_url(url);
        self
    }

    pub fn is_demo(&self) -> bool {
        self.api_url.is_none()
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> ScanResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ScanError::config(format!("{key} is not a valid number: '{raw}'"))),
        _ => Ok(None),
    }
}

fn normalize_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().trim_end_matches('/').to_string())
        .filter(|u| !u.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg_from(pairs: &[(&str, &str)]) -> ScanResult<ScanCfg> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ScanCfg::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_is_demo_mode() {
        let cfg = cfg_from(&[]).unwrap();
        assert!(cfg.is_demo());
        assert_eq!(cfg.demo_latency, Duration::from_millis(DEFAULT_DEMO_LATENCY_MS));
        assert_eq!(cfg.request_timeout, None);
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn blank_url_is_demo_mode() {
        let cfg = cfg_from(&[("NEUROSCAN_API_URL", "   ")]).unwrap();
        assert!(cfg.is_demo());
    }

    #[test]
    fn url_trailing_slash_is_stripped() {
        let cfg = cfg_from(&[("NEUROSCAN_API_URL", "http://localhost:8000/")]).unwrap();
        assert_eq!(cfg.api_url.as_deref(), Some("http://localhost:8000"));
        assert!(!cfg.is_demo());
    }

    #[test]
    fn numeric_values_are_parsed() {
        let cfg = cfg_from(&[
            ("NEUROSCAN_DEMO_LATENCY_MS", "0"),
            ("NEUROSCAN_REQUEST_TIMEOUT_SECS", "30"),
            ("NEUROSCAN_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(cfg.demo_latency, Duration::ZERO);
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_number_is_config_error() {
        let err = cfg_from(&[("NEUROSCAN_DEMO_LATENCY_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn unknown_log_format_is_config_error() {
        let err = cfg_from(&[("NEUROSCAN_LOG_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn override_url_is_normalised() {
        let cfg = ScanCfg::default().with_api_url(Some("https://api.example.org//".into()));
        assert_eq!(cfg.api_url.as_deref(), Some("https://api.example.org"));
        let cfg = cfg.with_api_url(Some(String::new()));
        assert!(cfg.is_demo());
    }
}
