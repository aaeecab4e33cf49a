use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, AppResult};

pub const ENV_BASE_DOMAIN: &str = "TIMECLOCK_BASE_DOMAIN";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "TIMECLOCK_HTTP_TIMEOUT_SECS";
pub const ENV_LAYOUT_CACHE_DIR: &str = "TIMECLOCK_LAYOUT_CACHE_DIR";

const DEFAULT_BASE_DOMAIN: &str = "http://localhost:5000";
const DEFAULT_HTTP_TIMEOUT: StdDuration = StdDuration::from_secs(10);
const DEFAULT_KPI_CACHE_TTL: StdDuration = StdDuration::from_secs(5 * 60);
const DEFAULT_NOTIFICATION_DURATION: StdDuration = StdDuration::from_millis(4000);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_domain: String,
    pub http_timeout: StdDuration,
    pub kpi_cache_ttl: StdDuration,
    pub notification_duration: StdDuration,
    pub layout_cache_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_domain: DEFAULT_BASE_DOMAIN.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            kpi_cache_ttl: DEFAULT_KPI_CACHE_TTL,
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
            layout_cache_dir: None,
        }
    }
}

/// On-disk shape; every field is optional and falls back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClientConfigFile {
    base_domain: Option<String>,
    http_timeout_secs: Option<u64>,
    kpi_cache_ttl_secs: Option<u64>,
    notification_duration_ms: Option<u64>,
    layout_cache_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: normalize_domain(&base_domain.into()),
            ..Self::default()
        }
    }

    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(domain) = std::env::var(ENV_BASE_DOMAIN) {
            config.base_domain = normalize_domain(&domain);
        }

        if let Ok(raw) = std::env::var(ENV_HTTP_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|err| {
                AppError::config(format!("{ENV_HTTP_TIMEOUT_SECS} must be a number: {err}"))
            })?;
            config.http_timeout = StdDuration::from_secs(secs);
        }

        if let Ok(dir) = std::env::var(ENV_LAYOUT_CACHE_DIR) {
            if !dir.trim().is_empty() {
                config.layout_cache_dir = Some(PathBuf::from(dir.trim()));
            }
        }

        config.validate()?;
        debug!(target: "app::config", base_domain = %config.base_domain, "configuration loaded from environment");
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> AppResult<Self> {
        let file: ClientConfigFile = serde_yaml::from_str(raw)?;
        let mut config = Self::default();

        if let Some(domain) = file.base_domain {
            config.base_domain = normalize_domain(&domain);
        }
        if let Some(secs) = file.http_timeout_secs {
            config.http_timeout = StdDuration::from_secs(secs);
        }
        if let Some(secs) = file.kpi_cache_ttl_secs {
            config.kpi_cache_ttl = StdDuration::from_secs(secs);
        }
        if let Some(ms) = file.notification_duration_ms {
            config.notification_duration = StdDuration::from_millis(ms);
        }
        config.layout_cache_dir = file.layout_cache_dir;

        config.validate()?;
        Ok(config)
    }

    /// API root, always ending with `/api/` so relative resource paths join cleanly.
    pub fn api_root(&self) -> String {
        format!("{}/api/", self.base_domain)
    }

    fn validate(&self) -> AppResult<()> {
        if self.base_domain.is_empty() {
            return Err(AppError::config("base domain cannot be empty"));
        }
        if !(self.base_domain.starts_with("http://") || self.base_domain.starts_with("https://")) {
            return Err(AppError::config(format!(
                "base domain must start with http:// or https:// (got {})",
                self.base_domain
            )));
        }
        if self.http_timeout.is_zero() {
            return Err(AppError::config("http timeout must be greater than zero"));
        }
        Ok(())
    }
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('/').to_string()
}
