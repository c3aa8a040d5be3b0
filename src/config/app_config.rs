use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use super::probe_config::FileConfig;
use crate::insight::client::DEFAULT_MODEL;

const DEFAULT_MONITOR_URL: &str = "https://example.com";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{key} must be a whole number, got `{value}`")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
    #[error("{key} must be an absolute http(s) url, got `{value}`")]
    InvalidUrl { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub url: String,
    pub interval: Duration,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, Default)]
pub struct WebhookSettings {
    pub slack_url: Option<String>,
    pub zapier_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub monitor: MonitorSettings,
    pub openai: OpenAiSettings,
    pub webhooks: WebhookSettings,
    pub server: ServerSettings,
}

impl AppConfig {
    /// Load the application configuration from `.env`, the optional YAML file
    /// named by `CONFIG_FILE`, and the process environment, in increasing
    /// order of precedence.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Ignoring unreadable .env file: {e}");
            }
        }

        let file = match env::var("CONFIG_FILE") {
            Ok(path) if !path.is_empty() => Some(read_file_config(Path::new(&path))?),
            _ => None,
        };

        Self::from_lookup(|key| env::var(key).ok(), file.unwrap_or_default())
    }

    /// Builds the configuration from a variable lookup and a parsed file.
    /// Empty variables count as unset.
    pub fn from_lookup<F>(lookup: F, file: FileConfig) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = var("MONITOR_URL")
            .or(file.monitor.url)
            .unwrap_or_else(|| DEFAULT_MONITOR_URL.to_string());
        validate_url("MONITOR_URL", &url)?;

        let interval_secs = match var("POLL_INTERVAL_SECONDS") {
            Some(value) => parse_secs("POLL_INTERVAL_SECONDS", value)?,
            None => file
                .monitor
                .polling_interval_seconds
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        };
        if interval_secs == 0 {
            return Err(ConfigError::Zero {
                key: "POLL_INTERVAL_SECONDS",
            });
        }

        let timeout_secs = match var("PROBE_TIMEOUT_SECONDS") {
            Some(value) => parse_secs("PROBE_TIMEOUT_SECONDS", value)?,
            None => file
                .monitor
                .timeout_seconds
                .unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Zero {
                key: "PROBE_TIMEOUT_SECONDS",
            });
        }

        let api_key = var("OPENAI_API_KEY").unwrap_or_else(|| {
            tracing::warn!("OPENAI_API_KEY is not set; chat, summary and insight requests will fail");
            String::new()
        });

        let port = match var("SERVER_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                key: "SERVER_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            monitor: MonitorSettings {
                url,
                interval: Duration::from_secs(interval_secs),
                timeout: Duration::from_secs(timeout_secs),
            },
            openai: OpenAiSettings {
                api_key,
                api_base: var("OPENAI_API_BASE"),
                model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            },
            webhooks: WebhookSettings {
                slack_url: var("SLACK_WEBHOOK_URL"),
                zapier_url: var("ZAPIER_WEBHOOK_URL"),
            },
            server: ServerSettings {
                host: var("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
        })
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_yaml::from_str(&config_str)?)
}

fn parse_secs(key: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}

/// Accepts absolute `http` and `https` URLs with a host.
pub fn validate_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        key,
        value: value.to_string(),
    };
    let url = Url::parse(value).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::probe_config::MonitorFileConfig;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]), FileConfig::default()).unwrap();
        assert_eq!(config.monitor.url, "https://example.com");
        assert_eq!(config.monitor.interval, Duration::from_secs(60));
        assert_eq!(config.monitor.timeout, Duration::from_secs(10));
        assert_eq!(config.openai.model, "gpt-4o");
        assert!(config.openai.api_key.is_empty());
        assert!(config.openai.api_base.is_none());
        assert!(config.webhooks.slack_url.is_none());
        assert!(config.webhooks.zapier_url.is_none());
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_environment_values() {
        let config = AppConfig::from_lookup(
            lookup(&[
                ("MONITOR_URL", "https://shop.example"),
                ("POLL_INTERVAL_SECONDS", "15"),
                ("PROBE_TIMEOUT_SECONDS", " 3 "),
                ("OPENAI_API_KEY", "sk-test"),
                ("OPENAI_API_BASE", "http://localhost:11434/v1"),
                ("OPENAI_MODEL", "gpt-4o-mini"),
                ("SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/x"),
                ("ZAPIER_WEBHOOK_URL", ""),
                ("SERVER_PORT", "9000"),
            ]),
            FileConfig::default(),
        )
        .unwrap();

        assert_eq!(config.monitor.url, "https://shop.example");
        assert_eq!(config.monitor.interval, Duration::from_secs(15));
        assert_eq!(config.monitor.timeout, Duration::from_secs(3));
        assert_eq!(config.openai.api_key, "sk-test");
        assert_eq!(config.openai.api_base.as_deref(), Some("http://localhost:11434/v1"));
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(
            config.webhooks.slack_url.as_deref(),
            Some("https://hooks.slack.com/services/x")
        );
        assert!(config.webhooks.zapier_url.is_none());
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = FileConfig {
            monitor: MonitorFileConfig {
                url: Some("https://from-file.example".to_string()),
                polling_interval_seconds: Some(120),
                timeout_seconds: Some(7),
            },
        };
        let config =
            AppConfig::from_lookup(lookup(&[("POLL_INTERVAL_SECONDS", "30")]), file).unwrap();

        assert_eq!(config.monitor.url, "https://from-file.example");
        assert_eq!(config.monitor.interval, Duration::from_secs(30));
        assert_eq!(config.monitor.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_invalid_values() {
        let err = AppConfig::from_lookup(
            lookup(&[("POLL_INTERVAL_SECONDS", "soon")]),
            FileConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                key: "POLL_INTERVAL_SECONDS",
                ..
            }
        ));

        let err = AppConfig::from_lookup(
            lookup(&[("PROBE_TIMEOUT_SECONDS", "0")]),
            FileConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Zero { key: "PROBE_TIMEOUT_SECONDS" }));

        let err =
            AppConfig::from_lookup(lookup(&[("SERVER_PORT", "70000")]), FileConfig::default())
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: "SERVER_PORT", .. }));
    }

    #[test]
    fn test_monitor_url_must_be_http() {
        for bad in ["example.com", "ftp://example.com", "file:///etc/hosts"] {
            let err = AppConfig::from_lookup(lookup(&[("MONITOR_URL", bad)]), FileConfig::default())
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidUrl { .. }), "{bad}");
        }
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_file_config(Path::new("/nonexistent/sitepulse.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
