use serde::Deserialize;

/// Optional YAML configuration file, named by the `CONFIG_FILE` environment
/// variable. Environment variables take precedence over its values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub monitor: MonitorFileConfig,
}

/// The monitored site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorFileConfig {
    /// The URL of the site to be monitored.
    pub url: Option<String>,

    /// Seconds to wait between two probes.
    pub polling_interval_seconds: Option<u64>,

    /// Seconds before a probe request is abandoned.
    pub timeout_seconds: Option<u64>,
}
