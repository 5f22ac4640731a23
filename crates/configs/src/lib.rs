use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub datastore: DataStoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Drain window after a shutdown signal, e.g. `"5s"`, `"500ms"`, `"1m30s"`.
    #[serde(with = "humantime_serde", default = "default_graceful_shutdown_timeout")]
    pub graceful_shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: None,
            graceful_shutdown_timeout: default_graceful_shutdown_timeout(),
        }
    }
}

/// Selects the `DataStore` backend by name.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DataStoreConfig {
    #[serde(default = "default_datastore_type", rename = "type")]
    pub kind: String,
}

impl Default for DataStoreConfig {
    fn default() -> Self {
        Self { kind: default_datastore_type() }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8080 }
fn default_graceful_shutdown_timeout() -> Duration { Duration::from_secs(5) }
fn default_datastore_type() -> String { "syncmap".into() }

/// Load `CONFIG_PATH` (default `config.toml`). A missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    match std::fs::read_to_string(&path) {
        Ok(content) => parse(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("cannot read {path}: {e}")),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply environment overrides. `lookup` is injectable so tests need not touch the process env.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("SERVER_PORT is not a valid port: {port}"))?;
        }
        if let Some(raw) = lookup("SERVER_GRACEFULSHUTDOWNTIMEOUT") {
            self.server.graceful_shutdown_timeout = parse_duration(&raw)
                .map_err(|e| anyhow!("SERVER_GRACEFULSHUTDOWNTIMEOUT is not a duration: {raw}: {e}"))?;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            let threads: usize = threads
                .trim()
                .parse()
                .map_err(|_| anyhow!("TOKIO_WORKER_THREADS is not a thread count: {threads}"))?;
            self.server.worker_threads = Some(threads);
        }
        if let Some(kind) = lookup("DATASTORE_TYPE") {
            self.datastore.kind = kind;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.log.format = match format.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" | "" => LogFormat::Compact,
                other => return Err(anyhow!("LOG_FORMAT must be compact or json, got {other}")),
            };
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.datastore.validate()?;
        Ok(())
    }
}

/// Humantime duration (`500ms`, `1m30s`). A bare integer is read as seconds.
fn parse_duration(raw: &str) -> std::result::Result<Duration, humantime::DurationError> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(raw)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.graceful_shutdown_timeout.is_zero() {
            return Err(anyhow!("server.graceful_shutdown_timeout must be positive"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

}

impl DataStoreConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.kind.trim().is_empty() {
            return Err(anyhow!("datastore.type must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.graceful_shutdown_timeout, Duration::from_secs(5));
        assert_eq!(cfg.datastore.kind, "syncmap");
        assert_eq!(cfg.log.format, LogFormat::Compact);
    }

    #[test]
    fn parses_partial_toml() {
        let cfg = parse(
            r#"
            [server]
            port = 9090

            [datastore]
            type = "memory"

            [log]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.datastore.kind, "memory");
        assert_eq!(cfg.log.format, LogFormat::Json);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[
            ("SERVER_PORT", "3000"),
            ("SERVER_GRACEFULSHUTDOWNTIMEOUT", "10s"),
            ("DATASTORE_TYPE", "memory"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.graceful_shutdown_timeout, Duration::from_secs(10));
        assert_eq!(cfg.datastore.kind, "memory");
        assert_eq!(cfg.log.format, LogFormat::Json);
    }

    #[test]
    fn bad_env_values_are_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(env(&[("SERVER_PORT", "http")])).is_err());
        assert!(cfg.apply_env(env(&[("LOG_FORMAT", "xml")])).is_err());
        assert!(cfg.apply_env(env(&[("SERVER_GRACEFULSHUTDOWNTIMEOUT", "soon")])).is_err());
        assert!(cfg.apply_env(env(&[("TOKIO_WORKER_THREADS", "many")])).is_err());
        assert_eq!(cfg.server.worker_threads, None);
    }

    #[test]
    fn shutdown_timeout_accepts_go_style_durations() {
        for (raw, want) in [
            ("500ms", Duration::from_millis(500)),
            ("1m", Duration::from_secs(60)),
            ("1m30s", Duration::from_secs(90)),
            ("10", Duration::from_secs(10)),
        ] {
            let mut cfg = AppConfig::default();
            cfg.apply_env(env(&[("SERVER_GRACEFULSHUTDOWNTIMEOUT", raw)])).unwrap();
            assert_eq!(cfg.server.graceful_shutdown_timeout, want, "{raw}");
        }
    }

    #[test]
    fn worker_threads_override() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[("TOKIO_WORKER_THREADS", "8")])).unwrap();
        assert_eq!(cfg.server.worker_threads, Some(8));
    }

    #[test]
    fn toml_shutdown_timeout_is_humantime() {
        let cfg = parse("[server]\ngraceful_shutdown_timeout = \"750ms\"\n").unwrap();
        assert_eq!(cfg.server.graceful_shutdown_timeout, Duration::from_millis(750));
        assert!(parse("[server]\ngraceful_shutdown_timeout = \"later\"\n").is_err());
    }

    #[test]
    fn validation_rejects_zero_port_and_empty_store() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.datastore.kind = "  ".into();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.server.host = String::new();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:8080");
    }
}
