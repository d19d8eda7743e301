use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use snooze::ClientConfig;
use std::{fs, path::Path, path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub client: ClientConfig,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

impl From<AppConfig> for RuntimeConfig {
    fn from(parsed: AppConfig) -> Self {
        let mut client = ClientConfig::default();
        if let Some(url) = parsed.api_url {
            client.base_url = url;
        }
        if let Some(secs) = parsed.timeout_secs {
            client.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parsed.connect_timeout_secs {
            client.connect_timeout = Duration::from_secs(secs);
        }
        RuntimeConfig {
            client,
            open_command: parsed.open_command,
            header: parsed.header,
        }
    }
}

/// Resolve configuration: `--config` file, else the default config path,
/// else built-in defaults. `--api` wins over any configured `api_url`.
pub fn load(config_override: Option<String>, api_override: Option<String>) -> Result<RuntimeConfig> {
    let parsed = if let Some(path_str) = config_override {
        let p = PathBuf::from(&path_str);
        if !p.is_file() {
            bail!("config file not found: {}", path_str);
        }
        read_config(&p)?
    } else {
        match default_config_path() {
            Some(path) if path.is_file() => read_config(&path)?,
            _ => AppConfig::default(),
        }
    };

    let mut cfg = RuntimeConfig::from(parsed);
    if let Some(url) = api_override {
        cfg.client.base_url = url;
    }
    Ok(cfg)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&txt).with_context(|| format!("failed to parse toml: {}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    snooze::config_dir().map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_client_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            api_url = "http://localhost:3000"
            timeout_secs = 3
            header = "snooze"
            "#,
        )
        .unwrap();
        let cfg = RuntimeConfig::from(parsed);
        assert_eq!(cfg.client.base_url, "http://localhost:3000");
        assert_eq!(cfg.client.timeout, Duration::from_secs(3));
        assert_eq!(cfg.client.connect_timeout, ClientConfig::default().connect_timeout);
        assert_eq!(cfg.header.as_deref(), Some("snooze"));
        assert!(cfg.open_command.is_none());
    }

    #[test]
    fn explicit_config_file_and_api_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = \"http://from-file\"\nopen_command = \"firefox\"\n").unwrap();

        let cfg = load(Some(path.display().to_string()), None).unwrap();
        assert_eq!(cfg.client.base_url, "http://from-file");
        assert_eq!(cfg.open_command.as_deref(), Some("firefox"));

        let cfg = load(Some(path.display().to_string()), Some("http://from-flag".into())).unwrap();
        assert_eq!(cfg.client.base_url, "http://from-flag");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        assert!(load(Some("/definitely/not/here.toml".into()), None).is_err());
    }
}
