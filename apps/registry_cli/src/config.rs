use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "registry.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:3333".into(),
            request_timeout_secs: 10,
            log_level: "warn".into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Keys accepted in `registry.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<toml::Value>,
    log_level: Option<String>,
}

/// Defaults, then the config file, then the environment, then `--server-url`.
///
/// An explicit `config_path` must exist; the default `registry.toml` is
/// optional.
pub fn load_settings(
    config_path: Option<&Path>,
    server_url_flag: Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if required => {
            return Err(err).with_context(|| format!("cannot read config file '{}'", path.display()))
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());

    if let Some(url) = server_url_flag {
        settings.server_url = url;
    }
    settings.server_url = normalize_server_url(&settings.server_url)?;

    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs.as_ref().and_then(parse_timeout) {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.log_level {
        settings.log_level = v;
    }
    Ok(())
}

fn parse_timeout(value: &toml::Value) -> Option<u64> {
    match value {
        toml::Value::Integer(secs) => u64::try_from(*secs).ok(),
        toml::Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("REGISTRY_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = lookup("APP__LOG_LEVEL") {
        settings.log_level = v;
    }
}

pub fn normalize_server_url(raw: &str) -> anyhow::Result<String> {
    let url = raw.trim().trim_end_matches('/');
    let lower = url.to_ascii_lowercase();
    let Some(rest) = lower
        .strip_prefix("http://")
        .or_else(|| lower.strip_prefix("https://"))
    else {
        bail!("server url '{raw}' must start with http:// or https://");
    };
    if rest.is_empty() || rest.starts_with('/') {
        bail!("server url '{raw}' has no host");
    }
    Ok(url.to_string())
}
