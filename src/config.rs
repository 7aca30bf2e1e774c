use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "PROTECT";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub protect_url: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protect_url: String::new(),
            api_token: String::new(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Reads the config file (if any) and applies `PROTECT_*` environment overrides.
    pub fn load() -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let path = discover_config_path(&env, dirs::config_dir());
        Self::load_from(path.as_deref(), env)
    }

    pub fn load_from(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                if raw.trim().is_empty() {
                    Self::default()
                } else {
                    serde_yaml::from_str(&raw).with_context(|| {
                        format!("failed to parse config file {}", path.display())
                    })?
                }
            }
            None => Self::default(),
        };

        let lookup = |key: &str| {
            env(&format!("{ENV_PREFIX}_{}", key.to_ascii_uppercase()))
                .filter(|value| !value.is_empty())
        };
        if let Some(url) = lookup("protect_url") {
            config.protect_url = url;
        }
        if let Some(token) = lookup("api_token") {
            config.api_token = token;
        }
        if let Some(level) = lookup("log_level") {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Flag values win over file and environment, but only when non-empty.
    pub fn apply_overrides(
        &mut self,
        url: Option<&str>,
        token: Option<&str>,
        log_level: Option<&str>,
    ) {
        let pick = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);
        if let Some(url) = pick(url) {
            self.protect_url = url;
        }
        if let Some(token) = pick(token) {
            self.api_token = token;
        }
        if let Some(level) = pick(log_level) {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.protect_url.is_empty() {
            anyhow::bail!("protect_url is required");
        }
        if self.api_token.is_empty() {
            anyhow::bail!("api_token is required");
        }
        Ok(())
    }

    /// `none` and anything unrecognised silence logging entirely.
    pub fn tracing_directive(&self) -> &'static str {
        match self.log_level.as_str() {
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => "off",
        }
    }
}

fn default_log_level() -> String {
    "none".to_string()
}

/// `os_config_dir` is the platform config root, e.g. `~/Library/Application Support` on macOS.
fn discover_config_path(
    env: &impl Fn(&str) -> Option<String>,
    os_config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = env("PROTECT_CONFIG")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }

    let mut candidates = Vec::new();
    if let Some(xdg) = env("XDG_CONFIG_HOME").filter(|dir| !dir.is_empty()) {
        candidates.push(PathBuf::from(xdg).join("protect/config.yaml"));
    }
    if let Some(home) = env("HOME") {
        candidates.push(PathBuf::from(&home).join(".config/protect/config.yaml"));
        candidates.push(PathBuf::from(&home).join(".config/protect/config.yml"));
    }
    if let Some(dir) = os_config_dir {
        candidates.push(dir.join("protect/config.yaml"));
        candidates.push(dir.join("protect/config.yml"));
    }

    candidates.into_iter().find(|candidate| candidate.exists())
}
