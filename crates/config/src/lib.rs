//! Configuration loading, layering, and persistence for ctxroute.
//!
//! Effective configuration is built in layers:
//! built-in defaults → `~/.ctxroute/config.toml` → an explicit `--config`
//! file → environment variable overrides. Each file layer only replaces the
//! fields it actually sets.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Name of the global config file inside [`AppConfig::config_dir`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Name of the decision log file inside [`AppConfig::config_dir`].
pub const LOG_FILE_NAME: &str = "log.jsonl";

const DEFAULT_BASE_URL: &str = "https://api.moonshot.ai/v1";
const DEFAULT_MODEL: &str = "kimi-k2.5";

/// Fallback credential variable, consulted last.
pub const API_KEY_ENV: &str = "CTXROUTE_API_KEY";

/// The root configuration structure.
///
/// Maps directly to `~/.ctxroute/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Which completion API shape to speak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStyle {
    /// `POST /chat/completions`
    #[default]
    ChatCompletions,
    /// `POST /responses`
    Responses,
}

impl ApiStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiStyle::ChatCompletions => "chat_completions",
            ApiStyle::Responses => "responses",
        }
    }
}

impl std::fmt::Display for ApiStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "chat" | "chat_completions" => Ok(ApiStyle::ChatCompletions),
            "responses" | "responses_api" => Ok(ApiStyle::Responses),
            other => Err(ConfigError::InvalidValue {
                key: "api-style".into(),
                reason: format!("'{other}' is not one of: chat_completions, responses"),
            }),
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the OpenAI-compatible API (without the endpoint path)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Read the API key from this environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// API key stored directly in the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default)]
    pub api_style: ApiStyle,

    /// Transport-level request deadline. `None` leaves it to the HTTP client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_model() -> String {
    DEFAULT_MODEL.into()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: None,
            api_key: None,
            api_style: ApiStyle::default(),
            timeout_secs: None,
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &redact(&self.api_key))
            .field("api_style", &self.api_style)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// A partial configuration, as found in one file.
///
/// Every field is optional so that a layer only overrides what it sets.
/// This is also what `ctxroute config set` edits and writes back, so the
/// global file never gets defaults baked into it.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverlay {
    #[serde(default)]
    pub provider: ProviderOverlay,
}

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderOverlay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_style: Option<ApiStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for ConfigOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigOverlay")
            .field("provider", &self.provider)
            .finish()
    }
}

impl std::fmt::Debug for ProviderOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderOverlay")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &redact(&self.api_key))
            .field("api_style", &self.api_style)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// `Some(s)` only when `s` has non-whitespace content.
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

impl ConfigOverlay {
    /// Read an overlay from disk. A missing file yields `Ok(None)`.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file at {}, skipping", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let overlay = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Some(overlay))
    }

    /// Write this overlay to `path`, creating parent directories.
    ///
    /// On Unix the file is created with mode 0600 since it may hold a key.
    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |reason: String| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        use std::io::Write;
        let mut file = options.open(path).map_err(|e| write_err(e.to_string()))?;
        file.write_all(content.as_bytes())
            .map_err(|e| write_err(e.to_string()))?;
        Ok(())
    }

    /// Set one user-facing key (`api-key`, `model`, ...) to `value`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let p = &mut self.provider;
        match key.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "api-key" => p.api_key = Some(value.to_string()),
            "api-key-env" => p.api_key_env = Some(value.to_string()),
            "model" => p.model = Some(value.to_string()),
            "base-url" => p.base_url = Some(value.to_string()),
            "api-style" => p.api_style = Some(value.parse()?),
            "timeout" | "timeout-secs" => {
                let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "timeout".into(),
                    reason: format!("'{value}' is not a whole number of seconds"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "timeout".into(),
                        reason: "must be greater than zero".into(),
                    });
                }
                p.timeout_secs = Some(secs);
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load the effective configuration.
    ///
    /// Layers, lowest priority first: defaults, the global file, `explicit`
    /// (if given), then `CTXROUTE_BASE_URL` / `CTXROUTE_MODEL`.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(overlay) = ConfigOverlay::read(&Self::global_config_path())? {
            config.apply(&overlay);
        }

        if let Some(path) = explicit {
            match ConfigOverlay::read(path)? {
                Some(overlay) => config.apply(&overlay),
                None => tracing::warn!("Config file {} does not exist, ignoring", path.display()),
            }
        }

        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load defaults overlaid with a single file (no global file, no env).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(overlay) = ConfigOverlay::read(path)? {
            config.apply(&overlay);
        }
        config.validate()?;
        Ok(config)
    }

    /// Merge the non-empty fields of `overlay` into this config.
    pub fn apply(&mut self, overlay: &ConfigOverlay) {
        let o = &overlay.provider;
        let p = &mut self.provider;

        if let Some(v) = non_empty(&o.base_url) {
            p.base_url = v;
        }
        if let Some(v) = non_empty(&o.model) {
            p.model = v;
        }
        if let Some(v) = non_empty(&o.api_key_env) {
            p.api_key_env = Some(v);
        }
        if let Some(v) = non_empty(&o.api_key) {
            p.api_key = Some(v);
        }
        if let Some(style) = o.api_style {
            p.api_style = style;
        }
        if let Some(secs) = o.timeout_secs {
            p.timeout_secs = Some(secs);
        }
    }

    /// Apply `CTXROUTE_BASE_URL` and `CTXROUTE_MODEL` via `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = non_empty(&lookup("CTXROUTE_BASE_URL")) {
            self.provider.base_url = url;
        }
        if let Some(model) = non_empty(&lookup("CTXROUTE_MODEL")) {
            self.provider.model = model;
        }
    }

    /// Resolve the API key from the process environment and config.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Resolve the API key: the variable named by `api_key_env`, then the
    /// stored `api_key`, then `CTXROUTE_API_KEY`.
    pub fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        if let Some(var) = non_empty(&self.provider.api_key_env)
            && let Some(key) = non_empty(&lookup(&var))
        {
            return Some(key);
        }
        non_empty(&self.provider.api_key).or_else(|| non_empty(&lookup(API_KEY_ENV)))
    }

    /// Get the configuration directory path (`~/.ctxroute`).
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ctxroute")
    }

    /// `~/.ctxroute/config.toml`
    pub fn global_config_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }

    /// `~/.ctxroute/log.jsonl`
    pub fn log_path() -> PathBuf {
        Self::config_dir().join(LOG_FILE_NAME)
    }

    /// Read only the global file, for editing by `ctxroute config set`.
    pub fn load_global_overlay() -> Result<ConfigOverlay, ConfigError> {
        Ok(ConfigOverlay::read(&Self::global_config_path())?.unwrap_or_default())
    }

    /// Persist `overlay` as the global file.
    pub fn save_global_overlay(overlay: &ConfigOverlay) -> Result<(), ConfigError> {
        overlay.write(&Self::global_config_path())
    }

    /// Delete the global file. A missing file is not an error.
    pub fn reset_global() -> Result<(), ConfigError> {
        let path = Self::global_config_path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfigError::WriteError {
                path,
                reason: e.to_string(),
            }),
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.provider.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "base_url must start with http:// or https:// (got '{url}')"
            )));
        }

        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.provider.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Unknown config key: {0} (valid keys: api-key, api-key-env, model, base-url, api-style, timeout)")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}
