//! Configuration for the Curate lifecycle tooling.
//!
//! Layering: defaults, then a TOML file, then `CURATE_*` environment
//! variables, then explicit `key=value` overrides. Call `validate` last.

use crate::{CurateError, Result, UserId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CURATE_";

/// How visibility is fanned out to file members after deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanOutMode {
    /// Copy onto members within the deactivating call
    #[default]
    Inline,
    /// Enqueue a `CopyVisibility` task
    Queued,
}

/// Object store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one JSON document per object
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./repository"),
        }
    }
}

/// Authorization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationConfig {
    /// Groups whose members manage embargoes and leases repository-wide
    pub admin_groups: Vec<String>,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            admin_groups: vec!["admin".to_string()],
        }
    }
}

/// Lifecycle policy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Copy the released visibility onto file members during sweeps
    pub copy_visibility_to_files: bool,
    /// Inline or queued fan-out
    pub fan_out: FanOutMode,
}

/// Notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Inbox that receives sweep summaries
    pub recipient: UserId,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            recipient: UserId::new("admin"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurateConfig {
    /// Object store
    pub store: StoreConfig,
    /// Authorization
    pub authorization: AuthorizationConfig,
    /// Lifecycle policy
    pub lifecycle: LifecycleConfig,
    /// Notifications
    pub notifications: NotificationConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl CurateConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| CurateError::config(format!("invalid TOML: {e}")))
    }

    /// Load configuration from a file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CurateError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Load from `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "config file absent, using defaults");
            Ok(Self::default())
        }
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CurateError::serialization(e.to_string()))
    }

    /// Merge with process environment variables.
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Merge with `CURATE_*` pairs, e.g. `CURATE_STORE_ROOT`.
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(rest) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let dotted = match rest {
                "STORE_ROOT" => "store.root",
                "ADMIN_GROUPS" => "authorization.admin_groups",
                "COPY_VISIBILITY" => "lifecycle.copy_visibility_to_files",
                "FAN_OUT" => "lifecycle.fan_out",
                "NOTIFY_RECIPIENT" => "notifications.recipient",
                "LOG_LEVEL" => "logging.level",
                _ => continue,
            };
            self.set_from_string(dotted, &value)?;
        }
        Ok(())
    }

    /// Set a configuration value from a dotted key (for CLI overrides).
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "store.root" => self.store.root = PathBuf::from(value),
            "authorization.admin_groups" => {
                self.authorization.admin_groups = value
                    .split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "lifecycle.copy_visibility_to_files" => {
                self.lifecycle.copy_visibility_to_files = parse_bool(key, value)?;
            }
            "lifecycle.fan_out" => {
                self.lifecycle.fan_out = match value.trim().to_ascii_lowercase().as_str() {
                    "inline" => FanOutMode::Inline,
                    "queued" => FanOutMode::Queued,
                    other => {
                        return Err(CurateError::config(format!(
                            "lifecycle.fan_out must be 'inline' or 'queued', got '{other}'"
                        )))
                    }
                };
            }
            "notifications.recipient" => self.notifications.recipient = UserId::new(value.trim()),
            "logging.level" => self.logging.level = value.trim().to_string(),
            other => {
                return Err(CurateError::config(format!(
                    "unknown configuration key '{other}'"
                )))
            }
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.store.root.as_os_str().is_empty() {
            return Err(CurateError::config("store.root is required"));
        }
        if self.authorization.admin_groups.is_empty() {
            return Err(CurateError::config(
                "authorization.admin_groups must name at least one group",
            ));
        }
        if self.notifications.recipient.as_str().is_empty() {
            return Err(CurateError::config("notifications.recipient is required"));
        }
        if self.logging.level.trim().is_empty() {
            return Err(CurateError::config("logging.level is required"));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CurateError::config(format!(
            "{key} expects a boolean, got '{other}'"
        ))),
    }
}
