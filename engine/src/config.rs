use serde::Deserialize;
use std::{env, path::PathBuf};

use flashdeck_types::ui::UiOptions;
use thiserror::Error;

/// Env var that forces the reduced-motion signal on (`1`, `true`, `yes`, `on`).
pub const REDUCED_MOTION_ENV: &str = "FLASHDECK_REDUCED_MOTION";
/// Env var overriding the storage document path.
pub const STORAGE_ENV: &str = "FLASHDECK_STORAGE";

#[derive(Debug, Default, Deserialize)]
pub struct FlashdeckConfig {
    pub app: Option<AppConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs and hide the emoji.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Treat the system as preferring reduced motion.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Storage document path. `${VAR}` references are expanded.
    pub path: Option<String>,
}

pub fn expand_env_vars(value: &str) -> String {
    expand_with(value, |var| env::var(var).ok())
}

fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(at) = rest.find("${") {
        out.push_str(&rest[..at]);
        let after = &rest[at + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[at..]);
            return out;
        };
        let var = &after[..end];
        if var.is_empty() {
            out.push_str("${}");
        } else {
            out.push_str(&lookup(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl FlashdeckConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        Self::load_from(path)
    }

    pub fn load_from(path: PathBuf) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

/// Startup options after merging the config file with env overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    pub ui: UiOptions,
    /// Explicit storage document path. `None` means the default location.
    pub storage_path: Option<PathBuf>,
}

impl LaunchOptions {
    /// Merge `config` with the process environment.
    #[must_use]
    pub fn from_env(config: Option<&FlashdeckConfig>) -> Self {
        Self::resolve(config, |var| env::var(var).ok())
    }

    /// Merge `config` with variables from `lookup`. Env values win.
    #[must_use]
    pub fn resolve(
        config: Option<&FlashdeckConfig>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let app = config.and_then(|c| c.app.as_ref());
        let mut ui = UiOptions {
            ascii_only: app.is_some_and(|a| a.ascii_only),
            high_contrast: app.is_some_and(|a| a.high_contrast),
            reduced_motion: app.is_some_and(|a| a.reduced_motion),
        };
        if lookup(REDUCED_MOTION_ENV).is_some_and(|v| is_truthy(&v)) {
            ui.reduced_motion = true;
        }

        let storage_path = lookup(STORAGE_ENV)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                config
                    .and_then(|c| c.storage.as_ref())
                    .and_then(|s| s.path.as_deref())
                    .map(|raw| expand_with(raw, &lookup))
            })
            .map(PathBuf::from);

        Self { ui, storage_path }
    }
}

/// Per-user data directory (`~/.flashdeck`).
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".flashdeck"))
}

pub fn config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("config.toml"))
}
