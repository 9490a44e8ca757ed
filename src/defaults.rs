use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

fn default_max_total_attempts() -> u32 {
    10
}

fn default_response_timeout_ms() -> u64 {
    15_000
}

/// Process-wide fallback values consulted by `RetryConfigBuilder::build`
/// for fields the caller never staged (optional file
/// `~/.config/retrymap/defaults.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryDefaults {
    /// Maximum number of total attempts, including the first.
    #[serde(default = "default_max_total_attempts")]
    pub max_total_attempts: u32,
    /// Response timeout per attempt in milliseconds. 0 disables the timeout.
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,
}

impl Default for RetryDefaults {
    fn default() -> Self {
        Self {
            max_total_attempts: default_max_total_attempts(),
            response_timeout_ms: default_response_timeout_ms(),
        }
    }
}

impl RetryDefaults {
    /// The per-attempt response timeout as a `Duration`.
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// Parse from TOML text; missing keys fall back to the built-ins.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid retry defaults TOML")
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize retry defaults")
    }

    /// Replace values that would make every build fail with the built-ins.
    fn validated(self) -> Self {
        if self.max_total_attempts == 0 {
            tracing::warn!(
                "defaults file sets max_total_attempts = 0, using built-in {}",
                default_max_total_attempts()
            );
            return Self {
                max_total_attempts: default_max_total_attempts(),
                ..self
            };
        }
        self
    }
}

pub fn defaults_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("retrymap")?;
    Ok(xdg_dirs.place_config_file("defaults.toml")?)
}

/// Load defaults from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RetryDefaults> {
    load_or_init_at(&defaults_path()?)
}

/// Same as [`load_or_init`], against an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<RetryDefaults> {
    if !path.exists() {
        let defaults = RetryDefaults::default();
        let toml = defaults.to_toml_string()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default retry defaults at {}", path.display());
        return Ok(defaults);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read retry defaults at {}", path.display()))?;
    RetryDefaults::from_toml_str(&data)
}

/// The defaults used by every builder in this process, loaded once.
///
/// Loading failures are not fatal: the built-ins apply and a warning is
/// logged, so `build()` never fails through this path.
pub fn process_defaults() -> &'static RetryDefaults {
    static PROCESS_DEFAULTS: OnceLock<RetryDefaults> = OnceLock::new();
    PROCESS_DEFAULTS.get_or_init(|| {
        load_or_init()
            .unwrap_or_else(|e| {
                tracing::warn!("failed to load retry defaults, using built-ins: {e:#}");
                RetryDefaults::default()
            })
            .validated()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let d = RetryDefaults::default();
        assert_eq!(d.max_total_attempts, 10);
        assert_eq!(d.response_timeout_ms, 15_000);
        assert_eq!(d.response_timeout(), Duration::from_millis(15_000));
    }

    #[test]
    fn toml_roundtrip() {
        let d = RetryDefaults::default();
        let toml = d.to_toml_string().unwrap();
        let parsed = RetryDefaults::from_toml_str(&toml).unwrap();
        assert_eq!(parsed, d);
    }

    #[test]
    fn partial_toml_fills_missing_keys() {
        let d = RetryDefaults::from_toml_str("max_total_attempts = 3").unwrap();
        assert_eq!(d.max_total_attempts, 3);
        assert_eq!(d.response_timeout_ms, 15_000);
    }

    #[test]
    fn custom_values() {
        let toml = r#"
            max_total_attempts = 4
            response_timeout_ms = 2500
        "#;
        let d = RetryDefaults::from_toml_str(toml).unwrap();
        assert_eq!(d.max_total_attempts, 4);
        assert_eq!(d.response_timeout_ms, 2500);
    }

    #[test]
    fn load_or_init_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.toml");

        let first = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(first, RetryDefaults::default());

        // Second load parses the file we just wrote.
        let reloaded = load_or_init_at(&path).unwrap();
        assert_eq!(reloaded, first);
    }

    #[test]
    fn zero_attempts_in_file_falls_back_to_built_in() {
        let d = RetryDefaults::from_toml_str("max_total_attempts = 0")
            .unwrap()
            .validated();
        assert_eq!(d.max_total_attempts, 10);
    }
}
