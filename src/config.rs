//! Tool configuration.
//!
//! Handles loading and validating `config.toml`. The config file saves the
//! stable parts of a user's setup — where templates live, where output goes,
//! the usual event time — so day-to-day invocations only carry the fields
//! that actually change. Command-line flags always win over config values.
//!
//! ## Config File Location
//!
//! `~/.config/bannersmith/config.toml` by default, overridable with the
//! global `--config` flag.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # template_directory = "/home/me/banners/templates"
//! # output_directory = "/home/me/banners/out"
//!
//! default_time = "6-8PM"        # Used when --time is not given
//!
//! [engine]
//! # binary = "gimp-console"     # Override GIMP binary discovery
//! timeout_secs = 60             # Per-invocation GIMP timeout
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `config.toml`.
///
/// All fields have defaults; user config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Directory scanned for `.xcf` templates when none is given on the CLI.
    pub template_directory: Option<PathBuf>,
    /// Directory generated artifacts are written to.
    pub output_directory: Option<PathBuf>,
    /// Time field value used when `--time` is omitted.
    pub default_time: String,
    /// Render engine settings.
    pub engine: EngineConfig,
}

fn default_time() -> String {
    "6-8PM".to_string()
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            template_directory: None,
            output_directory: None,
            default_time: default_time(),
            engine: EngineConfig::default(),
        }
    }
}

/// Render engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// GIMP binary to run. When absent, `gimp-console` then `gimp` are
    /// searched on `PATH`.
    pub binary: Option<PathBuf>,
    /// Seconds before a GIMP invocation is killed.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: None,
            timeout_secs: crate::render::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ToolConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "engine.timeout_secs must be at least 1".into(),
            ));
        }
        if self.default_time.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_time must not be blank".into(),
            ));
        }
        Ok(())
    }
}

/// Load and validate a config file.
pub fn load(path: &Path) -> Result<ToolConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ToolConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load the config at `path` if given, otherwise the default location if it
/// exists, otherwise stock defaults.
///
/// An explicitly passed path that fails to load is an error; a missing file
/// at the *default* location is not — most users never create one.
pub fn load_or_default(path: Option<&Path>) -> Result<ToolConfig, ConfigError> {
    match path {
        Some(path) => load(path),
        None => match default_config_path() {
            Some(path) if path.exists() => load(&path),
            _ => Ok(ToolConfig::default()),
        },
    }
}

/// `~/.config/bannersmith/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("bannersmith")
            .join("config.toml"),
    )
}

/// A stock `config.toml` with every option documented, for `gen-config`.
pub fn stock_config_toml() -> String {
    concat!(
        "# bannersmith configuration\n",
        "#\n",
        "# All options are optional. Command-line flags override these values.\n",
        "\n",
        "# Directory scanned for .xcf templates when none is given on the CLI.\n",
        "# template_directory = \"/home/me/banners/templates\"\n",
        "\n",
        "# Directory generated artifacts are written to.\n",
        "# output_directory = \"/home/me/banners/out\"\n",
        "\n",
        "# Time field value used when --time is omitted.\n",
        "default_time = \"6-8PM\"\n",
        "\n",
        "[engine]\n",
        "# GIMP binary to run. When absent, gimp-console then gimp are searched\n",
        "# on PATH.\n",
        "# binary = \"gimp-console\"\n",
        "\n",
        "# Seconds before a GIMP invocation is killed.\n",
        "timeout_secs = 60\n",
    )
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = ToolConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_time, "6-8PM");
        assert_eq!(config.engine.timeout_secs, 60);
    }

    #[test]
    fn sparse_config_overrides_only_named_values() {
        let config: ToolConfig = toml::from_str(
            r#"
            template_directory = "/templates"

            [engine]
            timeout_secs = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.template_directory, Some(PathBuf::from("/templates")));
        assert_eq!(config.output_directory, None);
        assert_eq!(config.default_time, "6-8PM");
        assert_eq!(config.engine.timeout_secs, 120);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<ToolConfig, _> = toml::from_str("template_dir = \"/oops\"");
        assert!(result.is_err());
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let config: ToolConfig = toml::from_str("[engine]\ntimeout_secs = 0").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn blank_default_time_fails_validation() {
        let config: ToolConfig = toml::from_str("default_time = \"  \"").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_reads_and_validates_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "default_time = \"7PM\"").unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.default_time, "7PM");
    }

    #[test]
    fn load_missing_explicit_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(matches!(
            load_or_default(Some(&missing)),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn stock_config_parses_and_matches_defaults() {
        let config: ToolConfig = toml::from_str(&stock_config_toml()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_time, ToolConfig::default().default_time);
        assert_eq!(
            config.engine.timeout_secs,
            ToolConfig::default().engine.timeout_secs
        );
    }
}
