//! Global image configuration.
//!
//! Three values shape every compiled image when the caller doesn't override
//! them: the wrapper background color, whether low-quality placeholders are
//! emitted, and whether WebP fallbacks are added to every `<source>` group.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//! background_color = "transparent"
//! lqip = true
//! webp_support = false
//! ```
//!
//! ## Layering
//!
//! Stock defaults are the base layer. Files passed with `--config` are merged
//! on top in order, so later files override earlier ones key by key:
//!
//! ```text
//! stock defaults  ←  site.toml  ←  local.toml
//! ```
//!
//! Without `--config`, `twill-image.toml` in the working directory is used
//! when present. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up by [`load_config`].
pub const CONFIG_FILENAME: &str = "twill-image.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Global defaults consumed by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Fill shown in the wrapper before the image paints (CSS color).
    pub background_color: String,
    /// Emit low-quality placeholders by default.
    pub lqip: bool,
    /// Add a WebP `<source>` after every native-format source.
    pub webp_support: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            background_color: "transparent".to_string(),
            lqip: true,
            webp_support: false,
        }
    }
}

impl ImageConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.background_color.trim().is_empty() {
            return Err(ConfigError::Validation(
                "background_color must not be empty (use \"transparent\" for none)".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ImageConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn read_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Load `twill-image.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    read_raw_config(&config_path).map(Some)
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<ImageConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: ImageConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `twill-image.toml` in the given directory, falling back
/// to stock defaults when the file is absent.
pub fn load_config(dir: &Path) -> Result<ImageConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Load and layer explicit config files. Every file must exist.
pub fn load_config_files(paths: &[PathBuf]) -> Result<ImageConfig, ConfigError> {
    let overlays = paths
        .iter()
        .map(|p| {
            tracing::debug!(path = %p.display(), "loading config layer");
            read_raw_config(p)
        })
        .collect::<Result<Vec<_>, _>>()?;
    resolve_config(stock_defaults_value(), overlays)
}

/// Returns a fully-commented stock `twill-image.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# twill-image configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Per-image options passed at compile time always win over these.
# Unknown keys will cause an error.

# Wrapper fill shown before the image paints. Any CSS color.
background_color = "transparent"

# Emit a low-quality placeholder (LQIP) while the full image loads.
lqip = true

# Add a WebP <source> after every native-format <source>.
webp_support = false
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ImageConfig::default();
        assert_eq!(config.background_color, "transparent");
        assert!(config.lqip);
        assert!(!config.webp_support);
    }

    #[test]
    fn parse_partial_config() {
        let config: ImageConfig = toml::from_str("webp_support = true").unwrap();
        assert!(config.webp_support);
        // Default values preserved
        assert!(config.lqip);
        assert_eq!(config.background_color, "transparent");
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<ImageConfig, _> = toml::from_str("webp = true");
        assert!(result.is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, ImageConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r##"
background_color = "#e3e3e3"
lqip = false
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.background_color, "#e3e3e3");
        assert!(!config.lqip);
        // Unspecified values should be defaults
        assert!(!config.webp_support);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), r#"background_color = " ""#).unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_files_layers_in_order() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site.toml");
        let local = tmp.path().join("local.toml");
        fs::write(&site, "webp_support = true\nbackground_color = \"#fff\"\n").unwrap();
        fs::write(&local, "background_color = \"#000\"\n").unwrap();

        let config = load_config_files(&[site, local]).unwrap();
        assert!(config.webp_support);
        assert_eq!(config.background_color, "#000");
    }

    #[test]
    fn load_config_files_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_files(&[tmp.path().join("nope.toml")]);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("lqip = true").unwrap();
        let overlay: toml::Value = toml::from_str("lqip = false").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("lqip").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let merged = merge_toml(
            stock_defaults_value(),
            toml::from_str("webp_support = true").unwrap(),
        );
        assert_eq!(merged.get("webp_support").unwrap().as_bool(), Some(true));
        assert_eq!(
            merged.get("background_color").unwrap().as_str(),
            Some("transparent")
        );
    }

    #[test]
    fn resolve_config_with_no_overlay() {
        let config = resolve_config(stock_defaults_value(), None::<toml::Value>).unwrap();
        assert_eq!(config, ImageConfig::default());
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: ImageConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ImageConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_keys() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        assert!(val.get("background_color").is_some());
        assert!(val.get("lqip").is_some());
        assert!(val.get("webp_support").is_some());
    }
}
