//! Configuration module.
//!
//! Handles loading, validating, and merging `svg2res.toml`. The file supplies
//! defaults for the export settings; command-line flags override it.
//!
//! ## Config File Location
//!
//! `svg2res.toml` is read from the working directory, or from the path given
//! with `--config`. Without a file the stock defaults apply.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [export]
//! densities = ["mdpi", "hdpi", "xhdpi", "xxhdpi", "xxxhdpi"]
//! format = "WEBP"            # WEBP, PNG or JPEG
//! quality = 100              # 0-100, used by formats that support it
//! directory = "drawable-{}"  # {} is replaced by the density name
//! output = "res.zip"
//!
//! [processing]
//! max_processes = 4          # Max parallel renders (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse, so override just the values you want:
//!
//! ```toml
//! [export]
//! format = "PNG"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::catalog::{self, DensitySelection, ImageFormat};
use crate::naming;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "svg2res.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `svg2res.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Default export settings.
    pub export: ExportConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.export.validate()
    }
}

/// Export defaults applied to every image unless overridden on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Density names to render, in any order.
    pub densities: Vec<String>,
    /// Bitmap output format name.
    pub format: String,
    /// Encoder quality percentage.
    pub quality: u32,
    /// Directory template; `{}` becomes the density name.
    pub directory: String,
    /// Archive file written by `export`.
    pub output: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            densities: DensitySelection::defaults()
                .iter()
                .map(|d| d.name.to_string())
                .collect(),
            format: catalog::default_output_format().name.to_string(),
            quality: 100,
            directory: naming::DEFAULT_DIRECTORY_TEMPLATE.to_string(),
            output: naming::ARCHIVE_FILE_NAME.to_string(),
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.densities.is_empty() {
            return Err(ConfigError::Validation(
                "export.densities must name at least one density".into(),
            ));
        }
        self.density_selection()?;
        self.output_format()?;
        if self.quality > 100 {
            return Err(ConfigError::Validation("export.quality must be 0-100".into()));
        }
        if !naming::is_valid_directory_template(&self.directory) {
            return Err(ConfigError::Validation(format!(
                "export.directory {:?} must contain exactly one {{}} between letters, digits or dashes",
                self.directory
            )));
        }
        if self.output.is_empty() {
            return Err(ConfigError::Validation("export.output must not be empty".into()));
        }
        Ok(())
    }

    /// The configured densities as a catalog-ordered selection.
    pub fn density_selection(&self) -> Result<DensitySelection, ConfigError> {
        DensitySelection::from_names(self.densities.as_slice())
            .map_err(|e| ConfigError::Validation(format!("export.densities: {e}")))
    }

    /// The configured bitmap output format.
    pub fn output_format(&self) -> Result<&'static ImageFormat, ConfigError> {
        catalog::bitmap_format_by_name(&self.format)
            .map_err(|e| ConfigError::Validation(format!("export.format: {e}")))
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel renders.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AppConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `svg2res.toml` from the given directory, falling back to defaults.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let overlay = load_raw_config(&dir.join(CONFIG_FILE_NAME))?;
    resolve_config(stock_defaults_value()?, overlay)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value()?, Some(overlay))
}

/// Returns a fully-commented stock `svg2res.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# svg2res Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags override these values for a single run.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Densities to render. Available: ldpi (x0.75), mdpi (x1), hdpi (x1.5),
# xhdpi (x2), xxhdpi (x3), xxxhdpi (x4). Order does not matter.
densities = ["mdpi", "hdpi", "xhdpi", "xxhdpi", "xxxhdpi"]

# Output format for every image: WEBP, PNG or JPEG.
format = "WEBP"

# Encoding quality (0 = worst, 100 = best) for WEBP and JPEG. PNG ignores it.
quality = 100

# Directory for each density inside res/. {} is replaced by the density name,
# e.g. "drawable-ja-{}-v29" or "mipmap-{}".
directory = "drawable-{}"

# Archive written by the export command.
output = "res.zip"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel renders. Omit to use all CPU cores.
# Values above the core count are clamped down.
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_export_settings() {
        let config = AppConfig::default();
        assert_eq!(
            config.export.densities,
            vec!["mdpi", "hdpi", "xhdpi", "xxhdpi", "xxxhdpi"]
        );
        assert_eq!(config.export.format, "WEBP");
        assert_eq!(config.export.quality, 100);
        assert_eq!(config.export.directory, "drawable-{}");
        assert_eq!(config.export.output, "res.zip");
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[export]
format = "PNG"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.export.format, "PNG");
        // Unspecified values keep defaults
        assert_eq!(config.export.quality, 100);
        assert_eq!(config.export.directory, "drawable-{}");
    }

    #[test]
    fn density_selection_is_catalog_ordered() {
        let config = ExportConfig {
            densities: vec!["xxxhdpi".into(), "ldpi".into()],
            ..ExportConfig::default()
        };
        let names: Vec<&str> = config
            .density_selection()
            .unwrap()
            .iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["ldpi", "xxxhdpi"]);
    }

    #[test]
    fn output_format_resolves_bitmap_formats() {
        let config = ExportConfig {
            format: "JPEG".into(),
            ..ExportConfig::default()
        };
        assert_eq!(config.output_format().unwrap().extension, "jpg");
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn invalid(export: ExportConfig) -> String {
        match export.validate() {
            Err(ConfigError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_empty_densities() {
        let msg = invalid(ExportConfig {
            densities: vec![],
            ..ExportConfig::default()
        });
        assert!(msg.contains("at least one density"));
    }

    #[test]
    fn validate_rejects_unknown_density() {
        let msg = invalid(ExportConfig {
            densities: vec!["mdpi".into(), "tvdpi".into()],
            ..ExportConfig::default()
        });
        assert!(msg.contains("tvdpi"));
    }

    #[test]
    fn validate_rejects_vector_output_format() {
        let msg = invalid(ExportConfig {
            format: "SVG".into(),
            ..ExportConfig::default()
        });
        assert!(msg.starts_with("export.format"));
    }

    #[test]
    fn validate_quality_boundary() {
        let ok = ExportConfig {
            quality: 100,
            ..ExportConfig::default()
        };
        assert!(ok.validate().is_ok());

        let msg = invalid(ExportConfig {
            quality: 101,
            ..ExportConfig::default()
        });
        assert!(msg.contains("0-100"));
    }

    #[test]
    fn validate_rejects_bad_directory_template() {
        for directory in ["drawable", "drawable-{}-{}", "drawable_{}"] {
            let msg = invalid(ExportConfig {
                directory: directory.into(),
                ..ExportConfig::default()
            });
            assert!(msg.starts_with("export.directory"), "{directory}");
        }
    }

    #[test]
    fn validate_rejects_empty_output() {
        invalid(ExportConfig {
            output: String::new(),
            ..ExportConfig::default()
        });
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
[export]
fromat = "PNG"
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let toml = r#"
[images]
quality = 90
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    // =========================================================================
    // Processing
    // =========================================================================

    #[test]
    fn default_processing_config() {
        assert_eq!(ProcessingConfig::default().max_processes, None);
    }

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn parse_processing_config() {
        let toml = r#"
[processing]
max_processes = 4
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.processing.max_processes, Some(4));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"quality = 90"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"quality = 70"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("quality").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
[export]
format = "WEBP"
quality = 100
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[export]
quality = 80
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let export = merged.get("export").unwrap();
        assert_eq!(export.get("format").unwrap().as_str(), Some("WEBP"));
        assert_eq!(export.get("quality").unwrap().as_integer(), Some(80));
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value = toml::from_str(r#"densities = ["mdpi", "hdpi"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"densities = ["ldpi"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        let densities = merged.get("densities").unwrap().as_array().unwrap();
        assert_eq!(densities.len(), 1);
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.export.format, "WEBP");
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
[export]
densities = ["ldpi", "mdpi"]
quality = 75

[processing]
max_processes = 2
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.export.densities, vec!["ldpi", "mdpi"]);
        assert_eq!(config.export.quality, 75);
        assert_eq!(config.export.format, "WEBP");
        assert_eq!(config.processing.max_processes, Some(2));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
[export]
format = "GIF"
"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_file_requires_file() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_file(&tmp.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_file_reads_any_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[export]\ndirectory = \"mipmap-{}\"\n").unwrap();
        let config = load_config_file(&path).unwrap();
        assert_eq!(config.export.directory, "mipmap-{}");
    }

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(&tmp.path().join(CONFIG_FILE_NAME))
            .unwrap()
            .is_none());
    }

    #[test]
    fn resolve_config_with_overlay() {
        let overlay: toml::Value = toml::from_str(
            r#"
[export]
format = "JPEG"
"#,
        )
        .unwrap();
        let config = resolve_config(stock_defaults_value().unwrap(), Some(overlay)).unwrap();
        assert_eq!(config.export.format, "JPEG");
        assert_eq!(config.export.output, "res.zip");
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str(
            r#"
[export]
quality = 200
"#,
        )
        .unwrap();
        let result = resolve_config(stock_defaults_value().unwrap(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(config.export.densities, defaults.export.densities);
        assert_eq!(config.export.format, defaults.export.format);
        assert_eq!(config.export.quality, defaults.export.quality);
        assert_eq!(config.export.directory, defaults.export.directory);
        assert_eq!(config.export.output, defaults.export.output);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        assert!(val.get("export").is_some());
        assert!(val.get("processing").is_some());
    }
}
