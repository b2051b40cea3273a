use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::data::aggregate::TOP_N_RANGE;
use crate::data::assemble::{GeneratorParams, REGIONS_RANGE, ROW_COUNT_RANGE};
use crate::data::export::DEFAULT_EXPORT_FILE_NAME;

pub const APP_NAME: &str = "solar-dashboard";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// ---------------------------------------------------------------------------
// Config file location
// ---------------------------------------------------------------------------

/// Locates and writes the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Use an explicit config file (`--config`, tests).
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// `config.toml` for `app_name` under the platform config root.
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?
            .join(app_name);
        Ok(Self::with_path(config_dir.join(CONFIG_FILE_NAME)))
    }

    /// The file named by `--config`, else the default location.
    pub fn for_args(args: &Args) -> Result<Self> {
        match &args.config {
            Some(path) => Ok(Self::with_path(path.clone())),
            None => Self::new(APP_NAME),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Write the default configuration; refuses to overwrite unless `force`.
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let path = &self.config_path;
        if path.exists() && !force {
            bail!(
                "Config file already exists at {}. Use --force to overwrite.",
                path.display()
            );
        }
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        std::fs::write(path, AppConfig::default().to_toml()?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path.clone())
    }
}

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory scanned for CSV files.
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub regions_per_group: u32,
    /// Comma-separated group names; empty means "use the catalog groups".
    pub countries: String,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let defaults = GeneratorParams::default();
        Self {
            rows: defaults.row_count,
            regions_per_group: defaults.regions_per_group,
            countries: String::new(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub top_n: usize,
    pub show_raw: bool,
    pub export_file_name: String,
    pub export_metadata: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            show_raw: false,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            export_metadata: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub generator: GeneratorConfig,
    pub display: DisplayConfig,
}

// ---------------------------------------------------------------------------
// Loading and layering
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Defaults, then the config file, then command-line overrides.
    pub fn load(args: &Args) -> Result<Self> {
        let manager = ConfigManager::for_args(args)?;
        let mut config = Self::from_file(manager.config_path())?;
        config.apply_args(args);
        config.validate();
        Ok(config)
    }

    /// Read a TOML file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing config")
    }

    /// Command-line flags take precedence over file values.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(dir) = &args.data_dir {
            self.data.dir = dir.clone();
        }
        if let Some(seed) = args.seed {
            self.generator.seed = Some(seed);
        }
        if let Some(n) = args.top_n {
            self.display.top_n = n;
        }
    }

    /// Clamp numeric settings into their legal ranges.
    pub fn validate(&mut self) {
        let top_n = self
            .display
            .top_n
            .clamp(*TOP_N_RANGE.start(), *TOP_N_RANGE.end());
        if top_n != self.display.top_n {
            log::warn!("display.top_n {} clamped to {top_n}", self.display.top_n);
            self.display.top_n = top_n;
        }
        self.generator.rows = self
            .generator
            .rows
            .clamp(*ROW_COUNT_RANGE.start(), *ROW_COUNT_RANGE.end());
        self.generator.regions_per_group = self
            .generator
            .regions_per_group
            .clamp(*REGIONS_RANGE.start(), *REGIONS_RANGE.end());
        if self.display.export_file_name.trim().is_empty() {
            self.display.export_file_name = DEFAULT_EXPORT_FILE_NAME.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::from_file(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.data.dir, PathBuf::from("data"));
        assert_eq!(config.display.top_n, 10);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generator]\nrows = 500\nseed = 9\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.generator.rows, 500);
        assert_eq!(config.generator.seed, Some(9));
        assert_eq!(config.generator.regions_per_group, 5);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display\ntop_n = ").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn args_override_and_values_are_clamped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[data]\ndir = \"from-file\"\n[generator]\nrows = 5\n").unwrap();

        let args = Args {
            config: Some(path),
            data_dir: Some(PathBuf::from("from-cli")),
            top_n: Some(99),
            ..Default::default()
        };
        let config = AppConfig::load(&args).unwrap();
        assert_eq!(config.data.dir, PathBuf::from("from-cli"));
        assert_eq!(config.display.top_n, 30);
        assert_eq!(config.generator.rows, 10);
    }

    #[test]
    fn write_default_config_round_trips() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join(APP_NAME).join(CONFIG_FILE_NAME));

        let path = manager.write_default_config(false).unwrap();
        assert_eq!(AppConfig::from_file(&path).unwrap(), AppConfig::default());
        assert!(manager.write_default_config(false).is_err());
        assert!(manager.write_default_config(true).is_ok());
    }
}
