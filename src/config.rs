use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::color::ColorScheme;
use crate::display::DisplayMode;

/// What to do when a row carries both coordinate groups and they disagree
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, ValueEnum, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyPolicy {
    Ignore, // Trust cartesian silently
    #[default]
    Warn, // Trust cartesian, log the deviation
    Error, // Abort the run
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub fill: FillConfig,
    pub plot: PlotConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("bike_data.csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FillConfig {
    pub consistency: ConsistencyPolicy,
    /// Allowed distance between given and reconstructed points, in mm
    pub tolerance_mm: f64,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            consistency: ConsistencyPolicy::Warn,
            tolerance_mm: 1.0,
        }
    }
}

impl FillConfig {
    /// Set the tolerance, clamping negatives to 0 and replacing NaN with the default.
    pub fn set_tolerance(&mut self, tolerance_mm: f64) {
        self.tolerance_mm = if tolerance_mm.is_nan() {
            warn!("tolerance_mm is NaN; using {}", Self::default().tolerance_mm);
            Self::default().tolerance_mm
        } else {
            tolerance_mm.max(0.0)
        };
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotConfig {
    /// Row used for the single-bike figures (0-based)
    pub record: usize,
    pub color_scheme: ColorScheme,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    pub print_width: u16,
    pub print_height: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Terminal,
            print_width: 100,
            print_height: 32,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Write the completed table here (no export when unset)
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        let tolerance_mm = config.fill.tolerance_mm;
        config.fill.set_tolerance(tolerance_mm);
        Ok(config)
    }

    /// Get the default XDG config path (~/.config/bikefit/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bikefit").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists
    /// Returns None if file doesn't exist, logs warning on parse errors
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            match Self::load(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("{:#}; using defaults", e);
                    None
                }
            }
        } else {
            None
        }
    }

    /// Initialize default config file at XDG path, returns the path
    pub fn init_default_config() -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, Self::generate_config_template())?;

        Ok(path)
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r#"# Bikefit Configuration
# This file is auto-generated. Edit as needed.

[input]
# Bike table (CSV with a header row, empty fields for missing values)
path = "bike_data.csv"

[fill]
# Rows carrying both cartesian and polar fields keep the cartesian values.
# What to do when the two groups disagree: "ignore", "warn" or "error"
consistency = "warn"
# Allowed disagreement in millimeters
tolerance_mm = 1.0

[plot]
# Row used for the single-bike cartesian and polar figures (0-based)
record = 0
# Per-bike colors: "tab10", "spectrum", "rainbow", "fire", "ocean", "forest",
# "purple", "monochrome"
color_scheme = "tab10"

[display]
# Display mode: "terminal" (interactive) or "print" (text to stdout)
mode = "terminal"
# Figure size in character cells for print mode
print_width = 100
print_height = 32

[export]
# Write the completed table as CSV
# path = "bike_data_filled.csv"
"#
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &crate::Args) {
        if let Some(ref input) = args.input {
            self.input.path = input.clone();
        }

        if let Some(policy) = args.consistency {
            self.fill.consistency = policy;
        }
        if let Some(tolerance) = args.tolerance {
            self.fill.set_tolerance(tolerance);
        }

        if let Some(record) = args.record {
            self.plot.record = record;
        }
        if let Some(ref colors) = args.colors {
            match colors.parse() {
                Ok(scheme) => self.plot.color_scheme = scheme,
                Err(e) => warn!("{}; keeping {}", e, self.plot.color_scheme.name()),
            }
        }

        if let Some(mode) = args.mode {
            self.display.mode = mode;
        }
        if let Some(width) = args.width {
            self.display.print_width = width;
        }
        if let Some(height) = args.height {
            self.display.print_height = height;
        }

        if let Some(ref export) = args.export {
            self.export.path = Some(export.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Args;
    use clap::Parser;

    #[test]
    fn template_parses_to_defaults() {
        let parsed: Config = toml::from_str(&Config::generate_config_template()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed: Config = toml::from_str("[fill]\nconsistency = \"error\"\n").unwrap();
        assert_eq!(parsed.fill.consistency, ConsistencyPolicy::Error);
        assert_eq!(parsed.fill.tolerance_mm, 1.0);
        assert_eq!(parsed.display, DisplayConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[plot]\nrecord = 3\ncolor_scheme = \"ocean\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.plot.record, 3);
        assert_eq!(config.plot.color_scheme, ColorScheme::Ocean);
    }

    #[test]
    fn load_rejects_unknown_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fill]\nconsistency = \"maybe\"\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn load_clamps_bad_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[fill]\ntolerance_mm = -3.0\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().fill.tolerance_mm, 0.0);

        std::fs::write(&path, "[fill]\ntolerance_mm = nan\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().fill.tolerance_mm, 1.0);
    }

    #[test]
    fn cli_tolerance_is_clamped() {
        let mut config = Config::default();
        config.merge_args(&Args::parse_from(["bikefit", "--tolerance=-2"]));
        assert_eq!(config.fill.tolerance_mm, 0.0);
    }

    #[test]
    fn cli_overrides_file_values() {
        let args = Args::parse_from([
            "bikefit",
            "bikes.csv",
            "--mode",
            "print",
            "--record",
            "2",
            "--colors",
            "fire",
            "--consistency",
            "error",
            "--tolerance",
            "0.25",
            "--export",
            "out.csv",
            "--width",
            "80",
        ]);
        let mut config = Config::default();
        config.merge_args(&args);

        assert_eq!(config.input.path, PathBuf::from("bikes.csv"));
        assert_eq!(config.display.mode, DisplayMode::Print);
        assert_eq!(config.display.print_width, 80);
        assert_eq!(config.display.print_height, 32);
        assert_eq!(config.plot.record, 2);
        assert_eq!(config.plot.color_scheme, ColorScheme::Fire);
        assert_eq!(config.fill.consistency, ConsistencyPolicy::Error);
        assert_eq!(config.fill.tolerance_mm, 0.25);
        assert_eq!(config.export.path, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn unknown_color_scheme_keeps_current() {
        let args = Args::parse_from(["bikefit", "--colors", "plaid"]);
        let mut config = Config::default();
        config.merge_args(&args);
        assert_eq!(config.plot.color_scheme, ColorScheme::Tab10);
    }
}
