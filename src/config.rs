// config.rs
// Optional TOML configuration for the command line tool
//
// Example:
//   [data]
//   datadir = "output/out"
//   units = true
//
//   [density]
//   bins = 40
//   size = 1e-4                        # or size = { min = 5e-5, max = 2e-4 }
//   mass_slope = -1.0
//
//   [export]
//   format = "csv"
//   output = "plots/density.csv"

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::SizeSelection;
use crate::error::{DustError, DustResult};
use crate::export::ExportFormat;
use crate::units::UnitMode;

pub const DEFAULT_DENSITY_BINS: usize = 50;

fn default_bins() -> usize {
    DEFAULT_DENSITY_BINS
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub density: DensityConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DataConfig {
    /// Run directory holding `snapshots/` and `units.yml`.
    pub datadir: Option<PathBuf>,
    /// Attach physical units to loaded arrays.
    #[serde(default)]
    pub units: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DensityConfig {
    #[serde(default = "default_bins")]
    pub bins: usize,
    /// Restrict to one particle size (±10%) or a size range.
    pub size: Option<SizeSelection>,
    /// Weight particles by `r0^mass_slope` of their initial radius.
    pub mass_slope: Option<f64>,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_DENSITY_BINS,
            size: None,
            mass_slope: None,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: ExportFormat,
    pub output: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DustResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| DustError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> DustResult<Self> {
        let config: AnalysisConfig = toml::from_str(content)?;
        if config.density.bins == 0 {
            return Err(DustError::Invalid("density.bins must be at least 1".into()));
        }
        Ok(config)
    }

    pub fn unit_mode(&self) -> UnitMode {
        UnitMode::from_flag(self.data.units)
    }
}
