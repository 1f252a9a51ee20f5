// export.rs
// Column export of derived data (CSV, TSV, JSON)

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::RadialProfile;
use crate::error::{DustError, DustResult};
use crate::particle::{Field, ParticleTable};
use crate::trajectory::ParticleTrajectory;
use crate::units::Quantity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = DustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            other => Err(DustError::Invalid(format!("unknown export format '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportColumn {
    pub name: String,
    pub unit: Option<String>,
    pub values: Vec<f64>,
}

/// Named, equal-length columns plus free-form metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ExportTable {
    pub title: String,
    pub metadata: BTreeMap<String, String>,
    pub columns: Vec<ExportColumn>,
}

impl ExportTable {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            metadata: BTreeMap::new(),
            columns: Vec::new(),
        }
    }

    pub fn with_meta(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn push(&mut self, name: &str, quantity: &Quantity) {
        self.columns.push(ExportColumn {
            name: name.to_string(),
            unit: quantity.unit.as_ref().map(|u| u.to_string()),
            values: quantity.values.clone(),
        });
    }

    pub fn rows(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).min().unwrap_or(0)
    }

    pub fn from_profile(profile: &RadialProfile) -> Self {
        let mut table = ExportTable::new("radial density").with_meta("bins", profile.bins());
        table.push("r_mid", &Quantity::unitless(profile.midpoints.clone()));
        table.push("bin_width", &Quantity::unitless(profile.widths.clone()));
        table.push("count", &Quantity::unitless(profile.counts.clone()));
        table.push("sigma", &Quantity::unitless(profile.density.clone()));
        table
    }

    pub fn from_trajectory(id: i64, trajectory: &ParticleTrajectory) -> Self {
        let mut table = ExportTable::new("trajectory").with_meta("id", id);
        table.push("time", &trajectory.time);
        for (field, quantity) in &trajectory.fields {
            table.push(field.name(), quantity);
        }
        table
    }

    pub fn from_particles(title: &str, particles: &ParticleTable) -> Self {
        let mut table = ExportTable::new(title).with_meta("particles", particles.len());
        let ids = particles.ids().into_iter().map(|id| id as f64).collect();
        table.push("id", &Quantity::unitless(ids));
        for field in Field::ALL {
            table.push(field.name(), &particles.quantity(field));
        }
        table
    }
}

pub fn render(table: &ExportTable, format: ExportFormat) -> DustResult<String> {
    match format {
        ExportFormat::Csv => Ok(render_delimited(table, ',')),
        ExportFormat::Tsv => Ok(render_delimited(table, '\t')),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(table)?),
    }
}

fn render_delimited(table: &ExportTable, sep: char) -> String {
    let mut content = String::new();
    content.push_str(&format!("# {}\n", table.title));
    for (key, value) in &table.metadata {
        content.push_str(&format!("# {}: {}\n", key, value));
    }

    let header: Vec<String> = table
        .columns
        .iter()
        .map(|c| match &c.unit {
            Some(unit) => format!("{} [{}]", c.name, unit),
            None => c.name.clone(),
        })
        .collect();
    content.push_str(&header.join(&sep.to_string()));
    content.push('\n');

    for row in 0..table.rows() {
        let cells: Vec<String> = table.columns.iter().map(|c| c.values[row].to_string()).collect();
        content.push_str(&cells.join(&sep.to_string()));
        content.push('\n');
    }
    content
}

/// Render and write to `path`, creating parent directories.
pub fn export_to_file<P: AsRef<Path>>(table: &ExportTable, format: ExportFormat, path: P) -> DustResult<()> {
    let path = path.as_ref();
    let content = render(table, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DustError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| DustError::io(path, e))?;
    log::info!("wrote {} rows to {}", table.rows(), path.display());
    Ok(())
}
