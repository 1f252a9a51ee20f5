//! Physical unit handling for simulation output.
//!
//! Snapshot files store plain numbers in code units. A [`Unit`] is a scale
//! factor times a known base symbol (`"1.496e11 m"`, `"1 au"`, `"5.0e6 s"`),
//! and a [`Quantity`] is an array of values optionally tagged with one.
//! Attaching a unit never changes the stored numbers.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DustError, DustResult};

/// Astronomical unit in meters.
pub const AU_TO_M: f64 = 1.495_978_707e11;
/// Julian year in seconds.
pub const YEAR_TO_S: f64 = 3.155_76e7;
/// Solar mass in kilograms.
pub const SOLAR_MASS_KG: f64 = 1.988_47e30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Length,
    Time,
    Mass,
    Angle,
    Dimensionless,
}

/// Base symbols understood by [`Unit::parse`], with their dimension and SI factor.
fn base_symbol(symbol: &str) -> Option<(Dimension, f64)> {
    use Dimension::*;
    let entry = match symbol {
        "m" => (Length, 1.0),
        "cm" => (Length, 1.0e-2),
        "km" => (Length, 1.0e3),
        "au" | "AU" => (Length, AU_TO_M),
        "s" => (Time, 1.0),
        "min" => (Time, 60.0),
        "h" => (Time, 3600.0),
        "d" => (Time, 86_400.0),
        "yr" => (Time, YEAR_TO_S),
        "g" => (Mass, 1.0e-3),
        "kg" => (Mass, 1.0),
        "Msun" => (Mass, SOLAR_MASS_KG),
        "rad" => (Angle, 1.0),
        "deg" => (Angle, std::f64::consts::PI / 180.0),
        "1" | "" => (Dimensionless, 1.0),
        _ => return None,
    };
    Some(entry)
}

/// A unit of measure: `scale` multiples of a base `symbol`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub scale: f64,
    pub symbol: String,
}

impl Unit {
    /// Build a unit from a scale and a known base symbol.
    pub fn new(scale: f64, symbol: &str) -> DustResult<Self> {
        if base_symbol(symbol).is_none() || !scale.is_finite() || scale <= 0.0 {
            return Err(DustError::UnitParse(format!("{} {}", scale, symbol)));
        }
        Ok(Self {
            scale,
            symbol: symbol.to_string(),
        })
    }

    pub fn au() -> Self {
        Self { scale: 1.0, symbol: "au".to_string() }
    }

    pub fn radian() -> Self {
        Self { scale: 1.0, symbol: "rad".to_string() }
    }

    pub fn year() -> Self {
        Self { scale: 1.0, symbol: "yr".to_string() }
    }

    pub fn second() -> Self {
        Self { scale: 1.0, symbol: "s".to_string() }
    }

    /// Parse expressions like `"1.496e11 m"`, `"au"` or `"2.5"` (dimensionless).
    pub fn parse(text: &str) -> DustResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DustError::UnitParse(text.to_string()));
        }
        let (scale, symbol) = match text.split_once(char::is_whitespace) {
            Some((head, rest)) => match head.parse::<f64>() {
                Ok(scale) => (scale, rest.trim()),
                Err(_) => (1.0, text),
            },
            None => match text.parse::<f64>() {
                Ok(scale) => (scale, "1"),
                Err(_) => (1.0, text),
            },
        };
        Self::new(scale, symbol).map_err(|_| DustError::UnitParse(text.to_string()))
    }

    pub fn dimension(&self) -> Dimension {
        // Units are only constructed from known symbols.
        base_symbol(&self.symbol)
            .map(|(dim, _)| dim)
            .unwrap_or(Dimension::Dimensionless)
    }

    /// Value of one of this unit in SI base units (m, s, kg, rad).
    pub fn si_factor(&self) -> f64 {
        self.scale * base_symbol(&self.symbol).map(|(_, f)| f).unwrap_or(1.0)
    }

    /// Multiplier taking values in `self` to values in `target`.
    pub fn conversion_factor(&self, target: &Unit) -> DustResult<f64> {
        if self.dimension() != target.dimension() {
            return Err(DustError::UnitMismatch {
                from: self.to_string(),
                to: target.to_string(),
            });
        }
        Ok(self.si_factor() / target.si_factor())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 1.0 {
            write!(f, "{}", self.symbol)
        } else {
            write!(f, "{:e} {}", self.scale, self.symbol)
        }
    }
}

/// Whether loaders attach unit metadata to the arrays they return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitMode {
    #[default]
    Raw,
    Physical,
}

impl UnitMode {
    pub fn from_flag(units: bool) -> Self {
        if units {
            UnitMode::Physical
        } else {
            UnitMode::Raw
        }
    }

    /// The unit to attach in this mode: `None` in raw mode.
    pub fn tag(self, unit: Unit) -> Option<Unit> {
        match self {
            UnitMode::Raw => None,
            UnitMode::Physical => Some(unit),
        }
    }
}

/// An ordered array of values with optional unit metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Quantity {
    pub values: Vec<f64>,
    pub unit: Option<Unit>,
}

impl Quantity {
    pub fn new(values: Vec<f64>, unit: Option<Unit>) -> Self {
        Self { values, unit }
    }

    pub fn unitless(values: Vec<f64>) -> Self {
        Self { values, unit: None }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Re-express the values in `target`. Untagged quantities cannot be converted.
    pub fn to_unit(&self, target: &Unit) -> DustResult<Quantity> {
        let unit = self.unit.as_ref().ok_or_else(|| DustError::UnitMismatch {
            from: "untagged values".to_string(),
            to: target.to_string(),
        })?;
        let factor = unit.conversion_factor(target)?;
        Ok(Quantity {
            values: self.values.iter().map(|v| v * factor).collect(),
            unit: Some(target.clone()),
        })
    }

    /// Drop the unit metadata and return the bare numbers.
    pub fn strip(self) -> Vec<f64> {
        self.values
    }
}

#[derive(Debug, Deserialize)]
struct UnitEntry {
    unit: String,
}

/// Quantity name to unit mapping read from `units.yml`.
///
/// Entries whose unit string is not a plain scaled symbol (`"g cm2/s"`,
/// `"1/s"`) are kept unparsed and only fail when required.
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    units: BTreeMap<String, Unit>,
    unparsed: BTreeMap<String, String>,
    source: PathBuf,
}

impl UnitTable {
    /// Load a units file. A missing file is an error naming the path.
    pub fn load<P: AsRef<Path>>(path: P) -> DustResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DustError::MissingUnitsFile(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| DustError::io(path, e))?;
        Self::from_yaml_str(&content, path)
    }

    pub fn from_yaml_str(content: &str, source: &Path) -> DustResult<Self> {
        let entries: BTreeMap<String, UnitEntry> =
            serde_yaml::from_str(content).map_err(|e| DustError::UnitsFile {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;
        let mut units = BTreeMap::new();
        let mut unparsed = BTreeMap::new();
        for (name, entry) in entries {
            match Unit::parse(&entry.unit) {
                Ok(unit) => {
                    units.insert(name, unit);
                }
                Err(_) => {
                    log::debug!("{}: skipping compound unit '{}'", name, entry.unit);
                    unparsed.insert(name, entry.unit);
                }
            }
        }
        log::debug!("loaded {} units from {}", units.len(), source.display());
        Ok(Self {
            units,
            unparsed,
            source: source.to_path_buf(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    /// The unit named `name`; absent or unparsable entries are errors.
    pub fn require(&self, name: &str) -> DustResult<&Unit> {
        if let Some(unit) = self.units.get(name) {
            return Ok(unit);
        }
        let message = match self.unparsed.get(name) {
            Some(text) => format!("{}: {}", name, DustError::UnitParse(text.clone())),
            None => format!("no entry for '{}'", name),
        };
        Err(DustError::UnitsFile {
            path: self.source.clone(),
            message,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    /// Convert code-unit times to years using the `time` entry.
    pub fn times_in_years(&self, code_times: &[f64]) -> DustResult<Quantity> {
        let time = self.require("time")?;
        Quantity::new(code_times.to_vec(), Some(time.clone())).to_unit(&Unit::year())
    }

    /// Code-unit lengths expressed in astronomical units using the `length` entry.
    pub fn lengths_in_au(&self, code_lengths: &[f64]) -> DustResult<Quantity> {
        let length = self.require("length")?;
        Quantity::new(code_lengths.to_vec(), Some(length.clone())).to_unit(&Unit::au())
    }
}
