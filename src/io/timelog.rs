// io/timelog.rs
// Reader for the snapshot time log (timeSnapshot.dat)

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DustError, DustResult};
use crate::units::{Quantity, Unit, UnitMode};

/// Column holding the physical time of each snapshot row.
pub const TIME_COLUMN: usize = 2;

static TIME_UNIT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"physical time \| ([0-9eE+\-.]+) s").expect("valid time unit pattern"));

/// Physical times of every snapshot, in snapshot order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeLog {
    pub times: Vec<f64>,
    /// Scale of one time-column unit in seconds, when the log declares it.
    pub unit: Option<Unit>,
}

impl TimeLog {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Snapshot numbers covered by this log: one per row, starting at 0.
    pub fn snapshot_index(&self) -> Vec<usize> {
        (0..self.times.len()).collect()
    }

    /// Times as a quantity; the unit is attached only in physical mode and
    /// only if the log declared one.
    pub fn quantity(&self, mode: UnitMode) -> Quantity {
        let unit = match mode {
            UnitMode::Raw => None,
            UnitMode::Physical => self.unit.clone(),
        };
        Quantity::new(self.times.clone(), unit)
    }
}

fn time_unit_from_line(line: &str) -> Option<Unit> {
    let caps = TIME_UNIT_PATTERN.captures(line)?;
    let scale: f64 = caps.get(1)?.as_str().parse().ok()?;
    Unit::new(scale, "s").ok()
}

/// Parse time log text. Lines starting with `#` are comments; the unit line
/// may appear anywhere (the last one wins) and a missing one leaves the
/// times unitless.
pub fn parse_time_log(content: &str, path: &Path) -> DustResult<TimeLog> {
    let mut parsed = TimeLog::default();
    for (lineno, line) in content.lines().enumerate() {
        if let Some(unit) = time_unit_from_line(line) {
            parsed.unit = Some(unit);
        }
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let field = line.split_whitespace().nth(TIME_COLUMN).ok_or_else(|| DustError::TimeLog {
            path: path.to_path_buf(),
            line: lineno + 1,
            message: format!("expected at least {} columns", TIME_COLUMN + 1),
        })?;
        let time = field.parse::<f64>().map_err(|e| DustError::TimeLog {
            path: path.to_path_buf(),
            line: lineno + 1,
            message: format!("'{}': {}", field, e),
        })?;
        parsed.times.push(time);
    }
    if parsed.unit.is_none() {
        log::debug!("{} declares no time unit; times stay unitless", path.display());
    }
    Ok(parsed)
}

pub fn read_time_log<P: AsRef<Path>>(path: P) -> DustResult<TimeLog> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| DustError::io(path, e))?;
    parse_time_log(&content, path)
}
