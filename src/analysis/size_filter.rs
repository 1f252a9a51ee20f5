// analysis/size_filter.rs
// Select particles by their size field

use serde::{Deserialize, Serialize};

use crate::particle::ParticleTable;

/// A target size (matched within ±10%) or an explicit inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSelection {
    Exact(f64),
    Range { min: f64, max: f64 },
}

impl SizeSelection {
    pub fn bounds(self) -> (f64, f64) {
        match self {
            SizeSelection::Exact(size) => (0.9 * size, 1.1 * size),
            SizeSelection::Range { min, max } => (min, max),
        }
    }

    pub fn contains(self, size: f64) -> bool {
        let (min, max) = self.bounds();
        min <= size && size <= max
    }
}

impl From<f64> for SizeSelection {
    fn from(size: f64) -> Self {
        SizeSelection::Exact(size)
    }
}

impl From<(f64, f64)> for SizeSelection {
    fn from((min, max): (f64, f64)) -> Self {
        SizeSelection::Range { min, max }
    }
}

impl From<[f64; 2]> for SizeSelection {
    fn from([min, max]: [f64; 2]) -> Self {
        SizeSelection::Range { min, max }
    }
}

/// Particles whose size lies in the selection, in their original order.
pub fn filter_by_size(table: &ParticleTable, selection: impl Into<SizeSelection>) -> ParticleTable {
    let selection = selection.into();
    let filtered = table.retain_where(|p| selection.contains(p.size));
    log::debug!(
        "size filter {:?} kept {} of {} particles",
        selection.bounds(),
        filtered.len(),
        table.len()
    );
    filtered
}
