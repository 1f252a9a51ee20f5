// analysis/initial_radius.rs
// Radius of each particle at the earliest snapshot of the flat output layout

use std::collections::HashMap;
use std::path::Path;

use crate::error::{DustError, DustResult};
use crate::io::LegacyLayout;
use crate::particle::ParticleTable;
use crate::snapshot::read_table;
use crate::units::{Quantity, UnitMode, UnitTable};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InitialRadii {
    snapshot: usize,
    radii: HashMap<i64, f64>,
}

impl InitialRadii {
    pub fn from_table(snapshot: usize, table: &ParticleTable) -> Self {
        Self {
            snapshot,
            radii: table.particles.iter().map(|p| (p.id, p.r)).collect(),
        }
    }

    /// Read the lowest-numbered `particles<N>.dat` in `outdir`.
    pub fn load<P: AsRef<Path>>(outdir: P) -> DustResult<Self> {
        let layout = LegacyLayout::new(outdir);
        let first = layout.first_snapshot()?;
        let (_, table) = read_table(layout.particle_file(first), UnitMode::Raw)?;
        log::info!("initial radii of {} particles from snapshot {}", table.len(), first);
        Ok(Self::from_table(first, &table))
    }

    pub fn snapshot(&self) -> usize {
        self.snapshot
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Identifiers present in the first snapshot, ascending.
    pub fn ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.radii.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn get(&self, id: i64) -> Option<f64> {
        self.radii.get(&id).copied()
    }

    /// Initial radius for every identifier, in the order given.
    pub fn lookup(&self, ids: &[i64]) -> DustResult<Vec<f64>> {
        ids.iter()
            .map(|&id| self.get(id).ok_or(DustError::UnknownParticle(id)))
            .collect()
    }

    /// Like [`lookup`](Self::lookup), converted to astronomical units with the
    /// run's `units.yml` length entry.
    pub fn lookup_in_au(&self, ids: &[i64], units: &UnitTable) -> DustResult<Quantity> {
        let radii = self.lookup(ids)?;
        units.lengths_in_au(&radii)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{write_particle_file, RawRecord};
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn write(dir: &Path, n: usize, rows: &[(i64, f64)]) {
        let records: Vec<RawRecord> = rows
            .iter()
            .map(|&(id, r)| {
                let mut values = [0.0; 11];
                values[0] = r;
                RawRecord { id, values }
            })
            .collect();
        write_particle_file(LegacyLayout::new(dir).particle_file(n), &records).unwrap();
    }

    #[test]
    fn uses_lowest_numbered_snapshot() {
        let dir = tempdir().unwrap();
        write(dir.path(), 5, &[(1, 9.0), (2, 9.0)]);
        write(dir.path(), 2, &[(1, 1.5), (2, 2.5), (3, 3.5)]);

        let radii = InitialRadii::load(dir.path()).unwrap();
        assert_eq!(radii.snapshot(), 2);
        assert_eq!(radii.lookup(&[3, 1]).unwrap(), vec![3.5, 1.5]);
    }

    #[test]
    fn unknown_identifier_fails() {
        let dir = tempdir().unwrap();
        write(dir.path(), 0, &[(1, 1.0)]);
        let radii = InitialRadii::load(dir.path()).unwrap();
        let err = radii.lookup(&[1, 42]).unwrap_err();
        assert!(matches!(err, DustError::UnknownParticle(42)));
    }

    #[test]
    fn cartesian_files_give_true_radius() {
        let dir = tempdir().unwrap();
        let records = vec![
            RawRecord { id: 1, values: [-3.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] },
            RawRecord { id: 2, values: [6.0, 8.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] },
        ];
        write_particle_file(dir.path().join("particles0.dat"), &records).unwrap();
        let radii = InitialRadii::load(dir.path()).unwrap();
        assert_relative_eq!(radii.get(1).unwrap(), 5.0);
        assert_relative_eq!(radii.get(2).unwrap(), 10.0);
    }

    #[test]
    fn converts_with_units_file() {
        let dir = tempdir().unwrap();
        write(dir.path(), 0, &[(7, 2.0)]);
        std::fs::write(dir.path().join("units.yml"), "length:\n  unit: \"5.2 au\"\n").unwrap();

        let radii = InitialRadii::load(dir.path()).unwrap();
        let units = UnitTable::load(LegacyLayout::new(dir.path()).units_file()).unwrap();
        let au = radii.lookup_in_au(&[7], &units).unwrap();
        assert_relative_eq!(au.values[0], 10.4, epsilon = 1e-12);
    }
}
