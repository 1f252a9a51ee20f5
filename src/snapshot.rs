// snapshot.rs
// Single-snapshot loading: decode, normalize coordinates, attach units

use std::path::Path;

use crate::coords::{self, CoordinateForm};
use crate::error::DustResult;
use crate::io::{read_particle_file, SnapshotLayout};
use crate::particle::ParticleTable;
use crate::units::UnitMode;

/// A loaded snapshot together with the coordinate form found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub number: usize,
    pub form: CoordinateForm,
    pub table: ParticleTable,
}

/// Read one particle file into a normalized table.
pub fn read_table<P: AsRef<Path>>(path: P, mode: UnitMode) -> DustResult<(CoordinateForm, ParticleTable)> {
    let raw = read_particle_file(path)?;
    let (form, particles) = coords::normalize(&raw);
    Ok((form, ParticleTable::new(particles, mode)))
}

/// Load `datadir/snapshots/<n>/particles.dat`.
pub fn load_snapshot(layout: &SnapshotLayout, n: usize, mode: UnitMode) -> DustResult<Snapshot> {
    let (form, table) = read_table(layout.particle_file(n), mode)?;
    Ok(Snapshot {
        number: n,
        form,
        table,
    })
}
