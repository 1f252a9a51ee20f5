// trajectory/mod.rs
// Joins per-snapshot particle tables into per-particle time series

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::{DustError, DustResult};
use crate::io::{read_time_log, SnapshotLayout};
use crate::particle::{Field, ParticleTable};
use crate::snapshot::load_snapshot;
use crate::units::{Quantity, Unit, UnitMode};

#[cfg(test)]
mod tests;

/// Time series of a single particle, one entry per snapshot it appeared in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleTrajectory {
    pub time: Quantity,
    pub fields: BTreeMap<Field, Quantity>,
}

impl ParticleTrajectory {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn series(&self, field: Field) -> Option<&Quantity> {
        self.fields.get(&field)
    }

    pub fn values(&self, field: Field) -> &[f64] {
        self.fields.get(&field).map(Quantity::values).unwrap_or(&[])
    }
}

/// Trajectories keyed by particle identifier.
pub type Trajectories = BTreeMap<i64, ParticleTrajectory>;

#[derive(Default)]
struct Series {
    time: Vec<f64>,
    fields: BTreeMap<Field, Vec<f64>>,
}

/// Build trajectories from the snapshots named in `index`.
///
/// `times[k]` is the time of snapshot `index[k]`. The particle set is taken
/// from the first snapshot; identifiers that only show up later are skipped
/// with a warning.
pub fn assemble_trajectories<F>(index: &[usize], times: &Quantity, mut load: F) -> DustResult<Trajectories>
where
    F: FnMut(usize) -> DustResult<ParticleTable>,
{
    if index.len() != times.len() {
        return Err(DustError::Mismatch(format!(
            "{} snapshots but {} time values",
            index.len(),
            times.len()
        )));
    }

    let mut series: BTreeMap<i64, Series> = BTreeMap::new();
    let mut units: BTreeMap<Field, Option<Unit>> = BTreeMap::new();

    for (k, (&n, &time)) in index.iter().zip(times.values()).enumerate() {
        let table = load(n)?;

        let mut seen = HashSet::with_capacity(table.len());
        for id in table.ids() {
            if !seen.insert(id) {
                return Err(DustError::DuplicateParticle { id, snapshot: n });
            }
        }

        if k == 0 {
            for &id in &seen {
                series.insert(id, Series::default());
            }
            for field in Field::ALL {
                units.insert(field, table.unit_of(field));
            }
        }

        let mut late = 0usize;
        for particle in &table.particles {
            let Some(entry) = series.get_mut(&particle.id) else {
                late += 1;
                continue;
            };
            for field in Field::ALL {
                entry.fields.entry(field).or_default().push(particle.get(field));
            }
            entry.time.push(time);
        }
        if late > 0 {
            log::warn!(
                "snapshot {}: ignoring {} particles not present in the first snapshot",
                n,
                late
            );
        }
    }

    let trajectories = series
        .into_iter()
        .map(|(id, s)| {
            let fields = s
                .fields
                .into_iter()
                .map(|(field, values)| {
                    let unit = units.get(&field).cloned().flatten();
                    (field, Quantity::new(values, unit))
                })
                .collect();
            let trajectory = ParticleTrajectory {
                time: Quantity::new(s.time, times.unit.clone()),
                fields,
            };
            (id, trajectory)
        })
        .collect();
    Ok(trajectories)
}

/// Trajectories for every particle of a run in the `snapshots/<N>` layout.
///
/// Snapshots `0..rows` of `timeSnapshot.dat` are read in order.
pub fn construct_trajectories<P: AsRef<Path>>(datadir: P, mode: UnitMode) -> DustResult<Trajectories> {
    let layout = SnapshotLayout::new(datadir);
    let time_log = read_time_log(layout.time_log())?;
    let times = time_log.quantity(mode);
    let index = time_log.snapshot_index();
    let on_disk = layout.snapshot_numbers()?;
    if on_disk != index {
        log::warn!(
            "time log lists {} snapshots but {} snapshot directories exist",
            index.len(),
            on_disk.len()
        );
    }
    log::info!(
        "assembling trajectories over {} snapshots in {}",
        index.len(),
        layout.root().display()
    );
    assemble_trajectories(&index, &times, |n| {
        load_snapshot(&layout, n, mode).map(|snapshot| snapshot.table)
    })
}
