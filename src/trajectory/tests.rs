// Trajectory assembly tests

use super::*;
use crate::io::{write_particle_file, RawRecord};
use crate::particle::Particle;
use approx::assert_relative_eq;
use tempfile::tempdir;
use ultraviolet::DVec2;

fn particle(id: i64, r: f64, mass: f64) -> Particle {
    Particle {
        id,
        r,
        phi: 0.0,
        pos: DVec2::new(r, 0.0),
        r_dot: 0.0,
        phi_dot: 0.0,
        r_ddot: 0.0,
        phi_ddot: 0.0,
        mass,
        size: 1.0,
        timestep: 0.1,
        facold: 1.0,
        stokes: 0.01,
    }
}

fn table(rows: &[(i64, f64, f64)]) -> ParticleTable {
    ParticleTable::new(
        rows.iter().map(|&(id, r, m)| particle(id, r, m)).collect(),
        UnitMode::Raw,
    )
}

#[test]
fn three_snapshots_give_ordered_series() {
    let snapshots = vec![
        table(&[(1, 1.0, 10.0), (2, 2.0, 20.0), (3, 3.0, 30.0)]),
        table(&[(3, 3.5, 31.0), (1, 1.5, 11.0), (2, 2.5, 21.0)]),
        table(&[(2, 2.75, 22.0), (3, 3.75, 32.0), (1, 1.75, 12.0)]),
    ];
    let times = Quantity::unitless(vec![0.0, 10.0, 20.0]);

    let trajectories = assemble_trajectories(&[0, 1, 2], &times, |n| Ok(snapshots[n].clone())).unwrap();
    assert_eq!(trajectories.len(), 3);

    let p2 = &trajectories[&2];
    assert_eq!(p2.len(), 3);
    assert_eq!(p2.values(Field::R), &[2.0, 2.5, 2.75]);
    assert_eq!(p2.values(Field::Mass), &[20.0, 21.0, 22.0]);
    assert_eq!(p2.values(Field::X), &[2.0, 2.5, 2.75]);
    assert_eq!(p2.time.values, vec![0.0, 10.0, 20.0]);
    for field in Field::ALL {
        assert_eq!(p2.values(field).len(), 3);
    }
}

#[test]
fn late_particles_are_ignored() {
    let snapshots = vec![
        table(&[(1, 1.0, 1.0)]),
        table(&[(1, 1.1, 1.0), (9, 5.0, 1.0)]),
    ];
    let times = Quantity::unitless(vec![0.0, 1.0]);
    let trajectories = assemble_trajectories(&[0, 1], &times, |n| Ok(snapshots[n].clone())).unwrap();
    assert_eq!(trajectories.keys().copied().collect::<Vec<_>>(), vec![1]);
    assert_eq!(trajectories[&1].len(), 2);
}

#[test]
fn vanished_particles_keep_their_earlier_entries() {
    let snapshots = vec![
        table(&[(1, 1.0, 1.0), (2, 2.0, 1.0)]),
        table(&[(1, 1.1, 1.0)]),
        table(&[(1, 1.2, 1.0)]),
    ];
    let times = Quantity::unitless(vec![0.0, 1.0, 2.0]);
    let trajectories = assemble_trajectories(&[0, 1, 2], &times, |n| Ok(snapshots[n].clone())).unwrap();
    assert_eq!(trajectories[&1].len(), 3);
    assert_eq!(trajectories[&2].len(), 1);
    assert_eq!(trajectories[&2].time.values, vec![0.0]);
}

#[test]
fn duplicate_identifiers_are_rejected() {
    let snapshots = vec![table(&[(4, 1.0, 1.0), (4, 2.0, 1.0)])];
    let times = Quantity::unitless(vec![0.0]);
    let err = assemble_trajectories(&[0], &times, |n| Ok(snapshots[n].clone())).unwrap_err();
    assert!(matches!(err, DustError::DuplicateParticle { id: 4, snapshot: 0 }));
}

#[test]
fn index_and_times_must_match() {
    let times = Quantity::unitless(vec![0.0]);
    let err = assemble_trajectories(&[0, 1], &times, |_| Ok(ParticleTable::default())).unwrap_err();
    assert!(matches!(err, DustError::Mismatch(_)));
}

#[test]
fn loader_errors_propagate() {
    let times = Quantity::unitless(vec![0.0]);
    let result = assemble_trajectories(&[0], &times, |_| Err(DustError::Invalid("boom".into())));
    assert!(result.is_err());
}

fn write_run(dir: &Path) {
    let layout = SnapshotLayout::new(dir);
    for n in 0..3usize {
        let records: Vec<RawRecord> = (1..=3)
            .map(|id: i64| {
                let mut values = [0.0; 11];
                values[0] = id as f64 + 0.1 * n as f64;
                values[6] = 100.0 * id as f64;
                values[7] = 1e-3;
                RawRecord { id, values }
            })
            .collect();
        write_particle_file(layout.particle_file(n), &records).unwrap();
    }
    std::fs::write(
        layout.time_log(),
        "#variable: 2 | physical time | 2.0 s\n0\t0\t0.0\n1\t10\t5.0\n2\t20\t10.0\n",
    )
    .unwrap();
}

#[test]
fn construct_from_disk_with_units() {
    let dir = tempdir().unwrap();
    write_run(dir.path());

    let trajectories = construct_trajectories(dir.path(), UnitMode::Physical).unwrap();
    let p3 = &trajectories[&3];
    assert_eq!(p3.time.values, vec![0.0, 5.0, 10.0]);
    assert_eq!(p3.time.unit, Some(Unit::new(2.0, "s").unwrap()));
    assert_eq!(p3.series(Field::R).unwrap().unit, Some(Unit::au()));
    assert_eq!(p3.series(Field::Mass).unwrap().unit, None);

    let r = p3.values(Field::R);
    assert_relative_eq!(r[0], 3.0);
    assert_relative_eq!(r[1], 3.1);
    assert_relative_eq!(r[2], 3.2);

    let seconds = p3.time.to_unit(&Unit::second()).unwrap();
    assert_eq!(seconds.values, vec![0.0, 10.0, 20.0]);
}

#[test]
fn construct_from_disk_without_units() {
    let dir = tempdir().unwrap();
    write_run(dir.path());

    let trajectories = construct_trajectories(dir.path(), UnitMode::Raw).unwrap();
    assert_eq!(trajectories.len(), 3);
    assert!(trajectories[&1].time.unit.is_none());
    assert!(trajectories[&1].series(Field::R).unwrap().unit.is_none());
}

#[test]
fn missing_time_log_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = construct_trajectories(dir.path(), UnitMode::Raw).unwrap_err();
    assert!(matches!(err, DustError::Io { .. }));
}
