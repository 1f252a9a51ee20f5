//! Loading and post-processing of dust particle output from a disk
//! hydrodynamics code.
//!
//! A run directory holds one binary particle file per snapshot, a time log
//! and a `units.yml`. This crate decodes the particle files, normalizes
//! their coordinates, optionally tags arrays with physical units, joins
//! snapshots into per-particle trajectories and computes a few derived
//! quantities (initial radii, mass weights, size selections, radial
//! surface density).

pub mod analysis;
pub mod config;
pub mod coords;
pub mod error;
pub mod export;
pub mod io;
pub mod particle;
pub mod snapshot;
pub mod trajectory;
pub mod units;

pub use error::{DustError, DustResult};
pub use particle::{Field, Particle, ParticleTable};
pub use snapshot::{load_snapshot, Snapshot};
pub use trajectory::{assemble_trajectories, construct_trajectories, ParticleTrajectory, Trajectories};
pub use units::{Quantity, Unit, UnitMode, UnitTable};
