// io/mod.rs
// File formats and directory layout of the simulator's output

pub mod layout;
pub mod particles;
pub mod timelog;

pub use layout::{LegacyLayout, SnapshotLayout};
pub use particles::{read_particle_file, write_particle_file, RawColumns, RawRecord, RECORD_SIZE};
pub use timelog::{read_time_log, TimeLog};
