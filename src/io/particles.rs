// io/particles.rs
// Decoder for the fixed-layout binary particle snapshot files

use std::collections::BTreeMap;
use std::path::Path;

use bytemuck::{Pod, Zeroable};

use crate::error::{DustError, DustResult};
use crate::particle::Field;

/// One on-disk particle record: identifier followed by the stored fields
/// in [`Field::STORED`] order, all native endian.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RawRecord {
    pub id: i64,
    pub values: [f64; 11],
}

pub const RECORD_SIZE: usize = std::mem::size_of::<RawRecord>();

/// Name-addressed columns exactly as stored in a particle file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawColumns {
    pub ids: Vec<i64>,
    pub columns: BTreeMap<Field, Vec<f64>>,
}

impl RawColumns {
    pub fn from_records(records: &[RawRecord]) -> Self {
        let ids = records.iter().map(|r| r.id).collect();
        let columns = Field::STORED
            .iter()
            .enumerate()
            .map(|(i, &field)| (field, records.iter().map(|r| r.values[i]).collect()))
            .collect();
        Self { ids, columns }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Stored column for `field`; derived fields such as `x` are empty here.
    pub fn column(&self, field: Field) -> &[f64] {
        self.columns.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Split a byte buffer into particle records. Trailing partial records are rejected.
pub fn decode_records(bytes: &[u8], path: &Path) -> DustResult<Vec<RawRecord>> {
    if bytes.len() % RECORD_SIZE != 0 {
        return Err(DustError::Truncated {
            path: path.to_path_buf(),
            len: bytes.len(),
            record_size: RECORD_SIZE,
        });
    }
    Ok(bytes
        .chunks_exact(RECORD_SIZE)
        .map(bytemuck::pod_read_unaligned::<RawRecord>)
        .collect())
}

pub fn encode_records(records: &[RawRecord]) -> Vec<u8> {
    bytemuck::cast_slice(records).to_vec()
}

/// Read a whole particle file into raw columns.
pub fn read_particle_file<P: AsRef<Path>>(path: P) -> DustResult<RawColumns> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| DustError::io(path, e))?;
    let records = decode_records(&bytes, path)?;
    log::debug!("decoded {} particle records from {}", records.len(), path.display());
    Ok(RawColumns::from_records(&records))
}

/// Write records in the same layout the simulator produces.
pub fn write_particle_file<P: AsRef<Path>>(path: P, records: &[RawRecord]) -> DustResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DustError::io(parent, e))?;
    }
    std::fs::write(path, encode_records(records)).map_err(|e| DustError::io(path, e))
}
