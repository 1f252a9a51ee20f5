// io/layout.rs
// Output directory conventions
//
// Two layouts exist and are kept apart:
//   datadir/snapshots/<N>/particles.dat   (with timeSnapshot.dat and units.yml)
//   outdir/particles<N>.dat               (older flat layout)

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DustError, DustResult};

static LEGACY_PARTICLE_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^particles(\d+)\.dat$").expect("valid particle file pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLayout {
    root: PathBuf,
}

impl SnapshotLayout {
    pub fn new<P: AsRef<Path>>(datadir: P) -> Self {
        Self {
            root: datadir.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.root.join("snapshots")
    }

    pub fn particle_file(&self, n: usize) -> PathBuf {
        self.snapshots_dir().join(n.to_string()).join("particles.dat")
    }

    pub fn time_log(&self) -> PathBuf {
        self.snapshots_dir().join("timeSnapshot.dat")
    }

    pub fn units_file(&self) -> PathBuf {
        self.root.join("units.yml")
    }

    /// Numbered snapshot directories present on disk, ascending.
    pub fn snapshot_numbers(&self) -> DustResult<Vec<usize>> {
        let dir = self.snapshots_dir();
        let entries = std::fs::read_dir(&dir).map_err(|e| DustError::io(&dir, e))?;
        let mut numbers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DustError::io(&dir, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(n) = entry.file_name().to_str().and_then(|s| s.parse::<usize>().ok()) {
                numbers.push(n);
            }
        }
        numbers.sort_unstable();
        Ok(numbers)
    }
}

/// The older flat layout with `particles<N>.dat` files directly in the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyLayout {
    outdir: PathBuf,
}

impl LegacyLayout {
    pub fn new<P: AsRef<Path>>(outdir: P) -> Self {
        Self {
            outdir: outdir.as_ref().to_path_buf(),
        }
    }

    pub fn particle_file(&self, n: usize) -> PathBuf {
        self.outdir.join(format!("particles{}.dat", n))
    }

    pub fn units_file(&self) -> PathBuf {
        self.outdir.join("units.yml")
    }

    pub fn snapshot_numbers(&self) -> DustResult<Vec<usize>> {
        let entries = std::fs::read_dir(&self.outdir).map_err(|e| DustError::io(&self.outdir, e))?;
        let mut numbers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DustError::io(&self.outdir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(caps) = LEGACY_PARTICLE_FILE.captures(name) {
                if let Ok(n) = caps[1].parse::<usize>() {
                    numbers.push(n);
                }
            }
        }
        numbers.sort_unstable();
        Ok(numbers)
    }

    /// Lowest snapshot number available.
    pub fn first_snapshot(&self) -> DustResult<usize> {
        self.snapshot_numbers()?.first().copied().ok_or_else(|| {
            DustError::Invalid(format!("no particles<N>.dat files in {}", self.outdir.display()))
        })
    }
}
