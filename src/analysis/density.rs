// analysis/density.rs
// Radial surface density from a histogram of particle radii

use std::f64::consts::TAU;

use serde::Serialize;

use crate::error::{DustError, DustResult};
use crate::particle::{Field, ParticleTable};

/// Per-bin results; all vectors have one entry per bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialProfile {
    pub density: Vec<f64>,
    pub midpoints: Vec<f64>,
    pub widths: Vec<f64>,
    /// Particle count (or summed weight) per bin.
    pub counts: Vec<f64>,
}

impl RadialProfile {
    pub fn bins(&self) -> usize {
        self.density.len()
    }
}

/// Equal-width bins spanning the data. The last bin is closed so the
/// largest radius is counted.
fn histogram(radii: &[f64], weights: Option<&[f64]>, nbins: usize) -> DustResult<(Vec<f64>, f64, f64)> {
    if nbins == 0 {
        return Err(DustError::Invalid("radial histogram needs at least one bin".into()));
    }
    if radii.is_empty() {
        return Err(DustError::Invalid("radial histogram of an empty particle set".into()));
    }
    if let Some(w) = weights {
        if w.len() != radii.len() {
            return Err(DustError::Mismatch(format!(
                "{} radii but {} weights",
                radii.len(),
                w.len()
            )));
        }
    }
    if radii.iter().any(|r| !r.is_finite()) {
        return Err(DustError::Invalid("non-finite radius in histogram input".into()));
    }

    let mut lo = radii.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = radii.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        // Radii are non-negative; keep every midpoint above the origin.
        lo = if lo >= 0.0 { (lo - 0.5).max(0.0) } else { lo - 0.5 };
        hi += 0.5;
    }
    let width = (hi - lo) / nbins as f64;
    let edge = |i: usize| lo + i as f64 * width;

    let mut counts = vec![0.0; nbins];
    for (i, &r) in radii.iter().enumerate() {
        let mut bin = (((r - lo) / width).floor() as usize).min(nbins - 1);
        // Rounding can put a value one bin off its edges.
        if bin > 0 && r < edge(bin) {
            bin -= 1;
        } else if bin + 1 < nbins && r >= edge(bin + 1) {
            bin += 1;
        }
        counts[bin] += weights.map_or(1.0, |w| w[i]);
    }
    Ok((counts, lo, width))
}

fn profile_from_counts(counts: Vec<f64>, lo: f64, width: f64) -> RadialProfile {
    let nbins = counts.len();
    let midpoints: Vec<f64> = (0..nbins).map(|i| lo + (i as f64 + 0.5) * width).collect();
    let density = counts
        .iter()
        .zip(&midpoints)
        .map(|(&count, &mid)| count / (width * mid * TAU))
        .collect();
    RadialProfile {
        density,
        midpoints,
        widths: vec![width; nbins],
        counts,
    }
}

/// Number surface density per radial annulus.
pub fn radial_density(radii: &[f64], nbins: usize) -> DustResult<RadialProfile> {
    let (counts, lo, width) = histogram(radii, None, nbins)?;
    Ok(profile_from_counts(counts, lo, width))
}

/// Surface density with a per-particle weight, e.g. mass.
pub fn radial_density_weighted(radii: &[f64], weights: &[f64], nbins: usize) -> DustResult<RadialProfile> {
    let (counts, lo, width) = histogram(radii, Some(weights), nbins)?;
    Ok(profile_from_counts(counts, lo, width))
}

/// Number surface density of a particle table's radii.
pub fn table_radial_density(table: &ParticleTable, nbins: usize) -> DustResult<RadialProfile> {
    radial_density(&table.column(Field::R), nbins)
}
