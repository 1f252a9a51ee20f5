// coords.rs
// Coordinate normalization for decoded particle files
//
// The adaptive particle integrator writes x/y into the r/phi slots. There
// is no format tag; a table with any negative r is taken to be Cartesian.

use ultraviolet::DVec2;

use crate::io::RawColumns;
use crate::particle::{Field, Particle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateForm {
    Polar,
    Cartesian,
}

/// Cartesian as soon as a single `r` value is negative.
pub fn detect_form(r: &[f64]) -> CoordinateForm {
    if r.iter().any(|&v| v < 0.0) {
        CoordinateForm::Cartesian
    } else {
        CoordinateForm::Polar
    }
}

/// Canonical (r, phi, x, y) from the two stored coordinate slots.
///
/// The Cartesian branch uses `atan2(x, y)` (x first), matching what the
/// existing tooling for this format computes.
pub fn canonical(form: CoordinateForm, first: f64, second: f64) -> (f64, f64, DVec2) {
    match form {
        CoordinateForm::Cartesian => {
            let (x, y) = (first, second);
            let r = (x * x + y * y).sqrt();
            let phi = x.atan2(y);
            (r, phi, DVec2::new(x, y))
        }
        CoordinateForm::Polar => {
            let (r, phi) = (first, second);
            let (sin, cos) = phi.sin_cos();
            (r, phi, DVec2::new(r * cos, r * sin))
        }
    }
}

/// Build normalized particles from raw columns.
pub fn normalize(raw: &RawColumns) -> (CoordinateForm, Vec<Particle>) {
    let r = raw.column(Field::R);
    let phi = raw.column(Field::Phi);
    let form = detect_form(r);
    log::debug!("{} particles stored in {:?} form", raw.len(), form);

    let particles = raw
        .ids
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let value = |field: Field| raw.column(field)[i];
            let (r, phi, pos) = canonical(form, r[i], phi[i]);
            Particle {
                id,
                r,
                phi,
                pos,
                r_dot: value(Field::RDot),
                phi_dot: value(Field::PhiDot),
                r_ddot: value(Field::RDdot),
                phi_ddot: value(Field::PhiDdot),
                mass: value(Field::Mass),
                size: value(Field::Size),
                timestep: value(Field::Timestep),
                facold: value(Field::Facold),
                stokes: value(Field::Stokes),
            }
        })
        .collect();
    (form, particles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::RawRecord;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn raw_with_coords(coords: &[(f64, f64)]) -> RawColumns {
        let records: Vec<RawRecord> = coords
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| {
                let mut values = [0.0; 11];
                values[0] = a;
                values[1] = b;
                values[6] = 1.0 + i as f64;
                RawRecord { id: i as i64, values }
            })
            .collect();
        RawColumns::from_records(&records)
    }

    #[test]
    fn polar_input_gets_cartesian_fields() {
        let raw = raw_with_coords(&[(2.0, 0.0), (1.0, FRAC_PI_2)]);
        let (form, particles) = normalize(&raw);
        assert_eq!(form, CoordinateForm::Polar);
        assert_relative_eq!(particles[0].pos.x, 2.0);
        assert_relative_eq!(particles[0].pos.y, 0.0);
        assert_relative_eq!(particles[1].pos.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(particles[1].pos.y, 1.0);
        assert_relative_eq!(particles[1].mass, 2.0);
    }

    #[test]
    fn a_single_negative_radius_switches_the_whole_table() {
        let mut coords: Vec<(f64, f64)> = (0..50).map(|i| (1.0 + i as f64 * 0.1, 0.5)).collect();
        coords[37] = (-0.3, 0.4);
        let raw = raw_with_coords(&coords);
        let (form, particles) = normalize(&raw);
        assert_eq!(form, CoordinateForm::Cartesian);

        // Every row is reinterpreted, including the positive ones.
        for (p, &(x, y)) in particles.iter().zip(&coords) {
            assert_relative_eq!(p.pos.x, x);
            assert_relative_eq!(p.pos.y, y);
            assert_relative_eq!(p.r, (x * x + y * y).sqrt());
            assert_relative_eq!(p.phi, x.atan2(y));
        }
        assert_relative_eq!(particles[37].r, 0.5);
    }

    #[test]
    fn zero_radius_is_not_cartesian() {
        assert_eq!(detect_form(&[0.0, 1.0, 2.0]), CoordinateForm::Polar);
        assert_eq!(detect_form(&[]), CoordinateForm::Polar);
    }

    #[test]
    fn polar_to_cartesian_round_trip() {
        for &(r, phi) in &[(1.0, 0.3), (5.2, -2.0), (0.7, 3.0), (12.0, PI / 4.0)] {
            let (_, _, pos) = canonical(CoordinateForm::Polar, r, phi);
            let (r2, phi2, pos2) = canonical(CoordinateForm::Cartesian, pos.x, pos.y);
            assert_relative_eq!(r2, r, epsilon = 1e-12);
            assert_relative_eq!(pos2.x, pos.x);
            assert_relative_eq!(pos2.y, pos.y);

            // atan2(x, y) measures the angle from the y axis.
            let mut expected = FRAC_PI_2 - phi;
            if expected > PI {
                expected -= 2.0 * PI;
            }
            assert_relative_eq!(phi2, expected, epsilon = 1e-12);
        }
    }
}
