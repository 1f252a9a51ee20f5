// particle.rs
// Per-particle state and the single-snapshot particle table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ultraviolet::DVec2;

use crate::error::DustError;
use crate::units::{Quantity, Unit, UnitMode};

/// Named numeric per-particle fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    R,
    Phi,
    RDot,
    PhiDot,
    RDdot,
    PhiDdot,
    Mass,
    Size,
    Timestep,
    Facold,
    Stokes,
    X,
    Y,
}

impl Field {
    /// The 11 floating point values of a particle record, in file order.
    pub const STORED: [Field; 11] = [
        Field::R,
        Field::Phi,
        Field::RDot,
        Field::PhiDot,
        Field::RDdot,
        Field::PhiDdot,
        Field::Mass,
        Field::Size,
        Field::Timestep,
        Field::Facold,
        Field::Stokes,
    ];

    /// Every field available on a normalized particle.
    pub const ALL: [Field; 13] = [
        Field::R,
        Field::Phi,
        Field::RDot,
        Field::PhiDot,
        Field::RDdot,
        Field::PhiDdot,
        Field::Mass,
        Field::Size,
        Field::Timestep,
        Field::Facold,
        Field::Stokes,
        Field::X,
        Field::Y,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::R => "r",
            Field::Phi => "phi",
            Field::RDot => "r_dot",
            Field::PhiDot => "phi_dot",
            Field::RDdot => "r_ddot",
            Field::PhiDdot => "phi_ddot",
            Field::Mass => "mass",
            Field::Size => "size",
            Field::Timestep => "timestep",
            Field::Facold => "facold",
            Field::Stokes => "stokes",
            Field::X => "x",
            Field::Y => "y",
        }
    }

    /// Unit carried by this field when units are attached.
    pub fn physical_unit(self) -> Option<Unit> {
        match self {
            Field::R | Field::X | Field::Y | Field::Size => Some(Unit::au()),
            Field::Phi => Some(Unit::radian()),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = DustError;

    /// Accepts both `r_dot` and the space separated `r dot` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().replace(' ', "_");
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name() == key)
            .ok_or_else(|| DustError::Invalid(format!("unknown particle field '{}'", s)))
    }
}

/// One particle in one snapshot, with canonical polar and Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: i64,
    pub r: f64,
    pub phi: f64,
    pub pos: DVec2,
    pub r_dot: f64,
    pub phi_dot: f64,
    pub r_ddot: f64,
    pub phi_ddot: f64,
    pub mass: f64,
    pub size: f64,
    pub timestep: f64,
    pub facold: f64,
    pub stokes: f64,
}

impl Particle {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::R => self.r,
            Field::Phi => self.phi,
            Field::RDot => self.r_dot,
            Field::PhiDot => self.phi_dot,
            Field::RDdot => self.r_ddot,
            Field::PhiDdot => self.phi_ddot,
            Field::Mass => self.mass,
            Field::Size => self.size,
            Field::Timestep => self.timestep,
            Field::Facold => self.facold,
            Field::Stokes => self.stokes,
            Field::X => self.pos.x,
            Field::Y => self.pos.y,
        }
    }
}

/// All particles of a single snapshot.
///
/// Column views are positional: index `i` of every column refers to
/// `particles[i]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleTable {
    pub particles: Vec<Particle>,
    pub units: UnitMode,
}

impl ParticleTable {
    pub fn new(particles: Vec<Particle>, units: UnitMode) -> Self {
        Self { particles, units }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.particles.iter().map(|p| p.id).collect()
    }

    pub fn column(&self, field: Field) -> Vec<f64> {
        self.particles.iter().map(|p| p.get(field)).collect()
    }

    /// Unit attached to `field` in this table, if any.
    pub fn unit_of(&self, field: Field) -> Option<Unit> {
        field.physical_unit().and_then(|u| self.units.tag(u))
    }

    /// A column with this table's unit metadata attached.
    pub fn quantity(&self, field: Field) -> Quantity {
        Quantity::new(self.column(field), self.unit_of(field))
    }

    /// Keep only particles matching `keep`, preserving order and units.
    pub fn retain_where<F>(&self, mut keep: F) -> ParticleTable
    where
        F: FnMut(&Particle) -> bool,
    {
        ParticleTable {
            particles: self.particles.iter().filter(|p| keep(p)).copied().collect(),
            units: self.units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_parse_both_spellings() {
        assert_eq!("r_dot".parse::<Field>().unwrap(), Field::RDot);
        assert_eq!("phi ddot".parse::<Field>().unwrap(), Field::PhiDdot);
        assert_eq!("stokes".parse::<Field>().unwrap(), Field::Stokes);
        assert!("id".parse::<Field>().is_err());
    }

    #[test]
    fn units_follow_table_mode() {
        let table = ParticleTable::new(Vec::new(), UnitMode::Physical);
        assert_eq!(table.unit_of(Field::R), Some(Unit::au()));
        assert_eq!(table.unit_of(Field::Phi), Some(Unit::radian()));
        assert_eq!(table.unit_of(Field::Mass), None);

        let raw = ParticleTable::new(Vec::new(), UnitMode::Raw);
        assert_eq!(raw.unit_of(Field::Size), None);
    }
}
