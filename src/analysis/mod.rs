// analysis/mod.rs
// Quantities derived from loaded snapshots and trajectories

pub mod density;
pub mod initial_radius;
pub mod mass_profile;
pub mod size_filter;

pub use density::{radial_density, radial_density_weighted, table_radial_density, RadialProfile};
pub use initial_radius::InitialRadii;
pub use mass_profile::{mass_factors, power_law, scale_masses};
pub use size_filter::{filter_by_size, SizeSelection};
