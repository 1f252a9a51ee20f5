use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use dust_particles::analysis::{
    filter_by_size, mass_factors, power_law, radial_density, radial_density_weighted, InitialRadii,
    SizeSelection,
};
use dust_particles::config::AnalysisConfig;
use dust_particles::export::{export_to_file, render, ExportFormat, ExportTable};
use dust_particles::io::{LegacyLayout, SnapshotLayout};
use dust_particles::units::Unit;
use dust_particles::{
    construct_trajectories, load_snapshot, DustError, DustResult, Field, Quantity, UnitMode, UnitTable,
};

#[derive(Parser)]
#[command(name = "dust_particles", version, about = "Dust particle snapshot analysis")]
struct Cli {
    /// TOML file with default settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Attach physical units to loaded arrays
    #[arg(long, global = true)]
    units: bool,
    #[arg(short, long, global = true)]
    format: Option<ExportFormat>,
    /// Write the result here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dump the particles of one snapshot
    Snapshot {
        snapshot: usize,
        #[arg(short, long)]
        datadir: Option<PathBuf>,
        #[arg(long)]
        size: Option<f64>,
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
        size_range: Option<Vec<f64>>,
    },
    /// Time series of one particle across all snapshots
    Trajectory {
        #[arg(long)]
        id: i64,
        #[arg(short, long)]
        datadir: Option<PathBuf>,
        /// Express times in years
        #[arg(long)]
        years: bool,
    },
    /// Radial surface density of one snapshot
    Density {
        snapshot: usize,
        #[arg(short, long)]
        datadir: Option<PathBuf>,
        #[arg(short, long)]
        bins: Option<usize>,
        #[arg(long)]
        size: Option<f64>,
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
        size_range: Option<Vec<f64>>,
        /// Weight by particle mass instead of counting
        #[arg(long)]
        mass_weighted: bool,
    },
    /// Initial radii and mass weights from the flat particles<N>.dat layout
    InitialRadius {
        outdir: PathBuf,
        #[arg(long, value_delimiter = ',')]
        ids: Vec<i64>,
        #[arg(long, allow_hyphen_values = true)]
        mass_slope: Option<f64>,
    },
}

fn main() -> Result<(), String> {
    env_logger::init();
    if let Err(err) = run_cli() {
        return Err(err.to_string());
    }
    Ok(())
}

fn run_cli() -> DustResult<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AnalysisConfig::load_from_file(path)?,
        None => AnalysisConfig::default(),
    };
    let mode = if cli.units {
        UnitMode::Physical
    } else {
        config.unit_mode()
    };
    let format = cli.format.unwrap_or(config.export.format);
    let output = cli.output.clone().or_else(|| config.export.output.clone());

    let table = match cli.command {
        Command::Snapshot {
            snapshot,
            datadir,
            size,
            size_range,
        } => {
            let layout = SnapshotLayout::new(resolve_datadir(datadir, &config)?);
            let loaded = load_snapshot(&layout, snapshot, mode)?;
            log::info!(
                "snapshot {}: {} particles, {:?} coordinates",
                snapshot,
                loaded.table.len(),
                loaded.form
            );
            let particles = match size_selection(size, size_range, &config)? {
                Some(selection) => filter_by_size(&loaded.table, selection),
                None => loaded.table,
            };
            ExportTable::from_particles("snapshot", &particles).with_meta("snapshot", snapshot)
        }
        Command::Trajectory { id, datadir, years } => {
            let datadir = resolve_datadir(datadir, &config)?;
            let trajectories = construct_trajectories(&datadir, mode)?;
            let mut trajectory = trajectories
                .get(&id)
                .cloned()
                .ok_or(DustError::UnknownParticle(id))?;
            if years {
                trajectory.time = times_in_years(&trajectory.time, &datadir)?;
            }
            ExportTable::from_trajectory(id, &trajectory)
        }
        Command::Density {
            snapshot,
            datadir,
            bins,
            size,
            size_range,
            mass_weighted,
        } => {
            let layout = SnapshotLayout::new(resolve_datadir(datadir, &config)?);
            let loaded = load_snapshot(&layout, snapshot, mode)?;
            let particles = match size_selection(size, size_range, &config)? {
                Some(selection) => filter_by_size(&loaded.table, selection),
                None => loaded.table,
            };
            let bins = bins.unwrap_or(config.density.bins);
            let radii = particles.column(Field::R);
            let profile = if mass_weighted {
                radial_density_weighted(&radii, &particles.column(Field::Mass), bins)?
            } else {
                radial_density(&radii, bins)?
            };
            ExportTable::from_profile(&profile)
                .with_meta("snapshot", snapshot)
                .with_meta("particles", particles.len())
        }
        Command::InitialRadius {
            outdir,
            ids,
            mass_slope,
        } => {
            let radii = InitialRadii::load(&outdir)?;
            let ids = if ids.is_empty() { radii.ids() } else { ids };
            let r0 = match mode {
                UnitMode::Raw => Quantity::unitless(radii.lookup(&ids)?),
                UnitMode::Physical => {
                    let units = UnitTable::load(LegacyLayout::new(&outdir).units_file())?;
                    radii.lookup_in_au(&ids, &units)?
                }
            };
            let slope = mass_slope.or(config.density.mass_slope);
            let profile = slope.map(power_law);
            let factors = match &profile {
                Some(f) => mass_factors(r0.values(), Some(f))?,
                None => mass_factors(r0.values(), None)?,
            };

            let mut table = ExportTable::new("initial radius").with_meta("snapshot", radii.snapshot());
            table.push("id", &Quantity::unitless(ids.iter().map(|&id| id as f64).collect()));
            table.push("r0", &r0);
            table.push("mass_factor", &Quantity::unitless(factors));
            table
        }
    };

    match output {
        Some(path) => export_to_file(&table, format, path),
        None => {
            print!("{}", render(&table, format)?);
            Ok(())
        }
    }
}

fn resolve_datadir(datadir: Option<PathBuf>, config: &AnalysisConfig) -> DustResult<PathBuf> {
    datadir
        .or_else(|| config.data.datadir.clone())
        .ok_or_else(|| DustError::Invalid("no data directory given (--datadir or [data] datadir)".into()))
}

fn size_selection(
    size: Option<f64>,
    size_range: Option<Vec<f64>>,
    config: &AnalysisConfig,
) -> DustResult<Option<SizeSelection>> {
    match (size, size_range) {
        (Some(_), Some(_)) => Err(DustError::Invalid("use either --size or --size-range".into())),
        (Some(size), None) => Ok(Some(SizeSelection::Exact(size))),
        (None, Some(range)) => match range.as_slice() {
            &[min, max] => Ok(Some(SizeSelection::Range { min, max })),
            _ => Err(DustError::Invalid("--size-range takes MIN and MAX".into())),
        },
        (None, None) => Ok(config.density.size),
    }
}

/// Log-declared time units convert directly; untagged code-unit times need
/// the run's `units.yml`.
fn times_in_years(time: &Quantity, datadir: &Path) -> DustResult<Quantity> {
    match &time.unit {
        Some(_) => time.to_unit(&Unit::year()),
        None => {
            let units = UnitTable::load(SnapshotLayout::new(datadir).units_file())?;
            units.times_in_years(time.values())
        }
    }
}
