//! Derive DIS kinematics from a generator particle list
//!
//! ```bash
//! dat2tuple lepto_out.dat thrown
//! # writes thrown.electrons.tsv and thrown.hadrons.tsv
//! dat2tuple --beam-energy 10.6 --mass 2212=0.93827 --keep 22 lepto_out.dat thrown
//! ```

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{info, warn};
use particle_id::ParticleID;

use diskin::{
    beam::DEFAULT_BEAM_ENERGY,
    dat::DatReader,
    derive_into,
    error::ConfigError,
    mass::MassTable,
    tuple::{Table, TsvSink},
    BeamConfig, DispatchStats, Selection,
};

/// Compute lepton and hadron kinematics for every event in a particle list
#[derive(Parser, Debug)]
#[command(name = "dat2tuple")]
#[command(version)]
struct Args {
    /// Input file, one particle per line:
    /// event_index PID parent_PID Px Py Pz E x y z
    input: PathBuf,

    /// Output prefix, tables are written to <OUTPUT>.electrons.tsv and <OUTPUT>.hadrons.tsv
    output: PathBuf,

    /// Beam energy in GeV
    #[arg(long, default_value_t = DEFAULT_BEAM_ENERGY)]
    beam_energy: f64,

    /// Override a particle mass, e.g. 2212=0.938
    #[arg(long, value_parser = parse_mass, allow_negative_numbers = true)]
    mass: Vec<(i32, f64)>,

    /// Process particles of this type as hadrons even if excluded by default
    #[arg(long, allow_negative_numbers = true)]
    keep: Vec<i32>,

    /// Never process particles of this type as hadrons
    #[arg(long, allow_negative_numbers = true)]
    exclude: Vec<i32>,

    /// Process events in parallel
    #[cfg(feature = "rayon")]
    #[arg(long)]
    parallel: bool,
}

fn parse_mass(s: &str) -> Result<(i32, f64), ConfigError> {
    let err = || ConfigError::MassOverride(s.to_owned());
    let (pid, mass) = s.split_once('=').ok_or_else(err)?;
    let pid = pid.trim().parse().map_err(|_| err())?;
    let mass = mass.trim().parse().map_err(|_| err())?;
    Ok((pid, mass))
}

fn table_path(prefix: &Path, table: Table) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(format!(".{}.tsv", table.name()));
    path.into()
}

fn create(path: &Path) -> Result<BufWriter<File>, Box<dyn std::error::Error>> {
    let file = File::create(path).map_err(|err| format!("{}: {err}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut masses = MassTable::default();
    for (pid, mass) in args.mass.iter().copied() {
        masses = masses.with_mass(ParticleID::new(pid), mass)?;
    }
    let beam = BeamConfig::new(args.beam_energy)?.with_masses(masses);
    let mut selection = Selection::default();
    for pid in args.keep.iter().copied() {
        selection = selection.keep(ParticleID::new(pid));
    }
    for pid in args.exclude.iter().copied() {
        selection = selection.exclude(ParticleID::new(pid));
    }

    let input = File::open(&args.input)
        .map_err(|err| format!("{}: {err}", args.input.display()))?;
    let records = DatReader::new(BufReader::new(input));

    let electrons = table_path(&args.output, Table::Electrons);
    let hadrons = table_path(&args.output, Table::Hadrons);
    let mut sink = TsvSink::new(create(&electrons)?, create(&hadrons)?)?;

    info!(
        "Reading {} with beam energy {} GeV",
        args.input.display(),
        beam.energy()
    );

    #[cfg(feature = "rayon")]
    let stats = if args.parallel {
        derive_parallel_into(&beam, &selection, records, &mut sink)?
    } else {
        derive_into(&beam, &selection, records, &mut sink)?
    };
    #[cfg(not(feature = "rayon"))]
    let stats = derive_into(&beam, &selection, records, &mut sink)?;

    report(&stats);
    info!("Wrote {} and {}", electrons.display(), hadrons.display());
    Ok(())
}

#[cfg(feature = "rayon")]
fn derive_parallel_into<I, S>(
    beam: &BeamConfig,
    selection: &Selection,
    records: I,
    sink: &mut S,
) -> Result<DispatchStats, diskin::Error>
where
    I: IntoIterator<Item = Result<diskin::ParticleRecord, diskin::Error>>,
    S: diskin::tuple::Sink,
{
    use diskin::{dispatch::derive_parallel, tuple::Row};

    let records: Vec<_> = records.into_iter().collect::<Result<_, _>>()?;
    let (derived, stats) = derive_parallel(beam, selection, &records);
    for derived in &derived {
        sink.fill(&Row::from(derived))?;
    }
    sink.flush()?;
    Ok(stats)
}

fn report(stats: &DispatchStats) {
    info!(
        "Processed {} records: {} scattered leptons, {} hadrons, {} excluded",
        stats.records, stats.leptons, stats.hadrons, stats.excluded
    );
    if stats.unpaired > 0 {
        warn!(
            "Skipped {} hadrons in events without a scattered lepton",
            stats.unpaired
        );
    }
    if stats.degenerate > 0 {
        info!(
            "{} records have undefined quantities, see the flags column",
            stats.degenerate
        );
    }
}
