//! Command line tool to tabulate partition functions
//!
//! Prints the partition functions of chosen species over a list of
//! temperatures, interpolated from the tables in a nuclear data file in the
//! same way as any rate calculation would see them.
//!
//! # Usage
//!
//! ```text
//! Usage: partf <file> <species>... [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples, default
//! values, examples, and any important behaviour.
//!
//! ## Options
//!
//! By default the partition functions are given at a standard set of
//! temperatures between T9 = 0.1 and T9 = 10.
//!
//! ```bash
//! # Partition functions of iron-56 and sodium-22
//! partf nuclear_data.xml fe56 na22
//! ```
//!
//! ### Choose temperatures
//!
//! ```bash
//! # Only at T9 = 1, 2, and 5
//! partf nuclear_data.xml fe56 --t9 1 2 5
//! ```
//!
//! ### NSE factors and binding energies
//!
//! Giving a density adds the NSE factor of each species at every
//! temperature. Both this and `--binding` need the free nucleons (`n` and
//! `h1`) to be in the file.
//!
//! ```bash
//! # NSE factors at a density of 1e7 g/cc
//! partf nuclear_data.xml fe56 --rho 1e7 --binding
//! ```

// crate modules
use nucnet::nuc::Nuc;
use nucnet::read_nuc_xml;
use nucnet::species::Species;
use nucnet::utils::*;

// external crates
use anyhow::{anyhow, Result};
use clap::{arg, Parser};
use log::*;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+2 to make 'Info' the default)
    let verbosity = cli.verbose as usize + 2;
    logging_init(verbosity, cli.quiet);

    // Read everything, the nucleons may be needed even if not asked for
    info!("Reading {}", &cli.file);
    let nuc = read_nuc_xml(&cli.file, "")?;

    let species = cli
        .species
        .iter()
        .map(|name| {
            nuc.species_by_name(name)
                .ok_or_else(|| anyhow!("Species {name} is not in {}", cli.file))
        })
        .collect::<Result<Vec<&Species>>>()?;

    if cli.binding {
        print_binding(&nuc, &species)?;
    }

    print_partf(&species, &cli.t9)?;

    if let Some(rho) = cli.rho {
        print_nse(&nuc, &species, &cli.t9, rho)?;
    }

    Ok(())
}

/// Tabulate partition functions of species
///
/// Partition functions are interpolated from the tables in a nuclear data
/// file. Species with no table have a constant partition function equal to
/// the ground state weight 2J+1.
///
/// Examples
/// --------
///
///  Partition functions at default temperatures
///     $ partf nuclear_data.xml fe56 na22
///
///  Partition functions at chosen temperatures
///     $ partf nuclear_data.xml fe56 --t9 0.5 1 2
///
///  Include NSE factors and binding energies
///     $ partf nuclear_data.xml fe56 --rho 1e7 --binding
///
/// Notes
/// -----
///
/// Temperatures outside a table take the value at the nearest end of the
/// table rather than extrapolating.
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    arg_required_else_help(true),
    before_help(banner()),
    after_help(
        "Typical use: partf nuclear_data.xml fe56 --t9 1 2 5\n\nNOTE: --help shows more detail and examples"
    ),
    term_width(70),
    hide_possible_values(true),
    override_usage("partf <file> <species>... [options]")
)]
struct Cli {
    // * Positional
    /// Path to nuclear data file
    #[arg(name = "file")]
    file: String,

    /// Names of species to tabulate
    #[arg(name = "species")]
    #[arg(required = true)]
    species: Vec<String>,

    /// Temperatures in units of 10^9 K
    ///
    /// Defaults to a standard set between 0.1 and 10.
    #[arg(help_heading("Partition function options"))]
    #[arg(short, long)]
    #[arg(value_name = "T9")]
    #[arg(num_args(1..))]
    #[arg(default_values_t = [0.1, 0.5, 1.0, 2.0, 5.0, 10.0])]
    t9: Vec<f64>,

    /// Density in g/cc for NSE factors
    #[arg(help_heading("Partition function options"))]
    #[arg(short, long)]
    #[arg(value_name = "rho")]
    rho: Option<f64>,

    /// Print binding energies of the species
    #[arg(help_heading("Partition function options"))]
    #[arg(short, long)]
    binding: bool,

    // * Flags
    /// Verbose logging (-v, -vv)
    ///
    /// If specified, the default log level of INFO is increased to DEBUG (-v)
    /// or TRACE (-vv). Errors and Warnings are always logged unless in quiet
    /// (-q) mode.
    #[arg(short, long)]
    #[arg(action = clap::ArgAction::Count)]
    verbose: u8,

    /// Supress all log output (overrules --verbose)
    #[arg(short, long)]
    quiet: bool,
}

/// Sets up logging at runtime to allow for multiple verbosity levels
#[doc(hidden)]
fn logging_init(verbosity: usize, quiet: bool) {
    let result = stderrlog::new()
        .modules(vec![module_path!(), "nucnet"])
        .quiet(quiet)
        .verbosity(verbosity)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init();

    if let Err(e) = result {
        eprintln!("Logging already initialised: {e}");
    }
}

/// Creates a banner for the command line
#[doc(hidden)]
fn banner() -> String {
    let mut s = f!("{:-<1$}\n", "", 70);
    s += &f!("{:^70}\n", "Nucnet :: Partition Functions");
    s += &f!("{:-<1$}", "", 70);
    s
}

#[doc(hidden)]
/// Header row of species names
fn header(species: &[&Species]) -> String {
    let mut s = f!("{:>10}", "T9");
    for sp in species {
        s += &f!("{:>13}", sp.name());
    }
    s
}

#[doc(hidden)]
fn print_partf(species: &[&Species], t9: &[f64]) -> Result<()> {
    let mut s = "Partition functions\n".to_string();
    s += &f!("{}\n", header(species));
    for t in t9 {
        s += &f!("{:>10}", t);
        for sp in species {
            s += &f!("{:>13}", sp.partition_function(*t)?.sci(4, 2));
        }
        s += "\n";
    }
    println!("{s}");
    Ok(())
}

#[doc(hidden)]
fn print_nse(nuc: &Nuc, species: &[&Species], t9: &[f64], rho: f64) -> Result<()> {
    debug!("NSE factors at rho = {rho}");
    let mut s = f!("NSE factors at rho = {} g/cc\n", rho.sci(3, 2));
    s += &f!("{}\n", header(species));
    for t in t9 {
        s += &f!("{:>10}", t);
        for sp in species {
            s += &f!("{:>13}", nuc.nse_factor(sp, *t, rho)?.sci(4, 2));
        }
        s += "\n";
    }
    println!("{s}");
    Ok(())
}

#[doc(hidden)]
fn print_binding(nuc: &Nuc, species: &[&Species]) -> Result<()> {
    let mut s = "Binding energies\n".to_string();
    for sp in species {
        let binding = nuc.binding_energy(sp)?;
        s += &f!(
            "{:>10} {:>13} MeV {:>13} MeV/nucleon\n",
            sp.name(),
            binding.sci(5, 2),
            (binding / sp.a() as f64).sci(5, 2)
        );
    }
    println!("{s}");
    Ok(())
}
