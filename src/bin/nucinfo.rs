//! Command line tool to inspect and convert nuclear data files
//!
//! Reads the species of a `nuclear_data` file (or the species part of a
//! `nuclear_network` file) and prints a table of their properties, skipping
//! the need to dig through the XML by hand.
//!
//! Species may be selected with a filter and sorted by any of the common
//! keys. The selection can be written back out as XML or converted to JSON.
//!
//! # Usage
//!
//! ```text
//! Usage: nucinfo <file> [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples, default
//! values, examples, and any important behaviour.
//!
//! ## Options
//!
//! By default a table of every species is printed along with a short summary
//! of the collection.
//!
//! ```bash
//! # Print every species in the file
//! nucinfo nuclear_data.xml
//! ```
//!
//! ### Select species
//!
//! The `--filter` expression is evaluated against every species, with
//! fields such as `z`, `a`, `n`, `name`, `state`, `source`, `mass_excess`,
//! and `spin`.
//!
//! ```bash
//! # Print only the isotopes of carbon and nitrogen
//! nucinfo nuclear_data.xml --filter "z = 6 or z = 7"
//! ```
//!
//! ### Sort species
//!
//! Species are ranked by Z, then A, then name unless another key is given.
//!
//! ```bash
//! # Most bound species first
//! nucinfo nuclear_data.xml --sort mass_excess
//! ```
//!
//! ### Convert to XML or JSON
//!
//! ```bash
//! # Output files named 'light.xml' and 'light.json'
//! nucinfo nuclear_data.xml --filter "z <= 8" --xml light.xml --json light.json
//! ```

// standard libraries
use std::cmp::Ordering;
use std::fs::File;
use std::io::BufWriter;

// crate modules
use nucnet::nuc::{Nuc, SpeciesCompare};
use nucnet::read_nuc_xml;
use nucnet::readers::NetReader;
use nucnet::species::Species;
use nucnet::utils::*;

// external crates
use anyhow::Result;
use clap::{arg, Parser, ValueEnum};
use log::*;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+2 to make 'Info' the default)
    let verbosity = cli.verbose as usize + 2;
    logging_init(verbosity, cli.quiet);

    // Try to read the species, from either kind of file
    info!("Reading {}", &cli.file);
    let mut nuc = read_species(&cli)?;

    // Rank by the requested key
    if let Some(key) = cli.sort {
        debug!("Sorting by {key:?}");
        nuc.set_species_compare(key.compare_fn());
    }

    // Print the table and summary to the terminal for reference
    if !cli.quiet {
        print_table(&nuc);
        print_summary(&nuc)?;
    }

    if let Some(path) = &cli.xml {
        info!("Writing XML to {path}");
        nucnet::write_nuc_xml(&nuc, path)?;
    }

    if let Some(path) = &cli.json {
        write_json(&nuc, path)?;
    }

    Ok(())
}

/// Inspect nuclear data files
///
/// Prints a table of the species in a nuclear data file, optionally
/// filtered and sorted, with a summary of the collection.
///
/// Network files are also accepted with --network, in which case only the
/// species are considered.
///
/// Examples
/// --------
///
///  Print every species
///     $ nucinfo nuclear_data.xml
///
///  Select and sort species
///     $ nucinfo nuclear_data.xml --filter "z <= 8"
///     $ nucinfo nuclear_data.xml --sort mass_excess
///
///  Convert the selection
///     $ nucinfo nuclear_data.xml --filter "a > 20" --xml heavy.xml
///     $ nucinfo nuclear_data.xml --json species.json
///
/// Notes
/// -----
///
/// Filters are written as simple comparisons of fields joined with 'and',
/// 'or', and 'not(...)'. Text values are quoted, e.g. "source = 'ame2003'".
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    arg_required_else_help(true),
    before_help(banner()),
    after_help(
        "Typical use: nucinfo nuclear_data.xml --filter \"z <= 8\"\n\nNOTE: --help shows more detail and examples"
    ),
    term_width(70),
    hide_possible_values(true),
    override_usage("nucinfo <file> [options]")
)]
struct Cli {
    // * Positional
    /// Path to nuclear data file
    #[arg(name = "file")]
    file: String,

    /// Read the species of a nuclear network file instead
    #[arg(help_heading("Input options"))]
    #[arg(short, long)]
    network: bool,

    /// Filter expression for species
    ///
    /// Only species matching the expression are kept, e.g. "z = 26 and n >
    /// z". Everything is kept by default.
    #[arg(help_heading("Input options"))]
    #[arg(short, long)]
    #[arg(value_name = "expr")]
    #[arg(default_value = "")]
    filter: String,

    /// Sort species by a key
    ///
    /// Species are ranked by Z, then A, then name by default. Options are
    /// 'z', 'a', 'n', 'name', and 'mass_excess'.
    #[arg(help_heading("Input options"))]
    #[arg(short, long)]
    #[arg(value_enum)]
    #[arg(value_name = "key")]
    sort: Option<SortKey>,

    /// Write the selection to a nuclear data XML file
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    xml: Option<String>,

    /// Write the selection to a JSON file
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    json: Option<String>,

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

/// Keys available for ranking species
#[doc(hidden)]
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortKey {
    Z,
    A,
    N,
    Name,
    #[value(name = "mass_excess")]
    MassExcess,
}

impl SortKey {
    fn compare_fn(self) -> SpeciesCompare {
        match self {
            SortKey::Z => by_z,
            SortKey::A => by_a,
            SortKey::N => by_n,
            SortKey::Name => by_name,
            SortKey::MassExcess => by_mass_excess,
        }
    }
}

fn by_z(l: &Species, r: &Species) -> Ordering {
    l.z().cmp(&r.z()).then(by_name(l, r))
}

fn by_a(l: &Species, r: &Species) -> Ordering {
    l.a().cmp(&r.a()).then(by_name(l, r))
}

fn by_n(l: &Species, r: &Species) -> Ordering {
    l.n().cmp(&r.n()).then(by_name(l, r))
}

fn by_name(l: &Species, r: &Species) -> Ordering {
    l.name().cmp(r.name())
}

fn by_mass_excess(l: &Species, r: &Species) -> Ordering {
    l.mass_excess()
        .total_cmp(&r.mass_excess())
        .then(by_name(l, r))
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
    s += &f!("{:^70}\n", "Nucnet :: Nuclear Data Inspector");
    s += &f!("{:-<1$}", "", 70);
    s
}

#[doc(hidden)]
/// Helper function for cleaning up file IO boilerplate
fn get_writer(path: &str) -> Result<BufWriter<File>> {
    let file: File = File::create(path)?;
    debug!("New bufwriter for {path}");
    Ok(BufWriter::new(file))
}

#[doc(hidden)]
/// Read the selected species from whichever kind of file was given
fn read_species(cli: &Cli) -> Result<Nuc> {
    if !cli.network {
        return read_nuc_xml(&cli.file, &cli.filter);
    }

    let mut reader = NetReader::new();
    reader.set_nuc_filter(&cli.filter)?;
    reader.set_reac_filter("")?;
    let (nuc, _) = reader.parse(std::path::Path::new(&cli.file))?.into_parts();
    Ok(nuc)
}

#[doc(hidden)]
/// Write the species to json
fn write_json(nuc: &Nuc, path: &str) -> Result<()> {
    debug!("Writing JSON format to {}", path);
    let writer = get_writer(path)?;
    Ok(serde_json::to_writer_pretty(writer, nuc.species())?)
}

#[doc(hidden)]
/// Write a table of species to the terminal
fn print_table(nuc: &Nuc) {
    let mut s = f!(
        "{:>6} {:<8} {:>4} {:>4} {:>4} {:>13} {:>5}  {}\n",
        "index",
        "name",
        "Z",
        "A",
        "N",
        "mass excess",
        "spin",
        "partf"
    );
    for species in nuc {
        s += &f!(
            "{:>6} {:<8} {:>4} {:>4} {:>4} {:>13} {:>5}  {}\n",
            species.index(),
            species.name(),
            species.z(),
            species.a(),
            species.n(),
            species.mass_excess().sci(5, 2),
            species.spin(),
            match species.partf() {
                Some(table) => f!("{} points", table.len()),
                None => "-".to_string(),
            }
        );
    }
    print!("{s}")
}

#[doc(hidden)]
/// Write summary to the terminal
fn print_summary(nuc: &Nuc) -> Result<()> {
    let mut s = "\nSummary of species\n".to_string();
    s += &f!("species : {}\n", nuc.len());
    s += &f!("max Z   : {}\n", nuc.largest_nucleon_number("z")?);
    s += &f!("max A   : {}\n", nuc.largest_nucleon_number("a")?);
    s += &f!("max N   : {}\n", nuc.largest_nucleon_number("n")?);

    let names = nuc.iter().map(|s| s.name()).collect::<Vec<&str>>().join(" ");
    s += &f!("\n{}", textwrap::fill(&names, 70));
    println!("{s}");
    Ok(())
}
