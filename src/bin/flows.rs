//! Command line tool to compute reaction flows
//!
//! Reads a network and a set of zones, then computes the forward and reverse
//! rates of every reaction along with the flows they drive for the
//! abundances of each zone.
//!
//! Reverse rates come from detailed balance, so only reactions whose species
//! are all in the network (and conserve baryon number, charge, and lepton
//! number) are considered.
//!
//! # Usage
//!
//! ```text
//! Usage: flows <network> <zones> [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples, default
//! values, examples, and any important behaviour.
//!
//! ## Options
//!
//! By default the temperature and density of each zone are taken from its
//! `t9` and `rho` properties.
//!
//! ```bash
//! # Flows for every zone in the file
//! flows network.xml zone_data.xml
//! ```
//!
//! ### Fix the conditions
//!
//! ```bash
//! # Use T9 = 2 and rho = 1e5 g/cc for every zone
//! flows network.xml zone_data.xml --t9 2 --rho 1e5
//! ```
//!
//! ### Select reactions
//!
//! Separate filters select the species of the network and its reactions.
//!
//! ```bash
//! # Only alpha captures on species up to oxygen
//! flows network.xml zone_data.xml    \
//!         --species "z <= 8"         \
//!         --reactions "reactant = 'he4'"
//! ```
//!
//! ### Convert to JSON file
//!
//! ```bash
//! # Output a file named 'flows.json'
//! flows network.xml zone_data.xml --json
//! ```

// standard libraries
use std::fs::File;
use std::io::BufWriter;

// crate modules
use nucnet::net::NetView;
use nucnet::utils::*;
use nucnet::zone::{Flow, Zone};
use nucnet::{read_net_xml, read_zone_xml};

// external crates
use anyhow::{anyhow, Context, Result};
use clap::{arg, Parser};
use kdam::{Bar, BarBuilder, BarExt};
use log::*;
use serde::Serialize;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+2 to make 'Info' the default)
    let verbosity = cli.verbose as usize + 2;
    logging_init(verbosity, cli.quiet);

    // Try to read the network and every zone
    info!("Reading {}", &cli.network);
    let net = read_net_xml(&cli.network, "", "")?;

    info!("Reading {}", &cli.zones);
    let zones = read_zone_xml(&cli.zones, net.nuc())?;

    let view = net.view(&cli.species, &cli.reactions)?;
    info!(
        "Using {} species and {} reactions",
        view.nuc().len(),
        view.reac().len()
    );

    let mut progress_bar = init_progress_bar(zones.len(), cli.quiet)?;
    let mut results = Vec::with_capacity(zones.len());
    for zone in &zones {
        results.push(zone_flows(zone, &view, &cli)?);
        progress_bar.update(1)?;
    }
    progress_bar.refresh()?;

    if !cli.quiet {
        eprintln!();
        for result in &results {
            print_flows(result, cli.top);
        }
    }

    if cli.json {
        write_json(&results, &cli)?;
    }

    Ok(())
}

/// Compute reaction rates and flows for zones
///
/// Forward rates come from the rate data of each reaction and reverse rates
/// from detailed balance. Flows are the rates multiplied by the abundances
/// of each zone.
///
/// Examples
/// --------
///
///  Flows for every zone
///     $ flows network.xml zone_data.xml
///
///  Fixed conditions
///     $ flows network.xml zone_data.xml --t9 2 --rho 1e5
///
///  Select species and reactions
///     $ flows network.xml zone_data.xml --species "z <= 8"
///     $ flows network.xml zone_data.xml --reactions "product = 'gamma'"
///
///  Convert to JSON
///     $ flows network.xml zone_data.xml --json --output myflows
///
/// Notes
/// -----
///
/// Reactions with user defined rates can not be evaluated from the command
/// line, so exclude them with a filter such as "rate_kind != 'user_rate'".
///
/// Any rate modification views in the zone properties scale the rates of
/// their reactions, and the energy generation rate of each zone is printed
/// alongside its flows.
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    arg_required_else_help(true),
    before_help(banner()),
    after_help(
        "Typical use: flows network.xml zone_data.xml --t9 2 --rho 1e5\n\nNOTE: --help shows more detail and examples"
    ),
    term_width(70),
    hide_possible_values(true),
    override_usage("flows <network> <zones> [options]")
)]
struct Cli {
    // * Positional
    /// Path to nuclear network file
    #[arg(name = "network")]
    network: String,

    /// Path to zone data file
    #[arg(name = "zones")]
    zones: String,

    /// Temperature in units of 10^9 K
    ///
    /// Overrides the 't9' property of every zone.
    #[arg(help_heading("Flow options"))]
    #[arg(short, long)]
    #[arg(value_name = "T9")]
    t9: Option<f64>,

    /// Density in g/cc
    ///
    /// Overrides the 'rho' property of every zone.
    #[arg(help_heading("Flow options"))]
    #[arg(short, long)]
    #[arg(value_name = "rho")]
    rho: Option<f64>,

    /// Filter expression for species
    #[arg(help_heading("Flow options"))]
    #[arg(short, long)]
    #[arg(value_name = "expr")]
    #[arg(default_value = "")]
    species: String,

    /// Filter expression for reactions
    #[arg(help_heading("Flow options"))]
    #[arg(short = 'x', long)]
    #[arg(value_name = "expr")]
    #[arg(default_value = "")]
    reactions: String,

    /// Only print the largest net flows
    #[arg(help_heading("Flow options"))]
    #[arg(short = 'n', long)]
    #[arg(value_name = "num")]
    top: Option<usize>,

    /// Generate a JSON file ('flows.json' default)
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    json: bool,

    /// Name of output file (excl. extension)
    ///
    /// Defaults to `flows.json`, and will automatically set the relevant
    /// extension.
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    output: Option<String>,

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

/// Flows of a single zone at the conditions used
#[doc(hidden)]
#[derive(Debug, Serialize)]
struct ZoneFlows {
    labels: [String; 3],
    t9: f64,
    rho: f64,
    /// Energy generation rate (erg/g/s)
    energy: f64,
    flows: Vec<Flow>,
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
    s += &f!("{:^70}\n", "Nucnet :: Reaction Flows");
    s += &f!("{:-<1$}", "", 70);
    s
}

/// Initialise the progress bar, if wanted
#[doc(hidden)]
fn init_progress_bar(total: usize, quiet: bool) -> Result<Bar> {
    BarBuilder::default()
        .total(total)
        .delay(0.0)
        .unit(" zones")
        .disable(quiet)
        .build()
        .map_err(|e| anyhow!("Could not create progress bar: {e}"))
}

#[doc(hidden)]
/// Helper function for cleaning up file IO boilerplate
fn get_writer(path: &str) -> Result<BufWriter<File>> {
    let file: File = File::create(path)?;
    debug!("New bufwriter for {path}");
    Ok(BufWriter::new(file))
}

#[doc(hidden)]
/// Conditions from the command line, falling back to the zone properties
fn condition(zone: &Zone, name: &str, given: Option<f64>) -> Result<f64> {
    match given {
        Some(value) => Ok(value),
        None => zone
            .properties()
            .get_f64(name, None, None)
            .with_context(|| f!("No {name} given for zone {zone}, use --{name}")),
    }
}

#[doc(hidden)]
fn zone_flows(zone: &Zone, view: &NetView, cli: &Cli) -> Result<ZoneFlows> {
    let t9 = condition(zone, "t9", cli.t9)?;
    let rho = condition(zone, "rho", cli.rho)?;
    let flows = zone
        .compute_flows(view, t9, rho)
        .with_context(|| f!("Could not compute flows for zone {zone}"))?;
    let energy = zone
        .energy_generation_rate_per_gram(view, t9, rho)
        .with_context(|| f!("Could not compute energy generation for zone {zone}"))?;

    Ok(ZoneFlows {
        labels: zone.labels().map(str::to_string),
        t9,
        rho,
        energy,
        flows,
    })
}

#[doc(hidden)]
/// Write the flows of every zone to json
fn write_json(results: &[ZoneFlows], cli: &Cli) -> Result<()> {
    let output = match &cli.output {
        Some(o) => f!("{o}.json"),
        None => "flows.json".to_string(),
    };

    debug!("Writing JSON format to {}", output);
    let writer = get_writer(&output)?;
    Ok(serde_json::to_writer_pretty(writer, results)?)
}

#[doc(hidden)]
/// Write a table of flows to the terminal
fn print_flows(result: &ZoneFlows, top: Option<usize>) {
    let mut flows: Vec<&Flow> = result.flows.iter().collect();
    if top.is_some() {
        flows.sort_by(|a, b| b.net().abs().total_cmp(&a.net().abs()));
    }
    let shown = top.unwrap_or(flows.len());

    let [l1, l2, l3] = &result.labels;
    let mut s = f!(
        "Zone ({l1}, {l2}, {l3}) at T9 = {}, rho = {} g/cc\n",
        result.t9,
        result.rho.sci(3, 2)
    );
    s += &f!("Energy generation rate {} erg/g/s\n", result.energy.sci(3, 2));
    s += &f!(
        "{:<45} {:>11} {:>11} {:>11} {:>11}\n",
        "reaction",
        "forward",
        "reverse",
        "f flow",
        "r flow"
    );
    for flow in flows.iter().take(shown) {
        s += &f!(
            "{:<45} {:>11} {:>11} {:>11} {:>11}\n",
            flow.reaction,
            flow.forward_rate.sci(3, 2),
            flow.reverse_rate.sci(3, 2),
            flow.forward.sci(3, 2),
            flow.reverse.sci(3, 2)
        );
    }
    println!("{s}")
}
