#![doc(hidden)]
//! Library of readers for the XML data formats

// internal modules
use crate::net::Net;
use crate::nuc::Nuc;
use crate::reaction::Reac;
use crate::zone::Zone;

// standard library
use std::path::Path;

// external crates
use anyhow::Result;

// files under the readers module
pub(crate) mod documents;
mod net_file;
mod nuc_file;
mod reac_file;
mod zone_file;

// inline important the reader modules for a nice API
#[doc(inline)]
pub use crate::readers::net_file::NetReader;

#[doc(inline)]
pub use crate::readers::nuc_file::NucReader;

#[doc(inline)]
pub use crate::readers::reac_file::ReacReader;

#[doc(inline)]
pub use crate::readers::zone_file::ZoneReader;

/// Read species from a nuclear data file
///
/// Returns a result containing a [Nuc] of every species in the file at
/// `path` that satisfies `filter`.
///
/// - `path` - Path to the XML file, can be [&str], [String], [Path], etc...
/// - `filter` - Predicate to select species, empty for everything
///
/// Example
/// ```ignore
/// // Read only the light species from the file
/// let nuc: Nuc = nucnet::read_nuc_xml("path/to/nuclear_data.xml", "z <= 10")?;
/// ```
pub fn read_nuc_xml<P: AsRef<Path>>(path: P, filter: &str) -> Result<Nuc> {
    let path: &Path = Path::new(path.as_ref());
    let mut reader = NucReader::new();
    reader.set_filter(filter)?;
    reader.parse(path)
}

/// Read reactions from a reaction data file
///
/// Returns a result containing a [Reac] of every reaction in the file at
/// `path` that satisfies `filter`.
///
/// Example
/// ```ignore
/// // Read every alpha capture
/// let reac: Reac = nucnet::read_reac_xml("path/to/reaction_data.xml", "reactant = 'he4'")?;
/// ```
pub fn read_reac_xml<P: AsRef<Path>>(path: P, filter: &str) -> Result<Reac> {
    let path: &Path = Path::new(path.as_ref());
    let mut reader = ReacReader::new();
    reader.set_filter(filter)?;
    reader.parse(path)
}

/// Read a network from a nuclear network file
///
/// The species and reactions are selected with separate filters. Note that
/// reactions are kept even if some of their species were filtered out, use
/// a [NetView](crate::net::NetView) to restrict them to valid reactions.
///
/// Example
/// ```ignore
/// let net: Net = nucnet::read_net_xml("path/to/network.xml", "z <= 26", "")?;
/// ```
pub fn read_net_xml<P: AsRef<Path>>(path: P, nuc_filter: &str, reac_filter: &str) -> Result<Net> {
    let path: &Path = Path::new(path.as_ref());
    let mut reader = NetReader::new();
    reader.set_nuc_filter(nuc_filter)?;
    reader.set_reac_filter(reac_filter)?;
    reader.parse(path)
}

/// Read every zone in a zone data file
///
/// Species in the mass fractions are checked against `nuc`.
///
/// Example
/// ```ignore
/// let zones: Vec<Zone> = nucnet::read_zone_xml("path/to/zone_data.xml", net.nuc())?;
/// ```
pub fn read_zone_xml<P: AsRef<Path>>(path: P, nuc: &Nuc) -> Result<Vec<Zone>> {
    let path: &Path = Path::new(path.as_ref());
    ZoneReader::new().parse(path, nuc)
}
