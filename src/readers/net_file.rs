//! Reader for `nuclear_network` XML files

// internal modules
use crate::net::Net;
use crate::nuc::Nuc;
use crate::reaction::Reac;
use crate::readers::documents::NuclearNetwork;
use crate::readers::{NucReader, ReacReader};
use crate::utils::*;

// standard library
use std::path::Path;

// external crates
use anyhow::{Context, Result};
use log::debug;

/// Reads a network from a `nuclear_network` document
///
/// The document holds a `nuclear_data` element and a `reaction_data`
/// element, each read as by [NucReader] and [ReacReader] with their own
/// filters.
#[derive(Debug, Default)]
pub struct NetReader {
    nuc_reader: NucReader,
    reac_reader: ReacReader,
}

/// High level methods
impl NetReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Setter for the predicate used to select species
    pub fn set_nuc_filter(&mut self, filter: &str) -> Result<()> {
        self.nuc_reader.set_filter(filter)
    }

    /// Setter for the predicate used to select reactions
    pub fn set_reac_filter(&mut self, filter: &str) -> Result<()> {
        self.reac_reader.set_filter(filter)
    }

    pub fn parse(&self, path: &Path) -> Result<Net> {
        debug!("Reading network from {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| f!("Could not read {}", path.display()))?;
        self.parse_str(&text)
            .with_context(|| f!("Could not parse network in {}", path.display()))
    }

    pub fn parse_str(&self, text: &str) -> Result<Net> {
        let document: NuclearNetwork = quick_xml::de::from_str(text)?;

        let mut nuc = Nuc::new();
        self.nuc_reader
            .update_from_document(&mut nuc, document.nuclear_data)?;

        let mut reac = Reac::new();
        self.reac_reader
            .update_from_document(&mut reac, document.reaction_data)?;

        Ok(Net::new(nuc, reac))
    }
}

/// XML input
impl Net {
    /// Network of everything in a `nuclear_network` document
    pub fn from_xml_str(text: &str) -> Result<Net> {
        NetReader::new().parse_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"<nuclear_network>
  <nuclear_data>
    <nuclide><z>1</z><a>1</a><mass_excess>7.289</mass_excess><spin>0.5</spin></nuclide>
    <nuclide><z>0</z><a>1</a><mass_excess>8.0713</mass_excess><spin>0.5</spin></nuclide>
    <nuclide><z>1</z><a>2</a><mass_excess>13.1357</mass_excess><spin>1</spin></nuclide>
  </nuclear_data>
  <reaction_data>
    <reaction>
      <reactant>h1</reactant><reactant>n</reactant>
      <product>h2</product><product>gamma</product>
      <single_rate>4.4e4</single_rate>
    </reaction>
    <reaction>
      <reactant>n</reactant>
      <product>h1</product><product>electron</product><product>anti-neutrino_e</product>
      <single_rate>1.5e-3</single_rate>
    </reaction>
  </reaction_data>
</nuclear_network>"#;

    #[test]
    fn reads_both_parts() {
        let net = Net::from_xml_str(DATA).unwrap();
        assert_eq!(net.nuc().len(), 3);
        assert_eq!(net.reac().len(), 2);
        for reaction in net.reac().iter() {
            assert!(net.is_valid_reaction(reaction));
        }
    }

    #[test]
    fn separate_filters() {
        let mut reader = NetReader::new();
        reader.set_nuc_filter("z = 1").unwrap();
        reader.set_reac_filter("product = 'gamma'").unwrap();
        let net = reader.parse_str(DATA).unwrap();
        assert_eq!(net.nuc().len(), 2);
        assert_eq!(net.reac().len(), 1);

        // the capture needs the neutron, which was filtered out
        let capture = net.reac().iter().next().unwrap();
        assert!(!net.is_valid_reaction(capture));
    }
}
