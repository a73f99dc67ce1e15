//! Writers for the XML data formats
//!
//! Every collection can be written back out in the same format it is read
//! from. Numbers are written in full unless they are very large or very
//! small, in which case scientific notation is used.
//!
//! ```rust
//! # use nucnet::nuc::Nuc;
//! # use nucnet::species::Species;
//! let mut nuc = Nuc::new();
//! nuc.add_species(Species::new(2, 4, 2.4249, 0.0).unwrap()).unwrap();
//!
//! let xml = nuc.to_xml_string().unwrap();
//! assert!(xml.contains("<mass_excess>2.4249</mass_excess>"));
//!
//! // and back again
//! let copy = Nuc::from_xml_str(&xml).unwrap();
//! assert_eq!(copy.species_by_name("he4"), nuc.species_by_name("he4"));
//! ```

// internal modules
use crate::net::Net;
use crate::nuc::Nuc;
use crate::property::Properties;
use crate::reaction::{NonSmokerFit, RateData, Reac, Reaction};
use crate::readers::documents::*;
use crate::species::Species;
use crate::utils::*;
use crate::zone::Zone;

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// external crates
use anyhow::{Context, Result};
use itertools::Itertools;
use log::debug;
use serde::Serialize;

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Serialise a document with a declaration and two space indentation
fn to_xml<T: Serialize>(document: &T) -> Result<String> {
    let mut buffer = String::from(DECLARATION);
    let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
    serializer.indent(' ', 2);
    document.serialize(serializer)?;
    buffer.push('\n');
    Ok(buffer)
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    let file = File::create(path).with_context(|| f!("Could not create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(text.as_bytes())
        .with_context(|| f!("Could not write {}", path.display()))?;
    writer.flush()?;
    debug!("Written {}", path.display());
    Ok(())
}

/// Write species to a nuclear data file
pub fn write_nuc_xml<P: AsRef<Path>>(nuc: &Nuc, path: P) -> Result<()> {
    write_file(path.as_ref(), &nuc.to_xml_string()?)
}

/// Write reactions to a reaction data file
pub fn write_reac_xml<P: AsRef<Path>>(reac: &Reac, path: P) -> Result<()> {
    write_file(path.as_ref(), &reac.to_xml_string()?)
}

/// Write species and reactions to a nuclear network file
pub fn write_net_xml<P: AsRef<Path>>(net: &Net, path: P) -> Result<()> {
    write_file(path.as_ref(), &net.to_xml_string()?)
}

/// Write zones to a zone data file
pub fn write_zone_xml<P: AsRef<Path>>(zones: &[Zone], path: P) -> Result<()> {
    write_file(path.as_ref(), &zones_to_xml_string(zones)?)
}

/// Zones as a `zone_data` document
pub fn zones_to_xml_string(zones: &[Zone]) -> Result<String> {
    let document = ZoneData {
        zone: zones.iter().map(zone_element).collect(),
    };
    to_xml(&document)
}

/// XML output
impl Nuc {
    /// The collection as a `nuclear_data` document
    ///
    /// Species sharing a base name are written as the states of a single
    /// nuclide when there is more than one of them.
    pub fn to_xml_string(&self) -> Result<String> {
        to_xml(&nuclear_data(self))
    }
}

/// XML output
impl Reac {
    /// The collection as a `reaction_data` document, in iteration order
    pub fn to_xml_string(&self) -> Result<String> {
        to_xml(&reaction_data(self))
    }
}

/// XML output
impl Net {
    /// The network as a `nuclear_network` document
    pub fn to_xml_string(&self) -> Result<String> {
        let document = NuclearNetwork {
            nuclear_data: nuclear_data(self.nuc()),
            reaction_data: reaction_data(self.reac()),
        };
        to_xml(&document)
    }
}

fn nuclear_data(nuc: &Nuc) -> NuclearData {
    // group in rank order of the first state seen
    let groups = nuc.iter().into_group_map_by(|s| s.base_name().to_string());
    let order = nuc.iter().map(|s| s.base_name().to_string()).unique();

    let nuclides = order
        .filter_map(|base| groups.get(&base))
        .map(|group| nuclide_element(group))
        .collect();

    NuclearData { nuclides }
}

fn nuclide_element(group: &[&Species]) -> NuclideXml {
    let first = group[0];
    let mut nuclide = NuclideXml {
        z: first.z(),
        a: first.a(),
        ..Default::default()
    };

    if let [species] = group {
        nuclide.source = species.source().map(str::to_string);
        nuclide.mass_excess = Some(species.mass_excess());
        nuclide.spin = Some(species.spin());
        nuclide.partf_table = partf_element(species);
    } else {
        let state = group
            .iter()
            .map(|species| StateXml {
                id: species.state().unwrap_or_default().to_string(),
                source: species.source().map(str::to_string),
                mass_excess: Some(species.mass_excess()),
                spin: Some(species.spin()),
                partf_table: partf_element(species),
            })
            .collect();
        nuclide.states = Some(StatesXml { state });
    }

    nuclide
}

fn partf_element(species: &Species) -> Option<PartfTableXml> {
    let table = species.partf()?;
    let point = table
        .t9()
        .iter()
        .zip(table.log10_partf())
        .map(|(t9, log10_partf)| PartfPointXml {
            t9: *t9,
            log10_partf: *log10_partf,
        })
        .collect();
    Some(PartfTableXml { point })
}

fn reaction_data(reac: &Reac) -> ReactionData {
    ReactionData {
        reactions: reac.iter().map(reaction_element).collect(),
    }
}

fn reaction_element(reaction: &Reaction) -> ReactionXml {
    let mut element = ReactionXml {
        source: reaction.source().map(str::to_string),
        reactant: reaction.reactants().map(str::to_string).collect(),
        product: reaction.products().map(str::to_string).collect(),
        ..Default::default()
    };

    match reaction.rate_data() {
        Some(RateData::SingleRate(rate)) => element.single_rate = Some(*rate),
        Some(RateData::RateTable(table)) => {
            let point = (0..table.len())
                .map(|i| RatePointXml {
                    t9: table.t9()[i],
                    rate: table.rates()[i],
                    sef: Some(table.sef()[i]),
                })
                .collect();
            element.rate_table = Some(RateTableXml { point });
        }
        Some(RateData::NonSmokerFit(fits)) => {
            element.non_smoker_fit = Some(NonSmokerFitXml {
                fit: fits.iter().map(fit_element).collect(),
                ..Default::default()
            });
        }
        Some(RateData::UserRate(user)) => {
            element.user_rate = Some(UserRateXml {
                key: user.key.clone(),
                property: property_elements(&user.properties),
            });
        }
        None => (),
    }

    element
}

fn fit_element(fit: &NonSmokerFit) -> FitXml {
    let a = fit.a;
    FitXml {
        note: fit.note.clone(),
        spint: Some(fit.spint),
        spinf: Some(fit.spinf),
        tlowhf: Some(fit.tlowhf),
        tlowfit: Some(fit.tlowfit),
        thighfit: Some(fit.thighfit),
        acc: Some(fit.acc),
        a1: Some(a[0]),
        a2: Some(a[1]),
        a3: Some(a[2]),
        a4: Some(a[3]),
        a5: Some(a[4]),
        a6: Some(a[5]),
        a7: Some(a[6]),
        a8: Some(a[7]),
    }
}

fn property_elements(properties: &Properties) -> Vec<PropertyXml> {
    properties
        .iter()
        .map(|(key, value)| PropertyXml {
            name: key.name.clone(),
            tag1: key.tag1.clone(),
            tag2: key.tag2.clone(),
            value: value.to_string(),
        })
        .collect()
}

fn zone_element(zone: &Zone) -> ZoneXml {
    let [label1, label2, label3] = zone.labels().map(str::to_string);

    let optional_properties = match zone.properties().is_empty() {
        true => None,
        false => Some(OptionalPropertiesXml {
            property: property_elements(zone.properties()),
        }),
    };

    let nuclide = zone
        .abundances()
        .map(|(name, ab)| MassFractionXml {
            name: name.to_string(),
            z: ab.z,
            a: ab.a,
            x: ab.mass_fraction(),
        })
        .collect();

    ZoneXml {
        label1: Some(label1),
        label2: Some(label2),
        label3: Some(label3),
        optional_properties,
        mass_fractions: MassFractionsXml { nuclide },
    }
}
