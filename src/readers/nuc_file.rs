//! Reader for `nuclear_data` XML files

// internal modules
use crate::filter::Filter;
use crate::nuc::Nuc;
use crate::readers::documents::{NuclearData, NuclideXml, PartfTableXml};
use crate::species::{PartfTable, Species};
use crate::utils::*;

// standard library
use std::path::Path;

// external crates
use anyhow::{bail, Context, Result};
use log::{debug, trace};

/// Reads species from a `nuclear_data` document into a [Nuc]
///
/// Only species matching the filter are kept, which selects everything by
/// default. Species are added with [Nuc::update_species], so a file may
/// replace data already in the collection.
///
/// Example:
/// ```ignore
///     let mut reader = NucReader::new();
///     reader.set_filter("z <= 30")?;
///     let nuc = reader.parse(Path::new("nuclear_data.xml"))?;
/// ```
#[derive(Debug, Default)]
pub struct NucReader {
    /// Predicate the species must satisfy
    filter: Filter,
}

/// High level methods
impl NucReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Setter for the predicate used to select species
    pub fn set_filter(&mut self, filter: &str) -> Result<()> {
        self.filter = Filter::new(filter)?;
        Ok(())
    }

    /// Read every selected species from the file at `path`
    pub fn parse(&self, path: &Path) -> Result<Nuc> {
        let mut nuc = Nuc::new();
        self.update(&mut nuc, path)?;
        Ok(nuc)
    }

    /// Read the selected species from the file at `path` into `nuc`
    pub fn update(&self, nuc: &mut Nuc, path: &Path) -> Result<()> {
        debug!("Reading nuclear data from {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| f!("Could not read {}", path.display()))?;
        self.update_from_str(nuc, &text)
            .with_context(|| f!("Could not parse nuclear data in {}", path.display()))
    }

    /// Read every selected species from XML text
    pub fn parse_str(&self, text: &str) -> Result<Nuc> {
        let mut nuc = Nuc::new();
        self.update_from_str(&mut nuc, text)?;
        Ok(nuc)
    }

    pub fn update_from_str(&self, nuc: &mut Nuc, text: &str) -> Result<()> {
        let document: NuclearData = quick_xml::de::from_str(text)?;
        self.update_from_document(nuc, document)
    }

    pub(crate) fn update_from_document(&self, nuc: &mut Nuc, document: NuclearData) -> Result<()> {
        for nuclide in document.nuclides {
            for species in Self::nuclide_species(nuclide)? {
                if self.filter.matches(&species)? {
                    trace!("Read {}", species.name());
                    nuc.update_species(species)?;
                }
            }
        }
        debug!("Collection now holds {} species", nuc.len());
        Ok(())
    }
}

/// Conversion of document elements
impl NucReader {
    /// All species described by a `nuclide` element
    ///
    /// A `states` block with a single state describes the plain nuclide, as
    /// there is nothing else for the state to be distinguished from.
    ///
    /// Names are always derived from Z and A, so a `name` attribute that
    /// disagrees with them is an error.
    fn nuclide_species(nuclide: NuclideXml) -> Result<Vec<Species>> {
        let (z, a) = (nuclide.z, nuclide.a);

        let species = match nuclide.states {
            None => vec![Self::species(
                z,
                a,
                None,
                nuclide.source,
                nuclide.mass_excess,
                nuclide.spin,
                nuclide.partf_table,
            )?],
            Some(states) => {
                let single = states.state.len() == 1;
                states
                    .state
                    .into_iter()
                    .map(|state| {
                        let id = (!single).then_some(state.id);
                        Self::species(
                            z,
                            a,
                            id,
                            state.source,
                            state.mass_excess,
                            state.spin,
                            state.partf_table,
                        )
                    })
                    .collect::<Result<Vec<Species>>>()?
            }
        };

        if let (Some(name), Some(first)) = (&nuclide.name, species.first()) {
            if name.trim() != first.base_name() {
                bail!(
                    "Nuclide named \"{}\" has Z = {z}, A = {a}, expected \"{}\"",
                    name.trim(),
                    first.base_name()
                );
            }
        }

        Ok(species)
    }

    fn species(
        z: u32,
        a: u32,
        state: Option<String>,
        source: Option<String>,
        mass_excess: Option<f64>,
        spin: Option<f64>,
        partf: Option<PartfTableXml>,
    ) -> Result<Species> {
        let mut species = Species::new(z, a, mass_excess.unwrap_or(0.0), spin.unwrap_or(0.0))
            .with_context(|| f!("Invalid nuclide Z = {z}, A = {a}"))?;

        if let Some(state) = state {
            species = species.with_state(&state);
        }

        if let Some(source) = source {
            species = species.with_source(source.trim());
        }

        if let Some(table) = partf {
            if !table.point.is_empty() {
                let (t9, log10_partf) = table.point.iter().map(|p| (p.t9, p.log10_partf)).unzip();
                let table = PartfTable::new(t9, log10_partf)
                    .with_context(|| f!("Invalid partition function for {}", species.name()))?;
                species = species.with_partf(table);
            }
        }

        Ok(species)
    }
}

/// XML input
impl Nuc {
    /// Collection of every species in a `nuclear_data` document
    ///
    /// ```rust
    /// # use nucnet::nuc::Nuc;
    /// let nuc = Nuc::from_xml_str(
    ///     r#"<nuclear_data>
    ///          <nuclide><z>2</z><a>4</a><mass_excess>2.4249</mass_excess><spin>0</spin></nuclide>
    ///        </nuclear_data>"#,
    /// ).unwrap();
    ///
    /// assert_eq!(nuc.species_by_name("he4").unwrap().mass_excess(), 2.4249);
    /// ```
    pub fn from_xml_str(text: &str) -> Result<Nuc> {
        NucReader::new().parse_str(text)
    }

    /// Add or replace species with those in a `nuclear_data` file
    pub fn update_from_xml<P: AsRef<Path>>(&mut self, path: P, filter: &str) -> Result<()> {
        let mut reader = NucReader::new();
        reader.set_filter(filter)?;
        reader.update(self, path.as_ref())
    }
}
