// internal modules
use crate::constants::*;
use crate::filter::Filter;
use crate::nuc::NucView;
use crate::species::{species_name, Species};

// standard library
use std::cmp::Ordering;
use std::collections::HashMap;

// external crates
use anyhow::{anyhow, bail, Result};
use log::{debug, trace};

/// Ordering used to rank species in a collection
pub type SpeciesCompare = fn(&Species, &Species) -> Ordering;

/// Default ordering: by Z, then A, then name
///
/// The name comparison only matters for states of the same nuclide, which
/// then sort alphabetically by state label.
pub fn default_species_compare(lhs: &Species, rhs: &Species) -> Ordering {
    lhs.z()
        .cmp(&rhs.z())
        .then(lhs.a().cmp(&rhs.a()))
        .then(lhs.name().cmp(rhs.name()))
}

/// A collection of nuclear species keyed by name
///
/// Species are held in ranked order, and every species' `index` is its rank
/// under the current comparator. This holds after every insertion, removal,
/// or explicit sort.
///
/// ```rust
/// # use nucnet::nuc::Nuc;
/// # use nucnet::species::Species;
/// let mut nuc = Nuc::new();
/// nuc.add_species(Species::new(2, 4, 2.4249, 0.0).unwrap()).unwrap();
/// nuc.add_species(Species::new(1, 1, 7.2890, 0.5).unwrap()).unwrap();
///
/// let names: Vec<&str> = nuc.iter().map(|s| s.name()).collect();
/// assert_eq!(names, vec!["h1", "he4"]);
/// assert_eq!(nuc.species_by_name("he4").unwrap().index(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Nuc {
    /// Species in rank order
    species: Vec<Species>,
    /// Rank of each species by name
    lookup: HashMap<String, usize>,
    /// Installed comparator, None for the default
    compare: Option<SpeciesCompare>,
}

/// Adding, removing, and ordering species
impl Nuc {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of species in the collection
    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Add a species, failing if the name is already taken
    pub fn add_species(&mut self, mut species: Species) -> Result<()> {
        if self.contains(species.name()) {
            bail!("Species {} is already in the collection", species.name());
        }

        let compare = self.compare_fn();
        let position = self
            .species
            .partition_point(|s| compare(s, &species) != Ordering::Greater);

        trace!("Adding {} at rank {position}", species.name());
        species.index = position;
        self.species.insert(position, species);
        self.reindex_from(position);
        Ok(())
    }

    /// Add a species, replacing anything it supersedes
    ///
    /// An existing species of the same name is replaced. Otherwise a new
    /// state (e.g. `al26g`) replaces the stateless species (`al26`), and a new
    /// stateless species replaces every state of that nuclide.
    pub fn update_species(&mut self, species: Species) -> Result<()> {
        if self.contains(species.name()) {
            self.remove_species(species.name())?;
        } else if species.state().is_some() {
            if self.contains(species.base_name()) {
                self.remove_species(species.base_name())?;
            }
        } else {
            for name in self.state_names(species.base_name()) {
                self.remove_species(&name)?;
            }
        }

        self.add_species(species)
    }

    /// Remove a species by name, closing the gap in the ranks
    pub fn remove_species(&mut self, name: &str) -> Result<Species> {
        let position = self
            .lookup
            .remove(name)
            .ok_or_else(|| anyhow!("Species {name} is not in the collection"))?;

        trace!("Removing {name} from rank {position}");
        let removed = self.species.remove(position);
        self.reindex_from(position);
        Ok(removed)
    }

    /// Install a comparator and re-rank every species
    pub fn set_species_compare(&mut self, compare: SpeciesCompare) {
        self.compare = Some(compare);
        self.sort_species();
    }

    /// Return to the default ordering and re-rank every species
    pub fn clear_species_compare(&mut self) {
        self.compare = None;
        self.sort_species();
    }

    /// The comparator currently in use
    pub fn compare_fn(&self) -> SpeciesCompare {
        self.compare.unwrap_or(default_species_compare)
    }

    /// Re-rank every species under the current comparator
    ///
    /// Only needed explicitly if species were ranked by something that has
    /// since changed, since insertion and removal keep the order.
    pub fn sort_species(&mut self) {
        debug!("Sorting {} species", self.species.len());
        let compare = self.compare_fn();
        self.species.sort_by(compare);
        self.reindex_from(0);
    }

    /// Bring indices and the name lookup up to date from `start` onwards
    fn reindex_from(&mut self, start: usize) {
        for (i, species) in self.species.iter_mut().enumerate().skip(start) {
            species.index = i;
            self.lookup.insert(species.name().to_string(), i);
        }
    }

    /// Names of every species sharing a base name, in rank order
    pub(crate) fn state_names(&self, base_name: &str) -> Vec<String> {
        self.species
            .iter()
            .filter(|s| s.base_name() == base_name)
            .map(|s| s.name().to_string())
            .collect()
    }
}

/// Access
impl Nuc {
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    pub fn species_by_name(&self, name: &str) -> Option<&Species> {
        self.lookup.get(name).map(|i| &self.species[*i])
    }

    /// Look up by atomic number, mass number, and optional state
    pub fn species_by_za(&self, z: u32, a: u32, state: Option<&str>) -> Option<&Species> {
        match species_name(z, a, state) {
            Ok(Some(name)) => self.species_by_name(&name),
            _ => None,
        }
    }

    /// Species at a given rank
    pub fn species_by_index(&self, index: usize) -> Option<&Species> {
        self.species.get(index)
    }

    /// Iterate in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, Species> {
        self.species.iter()
    }

    /// All species in rank order
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// Largest value of `z`, `a`, or `n` in the collection
    ///
    /// An empty collection gives zero.
    pub fn largest_nucleon_number(&self, kind: &str) -> Result<u32> {
        let get: fn(&Species) -> u32 = match kind {
            "z" => Species::z,
            "a" => Species::a,
            "n" => Species::n,
            _ => bail!("Unknown nucleon number \"{kind}\", expected z, a, or n"),
        };

        Ok(self.species.iter().map(get).max().unwrap_or(0))
    }
}

/// Physics that needs more than one species
impl Nuc {
    /// Binding energy (MeV) of a species
    ///
    /// Computed from the mass excesses of the species, the neutron, and the
    /// proton, so `n` and `h1` must both be in the collection.
    pub fn binding_energy(&self, species: &Species) -> Result<f64> {
        let proton = self
            .species_by_name("h1")
            .ok_or_else(|| anyhow!("Proton (h1) not present in the collection"))?;
        let neutron = self
            .species_by_name("n")
            .ok_or_else(|| anyhow!("Neutron (n) not present in the collection"))?;

        Ok(species.z() as f64 * proton.mass_excess()
            + species.n() as f64 * neutron.mass_excess()
            - species.mass_excess())
    }

    /// NSE factor `ln(Y_Q) + B / kT` of a species
    ///
    /// This is the log of the nuclear statistical equilibrium abundance of
    /// the species relative to its free nucleons.
    pub fn nse_factor(&self, species: &Species, t9: f64, rho: f64) -> Result<f64> {
        let binding = self.binding_energy(species)?;
        let quantum = species.quantum_abundance(t9, rho)?;
        Ok(quantum.ln() + binding / (BOLTZMANN_MEV_PER_T9 * t9))
    }
}

/// Subsets and views
impl Nuc {
    /// New collection holding copies of the species matching `filter`
    ///
    /// The comparator is carried over so ranks follow the same ordering.
    pub fn extract_subset(&self, filter: &str) -> Result<Nuc> {
        self.extract_subset_with(&Filter::new(filter)?)
    }

    pub fn extract_subset_with(&self, filter: &Filter) -> Result<Nuc> {
        let mut subset = Nuc {
            compare: self.compare,
            ..Default::default()
        };

        for species in &self.species {
            if filter.matches(species)? {
                subset.species.push(species.clone());
            }
        }
        subset.reindex_from(0);

        debug!(
            "Extracted {} of {} species with \"{}\"",
            subset.len(),
            self.len(),
            filter
        );
        Ok(subset)
    }

    /// Read-only view of the species matching `filter`
    ///
    /// ```rust
    /// # use nucnet::nuc::Nuc;
    /// # use nucnet::species::Species;
    /// let mut nuc = Nuc::new();
    /// for (z, a) in [(1, 1), (2, 4), (6, 12), (8, 16)] {
    ///     nuc.add_species(Species::new(z, a, 0.0, 0.0).unwrap()).unwrap();
    /// }
    ///
    /// let view = nuc.view("z > 2").unwrap();
    /// assert_eq!(view.names(), vec!["c12", "o16"]);
    /// assert_eq!(view.species_by_name("o16").unwrap().index(), 3);
    /// ```
    pub fn view(&self, filter: &str) -> Result<NucView<'_>> {
        NucView::new(self, Filter::new(filter)?)
    }

    pub fn view_with(&self, filter: &Filter) -> Result<NucView<'_>> {
        NucView::new(self, filter.clone())
    }
}

impl<'a> IntoIterator for &'a Nuc {
    type Item = &'a Species;
    type IntoIter = std::slice::Iter<'a, Species>;

    fn into_iter(self) -> Self::IntoIter {
        self.species.iter()
    }
}

impl std::fmt::Display for Nuc {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "{:<6}{:<10}{:>5}{:>5}{:>5}{:>13}{:>6}",
            "index", "name", "z", "a", "n", "mass excess", "spin"
        )?;
        for species in &self.species {
            writeln!(f, "{species}")?;
        }
        Ok(())
    }
}
