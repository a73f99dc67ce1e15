// internal modules
use crate::filter::Filter;
use crate::nuc::Nuc;
use crate::species::Species;

// external crates
use anyhow::Result;
use log::debug;

/// Read-only selection of the species in a [Nuc]
///
/// A view holds references into its parent rather than copies, so the parent
/// cannot be changed or dropped while the view is alive. Species keep the
/// index they have in the parent, and iteration follows the parent's rank
/// order.
///
/// Membership depends only on the filter, never on how the parent happens to
/// be ordered.
#[derive(Debug, Clone)]
pub struct NucView<'a> {
    parent: &'a Nuc,
    filter: Filter,
    /// Ranks of the selected species in the parent, ascending
    members: Vec<usize>,
}

impl<'a> NucView<'a> {
    pub(crate) fn new(parent: &'a Nuc, filter: Filter) -> Result<Self> {
        let mut members = Vec::new();
        for species in parent.iter() {
            if filter.matches(species)? {
                members.push(species.index());
            }
        }

        debug!(
            "View of {} out of {} species for \"{}\"",
            members.len(),
            parent.len(),
            filter
        );

        Ok(Self {
            parent,
            filter,
            members,
        })
    }

    /// The collection this is a view of
    pub fn parent(&self) -> &'a Nuc {
        self.parent
    }

    /// The predicate that selected the species
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Species in the view, in the parent's rank order
    pub fn iter(&self) -> impl Iterator<Item = &'a Species> + '_ {
        let parent = self.parent;
        self.members.iter().map(move |i| &parent.species()[*i])
    }

    /// Look up a species, `None` if it is not in the view
    pub fn species_by_name(&self, name: &str) -> Option<&'a Species> {
        let species = self.parent.species_by_name(name)?;
        match self.members.binary_search(&species.index()) {
            Ok(_) => Some(species),
            Err(_) => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.species_by_name(name).is_some()
    }

    /// Names of the species in the view
    pub fn names(&self) -> Vec<&'a str> {
        self.iter().map(|s| s.name()).collect()
    }

    /// Owned copy of the viewed species as a new collection
    pub fn to_nuc(&self) -> Result<Nuc> {
        self.parent.extract_subset_with(&self.filter)
    }
}
