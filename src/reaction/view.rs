// internal modules
use crate::filter::Filter;
use crate::reaction::{Reac, Reaction};

// standard library
use std::collections::HashSet;

// external crates
use anyhow::Result;
use log::debug;

/// Read-only selection of the reactions in a [Reac]
///
/// Like [NucView](crate::nuc::NucView) this borrows its parent, and
/// iteration follows the parent's order.
#[derive(Debug, Clone)]
pub struct ReacView<'a> {
    parent: &'a Reac,
    filter: Filter,
    members: Vec<&'a Reaction>,
    strings: HashSet<&'a str>,
}

impl<'a> ReacView<'a> {
    pub(crate) fn new(parent: &'a Reac, filter: Filter) -> Result<Self> {
        let mut members = Vec::new();
        for reaction in parent.iter() {
            if filter.matches(reaction)? {
                members.push(reaction);
            }
        }
        Ok(Self::from_members(parent, filter, members))
    }

    /// View of an already selected set of reactions, in parent order
    pub(crate) fn from_members(parent: &'a Reac, filter: Filter, members: Vec<&'a Reaction>) -> Self {
        debug!(
            "View of {} out of {} reactions for \"{}\"",
            members.len(),
            parent.len(),
            filter
        );
        let strings = members.iter().copied().map(Reaction::string).collect();
        Self {
            parent,
            filter,
            members,
            strings,
        }
    }

    pub fn parent(&self) -> &'a Reac {
        self.parent
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Reaction> + '_ {
        self.members.iter().copied()
    }

    /// Look up a reaction, `None` if it is not in the view
    pub fn reaction_by_string(&self, string: &str) -> Option<&'a Reaction> {
        if !self.strings.contains(string) {
            return None;
        }
        self.parent.reaction_by_string(string)
    }

    pub fn contains(&self, string: &str) -> bool {
        self.strings.contains(string)
    }

    /// Strings of the reactions in the view
    pub fn names(&self) -> Vec<&'a str> {
        self.iter().map(|r| r.string()).collect()
    }

    /// Owned copy of the viewed reactions as a new collection
    ///
    /// The comparator and user rate functions are carried over.
    pub fn to_reac(&self) -> Reac {
        let mut reac = Reac::new();
        reac.share_user_rate_functions(self.parent);
        if let Some(compare) = self.parent.reaction_compare() {
            reac.set_reaction_compare(compare);
        }
        for reaction in &self.members {
            reac.update_reaction((*reaction).clone());
        }
        reac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 3)]
    #[case("reactant = 'he4'", 2)]
    #[case("product = 'gamma' and not(reactant = 'c12')", 1)]
    #[case("rate_kind = 'single_rate'", 0)]
    fn selection(#[case] filter: &str, #[case] expected: usize) {
        let mut reac = Reac::new();
        reac.add_reaction(Reaction::from_elements(&["he4", "he4", "he4"], &["c12", "gamma"]))
            .unwrap();
        reac.add_reaction(Reaction::from_elements(&["c12", "he4"], &["o16", "gamma"]))
            .unwrap();
        reac.add_reaction(Reaction::from_elements(&["c12", "c12"], &["ne20", "he4"]))
            .unwrap();

        let view = reac.view(filter).unwrap();
        assert_eq!(view.len(), expected);
        assert_eq!(view.to_reac().len(), expected);
        for reaction in view.iter() {
            assert!(view.contains(reaction.string()));
        }
    }

    #[test]
    fn lookups_respect_membership() {
        let mut reac = Reac::new();
        reac.add_reaction(Reaction::from_elements(&["c12", "he4"], &["o16", "gamma"]))
            .unwrap();
        reac.add_reaction(Reaction::from_elements(&["c12", "c12"], &["ne20", "he4"]))
            .unwrap();

        let view = reac.view("product = 'gamma'").unwrap();
        assert!(view.reaction_by_string("c12 + he4 -> o16 + gamma").is_some());
        assert!(view.reaction_by_string("c12 + c12 -> ne20 + he4").is_none());
        assert!(reac.reaction_by_string("c12 + c12 -> ne20 + he4").is_some());
        assert!(!view.contains("o16 + gamma -> c12 + he4"));
    }

    #[test]
    fn copies_keep_the_comparator() {
        let mut reac = Reac::new();
        reac.add_reaction(Reaction::from_elements(&["c12", "he4"], &["o16", "gamma"]))
            .unwrap();
        reac.add_reaction(Reaction::from_elements(&["he4", "he4", "he4"], &["c12", "gamma"]))
            .unwrap();
        reac.add_reaction(Reaction::from_elements(&["c12", "c12"], &["ne20", "he4"]))
            .unwrap();
        reac.set_reaction_compare(|a, b| {
            b.nuclide_reactants()
                .len()
                .cmp(&a.nuclide_reactants().len())
                .then(b.string().cmp(a.string()))
        });

        let copy = reac.view("").unwrap().to_reac();
        assert!(copy.reaction_compare().is_some());
        assert_eq!(copy.strings(), reac.strings());
        assert_eq!(copy.strings()[0], "he4 + he4 + he4 -> c12 + gamma");
    }
}
