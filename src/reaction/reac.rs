// internal modules
use crate::filter::Filter;
use crate::reaction::core::{check_rate, check_temperature};
use crate::reaction::{RateData, ReacView, Reaction};

// standard library
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

// external crates
use anyhow::{anyhow, bail, Result};
use log::{debug, trace};

/// Ordering used to iterate the reactions of a collection
pub type ReactionCompare = fn(&Reaction, &Reaction) -> Ordering;

/// Function evaluating a user defined rate at a temperature
///
/// The reaction is passed in full so the function can read the properties
/// of its [UserRate](crate::reaction::UserRate) data.
pub type UserRateFn = Arc<dyn Fn(&Reaction, f64) -> Result<f64> + Send + Sync>;

/// A collection of reactions keyed by their strings
///
/// Iteration is in string order unless a comparator is installed. User rate
/// functions are registered here by key, and [Reac::compute_rate] dispatches
/// to them.
///
/// ```rust
/// # use nucnet::reaction::{Reac, Reaction, RateData, UserRate};
/// let mut reac = Reac::new();
///
/// let reaction = Reaction::from_elements(&["c12", "he4"], &["o16", "gamma"])
///     .with_rate(RateData::UserRate(UserRate::new("linear")));
/// reac.add_reaction(reaction).unwrap();
///
/// reac.register_user_rate_function("linear", |_, t9| Ok(2.0 * t9));
///
/// let reaction = reac.reaction_by_string("c12 + he4 -> o16 + gamma").unwrap();
/// assert_eq!(reac.compute_rate(reaction, 3.0).unwrap(), 6.0);
/// ```
#[derive(Clone, Default)]
pub struct Reac {
    reactions: BTreeMap<String, Reaction>,
    compare: Option<ReactionCompare>,
    user_rates: HashMap<String, UserRateFn>,
}

impl std::fmt::Debug for Reac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reac")
            .field("reactions", &self.reactions)
            .field("compare", &self.compare)
            .field("user_rates", &self.user_rates.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Adding, removing, and ordering reactions
impl Reac {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    /// Add a reaction, failing if its string is already taken
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<()> {
        if self.contains(reaction.string()) {
            bail!("Reaction {} is already in the collection", reaction.string());
        }
        trace!("Adding {}", reaction.string());
        self.reactions
            .insert(reaction.string().to_string(), reaction);
        Ok(())
    }

    /// Add a reaction, replacing any with the same string
    pub fn update_reaction(&mut self, reaction: Reaction) {
        trace!("Updating {}", reaction.string());
        self.reactions
            .insert(reaction.string().to_string(), reaction);
    }

    pub fn remove_reaction(&mut self, string: &str) -> Result<Reaction> {
        self.reactions
            .remove(string)
            .ok_or_else(|| anyhow!("Reaction {string} is not in the collection"))
    }

    /// Install a comparator for iteration
    pub fn set_reaction_compare(&mut self, compare: ReactionCompare) {
        self.compare = Some(compare);
    }

    /// Return to iteration in string order
    pub fn clear_reaction_compare(&mut self) {
        self.compare = None;
    }

    /// The installed comparator, if any
    pub fn reaction_compare(&self) -> Option<ReactionCompare> {
        self.compare
    }

    /// Register the function evaluating user rates with this key
    ///
    /// Registering a key again replaces the previous function.
    pub fn register_user_rate_function<F>(&mut self, key: &str, function: F)
    where
        F: Fn(&Reaction, f64) -> Result<f64> + Send + Sync + 'static,
    {
        debug!("Registered user rate function \"{key}\"");
        self.user_rates.insert(key.to_string(), Arc::new(function));
    }

    /// Carry the user rate functions of another collection over
    pub(crate) fn share_user_rate_functions(&mut self, other: &Reac) {
        for (key, function) in &other.user_rates {
            self.user_rates.insert(key.clone(), Arc::clone(function));
        }
    }
}

/// Access
impl Reac {
    pub fn contains(&self, string: &str) -> bool {
        self.reactions.contains_key(string)
    }

    pub fn reaction_by_string(&self, string: &str) -> Option<&Reaction> {
        self.reactions.get(string)
    }

    /// Iterate in the order of the installed comparator, or by string
    pub fn iter(&self) -> std::vec::IntoIter<&Reaction> {
        let mut reactions: Vec<&Reaction> = self.reactions.values().collect();
        if let Some(compare) = self.compare {
            reactions.sort_by(|a, b| compare(a, b));
        }
        reactions.into_iter()
    }

    /// Reaction strings in iteration order
    pub fn strings(&self) -> Vec<&str> {
        self.iter().map(|r| r.string()).collect()
    }

    /// Forward rate of a reaction at `t9`
    ///
    /// Built in rate kinds are evaluated directly, while user rates go to the
    /// function registered under their key.
    pub fn compute_rate(&self, reaction: &Reaction, t9: f64) -> Result<f64> {
        let Some(RateData::UserRate(user)) = reaction.rate_data() else {
            return reaction.compute_rate(t9);
        };

        check_temperature(reaction, t9)?;
        let function = self.user_rates.get(&user.key).ok_or_else(|| {
            anyhow!(
                "No user rate function \"{}\" registered for {}",
                user.key,
                reaction.string()
            )
        })?;

        check_rate(reaction, t9, function(reaction, t9)?)
    }

    /// Reactions describing the same process as an earlier one
    ///
    /// Reactions are compared with their elements sorted and regardless of
    /// direction. Each pair is `(duplicate, first seen)` in iteration order.
    /// A reaction with identical reactants and products is an error.
    ///
    /// ```rust
    /// # use nucnet::reaction::{Reac, Reaction};
    /// let mut reac = Reac::new();
    /// for (reactants, products) in [
    ///     (vec!["c12", "he4"], vec!["o16", "gamma"]),
    ///     (vec!["he4", "c12"], vec!["o16", "gamma"]),
    ///     (vec!["o16", "gamma"], vec!["he4", "c12"]),
    /// ] {
    ///     reac.add_reaction(Reaction::from_elements(&reactants, &products)).unwrap();
    /// }
    ///
    /// let duplicates = reac.duplicate_reactions().unwrap();
    /// assert_eq!(duplicates.len(), 2);
    /// assert!(duplicates.iter().all(|(_, first)| first == "c12 + he4 -> o16 + gamma"));
    /// ```
    pub fn duplicate_reactions(&self) -> Result<Vec<(String, String)>> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut duplicates = Vec::new();

        for reaction in self.iter() {
            let key = reaction.canonical_key()?;
            match seen.get(&key) {
                Some(first) => {
                    duplicates.push((reaction.string().to_string(), first.to_string()))
                }
                None => {
                    seen.insert(key, reaction.string());
                }
            }
        }

        debug!("Found {} duplicate reactions", duplicates.len());
        Ok(duplicates)
    }
}

/// Subsets and views
impl Reac {
    /// New collection holding copies of the reactions matching `filter`
    ///
    /// The comparator and user rate functions are carried over.
    pub fn extract_subset(&self, filter: &str) -> Result<Reac> {
        self.extract_subset_with(&Filter::new(filter)?)
    }

    pub fn extract_subset_with(&self, filter: &Filter) -> Result<Reac> {
        let mut subset = Reac {
            compare: self.compare,
            user_rates: self.user_rates.clone(),
            ..Default::default()
        };

        for reaction in self.reactions.values() {
            if filter.matches(reaction)? {
                subset.update_reaction(reaction.clone());
            }
        }

        debug!(
            "Extracted {} of {} reactions with \"{}\"",
            subset.len(),
            self.len(),
            filter
        );
        Ok(subset)
    }

    /// Read-only view of the reactions matching `filter`
    pub fn view(&self, filter: &str) -> Result<ReacView<'_>> {
        ReacView::new(self, Filter::new(filter)?)
    }

    pub fn view_with(&self, filter: &Filter) -> Result<ReacView<'_>> {
        ReacView::new(self, filter.clone())
    }
}

impl std::fmt::Display for Reac {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for reaction in self.iter() {
            let kind = reaction.rate_data().map(RateData::key).unwrap_or("none");
            writeln!(f, "{:<50} {kind}", reaction.string())?;
        }
        Ok(())
    }
}
