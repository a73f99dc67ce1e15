// internal modules
use crate::filter::{Record, Value};
use crate::reaction::RateData;
use crate::utils::*;

// external crates
use anyhow::{anyhow, bail, Result};
use itertools::Itertools;

/// Reaction elements that are not nuclides
pub const PARTICLES: [&str; 13] = [
    "gamma",
    "electron",
    "positron",
    "mu",
    "anti-mu",
    "tau",
    "anti-tau",
    "neutrino_e",
    "anti-neutrino_e",
    "neutrino_mu",
    "anti-neutrino_mu",
    "neutrino_tau",
    "anti-neutrino_tau",
];

/// True unless the name is one of the [PARTICLES]
pub fn is_nuclide(name: &str) -> bool {
    !PARTICLES.contains(&name)
}

/// Leptons and neutrinos, i.e. any particle but the photon
fn is_lepton(name: &str) -> bool {
    name != "gamma" && !is_nuclide(name)
}

/// A nuclear reaction
///
/// Elements are split into nuclides and other particles on each side. The
/// reaction string lists the nuclides first, then the other particles, in
/// the order they were added.
///
/// ```rust
/// # use nucnet::reaction::Reaction;
/// let reaction = Reaction::from_elements(&["he4", "he4", "he4"], &["c12", "gamma"]);
///
/// assert_eq!(reaction.string(), "he4 + he4 + he4 -> c12 + gamma");
/// assert_eq!(reaction.duplicate_reactant_factor(), 6.0);
/// assert_eq!(reaction.duplicate_product_factor(), 1.0);
/// assert!(!reaction.is_weak());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    string: String,
    source: Option<String>,
    reactants: Vec<String>,
    other_reactants: Vec<String>,
    products: Vec<String>,
    other_products: Vec<String>,
    duplicate_reactant_factor: f64,
    duplicate_product_factor: f64,
    rate: Option<RateData>,
}

impl Default for Reaction {
    fn default() -> Self {
        let mut reaction = Self {
            string: String::new(),
            source: None,
            reactants: Vec::new(),
            other_reactants: Vec::new(),
            products: Vec::new(),
            other_products: Vec::new(),
            duplicate_reactant_factor: 1.0,
            duplicate_product_factor: 1.0,
            rate: None,
        };
        reaction.update_string();
        reaction
    }
}

/// Construction
impl Reaction {
    /// Empty reaction with no elements or rate data
    pub fn new() -> Self {
        Default::default()
    }

    /// Reaction with the given reactants and products, in order
    pub fn from_elements(reactants: &[&str], products: &[&str]) -> Self {
        let mut reaction = Self::new();
        for name in reactants {
            reaction.add_reactant(name);
        }
        for name in products {
            reaction.add_product(name);
        }
        reaction
    }

    pub fn add_reactant(&mut self, name: &str) {
        match is_nuclide(name) {
            true => {
                self.reactants.push(name.to_string());
                self.duplicate_reactant_factor = duplicate_factor(&self.reactants);
            }
            false => self.other_reactants.push(name.to_string()),
        }
        self.update_string();
    }

    pub fn add_product(&mut self, name: &str) {
        match is_nuclide(name) {
            true => {
                self.products.push(name.to_string());
                self.duplicate_product_factor = duplicate_factor(&self.products);
            }
            false => self.other_products.push(name.to_string()),
        }
        self.update_string();
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.update_source(source);
        self
    }

    pub fn with_rate(mut self, rate: RateData) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn update_source(&mut self, source: &str) {
        self.source = match source.is_empty() {
            true => None,
            false => Some(source.to_string()),
        };
    }

    /// Replace any existing rate data
    pub fn update_rate(&mut self, rate: RateData) {
        self.rate = Some(rate);
    }

    fn update_string(&mut self) {
        let side = |nuclides: &[String], others: &[String]| {
            nuclides.iter().chain(others).join(" + ")
        };
        self.string = f!(
            "{} -> {}",
            side(&self.reactants, &self.other_reactants),
            side(&self.products, &self.other_products)
        );
    }
}

/// Product of n! over each distinct name
fn duplicate_factor(list: &[String]) -> f64 {
    list.iter().counts().values().map(|n| factorial(*n)).product()
}

/// Getters
impl Reaction {
    /// The reaction string, unique within a collection
    pub fn string(&self) -> &str {
        &self.string
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn rate_data(&self) -> Option<&RateData> {
        self.rate.as_ref()
    }

    /// Nuclide reactants in order of addition
    pub fn nuclide_reactants(&self) -> &[String] {
        &self.reactants
    }

    /// Nuclide products in order of addition
    pub fn nuclide_products(&self) -> &[String] {
        &self.products
    }

    /// Non-nuclide reactants, e.g. electrons or photons
    pub fn other_reactants(&self) -> &[String] {
        &self.other_reactants
    }

    pub fn other_products(&self) -> &[String] {
        &self.other_products
    }

    /// All reactants, nuclides first
    pub fn reactants(&self) -> impl Iterator<Item = &str> {
        self.reactants
            .iter()
            .chain(&self.other_reactants)
            .map(String::as_str)
    }

    /// All products, nuclides first
    pub fn products(&self) -> impl Iterator<Item = &str> {
        self.products
            .iter()
            .chain(&self.other_products)
            .map(String::as_str)
    }

    /// Product of n! over identical nuclide reactants
    pub fn duplicate_reactant_factor(&self) -> f64 {
        self.duplicate_reactant_factor
    }

    /// Product of n! over identical nuclide products
    pub fn duplicate_product_factor(&self) -> f64 {
        self.duplicate_product_factor
    }

    /// Same reaction regardless of element order or direction
    ///
    /// Both sides are sorted and the lesser side placed first, so a reaction
    /// and its reverse share a key. Fails if both sides are identical.
    pub(crate) fn canonical_key(&self) -> Result<String> {
        let reactants = self.reactants().sorted().join(" + ");
        let products = self.products().sorted().join(" + ");

        match reactants.cmp(&products) {
            std::cmp::Ordering::Less => Ok(f!("{reactants} <-> {products}")),
            std::cmp::Ordering::Greater => Ok(f!("{products} <-> {reactants}")),
            std::cmp::Ordering::Equal => {
                bail!("Reactants and products of {} are the same", self.string)
            }
        }
    }
}

/// Classification
impl Reaction {
    /// Any lepton or neutrino among the elements
    pub fn is_weak(&self) -> bool {
        self.is_weak_forward() || self.is_weak_reverse()
    }

    /// Any lepton or neutrino among the reactants
    pub fn is_weak_forward(&self) -> bool {
        self.other_reactants.iter().any(|n| is_lepton(n))
    }

    /// Any lepton or neutrino among the products
    pub fn is_weak_reverse(&self) -> bool {
        self.other_products.iter().any(|n| is_lepton(n))
    }

    /// Emits both a positron and an electron neutrino
    pub fn is_beta_plus(&self) -> bool {
        let hits = self
            .other_products
            .iter()
            .filter(|n| *n == "neutrino_e" || *n == "positron")
            .count();
        hits == 2
    }

    /// Captures a positron (or anti-neutrino) and emits one
    pub fn is_positron_capture(&self) -> bool {
        let hits = |list: &[String]| {
            list.iter()
                .filter(|n| *n == "anti-neutrino_e" || *n == "positron")
                .count()
        };
        hits(&self.other_reactants) == 1 && hits(&self.other_products) == 1
    }
}

/// Rates
impl Reaction {
    /// Forward rate at `t9` from the built in rate kinds
    ///
    /// User defined rates need the function registered with the owning
    /// collection, see [Reac::compute_rate](crate::reaction::Reac::compute_rate).
    pub fn compute_rate(&self, t9: f64) -> Result<f64> {
        check_temperature(self, t9)?;

        let rate = self
            .rate
            .as_ref()
            .ok_or_else(|| anyhow!("No rate data for {}", self.string))?
            .builtin_rate(t9)
            .ok_or_else(|| {
                anyhow!(
                    "Rate for {} needs a registered user function",
                    self.string
                )
            })?;

        check_rate(self, t9, rate)
    }
}

/// Temperatures must be strictly positive
pub(crate) fn check_temperature(reaction: &Reaction, t9: f64) -> Result<()> {
    match t9 > 0.0 {
        true => Ok(()),
        false => bail!("Invalid temperature T9 = {t9} for {}", reaction.string()),
    }
}

/// Rates must be finite
pub(crate) fn check_rate(reaction: &Reaction, t9: f64, rate: f64) -> Result<f64> {
    match rate.is_finite() {
        true => Ok(rate),
        false => bail!(
            "Invalid rate {rate} for {} at T9 = {t9}",
            reaction.string()
        ),
    }
}

impl Record for Reaction {
    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "string" => Value::Text(self.string.clone()),
            "source" => match &self.source {
                Some(s) => Value::Text(s.clone()),
                None => Value::Missing,
            },
            "reactant" => Value::List(self.reactants().map(str::to_string).collect()),
            "product" => Value::List(self.products().map(str::to_string).collect()),
            "rate_kind" => match &self.rate {
                Some(rate) => Value::Text(rate.kind().to_string()),
                None => Value::Missing,
            },
            "rate_key" => match &self.rate {
                Some(rate) => Value::Text(rate.key().to_string()),
                None => Value::Missing,
            },
            _ => return None,
        })
    }
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaction::{NonSmokerFit, RateTable, UserRate};
    use rstest::rstest;

    #[rstest]
    #[case(&["c12", "he4"], &["o16", "gamma"], "c12 + he4 -> o16 + gamma")]
    #[case(&["gamma", "o16"], &["c12", "he4"], "o16 + gamma -> c12 + he4")]
    #[case(&["n"], &["h1", "electron", "anti-neutrino_e"], "n -> h1 + electron + anti-neutrino_e")]
    #[case(&[], &[], " -> ")]
    fn strings(#[case] reactants: &[&str], #[case] products: &[&str], #[case] expected: &str) {
        let reaction = Reaction::from_elements(reactants, products);
        assert_eq!(reaction.string(), expected);
    }

    #[rstest]
    #[case(&["h1", "h1"], 2.0)]
    #[case(&["he4", "he4", "he4"], 6.0)]
    #[case(&["he4", "h1", "he4", "h1"], 4.0)]
    #[case(&["c12", "he4"], 1.0)]
    #[case(&["electron", "electron"], 1.0)]
    fn duplicate_factors(#[case] reactants: &[&str], #[case] factor: f64) {
        let reaction = Reaction::from_elements(reactants, reactants);
        assert_eq!(reaction.duplicate_reactant_factor(), factor);
        assert_eq!(reaction.duplicate_product_factor(), factor);
    }

    #[rstest]
    #[case(&["n"], &["h1", "electron", "anti-neutrino_e"], true, false, false)]
    #[case(&["na22"], &["ne22", "positron", "neutrino_e"], true, true, false)]
    #[case(&["n", "positron"], &["h1", "anti-neutrino_e"], true, false, true)]
    #[case(&["c12", "he4"], &["o16", "gamma"], false, false, false)]
    #[case(&["be7", "electron"], &["li7", "neutrino_e"], true, false, false)]
    fn classification(
        #[case] reactants: &[&str],
        #[case] products: &[&str],
        #[case] weak: bool,
        #[case] beta_plus: bool,
        #[case] positron_capture: bool,
    ) {
        let reaction = Reaction::from_elements(reactants, products);
        assert_eq!(reaction.is_weak(), weak);
        assert_eq!(reaction.is_beta_plus(), beta_plus);
        assert_eq!(reaction.is_positron_capture(), positron_capture);
    }

    #[test]
    fn rates() {
        let reaction = Reaction::from_elements(&["c12", "he4"], &["o16", "gamma"]);
        assert!(reaction.compute_rate(1.0).is_err());

        let single = reaction.clone().with_rate(RateData::SingleRate(3.0));
        assert_eq!(single.compute_rate(1.0).unwrap(), 3.0);
        assert!(single.compute_rate(0.0).is_err());
        assert!(single.compute_rate(-1.0).is_err());

        let table = RateTable::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0], None).unwrap();
        let tabulated = reaction.clone().with_rate(RateData::RateTable(table));
        assert!((tabulated.compute_rate(2.0).unwrap() - 2.0).abs() < 1e-12);

        let fit = NonSmokerFit::new([1000.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let overflow = reaction.clone().with_rate(RateData::NonSmokerFit(vec![fit]));
        assert!(overflow.compute_rate(1.0).is_err());

        let user = reaction.with_rate(RateData::UserRate(UserRate::new("custom")));
        assert!(user.compute_rate(1.0).is_err());
    }

    #[test]
    fn canonical_keys_ignore_order_and_direction() {
        let forward = Reaction::from_elements(&["he4", "c12"], &["o16", "gamma"]);
        let reverse = Reaction::from_elements(&["gamma", "o16"], &["c12", "he4"]);
        assert_eq!(forward.canonical_key().unwrap(), reverse.canonical_key().unwrap());

        let identity = Reaction::from_elements(&["h1"], &["h1"]);
        assert!(identity.canonical_key().is_err());
    }

    #[test]
    fn record_fields() {
        let reaction = Reaction::from_elements(&["c12", "he4"], &["o16", "gamma"]);
        assert_eq!(
            reaction.field("reactant"),
            Some(Value::List(vec!["c12".into(), "he4".into()]))
        );
        assert_eq!(reaction.field("rate_kind"), Some(Value::Missing));
        assert_eq!(reaction.field("z"), None);
    }
}
