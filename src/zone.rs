//! Zones of matter with abundances and properties
//!
//! # Overview
//!
//! A [Zone] is a parcel of matter identified by up to three labels (default
//! `"0"`), with abundances `Y` for its species and any number of free-form
//! [Properties]. Abundances are per nucleon, so `Y = X / A` for a mass
//! fraction `X`.
//!
//! Given a [NetView] and conditions, a zone gives the flow through each
//! reaction:
//!
//! ```text
//! forward flow = forward rate * rho^(n - 1) * Π Y(reactants) / dup(reactants)
//! ```
//!
//! with `n` the number of reactant nuclides, and the reverse flow the same
//! over the products.
//!
//! ```rust
//! use nucnet::species::Species;
//! use nucnet::zone::Zone;
//!
//! let mut zone = Zone::new("1", "0", "0");
//! zone.set_mass_fraction(&Species::new(1, 1, 7.2890, 0.5).unwrap(), 0.7);
//! zone.set_mass_fraction(&Species::new(2, 4, 2.4249, 0.0).unwrap(), 0.3);
//!
//! assert_eq!(zone.abundance("he4"), 0.075);
//! assert_eq!(zone.abundance("c12"), 0.0);
//! assert!((zone.ye() - 0.85).abs() < 1e-12);
//! ```
//!
//! # Rate modification
//!
//! Zone properties may scale the rates of selected reactions. Each
//! modification view is a group of properties sharing `tag1` of
//! [RATE_MODIFICATION_VIEW] and an id as `tag2`:
//!
//! | Name              | Value                                  | Default |
//! | ----------------- | -------------------------------------- | ------- |
//! | `nuclide filter`  | Filter selecting the species           | all     |
//! | `reaction filter` | Filter selecting the reactions         | all     |
//! | `factor`          | Multiplier for forward and reverse     | 1       |
//!
//! The reactions of a modification view are those of the [NetView] the two
//! filters select. A reaction in several views has its rates multiplied by
//! every factor.
//!
//! Zones are read from and written to the `zone_data` XML format with
//! [read_zone_xml](crate::read_zone_xml) and
//! [write_zone_xml](crate::write_zone_xml).

// internal modules
use crate::constants::{AVOGADRO, MEV_TO_ERGS};
use crate::net::NetView;
use crate::property::Properties;
use crate::reaction::Reaction;
use crate::species::Species;
use crate::utils::*;

// standard library
use std::collections::BTreeMap;

// external crates
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, trace};
use serde::Serialize;

/// `tag1` of the properties describing a rate modification view
pub const RATE_MODIFICATION_VIEW: &str = "rate modification view";

/// Property holding the species filter of a rate modification view
pub const NUC_FILTER: &str = "nuclide filter";

/// Property holding the reaction filter of a rate modification view
pub const REAC_FILTER: &str = "reaction filter";

/// Property holding the multiplier of a rate modification view
pub const FACTOR: &str = "factor";

/// Abundance of one species in a zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Abundance {
    pub z: u32,
    pub a: u32,
    /// Abundance per nucleon
    pub y: f64,
}

impl Abundance {
    /// Mass fraction `X = A Y`
    pub fn mass_fraction(&self) -> f64 {
        self.a as f64 * self.y
    }
}

/// Rates and flows of a reaction in a zone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flow {
    pub reaction: String,
    pub forward_rate: f64,
    pub reverse_rate: f64,
    pub forward: f64,
    pub reverse: f64,
}

impl Flow {
    /// Forward minus reverse flow
    pub fn net(&self) -> f64 {
        self.forward - self.reverse
    }
}

/// Selection of reactions whose rates a zone scales by a factor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateModification {
    pub id: String,
    pub nuc_filter: String,
    pub reac_filter: String,
    pub factor: f64,
}

impl RateModification {
    /// Every reaction, unchanged
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            nuc_filter: String::new(),
            reac_filter: String::new(),
            factor: 1.0,
        }
    }
}

/// A labelled parcel of matter
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    labels: [String; 3],
    properties: Properties,
    abundances: BTreeMap<String, Abundance>,
}

impl Default for Zone {
    fn default() -> Self {
        Self::new("0", "0", "0")
    }
}

/// Labels and properties
impl Zone {
    pub fn new(label1: &str, label2: &str, label3: &str) -> Self {
        Self {
            labels: [label1.to_string(), label2.to_string(), label3.to_string()],
            properties: Properties::new(),
            abundances: BTreeMap::new(),
        }
    }

    /// All three labels
    pub fn labels(&self) -> [&str; 3] {
        [&self.labels[0], &self.labels[1], &self.labels[2]]
    }

    /// Label 1, 2, or 3
    pub fn label(&self, i: usize) -> Result<&str> {
        match i {
            1..=3 => Ok(&self.labels[i - 1]),
            _ => bail!("Zone label {i} out of range, expected 1 to 3"),
        }
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn property(&self, name: &str, tag1: Option<&str>, tag2: Option<&str>) -> Option<&str> {
        self.properties.get(name, tag1, tag2)
    }

    pub fn update_property(&mut self, name: &str, tag1: Option<&str>, tag2: Option<&str>, value: &str) {
        self.properties.update(name, tag1, tag2, value);
    }
}

/// Rate modification
impl Zone {
    /// Store a rate modification view in the zone properties
    ///
    /// An existing view with the same id is overwritten.
    pub fn set_rate_modification(&mut self, id: &str, nuc_filter: &str, reac_filter: &str, factor: f64) {
        let tag1 = Some(RATE_MODIFICATION_VIEW);
        self.update_property(NUC_FILTER, tag1, Some(id), nuc_filter);
        self.update_property(REAC_FILTER, tag1, Some(id), reac_filter);
        self.update_property(FACTOR, tag1, Some(id), &f!("{factor:e}"));
    }

    /// Rate modification views described by the zone properties, by id
    pub fn rate_modifications(&self) -> Result<Vec<RateModification>> {
        let mut views: BTreeMap<&str, RateModification> = BTreeMap::new();

        for (key, value) in self.properties.iter() {
            if key.tag1.as_deref() != Some(RATE_MODIFICATION_VIEW) {
                continue;
            }

            let Some(id) = key.tag2.as_deref() else {
                bail!("Rate modification property {key} in zone {self} has no view id (tag2)");
            };

            let view = views
                .entry(id)
                .or_insert_with(|| RateModification::new(id));

            match key.name.as_str() {
                NUC_FILTER => view.nuc_filter = value.trim().to_string(),
                REAC_FILTER => view.reac_filter = value.trim().to_string(),
                FACTOR => {
                    view.factor = value
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|factor| factor.is_finite())
                        .ok_or_else(|| anyhow!("Invalid factor \"{value}\" for {key} in zone {self}"))?;
                }
                name => bail!("Unknown rate modification property \"{name}\" in zone {self}"),
            }
        }

        Ok(views.into_values().collect())
    }

    /// Network views of every rate modification, with their factors
    fn modification_views<'a>(&self, view: &NetView<'a>) -> Result<Vec<(NetView<'a>, f64)>> {
        let net = view.parent();
        self.rate_modifications()?
            .into_iter()
            .map(|modification| {
                let selected = net
                    .view(&modification.nuc_filter, &modification.reac_filter)
                    .with_context(|| {
                        f!("Invalid rate modification view {} in zone {self}", modification.id)
                    })?;
                debug!(
                    "Rate modification view {} scales {} reactions by {}",
                    modification.id,
                    selected.reac().len(),
                    modification.factor
                );
                Ok((selected, modification.factor))
            })
            .collect()
    }
}

/// Product of the factors of every modification view holding the reaction
fn modification_factor(views: &[(NetView, f64)], reaction: &Reaction) -> f64 {
    views
        .iter()
        .filter(|(view, _)| view.reac().contains(reaction.string()))
        .map(|(_, factor)| factor)
        .product()
}

/// Abundances
impl Zone {
    /// Set the abundance per nucleon of a species
    pub fn set_abundance(&mut self, species: &Species, y: f64) {
        trace!("{}: Y({}) = {y:e}", self, species.name());
        self.abundances.insert(
            species.name().to_string(),
            Abundance {
                z: species.z(),
                a: species.a(),
                y,
            },
        );
    }

    /// Set the abundance of a species from its mass fraction
    pub fn set_mass_fraction(&mut self, species: &Species, x: f64) {
        self.set_abundance(species, x / species.a() as f64);
    }

    /// Abundance per nucleon, zero for species never set
    pub fn abundance(&self, name: &str) -> f64 {
        self.abundances.get(name).map(|ab| ab.y).unwrap_or(0.0)
    }

    pub fn mass_fraction(&self, name: &str) -> f64 {
        self.abundances
            .get(name)
            .map(Abundance::mass_fraction)
            .unwrap_or(0.0)
    }

    /// Species with an abundance set, by name
    pub fn abundances(&self) -> impl Iterator<Item = (&str, &Abundance)> {
        self.abundances.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear_abundances(&mut self) {
        self.abundances.clear();
    }

    /// `Σ A^n Y` over all species
    pub fn a_moment(&self, n: i32) -> f64 {
        self.abundances
            .values()
            .map(|ab| (ab.a as f64).powi(n) * ab.y)
            .sum()
    }

    /// `Σ Z^n Y` over all species
    pub fn z_moment(&self, n: i32) -> f64 {
        self.abundances
            .values()
            .map(|ab| (ab.z as f64).powi(n) * ab.y)
            .sum()
    }

    /// Electron fraction
    pub fn ye(&self) -> f64 {
        self.z_moment(1)
    }

    /// Abundances summed over species sharing a `z`, `a`, or `n` value
    pub fn summed_abundances(&self, kind: &str) -> Result<BTreeMap<u32, f64>> {
        let get: fn(&Abundance) -> u32 = match kind {
            "z" => |ab| ab.z,
            "a" => |ab| ab.a,
            "n" => |ab| ab.a - ab.z,
            _ => bail!("Unknown nucleon number \"{kind}\", expected z, a, or n"),
        };

        let mut sums = BTreeMap::new();
        for ab in self.abundances.values() {
            *sums.entry(get(ab)).or_insert(0.0) += ab.y;
        }
        Ok(sums)
    }
}

/// Flows
impl Zone {
    /// Rates and flows of every reaction in the view
    ///
    /// Rates are scaled by any rate modification views of the zone.
    pub fn compute_flows(&self, view: &NetView, t9: f64, rho: f64) -> Result<Vec<Flow>> {
        debug!(
            "Computing flows of {} reactions in zone {self} at T9 = {t9}, rho = {rho:e}",
            view.reac().len()
        );
        let modifications = self.modification_views(view)?;
        view.reac()
            .iter()
            .map(|reaction| {
                let factor = modification_factor(&modifications, reaction);
                self.flow(view, reaction, t9, rho, factor)
            })
            .collect()
    }

    /// Rates and flows of a single reaction
    ///
    /// Rates are scaled by any rate modification views of the zone.
    pub fn compute_flow(&self, view: &NetView, reaction: &Reaction, t9: f64, rho: f64) -> Result<Flow> {
        let modifications = self.modification_views(view)?;
        let factor = modification_factor(&modifications, reaction);
        self.flow(view, reaction, t9, rho, factor)
    }

    fn flow(&self, view: &NetView, reaction: &Reaction, t9: f64, rho: f64, factor: f64) -> Result<Flow> {
        let (mut forward_rate, mut reverse_rate) = view.compute_rates(reaction, t9, rho)?;
        if factor != 1.0 {
            trace!("{}: rates modified by {factor}", reaction.string());
            forward_rate *= factor;
            reverse_rate *= factor;
        }

        let side = |nuclides: &[String], rate: f64, dup: f64| -> f64 {
            if rate == 0.0 {
                return 0.0;
            }
            let product: f64 = nuclides.iter().map(|n| self.abundance(n)).product();
            rate * rho.powi(nuclides.len() as i32 - 1) * product / dup
        };

        Ok(Flow {
            reaction: reaction.string().to_string(),
            forward_rate,
            reverse_rate,
            forward: side(
                reaction.nuclide_reactants(),
                forward_rate,
                reaction.duplicate_reactant_factor(),
            ),
            reverse: side(
                reaction.nuclide_products(),
                reverse_rate,
                reaction.duplicate_product_factor(),
            ),
        })
    }

    /// Rate of change of each species' abundance from a set of flows
    ///
    /// Reactant nuclides lose the net flow and product nuclides gain it.
    pub fn abundance_changes(&self, view: &NetView, flows: &[Flow]) -> Result<BTreeMap<String, f64>> {
        flow_vector(view, flows, |reaction, flow, vector| {
            for name in reaction.nuclide_reactants() {
                *vector.entry(name.clone()).or_insert(0.0) -= flow.net();
            }
            for name in reaction.nuclide_products() {
                *vector.entry(name.clone()).or_insert(0.0) += flow.net();
            }
        })
    }

    /// Forward flow out of each species, summed over the reactions it enters
    pub fn forward_flow_vector(&self, view: &NetView, flows: &[Flow]) -> Result<BTreeMap<String, f64>> {
        flow_vector(view, flows, |reaction, flow, vector| {
            for name in reaction.nuclide_reactants() {
                *vector.entry(name.clone()).or_insert(0.0) += flow.forward;
            }
        })
    }

    /// Reverse flow out of each species, summed over the reactions it is made by
    pub fn reverse_flow_vector(&self, view: &NetView, flows: &[Flow]) -> Result<BTreeMap<String, f64>> {
        flow_vector(view, flows, |reaction, flow, vector| {
            for name in reaction.nuclide_products() {
                *vector.entry(name.clone()).or_insert(0.0) += flow.reverse;
            }
        })
    }

    /// Sum over species of the `forward`, `reverse`, or `net` flow vector
    pub fn total_flow(&self, view: &NetView, flows: &[Flow], kind: &str) -> Result<f64> {
        let vector = match kind {
            "forward" => self.forward_flow_vector(view, flows)?,
            "reverse" => self.reverse_flow_vector(view, flows)?,
            "net" => self.abundance_changes(view, flows)?,
            _ => bail!("Unknown flow \"{kind}\", expected forward, reverse, or net"),
        };
        Ok(vector.values().sum())
    }
}

/// Energy generation
impl Zone {
    /// Energy generation rate (erg/s per nucleon) of each reaction
    ///
    /// Each reaction releases its Q value for every unit of net flow. Only
    /// the nuclear Q value counts, there is no thermal or electron term.
    pub fn reaction_energy_generation_rates(
        &self,
        view: &NetView,
        t9: f64,
        rho: f64,
    ) -> Result<Vec<(String, f64)>> {
        let flows = self.compute_flows(view, t9, rho)?;
        flows
            .into_iter()
            .map(|flow| {
                let reaction = flow_reaction(view, &flow)?;
                let q = view.parent().q_value(reaction)?;
                Ok((flow.reaction.clone(), q * MEV_TO_ERGS * flow.net()))
            })
            .collect()
    }

    /// Total energy generation rate (erg/s per nucleon)
    pub fn energy_generation_rate_per_nucleon(&self, view: &NetView, t9: f64, rho: f64) -> Result<f64> {
        let rates = self.reaction_energy_generation_rates(view, t9, rho)?;
        let total: f64 = rates.iter().map(|(_, rate)| rate).sum();
        debug!("Energy generation in zone {self}: {total:e} erg/s/nucleon");
        Ok(total)
    }

    /// Total energy generation rate (erg/g/s)
    pub fn energy_generation_rate_per_gram(&self, view: &NetView, t9: f64, rho: f64) -> Result<f64> {
        Ok(self.energy_generation_rate_per_nucleon(view, t9, rho)? * AVOGADRO)
    }
}

/// Reaction behind a flow, which must be in the view
fn flow_reaction<'a>(view: &NetView<'a>, flow: &Flow) -> Result<&'a Reaction> {
    view.reac()
        .reaction_by_string(&flow.reaction)
        .ok_or_else(|| anyhow!("Reaction {} is not in the view", flow.reaction))
}

/// Accumulate a per-species quantity over a set of flows
fn flow_vector<F>(view: &NetView, flows: &[Flow], mut add: F) -> Result<BTreeMap<String, f64>>
where
    F: FnMut(&Reaction, &Flow, &mut BTreeMap<String, f64>),
{
    let mut vector = BTreeMap::new();
    for flow in flows {
        add(flow_reaction(view, flow)?, flow, &mut vector);
    }
    Ok(vector)
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.labels[0], self.labels[1], self.labels[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Net;
    use crate::nuc::Nuc;
    use crate::reaction::{RateData, Reac};
    use rstest::{fixture, rstest};

    fn species(z: u32, a: u32) -> Species {
        Species::new(z, a, 0.0, 0.0).unwrap()
    }

    #[fixture]
    fn zone() -> Zone {
        let mut zone = Zone::default();
        zone.set_mass_fraction(&species(1, 1), 0.5);
        zone.set_mass_fraction(&species(2, 4), 0.2);
        zone.set_mass_fraction(&species(6, 12), 0.3);
        zone
    }

    #[rstest]
    fn moments(zone: Zone) {
        assert_eq!(zone.abundance("h1"), 0.5);
        assert!((zone.mass_fraction("c12") - 0.3).abs() < 1e-15);
        assert!((zone.a_moment(1) - 1.0).abs() < 1e-12);
        assert!((zone.a_moment(0) - (0.5 + 0.05 + 0.025)).abs() < 1e-12);
        assert!((zone.ye() - (0.5 + 0.1 + 0.15)).abs() < 1e-12);
        assert!((zone.z_moment(2) - (0.5 + 0.2 + 0.9)).abs() < 1e-12);
    }

    #[rstest]
    fn summed(zone: Zone) {
        let by_z = zone.summed_abundances("z").unwrap();
        assert_eq!(by_z.len(), 3);
        assert_eq!(by_z[&2], 0.05);
        let by_n = zone.summed_abundances("n").unwrap();
        assert_eq!(by_n[&0], 0.5);
        assert!(zone.summed_abundances("x").is_err());
    }

    #[test]
    fn labels() {
        let zone = Zone::new("a", "b", "c");
        assert_eq!(zone.labels(), ["a", "b", "c"]);
        assert_eq!(zone.label(3).unwrap(), "c");
        assert!(zone.label(0).is_err() && zone.label(4).is_err());
        assert_eq!(Zone::default().to_string(), "(0, 0, 0)");
    }

    #[fixture]
    fn net() -> Net {
        let mut nuc = Nuc::new();
        for (z, a, dm) in [(0, 1, 8.0713), (1, 1, 7.2890), (2, 4, 2.4249), (6, 12, 0.0), (8, 16, -4.7370)] {
            nuc.add_species(Species::new(z, a, dm, 0.0).unwrap())
                .unwrap();
        }
        let mut reac = Reac::new();
        reac.add_reaction(
            Reaction::from_elements(&["he4", "he4", "he4"], &["c12", "gamma"])
                .with_rate(RateData::SingleRate(2.0)),
        )
        .unwrap();
        reac.add_reaction(
            Reaction::from_elements(&["c12", "he4"], &["o16", "gamma"])
                .with_rate(RateData::SingleRate(3.0)),
        )
        .unwrap();
        Net::new(nuc, reac)
    }

    const TRIPLE_ALPHA: &str = "he4 + he4 + he4 -> c12 + gamma";
    const CAPTURE: &str = "c12 + he4 -> o16 + gamma";

    fn find<'f>(flows: &'f [Flow], reaction: &str) -> &'f Flow {
        flows.iter().find(|f| f.reaction == reaction).unwrap()
    }

    fn assert_scaled(flow: &Flow, plain: &Flow, factor: f64) {
        assert!((flow.forward_rate / (factor * plain.forward_rate) - 1.0).abs() < 1e-12);
        assert!((flow.forward / (factor * plain.forward) - 1.0).abs() < 1e-12);
        assert_eq!(flow.reverse_rate == 0.0, plain.reverse_rate == 0.0);
    }

    #[rstest]
    fn flows(zone: Zone, net: Net) {
        let view = net.view("", "").unwrap();

        let (t9, rho) = (1.0, 100.0);
        let flows = zone.compute_flows(&view, t9, rho).unwrap();
        assert_eq!(flows.len(), 2);

        let triple_alpha = flows
            .iter()
            .find(|f| f.reaction == "he4 + he4 + he4 -> c12 + gamma")
            .unwrap();
        let y = zone.abundance("he4");
        assert!((triple_alpha.forward / (2.0 * rho * rho * y * y * y / 6.0) - 1.0).abs() < 1e-12);
        let expected = triple_alpha.reverse_rate * zone.abundance("c12");
        assert!((triple_alpha.reverse - expected).abs() <= 1e-12 * expected.abs());

        // nothing in the zone makes o16
        let capture = flows
            .iter()
            .find(|f| f.reaction == "c12 + he4 -> o16 + gamma")
            .unwrap();
        assert_eq!(capture.reverse, 0.0);

        let changes = zone.abundance_changes(&view, &flows).unwrap();
        let total: f64 = changes
            .iter()
            .map(|(name, dy)| net.nuc().species_by_name(name).unwrap().a() as f64 * dy)
            .sum();
        assert!(total.abs() < 1e-9 * triple_alpha.forward);
    }

    #[test]
    fn rate_modification_properties() {
        let mut zone = Zone::default();
        assert!(zone.rate_modifications().unwrap().is_empty());

        zone.set_rate_modification("captures", "", "reactant = 'c12'", 10.0);
        zone.update_property(FACTOR, Some(RATE_MODIFICATION_VIEW), Some("all"), "0.5");
        let modifications = zone.rate_modifications().unwrap();
        assert_eq!(modifications.len(), 2);

        assert_eq!(modifications[0].id, "all");
        assert_eq!(modifications[0].nuc_filter, "");
        assert_eq!(modifications[0].factor, 0.5);

        assert_eq!(modifications[1].id, "captures");
        assert_eq!(modifications[1].reac_filter, "reactant = 'c12'");
        assert_eq!(modifications[1].factor, 10.0);
    }

    #[rstest]
    #[case(FACTOR, Some("v"), "ten")]
    #[case(FACTOR, Some("v"), "inf")]
    #[case(FACTOR, None, "2")]
    #[case("nuclide xpath", Some("v"), "[z = 6]")]
    fn bad_rate_modifications(#[case] name: &str, #[case] id: Option<&str>, #[case] value: &str) {
        let mut zone = Zone::default();
        zone.update_property(name, Some(RATE_MODIFICATION_VIEW), id, value);
        assert!(zone.rate_modifications().is_err());
    }

    #[rstest]
    fn single_modification_view(zone: Zone, net: Net) {
        let view = net.view("", "").unwrap();
        let (t9, rho) = (1.0, 100.0);
        let plain = zone.compute_flows(&view, t9, rho).unwrap();

        let mut modified = zone.clone();
        modified.set_rate_modification("captures", "", "reactant = 'c12'", 10.0);
        let flows = modified.compute_flows(&view, t9, rho).unwrap();

        assert_scaled(find(&flows, CAPTURE), find(&plain, CAPTURE), 10.0);
        assert_eq!(find(&flows, TRIPLE_ALPHA), find(&plain, TRIPLE_ALPHA));

        let reaction = net.reac().reaction_by_string(CAPTURE).unwrap();
        let single = modified.compute_flow(&view, reaction, t9, rho).unwrap();
        assert_eq!(&single, find(&flows, CAPTURE));
    }

    #[rstest]
    fn overlapping_modification_views(zone: Zone, net: Net) {
        let view = net.view("", "").unwrap();
        let (t9, rho) = (1.0, 100.0);
        let plain = zone.compute_flows(&view, t9, rho).unwrap();

        let mut modified = zone.clone();
        modified.set_rate_modification("captures", "", "reactant = 'c12'", 10.0);
        modified.set_rate_modification("gamma", "", "product = 'gamma'", 0.5);
        // o16 is outside, so only the triple alpha is selected
        modified.set_rate_modification("light", "z <= 6", "", 3.0);
        let flows = modified.compute_flows(&view, t9, rho).unwrap();

        assert_scaled(find(&flows, CAPTURE), find(&plain, CAPTURE), 5.0);
        assert_scaled(find(&flows, TRIPLE_ALPHA), find(&plain, TRIPLE_ALPHA), 1.5);
    }

    #[rstest]
    fn invalid_modification_filter(zone: Zone, net: Net) {
        let view = net.view("", "").unwrap();
        let mut modified = zone;
        modified.set_rate_modification("broken", "z <=", "", 2.0);
        assert!(modified.compute_flows(&view, 1.0, 100.0).is_err());
    }

    #[rstest]
    fn flow_vectors(zone: Zone, net: Net) {
        let view = net.view("", "").unwrap();
        let flows = zone.compute_flows(&view, 1.0, 100.0).unwrap();
        let triple_alpha = find(&flows, TRIPLE_ALPHA);
        let capture = find(&flows, CAPTURE);

        let forward = zone.forward_flow_vector(&view, &flows).unwrap();
        let expected = 3.0 * triple_alpha.forward + capture.forward;
        assert!((forward["he4"] / expected - 1.0).abs() < 1e-12);
        assert_eq!(forward["c12"], capture.forward);
        assert!(!forward.contains_key("o16"));

        let reverse = zone.reverse_flow_vector(&view, &flows).unwrap();
        assert_eq!(reverse["c12"], triple_alpha.reverse);
        assert_eq!(reverse["o16"], 0.0);

        let net_total = zone.total_flow(&view, &flows, "net").unwrap();
        let changes = zone.abundance_changes(&view, &flows).unwrap();
        assert_eq!(net_total, changes.values().sum::<f64>());
        assert_eq!(
            zone.total_flow(&view, &flows, "forward").unwrap(),
            forward.values().sum::<f64>()
        );
        assert!(zone.total_flow(&view, &flows, "sideways").is_err());
    }

    #[rstest]
    fn energy_generation(zone: Zone, net: Net) {
        let view = net.view("", "reactant = 'c12'").unwrap();
        let (t9, rho) = (1.0, 100.0);

        let flows = zone.compute_flows(&view, t9, rho).unwrap();
        assert_eq!(flows.len(), 1);
        // no o16 in the zone so the net flow is all forward
        assert_eq!(flows[0].reverse, 0.0);

        let q = 0.0 + 2.4249 + 4.7370;
        let expected = q * MEV_TO_ERGS * flows[0].forward;

        let rates = zone.reaction_energy_generation_rates(&view, t9, rho).unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].0, CAPTURE);
        assert!((rates[0].1 / expected - 1.0).abs() < 1e-12);

        let per_nucleon = zone.energy_generation_rate_per_nucleon(&view, t9, rho).unwrap();
        assert!((per_nucleon / expected - 1.0).abs() < 1e-12);
        let per_gram = zone.energy_generation_rate_per_gram(&view, t9, rho).unwrap();
        assert!((per_gram / (expected * AVOGADRO) - 1.0).abs() < 1e-12);

        // burning releases energy
        assert!(per_gram > 0.0);
    }
}
