//! Networks of species and the reactions between them
//!
//! # Overview
//!
//! A [Net] pairs a species collection with a reaction collection, which is
//! enough to check reactions for conservation laws, compute Q values, and
//! get reverse rates from forward rates by detailed balance.
//!
//! For a reaction with reactant nuclides `i` and product nuclides `j` the
//! reverse rate is
//!
//! ```text
//! reverse = forward * exp(Σ_i f_i - Σ_j f_j + (n_i - n_j) ln(rho)) * dup_j / dup_i
//! ```
//!
//! where `f` is the NSE factor of each species and `dup` the duplicate
//! factors of each side. Weak reactions and decays have no reverse rate.
//!
//! ```rust
//! use nucnet::net::Net;
//! use nucnet::nuc::Nuc;
//! use nucnet::reaction::{RateData, Reac, Reaction};
//! use nucnet::species::Species;
//!
//! let mut nuc = Nuc::new();
//! for (z, a, dm) in [(0, 1, 8.0713), (1, 1, 7.2890), (2, 4, 2.4249), (6, 12, 0.0), (8, 16, -4.7370)] {
//!     nuc.add_species(Species::new(z, a, dm, 0.0).unwrap()).unwrap();
//! }
//!
//! let mut reac = Reac::new();
//! reac.add_reaction(
//!     Reaction::from_elements(&["c12", "he4"], &["o16", "gamma"])
//!         .with_rate(RateData::SingleRate(1.0e-6)),
//! ).unwrap();
//!
//! let net = Net::new(nuc, reac);
//! let reaction = net.reac().reaction_by_string("c12 + he4 -> o16 + gamma").unwrap();
//!
//! assert!(net.is_valid_reaction(reaction));
//! assert!((net.q_value(reaction).unwrap() - 7.1619).abs() < 1e-9);
//!
//! let (forward, reverse) = net.compute_rates(reaction, 2.0, 1.0e6).unwrap();
//! assert_eq!(forward, 1.0e-6);
//! assert!(reverse < forward);
//! ```

// internal modules
use crate::constants::*;
use crate::filter::Filter;
use crate::nuc::{Nuc, NucView};
use crate::reaction::{is_nuclide, Reac, ReacView, Reaction};
use crate::species::Species;

// standard library
use std::sync::Arc;

// external crates
use anyhow::{anyhow, bail, Result};
use log::{debug, trace};

/// Screening correction for a reaction at a temperature and density
///
/// Returns multipliers for the forward and reverse rates, which are applied
/// after the reverse rate has been found by detailed balance.
pub type ScreeningFn = Arc<dyn Fn(&Reaction, f64, f64) -> (f64, f64) + Send + Sync>;

/// A species collection and a reaction collection
#[derive(Clone, Default)]
pub struct Net {
    nuc: Nuc,
    reac: Reac,
    screening: Option<ScreeningFn>,
}

impl std::fmt::Debug for Net {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Net")
            .field("nuc", &self.nuc)
            .field("reac", &self.reac)
            .field("screening", &self.screening.is_some())
            .finish()
    }
}

impl Net {
    pub fn new(nuc: Nuc, reac: Reac) -> Self {
        debug!(
            "Network of {} species and {} reactions",
            nuc.len(),
            reac.len()
        );
        Self {
            nuc,
            reac,
            screening: None,
        }
    }

    pub fn nuc(&self) -> &Nuc {
        &self.nuc
    }

    pub fn reac(&self) -> &Reac {
        &self.reac
    }

    pub fn nuc_mut(&mut self) -> &mut Nuc {
        &mut self.nuc
    }

    pub fn reac_mut(&mut self) -> &mut Reac {
        &mut self.reac
    }

    /// Give back the species and reaction collections
    pub fn into_parts(self) -> (Nuc, Reac) {
        (self.nuc, self.reac)
    }

    /// Apply a screening correction in [Net::compute_rates]
    pub fn set_screening_function<F>(&mut self, function: F)
    where
        F: Fn(&Reaction, f64, f64) -> (f64, f64) + Send + Sync + 'static,
    {
        self.screening = Some(Arc::new(function));
    }

    pub fn clear_screening_function(&mut self) {
        self.screening = None;
    }
}

/// Validity
impl Net {
    /// Every nuclide is in the network and all conservation laws hold
    pub fn is_valid_reaction(&self, reaction: &Reaction) -> bool {
        self.has_all_nuclides(reaction, |name| self.nuc.contains(name))
            && self.is_baryon_conserved(reaction)
            && self.is_charge_conserved(reaction)
            && self.is_lepton_conserved(reaction)
    }

    fn has_all_nuclides<F: Fn(&str) -> bool>(&self, reaction: &Reaction, contains: F) -> bool {
        reaction
            .nuclide_reactants()
            .iter()
            .chain(reaction.nuclide_products())
            .all(|name| contains(name))
    }

    /// Total mass number is unchanged, false if a nuclide is unknown
    pub fn is_baryon_conserved(&self, reaction: &Reaction) -> bool {
        self.conserved(reaction, |s| s.a() as i64, |_| 0)
    }

    /// Total charge is unchanged, false if a nuclide is unknown
    pub fn is_charge_conserved(&self, reaction: &Reaction) -> bool {
        self.conserved(reaction, |s| s.z() as i64, particle_charge)
    }

    /// Electron, muon, and tau lepton numbers are each unchanged
    pub fn is_lepton_conserved(&self, reaction: &Reaction) -> bool {
        (0..3).all(|family| {
            let change = |names: &[String]| -> i64 {
                names.iter().map(|n| lepton_number(n, family)).sum()
            };
            change(reaction.other_reactants()) == change(reaction.other_products())
        })
    }

    /// Compare a quantity summed over each side of the reaction
    fn conserved<N, P>(&self, reaction: &Reaction, nuclide: N, particle: P) -> bool
    where
        N: Fn(&Species) -> i64,
        P: Fn(&str) -> i64,
    {
        let side = |nuclides: &[String], others: &[String]| -> Option<i64> {
            let mut total = 0;
            for name in nuclides {
                total += nuclide(self.nuc.species_by_name(name)?);
            }
            Some(total + others.iter().map(|n| particle(n)).sum::<i64>())
        };

        let before = side(reaction.nuclide_reactants(), reaction.other_reactants());
        let after = side(reaction.nuclide_products(), reaction.other_products());
        matches!((before, after), (Some(b), Some(a)) if a == b)
    }
}

fn particle_charge(name: &str) -> i64 {
    match name {
        "electron" | "mu" | "tau" => -1,
        "positron" | "anti-mu" | "anti-tau" => 1,
        _ => 0,
    }
}

/// Lepton number for the electron (0), muon (1), or tau (2) family
fn lepton_number(name: &str, family: usize) -> i64 {
    let (lepton, anti, neutrino, anti_neutrino) = match family {
        0 => ("electron", "positron", "neutrino_e", "anti-neutrino_e"),
        1 => ("mu", "anti-mu", "neutrino_mu", "anti-neutrino_mu"),
        _ => ("tau", "anti-tau", "neutrino_tau", "anti-neutrino_tau"),
    };
    if name == lepton || name == neutrino {
        1
    } else if name == anti || name == anti_neutrino {
        -1
    } else {
        0
    }
}

/// Physics
impl Net {
    fn species(&self, name: &str) -> Result<&Species> {
        self.nuc
            .species_by_name(name)
            .ok_or_else(|| anyhow!("Species {name} is not in the network"))
    }

    /// Q value (MeV) of a valid reaction
    ///
    /// The difference in mass excess between reactants and products, with
    /// two electron masses taken off for beta+ decays and added for positron
    /// capture.
    pub fn q_value(&self, reaction: &Reaction) -> Result<f64> {
        if !self.is_valid_reaction(reaction) {
            bail!("Reaction {} is not valid in this network", reaction.string());
        }

        let mut q = 0.0;
        for name in reaction.nuclide_reactants() {
            q += self.species(name)?.mass_excess();
        }
        for name in reaction.nuclide_products() {
            q -= self.species(name)?.mass_excess();
        }

        if reaction.is_beta_plus() {
            q -= 2.0 * MASS_ELECTRON_MEV;
        }
        if reaction.is_positron_capture() {
            q += 2.0 * MASS_ELECTRON_MEV;
        }
        Ok(q)
    }

    /// Forward and reverse rates of a reaction at `t9` and `rho`
    ///
    /// The forward rate comes from the reaction's rate data, with user rates
    /// evaluated by the functions registered on the reaction collection.
    pub fn compute_rates(&self, reaction: &Reaction, t9: f64, rho: f64) -> Result<(f64, f64)> {
        if rho <= 0.0 {
            bail!("Invalid density rho = {rho} for {}", reaction.string());
        }

        let forward = self.reac.compute_rate(reaction, t9)?;
        let (mut forward, mut reverse) = self.detailed_balance(reaction, forward, t9, rho)?;

        if let Some(screening) = &self.screening {
            let (f, r) = screening(reaction, t9, rho);
            forward *= f;
            reverse *= r;
        }

        trace!("{}: forward {forward:e}, reverse {reverse:e}", reaction.string());
        Ok((forward, reverse))
    }

    /// Reverse rate from the forward one, possibly zeroing the forward rate
    fn detailed_balance(
        &self,
        reaction: &Reaction,
        forward: f64,
        t9: f64,
        rho: f64,
    ) -> Result<(f64, f64)> {
        let n_reactants = reaction.nuclide_reactants().len();
        let n_products = reaction.nuclide_products().len();

        if reaction.is_weak() || n_reactants + reaction.other_reactants().len() == 1 {
            return Ok((forward, 0.0));
        }

        let mut exp_term = 0.0;
        for name in reaction.nuclide_reactants() {
            exp_term += self.nuc.nse_factor(self.species(name)?, t9, rho)?;
        }
        for name in reaction.nuclide_products() {
            exp_term -= self.nuc.nse_factor(self.species(name)?, t9, rho)?;
        }
        exp_term += (n_reactants as f64 - n_products as f64) * rho.ln();

        if exp_term > D_LARGE {
            trace!("{}: exponent {exp_term} too large", reaction.string());
            Ok((0.0, 0.0))
        } else if exp_term < D_SMALL {
            Ok((forward, 0.0))
        } else {
            let reverse = forward * exp_term.exp() * reaction.duplicate_product_factor()
                / reaction.duplicate_reactant_factor();
            Ok((forward, reverse))
        }
    }
}

/// Views
impl Net {
    /// Species matching `nuc_filter` and reactions matching `reac_filter`
    /// that are valid among those species
    pub fn view(&self, nuc_filter: &str, reac_filter: &str) -> Result<NetView<'_>> {
        NetView::new(self, Filter::new(nuc_filter)?, Filter::new(reac_filter)?)
    }

    pub fn view_with(&self, nuc_filter: &Filter, reac_filter: &Filter) -> Result<NetView<'_>> {
        NetView::new(self, nuc_filter.clone(), reac_filter.clone())
    }
}

/// Read-only view of part of a [Net]
///
/// The reactions are those matching the reaction filter whose nuclides are
/// all in the species view and which conserve baryon number, charge, and
/// lepton number.
#[derive(Debug, Clone)]
pub struct NetView<'a> {
    parent: &'a Net,
    nuc: NucView<'a>,
    reac: ReacView<'a>,
}

impl<'a> NetView<'a> {
    fn new(parent: &'a Net, nuc_filter: Filter, reac_filter: Filter) -> Result<Self> {
        let nuc = parent.nuc.view_with(&nuc_filter)?;

        let mut members = Vec::new();
        for reaction in parent.reac.iter() {
            if !reac_filter.matches(reaction)? {
                continue;
            }
            if parent.has_all_nuclides(reaction, |name| nuc.contains(name))
                && parent.is_valid_reaction(reaction)
            {
                members.push(reaction);
            }
        }
        let reac = ReacView::from_members(&parent.reac, reac_filter, members);

        Ok(Self { parent, nuc, reac })
    }

    pub fn parent(&self) -> &'a Net {
        self.parent
    }

    pub fn nuc(&self) -> &NucView<'a> {
        &self.nuc
    }

    pub fn reac(&self) -> &ReacView<'a> {
        &self.reac
    }

    /// Forward and reverse rates, see [Net::compute_rates]
    pub fn compute_rates(&self, reaction: &Reaction, t9: f64, rho: f64) -> Result<(f64, f64)> {
        self.parent.compute_rates(reaction, t9, rho)
    }

    /// Every nuclide element is one of the viewed species
    pub fn contains_nuclides(&self, reaction: &Reaction) -> bool {
        reaction
            .reactants()
            .chain(reaction.products())
            .filter(|name| is_nuclide(name))
            .all(|name| self.nuc.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaction::RateData;
    use rstest::{fixture, rstest};

    #[fixture]
    fn net() -> Net {
        let mut nuc = Nuc::new();
        let data = [
            (0, 1, 8.0713, 0.5),
            (1, 1, 7.2890, 0.5),
            (1, 2, 13.1357, 1.0),
            (2, 3, 14.9312, 0.5),
            (2, 4, 2.4249, 0.0),
            (6, 12, 0.0, 0.0),
            (8, 16, -4.7370, 0.0),
            (11, 22, -5.1824, 3.0),
            (10, 22, -8.0247, 0.0),
        ];
        for (z, a, dm, spin) in data {
            nuc.add_species(Species::new(z, a, dm, spin).unwrap())
                .unwrap();
        }

        let mut reac = Reac::new();
        let reactions: [(&[&str], &[&str]); 6] = [
            (&["c12", "he4"], &["o16", "gamma"]),
            (&["h1", "n"], &["h2", "gamma"]),
            (&["n"], &["h1", "electron", "anti-neutrino_e"]),
            (&["na22"], &["ne22", "positron", "neutrino_e"]),
            (&["o16", "n"], &["c12", "he4", "n"]),
            (&["he3", "he3"], &["he4", "h1", "h1"]),
        ];
        for (reactants, products) in reactions {
            reac.add_reaction(
                Reaction::from_elements(reactants, products).with_rate(RateData::SingleRate(1.0)),
            )
            .unwrap();
        }

        Net::new(nuc, reac)
    }

    #[rstest]
    #[case(&["c12", "he4"], &["o16", "gamma"], true)]
    #[case(&["c12", "he4"], &["o16"], true)]
    #[case(&["c12", "h1"], &["o16", "gamma"], false)]
    #[case(&["c12", "he4"], &["fe56", "gamma"], false)]
    #[case(&["n"], &["h1", "electron"], false)]
    #[case(&["n"], &["h1", "positron", "anti-neutrino_e"], false)]
    #[case(&["n"], &["h1", "electron", "neutrino_e"], false)]
    #[case(&["n"], &["h1", "electron", "anti-neutrino_e"], true)]
    #[case(&["n", "positron"], &["h1", "anti-neutrino_e"], true)]
    fn validity(net: Net, #[case] reactants: &[&str], #[case] products: &[&str], #[case] valid: bool) {
        let reaction = Reaction::from_elements(reactants, products);
        assert_eq!(net.is_valid_reaction(&reaction), valid);
    }

    #[rstest]
    fn q_values(net: Net) {
        let capture = Reaction::from_elements(&["c12", "he4"], &["o16", "gamma"]);
        assert!((net.q_value(&capture).unwrap() - 7.1619).abs() < 1e-9);

        let decay = Reaction::from_elements(&["n"], &["h1", "electron", "anti-neutrino_e"]);
        assert!((net.q_value(&decay).unwrap() - 0.7823).abs() < 1e-9);

        let beta_plus = Reaction::from_elements(&["na22"], &["ne22", "positron", "neutrino_e"]);
        let expected = -5.1824 + 8.0247 - 2.0 * MASS_ELECTRON_MEV;
        assert!((net.q_value(&beta_plus).unwrap() - expected).abs() < 1e-9);

        let positron_capture = Reaction::from_elements(&["n", "positron"], &["h1", "anti-neutrino_e"]);
        let expected = 8.0713 - 7.2890 + 2.0 * MASS_ELECTRON_MEV;
        assert!((net.q_value(&positron_capture).unwrap() - expected).abs() < 1e-9);

        let invalid = Reaction::from_elements(&["c12", "h1"], &["o16", "gamma"]);
        assert!(net.q_value(&invalid).is_err());
    }

    #[rstest]
    fn detailed_balance(net: Net) {
        let (t9, rho) = (2.0, 1.0e5);
        let reaction = net
            .reac()
            .reaction_by_string("c12 + he4 -> o16 + gamma")
            .unwrap();
        let (forward, reverse) = net.compute_rates(reaction, t9, rho).unwrap();

        let f = |name: &str| {
            let species = net.nuc().species_by_name(name).unwrap();
            net.nuc().nse_factor(species, t9, rho).unwrap()
        };
        let exp_term = f("c12") + f("he4") - f("o16") + rho.ln();
        assert_eq!(forward, 1.0);
        assert!((reverse / exp_term.exp() - 1.0).abs() < 1e-12);
    }

    #[rstest]
    fn duplicate_factors_enter_reverse_rate(net: Net) {
        let (t9, rho) = (3.0, 1.0e4);
        let reaction = net
            .reac()
            .reaction_by_string("he3 + he3 -> he4 + h1 + h1")
            .unwrap();
        let (_, reverse) = net.compute_rates(reaction, t9, rho).unwrap();

        let f = |name: &str| {
            let species = net.nuc().species_by_name(name).unwrap();
            net.nuc().nse_factor(species, t9, rho).unwrap()
        };
        let exp_term = 2.0 * f("he3") - f("he4") - 2.0 * f("h1") - rho.ln();
        assert!((reverse / exp_term.exp() - 1.0).abs() < 1e-12);
    }

    #[rstest]
    #[case("n -> h1 + electron + anti-neutrino_e")]
    #[case("na22 -> ne22 + positron + neutrino_e")]
    fn no_reverse_for_weak_or_decays(net: Net, #[case] string: &str) {
        let reaction = net.reac().reaction_by_string(string).unwrap();
        assert_eq!(net.compute_rates(reaction, 1.0, 1.0).unwrap(), (1.0, 0.0));
    }

    #[rstest]
    fn large_exponent_zeroes_both(net: Net) {
        let reaction = net
            .reac()
            .reaction_by_string("o16 + n -> c12 + he4 + n")
            .unwrap();
        assert_eq!(net.compute_rates(reaction, 0.1, 1.0).unwrap(), (0.0, 0.0));
    }

    #[rstest]
    #[case("c12 + he4 -> o16 + gamma")]
    #[case("h1 + n -> h2 + gamma")]
    fn small_exponent_zeroes_reverse(net: Net, #[case] string: &str) {
        // Q / kT is in the thousands at T9 = 0.01
        let reaction = net.reac().reaction_by_string(string).unwrap();
        let (forward, reverse) = net.compute_rates(reaction, 0.01, 1.0e2).unwrap();
        assert_eq!(forward, 1.0);
        assert_eq!(reverse, 0.0);

        let (forward, reverse) = net.compute_rates(reaction, 5.0, 1.0e2).unwrap();
        assert_eq!(forward, 1.0);
        assert!(reverse > 0.0);
    }

    #[rstest]
    fn bad_conditions(net: Net) {
        let reaction = net
            .reac()
            .reaction_by_string("c12 + he4 -> o16 + gamma")
            .unwrap();
        assert!(net.compute_rates(reaction, 0.0, 1.0).is_err());
        assert!(net.compute_rates(reaction, 1.0, 0.0).is_err());
    }

    #[rstest]
    fn screening_multiplies_rates(mut net: Net) {
        let reaction = net
            .reac()
            .reaction_by_string("h1 + n -> h2 + gamma")
            .unwrap()
            .clone();
        let (forward, reverse) = net.compute_rates(&reaction, 1.0, 1.0).unwrap();

        net.set_screening_function(|_, _, _| (2.0, 3.0));
        let screened = net.compute_rates(&reaction, 1.0, 1.0).unwrap();
        assert_eq!(screened, (2.0 * forward, 3.0 * reverse));

        net.clear_screening_function();
        assert_eq!(net.compute_rates(&reaction, 1.0, 1.0).unwrap(), (forward, reverse));
    }

    #[rstest]
    fn views_keep_valid_reactions(net: Net) {
        let view = net.view("z <= 2", "").unwrap();
        assert_eq!(view.nuc().len(), 5);

        let strings = view.reac().names();
        assert_eq!(strings.len(), 3);
        assert!(view.reac().contains("h1 + n -> h2 + gamma"));
        assert!(view.reac().contains("n -> h1 + electron + anti-neutrino_e"));
        assert!(!view.reac().contains("c12 + he4 -> o16 + gamma"));
        for reaction in view.reac().iter() {
            assert!(view.contains_nuclides(reaction));
        }

        let captures = net.view("", "product = 'gamma'").unwrap();
        assert_eq!(captures.reac().len(), 2);
    }
}
