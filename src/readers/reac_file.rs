//! Reader for `reaction_data` XML files

// internal modules
use crate::filter::Filter;
use crate::reaction::{NonSmokerFit, RateData, RateTable, Reac, Reaction, UserRate};
use crate::readers::documents::{FitXml, NonSmokerFitXml, ReactionData, ReactionXml};
use crate::utils::*;

// standard library
use std::path::Path;

// external crates
use anyhow::{bail, Context, Result};
use log::{debug, trace, warn};

/// Reads reactions from a `reaction_data` document into a [Reac]
///
/// Only reactions matching the filter are kept. Reactions are added with
/// [Reac::update_reaction], so later entries replace earlier ones with the
/// same string.
///
/// Example:
/// ```ignore
///     let mut reader = ReacReader::new();
///     reader.set_filter("reactant = 'he4'")?;
///     let reac = reader.parse(Path::new("reaction_data.xml"))?;
/// ```
#[derive(Debug, Default)]
pub struct ReacReader {
    /// Predicate the reactions must satisfy
    filter: Filter,
}

/// High level methods
impl ReacReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Setter for the predicate used to select reactions
    pub fn set_filter(&mut self, filter: &str) -> Result<()> {
        self.filter = Filter::new(filter)?;
        Ok(())
    }

    /// Read every selected reaction from the file at `path`
    pub fn parse(&self, path: &Path) -> Result<Reac> {
        let mut reac = Reac::new();
        self.update(&mut reac, path)?;
        Ok(reac)
    }

    /// Read the selected reactions from the file at `path` into `reac`
    pub fn update(&self, reac: &mut Reac, path: &Path) -> Result<()> {
        debug!("Reading reaction data from {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| f!("Could not read {}", path.display()))?;
        self.update_from_str(reac, &text)
            .with_context(|| f!("Could not parse reaction data in {}", path.display()))
    }

    /// Read every selected reaction from XML text
    pub fn parse_str(&self, text: &str) -> Result<Reac> {
        let mut reac = Reac::new();
        self.update_from_str(&mut reac, text)?;
        Ok(reac)
    }

    pub fn update_from_str(&self, reac: &mut Reac, text: &str) -> Result<()> {
        let document: ReactionData = quick_xml::de::from_str(text)?;
        self.update_from_document(reac, document)
    }

    pub(crate) fn update_from_document(&self, reac: &mut Reac, document: ReactionData) -> Result<()> {
        for element in document.reactions {
            let reaction = Self::reaction(element)?;
            if self.filter.matches(&reaction)? {
                trace!("Read {}", reaction.string());
                reac.update_reaction(reaction);
            }
        }
        debug!("Collection now holds {} reactions", reac.len());
        Ok(())
    }
}

/// Conversion of document elements
impl ReacReader {
    fn reaction(element: ReactionXml) -> Result<Reaction> {
        let reactants: Vec<&str> = element.reactant.iter().map(|s| s.trim()).collect();
        let products: Vec<&str> = element.product.iter().map(|s| s.trim()).collect();
        let mut reaction = Reaction::from_elements(&reactants, &products);

        if let Some(source) = &element.source {
            reaction.update_source(source.trim());
        }

        let mut rates = Vec::new();
        if let Some(rate) = element.single_rate {
            rates.push(RateData::SingleRate(rate));
        }
        if let Some(table) = element.rate_table {
            let n = table.point.len();
            let t9 = table.point.iter().map(|p| p.t9).collect();
            let rate = table.point.iter().map(|p| p.rate).collect();
            let sef = table.point.iter().map(|p| p.sef.unwrap_or(1.0)).collect();
            let table = RateTable::new(t9, rate, Some(sef))
                .with_context(|| f!("Invalid rate table of {n} points for {}", reaction.string()))?;
            rates.push(RateData::RateTable(table));
        }
        if let Some(fits) = element.non_smoker_fit {
            rates.push(RateData::NonSmokerFit(Self::fits(fits)));
        }
        if let Some(user) = element.user_rate {
            let mut rate = UserRate::new(user.key.trim());
            for p in user.property {
                rate.properties.update(
                    &p.name,
                    p.tag1.as_deref(),
                    p.tag2.as_deref(),
                    p.value.trim(),
                );
            }
            rates.push(RateData::UserRate(rate));
        }

        match rates.len() {
            0 => warn!("No rate data for {}", reaction.string()),
            1 => reaction.update_rate(rates.remove(0)),
            _ => bail!("More than one kind of rate data for {}", reaction.string()),
        }

        Ok(reaction)
    }

    fn fits(element: NonSmokerFitXml) -> Vec<NonSmokerFit> {
        let direct = element.direct();
        element
            .fit
            .into_iter()
            .chain(direct)
            .map(Self::fit)
            .collect()
    }

    fn fit(element: FitXml) -> NonSmokerFit {
        let default = NonSmokerFit::default();
        let a = [
            element.a1, element.a2, element.a3, element.a4, element.a5, element.a6, element.a7,
            element.a8,
        ]
        .map(|a| a.unwrap_or(0.0));

        NonSmokerFit {
            note: element.note,
            spint: element.spint.unwrap_or(default.spint),
            spinf: element.spinf.unwrap_or(default.spinf),
            tlowhf: element.tlowhf.unwrap_or(default.tlowhf),
            tlowfit: element.tlowfit.unwrap_or(default.tlowfit),
            thighfit: element.thighfit.unwrap_or(default.thighfit),
            acc: element.acc.unwrap_or(default.acc),
            a,
        }
    }
}

/// XML input
impl Reac {
    /// Collection of every reaction in a `reaction_data` document
    ///
    /// ```rust
    /// # use nucnet::reaction::Reac;
    /// let reac = Reac::from_xml_str(
    ///     r#"<reaction_data>
    ///          <reaction>
    ///            <reactant>n</reactant>
    ///            <product>h1</product>
    ///            <product>electron</product>
    ///            <product>anti-neutrino_e</product>
    ///            <single_rate>1.5e-3</single_rate>
    ///          </reaction>
    ///        </reaction_data>"#,
    /// ).unwrap();
    ///
    /// let decay = reac.reaction_by_string("n -> h1 + electron + anti-neutrino_e").unwrap();
    /// assert_eq!(decay.compute_rate(1.0).unwrap(), 1.5e-3);
    /// ```
    pub fn from_xml_str(text: &str) -> Result<Reac> {
        ReacReader::new().parse_str(text)
    }

    /// Add or replace reactions with those in a `reaction_data` file
    pub fn update_from_xml<P: AsRef<Path>>(&mut self, path: P, filter: &str) -> Result<()> {
        let mut reader = ReacReader::new();
        reader.set_filter(filter)?;
        reader.update(self, path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DATA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<reaction_data>
  <reaction>
    <source>constant</source>
    <reactant>c12</reactant>
    <reactant>he4</reactant>
    <product>o16</product>
    <product>gamma</product>
    <single_rate>2.5e-8</single_rate>
  </reaction>
  <reaction>
    <reactant>he4</reactant>
    <reactant>he4</reactant>
    <reactant>he4</reactant>
    <product>c12</product>
    <product>gamma</product>
    <rate_table>
      <point><t9>0.1</t9><rate>1e-20</rate></point>
      <point><t9>1</t9><rate>1e-10</rate><sef>2</sef></point>
      <point><t9>10</t9><rate>1e-5</rate></point>
    </rate_table>
  </reaction>
  <reaction>
    <reactant>c12</reactant>
    <reactant>c12</reactant>
    <product>ne20</product>
    <product>he4</product>
    <non_smoker_fit>
      <fit note="first">
        <a1>1</a1>
      </fit>
      <fit note="second">
        <a1>2</a1>
        <Thighfit>5</Thighfit>
      </fit>
    </non_smoker_fit>
  </reaction>
  <reaction>
    <reactant>o16</reactant>
    <reactant>he4</reactant>
    <product>ne20</product>
    <product>gamma</product>
    <non_smoker_fit>
      <a1>0</a1>
      <a5>1</a5>
    </non_smoker_fit>
  </reaction>
  <reaction>
    <reactant>h1</reactant>
    <reactant>h1</reactant>
    <product>h2</product>
    <product>positron</product>
    <product>neutrino_e</product>
    <user_rate key="pp">
      <property name="scale">4.01e-15</property>
      <property name="t9" tag1="low">0.01</property>
    </user_rate>
  </reaction>
</reaction_data>
"#;

    #[test]
    fn reads_every_rate_kind() {
        let reac = Reac::from_xml_str(DATA).unwrap();
        assert_eq!(reac.len(), 5);

        let capture = reac.reaction_by_string("c12 + he4 -> o16 + gamma").unwrap();
        assert_eq!(capture.source(), Some("constant"));
        assert_eq!(capture.compute_rate(3.0).unwrap(), 2.5e-8);

        let triple = reac.reaction_by_string("he4 + he4 + he4 -> c12 + gamma").unwrap();
        assert!((triple.compute_rate(1.0).unwrap() / 2.0e-10 - 1.0).abs() < 1e-10);
        assert_eq!(triple.compute_rate(20.0).unwrap(), 1e-5);

        let carbon = reac.reaction_by_string("c12 + c12 -> ne20 + he4").unwrap();
        let Some(RateData::NonSmokerFit(fits)) = carbon.rate_data() else {
            panic!("expected fits");
        };
        assert_eq!(fits.len(), 2);
        assert_eq!(fits[0].note.as_deref(), Some("first"));
        assert_eq!(fits[1].thighfit, 5.0);
        assert_eq!(fits[0].thighfit, 10.0);
        let expected = 1f64.exp() + 2f64.exp();
        assert!((carbon.compute_rate(1.0).unwrap() - expected).abs() < 1e-12);

        let alpha = reac.reaction_by_string("o16 + he4 -> ne20 + gamma").unwrap();
        assert!((alpha.compute_rate(2.0).unwrap() - 2f64.exp()).abs() < 1e-12);

        let pp = reac.reaction_by_string("h1 + h1 -> h2 + positron + neutrino_e").unwrap();
        let Some(RateData::UserRate(user)) = pp.rate_data() else {
            panic!("expected a user rate");
        };
        assert_eq!(user.key, "pp");
        assert_eq!(user.properties.get_f64("scale", None, None).unwrap(), 4.01e-15);
        assert_eq!(user.properties.get("t9", Some("low"), None), Some("0.01"));
    }

    #[rstest]
    #[case("reactant = 'he4'", 3)]
    #[case("rate_kind = 'non_smoker_fit'", 2)]
    #[case("source = 'constant'", 1)]
    #[case("product = 'fe56'", 0)]
    fn filtered(#[case] filter: &str, #[case] expected: usize) {
        let mut reader = ReacReader::new();
        reader.set_filter(filter).unwrap();
        assert_eq!(reader.parse_str(DATA).unwrap().len(), expected);
    }

    #[test]
    fn conflicting_rates() {
        let data = r#"<reaction_data><reaction>
            <reactant>n</reactant><product>h1</product>
            <product>electron</product><product>anti-neutrino_e</product>
            <single_rate>1</single_rate>
            <rate_table><point><t9>1</t9><rate>1</rate></point></rate_table>
        </reaction></reaction_data>"#;
        assert!(Reac::from_xml_str(data).is_err());
    }

    #[test]
    fn missing_rate_is_allowed() {
        let data = r#"<reaction_data><reaction>
            <reactant>n</reactant><product>h1</product>
            <product>electron</product><product>anti-neutrino_e</product>
        </reaction></reaction_data>"#;
        let reac = Reac::from_xml_str(data).unwrap();
        let decay = reac.reaction_by_string("n -> h1 + electron + anti-neutrino_e").unwrap();
        assert!(decay.rate_data().is_none());
    }
}
