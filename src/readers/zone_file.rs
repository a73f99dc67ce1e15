//! Reader for `zone_data` XML files

// internal modules
use crate::nuc::Nuc;
use crate::readers::documents::{ZoneData, ZoneXml};
use crate::utils::*;
use crate::zone::Zone;

// standard library
use std::path::Path;

// external crates
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, trace};

/// Reads zones from a `zone_data` document
///
/// Mass fractions are checked against a species collection, so every
/// nuclide must be in the collection with a matching Z and A.
///
/// Example:
/// ```ignore
///     let reader = ZoneReader::new();
///     let zones = reader.parse(Path::new("zone_data.xml"), &nuc)?;
/// ```
#[derive(Debug, Default)]
pub struct ZoneReader {}

/// High level methods
impl ZoneReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    pub fn parse(&self, path: &Path, nuc: &Nuc) -> Result<Vec<Zone>> {
        debug!("Reading zones from {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| f!("Could not read {}", path.display()))?;
        self.parse_str(&text, nuc)
            .with_context(|| f!("Could not parse zones in {}", path.display()))
    }

    pub fn parse_str(&self, text: &str, nuc: &Nuc) -> Result<Vec<Zone>> {
        let document: ZoneData = quick_xml::de::from_str(text)?;
        let zones = document
            .zone
            .into_iter()
            .map(|element| Self::zone(element, nuc))
            .collect::<Result<Vec<Zone>>>()?;
        debug!("Read {} zones", zones.len());
        Ok(zones)
    }
}

/// Conversion of document elements
impl ZoneReader {
    fn zone(element: ZoneXml, nuc: &Nuc) -> Result<Zone> {
        let label = |l: &Option<String>| l.as_deref().unwrap_or("0").trim().to_string();
        let mut zone = Zone::new(
            &label(&element.label1),
            &label(&element.label2),
            &label(&element.label3),
        );

        if let Some(properties) = element.optional_properties {
            for p in properties.property {
                zone.update_property(
                    &p.name,
                    p.tag1.as_deref(),
                    p.tag2.as_deref(),
                    p.value.trim(),
                );
            }
        }

        for fraction in element.mass_fractions.nuclide {
            let name = fraction.name.trim();
            let species = nuc
                .species_by_name(name)
                .ok_or_else(|| anyhow!("Species {name} in zone {zone} is not in the collection"))?;

            if species.z() != fraction.z || species.a() != fraction.a {
                bail!(
                    "Species {name} in zone {zone} has Z = {}, A = {}, expected Z = {}, A = {}",
                    fraction.z,
                    fraction.a,
                    species.z(),
                    species.a()
                );
            }

            trace!("{zone}: X({name}) = {}", fraction.x);
            zone.set_mass_fraction(species, fraction.x);
        }

        Ok(zone)
    }
}

/// XML input
impl Zone {
    /// Every zone in a `zone_data` document
    pub fn from_xml_str(text: &str, nuc: &Nuc) -> Result<Vec<Zone>> {
        ZoneReader::new().parse_str(text, nuc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use rstest::{fixture, rstest};

    #[fixture]
    fn nuc() -> Nuc {
        let mut nuc = Nuc::new();
        for (z, a) in [(1, 1), (2, 4), (6, 12)] {
            nuc.add_species(Species::new(z, a, 0.0, 0.0).unwrap())
                .unwrap();
        }
        nuc
    }

    #[rstest]
    fn reads_zones(nuc: Nuc) {
        let data = r#"<zone_data>
  <zone label1="1" label2="x">
    <optional_properties>
      <property name="t9">2.5</property>
      <property name="rho" tag1="initial">1e5</property>
    </optional_properties>
    <mass_fractions>
      <nuclide name="h1"><z>1</z><a>1</a><x>0.7</x></nuclide>
      <nuclide name="he4"><z>2</z><a>4</a><x>0.3</x></nuclide>
    </mass_fractions>
  </zone>
  <zone>
    <mass_fractions>
      <nuclide name="c12"><z>6</z><a>12</a><x>1.0</x></nuclide>
    </mass_fractions>
  </zone>
</zone_data>"#;
        let zones = Zone::from_xml_str(data, &nuc).unwrap();
        assert_eq!(zones.len(), 2);

        let first = &zones[0];
        assert_eq!(first.labels(), ["1", "x", "0"]);
        assert_eq!(first.property("t9", None, None), Some("2.5"));
        assert_eq!(first.property("rho", Some("initial"), None), Some("1e5"));
        assert_eq!(first.abundance("he4"), 0.075);

        assert_eq!(zones[1].labels(), ["0", "0", "0"]);
        assert_eq!(zones[1].abundance("c12"), 1.0 / 12.0);
    }

    #[rstest]
    #[case(r#"<nuclide name="o16"><z>8</z><a>16</a><x>1</x></nuclide>"#)]
    #[case(r#"<nuclide name="he4"><z>2</z><a>3</a><x>1</x></nuclide>"#)]
    fn bad_mass_fractions(nuc: Nuc, #[case] nuclide: &str) {
        let data = f!("<zone_data><zone><mass_fractions>{nuclide}</mass_fractions></zone></zone_data>");
        assert!(Zone::from_xml_str(&data, &nuc).is_err());
    }
}
