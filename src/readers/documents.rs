//! Serde mirrors of the XML documents
//!
//! These follow the element layout of the files exactly and are converted
//! to and from the library types by the readers and writers. Attributes are
//! prefixed with `@`, and element text is `$text`.

// external crates
use serde::{Deserialize, Serialize, Serializer};

/// Numbers are written in full unless very large or small
pub(crate) fn number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_number(*value))
}

pub(crate) fn option_number<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => number(v, serializer),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || (1.0e-4..1.0e6).contains(&magnitude) {
        format!("{value}")
    } else {
        format!("{value:e}")
    }
}

// ---------------------------------------------------------------------------
// nuclear_data
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename = "nuclear_data")]
pub(crate) struct NuclearData {
    #[serde(default, rename = "nuclide")]
    pub nuclides: Vec<NuclideXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct NuclideXml {
    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub z: u32,
    pub a: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub mass_excess: Option<f64>,
    #[serde(
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub spin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partf_table: Option<PartfTableXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<StatesXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct StatesXml {
    #[serde(default)]
    pub state: Vec<StateXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct StateXml {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub mass_excess: Option<f64>,
    #[serde(
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub spin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partf_table: Option<PartfTableXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct PartfTableXml {
    #[serde(default)]
    pub point: Vec<PartfPointXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct PartfPointXml {
    #[serde(serialize_with = "number")]
    pub t9: f64,
    #[serde(serialize_with = "number")]
    pub log10_partf: f64,
}

// ---------------------------------------------------------------------------
// reaction_data
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename = "reaction_data")]
pub(crate) struct ReactionData {
    #[serde(default, rename = "reaction")]
    pub reactions: Vec<ReactionXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct ReactionXml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub reactant: Vec<String>,
    #[serde(default)]
    pub product: Vec<String>,
    #[serde(
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub single_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_table: Option<RateTableXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_smoker_fit: Option<NonSmokerFitXml>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rate: Option<UserRateXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct RateTableXml {
    #[serde(default)]
    pub point: Vec<RatePointXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct RatePointXml {
    #[serde(serialize_with = "number")]
    pub t9: f64,
    #[serde(serialize_with = "number")]
    pub rate: f64,
    #[serde(
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub sef: Option<f64>,
}

/// Either a list of `fit` elements or the fields of a single fit directly
///
/// The direct fields repeat those of [FitXml] rather than flattening it in,
/// since flattened fields lose their numeric types in the deserialiser.
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct NonSmokerFitXml {
    #[serde(default)]
    pub fit: Vec<FitXml>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub spint: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub spinf: Option<f64>,
    #[serde(
        rename = "TlowHf",
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub tlowhf: Option<f64>,
    #[serde(
        rename = "Tlowfit",
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub tlowfit: Option<f64>,
    #[serde(
        rename = "Thighfit",
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub thighfit: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub acc: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a1: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a2: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a3: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a4: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a5: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a6: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a7: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a8: Option<f64>,
}

impl NonSmokerFitXml {
    /// Fit given directly in the element, if any of its fields are present
    pub fn direct(&self) -> Option<FitXml> {
        let fit = FitXml {
            note: None,
            spint: self.spint,
            spinf: self.spinf,
            tlowhf: self.tlowhf,
            tlowfit: self.tlowfit,
            thighfit: self.thighfit,
            acc: self.acc,
            a1: self.a1,
            a2: self.a2,
            a3: self.a3,
            a4: self.a4,
            a5: self.a5,
            a6: self.a6,
            a7: self.a7,
            a8: self.a8,
        };
        match fit.is_empty() {
            true => None,
            false => Some(fit),
        }
    }
}

/// Parameters of one fit, any of which may be missing
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct FitXml {
    #[serde(rename = "@note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub spint: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub spinf: Option<f64>,
    #[serde(
        rename = "TlowHf",
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub tlowhf: Option<f64>,
    #[serde(
        rename = "Tlowfit",
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub tlowfit: Option<f64>,
    #[serde(
        rename = "Thighfit",
        default,
        serialize_with = "option_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub thighfit: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub acc: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a1: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a2: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a3: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a4: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a5: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a6: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a7: Option<f64>,
    #[serde(default, serialize_with = "option_number", skip_serializing_if = "Option::is_none")]
    pub a8: Option<f64>,
}

impl FitXml {
    /// True if none of the fit parameters are present
    pub fn is_empty(&self) -> bool {
        [
            self.spint,
            self.spinf,
            self.tlowhf,
            self.tlowfit,
            self.thighfit,
            self.acc,
            self.a1,
            self.a2,
            self.a3,
            self.a4,
            self.a5,
            self.a6,
            self.a7,
            self.a8,
        ]
        .iter()
        .all(Option::is_none)
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct UserRateXml {
    #[serde(rename = "@key")]
    pub key: String,
    #[serde(default)]
    pub property: Vec<PropertyXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct PropertyXml {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@tag1", default, skip_serializing_if = "Option::is_none")]
    pub tag1: Option<String>,
    #[serde(rename = "@tag2", default, skip_serializing_if = "Option::is_none")]
    pub tag2: Option<String>,
    #[serde(rename = "$text", default)]
    pub value: String,
}

// ---------------------------------------------------------------------------
// nuclear_network
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename = "nuclear_network")]
pub(crate) struct NuclearNetwork {
    #[serde(default)]
    pub nuclear_data: NuclearData,
    #[serde(default)]
    pub reaction_data: ReactionData,
}

// ---------------------------------------------------------------------------
// zone_data
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename = "zone_data")]
pub(crate) struct ZoneData {
    #[serde(default)]
    pub zone: Vec<ZoneXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct ZoneXml {
    #[serde(rename = "@label1", default, skip_serializing_if = "Option::is_none")]
    pub label1: Option<String>,
    #[serde(rename = "@label2", default, skip_serializing_if = "Option::is_none")]
    pub label2: Option<String>,
    #[serde(rename = "@label3", default, skip_serializing_if = "Option::is_none")]
    pub label3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_properties: Option<OptionalPropertiesXml>,
    #[serde(default)]
    pub mass_fractions: MassFractionsXml,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct OptionalPropertiesXml {
    #[serde(default)]
    pub property: Vec<PropertyXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct MassFractionsXml {
    #[serde(default)]
    pub nuclide: Vec<MassFractionXml>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct MassFractionXml {
    #[serde(rename = "@name")]
    pub name: String,
    pub z: u32,
    pub a: u32,
    #[serde(serialize_with = "number")]
    pub x: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0")]
    #[case(2.4249, "2.4249")]
    #[case(-53.904, "-53.904")]
    #[case(1.0e-20, "1e-20")]
    #[case(3.5e8, "3.5e8")]
    fn numbers(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_number(value), expected);
        assert_eq!(expected.parse::<f64>().unwrap(), value);
    }
}
