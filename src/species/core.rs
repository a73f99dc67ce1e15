// internal modules
use crate::constants::*;
use crate::filter::{Record, Value};
use crate::interp::Table;
use crate::species::naming::{base_name, upper_case_symbol};
use crate::utils::*;

// external crates
use anyhow::{anyhow, bail, Result};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// A single nuclear species
///
/// The name is derived from the atomic number, mass number, and optional
/// state label, so it is never set directly. The `index` is the rank of the
/// species in the [Nuc](crate::nuc::Nuc) collection that holds it, and is
/// meaningless for a free-standing species.
///
/// ```rust
/// # use nucnet::species::Species;
/// let species = Species::new(13, 26, -12.2102, 5.0)
///     .unwrap()
///     .with_state("g")
///     .with_source("example");
///
/// assert_eq!(species.name(), "al26g");
/// assert_eq!(species.base_name(), "al26");
/// assert_eq!(species.n(), 13);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Species {
    name: String,
    #[serde(skip)]
    base_name: String,
    z: u32,
    a: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    mass_excess: f64,
    spin: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    partf: Option<PartfTable>,
    pub(crate) index: usize,
}

/// Construction and updates
impl Species {
    /// New ground state species with no partition function table
    ///
    /// Fails if there is no valid name for the (Z, A) pair, e.g. `A = 0`.
    pub fn new(z: u32, a: u32, mass_excess: f64, spin: f64) -> Result<Self> {
        let base_name =
            base_name(z, a)?.ok_or_else(|| anyhow!("No species name for Z = {z}, A = {a}"))?;

        if z > a {
            bail!("Invalid species {base_name}: Z = {z} is larger than A = {a}");
        }

        Ok(Self {
            name: base_name.clone(),
            base_name,
            z,
            a,
            state: None,
            source: None,
            mass_excess,
            spin,
            partf: None,
            index: 0,
        })
    }

    /// Attach a state label, which becomes a suffix of the name
    pub fn with_state(mut self, state: &str) -> Self {
        self.state = match state.is_empty() {
            true => None,
            false => Some(state.to_string()),
        };
        self.name = match &self.state {
            Some(state) => f!("{}{}", self.base_name, state),
            None => self.base_name.clone(),
        };
        self
    }

    /// Attach a data source annotation
    pub fn with_source(mut self, source: &str) -> Self {
        self.update_source(source);
        self
    }

    /// Attach a partition function table
    pub fn with_partf(mut self, partf: PartfTable) -> Self {
        self.partf = Some(partf);
        self
    }

    pub fn update_mass_excess(&mut self, mass_excess: f64) {
        self.mass_excess = mass_excess;
    }

    pub fn update_spin(&mut self, spin: f64) {
        self.spin = spin;
    }

    pub fn update_source(&mut self, source: &str) {
        self.source = match source.is_empty() {
            true => None,
            false => Some(source.to_string()),
        };
    }

    /// Replace the partition function table from paired arrays
    ///
    /// Pairs are sorted by `t9`. Empty arrays remove the table.
    pub fn update_partf_table(&mut self, t9: Vec<f64>, log10_partf: Vec<f64>) -> Result<()> {
        self.partf = match t9.is_empty() && log10_partf.is_empty() {
            true => None,
            false => Some(
                PartfTable::new(t9, log10_partf)
                    .map_err(|e| anyhow!("Bad partition function table for {}: {e}", self.name))?,
            ),
        };
        Ok(())
    }
}

/// Getters
impl Species {
    /// Full name including any state suffix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without the state suffix
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn z(&self) -> u32 {
        self.z
    }

    pub fn a(&self) -> u32 {
        self.a
    }

    /// Neutron number
    pub fn n(&self) -> u32 {
        self.a - self.z
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Mass excess in MeV
    pub fn mass_excess(&self) -> f64 {
        self.mass_excess
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }

    pub fn partf(&self) -> Option<&PartfTable> {
        self.partf.as_ref()
    }

    /// Rank in the owning collection
    pub fn index(&self) -> usize {
        self.index
    }

    /// Ground state statistical weight, `2J + 1`
    pub fn ground_state_weight(&self) -> f64 {
        2.0 * self.spin + 1.0
    }

    /// Rest mass energy in MeV
    pub fn mass_mev(&self) -> f64 {
        AMU_TO_MEV * self.a as f64 + self.mass_excess
    }

    /// LaTeX string for labels, e.g. `^{26}\mathrm{Al}_{\mathrm{g}}`
    ///
    /// ```rust
    /// # use nucnet::species::Species;
    /// let fe56 = Species::new(26, 56, -60.6054, 0.0).unwrap();
    /// assert_eq!(fe56.latex_string(), "^{56}\\mathrm{Fe}");
    /// ```
    pub fn latex_string(&self) -> String {
        let mut s = f!("^{{{}}}\\mathrm{{{}}}", self.a, upper_case_symbol(self.z));
        if let Some(state) = &self.state {
            s += &f!("_{{\\mathrm{{{state}}}}}");
        }
        s
    }
}

/// Physics
impl Species {
    /// Partition function at temperature `t9` (10^9 K)
    ///
    /// Without a table this is just the ground state weight `2J + 1`.
    /// Otherwise the tabulated `log10` values are interpolated and clamped to
    /// the end points of the table, see [crate::interp].
    ///
    /// ```rust
    /// # use nucnet::species::{PartfTable, Species};
    /// let table = PartfTable::new(vec![1.0, 2.0, 3.0], vec![0.0, 0.1, 0.3]).unwrap();
    /// let species = Species::new(26, 56, -60.6054, 0.0).unwrap().with_partf(table);
    ///
    /// assert_eq!(species.partition_function(2.0).unwrap(), 10f64.powf(0.1));
    /// assert_eq!(species.partition_function(0.5).unwrap(), 1.0);
    /// ```
    pub fn partition_function(&self, t9: f64) -> Result<f64> {
        if t9 < 0.0 || t9.is_nan() {
            bail!("Invalid temperature T9 = {t9} for {}", self.name);
        }

        let exponent = match &self.partf {
            Some(table) => table.log10_partf_at(t9),
            None => 0.0,
        };

        Ok(self.ground_state_weight() * 10f64.powf(exponent))
    }

    /// Quantum abundance `G / (rho N_A) (m kT / 2 pi (hbar c)^2)^1.5`
    ///
    /// Both the temperature and the density (g/cc) must be positive.
    pub fn quantum_abundance(&self, t9: f64, rho: f64) -> Result<f64> {
        if t9 <= 0.0 {
            bail!("Invalid temperature T9 = {t9} for {}", self.name);
        }

        if rho <= 0.0 {
            bail!("Invalid density rho = {rho} for {}", self.name);
        }

        let thermal = self.mass_mev() * MEV_TO_ERGS * BOLTZMANN * t9 * 1.0e9
            / (2.0 * std::f64::consts::PI * (HBAR * SPEED_OF_LIGHT).powi(2));

        Ok(self.partition_function(t9)? / (rho * AVOGADRO) * thermal.powf(1.5))
    }
}

impl Record for Species {
    fn field(&self, name: &str) -> Option<Value> {
        let text = |s: Option<&str>| match s {
            Some(s) => Value::Text(s.to_string()),
            None => Value::Missing,
        };

        Some(match name {
            "z" => Value::Number(self.z as f64),
            "a" => Value::Number(self.a as f64),
            "n" => Value::Number(self.n() as f64),
            "name" => Value::Text(self.name.clone()),
            "base_name" => Value::Text(self.base_name.clone()),
            "state" => text(self.state()),
            "source" => text(self.source()),
            "mass_excess" => Value::Number(self.mass_excess),
            "spin" => Value::Number(self.spin),
            "index" => Value::Number(self.index as f64),
            _ => return None,
        })
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:<6}{:<10}{:>5}{:>5}{:>5}{:>13}{:>6.1}",
            self.index,
            self.name,
            self.z,
            self.a,
            self.n(),
            self.mass_excess.sci(5, 2),
            self.spin
        )
    }
}

/// Tabulated `log10` partition function against temperature
///
/// Pairs are sorted by temperature on construction, and the two arrays must
/// be the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct PartfTable {
    table: Table,
}

impl PartfTable {
    pub fn new(t9: Vec<f64>, log10_partf: Vec<f64>) -> Result<Self> {
        Ok(Self {
            table: Table::new(t9, log10_partf)?,
        })
    }

    /// Tabulated temperatures in increasing order
    pub fn t9(&self) -> &[f64] {
        self.table.x()
    }

    /// Tabulated `log10` partition function values
    pub fn log10_partf(&self) -> &[f64] {
        self.table.y()
    }

    /// Number of tabulated points
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Interpolated `log10` value at `t9`
    pub fn log10_partf_at(&self, t9: f64) -> f64 {
        self.table.eval(t9)
    }
}

impl Serialize for PartfTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PartfTable", 2)?;
        s.serialize_field("t9", self.t9())?;
        s.serialize_field("log10_partf", self.log10_partf())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ni56() -> Species {
        let t9 = vec![0.1, 0.5, 1.0, 2.0, 3.0, 5.0, 10.0];
        let log10 = vec![0.0, 0.0, 0.001, 0.02, 0.08, 0.31, 1.2];
        Species::new(28, 56, -53.904, 0.0)
            .unwrap()
            .with_partf(PartfTable::new(t9, log10).unwrap())
    }

    #[rstest]
    fn partf_is_exact_at_knots(ni56: Species) {
        let table = ni56.partf().unwrap().clone();
        for (t9, log10) in table.t9().iter().zip(table.log10_partf()) {
            assert_eq!(ni56.partition_function(*t9).unwrap(), 10f64.powf(*log10));
        }
    }

    #[rstest]
    fn partf_clamps(ni56: Species) {
        assert_eq!(ni56.partition_function(0.0).unwrap(), 1.0);
        assert_eq!(ni56.partition_function(100.0).unwrap(), 10f64.powf(1.2));
    }

    #[rstest]
    fn partf_rejects_negative_temperature(ni56: Species) {
        assert!(ni56.partition_function(-1.0).is_err());
    }

    #[test]
    fn partf_without_table_is_ground_state_weight() {
        let al26 = Species::new(13, 26, -12.2102, 5.0).unwrap();
        assert_eq!(al26.partition_function(3.0).unwrap(), 11.0);
    }

    #[test]
    fn partf_two_points_are_linear_in_log() {
        let mut species = Species::new(1, 2, 13.136, 1.0).unwrap();
        species
            .update_partf_table(vec![3.0, 1.0], vec![0.4, 0.2])
            .unwrap();
        let expected = 3.0 * 10f64.powf(0.3);
        assert!((species.partition_function(2.0).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn partf_table_length_mismatch() {
        let mut species = Species::new(1, 2, 13.136, 1.0).unwrap();
        assert!(species
            .update_partf_table(vec![1.0, 2.0], vec![0.0])
            .is_err());
    }

    #[rstest]
    #[case(0, 0)]
    #[case(0, 3)]
    #[case(3, 2)]
    fn invalid_species(#[case] z: u32, #[case] a: u32) {
        assert!(Species::new(z, a, 0.0, 0.0).is_err());
    }

    #[test]
    fn state_naming() {
        let base = Species::new(73, 180, -48.9, 1.0).unwrap();
        let meta = base.clone().with_state("m");
        assert_eq!(meta.name(), "ta180m");
        assert_eq!(meta.base_name(), base.name());
        assert_eq!(meta.latex_string(), "^{180}\\mathrm{Ta}_{\\mathrm{m}}");
        assert_eq!(meta.with_state("").name(), "ta180");
    }

    #[test]
    fn neutron() {
        let n = Species::new(0, 1, 8.0713, 0.5).unwrap();
        assert_eq!(n.name(), "n");
        assert_eq!(n.latex_string(), "^{1}\\mathrm{n}");
        assert_eq!(n.ground_state_weight(), 2.0);
    }

    #[test]
    fn quantum_abundance_scales_with_density() {
        let he4 = Species::new(2, 4, 2.4249, 0.0).unwrap();
        let y1 = he4.quantum_abundance(1.0, 1.0).unwrap();
        let y2 = he4.quantum_abundance(1.0, 10.0).unwrap();
        assert!((y1 / y2 - 10.0).abs() < 1e-9);
        assert!(he4.quantum_abundance(0.0, 1.0).is_err());
        assert!(he4.quantum_abundance(1.0, 0.0).is_err());
    }

    #[rstest]
    fn record_fields(ni56: Species) {
        assert_eq!(ni56.field("n"), Some(Value::Number(28.0)));
        assert_eq!(ni56.field("state"), Some(Value::Missing));
        assert_eq!(ni56.field("name"), Some(Value::Text("ni56".to_string())));
        assert_eq!(ni56.field("nonsense"), None);
    }
}
