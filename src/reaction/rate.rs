// internal modules
use crate::interp::Table;
use crate::property::Properties;

// external crates
use anyhow::{bail, Result};
use itertools::Itertools;

/// Added to rates and enhancement factors before taking logs
const TINY: f64 = 1.0e-300;

/// Rate data attached to a reaction
///
/// | Variant        | XML element      | Evaluation                           |
/// | -------------- | ---------------- | ------------------------------------ |
/// | `SingleRate`   | `single_rate`    | Constant                             |
/// | `RateTable`    | `rate_table`     | Interpolated table against T9        |
/// | `NonSmokerFit` | `non_smoker_fit` | Sum of seven parameter fits          |
/// | `UserRate`     | `user_rate`      | Function registered under a key      |
#[derive(Debug, Clone, PartialEq)]
pub enum RateData {
    SingleRate(f64),
    RateTable(RateTable),
    NonSmokerFit(Vec<NonSmokerFit>),
    UserRate(UserRate),
}

impl RateData {
    /// Name of the kind of rate, as in the XML element
    pub fn kind(&self) -> &'static str {
        match self {
            RateData::SingleRate(_) => "single_rate",
            RateData::RateTable(_) => "rate_table",
            RateData::NonSmokerFit(_) => "non_smoker_fit",
            RateData::UserRate(_) => "user_rate",
        }
    }

    /// Kind of rate, or the function key for user rates
    pub fn key(&self) -> &str {
        match self {
            RateData::SingleRate(_) => "single_rate",
            RateData::RateTable(_) => "rate_table",
            RateData::NonSmokerFit(_) => "non_smoker_fit",
            RateData::UserRate(user) => &user.key,
        }
    }

    /// Evaluate the built in rate kinds, `None` for user rates
    pub(crate) fn builtin_rate(&self, t9: f64) -> Option<f64> {
        match self {
            RateData::SingleRate(rate) => Some(*rate),
            RateData::RateTable(table) => Some(table.rate(t9)),
            RateData::NonSmokerFit(fits) => Some(fits.iter().map(|fit| fit.rate(t9)).sum()),
            RateData::UserRate(_) => None,
        }
    }
}

/// Tabulated rate against temperature
///
/// Each point has a rate and a stellar enhancement factor (`sef`, default 1).
/// Inside the table `log10(rate) + log10(sef)` is interpolated, while outside
/// it the end point rates are used as they are.
///
/// ```rust
/// # use nucnet::reaction::RateTable;
/// let table = RateTable::new(vec![1.0, 2.0], vec![1.0e-3, 1.0e-1], None).unwrap();
/// assert!((table.rate(1.5) - 1.0e-2).abs() < 1e-12);
/// assert_eq!(table.rate(10.0), 1.0e-1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    t9: Vec<f64>,
    rate: Vec<f64>,
    sef: Vec<f64>,
    log10_rate: Table,
}

impl RateTable {
    /// Build a table, sorting the points by temperature
    pub fn new(t9: Vec<f64>, rate: Vec<f64>, sef: Option<Vec<f64>>) -> Result<Self> {
        let sef = sef.unwrap_or_else(|| vec![1.0; t9.len()]);

        if t9.len() != rate.len() || t9.len() != sef.len() {
            bail!(
                "Rate table arrays differ in length (t9 {}, rate {}, sef {})",
                t9.len(),
                rate.len(),
                sef.len()
            );
        }

        let points: Vec<(f64, f64, f64)> = t9
            .into_iter()
            .zip(rate)
            .zip(sef)
            .map(|((t, r), s)| (t, r, s))
            .sorted_by(|a, b| a.0.total_cmp(&b.0))
            .collect();

        let t9: Vec<f64> = points.iter().map(|p| p.0).collect();
        let rate: Vec<f64> = points.iter().map(|p| p.1).collect();
        let sef: Vec<f64> = points.iter().map(|p| p.2).collect();

        let logs = rate
            .iter()
            .zip(&sef)
            .map(|(r, s)| (r + TINY).log10() + (s + TINY).log10())
            .collect();

        Ok(Self {
            log10_rate: Table::new(t9.clone(), logs)?,
            t9,
            rate,
            sef,
        })
    }

    pub fn t9(&self) -> &[f64] {
        &self.t9
    }

    pub fn rates(&self) -> &[f64] {
        &self.rate
    }

    /// Stellar enhancement factors
    pub fn sef(&self) -> &[f64] {
        &self.sef
    }

    pub fn len(&self) -> usize {
        self.t9.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t9.is_empty()
    }

    /// Rate at `t9`
    pub fn rate(&self, t9: f64) -> f64 {
        let n = self.t9.len();
        if t9 <= self.t9[0] {
            self.rate[0]
        } else if t9 >= self.t9[n - 1] {
            self.rate[n - 1]
        } else {
            10f64.powf(self.log10_rate.eval(t9))
        }
    }
}

/// A single seven parameter rate fit
///
/// The rate is `exp(a1 + a2/T + a3/T^(1/3) + a4 T^(1/3) + a5 T + a6 T^(5/3)
/// + a7 ln T)` with `T` clamped to the range of the fit. The eighth parameter
/// and the spin, `TlowHf`, and accuracy fields are carried for completeness.
#[derive(Debug, Clone, PartialEq)]
pub struct NonSmokerFit {
    pub note: Option<String>,
    pub spint: f64,
    pub spinf: f64,
    pub tlowhf: f64,
    pub tlowfit: f64,
    pub thighfit: f64,
    pub acc: f64,
    pub a: [f64; 8],
}

impl Default for NonSmokerFit {
    fn default() -> Self {
        Self {
            note: None,
            spint: 0.0,
            spinf: 0.0,
            tlowhf: 0.0,
            tlowfit: 0.0,
            thighfit: 10.0,
            acc: 0.0,
            a: [0.0; 8],
        }
    }
}

impl NonSmokerFit {
    /// Fit with the given parameters and default limits
    pub fn new(a: [f64; 8]) -> Self {
        Self {
            a,
            ..Default::default()
        }
    }

    /// Rate from this fit at `t9`
    pub fn rate(&self, t9: f64) -> f64 {
        let t = if t9 < self.tlowfit {
            self.tlowfit
        } else if t9 > self.thighfit {
            self.thighfit
        } else {
            t9
        };
        let a = &self.a;
        (a[0]
            + a[1] / t
            + a[2] / t.cbrt()
            + a[3] * t.cbrt()
            + a[4] * t
            + a[5] * t.powf(5.0 / 3.0)
            + a[6] * t.ln())
        .exp()
    }
}

/// Rate evaluated by a user function registered under `key`
///
/// The properties are whatever data the function needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserRate {
    pub key: String,
    pub properties: Properties,
}

impl UserRate {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            properties: Properties::new(),
        }
    }
}
