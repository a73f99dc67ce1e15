//! Interpolation of tabulated data
//!
//! Partition functions and tabulated reaction rates are both stored as a small
//! table of values against temperature. Lookups follow the same rules for
//! either:
//!
//! | Query                          | Result                             |
//! | ------------------------------ | ---------------------------------- |
//! | At or below the first point    | First tabulated value              |
//! | At or above the last point     | Last tabulated value               |
//! | Single point                   | That value everywhere              |
//! | Two points only                | Linear interpolation               |
//! | Three or more points           | Natural cubic spline interpolation |
//!
//! The spline is evaluated from the left knot of each interval, so a query
//! exactly on a tabulated point returns exactly the tabulated value.
//!
//! ```rust
//! # use nucnet::interp::Table;
//! let table = Table::new(vec![1.0, 2.0, 3.0], vec![0.0, 1.0, 4.0]).unwrap();
//! assert_eq!(table.eval(2.0), 1.0);
//! assert_eq!(table.eval(0.5), 0.0);
//! assert_eq!(table.eval(9.0), 4.0);
//! ```

// internal modules
use crate::utils::*;

// external crates
use anyhow::{bail, Result};
use itertools::Itertools;

/// A sorted table of `y` against strictly increasing `x`
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    x: Vec<f64>,
    y: Vec<f64>,
    spline: Option<CubicSpline>,
}

impl Table {
    /// Build a table from paired arrays
    ///
    /// Pairs are sorted by `x` together, so input order does not matter. The
    /// sorted `x` values must be strictly increasing. A single point gives a
    /// constant.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            bail!(
                "Table arrays differ in length ({} and {})",
                x.len(),
                y.len()
            );
        }

        if x.is_empty() {
            bail!("Table needs at least one point");
        }

        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            bail!("Table contains non-finite values");
        }

        let (x, y): (Vec<f64>, Vec<f64>) = x
            .into_iter()
            .zip(y)
            .sorted_by(|a, b| a.0.total_cmp(&b.0))
            .unzip();

        if let Some((a, b)) = x.iter().tuple_windows().find(|(a, b)| a >= b) {
            bail!("Table abscissae must be distinct, found {a} followed by {b}");
        }

        let spline = match x.len() {
            1 | 2 => None,
            _ => Some(CubicSpline::natural(&x, &y)),
        };

        Ok(Self { x, y, spline })
    }

    /// Sorted abscissae
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Ordinates in the same order as [Table::x]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Number of tabulated points
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Never true for a constructed table
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Interpolated value at `at`, clamped to the end points
    ///
    /// A NaN abscissa gives NaN.
    pub fn eval(&self, at: f64) -> f64 {
        if at.is_nan() {
            return f64::NAN;
        }

        let n = self.x.len();

        if at <= self.x[0] {
            return self.y[0];
        }

        if at >= self.x[n - 1] {
            return self.y[n - 1];
        }

        match &self.spline {
            Some(spline) => spline.eval(&self.x, &self.y, at),
            None => linear(self.x[0], self.y[0], self.x[1], self.y[1], at),
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (x, y) in self.x.iter().zip(&self.y) {
            writeln!(f, "{:>13}{:>13}", x.sci(4, 2), y.sci(4, 2))?;
        }
        Ok(())
    }
}

/// Straight line through two points evaluated at `at`
///
/// ```rust
/// # use nucnet::interp::linear;
/// assert_eq!(linear(0.0, 1.0, 2.0, 3.0, 1.0), 2.0);
/// ```
pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64, at: f64) -> f64 {
    y0 + (y1 - y0) * (at - x0) / (x1 - x0)
}

/// Coefficients of a natural cubic spline
///
/// On interval `i` the spline is
/// `y_i + b_i dx + c_i dx^2 + d_i dx^3` with `dx = at - x_i`, and the second
/// derivative vanishes at both ends.
#[derive(Debug, Clone, PartialEq)]
struct CubicSpline {
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl CubicSpline {
    /// Solves the tridiagonal system for the interior curvature terms
    fn natural(x: &[f64], y: &[f64]) -> Self {
        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

        // c[0] and c[n-1] stay zero for natural boundary conditions
        let mut c = vec![0.0; n];

        let m = n - 2;
        let mut diag = vec![0.0; m];
        let mut rhs = vec![0.0; m];
        for k in 0..m {
            let i = k + 1;
            diag[k] = 2.0 * (h[i - 1] + h[i]);
            rhs[k] = 3.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        }

        // forward elimination, the off-diagonals are h[1..n-2]
        for k in 1..m {
            let w = h[k] / diag[k - 1];
            diag[k] -= w * h[k];
            rhs[k] -= w * rhs[k - 1];
        }

        // back substitution
        c[m] = rhs[m - 1] / diag[m - 1];
        for k in (0..m - 1).rev() {
            c[k + 1] = (rhs[k] - h[k + 1] * c[k + 2]) / diag[k];
        }

        let mut b = vec![0.0; n - 1];
        let mut d = vec![0.0; n - 1];
        for i in 0..n - 1 {
            b[i] = (y[i + 1] - y[i]) / h[i] - h[i] * (c[i + 1] + 2.0 * c[i]) / 3.0;
            d[i] = (c[i + 1] - c[i]) / (3.0 * h[i]);
        }
        c.truncate(n - 1);

        Self { b, c, d }
    }

    /// Evaluate inside the tabulated range
    fn eval(&self, x: &[f64], y: &[f64], at: f64) -> f64 {
        // index of the left knot, at is strictly inside (x[0], x[n-1])
        let i = x.partition_point(|v| *v <= at) - 1;
        let dx = at - x[i];
        y[i] + dx * (self.b[i] + dx * (self.c[i] + dx * self.d[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![], vec![])]
    #[case(vec![1.0, 2.0], vec![1.0])]
    #[case(vec![1.0, 1.0, 2.0], vec![1.0, 2.0, 3.0])]
    #[case(vec![1.0, f64::NAN], vec![1.0, 2.0])]
    fn rejects_bad_tables(#[case] x: Vec<f64>, #[case] y: Vec<f64>) {
        assert!(Table::new(x, y).is_err());
    }

    #[test]
    fn sorts_pairs_together() {
        let table = Table::new(vec![3.0, 1.0, 2.0], vec![30.0, 10.0, 20.0]).unwrap();
        assert_eq!(table.x(), &[1.0, 2.0, 3.0]);
        assert_eq!(table.y(), &[10.0, 20.0, 30.0]);
    }

    #[rstest]
    fn exact_at_knots() {
        let x = vec![0.1, 0.3, 0.7, 1.5, 4.0, 10.0];
        let y = vec![0.0, 0.013, 0.21, 0.77, 1.9, 3.3];
        let table = Table::new(x.clone(), y.clone()).unwrap();
        for (xi, yi) in x.iter().zip(&y) {
            assert_eq!(table.eval(*xi), *yi);
        }
    }

    #[test]
    fn spline_reproduces_a_straight_line() {
        // a natural spline through collinear points is the line itself
        let table = Table::new(vec![0.0, 1.0, 3.0, 4.0], vec![1.0, 3.0, 7.0, 9.0]).unwrap();
        for at in [0.5, 1.7, 2.2, 3.9] {
            assert!((table.eval(at) - (2.0 * at + 1.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn natural_spline_midpoint() {
        // hand solved: c1 = -3/2 for points (0,0), (1,1), (2,0)
        let table = Table::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]).unwrap();
        assert!((table.eval(0.5) - 0.6875).abs() < 1e-12);
        assert!((table.eval(1.5) - 0.6875).abs() < 1e-12);
    }

    #[rstest]
    #[case(vec![1.0], vec![0.5])]
    #[case(vec![1.0, 3.0], vec![2.0, 6.0])]
    #[case(vec![1.0, 2.0, 3.0], vec![0.0, 1.0, 0.0])]
    fn nan_gives_nan(#[case] x: Vec<f64>, #[case] y: Vec<f64>) {
        let table = Table::new(x, y).unwrap();
        assert!(table.eval(f64::NAN).is_nan());
    }

    #[test]
    fn single_point_is_constant() {
        let table = Table::new(vec![1.0], vec![0.5]).unwrap();
        assert_eq!(table.eval(0.1), 0.5);
        assert_eq!(table.eval(7.0), 0.5);
    }

    #[test]
    fn two_points_are_linear() {
        let table = Table::new(vec![1.0, 3.0], vec![2.0, 6.0]).unwrap();
        assert_eq!(table.eval(2.0), 4.0);
        assert_eq!(table.eval(-1.0), 2.0);
        assert_eq!(table.eval(5.0), 6.0);
    }
}
