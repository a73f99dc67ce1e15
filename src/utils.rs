//! Common small functions used throughout the crate
//!
//! These are left public for the convenience of the user. For example
//! capitalising an element symbol or using prettier formatting for scientific
//! numbers in tables of rates and partition functions.

use std::fmt::LowerExp;

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Extends primitives with more specific formatting options
pub trait NumberFmt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// Works for anything that can be represented as scientific using the
    /// LowerExp trait.
    ///
    /// ```rust
    /// # use nucnet::utils::NumberFmt;
    /// let rate = 4.5e-12;
    /// assert_eq!(rate.sci(3, 2), "4.500e-12".to_string());
    /// assert_eq!((1.0).sci(5, 2), "1.00000e+00".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: LowerExp> NumberFmt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // Safe to `unwrap` as `num` is guaranteed to contain `'e'`
        let exp = num.split_off(num.find('e').unwrap());
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        // Pad the exponent with zeros if needed and put it back on the number
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }
}

/// Capilalises the first letter in a string
///
/// Element symbols are stored lowercase as they appear in species names, so
/// this is used to get the conventional symbol back.
///
/// ```rust
/// # use nucnet::utils::capitalise;
/// assert_eq!(capitalise("fe"), "Fe".to_string());
/// assert_eq!(capitalise(""), "".to_string());
/// ```
pub fn capitalise(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
        None => String::new(),
    }
}

/// Factorial of a small count as a float
///
/// Only ever used for counts of identical nuclei on one side of a reaction,
/// so overflow is not a concern.
///
/// ```rust
/// # use nucnet::utils::factorial;
/// assert_eq!(factorial(0), 1.0);
/// assert_eq!(factorial(3), 6.0);
/// ```
pub fn factorial(n: usize) -> f64 {
    (1..=n).fold(1.0, |acc, i| acc * i as f64)
}
