//! Species names from atomic number, mass number, and state
//!
//! Names are lowercase element symbols followed by the mass number, e.g.
//! `he4` or `fe56`. The free neutron is `n` and the dineutron `nn`. Elements
//! without an assigned symbol use the systematic placeholder built from the
//! digits of Z (`117` is `uus`).

// internal modules
use crate::utils::*;

// external crates
use anyhow::{bail, Result};

/// Lowercase symbols indexed by atomic number, `n` at zero for the neutron
const ELEMENTS: [&str; 117] = [
    "n", "h", "he", "li", "be", "b", "c", "n", "o", "f", "ne", "na", "mg", "al", "si", "p", "s",
    "cl", "ar", "k", "ca", "sc", "ti", "v", "cr", "mn", "fe", "co", "ni", "cu", "zn", "ga", "ge",
    "as", "se", "br", "kr", "rb", "sr", "y", "zr", "nb", "mo", "tc", "ru", "rh", "pd", "ag", "cd",
    "in", "sn", "sb", "te", "i", "xe", "cs", "ba", "la", "ce", "pr", "nd", "pm", "sm", "eu", "gd",
    "tb", "dy", "ho", "er", "tm", "yb", "lu", "hf", "ta", "w", "re", "os", "ir", "pt", "au", "hg",
    "tl", "pb", "bi", "po", "at", "rn", "fr", "ra", "ac", "th", "pa", "u", "np", "pu", "am", "cm",
    "bk", "cf", "es", "fm", "md", "no", "lr", "rf", "db", "sg", "bh", "hs", "mt", "ds", "rg", "cn",
    "uut", "fl", "uup", "lv",
];

/// Digit roots of the systematic element names
const DIGIT_ROOTS: [char; 10] = ['n', 'u', 'b', 't', 'q', 'p', 'h', 's', 'o', 'e'];

/// Lowercase element symbol for an atomic number
///
/// ```rust
/// # use nucnet::species::element_symbol;
/// assert_eq!(element_symbol(26), "fe");
/// assert_eq!(element_symbol(117), "uus");
/// ```
pub fn element_symbol(z: u32) -> String {
    match ELEMENTS.get(z as usize) {
        Some(symbol) => symbol.to_string(),
        None => unassigned_symbol(z),
    }
}

/// Conventional capitalised element symbol
///
/// Placeholder symbols for unassigned elements stay lowercase, as do the two
/// placeholders still in the table.
///
/// ```rust
/// # use nucnet::species::upper_case_symbol;
/// assert_eq!(upper_case_symbol(26), "Fe");
/// assert_eq!(upper_case_symbol(113), "uut");
/// assert_eq!(upper_case_symbol(0), "n");
/// ```
pub fn upper_case_symbol(z: u32) -> String {
    match ELEMENTS.get(z as usize) {
        Some(symbol) if z == 0 || symbol.len() == 3 => symbol.to_string(),
        Some(symbol) => capitalise(symbol),
        None => unassigned_symbol(z),
    }
}

/// Systematic name built from the decimal digits of `z`
fn unassigned_symbol(z: u32) -> String {
    z.to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| DIGIT_ROOTS[d as usize])
        .collect()
}

/// Base name (without state) for a nuclide
///
/// Returns `Ok(None)` when `a` is zero, since no species has that name, and an
/// error for neutron clusters heavier than the dineutron.
///
/// ```rust
/// # use nucnet::species::base_name;
/// assert_eq!(base_name(2, 4).unwrap().as_deref(), Some("he4"));
/// assert_eq!(base_name(0, 1).unwrap().as_deref(), Some("n"));
/// assert_eq!(base_name(0, 2).unwrap().as_deref(), Some("nn"));
/// assert_eq!(base_name(8, 0).unwrap(), None);
/// assert!(base_name(0, 3).is_err());
/// ```
pub fn base_name(z: u32, a: u32) -> Result<Option<String>> {
    if a == 0 {
        return Ok(None);
    }

    let symbol = element_symbol(z);

    if z == 0 {
        return match a {
            1 => Ok(Some(symbol)),
            2 => Ok(Some(symbol.repeat(2))),
            _ => bail!("No species name for a neutron cluster with A = {a}"),
        };
    }

    Ok(Some(f!("{symbol}{a}")))
}

/// Full species name including any state suffix
///
/// ```rust
/// # use nucnet::species::species_name;
/// assert_eq!(species_name(13, 26, Some("g")).unwrap().as_deref(), Some("al26g"));
/// assert_eq!(species_name(13, 26, None).unwrap().as_deref(), Some("al26"));
/// ```
pub fn species_name(z: u32, a: u32, state: Option<&str>) -> Result<Option<String>> {
    Ok(base_name(z, a)?.map(|name| match state {
        Some(state) => f!("{name}{state}"),
        None => name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1, None, "h1")]
    #[case(1, 2, None, "h2")]
    #[case(6, 12, None, "c12")]
    #[case(7, 14, None, "n14")]
    #[case(26, 56, None, "fe56")]
    #[case(92, 238, None, "u238")]
    #[case(116, 293, None, "lv293")]
    #[case(117, 294, None, "uus294")]
    #[case(120, 300, None, "ubn300")]
    #[case(13, 26, Some("g"), "al26g")]
    #[case(73, 180, Some("m"), "ta180m")]
    fn names(#[case] z: u32, #[case] a: u32, #[case] state: Option<&str>, #[case] name: &str) {
        assert_eq!(species_name(z, a, state).unwrap().as_deref(), Some(name));
    }

    #[test]
    fn names_are_pure() {
        // same input always gives the same name, and different (Z, A) differ
        let mut seen = std::collections::HashSet::new();
        for z in 1..=130 {
            for a in z..z + 5 {
                let first = species_name(z, a, None).unwrap();
                assert_eq!(first, species_name(z, a, None).unwrap());
                assert!(seen.insert(first.unwrap()));
            }
        }
    }

    #[test]
    fn element_table_is_complete() {
        assert_eq!(ELEMENTS.len(), 117);
        assert_eq!(element_symbol(116), "lv");
        assert_eq!(upper_case_symbol(114), "Fl");
        assert_eq!(upper_case_symbol(118), "uuo");
    }
}
