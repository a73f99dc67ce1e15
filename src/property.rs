//! Named, optionally tagged, string properties
//!
//! Both user-defined reaction rates and zones carry free-form properties. A
//! property is identified by a name and up to two tags, so for example
//! `("rate", "t9", "1")` and `("rate", "t9", "2")` are distinct.
//!
//! ```rust
//! # use nucnet::property::Properties;
//! let mut properties = Properties::new();
//! properties.update("t9", None, None, "0.5");
//! properties.update("rate", Some("point"), Some("0"), "1.2e-5");
//!
//! assert_eq!(properties.get("t9", None, None), Some("0.5"));
//! assert_eq!(properties.get("rate", Some("point"), Some("0")), Some("1.2e-5"));
//! assert_eq!(properties.get("rate", Some("point"), None), None);
//! ```

// standard library
use std::collections::BTreeMap;

// external crates
use anyhow::{anyhow, Result};

/// Identifies a property by name and up to two tags
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyKey {
    pub name: String,
    pub tag1: Option<String>,
    pub tag2: Option<String>,
}

impl PropertyKey {
    pub fn new(name: &str, tag1: Option<&str>, tag2: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            tag1: tag1.map(str::to_string),
            tag2: tag2.map(str::to_string),
        }
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for tag in [&self.tag1, &self.tag2].into_iter().flatten() {
            write!(f, "[{tag}]")?;
        }
        Ok(())
    }
}

/// Ordered map of property keys to their text values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    map: BTreeMap<PropertyKey, String>,
}

impl Properties {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, name: &str, tag1: Option<&str>, tag2: Option<&str>) -> Option<&str> {
        self.map
            .get(&PropertyKey::new(name, tag1, tag2))
            .map(String::as_str)
    }

    /// Property parsed as a number
    pub fn get_f64(&self, name: &str, tag1: Option<&str>, tag2: Option<&str>) -> Result<f64> {
        let key = PropertyKey::new(name, tag1, tag2);
        let value = self
            .map
            .get(&key)
            .ok_or_else(|| anyhow!("No property {key}"))?;
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| anyhow!("Property {key} is not a number: \"{value}\""))
    }

    /// Insert or overwrite a property
    pub fn update(&mut self, name: &str, tag1: Option<&str>, tag2: Option<&str>, value: &str) {
        self.map
            .insert(PropertyKey::new(name, tag1, tag2), value.to_string());
    }

    /// Remove a property, returning its old value if there was one
    pub fn remove(&mut self, name: &str, tag1: Option<&str>, tag2: Option<&str>) -> Option<String> {
        self.map.remove(&PropertyKey::new(name, tag1, tag2))
    }

    /// Iterate in key order
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &str)> {
        self.map.iter().map(|(k, v)| (k, v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_distinguish_properties() {
        let mut properties = Properties::new();
        properties.update("x", Some("a"), None, "1");
        properties.update("x", Some("a"), Some("b"), "2");
        properties.update("x", None, None, "3");
        assert_eq!(properties.len(), 3);

        properties.update("x", Some("a"), None, "4");
        assert_eq!(properties.get("x", Some("a"), None), Some("4"));
        assert_eq!(properties.len(), 3);

        assert_eq!(properties.remove("x", None, None), Some("3".to_string()));
        assert_eq!(properties.remove("x", None, None), None);
    }

    #[test]
    fn numbers() {
        let mut properties = Properties::new();
        properties.update("t9", None, None, " 2.5 ");
        properties.update("label", None, None, "shell");
        assert_eq!(properties.get_f64("t9", None, None).unwrap(), 2.5);
        assert!(properties.get_f64("label", None, None).is_err());
        assert!(properties.get_f64("rho", None, None).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(PropertyKey::new("a", Some("b"), Some("c")).to_string(), "a[b][c]");
        assert_eq!(PropertyKey::new("a", None, None).to_string(), "a");
    }
}
