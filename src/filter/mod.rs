//! Declarative predicates for selecting species and reactions
//!
//! # Overview
//!
//! Subsets and views of a collection are defined by a small predicate
//! language over the fields of each record. For example, all iron isotopes
//! with more neutrons than protons:
//!
//! ```rust
//! # use nucnet::filter::Filter;
//! let filter = Filter::new("z = 26 and n > z").unwrap();
//! ```
//!
//! | Syntax                      | Meaning                                  |
//! | --------------------------- | ---------------------------------------- |
//! | `z`, `mass_excess`, ...     | Field of the record                      |
//! | `12`, `-1.5e3`              | Number literal                           |
//! | `'h1'`, `"fe56"`            | Text literal                             |
//! | `a - z`, `z + 1`            | Arithmetic on numbers                    |
//! | `= != < <= > >=`            | Comparison (`==` is accepted for `=`)    |
//! | `and`, `or`, `not(...)`     | Logical operators                        |
//! | `( ... )`                   | Grouping                                 |
//!
//! An empty predicate matches everything. `and` binds tighter than `or`.
//!
//! List fields, such as the reactants of a reaction, compare element by
//! element and match if any element matches, so `reactant = 'he4'` selects
//! every reaction with an alpha particle in the entrance channel.
//!
//! Comparing a number against text is simply false, and a field the record
//! does not know is an error when the filter is evaluated.

// Split into subfiles for development, but anything important is re-exported
mod parser;

// standard library
use std::cmp::Ordering;
use std::str::FromStr;

// external crates
use anyhow::{anyhow, Result};

/// Anything a [Filter] can be evaluated against
///
/// Implementors map field names to values. Returning `None` means the field
/// is not known for this kind of record.
pub trait Record {
    fn field(&self, name: &str) -> Option<Value>;
}

/// Value of a record field or literal
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    List(Vec<String>),
    /// Known field with no value, e.g. the state of a ground state species
    Missing,
}

/// A parsed predicate
///
/// ```rust
/// # use nucnet::filter::Filter;
/// # use nucnet::species::Species;
/// let fe56 = Species::new(26, 56, -60.6054, 0.0).unwrap();
///
/// assert!(Filter::new("z = 26").unwrap().matches(&fe56).unwrap());
/// assert!(Filter::new("a - z >= 30").unwrap().matches(&fe56).unwrap());
/// assert!(!Filter::new("name = 'fe57'").unwrap().matches(&fe56).unwrap());
/// assert!(Filter::new("").unwrap().matches(&fe56).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    text: String,
    expr: Expr,
}

impl Filter {
    /// Parse a predicate
    pub fn new(text: &str) -> Result<Self> {
        let expr = match text.trim().is_empty() {
            true => Expr::All,
            false => parser::parse(text).map_err(|e| anyhow!("Invalid filter \"{text}\": {e}"))?,
        };

        Ok(Self {
            text: text.trim().to_string(),
            expr,
        })
    }

    /// The filter that matches every record
    pub fn all() -> Self {
        Self {
            text: String::new(),
            expr: Expr::All,
        }
    }

    /// The predicate as written
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True for the empty predicate
    pub fn is_all(&self) -> bool {
        self.expr == Expr::All
    }

    /// Evaluate against a record
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> Result<bool> {
        self.expr.eval(record)
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for Filter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.is_all() {
            true => write!(f, "(all)"),
            false => write!(f, "{}", self.text),
        }
    }
}

/// Boolean expression tree
#[derive(Debug, Clone, PartialEq)]
enum Expr {
    All,
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Compare(Operand, Op, Operand),
}

impl Expr {
    fn eval<R: Record + ?Sized>(&self, record: &R) -> Result<bool> {
        Ok(match self {
            Expr::All => true,
            Expr::Or(lhs, rhs) => lhs.eval(record)? || rhs.eval(record)?,
            Expr::And(lhs, rhs) => lhs.eval(record)? && rhs.eval(record)?,
            Expr::Not(inner) => !inner.eval(record)?,
            Expr::Compare(lhs, op, rhs) => op.apply(&lhs.eval(record)?, &rhs.eval(record)?),
        })
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    fn test(&self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Lt => ordering == Ordering::Less,
            Op::Le => ordering != Ordering::Greater,
            Op::Gt => ordering == Ordering::Greater,
            Op::Ge => ordering != Ordering::Less,
        }
    }

    /// Lists match if any of their elements do
    fn apply(&self, lhs: &Value, rhs: &Value) -> bool {
        match (lhs, rhs) {
            (Value::Number(l), Value::Number(r)) => {
                l.partial_cmp(r).map(|o| self.test(o)).unwrap_or(false)
            }
            (Value::Text(l), Value::Text(r)) => self.test(l.as_str().cmp(r.as_str())),
            (Value::List(list), other @ Value::Text(_)) => list
                .iter()
                .any(|item| self.apply(&Value::Text(item.clone()), other)),
            (other @ Value::Text(_), Value::List(list)) => list
                .iter()
                .any(|item| self.apply(other, &Value::Text(item.clone()))),
            (Value::List(l), Value::List(r)) => l
                .iter()
                .any(|a| r.iter().any(|b| self.test(a.as_str().cmp(b.as_str())))),
            _ => false,
        }
    }
}

/// Arithmetic operands
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Number(f64),
    Text(String),
    Field(String),
    Add(Box<Operand>, Box<Operand>),
    Sub(Box<Operand>, Box<Operand>),
}

impl Operand {
    fn eval<R: Record + ?Sized>(&self, record: &R) -> Result<Value> {
        Ok(match self {
            Operand::Number(n) => Value::Number(*n),
            Operand::Text(s) => Value::Text(s.clone()),
            Operand::Field(name) => record
                .field(name)
                .ok_or_else(|| anyhow!("Unknown field \"{name}\" in filter"))?,
            Operand::Add(lhs, rhs) => match (lhs.eval(record)?, rhs.eval(record)?) {
                (Value::Number(l), Value::Number(r)) => Value::Number(l + r),
                _ => Value::Missing,
            },
            Operand::Sub(lhs, rhs) => match (lhs.eval(record)?, rhs.eval(record)?) {
                (Value::Number(l), Value::Number(r)) => Value::Number(l - r),
                _ => Value::Missing,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    struct Dummy {
        z: f64,
        name: &'static str,
        state: Option<&'static str>,
        items: Vec<&'static str>,
    }

    impl Record for Dummy {
        fn field(&self, name: &str) -> Option<Value> {
            Some(match name {
                "z" => Value::Number(self.z),
                "name" => Value::Text(self.name.to_string()),
                "state" => match self.state {
                    Some(s) => Value::Text(s.to_string()),
                    None => Value::Missing,
                },
                "items" => Value::List(self.items.iter().map(|s| s.to_string()).collect()),
                _ => return None,
            })
        }
    }

    #[fixture]
    fn dummy() -> Dummy {
        Dummy {
            z: 26.0,
            name: "fe56",
            state: None,
            items: vec!["he4", "c12"],
        }
    }

    #[rstest]
    #[case("", true)]
    #[case("   ", true)]
    #[case("z = 26", true)]
    #[case("z == 26", true)]
    #[case("z != 26", false)]
    #[case("z < 27 and z > 25", true)]
    #[case("z <= 26 and z >= 26", true)]
    #[case("z = 1 or z = 26", true)]
    #[case("not(z = 26)", false)]
    #[case("z + 1 = 27", true)]
    #[case("z - 1 = 25", true)]
    #[case("(z + 1) = 27", true)]
    #[case("z-1=25", true)]
    #[case("name = 'fe56'", true)]
    #[case("name = \"fe56\"", true)]
    #[case("name < 'h1'", true)]
    #[case("name = 26", false)]
    #[case("state = 'g'", false)]
    #[case("not(state = 'g')", true)]
    #[case("items = 'c12'", true)]
    #[case("items = 'o16'", false)]
    #[case("'he4' = items", true)]
    #[case("(z = 1 or z = 26) and name = 'fe56'", true)]
    #[case("z = 1 or z = 2 and z = 26", false)]
    #[case("z > 1e1", true)]
    fn evaluates(dummy: Dummy, #[case] text: &str, #[case] expected: bool) {
        let filter = Filter::new(text).unwrap();
        assert_eq!(filter.matches(&dummy).unwrap(), expected, "{text}");
    }

    #[rstest]
    #[case("z =")]
    #[case("z = 26 and")]
    #[case("(z = 26")]
    #[case("z 26")]
    #[case("name = 'fe56")]
    fn rejects_bad_syntax(#[case] text: &str) {
        assert!(Filter::new(text).is_err());
    }

    #[rstest]
    fn unknown_field_is_an_error(dummy: Dummy) {
        let filter = Filter::new("mass = 1").unwrap();
        assert!(filter.matches(&dummy).is_err());
    }

    #[test]
    fn keeps_the_text() {
        let filter: Filter = " z = 2 ".parse().unwrap();
        assert_eq!(filter.as_str(), "z = 2");
        assert_eq!(Filter::all().to_string(), "(all)");
        assert!(Filter::default().is_all());
    }
}
